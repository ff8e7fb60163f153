//! CLI handlers for one-shot meeting operations.
//!
//! Each command wires up the same service the HTTP API uses, runs a single
//! operation and prints the result as JSON.

use anyhow::{bail, Result};
use serde::Serialize;
use serde_json::json;

use super::args::{EndCliArgs, MeetingsCliArgs, MeetingsCommand, StartCliArgs};
use crate::app::{build_components, Components};
use crate::config::Config;
use crate::meeting::{MeetingFilter, MeetingStatus};

fn components() -> Result<(Config, Components)> {
    let config = Config::load()?;
    let components = build_components(&config);
    Ok((config, components))
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Explicit `--as`, otherwise the first configured admin.
fn acting_identity(config: &Config, as_user: Option<String>) -> Result<String> {
    match as_user.or_else(|| config.admin.usernames.first().cloned()) {
        Some(identity) => Ok(identity),
        None => bail!("No admin usernames configured; pass --as <username>"),
    }
}

pub async fn handle_live_command() -> Result<()> {
    let (_, components) = components()?;
    let status = components.service.query_live().await?;
    print_json(&status)
}

pub async fn handle_start_command(args: StartCliArgs) -> Result<()> {
    let (config, components) = components()?;
    let caller = acting_identity(&config, args.as_user)?;
    let meeting = components
        .service
        .start_meeting(&caller, args.title.as_deref())
        .await?;
    print_json(&json!({ "meeting": meeting }))
}

pub async fn handle_end_command(args: EndCliArgs) -> Result<()> {
    let (config, components) = components()?;
    let caller = acting_identity(&config, args.as_user)?;
    components
        .service
        .end_meeting(&caller, &args.meeting_id)
        .await?;
    print_json(&json!({ "success": true }))
}

pub async fn handle_meetings_command(args: MeetingsCliArgs) -> Result<()> {
    let (_, components) = components()?;
    let service = components.service;

    match args.command {
        MeetingsCommand::List { status, host } => {
            let filter = MeetingFilter {
                status: status.map(|s| s.parse::<MeetingStatus>()).transpose()?,
                host_identity: host,
                ..MeetingFilter::default()
            };
            let meetings = service.list_meetings(&filter).await?;
            if meetings.is_empty() {
                eprintln!("No meetings found matching your criteria.");
            }
            print_json(&meetings)
        }
        MeetingsCommand::Show { id } => print_json(&service.get_meeting(&id).await?),
        MeetingsCommand::Status { meeting_id } => {
            let status = service.meeting_status(&meeting_id).await?;
            print_json(&json!({ "meetingId": meeting_id, "status": status }))
        }
    }
}

pub async fn handle_diagnose_command() -> Result<()> {
    let (_, components) = components()?;
    let report = components.zoom.diagnose().await;
    print_json(&report)
}
