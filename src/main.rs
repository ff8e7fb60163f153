use anyhow::Result;
use clap::Parser;
use meetbridge::{
    app,
    cli::{
        handle_diagnose_command, handle_end_command, handle_live_command, handle_meetings_command,
        handle_start_command, Cli, CliCommand,
    },
};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let log_level = if cli.verbose { "debug" } else { "info" };
    let env_filter = EnvFilter::try_new(log_level).unwrap_or_else(|_| EnvFilter::new("info"));

    // Logs go to stderr so one-shot commands can pipe their JSON
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Some(CliCommand::Version) => {
            println!("meetbridge {}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
        Some(CliCommand::Live) => handle_live_command().await,
        Some(CliCommand::Start(args)) => handle_start_command(args).await,
        Some(CliCommand::End(args)) => handle_end_command(args).await,
        Some(CliCommand::Meetings(args)) => handle_meetings_command(args).await,
        Some(CliCommand::Diagnose) => handle_diagnose_command().await,
        Some(CliCommand::Serve) | None => app::run_service().await,
    }
}
