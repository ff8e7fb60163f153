//! External meeting provider.
//!
//! `MeetingProvider` is the contract the reconciler depends on; `ZoomClient`
//! implements it over the Zoom REST API.

pub mod token;
pub mod zoom;

use async_trait::async_trait;
use serde::{de, Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::error::MeetingResult;

pub use token::{AccessToken, TokenCache};
pub use zoom::{ProviderDiagnostics, ZoomClient};

/// Live status of a single meeting as the provider reports it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderStatus {
    Started,
    Waiting,
    Ended,
    NotFound,
}

impl ProviderStatus {
    /// Anything the provider does not call started or ended is still waiting.
    pub fn from_provider(status: Option<&str>) -> Self {
        match status {
            Some("started") => Self::Started,
            Some("ended") | Some("finished") => Self::Ended,
            _ => Self::Waiting,
        }
    }
}

/// A meeting observed at the provider. Never persisted.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProviderMeetingSnapshot {
    pub id: String,
    pub topic: String,
    pub password: Option<String>,
    pub status: ProviderStatus,
}

/// Join credentials for a freshly created meeting.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InstantMeeting {
    pub id: String,
    pub topic: String,
    pub password: String,
    pub join_url: String,
    pub start_url: String,
}

#[async_trait]
pub trait MeetingProvider: Send + Sync {
    /// Join-before-host, muted on entry, no waiting room.
    async fn create_instant_meeting(&self, topic: &str) -> MeetingResult<InstantMeeting>;

    /// Ending a meeting the provider no longer knows about succeeds.
    async fn end_meeting(&self, meeting_id: &str) -> MeetingResult<()>;

    /// Best effort: one failed end does not stop the rest. Returns how many ended.
    async fn end_all_live(&self) -> MeetingResult<usize>;

    /// The first live meeting found, or `None` when nothing is live.
    async fn live_meeting(&self) -> MeetingResult<Option<ProviderMeetingSnapshot>>;

    async fn meeting_status(&self, meeting_id: &str) -> MeetingResult<ProviderStatus>;
}

/// Meeting ids travel as JSON numbers from Zoom and as strings from browsers.
pub fn meeting_id_from_json(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

pub(crate) fn deserialize_meeting_id<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    meeting_id_from_json(&value)
        .ok_or_else(|| de::Error::custom(format!("invalid meeting id: {}", value)))
}

pub(crate) fn deserialize_optional_meeting_id<'de, D>(
    deserializer: D,
) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.as_ref().and_then(meeting_id_from_json))
}
