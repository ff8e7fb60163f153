//! Meeting records and the filters and patches applied to them.

pub mod title;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

pub use title::default_meeting_title;

/// Host identity assigned when a live meeting is discovered at the provider
/// without a record. The real initiator is unknown at that point.
pub const PLACEHOLDER_HOST: &str = "admin";

/// Persisted lifecycle of a meeting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MeetingStatus {
    Scheduled,
    Live,
    Ended,
}

#[derive(Debug, Error)]
#[error("Invalid meeting status: {0}")]
pub struct UnknownStatus(pub String);

impl MeetingStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Scheduled => "scheduled",
            Self::Live => "live",
            Self::Ended => "ended",
        }
    }
}

impl FromStr for MeetingStatus {
    type Err = UnknownStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "scheduled" => Ok(Self::Scheduled),
            "live" => Ok(Self::Live),
            "ended" => Ok(Self::Ended),
            other => Err(UnknownStatus(other.to_string())),
        }
    }
}

impl fmt::Display for MeetingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A meeting record from the store.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MeetingRecord {
    pub id: String,
    pub provider_meeting_id: String,
    pub password: Option<String>,
    pub title: String,
    pub description: Option<String>,
    pub host_identity: String,
    pub status: MeetingStatus,
    pub scheduled_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Fields supplied when creating a record. The store assigns id and timestamps.
#[derive(Debug, Clone)]
pub struct NewMeeting {
    pub provider_meeting_id: String,
    pub password: Option<String>,
    pub title: String,
    pub description: Option<String>,
    pub host_identity: String,
    pub status: MeetingStatus,
    pub scheduled_at: Option<DateTime<Utc>>,
}

impl NewMeeting {
    pub fn new(
        provider_meeting_id: impl Into<String>,
        title: impl Into<String>,
        host_identity: impl Into<String>,
    ) -> Self {
        Self {
            provider_meeting_id: provider_meeting_id.into(),
            password: None,
            title: title.into(),
            description: None,
            host_identity: host_identity.into(),
            status: MeetingStatus::Scheduled,
            scheduled_at: None,
        }
    }

    pub fn with_status(mut self, status: MeetingStatus) -> Self {
        self.status = status;
        self
    }

    pub fn with_password(mut self, password: Option<String>) -> Self {
        self.password = password;
        self
    }
}

/// Equality filters over records. Unset fields match everything.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MeetingFilter {
    pub status: Option<MeetingStatus>,
    pub host_identity: Option<String>,
    pub provider_meeting_id: Option<String>,
    /// Matches records whose provider meeting id differs from this one.
    pub exclude_provider_meeting_id: Option<String>,
    /// Matches every record except this one.
    pub exclude_id: Option<String>,
}

impl MeetingFilter {
    pub fn with_status(status: MeetingStatus) -> Self {
        Self {
            status: Some(status),
            ..Self::default()
        }
    }

    pub fn live() -> Self {
        Self::with_status(MeetingStatus::Live)
    }

    pub fn for_provider_meeting(provider_meeting_id: impl Into<String>) -> Self {
        Self {
            provider_meeting_id: Some(provider_meeting_id.into()),
            ..Self::default()
        }
    }

    /// Live records belonging to any other provider meeting.
    pub fn live_except(provider_meeting_id: impl Into<String>) -> Self {
        Self {
            status: Some(MeetingStatus::Live),
            exclude_provider_meeting_id: Some(provider_meeting_id.into()),
            ..Self::default()
        }
    }

    /// Live records other than the given one, duplicates of its meeting included.
    pub fn live_except_record(id: impl Into<String>) -> Self {
        Self {
            status: Some(MeetingStatus::Live),
            exclude_id: Some(id.into()),
            ..Self::default()
        }
    }
}

/// Caller-supplied fields for a record created outside a start action.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct MeetingDraft {
    #[serde(
        default,
        alias = "zoom_meeting_id",
        deserialize_with = "crate::provider::deserialize_optional_meeting_id"
    )]
    pub provider_meeting_id: Option<String>,
    #[serde(default, alias = "zoom_password")]
    pub password: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub scheduled_at: Option<DateTime<Utc>>,
}

/// Partial update. `None` leaves a column untouched.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct MeetingPatch {
    pub title: Option<String>,
    pub description: Option<String>,
    pub password: Option<String>,
    pub status: Option<MeetingStatus>,
    pub scheduled_at: Option<DateTime<Utc>>,
}

impl MeetingPatch {
    pub fn status(status: MeetingStatus) -> Self {
        Self {
            status: Some(status),
            ..Self::default()
        }
    }

    pub fn ended() -> Self {
        Self::status(MeetingStatus::Ended)
    }

    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }
}
