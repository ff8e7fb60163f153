//! Live meeting coordination.
//!
//! `MeetingService` is the one place that talks to both the provider and the
//! store. The provider is the source of truth for what is live; the store is
//! bookkeeping that is reconciled against it on every live query. Store
//! writes made as a side effect of a provider action are best-effort: they
//! are logged and never turn a confirmed provider action into a failure.

mod actions;
mod reconcile;
mod records;


use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;
use tracing::{error, info, warn};

use crate::admin::AdminGate;
use crate::db::MeetingStore;
use crate::error::{MeetingError, MeetingResult};
use crate::meeting::{MeetingFilter, MeetingPatch, MeetingRecord};
use crate::provider::{MeetingProvider, ProviderMeetingSnapshot};

/// Answer to "what is live right now?".
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LiveStatus {
    pub live: bool,
    pub meeting: Option<LiveMeeting>,
}

impl LiveStatus {
    pub fn idle() -> Self {
        Self {
            live: false,
            meeting: None,
        }
    }

    pub fn live(meeting: LiveMeeting) -> Self {
        Self {
            live: true,
            meeting: Some(meeting),
        }
    }
}

/// What a viewer needs to join. `id` is the record id when one exists.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LiveMeeting {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub meeting_number: String,
    pub password: String,
    pub title: String,
}

impl LiveMeeting {
    fn from_record(record: &MeetingRecord) -> Self {
        Self {
            id: Some(record.id.clone()),
            meeting_number: record.provider_meeting_id.clone(),
            password: record.password.clone().unwrap_or_default(),
            title: record.title.clone(),
        }
    }

    fn from_snapshot(snapshot: &ProviderMeetingSnapshot) -> Self {
        Self {
            id: None,
            meeting_number: snapshot.id.clone(),
            password: snapshot.password.clone().unwrap_or_default(),
            title: snapshot.topic.clone(),
        }
    }

    /// Stored values win; empty ones fall back to what the provider reports.
    fn merged(record: &MeetingRecord, snapshot: &ProviderMeetingSnapshot) -> Self {
        let password = record
            .password
            .clone()
            .filter(|p| !p.is_empty())
            .or_else(|| snapshot.password.clone())
            .unwrap_or_default();
        let title = if record.title.is_empty() {
            snapshot.topic.clone()
        } else {
            record.title.clone()
        };

        Self {
            id: Some(record.id.clone()),
            meeting_number: snapshot.id.clone(),
            password,
            title,
        }
    }
}

/// Join credentials returned to the admin who started a meeting.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StartedMeeting {
    pub id: String,
    pub meeting_number: String,
    pub password: String,
    pub join_url: String,
    pub start_url: String,
    pub title: String,
}

pub struct MeetingService {
    provider: Arc<dyn MeetingProvider>,
    store: Option<Arc<dyn MeetingStore>>,
    gate: Arc<dyn AdminGate>,
    default_title: String,
    store_trust: Duration,
}

impl MeetingService {
    /// `store` is `None` in degraded mode; everything then runs off the provider.
    pub fn new(
        provider: Arc<dyn MeetingProvider>,
        store: Option<Arc<dyn MeetingStore>>,
        gate: Arc<dyn AdminGate>,
    ) -> Self {
        Self {
            provider,
            store,
            gate,
            default_title: "Livestream".to_string(),
            store_trust: Duration::from_secs(30),
        }
    }

    pub fn with_default_title(mut self, title: impl Into<String>) -> Self {
        self.default_title = title.into();
        self
    }

    /// How long a stored live record answers queries without asking the provider.
    pub fn with_store_trust(mut self, window: Duration) -> Self {
        self.store_trust = window;
        self
    }

    pub fn has_store(&self) -> bool {
        self.store.is_some()
    }

    fn require_admin(&self, caller: &str, action: &str) -> MeetingResult<()> {
        if self.gate.is_admin(caller) {
            return Ok(());
        }
        warn!("Rejected attempt to {} by non-admin {:?}", action, caller);
        Err(MeetingError::Forbidden(format!(
            "Only admins can {}",
            action
        )))
    }

    /// Store required for this operation; absent means unconfigured, not empty.
    fn require_store(&self) -> MeetingResult<&Arc<dyn MeetingStore>> {
        self.store
            .as_ref()
            .ok_or_else(|| MeetingError::Unconfigured("Database".to_string()))
    }

    /// Best-effort bulk transition to ended. Failures are logged only.
    async fn end_records(&self, store: &dyn MeetingStore, filter: &MeetingFilter, context: &str) {
        match store.update_where(filter, &MeetingPatch::ended()).await {
            Ok(0) => {}
            Ok(count) => info!("Marked {} meeting record(s) ended ({})", count, context),
            Err(e) => error!(
                "Failed to mark meeting records ended ({}, filter {:?}): {:#}",
                context, filter, e
            ),
        }
    }
}
