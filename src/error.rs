//! Error types for meeting operations.
//!
//! Errors are classified by who has to act on them:
//! - Upstream: the provider rejected or failed a call
//! - Caller: forbidden, bad input, missing record
//! - Operator: missing credentials or persistence

use thiserror::Error;

#[derive(Debug, Error)]
pub enum MeetingError {
    #[error("Provider request failed with status {status}: {body}")]
    Provider { status: u16, body: String },

    #[error("Provider request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Unexpected provider response: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("{0} not found")]
    NotFound(String),

    #[error("{0}")]
    Forbidden(String),

    #[error("{0} not configured")]
    Unconfigured(String),

    #[error("{0}")]
    BadRequest(String),

    #[error("Meeting store error: {0:#}")]
    Store(anyhow::Error),
}

impl MeetingError {
    /// True when the failure happened at or on the way to the provider.
    pub fn is_upstream(&self) -> bool {
        matches!(
            self,
            MeetingError::Provider { .. } | MeetingError::Transport(_) | MeetingError::Decode(_)
        )
    }
}

pub type MeetingResult<T> = Result<T, MeetingError>;
