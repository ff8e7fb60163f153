//! API route modules.

pub mod live;
pub mod meetings;

use axum::http::HeaderMap;
use std::sync::Arc;

use crate::live::MeetingService;
use crate::provider::ZoomClient;

/// Shared state for every route.
#[derive(Clone)]
pub struct AppState {
    pub service: Arc<MeetingService>,
    /// Only needed for diagnostics; `None` when running against another provider.
    pub zoom: Option<Arc<ZoomClient>>,
    pub identity_header: String,
}

impl AppState {
    pub fn new(service: Arc<MeetingService>, identity_header: impl Into<String>) -> Self {
        Self {
            service,
            zoom: None,
            identity_header: identity_header.into(),
        }
    }

    pub fn with_zoom(mut self, zoom: Arc<ZoomClient>) -> Self {
        self.zoom = Some(zoom);
        self
    }

    /// Identity asserted by the embedding host. Missing or unreadable is empty.
    pub fn caller(&self, headers: &HeaderMap) -> String {
        headers
            .get(self.identity_header.as_str())
            .and_then(|v| v.to_str().ok())
            .map(|v| v.trim().to_string())
            .unwrap_or_default()
    }
}
