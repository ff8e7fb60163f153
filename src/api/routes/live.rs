//! Live meeting endpoints.
//!
//! Provides HTTP endpoints for:
//! - Querying the live meeting (GET /zoom/live-meeting)
//! - Starting a meeting (POST /zoom/create-meeting)
//! - Ending a meeting (POST /zoom/end-meeting)
//! - Probing a meeting's status (GET /zoom/meetings/:id/status)
//! - Provider diagnostics (GET /zoom/debug)

use axum::{
    body::Bytes,
    extract::{Path, State},
    http::HeaderMap,
    response::Json,
    routing::{get, post},
    Router,
};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::info;

use super::AppState;
use crate::api::error::{ApiError, ApiResult};
use crate::live::LiveStatus;
use crate::provider::ProviderDiagnostics;

/// Request body for the create endpoint. The body itself is optional.
#[derive(Debug, Default, Deserialize)]
pub struct CreateMeetingRequest {
    pub title: Option<String>,
}

/// Request body for the end endpoint. Accepts the id as a string or a number.
#[derive(Debug, Default, Deserialize)]
pub struct EndMeetingRequest {
    #[serde(
        default,
        rename = "meetingId",
        alias = "meeting_id",
        deserialize_with = "crate::provider::deserialize_optional_meeting_id"
    )]
    pub meeting_id: Option<String>,
}

/// An empty body means "no body"; anything else must be valid JSON for `T`.
fn optional_body<T: DeserializeOwned>(body: &Bytes) -> ApiResult<Option<T>> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(None);
    }
    let Json(value) = Json::<T>::from_bytes(body)?;
    Ok(Some(value))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/zoom/live-meeting", get(live_meeting))
        .route("/zoom/create-meeting", post(create_meeting))
        .route("/zoom/end-meeting", post(end_meeting))
        .route("/zoom/meetings/:id/status", get(meeting_status))
        .route("/zoom/debug", get(debug))
}

/// GET /zoom/live-meeting - What is live right now. Open to every caller.
async fn live_meeting(State(state): State<AppState>) -> ApiResult<Json<LiveStatus>> {
    let status = state.service.query_live().await?;
    Ok(Json(status))
}

/// POST /zoom/create-meeting - Start an instant meeting (admin only).
async fn create_meeting(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> ApiResult<Json<Value>> {
    let caller = state.caller(&headers);
    let title = optional_body::<CreateMeetingRequest>(&body)?.and_then(|req| req.title);

    info!("Meeting start requested by {:?}", caller);

    let meeting = state
        .service
        .start_meeting(&caller, title.as_deref())
        .await?;
    Ok(Json(json!({ "meeting": meeting })))
}

/// POST /zoom/end-meeting - End a meeting (admin only).
async fn end_meeting(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> ApiResult<Json<Value>> {
    let caller = state.caller(&headers);
    let meeting_id = optional_body::<EndMeetingRequest>(&body)?
        .and_then(|req| req.meeting_id)
        .unwrap_or_default();

    state.service.end_meeting(&caller, &meeting_id).await?;
    Ok(Json(json!({ "success": true })))
}

/// GET /zoom/meetings/:id/status - Provider view of a single meeting.
async fn meeting_status(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<Value>> {
    let status = state.service.meeting_status(&id).await?;
    Ok(Json(json!({ "meetingId": id, "status": status })))
}

/// GET /zoom/debug - Credential and connectivity report. Never fails once configured.
async fn debug(State(state): State<AppState>) -> ApiResult<Json<ProviderDiagnostics>> {
    let zoom = state
        .zoom
        .as_ref()
        .ok_or_else(|| ApiError::service_unavailable("Zoom client not configured"))?;
    Ok(Json(zoom.diagnose().await))
}
