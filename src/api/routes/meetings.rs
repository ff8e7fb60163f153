//! Meeting record endpoints.
//!
//! Provides HTTP endpoints for:
//! - Listing meetings (GET /meetings)
//! - Creating a meeting record (POST /meetings)
//! - Getting, updating and deleting a record (GET/PATCH/DELETE /meetings/:id)

use axum::{
    extract::{rejection::JsonRejection, Path, Query, State},
    http::{HeaderMap, StatusCode},
    response::Json,
    routing::get,
    Router,
};
use serde::Deserialize;
use serde_json::{json, Value};

use super::AppState;
use crate::api::error::{ApiError, ApiResult};
use crate::meeting::{MeetingDraft, MeetingFilter, MeetingPatch, MeetingRecord, MeetingStatus};

/// Query parameters for listing meetings.
#[derive(Debug, Deserialize, Default)]
pub struct MeetingQueryParams {
    /// scheduled, live or ended
    pub status: Option<String>,
    /// Host identity
    pub host_id: Option<String>,
}

impl MeetingQueryParams {
    fn into_filter(self) -> ApiResult<MeetingFilter> {
        let status = self
            .status
            .filter(|s| !s.is_empty())
            .map(|s| s.parse::<MeetingStatus>())
            .transpose()
            .map_err(|e| ApiError::bad_request(e.to_string()))?;

        Ok(MeetingFilter {
            status,
            host_identity: self.host_id.filter(|h| !h.is_empty()),
            ..MeetingFilter::default()
        })
    }
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/meetings", get(list_meetings).post(create_meeting))
        .route(
            "/meetings/:id",
            get(get_meeting).patch(update_meeting).delete(delete_meeting),
        )
}

/// GET /meetings - List meeting records, newest first.
async fn list_meetings(
    State(state): State<AppState>,
    Query(params): Query<MeetingQueryParams>,
) -> ApiResult<Json<Vec<MeetingRecord>>> {
    let filter = params.into_filter()?;
    let meetings = state.service.list_meetings(&filter).await?;
    Ok(Json(meetings))
}

/// POST /meetings - Record a meeting (admin only).
async fn create_meeting(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Result<Json<MeetingDraft>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<MeetingRecord>)> {
    let Json(draft) = body?;
    let caller = state.caller(&headers);
    let record = state.service.create_meeting(&caller, draft).await?;
    Ok((StatusCode::CREATED, Json(record)))
}

/// GET /meetings/:id - Get a single meeting record.
async fn get_meeting(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<MeetingRecord>> {
    let record = state.service.get_meeting(&id).await?;
    Ok(Json(record))
}

/// PATCH /meetings/:id - Partially update a record (admin only).
async fn update_meeting(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<String>,
    body: Result<Json<MeetingPatch>, JsonRejection>,
) -> ApiResult<Json<MeetingRecord>> {
    let Json(patch) = body?;
    let caller = state.caller(&headers);
    let record = state.service.update_meeting(&caller, &id, patch).await?;
    Ok(Json(record))
}

/// DELETE /meetings/:id - Delete a record (admin only).
async fn delete_meeting(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> ApiResult<Json<Value>> {
    let caller = state.caller(&headers);
    state.service.delete_meeting(&caller, &id).await?;
    Ok(Json(json!({ "success": true })))
}
