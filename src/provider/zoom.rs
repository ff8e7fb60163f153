//! Zoom REST client (server-to-server OAuth).

use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use chrono::{SecondsFormat, Utc};
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::sync::Arc;
use tracing::{debug, error, info, warn};

use super::{
    deserialize_meeting_id, AccessToken, InstantMeeting, MeetingProvider,
    ProviderMeetingSnapshot, ProviderStatus, TokenCache,
};
use crate::config::ZoomConfig;
use crate::error::{MeetingError, MeetingResult};

const SCHEDULED_PAGE_SIZE: &str = "10";

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    expires_in: i64,
}

#[derive(Debug, Deserialize)]
struct MeetingList {
    #[serde(default)]
    meetings: Vec<ListedMeeting>,
}

#[derive(Debug, Deserialize)]
struct ListedMeeting {
    #[serde(deserialize_with = "deserialize_meeting_id")]
    id: String,
    #[serde(default)]
    topic: String,
    #[serde(default)]
    password: Option<String>,
}

#[derive(Debug, Deserialize)]
struct MeetingDetails {
    #[serde(default)]
    status: Option<String>,
    #[serde(default)]
    password: Option<String>,
}

#[derive(Debug, Deserialize)]
struct CreatedMeeting {
    #[serde(deserialize_with = "deserialize_meeting_id")]
    id: String,
    #[serde(default)]
    topic: String,
    #[serde(default)]
    password: String,
    join_url: String,
    start_url: String,
}

#[derive(Debug, Clone)]
struct Credentials {
    account_id: String,
    client_id: String,
    client_secret: String,
}

impl Credentials {
    fn from_config(config: &ZoomConfig) -> Option<Self> {
        let present = |v: &Option<String>| v.clone().filter(|s| !s.trim().is_empty());
        Some(Self {
            account_id: present(&config.account_id)?,
            client_id: present(&config.client_id)?,
            client_secret: present(&config.client_secret)?,
        })
    }

    fn basic_auth(&self) -> String {
        let encoded = STANDARD.encode(format!("{}:{}", self.client_id, self.client_secret));
        format!("Basic {}", encoded)
    }
}

/// What `diagnose` could find out about the configured Zoom account.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProviderDiagnostics {
    pub credentials: CredentialPresence,
    pub token_status: String,
    pub user: Option<ProviderUser>,
    pub live_meetings: Option<usize>,
    pub scheduled_meetings: Option<usize>,
    pub errors: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CredentialPresence {
    pub has_account_id: bool,
    pub has_client_id: bool,
    pub has_client_secret: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderUser {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub display_name: Option<String>,
}

pub struct ZoomClient {
    client: reqwest::Client,
    credentials: Option<Credentials>,
    presence: CredentialPresence,
    api_base: String,
    oauth_base: String,
    tokens: TokenCache,
}

impl ZoomClient {
    pub fn new(config: &ZoomConfig) -> Self {
        let has = |v: &Option<String>| v.as_deref().is_some_and(|s| !s.trim().is_empty());
        let presence = CredentialPresence {
            has_account_id: has(&config.account_id),
            has_client_id: has(&config.client_id),
            has_client_secret: has(&config.client_secret),
        };

        let credentials = Credentials::from_config(config);
        if !config.has_credentials() {
            warn!("Zoom API credentials not configured; provider calls will fail");
        }

        info!("Initialized Zoom client with base URL: {}", config.api_base);

        Self {
            client: reqwest::Client::new(),
            credentials,
            presence,
            api_base: config.api_base.trim_end_matches('/').to_string(),
            oauth_base: config.oauth_base.trim_end_matches('/').to_string(),
            tokens: TokenCache::default(),
        }
    }

    /// Cached bearer token, refreshed when absent or about to expire.
    pub async fn access_token(&self) -> MeetingResult<Arc<AccessToken>> {
        if let Some(token) = self.tokens.fresh(Utc::now()) {
            return Ok(token);
        }

        let credentials = self
            .credentials
            .as_ref()
            .ok_or_else(|| MeetingError::Unconfigured("Zoom API credentials".to_string()))?;

        let token = self.tokens.store(self.request_token(credentials).await?);
        debug!("Refreshed Zoom access token, expires at {}", token.expires_at());
        Ok(token)
    }

    async fn request_token(&self, credentials: &Credentials) -> MeetingResult<AccessToken> {
        let response = self
            .client
            .post(format!("{}/oauth/token", self.oauth_base))
            .query(&[
                ("grant_type", "account_credentials"),
                ("account_id", credentials.account_id.as_str()),
            ])
            .header("Authorization", credentials.basic_auth())
            .header("Content-Type", "application/x-www-form-urlencoded")
            .send()
            .await?;

        let body = success_body(response, "token request").await?;
        let token: TokenResponse = serde_json::from_str(&body)?;

        Ok(AccessToken::issued(
            token.access_token,
            token.expires_in,
            Utc::now(),
        ))
    }

    /// `None` when the listing request itself was rejected.
    async fn list_meetings(
        &self,
        token: &AccessToken,
        query: &[(&str, &str)],
    ) -> MeetingResult<Option<Vec<ListedMeeting>>> {
        let response = self
            .client
            .get(format!("{}/users/me/meetings", self.api_base))
            .bearer_auth(token.secret())
            .query(query)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            error!(
                "Failed to list Zoom meetings {:?} with status {}: {}",
                query, status, body
            );
            return Ok(None);
        }

        let list: MeetingList = serde_json::from_str(&body)?;
        Ok(Some(list.meetings))
    }

    /// `None` when the meeting is unknown or the lookup failed.
    async fn meeting_details(
        &self,
        token: &AccessToken,
        meeting_id: &str,
    ) -> MeetingResult<Option<MeetingDetails>> {
        let response = self
            .client
            .get(format!("{}/meetings/{}", self.api_base, meeting_id))
            .bearer_auth(token.secret())
            .send()
            .await?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Ok(None);
        }

        let body = response.text().await?;
        if !status.is_success() {
            error!(
                "Failed to get Zoom meeting {} with status {}: {}",
                meeting_id, status, body
            );
            return Ok(None);
        }

        Ok(Some(serde_json::from_str(&body)?))
    }

    /// Never fails; every problem ends up in the report.
    pub async fn diagnose(&self) -> ProviderDiagnostics {
        let mut report = ProviderDiagnostics {
            credentials: self.presence.clone(),
            token_status: "not_attempted".to_string(),
            user: None,
            live_meetings: None,
            scheduled_meetings: None,
            errors: Vec::new(),
        };

        let Some(credentials) = &self.credentials else {
            return report;
        };

        // Always a fresh token here so bad credentials show up even with a warm cache
        let token = match self.request_token(credentials).await {
            Ok(token) => {
                report.token_status = "success".to_string();
                token
            }
            Err(MeetingError::Provider { status, .. }) => {
                report.token_status = format!("failed: {}", status);
                return report;
            }
            Err(e) => {
                report.token_status = format!("error: {}", e);
                return report;
            }
        };

        match self.current_user(&token).await {
            Ok(user) => report.user = Some(user),
            Err(e) => report.errors.push(format!("user lookup: {}", e)),
        }

        match self.list_meetings(&token, &[("type", "live")]).await {
            Ok(Some(meetings)) => report.live_meetings = Some(meetings.len()),
            Ok(None) => report.errors.push("live meetings listing rejected".to_string()),
            Err(e) => report.errors.push(format!("live meetings: {}", e)),
        }

        match self.list_meetings(&token, &[("type", "scheduled")]).await {
            Ok(Some(meetings)) => report.scheduled_meetings = Some(meetings.len()),
            Ok(None) => report
                .errors
                .push("scheduled meetings listing rejected".to_string()),
            Err(e) => report.errors.push(format!("scheduled meetings: {}", e)),
        }

        report
    }

    async fn current_user(&self, token: &AccessToken) -> MeetingResult<ProviderUser> {
        let response = self
            .client
            .get(format!("{}/users/me", self.api_base))
            .bearer_auth(token.secret())
            .send()
            .await?;

        let body = success_body(response, "user lookup").await?;
        Ok(serde_json::from_str(&body)?)
    }
}

#[async_trait]
impl MeetingProvider for ZoomClient {
    async fn create_instant_meeting(&self, topic: &str) -> MeetingResult<InstantMeeting> {
        let token = self.access_token().await?;

        let request_body = json!({
            "topic": topic,
            // Scheduled type starting now; it can be joined immediately
            "type": 2,
            "start_time": Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true),
            "duration": 120,
            "timezone": "UTC",
            "settings": {
                "host_video": true,
                "participant_video": true,
                "join_before_host": true,
                "mute_upon_entry": true,
                "waiting_room": false,
                "audio": "both",
                "auto_recording": "none"
            }
        });

        let response = self
            .client
            .post(format!("{}/users/me/meetings", self.api_base))
            .bearer_auth(token.secret())
            .json(&request_body)
            .send()
            .await?;

        let body = success_body(response, "create meeting").await?;
        let created: CreatedMeeting = serde_json::from_str(&body)?;

        info!("Created Zoom meeting {} ({})", created.id, created.topic);

        Ok(InstantMeeting {
            id: created.id,
            topic: if created.topic.is_empty() {
                topic.to_string()
            } else {
                created.topic
            },
            password: created.password,
            join_url: created.join_url,
            start_url: created.start_url,
        })
    }

    async fn end_meeting(&self, meeting_id: &str) -> MeetingResult<()> {
        let token = self.access_token().await?;

        let response = self
            .client
            .put(format!("{}/meetings/{}/status", self.api_base, meeting_id))
            .bearer_auth(token.secret())
            .json(&json!({ "action": "end" }))
            .send()
            .await?;

        if response.status() == StatusCode::NOT_FOUND {
            debug!("Zoom meeting {} already gone", meeting_id);
            return Ok(());
        }

        success_body(response, "end meeting").await?;
        info!("Ended Zoom meeting {}", meeting_id);
        Ok(())
    }

    async fn end_all_live(&self) -> MeetingResult<usize> {
        let token = self.access_token().await?;

        let Some(live) = self.list_meetings(&token, &[("type", "live")]).await? else {
            return Ok(0);
        };

        info!("Found {} live Zoom meetings to end", live.len());

        let mut ended = 0;
        for meeting in &live {
            match self.end_meeting(&meeting.id).await {
                Ok(()) => ended += 1,
                Err(e) => error!("Failed to end Zoom meeting {}: {}", meeting.id, e),
            }
        }

        Ok(ended)
    }

    async fn live_meeting(&self) -> MeetingResult<Option<ProviderMeetingSnapshot>> {
        let token = self.access_token().await?;

        if let Some(live) = self.list_meetings(&token, &[("type", "live")]).await? {
            if let Some(meeting) = live.into_iter().next() {
                debug!("Found live Zoom meeting {}", meeting.id);
                return Ok(Some(ProviderMeetingSnapshot {
                    id: meeting.id,
                    topic: meeting.topic,
                    password: meeting.password,
                    status: ProviderStatus::Started,
                }));
            }
        }

        // The live listing lags behind; scheduled meetings may already be started
        let scheduled = self
            .list_meetings(
                &token,
                &[("type", "scheduled"), ("page_size", SCHEDULED_PAGE_SIZE)],
            )
            .await?
            .unwrap_or_default();

        debug!("Probing {} scheduled Zoom meetings", scheduled.len());

        for meeting in scheduled {
            let Some(details) = self.meeting_details(&token, &meeting.id).await? else {
                continue;
            };

            if ProviderStatus::from_provider(details.status.as_deref()) == ProviderStatus::Started
            {
                let password = meeting
                    .password
                    .filter(|p| !p.is_empty())
                    .or(details.password);
                return Ok(Some(ProviderMeetingSnapshot {
                    id: meeting.id,
                    topic: meeting.topic,
                    password,
                    status: ProviderStatus::Started,
                }));
            }
        }

        debug!("No live Zoom meetings found");
        Ok(None)
    }

    async fn meeting_status(&self, meeting_id: &str) -> MeetingResult<ProviderStatus> {
        let token = self.access_token().await?;

        Ok(match self.meeting_details(&token, meeting_id).await? {
            Some(details) => ProviderStatus::from_provider(details.status.as_deref()),
            None => ProviderStatus::NotFound,
        })
    }
}

/// Response body of a successful call, or the provider's error text.
async fn success_body(response: reqwest::Response, action: &str) -> MeetingResult<String> {
    let status = response.status();
    let body = response.text().await?;

    if !status.is_success() {
        error!("Zoom {} failed with status {}: {}", action, status, body);
        return Err(MeetingError::Provider {
            status: status.as_u16(),
            body,
        });
    }

    Ok(body)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        extract::{Path, Query, State},
        http::{HeaderMap, StatusCode},
        response::{IntoResponse, Response},
        routing::{get, post, put},
        Json, Router,
    };
    use serde_json::Value;
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    #[derive(Clone)]
    struct FakeZoom {
        token_requests: Arc<AtomicUsize>,
        expires_in: i64,
        live: Arc<Mutex<Vec<Value>>>,
        live_listing_status: u16,
        scheduled: Arc<Mutex<Vec<Value>>>,
        details: Arc<Mutex<HashMap<String, Value>>>,
        end_statuses: Arc<Mutex<HashMap<String, u16>>>,
        ended: Arc<Mutex<Vec<String>>>,
        create_failure: Option<(u16, String)>,
        created_topics: Arc<Mutex<Vec<Value>>>,
    }

    impl Default for FakeZoom {
        fn default() -> Self {
            Self {
                token_requests: Arc::default(),
                expires_in: 3600,
                live: Arc::default(),
                live_listing_status: 200,
                scheduled: Arc::default(),
                details: Arc::default(),
                end_statuses: Arc::default(),
                ended: Arc::default(),
                create_failure: None,
                created_topics: Arc::default(),
            }
        }
    }

    fn authorized(headers: &HeaderMap) -> bool {
        headers
            .get("authorization")
            .and_then(|v| v.to_str().ok())
            .is_some_and(|v| v.starts_with("Bearer tok-"))
    }

    async fn token(State(fake): State<FakeZoom>, headers: HeaderMap) -> Response {
        let expected = format!("Basic {}", STANDARD.encode("cid:secret"));
        if headers.get("authorization").and_then(|v| v.to_str().ok()) != Some(expected.as_str())
        {
            return (StatusCode::UNAUTHORIZED, "invalid client").into_response();
        }
        let n = fake.token_requests.fetch_add(1, Ordering::SeqCst) + 1;
        Json(json!({
            "access_token": format!("tok-{}", n),
            "token_type": "bearer",
            "expires_in": fake.expires_in,
        }))
        .into_response()
    }

    async fn list(
        State(fake): State<FakeZoom>,
        Query(params): Query<HashMap<String, String>>,
        headers: HeaderMap,
    ) -> Response {
        if !authorized(&headers) {
            return StatusCode::UNAUTHORIZED.into_response();
        }
        match params.get("type").map(String::as_str) {
            Some("live") if fake.live_listing_status != 200 => (
                StatusCode::from_u16(fake.live_listing_status).unwrap(),
                "listing unavailable",
            )
                .into_response(),
            Some("live") => {
                Json(json!({ "meetings": fake.live.lock().unwrap().clone() })).into_response()
            }
            Some("scheduled") => {
                Json(json!({ "meetings": fake.scheduled.lock().unwrap().clone() })).into_response()
            }
            _ => StatusCode::BAD_REQUEST.into_response(),
        }
    }

    async fn details(State(fake): State<FakeZoom>, Path(id): Path<String>) -> Response {
        match fake.details.lock().unwrap().get(&id) {
            Some(details) => Json(details.clone()).into_response(),
            None => (StatusCode::NOT_FOUND, "Meeting does not exist").into_response(),
        }
    }

    async fn end(State(fake): State<FakeZoom>, Path(id): Path<String>) -> Response {
        let status = fake
            .end_statuses
            .lock()
            .unwrap()
            .get(&id)
            .copied()
            .unwrap_or(204);
        if status < 300 {
            fake.ended.lock().unwrap().push(id);
        }
        (StatusCode::from_u16(status).unwrap(), "").into_response()
    }

    async fn create(State(fake): State<FakeZoom>, Json(body): Json<Value>) -> Response {
        if let Some((status, message)) = &fake.create_failure {
            return (StatusCode::from_u16(*status).unwrap(), message.clone()).into_response();
        }
        fake.created_topics.lock().unwrap().push(body.clone());
        (
            StatusCode::CREATED,
            Json(json!({
                "id": 85746352901u64,
                "topic": body["topic"],
                "password": "pw",
                "join_url": "https://zoom.us/j/85746352901",
                "start_url": "https://zoom.us/s/85746352901",
            })),
        )
            .into_response()
    }

    async fn me() -> Json<Value> {
        Json(json!({ "id": "u1", "email": "host@example.com", "display_name": "Host" }))
    }

    async fn spawn(fake: FakeZoom) -> String {
        let app = Router::new()
            .route("/oauth/token", post(token))
            .route("/users/me", get(me))
            .route("/users/me/meetings", get(list).post(create))
            .route("/meetings/:id", get(details))
            .route("/meetings/:id/status", put(end))
            .with_state(fake);

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{}", addr)
    }

    fn config(base: &str) -> ZoomConfig {
        ZoomConfig {
            account_id: Some("acc".to_string()),
            client_id: Some("cid".to_string()),
            client_secret: Some("secret".to_string()),
            api_base: base.to_string(),
            oauth_base: base.to_string(),
        }
    }

    async fn client_for(fake: &FakeZoom) -> ZoomClient {
        let base = spawn(fake.clone()).await;
        ZoomClient::new(&config(&base))
    }

    #[tokio::test]
    async fn test_token_is_cached_between_calls() {
        let fake = FakeZoom::default();
        let client = client_for(&fake).await;

        client.live_meeting().await.unwrap();
        client.live_meeting().await.unwrap();

        assert_eq!(fake.token_requests.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_token_inside_refresh_margin_is_refetched() {
        let fake = FakeZoom {
            expires_in: 200,
            ..FakeZoom::default()
        };
        let client = client_for(&fake).await;

        client.access_token().await.unwrap();
        let second = client.access_token().await.unwrap();

        assert_eq!(fake.token_requests.load(Ordering::SeqCst), 2);
        assert_eq!(second.secret(), "tok-2");
    }

    #[tokio::test]
    async fn test_missing_credentials_are_unconfigured() {
        let fake = FakeZoom::default();
        let base = spawn(fake.clone()).await;
        let mut config = config(&base);
        config.client_secret = None;
        let client = ZoomClient::new(&config);

        let err = client.live_meeting().await.unwrap_err();

        assert!(matches!(err, MeetingError::Unconfigured(_)));
        assert_eq!(fake.token_requests.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_rejected_token_request_is_a_provider_error() {
        let fake = FakeZoom::default();
        let base = spawn(fake.clone()).await;
        let mut config = config(&base);
        config.client_secret = Some("wrong".to_string());
        let client = ZoomClient::new(&config);

        let err = client.access_token().await.unwrap_err();

        match err {
            MeetingError::Provider { status, body } => {
                assert_eq!(status, 401);
                assert_eq!(body, "invalid client");
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_live_listing_returns_first_meeting() {
        let fake = FakeZoom::default();
        *fake.live.lock().unwrap() = vec![
            json!({ "id": 111, "topic": "Daily Sync" }),
            json!({ "id": 222, "topic": "Other", "password": "x" }),
        ];
        let client = client_for(&fake).await;

        let live = client.live_meeting().await.unwrap().unwrap();

        assert_eq!(live.id, "111");
        assert_eq!(live.topic, "Daily Sync");
        assert_eq!(live.password, None);
        assert_eq!(live.status, ProviderStatus::Started);
    }

    #[tokio::test]
    async fn test_falls_back_to_probing_scheduled_meetings() {
        let fake = FakeZoom::default();
        *fake.scheduled.lock().unwrap() = vec![
            json!({ "id": 1, "topic": "Later" }),
            json!({ "id": 2, "topic": "Now" }),
            json!({ "id": 3, "topic": "Also now" }),
        ];
        {
            let mut details = fake.details.lock().unwrap();
            details.insert("1".to_string(), json!({ "status": "waiting" }));
            details.insert("2".to_string(), json!({ "status": "started", "password": "pw2" }));
            details.insert("3".to_string(), json!({ "status": "started" }));
        }
        let client = client_for(&fake).await;

        let live = client.live_meeting().await.unwrap().unwrap();

        assert_eq!(live.id, "2");
        assert_eq!(live.topic, "Now");
        assert_eq!(live.password.as_deref(), Some("pw2"));
    }

    #[tokio::test]
    async fn test_failed_live_listing_still_checks_scheduled() {
        let fake = FakeZoom {
            live_listing_status: 500,
            ..FakeZoom::default()
        };
        *fake.scheduled.lock().unwrap() = vec![json!({ "id": "9", "topic": "Fallback" })];
        fake.details
            .lock()
            .unwrap()
            .insert("9".to_string(), json!({ "status": "started" }));
        let client = client_for(&fake).await;

        let live = client.live_meeting().await.unwrap().unwrap();
        assert_eq!(live.id, "9");
    }

    #[tokio::test]
    async fn test_nothing_live_is_none() {
        let fake = FakeZoom::default();
        *fake.scheduled.lock().unwrap() = vec![json!({ "id": 1, "topic": "Later" })];
        let client = client_for(&fake).await;

        assert!(client.live_meeting().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_end_meeting_treats_not_found_as_success() {
        let fake = FakeZoom::default();
        fake.end_statuses
            .lock()
            .unwrap()
            .insert("111".to_string(), 404);
        let client = client_for(&fake).await;

        client.end_meeting("111").await.unwrap();
        client.end_meeting("111").await.unwrap();
    }

    #[tokio::test]
    async fn test_end_meeting_failure_carries_status() {
        let fake = FakeZoom::default();
        fake.end_statuses
            .lock()
            .unwrap()
            .insert("111".to_string(), 500);
        let client = client_for(&fake).await;

        let err = client.end_meeting("111").await.unwrap_err();
        assert!(matches!(err, MeetingError::Provider { status: 500, .. }));
    }

    #[tokio::test]
    async fn test_end_all_live_continues_past_failures() {
        let fake = FakeZoom::default();
        *fake.live.lock().unwrap() = vec![
            json!({ "id": 1, "topic": "a" }),
            json!({ "id": 2, "topic": "b" }),
            json!({ "id": 3, "topic": "c" }),
        ];
        fake.end_statuses.lock().unwrap().insert("2".to_string(), 500);
        let client = client_for(&fake).await;

        let ended = client.end_all_live().await.unwrap();

        assert_eq!(ended, 2);
        assert_eq!(*fake.ended.lock().unwrap(), vec!["1", "3"]);
    }

    #[tokio::test]
    async fn test_create_instant_meeting() {
        let fake = FakeZoom::default();
        let client = client_for(&fake).await;

        let meeting = client.create_instant_meeting("Daily Sync").await.unwrap();

        assert_eq!(meeting.id, "85746352901");
        assert_eq!(meeting.topic, "Daily Sync");
        assert_eq!(meeting.password, "pw");
        assert_eq!(meeting.join_url, "https://zoom.us/j/85746352901");

        let sent = fake.created_topics.lock().unwrap()[0].clone();
        assert_eq!(sent["settings"]["join_before_host"], json!(true));
        assert_eq!(sent["settings"]["mute_upon_entry"], json!(true));
        assert_eq!(sent["settings"]["waiting_room"], json!(false));
    }

    #[tokio::test]
    async fn test_create_failure_carries_provider_text() {
        let fake = FakeZoom {
            create_failure: Some((400, r#"{"code":300,"message":"bad topic"}"#.to_string())),
            ..FakeZoom::default()
        };
        let client = client_for(&fake).await;

        let err = client.create_instant_meeting("x").await.unwrap_err();
        match err {
            MeetingError::Provider { status, body } => {
                assert_eq!(status, 400);
                assert!(body.contains("bad topic"));
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_meeting_status() {
        let fake = FakeZoom::default();
        fake.details
            .lock()
            .unwrap()
            .insert("1".to_string(), json!({ "status": "started" }));
        fake.details
            .lock()
            .unwrap()
            .insert("2".to_string(), json!({ "topic": "no status" }));
        let client = client_for(&fake).await;

        assert_eq!(
            client.meeting_status("1").await.unwrap(),
            ProviderStatus::Started
        );
        assert_eq!(
            client.meeting_status("2").await.unwrap(),
            ProviderStatus::Waiting
        );
        assert_eq!(
            client.meeting_status("3").await.unwrap(),
            ProviderStatus::NotFound
        );
    }

    #[tokio::test]
    async fn test_diagnose_reports_account_state() {
        let fake = FakeZoom::default();
        *fake.live.lock().unwrap() = vec![json!({ "id": 1, "topic": "a" })];
        let client = client_for(&fake).await;

        let report = client.diagnose().await;

        assert!(report.credentials.has_account_id);
        assert_eq!(report.token_status, "success");
        assert_eq!(
            report.user.and_then(|u| u.email).as_deref(),
            Some("host@example.com")
        );
        assert_eq!(report.live_meetings, Some(1));
        assert_eq!(report.scheduled_meetings, Some(0));
        assert!(report.errors.is_empty());
    }

    #[tokio::test]
    async fn test_diagnose_without_credentials() {
        let client = ZoomClient::new(&ZoomConfig::default());

        let report = client.diagnose().await;

        assert!(!report.credentials.has_client_id);
        assert_eq!(report.token_status, "not_attempted");
        assert!(report.user.is_none());
    }
}
