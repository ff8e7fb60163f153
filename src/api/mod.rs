//! REST API server for meetbridge.
//!
//! Provides HTTP endpoints for:
//! - Live meeting query, start and end
//! - Meeting record management
//! - Provider diagnostics

pub mod error;
pub mod routes;

use anyhow::Result;
use axum::{response::Json, routing::get, Router};
use serde_json::{json, Value};
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;
use tracing::info;

pub use routes::AppState;

pub struct ApiServer {
    host: String,
    port: u16,
    state: AppState,
}

impl ApiServer {
    pub fn new(host: impl Into<String>, port: u16, state: AppState) -> Self {
        Self {
            host: host.into(),
            port,
            state,
        }
    }

    pub async fn start(self) -> Result<()> {
        let app = router(self.state);
        let addr = format!("{}:{}", self.host, self.port);
        let listener = tokio::net::TcpListener::bind(&addr).await?;

        info!("API server listening on http://{}", addr);
        info!("Endpoints:");
        info!("  GET    /                          - Service info");
        info!("  GET    /version                   - Get version info");
        info!("  GET    /zoom/live-meeting         - Current live meeting");
        info!("  POST   /zoom/create-meeting       - Start a meeting (admin)");
        info!("  POST   /zoom/end-meeting          - End a meeting (admin)");
        info!("  GET    /zoom/meetings/:id/status  - Provider status of a meeting");
        info!("  GET    /zoom/debug                - Provider diagnostics");
        info!("  GET    /meetings                  - List meeting records");
        info!("  POST   /meetings                  - Create a meeting record (admin)");
        info!("  GET    /meetings/:id              - Get a meeting record");
        info!("  PATCH  /meetings/:id              - Update a meeting record (admin)");
        info!("  DELETE /meetings/:id              - Delete a meeting record (admin)");

        axum::serve(listener, app).await?;

        Ok(())
    }
}

/// Full application router. Split out so it can be driven without a socket.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(status))
        .route("/version", get(version))
        .merge(routes::live::router())
        .merge(routes::meetings::router())
        .with_state(state)
        .layer(ServiceBuilder::new().layer(TraceLayer::new_for_http()))
}

async fn status() -> Json<Value> {
    Json(json!({
        "service": "meetbridge",
        "version": env!("CARGO_PKG_VERSION"),
        "status": "running"
    }))
}

async fn version() -> Json<Value> {
    Json(json!({
        "version": env!("CARGO_PKG_VERSION"),
        "name": "meetbridge"
    }))
}
