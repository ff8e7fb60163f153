use crate::admin::AllowList;
use crate::api::{ApiServer, AppState};
use crate::config::Config;
use crate::db::{MeetingStore, SqliteMeetingStore};
use crate::live::MeetingService;
use crate::provider::ZoomClient;
use anyhow::Result;
use std::sync::Arc;
use tracing::{info, warn};

/// The wired-up service plus the concrete Zoom client for diagnostics.
pub struct Components {
    pub service: Arc<MeetingService>,
    pub zoom: Arc<ZoomClient>,
}

pub fn build_components(config: &Config) -> Components {
    let zoom = Arc::new(ZoomClient::new(&config.zoom));

    let admins = AllowList::new(&config.admin.usernames);
    if admins.is_empty() {
        warn!("No admin usernames configured; start/end and record changes are disabled");
    }

    let service = MeetingService::new(zoom.clone(), open_store(config), Arc::new(admins))
        .with_default_title(config.meetings.default_title.clone())
        .with_store_trust(config.meetings.store_trust_window());

    Components {
        service: Arc::new(service),
        zoom,
    }
}

/// The store is optional; any failure here leaves the service in degraded mode.
fn open_store(config: &Config) -> Option<Arc<dyn MeetingStore>> {
    if !config.database.enabled {
        info!("Meeting store disabled, running from the provider only");
        return None;
    }

    let opened = config
        .database
        .resolved_path()
        .and_then(|path| SqliteMeetingStore::open(&path).map(|store| (path, store)));

    match opened {
        Ok((path, store)) => {
            info!("Meeting store at {}", path.display());
            Some(Arc::new(store))
        }
        Err(e) => {
            warn!(
                "Failed to open meeting store, running from the provider only: {:#}",
                e
            );
            None
        }
    }
}

pub async fn run_service() -> Result<()> {
    info!("Starting meetbridge service");

    let config = Config::load()?;
    let components = build_components(&config);

    let state = AppState::new(components.service, config.server.identity_header.clone())
        .with_zoom(components.zoom);
    let server = ApiServer::new(config.server.host.clone(), config.server.port, state);

    info!("meetbridge is ready!");
    info!(
        "Try: curl http://{}:{}/zoom/live-meeting",
        config.server.host, config.server.port
    );

    server.start().await
}
