use crate::global;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::info;

#[derive(Debug, Default, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub server: ServerConfig,
    pub zoom: ZoomConfig,
    pub database: DatabaseConfig,
    pub admin: AdminConfig,
    pub meetings: MeetingsConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Request header carrying the caller identity asserted by the embedding host.
    pub identity_header: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ZoomConfig {
    pub account_id: Option<String>,
    pub client_id: Option<String>,
    pub client_secret: Option<String>,
    pub api_base: String,
    pub oauth_base: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    pub enabled: bool,
    /// Defaults to `<data_dir>/meetbridge/meetbridge.db`
    pub path: Option<PathBuf>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AdminConfig {
    pub usernames: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MeetingsConfig {
    /// Base of the generated title, suffixed with today's date.
    pub default_title: String,
    /// How long a stored live record is trusted before the provider is asked again.
    pub store_trust_seconds: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 3737,
            identity_header: "x-whop-username".to_string(),
        }
    }
}

impl Default for ZoomConfig {
    fn default() -> Self {
        Self {
            account_id: None,
            client_id: None,
            client_secret: None,
            api_base: "https://api.zoom.us/v2".to_string(),
            oauth_base: "https://zoom.us".to_string(),
        }
    }
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            path: None,
        }
    }
}

impl Default for MeetingsConfig {
    fn default() -> Self {
        Self {
            default_title: "Livestream".to_string(),
            store_trust_seconds: 30,
        }
    }
}

impl ZoomConfig {
    pub fn has_credentials(&self) -> bool {
        [&self.account_id, &self.client_id, &self.client_secret]
            .iter()
            .all(|v| v.as_deref().is_some_and(|s| !s.trim().is_empty()))
    }
}

impl DatabaseConfig {
    pub fn resolved_path(&self) -> Result<PathBuf> {
        match &self.path {
            Some(path) => Ok(path.clone()),
            None => global::db_file(),
        }
    }
}

impl MeetingsConfig {
    pub fn store_trust_window(&self) -> Duration {
        Duration::from_secs(self.store_trust_seconds)
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path()?;
        let mut config = Self::load_from(&config_path)?;
        config.apply_env_overrides(|key| std::env::var(key).ok());
        Ok(config)
    }

    /// Load from an explicit path, writing defaults there if nothing exists yet.
    pub fn load_from(config_path: &Path) -> Result<Self> {
        if !config_path.exists() {
            info!(
                "Config file not found, creating default at {:?}",
                config_path
            );
            let config = Self::default();
            config.save_to(config_path)?;
            return Ok(config);
        }

        let content =
            std::fs::read_to_string(config_path).context("Failed to read config file")?;

        let config: Self = toml::from_str(&content).context("Failed to parse config file")?;

        info!("Loaded config from {:?}", config_path);
        Ok(config)
    }

    pub fn save_to(&self, config_path: &Path) -> Result<()> {
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent).context("Failed to create config directory")?;
        }

        let content = toml::to_string_pretty(self).context("Failed to serialize config")?;

        std::fs::write(config_path, content).context("Failed to write config file")?;

        Ok(())
    }

    /// Deployment secrets usually arrive through the environment rather than the file.
    pub fn apply_env_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(v) = non_empty("ZOOM_ACCOUNT_ID") {
            self.zoom.account_id = Some(v);
        }
        if let Some(v) = non_empty("ZOOM_CLIENT_ID") {
            self.zoom.client_id = Some(v);
        }
        if let Some(v) = non_empty("ZOOM_CLIENT_SECRET") {
            self.zoom.client_secret = Some(v);
        }
        if let Some(v) = non_empty("DEFAULT_MEETING_TITLE") {
            self.meetings.default_title = v;
        }
        if let Some(v) = non_empty("MEETBRIDGE_ADMINS") {
            self.admin.usernames = v
                .split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(String::from)
                .collect();
        }
    }

    fn config_path() -> Result<PathBuf> {
        global::config_file()
    }
}
