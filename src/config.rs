use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid config {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Host settings for the tally.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct TallyConfig {
    /// Root for persisted state; activity files live in `activitydata/` below it.
    pub data_dir: PathBuf,
    /// Commander profile lookups are skipped without a key.
    pub inara_api_key: Option<String>,
    pub inara_endpoint: String,
    pub app_name: String,
    pub app_version: String,
    /// Per-request timeout for background lookups, in seconds.
    pub request_timeout: u64,
    /// Target log entries older than this are dropped on load.
    pub target_log_expiry_days: i64,
}

impl Default for TallyConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("."),
            inara_api_key: None,
            inara_endpoint: "https://inara.cz/inapi/v1/".to_string(),
            app_name: env!("CARGO_PKG_NAME").to_string(),
            app_version: env!("CARGO_PKG_VERSION").to_string(),
            request_timeout: 10,
            target_log_expiry_days: 90,
        }
    }
}

impl TallyConfig {
    /// Read a JSON config file. Missing keys take their defaults.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&raw).map_err(|source| ConfigError::Json {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn activity_dir(&self) -> PathBuf {
        self.data_dir.join("activitydata")
    }

    pub fn mission_log_path(&self) -> PathBuf {
        self.data_dir.join("missionlog.json")
    }

    pub fn target_log_path(&self) -> PathBuf {
        self.data_dir.join("targetlog.json")
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout)
    }
}
