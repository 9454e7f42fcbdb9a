use serde::Deserialize;
use std::{fs, path::Path};

use crate::errors::ConfigError;

#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct AppConfig {
    /// HTTP port to listen on.
    pub port: u16,

    /// Log level for tracing (e.g. "info", "debug").
    pub log_level: String,

    /// Path to the word database snapshot file.
    pub snapshot_path: String,

    /// Interval (seconds) between automatic snapshot saves.
    pub snapshot_interval: u64,

    pub server_version: String,

    /// Global retention window (seconds).
    ///
    /// If set, words older than this are removed:
    /// - On startup when loading the snapshot
    /// - Periodically by a cleanup loop (see `cleanup_interval`)
    ///
    /// If `None`, words never expire.
    pub retention_seconds: Option<u64>,

    /// How often (seconds) to run the cleanup loop.
    pub cleanup_interval: Option<u64>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            port: 8080,
            log_level: "info".to_string(),
            snapshot_path: "db/words.json".to_string(),
            snapshot_interval: 10,
            server_version: env!("CARGO_PKG_VERSION").to_string(),
            retention_seconds: None,
            cleanup_interval: Some(10),
        }
    }
}

impl AppConfig {
    pub fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let file = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;

        Self::from_json(&file).map_err(|source| ConfigError::Json {
            path: path.display().to_string(),
            source,
        })
    }

    pub fn from_json(text: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(text)
    }
}
