//! Client configuration
//!
//! A [`ClientConfig`] fixes the remote store address and the cache freshness window
//! for the lifetime of a client. The command-line tool can also read one from a
//! JSON file (`~/.config/rcfg/config.json` on Linux):
//!
//! ```json
//! { "url": "http://config.internal:8080", "cache_for_secs": 30, "timeout_secs": 5 }
//! ```

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;

use directories::ProjectDirs;
use serde::Deserialize;
use thiserror::Error;

/// Base URL used when none is configured
pub const DEFAULT_BASE_URL: &str = "http://localhost:8080";

/// Freshness window used when none is configured
pub const DEFAULT_FRESHNESS_WINDOW: Duration = Duration::from_secs(30);

/// Errors that can occur when loading configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The config file could not be read
    #[error("Failed to read config file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The config file is not valid JSON or has unexpected fields
    #[error("Failed to parse config file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Settings a client is constructed with
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Root address of the remote store
    pub base_url: String,
    /// How long a fetched value is served without refetching
    pub freshness_window: Duration,
    /// Deadline for each request; `None` leaves the transport default
    pub request_timeout: Option<Duration>,
}

impl ClientConfig {
    pub fn new(base_url: impl Into<String>, freshness_window: Duration) -> Self {
        Self {
            base_url: base_url.into(),
            freshness_window,
            request_timeout: None,
        }
    }

    /// Sets the per-request timeout
    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = Some(timeout);
        self
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::new(DEFAULT_BASE_URL, DEFAULT_FRESHNESS_WINDOW)
    }
}

/// On-disk configuration; every field is optional
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConfigFile {
    pub url: Option<String>,
    pub cache_for_secs: Option<u64>,
    pub timeout_secs: Option<u64>,
}

impl ConfigFile {
    /// XDG-compliant location of the config file
    ///
    /// Returns `None` if no home directory can be determined.
    pub fn default_path() -> Option<PathBuf> {
        let project_dirs = ProjectDirs::from("", "", "rcfg")?;
        Some(project_dirs.config_dir().join("config.json"))
    }

    /// Reads and parses a config file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        serde_json::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Like [`load`](Self::load), but a missing file yields `Ok(None)`
    pub fn load_if_exists(path: &Path) -> Result<Option<Self>, ConfigError> {
        match Self::load(path) {
            Ok(file) => Ok(Some(file)),
            Err(ConfigError::Io { source, .. }) if source.kind() == io::ErrorKind::NotFound => {
                Ok(None)
            }
            Err(e) => Err(e),
        }
    }

    /// Overlays the values present in the file onto `config`
    pub fn apply(&self, mut config: ClientConfig) -> ClientConfig {
        if let Some(url) = &self.url {
            config.base_url = url.clone();
        }
        if let Some(secs) = self.cache_for_secs {
            config.freshness_window = Duration::from_secs(secs);
        }
        if let Some(secs) = self.timeout_secs {
            config = config.with_request_timeout(Duration::from_secs(secs));
        }
        config
    }
}
