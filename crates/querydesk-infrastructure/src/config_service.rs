//! Configuration service implementation.
//!
//! Loads the [`ClientConfig`] from the configuration file
//! (`~/.config/querydesk/config.toml`).

use crate::paths::QueryDeskPaths;
use querydesk_core::config::ClientConfig;
use querydesk_core::error::{QueryDeskError, Result};
use std::fs;
use std::path::{Path, PathBuf};

/// Reads the client configuration from a TOML file.
#[derive(Debug, Clone)]
pub struct ConfigService {
    path: PathBuf,
}

impl ConfigService {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Uses the default configuration file location.
    pub fn default_location() -> Result<Self> {
        let path = QueryDeskPaths::config_file().map_err(|e| QueryDeskError::config(e.to_string()))?;
        Ok(Self::new(path))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Loads the configuration.
    ///
    /// A missing file yields the defaults. A file that exists but does not parse
    /// is an error.
    pub fn load(&self) -> Result<ClientConfig> {
        if !self.path.exists() {
            tracing::debug!(
                "No config file at {}, using defaults",
                self.path.display()
            );
            return Ok(ClientConfig::default());
        }

        let content = fs::read_to_string(&self.path)?;
        let config: ClientConfig = toml::from_str(&content).map_err(|e| {
            QueryDeskError::config(format!("Invalid {}: {}", self.path.display(), e))
        })?;
        tracing::debug!("Loaded config from {}", self.path.display());
        Ok(config)
    }
}
