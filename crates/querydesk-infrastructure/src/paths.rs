//! Unified path management for querydesk files.
//!
//! # Directory Structure
//!
//! ```text
//! ~/.config/querydesk/          # Config directory
//! ├── config.toml               # Client configuration
//! └── logs/                     # Application logs
//!     └── querydesk.log.YYYY-MM-DD
//!
//! ~/.local/share/querydesk/     # Data directory
//! ├── chats.json                # Thread collection
//! └── titles.json               # Thread titles
//! ```

use std::path::{Path, PathBuf};

const APP_DIR_NAME: &str = "querydesk";

/// Errors that can occur during path resolution.
#[derive(Debug)]
pub enum PathError {
    /// Home directory could not be determined.
    HomeDirNotFound,
}

impl std::fmt::Display for PathError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PathError::HomeDirNotFound => write!(f, "Cannot find home directory"),
        }
    }
}

impl std::error::Error for PathError {}

/// Unified path management for querydesk.
pub struct QueryDeskPaths;

impl QueryDeskPaths {
    /// Returns the querydesk configuration directory (e.g., `~/.config/querydesk/`).
    pub fn config_dir() -> Result<PathBuf, PathError> {
        dirs::config_dir()
            .map(|dir| dir.join(APP_DIR_NAME))
            .ok_or(PathError::HomeDirNotFound)
    }

    /// Returns the querydesk data directory (e.g., `~/.local/share/querydesk/`).
    pub fn data_dir() -> Result<PathBuf, PathError> {
        dirs::data_dir()
            .map(|dir| dir.join(APP_DIR_NAME))
            .ok_or(PathError::HomeDirNotFound)
    }

    /// Returns the path to the main configuration file.
    pub fn config_file() -> Result<PathBuf, PathError> {
        Ok(Self::config_dir()?.join("config.toml"))
    }

    /// Returns the path to the logs directory.
    pub fn logs_dir() -> Result<PathBuf, PathError> {
        Ok(Self::config_dir()?.join("logs"))
    }

    /// Thread collection blob inside `data_dir`.
    pub fn chats_file(data_dir: &Path) -> PathBuf {
        data_dir.join("chats.json")
    }

    /// Title list blob inside `data_dir`.
    pub fn titles_file(data_dir: &Path) -> PathBuf {
        data_dir.join("titles.json")
    }
}
