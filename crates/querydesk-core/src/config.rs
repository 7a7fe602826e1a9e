use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Default backend address of a locally running analytics server.
pub const DEFAULT_BACKEND_URL: &str = "http://127.0.0.1:8000";

/// Default per-request timeout in seconds.
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 60;

/// Client settings, read from `config.toml`.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct ClientConfig {
    /// Base URL of the analytics backend.
    pub backend_url: String,
    pub request_timeout_secs: u64,
    /// Overrides where the session blobs are stored.
    pub data_dir: Option<PathBuf>,
    /// Directory spreadsheet exports are written to (current directory if unset).
    pub export_dir: Option<PathBuf>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            backend_url: DEFAULT_BACKEND_URL.to_string(),
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
            data_dir: None,
            export_dir: None,
        }
    }
}
