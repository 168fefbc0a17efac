use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Process settings for the CLI.
///
/// The Tube Archivist URL and token are not settings: they live in the
/// cache's config table (see [`crate::api::ApiConfig`]).
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Settings {
    #[serde(default)]
    pub database: DatabaseSettings,
    #[serde(default)]
    pub http: HttpSettings,
    #[serde(default)]
    pub redownload: RedownloadSettings,
}

/// Local cache database
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DatabaseSettings {
    #[serde(default = "default_db_path")]
    pub path: PathBuf,
}

impl Default for DatabaseSettings {
    fn default() -> Self {
        Self {
            path: default_db_path(),
        }
    }
}

fn default_db_path() -> PathBuf {
    PathBuf::from("tubearchive.sqlite")
}

/// HTTP client behaviour
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct HttpSettings {
    /// Per-request timeout in seconds (default: 30)
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
    /// Skip TLS certificate validation (default: true, for self-signed instances)
    #[serde(default = "default_accept_invalid_certs")]
    pub accept_invalid_certs: bool,
}

impl Default for HttpSettings {
    fn default() -> Self {
        Self {
            timeout_secs: default_timeout(),
            accept_invalid_certs: default_accept_invalid_certs(),
        }
    }
}

fn default_timeout() -> u64 {
    30
}

fn default_accept_invalid_certs() -> bool {
    true
}

/// Pacing of redownload requests
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RedownloadSettings {
    /// Max redownload requests per minute (default: 120, one every 0.5s)
    #[serde(default = "default_requests_per_minute")]
    pub requests_per_minute: u32,
}

impl Default for RedownloadSettings {
    fn default() -> Self {
        Self {
            requests_per_minute: default_requests_per_minute(),
        }
    }
}

fn default_requests_per_minute() -> u32 {
    120
}
