//! Server configuration types.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Top-level server configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Interface the HTTP listener binds to.
    #[serde(default = "default_host")]
    pub host: String,

    /// Port the HTTP listener binds to.
    #[serde(default = "default_port")]
    pub port: u16,

    /// Path to the presence CSV log.
    #[serde(default = "default_data_csv")]
    pub data_csv: PathBuf,

    /// Path to the user directory document.
    #[serde(default = "default_users_file")]
    pub users_file: PathBuf,

    /// Seconds a parsed dataset stays fresh before a request re-reads it.
    #[serde(default = "default_cache_ttl")]
    pub cache_ttl_secs: u64,
}

// ── Defaults ──────────────────────────────────────────────────────────

fn default_host() -> String {
    "127.0.0.1".into()
}

fn default_port() -> u16 {
    5000
}

fn default_data_csv() -> PathBuf {
    "data/sample_data.csv".into()
}

fn default_users_file() -> PathBuf {
    "data/users.toml".into()
}

fn default_cache_ttl() -> u64 {
    600
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            data_csv: default_data_csv(),
            users_file: default_users_file(),
            cache_ttl_secs: default_cache_ttl(),
        }
    }
}
