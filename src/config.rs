//! Configuration loader — merges env vars, .env file, and config.toml.

use std::path::Path;

use common::{Error, ServerConfig};

fn validate_config(config: &ServerConfig) -> Result<(), Error> {
    let mut issues: Vec<String> = Vec::new();

    if config.host.trim().is_empty() {
        issues.push("host must not be empty".into());
    }
    if config.port == 0 {
        issues.push("port must be > 0".into());
    }
    if config.data_csv.as_os_str().is_empty() {
        issues.push("data_csv must point at the presence log".into());
    }
    if config.users_file.as_os_str().is_empty() {
        issues.push("users_file must point at the directory document".into());
    }

    if issues.is_empty() {
        Ok(())
    } else {
        Err(Error::Config(format!(
            "Invalid config:\n - {}",
            issues.join("\n - ")
        )))
    }
}

/// Load server configuration from environment and an optional config file.
pub fn load_config(config_path: &Path) -> Result<ServerConfig, Error> {
    // 1. Load .env file if present.
    if let Err(e) = dotenvy::dotenv() {
        tracing::debug!("No .env file loaded: {}", e);
    }

    // 2. Start with defaults.
    let mut config = ServerConfig::default();

    // 3. Try loading the config file if it exists.
    if config_path.exists() {
        let contents = std::fs::read_to_string(config_path).map_err(|e| {
            Error::Config(format!("Failed to read {}: {}", config_path.display(), e))
        })?;
        config = toml::from_str(&contents).map_err(|e| {
            Error::Config(format!("Failed to parse {}: {}", config_path.display(), e))
        })?;
    }

    // 4. Override with environment variables (highest priority).
    if let Ok(host) = std::env::var("PRESENCE_HOST") {
        config.host = host;
    }
    if let Ok(port) = std::env::var("PRESENCE_PORT") {
        config.port = port
            .trim()
            .parse::<u16>()
            .map_err(|_| Error::Config("PRESENCE_PORT must be a port number".into()))?;
    }
    if let Ok(path) = std::env::var("PRESENCE_DATA_CSV") {
        config.data_csv = path.into();
    }
    if let Ok(path) = std::env::var("PRESENCE_USERS_FILE") {
        config.users_file = path.into();
    }
    if let Ok(ttl) = std::env::var("PRESENCE_CACHE_TTL_SECS") {
        config.cache_ttl_secs = ttl.trim().parse::<u64>().map_err(|_| {
            Error::Config("PRESENCE_CACHE_TTL_SECS must be an integer >= 0".into())
        })?;
    }

    // 5. Validate.
    validate_config(&config)?;

    Ok(config)
}
