//! Presence server binary.
//!
//! Single-binary Tokio application that:
//! 1. Loads configuration (defaults, config.toml, PRESENCE_* env vars)
//! 2. Wires the TTL-cached presence pipeline and the user directory
//! 3. Serves the JSON API and chart pages over HTTP

use std::path::PathBuf;
use std::process;

use clap::Parser;
use tracing::{error, info};

use presence_server::config::load_config;
use presence_server::http;
use presence_server::state::AppState;

/// Workday presence statistics server
#[derive(Parser)]
#[command(name = "presence-server", about = "Workday presence statistics server")]
struct Cli {
    /// Path to the configuration file.
    #[arg(long, default_value = "config.toml")]
    config: PathBuf,

    /// Parse the presence log once, print a summary, then exit.
    #[arg(long)]
    check_data: bool,
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "presence_server=info,timesheet=info,directory=info".into()),
        )
        .with_target(true)
        .init();

    let cli = Cli::parse();

    info!("📊 Presence server starting up...");

    let cfg = match load_config(&cli.config) {
        Ok(cfg) => cfg,
        Err(e) => {
            error!("Configuration error: {}", e);
            process::exit(1);
        }
    };

    info!("Presence log: {}", cfg.data_csv.display());
    info!("User directory: {}", cfg.users_file.display());
    info!("Cache TTL: {}s", cfg.cache_ttl_secs);

    if cli.check_data {
        match timesheet::parser::load(&cfg.data_csv) {
            Ok(dataset) => {
                let days: usize = dataset.values().map(|days| days.len()).sum();
                info!(
                    "Presence log OK: {} users, {} logged days",
                    dataset.len(),
                    days
                );
                return;
            }
            Err(e) => {
                error!("Presence log check failed: {}", e);
                process::exit(1);
            }
        }
    }

    let state = AppState::new(&cfg);

    if let Err(e) = http::serve(state, &cfg.host, cfg.port).await {
        error!("Server error: {}", e);
        process::exit(1);
    }

    info!("Server shut down cleanly");
}
