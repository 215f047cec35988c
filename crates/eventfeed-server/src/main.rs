//! Server binary for eventfeed.
//!
//! Wires configuration, logging, the JSON document store, and the Events
//! API together, then serves until `Ctrl-C` or `SIGTERM`.
//!
//! # Startup Sequence
//!
//! 1. Load configuration from `eventfeed-config.yaml` (plus env overrides)
//! 2. Initialize structured logging (tracing)
//! 3. Optionally create an empty event document
//! 4. Serve the Events API until a shutdown signal arrives

mod config;
mod error;

use std::sync::Arc;

use eventfeed_api::{AppState, shutdown_signal, start_server};
use eventfeed_store::JsonFileBackend;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use crate::config::EventfeedConfig;
use crate::error::AppError;

/// Application entry point.
///
/// # Errors
///
/// Returns an error if configuration, store preparation, or the server
/// itself fails.
#[tokio::main]
async fn main() -> Result<(), AppError> {
    // 1. Load configuration. Logging is not up yet, so report afterwards.
    let (config, config_path) = EventfeedConfig::load()?;

    // 2. Initialize structured logging.
    tracing_subscriber::fmt()
        .with_env_filter(log_filter(&config.logging.level)?)
        .with_target(true)
        .try_init()
        .map_err(|e| AppError::Logging {
            message: format!("{e}"),
        })?;

    info!("eventfeed-server starting");
    match &config_path {
        Some(path) => info!(path = %path.display(), "Configuration loaded"),
        None => info!("Config file not found, using defaults"),
    }
    info!(
        host = config.server.host,
        port = config.server.port,
        data_path = %config.storage.path.display(),
        create_if_missing = config.storage.create_if_missing,
        "Configuration resolved"
    );

    // 3. Prepare the backing document.
    let backend = JsonFileBackend::new(&config.storage.path);
    if config.storage.create_if_missing {
        backend.create_if_missing().await?;
    } else if !config.storage.path.exists() {
        warn!(
            path = %config.storage.path.display(),
            "Event document does not exist; requests will fail until it is created"
        );
    }

    // 4. Serve.
    let state = Arc::new(AppState::new(backend));
    start_server(&config.server_config(), state, shutdown_signal()).await?;

    info!("eventfeed-server shutdown complete");
    Ok(())
}

/// `RUST_LOG` when it parses, otherwise the configured level.
fn log_filter(level: &str) -> Result<EnvFilter, AppError> {
    EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(level.trim()))
        .map_err(|e| AppError::Logging {
            message: format!("invalid log level {level:?}: {e}"),
        })
}
