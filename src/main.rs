//! notes-api server entry point.
//!
//! Loads configuration, opens the selected store, and serves the REST API
//! until interrupted.

use anyhow::Context;
use tracing_subscriber::EnvFilter;

use notes_api::api;
use notes_api::app_state::AppState;
use notes_api::config::{LogFormat, NotesConfig};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing before configuration so config warnings are visible
    dotenvy::dotenv().ok();
    let log_format: LogFormat = std::env::var("LOG_FORMAT")
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or_default();
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    match log_format {
        LogFormat::Json => tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .init(),
        LogFormat::Text => tracing_subscriber::fmt().with_env_filter(filter).init(),
    }

    // Load configuration
    let config = NotesConfig::from_env()?;
    tracing::info!(
        addr = %config.listen_addr,
        storage = %config.storage.kind,
        auth_mode = %config.auth.mode,
        "starting notes-api"
    );

    // Build application state (store + auth strategy)
    let app_state = AppState::from_config(&config)
        .await
        .context("failed to initialise storage")?;

    // Build router
    let app = api::build_router(app_state);

    // Start server
    let listener = tokio::net::TcpListener::bind(config.listen_addr)
        .await
        .with_context(|| format!("failed to bind {}", config.listen_addr))?;
    tracing::info!(addr = %config.listen_addr, "server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for shutdown signal");
    }
}
