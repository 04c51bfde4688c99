//! Standalone HTTP server

pub mod app;
pub mod routes;

pub use app::build_app;

use anyhow::{Context, Result};

use crate::core::AppState;
use crate::core::config::AppConfig;

/// Builds the engine, binds `config.bind_addr` and serves until Ctrl-C.
///
/// # Errors
///
/// Returns an error if the engine cannot be built, the address cannot be
/// bound, or the server fails.
pub async fn serve(config: AppConfig) -> Result<()> {
    let state = AppState::from_config(&config)
        .context("Failed to initialize summarization engine")?;
    tracing::info!(
        backend = %config.backend,
        model = %config.model_id,
        short_input_policy = %config.short_input_policy,
        "Summarization engine ready"
    );

    let app = build_app(state);

    let listener = tokio::net::TcpListener::bind(config.bind_addr)
        .await
        .with_context(|| format!("Failed to bind to {}", config.bind_addr))?;
    tracing::info!("Starting server on {}", config.bind_addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    tracing::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
