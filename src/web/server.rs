//! Web server setup and initialization

use std::sync::Arc;

use anyhow::{Context, Result};
use axum::{routing::get, Router};
use tokio::net::TcpListener;

use crate::config::Config;
use crate::licensing::LicenseClient;

use super::handlers;
use super::state::AppState;

/// Build the router - form page, JSON API, logo asset
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::index))
        .route("/api/licenses", get(handlers::api_licenses))
        .route("/logo.png", get(handlers::logo))
        .with_state(state)
}

/// Start the web server
pub async fn start_server(
    config: Config,
    shutdown_rx: tokio::sync::oneshot::Receiver<()>,
) -> Result<()> {
    let bind_addr = config.bind_addr;

    // The blocking HTTP client owns a runtime of its own; build it off the
    // async worker threads
    let api_config = config.api_config();
    let client = tokio::task::spawn_blocking(move || LicenseClient::http(&api_config))
        .await
        .context("HTTP client setup task failed")?
        .context("Failed to create licensing API client")?;

    let state = AppState::new(Arc::new(client), config.logo_path.clone());
    let app = build_router(state);

    tracing::info!("Starting web form on {}", bind_addr);

    let listener = TcpListener::bind(bind_addr)
        .await
        .context("Failed to bind to address")?;

    tracing::info!("Web form listening on http://{}", bind_addr);

    // When shutdown_rx fires, stop accepting connections and let in-flight
    // requests finish
    axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            shutdown_rx.await.ok();
        })
        .await
        .context("Server error")?;

    tracing::info!("Web server shut down gracefully");
    Ok(())
}
