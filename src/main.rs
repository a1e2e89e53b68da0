// FCOC license lookup
//
// Web form that queries the federation licensing API (Playoff) for one
// identity document and shows whether the holder has a processed athlete
// license.
//
// Architecture:
// - Web server (axum): serves the form, the results and a JSON endpoint
// - Licensing client: one blocking GET per distinct (selector, document),
//   memoized for the process lifetime
// - Record mapper + renderer: JSON items → licenses → report blocks

mod cli;
mod config;
mod licensing;
mod logging;
mod startup;
mod web;

use anyhow::{Context, Result};
use clap::Parser;
use cli::{Cli, Commands};
use config::Config;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Some(Commands::Config { show, path }) => cli::handle_config(show, path),
        Some(Commands::Lookup { tipus, document }) => {
            let config = Config::from_env()?;
            let _file_guard = logging::init(&config.logging.for_cli());

            tokio::task::spawn_blocking(move || cli::run_lookup(&config, &tipus, &document))
                .await
                .context("Lookup task failed")?
        }
        None => serve().await,
    }
}

async fn serve() -> Result<()> {
    // Ensure config template exists (helps users discover options)
    Config::ensure_config_exists();

    let config = Config::from_env()?;

    // The guard must be kept alive for the duration of the program to ensure logs flush
    let _file_guard = logging::init(&config.logging);

    startup::print_startup(&config);
    startup::log_startup(&config);

    // Oneshot shutdown signal for graceful server stop
    let (shutdown_tx, shutdown_rx) = tokio::sync::oneshot::channel();

    let server_config = config.clone();
    let mut server_handle =
        tokio::spawn(async move { web::start_server(server_config, shutdown_rx).await });

    tokio::select! {
        result = &mut server_handle => {
            // Server stopped on its own (bind failure, etc.)
            return result.context("Server task panicked")?;
        }
        signal = tokio::signal::ctrl_c() => {
            signal.context("Failed to listen for Ctrl+C")?;
        }
    }

    tracing::info!("Shutting down...");

    // If the send fails, the server has already shut down (which is fine)
    let _ = shutdown_tx.send(());
    server_handle.await.context("Server task panicked")??;

    tracing::info!("Shutdown complete");
    Ok(())
}
