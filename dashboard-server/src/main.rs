//! Binary crate for the `dashboard-server` HTTP API.

use anyhow::Context;
use clap::Parser;
use dashboard_core::{Config, Gateway};
use dashboard_server::{AppState, router};
use std::path::PathBuf;
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "dashboard-server", version, about = "Weather dashboard HTTP API")]
struct Args {
    /// Address to listen on; overrides `[server] listen` from the config.
    #[arg(long)]
    listen: Option<String>,

    /// Config file to use instead of the platform default.
    #[arg(long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();

    let config = match &args.config {
        Some(path) => Config::load_from(path)?,
        None => Config::load()?,
    };
    let listen = args.listen.unwrap_or_else(|| config.server.listen.clone());

    let gateway = Gateway::from_config(&config)?;
    let app = router(AppState::new(gateway));

    let listener = TcpListener::bind(&listen)
        .await
        .with_context(|| format!("Failed to bind {listen}"))?;
    info!(address = %listen, upstream = %config.upstream.base_url, "dashboard server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("dashboard server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %err, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
}
