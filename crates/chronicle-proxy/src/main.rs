//! Main entry point for the Chronicle file-fetch proxy.

use anyhow::Context;
use chronicle_common::init_logging;
use chronicle_config::{ConfigCache, ConfigLoader};
use chronicle_proxy::{router, ProxyState};
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::{info, warn};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = ConfigLoader::load().context("failed to load configuration")?;
    init_logging(&config.logging).context("failed to initialize logging")?;

    info!("Starting Chronicle proxy");

    let bind_address = config.proxy.bind_address.clone();
    let state = ProxyState::new(Arc::new(ConfigCache::new(config)))?;

    let listener = TcpListener::bind(&bind_address)
        .await
        .with_context(|| format!("failed to bind {bind_address}"))?;
    info!("Listening on {}", listener.local_addr()?);

    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Proxy stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
}
