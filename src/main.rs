use std::{sync::Arc, time::Duration};

use anyhow::Context;
use tidbit_chat_relay::{config::RelayConfig, routes, state::AppState};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = RelayConfig::from_env().context("loading relay configuration")?;
    if config.upstream_api_key.is_none() {
        warn!("UPSTREAM_API_KEY is not set; chat requests will fail until it is configured");
    }

    let state = Arc::new(AppState::from_config(&config).context("building HTTP client")?);

    // Keep the rate-limit table from growing without bound.
    let limiter = state.limiter.clone();
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(limiter.window().max(Duration::from_secs(1)));
        loop {
            ticker.tick().await;
            let removed = limiter.purge_expired().await;
            if removed > 0 {
                tracing::debug!(removed, "purged expired rate-limit entries");
            }
        }
    });

    let app = routes::create_router(state);

    let listener = tokio::net::TcpListener::bind(config.bind_addr)
        .await
        .with_context(|| format!("binding {}", config.bind_addr))?;

    info!("chat relay running at http://{}", config.bind_addr);
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("serving")?;
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("shutting down");
}
