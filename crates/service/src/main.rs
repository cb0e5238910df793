//! Production entry point for the prediction API

use std::sync::Arc;

use anyhow::{Context, Result};
use storecast_core::PredictionService;
use storecast_service::{start_server, AppState, ServiceConfig};
use tokio::signal;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<()> {
    init_logging();

    info!("Starting storecast service v{}", env!("CARGO_PKG_VERSION"));

    let config = ServiceConfig::load().context("failed to load configuration")?;
    info!(
        model = %config.model_path.display(),
        addr = %config.listen_addr,
        "configuration loaded"
    );

    // No model, no service: a startup load failure is fatal.
    let service = PredictionService::new(config.model_path.clone())
        .context("failed to load initial model artifact")?;
    let state = AppState::new(Arc::new(service));

    let server_task = {
        let addr = config.listen_addr.clone();
        tokio::spawn(async move {
            if let Err(err) = start_server(state, &addr).await {
                error!("HTTP server error: {err:#}");
            }
        })
    };

    match signal::ctrl_c().await {
        Ok(()) => info!("received shutdown signal"),
        Err(err) => error!("unable to listen for shutdown signal: {err}"),
    }

    server_task.abort();
    info!("storecast service stopped");
    Ok(())
}

fn init_logging() {
    let env = std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string());

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(env)),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}
