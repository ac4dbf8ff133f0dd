//! Hypertension Prediction Server
//!
//! Loads the model artifact once, then serves the prediction API over HTTP.
//! A model load failure is fatal: the process exits before binding the listener.
//!
//! # Usage
//! ```sh
//! MODEL_PATH=logistic_pipeline_model.json cargo run --bin server
//! ```
//!
//! # Environment Variables
//! - `MODEL_PATH` - Path to the JSON model artifact (default: logistic_pipeline_model.json)
//! - `SERVER_BIND_ADDRESS` / `SERVER_PORT` - Listen address (default: 0.0.0.0:8000)
//! - `REQUEST_TIMEOUT_SECS` - Per-request timeout (default: 30)
//! - `OBSERVABILITY_ENABLED` - Expose `/metrics` (default: true)

use anyhow::{Context, Result};
use hypertension_api::application::ml::{ModelLifecycle, PredictionService};
use hypertension_api::config::Config;
use hypertension_api::domain::ports::ModelHandle;
use hypertension_api::infrastructure::ml::LogisticPipeline;
use hypertension_api::infrastructure::observability::Metrics;
use hypertension_api::interfaces::http::{AppState, router};
use std::sync::Arc;
use tracing::{Level, error, info};
use tracing_subscriber::prelude::*;

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    let stdout_layer = tracing_subscriber::fmt::layer().with_target(false);

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::from_default_env().add_directive(Level::INFO.into()))
        .with(stdout_layer)
        .init();

    info!(
        "Hypertension Prediction API {} starting...",
        env!("CARGO_PKG_VERSION")
    );

    let config = Config::from_env()?;
    info!(
        "Configuration loaded: Model={:?}, Listen={}:{}, Timeout={}s",
        config.model_path, config.bind_address, config.port, config.request_timeout_secs
    );

    let mut lifecycle = ModelLifecycle::new();
    let model_path = config.model_path.clone();
    let model = lifecycle
        .load_with(|| Ok(Arc::new(LogisticPipeline::load(&model_path)?) as ModelHandle))
        .context("Failed to load model")?;

    let metrics = if config.observability_enabled {
        Some(Metrics::new()?)
    } else {
        info!("Metrics endpoint disabled.");
        None
    };

    let state = AppState::new(PredictionService::new(model), metrics);
    let app = router(state, config.request_timeout());

    let addr = config.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .context(format!("Failed to bind {}", addr))?;
    info!("Server listening on http://{}. Press Ctrl+C to shutdown.", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Shutdown complete.");
    Ok(())
}

async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => info!("Shutdown signal received. Draining connections..."),
        Err(e) => {
            error!("Failed to listen for shutdown signal: {}", e);
            std::future::pending::<()>().await;
        }
    }
}
