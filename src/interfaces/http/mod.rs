//! HTTP surface of the prediction service.
//!
//! | Method | Path             | Success body                         |
//! |--------|------------------|--------------------------------------|
//! | GET    | `/`              | API description                      |
//! | GET    | `/health`        | `{status, model_loaded}`             |
//! | GET    | `/model-info`    | model type, features, target classes |
//! | POST   | `/predict`       | `{prediction, probability, confidence}` |
//! | POST   | `/predict-batch` | `{predictions, total_patients}`      |
//! | GET    | `/metrics`       | Prometheus text                      |

pub mod dto;
pub mod error;
pub mod handlers;

use crate::application::ml::PredictionService;
use crate::infrastructure::observability::Metrics;
use crate::interfaces::http::error::ApiError;
use axum::error_handling::HandleErrorLayer;
use axum::http::{Method, Uri};
use axum::routing::{get, post};
use axum::{BoxError, Router};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tower::ServiceBuilder;
use tower::timeout::TimeoutLayer;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::warn;

/// Shared, read-only state handed to every handler
#[derive(Clone)]
pub struct AppState {
    pub service: Arc<PredictionService>,
    pub metrics: Option<Metrics>,
}

impl AppState {
    pub fn new(service: PredictionService, metrics: Option<Metrics>) -> Self {
        if let Some(metrics) = &metrics {
            metrics.set_model_loaded(service.is_ready());
        }
        Self {
            service: Arc::new(service),
            metrics,
        }
    }

    fn record_outcome(&self, endpoint: &str, error: Option<&ApiError>) {
        if let Some(metrics) = &self.metrics {
            metrics.inc_requests(endpoint, error.map(ApiError::kind).unwrap_or("ok"));
        }
    }

    fn observe_latency(&self, endpoint: &str, started: Instant) {
        if let Some(metrics) = &self.metrics {
            metrics.observe_latency(endpoint, started.elapsed().as_secs_f64());
        }
    }
}

/// Metrics label for a request path
fn endpoint_label(path: &str) -> &'static str {
    match path {
        "/" => "root",
        "/health" => "health",
        "/model-info" => "model_info",
        "/predict" => "predict",
        "/predict-batch" => "predict_batch",
        "/metrics" => "metrics",
        _ => "unknown",
    }
}

/// Builds the application router. Every request is bounded by `request_timeout`;
/// a request that exceeds it gets a `timeout` error body like any other failure.
pub fn router(state: AppState, request_timeout: Duration) -> Router {
    let error_state = state.clone();
    let handle_middleware_error = move |uri: Uri, err: BoxError| {
        let state = error_state.clone();
        async move {
            let error = ApiError::from_middleware(err);
            warn!("Request to {} aborted: {}", uri.path(), error.kind());
            state.record_outcome(endpoint_label(uri.path()), Some(&error));
            error
        }
    };

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers(Any);

    Router::new()
        .route("/", get(handlers::root))
        .route("/health", get(handlers::health))
        .route("/model-info", get(handlers::model_info))
        .route("/predict", post(handlers::predict))
        .route("/predict-batch", post(handlers::predict_batch))
        .route("/metrics", get(handlers::metrics))
        .layer(
            ServiceBuilder::new()
                .layer(HandleErrorLayer::new(handle_middleware_error))
                .layer(TimeoutLayer::new(request_timeout)),
        )
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
