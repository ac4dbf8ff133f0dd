use crate::application::ml::{HealthStatus, ModelInfo};
use crate::domain::errors::{FieldViolation, PredictionError, ValidationError, ViolationReason};
use crate::interfaces::http::AppState;
use crate::interfaces::http::dto::{BatchPredictionResponse, PredictionResponse, RootResponse};
use crate::interfaces::http::error::ApiError;
use axum::Json;
use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use axum::http::{StatusCode, header};
use axum::response::{IntoResponse, Response};
use serde_json::Value;
use std::time::Instant;
use tracing::debug;

pub async fn root() -> Json<RootResponse> {
    Json(RootResponse {
        message: "Hypertension Prediction API".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        health: "/health".to_string(),
        metrics: "/metrics".to_string(),
    })
}

pub async fn health(State(state): State<AppState>) -> Json<HealthStatus> {
    Json(state.service.health())
}

pub async fn model_info(State(state): State<AppState>) -> Result<Json<ModelInfo>, ApiError> {
    let result = state.service.model_info().map_err(ApiError::from);
    state.record_outcome("model_info", result.as_ref().err());
    Ok(Json(result?))
}

pub async fn predict(
    State(state): State<AppState>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<Json<PredictionResponse>, ApiError> {
    let started = Instant::now();
    let result = payload
        .map_err(ApiError::from)
        .and_then(|Json(record)| state.service.predict_one(&record).map_err(ApiError::from));

    state.record_outcome("predict", result.as_ref().err());
    state.observe_latency("predict", started);
    let prediction = result?;

    if let Some(metrics) = &state.metrics {
        metrics.record_prediction(prediction.class_label(), prediction.confidence().as_str());
    }
    Ok(Json(PredictionResponse::from(&prediction)))
}

pub async fn predict_batch(
    State(state): State<AppState>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<Json<BatchPredictionResponse>, ApiError> {
    let started = Instant::now();
    let result = payload.map_err(ApiError::from).and_then(|Json(body)| {
        let Value::Array(records) = body else {
            return Err(ApiError::from(PredictionError::Validation(
                ValidationError::new(vec![FieldViolation::new(
                    "body",
                    ViolationReason::NotAnArray,
                )]),
            )));
        };
        debug!("Batch request with {} record(s)", records.len());
        state
            .service
            .predict_batch(&records)
            .map_err(ApiError::from)
    });

    state.record_outcome("predict_batch", result.as_ref().err());
    state.observe_latency("predict_batch", started);
    let batch = result?;

    if let Some(metrics) = &state.metrics {
        for prediction in &batch.predictions {
            metrics.record_prediction(prediction.class_label(), prediction.confidence().as_str());
        }
    }
    Ok(Json(BatchPredictionResponse::from(&batch)))
}

pub async fn metrics(State(state): State<AppState>) -> Response {
    match &state.metrics {
        Some(metrics) => (
            [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
            metrics.render(),
        )
            .into_response(),
        None => StatusCode::NOT_FOUND.into_response(),
    }
}
