use crate::domain::errors::PredictionError;
use crate::interfaces::http::dto::ErrorBody;
use axum::extract::rejection::JsonRejection;
use axum::{BoxError, Json};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use tower::timeout::error::Elapsed;
use tracing::{error, warn};

/// Error returned by HTTP handlers
#[derive(Debug)]
pub enum ApiError {
    Prediction(PredictionError),
    /// Body could not be read as JSON
    InvalidBody { status: StatusCode, detail: String },
    /// Request exceeded the configured timeout
    Timeout,
    /// Failure raised by a middleware layer rather than a handler
    Internal { reason: String },
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Prediction(PredictionError::Validation(_)) => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::Prediction(PredictionError::BatchTooLarge { .. }) => StatusCode::BAD_REQUEST,
            ApiError::Prediction(PredictionError::ModelNotReady)
            | ApiError::Prediction(PredictionError::Inference { .. }) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
            ApiError::InvalidBody { status, .. } => *status,
            ApiError::Timeout => StatusCode::REQUEST_TIMEOUT,
            ApiError::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Maps an error surfaced by the middleware stack.
    pub fn from_middleware(err: BoxError) -> Self {
        if err.is::<Elapsed>() {
            ApiError::Timeout
        } else {
            ApiError::Internal {
                reason: err.to_string(),
            }
        }
    }

    /// Error kind, also used as the metrics outcome label
    pub fn kind(&self) -> &'static str {
        match self {
            ApiError::Prediction(e) => e.kind(),
            ApiError::InvalidBody { .. } => "invalid_body",
            ApiError::Timeout => "timeout",
            ApiError::Internal { .. } => "internal_error",
        }
    }

    fn into_body(self) -> ErrorBody {
        let error = self.kind().to_string();
        match self {
            ApiError::Prediction(PredictionError::Validation(v)) => ErrorBody {
                error,
                detail: v.to_string(),
                violations: v.into_violations(),
            },
            ApiError::Prediction(PredictionError::BatchTooLarge { max, .. }) => ErrorBody {
                error,
                detail: format!("Batch size too large. Maximum {} predictions allowed.", max),
                violations: Vec::new(),
            },
            ApiError::Prediction(PredictionError::ModelNotReady) => ErrorBody {
                error,
                detail: "Model not loaded".to_string(),
                violations: Vec::new(),
            },
            // Internal reason stays in the server log.
            ApiError::Prediction(PredictionError::Inference { .. }) => ErrorBody {
                error,
                detail: "Prediction failed due to an internal model error".to_string(),
                violations: Vec::new(),
            },
            ApiError::InvalidBody { detail, .. } => ErrorBody {
                error,
                detail,
                violations: Vec::new(),
            },
            ApiError::Timeout => ErrorBody {
                error,
                detail: "Request timed out".to_string(),
                violations: Vec::new(),
            },
            ApiError::Internal { .. } => ErrorBody {
                error,
                detail: "Internal server error".to_string(),
                violations: Vec::new(),
            },
        }
    }
}

impl From<PredictionError> for ApiError {
    fn from(err: PredictionError) -> Self {
        ApiError::Prediction(err)
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::InvalidBody {
            status: rejection.status(),
            detail: rejection.body_text(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if let ApiError::Internal { reason } = &self {
            error!("Middleware failure: {}", reason);
        }
        if status.is_server_error() {
            warn!("Request failed with {}: {}", status, self.kind());
        }
        (status, Json(self.into_body())).into_response()
    }
}
