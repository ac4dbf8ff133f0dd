use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// Why a single field of an input record was rejected
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ViolationReason {
    /// The record itself is not a JSON object
    NotAnObject,
    /// A batch body is not a JSON array
    NotAnArray,
    Missing,
    NotNumeric,
    NotFinite,
    NotInteger,
    OutOfRange { min: f64, max: f64 },
}

impl fmt::Display for ViolationReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ViolationReason::NotAnObject => write!(f, "record must be a JSON object"),
            ViolationReason::NotAnArray => write!(f, "request body must be a JSON array"),
            ViolationReason::Missing => write!(f, "field required"),
            ViolationReason::NotNumeric => write!(f, "value is not a number"),
            ViolationReason::NotFinite => write!(f, "value must be finite"),
            ViolationReason::NotInteger => write!(f, "value must be an integer"),
            ViolationReason::OutOfRange { min, max } => {
                write!(f, "value must be between {} and {}", min, max)
            }
        }
    }
}

/// One rejected field, optionally tagged with its row in a batch
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldViolation {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub row: Option<usize>,
    pub field: String,
    pub reason: ViolationReason,
}

impl FieldViolation {
    pub fn new(field: impl Into<String>, reason: ViolationReason) -> Self {
        Self {
            row: None,
            field: field.into(),
            reason,
        }
    }

    pub fn at_row(mut self, row: usize) -> Self {
        self.row = Some(row);
        self
    }
}

impl fmt::Display for FieldViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.row {
            Some(row) => write!(f, "row {}: {}: {}", row, self.field, self.reason),
            None => write!(f, "{}: {}", self.field, self.reason),
        }
    }
}

/// Input rejected by the feature schema. Carries every violation, not just the first.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationError {
    violations: Vec<FieldViolation>,
}

impl ValidationError {
    pub fn new(violations: Vec<FieldViolation>) -> Self {
        Self { violations }
    }

    pub fn violations(&self) -> &[FieldViolation] {
        &self.violations
    }

    pub fn into_violations(self) -> Vec<FieldViolation> {
        self.violations
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} invalid field(s)", self.violations.len())?;
        for (i, violation) in self.violations.iter().enumerate() {
            let sep = if i == 0 { ": " } else { "; " };
            write!(f, "{}{}", sep, violation)?;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationError {}

/// Errors surfaced by the prediction pipeline
#[derive(Debug, Error)]
pub enum PredictionError {
    #[error("Validation failed: {0}")]
    Validation(#[from] ValidationError),

    #[error("Batch size too large: {size} rows, maximum {max} predictions allowed")]
    BatchTooLarge { size: usize, max: usize },

    #[error("Model not loaded")]
    ModelNotReady,

    #[error("Inference failed: {reason}")]
    Inference { reason: String },
}

impl PredictionError {
    /// Stable machine-readable error kind
    pub fn kind(&self) -> &'static str {
        match self {
            PredictionError::Validation(_) => "validation_error",
            PredictionError::BatchTooLarge { .. } => "batch_too_large",
            PredictionError::ModelNotReady => "model_not_ready",
            PredictionError::Inference { .. } => "inference_error",
        }
    }

    pub fn inference(reason: impl Into<String>) -> Self {
        PredictionError::Inference {
            reason: reason.into(),
        }
    }
}

/// Errors raised by a loaded classifier while scoring rows
#[derive(Debug, Error)]
pub enum ClassifierError {
    #[error("Feature shape mismatch: expected {expected} columns, got {actual}")]
    ShapeMismatch { expected: usize, actual: usize },

    #[error("Numeric error: {0}")]
    Numeric(String),

    #[error("{0}")]
    Other(String),
}

/// Errors raised while loading the model artifact at startup
#[derive(Debug, Error)]
pub enum ModelLoadError {
    #[error("Model file not found at {path:?}")]
    NotFound { path: PathBuf },

    #[error("Failed to read model file {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to deserialize model artifact: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Invalid model artifact: {reason}")]
    InvalidArtifact { reason: String },

    #[error("Model load already attempted (state: {state})")]
    AlreadyAttempted { state: String },
}
