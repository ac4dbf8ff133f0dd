//! JSON wire types of the HTTP API.

use crate::domain::errors::FieldViolation;
use crate::domain::ml::Confidence;
use crate::domain::ml::types::{BatchPrediction, PredictionResult};
use serde::{Deserialize, Serialize};

/// Response body of `POST /predict`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionResponse {
    pub prediction: u8,
    pub probability: f64,
    pub confidence: Confidence,
}

impl From<&PredictionResult> for PredictionResponse {
    fn from(result: &PredictionResult) -> Self {
        Self {
            prediction: result.class_label(),
            probability: result.probability(),
            confidence: result.confidence(),
        }
    }
}

/// One entry of a batch response
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchPredictionItem {
    pub patient_id: usize,
    pub prediction: u8,
    pub probability: f64,
    pub confidence: Confidence,
}

impl From<&PredictionResult> for BatchPredictionItem {
    fn from(result: &PredictionResult) -> Self {
        Self {
            patient_id: result.row_index(),
            prediction: result.class_label(),
            probability: result.probability(),
            confidence: result.confidence(),
        }
    }
}

/// Response body of `POST /predict-batch`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchPredictionResponse {
    pub predictions: Vec<BatchPredictionItem>,
    pub total_patients: usize,
}

impl From<&BatchPrediction> for BatchPredictionResponse {
    fn from(batch: &BatchPrediction) -> Self {
        Self {
            predictions: batch.predictions.iter().map(BatchPredictionItem::from).collect(),
            total_patients: batch.total,
        }
    }
}

/// Response body of `GET /`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RootResponse {
    pub message: String,
    pub version: String,
    pub health: String,
    pub metrics: String,
}

/// Body of every non-2xx response
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
    pub detail: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub violations: Vec<FieldViolation>,
}
