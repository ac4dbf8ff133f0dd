use crate::domain::errors::{FieldViolation, ValidationError};
use crate::domain::ml::confidence::Confidence;
use crate::domain::ml::feature_registry::{FEATURE_BOUNDS, FEATURE_COUNT};
use serde::Serialize;

/// One patient's 13 clinical measurements.
///
/// Values are stored in `FEATURE_NAMES` order and can only be built through a
/// range check, so a `FeatureRow` in hand is always inside the input contract.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FeatureRow {
    values: [f64; FEATURE_COUNT],
}

impl FeatureRow {
    /// Builds a row from values in `FEATURE_NAMES` order, reporting every violation.
    pub fn new(values: [f64; FEATURE_COUNT]) -> Result<Self, ValidationError> {
        let violations: Vec<FieldViolation> = FEATURE_BOUNDS
            .iter()
            .zip(values.iter())
            .filter_map(|(bound, value)| {
                bound
                    .check(*value)
                    .err()
                    .map(|reason| FieldViolation::new(bound.name, reason))
            })
            .collect();

        if violations.is_empty() {
            Ok(Self { values })
        } else {
            Err(ValidationError::new(violations))
        }
    }

    /// Values in model column order
    pub fn to_vector(&self) -> [f64; FEATURE_COUNT] {
        self.values
    }
}

/// Class label and probability the model produced for one row
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RowScore {
    pub class_label: u8,
    pub probability: f64,
}

/// Final per-row outcome: model score plus the derived confidence band
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PredictionResult {
    row_index: usize,
    class_label: u8,
    probability: f64,
    confidence: Confidence,
}

impl PredictionResult {
    pub fn from_score(row_index: usize, score: RowScore) -> Self {
        Self {
            row_index,
            class_label: score.class_label,
            probability: score.probability,
            confidence: Confidence::from_probability(score.probability),
        }
    }

    pub fn row_index(&self) -> usize {
        self.row_index
    }

    pub fn class_label(&self) -> u8 {
        self.class_label
    }

    pub fn probability(&self) -> f64 {
        self.probability
    }

    pub fn confidence(&self) -> Confidence {
        self.confidence
    }
}

/// Ordered results of a batch request
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BatchPrediction {
    pub predictions: Vec<PredictionResult>,
    pub total: usize,
}

impl BatchPrediction {
    pub fn new(predictions: Vec<PredictionResult>) -> Self {
        let total = predictions.len();
        Self { predictions, total }
    }
}
