use crate::application::ml::inference::InferenceInvoker;
use crate::domain::errors::PredictionError;
use crate::domain::ml::types::{BatchPrediction, PredictionResult};
use crate::domain::validation::FeatureValidator;
use serde_json::Value;
use tracing::warn;

/// Hard limit of rows per batch request
pub const MAX_BATCH_SIZE: usize = 100;

/// Runs a batch of raw records through validation and a single inference call.
///
/// Order of checks: batch size, then validation of every row (violations are
/// accumulated across rows), then one model call for the whole batch. Results
/// carry `row_index` equal to the record's position in the input.
#[derive(Debug, Clone)]
pub struct BatchOrchestrator {
    max_batch_size: usize,
}

impl Default for BatchOrchestrator {
    fn default() -> Self {
        Self {
            max_batch_size: MAX_BATCH_SIZE,
        }
    }
}

impl BatchOrchestrator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn run(
        &self,
        invoker: &InferenceInvoker,
        records: &[Value],
    ) -> Result<BatchPrediction, PredictionError> {
        if records.len() > self.max_batch_size {
            warn!(
                "Batch rejected: {} rows exceeds maximum of {}",
                records.len(),
                self.max_batch_size
            );
            return Err(PredictionError::BatchTooLarge {
                size: records.len(),
                max: self.max_batch_size,
            });
        }

        let rows = FeatureValidator::validate_batch(records)?;
        let scores = invoker.invoke(&rows)?;

        let predictions = scores
            .into_iter()
            .enumerate()
            .map(|(row_index, score)| PredictionResult::from_score(row_index, score))
            .collect();

        Ok(BatchPrediction::new(predictions))
    }
}
