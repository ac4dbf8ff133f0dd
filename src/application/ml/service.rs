use crate::application::ml::batch::BatchOrchestrator;
use crate::application::ml::inference::InferenceInvoker;
use crate::domain::errors::PredictionError;
use crate::domain::ml::types::{BatchPrediction, PredictionResult};
use crate::domain::ports::ModelHandle;
use crate::domain::validation::FeatureValidator;
use serde::Serialize;
use serde_json::Value;
use std::collections::BTreeMap;
use tracing::info;

/// Liveness report. Always available, whatever the model state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HealthStatus {
    pub status: &'static str,
    pub model_loaded: bool,
}

/// Metadata about the loaded model
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ModelInfo {
    pub model_type: String,
    pub features: Vec<String>,
    pub num_features: usize,
    pub target_classes: Vec<u8>,
    pub target_description: BTreeMap<u8, String>,
}

/// Stateless facade over validation, inference and confidence classification.
///
/// Holds the immutable model handle (if any); nothing here mutates after
/// construction, so one instance is shared by all concurrent requests.
#[derive(Clone)]
pub struct PredictionService {
    invoker: InferenceInvoker,
    orchestrator: BatchOrchestrator,
}

impl PredictionService {
    pub fn new(model: ModelHandle) -> Self {
        Self {
            invoker: InferenceInvoker::new(Some(model)),
            orchestrator: BatchOrchestrator::new(),
        }
    }

    /// A service with no model behind it; every prediction reports `ModelNotReady`.
    pub fn unloaded() -> Self {
        Self {
            invoker: InferenceInvoker::new(None),
            orchestrator: BatchOrchestrator::new(),
        }
    }

    pub fn is_ready(&self) -> bool {
        self.invoker.is_ready()
    }

    pub fn health(&self) -> HealthStatus {
        HealthStatus {
            status: "healthy",
            model_loaded: self.is_ready(),
        }
    }

    pub fn model_info(&self) -> Result<ModelInfo, PredictionError> {
        let model = self.invoker.model()?;
        let features = model.feature_names();

        let mut target_description = BTreeMap::new();
        target_description.insert(0, "No hypertension".to_string());
        target_description.insert(1, "Hypertension".to_string());

        Ok(ModelInfo {
            model_type: model.model_type().to_string(),
            num_features: features.len(),
            features,
            target_classes: vec![0, 1],
            target_description,
        })
    }

    /// Validates, scores and classifies one record. The result has `row_index` 0.
    pub fn predict_one(&self, record: &Value) -> Result<PredictionResult, PredictionError> {
        let row = FeatureValidator::validate_record(record)?;
        let score = self
            .invoker
            .invoke(std::slice::from_ref(&row))?
            .into_iter()
            .next()
            .ok_or_else(|| PredictionError::inference("No prediction returned"))?;

        let result = PredictionResult::from_score(0, score);
        info!(
            "Prediction made: {}, Probability: {:.3}, Confidence: {}",
            result.class_label(),
            result.probability(),
            result.confidence()
        );
        Ok(result)
    }

    pub fn predict_batch(&self, records: &[Value]) -> Result<BatchPrediction, PredictionError> {
        let batch = self.orchestrator.run(&self.invoker, records)?;
        info!("Batch prediction completed for {} patients", batch.total);
        Ok(batch)
    }
}
