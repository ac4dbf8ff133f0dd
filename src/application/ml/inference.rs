use crate::domain::errors::PredictionError;
use crate::domain::ml::feature_registry::FEATURE_COUNT;
use crate::domain::ml::types::{FeatureRow, RowScore};
use crate::domain::ports::ModelHandle;
use ndarray::Array2;
use tracing::{debug, error};

/// Decision threshold the model's labels must agree with (ties accept either label)
pub const DECISION_THRESHOLD: f64 = 0.5;

/// Wraps the opaque classifier and turns validated rows into scores.
///
/// Batch-atomic: all rows go through one `predict` and one `predict_proba`
/// call, and any failure fails the whole request. Never retries.
#[derive(Clone)]
pub struct InferenceInvoker {
    model: Option<ModelHandle>,
}

impl InferenceInvoker {
    pub fn new(model: Option<ModelHandle>) -> Self {
        Self { model }
    }

    pub fn is_ready(&self) -> bool {
        self.model.is_some()
    }

    pub fn model(&self) -> Result<&ModelHandle, PredictionError> {
        self.model.as_ref().ok_or(PredictionError::ModelNotReady)
    }

    /// Scores every row, preserving input order.
    pub fn invoke(&self, rows: &[FeatureRow]) -> Result<Vec<RowScore>, PredictionError> {
        let model = self.model()?;
        if rows.is_empty() {
            return Ok(Vec::new());
        }

        let matrix = rows_to_matrix(rows)?;
        let shape = (matrix.nrows(), matrix.ncols());

        let labels = model.predict(&matrix).map_err(|e| {
            error!("Model predict failed for input shape {:?}: {}", shape, e);
            PredictionError::inference(e.to_string())
        })?;
        let probabilities = model.predict_proba(&matrix).map_err(|e| {
            error!("Model predict_proba failed for input shape {:?}: {}", shape, e);
            PredictionError::inference(e.to_string())
        })?;

        if labels.len() != rows.len() || probabilities.len() != rows.len() {
            error!(
                "Model output length mismatch for input shape {:?}: {} labels, {} probabilities",
                shape,
                labels.len(),
                probabilities.len()
            );
            return Err(PredictionError::inference(format!(
                "expected {} outputs, got {} labels and {} probabilities",
                rows.len(),
                labels.len(),
                probabilities.len()
            )));
        }

        let scores = labels
            .into_iter()
            .zip(probabilities)
            .enumerate()
            .map(|(idx, (label, probability))| {
                check_score(label, probability).map_err(|reason| {
                    error!(
                        "Model output rejected at row {} of input shape {:?}: {}",
                        idx, shape, reason
                    );
                    PredictionError::inference(reason)
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        debug!("Scored {} row(s)", scores.len());
        Ok(scores)
    }
}

fn rows_to_matrix(rows: &[FeatureRow]) -> Result<Array2<f64>, PredictionError> {
    let flat: Vec<f64> = rows.iter().flat_map(|row| row.to_vector()).collect();
    Array2::from_shape_vec((rows.len(), FEATURE_COUNT), flat)
        .map_err(|e| PredictionError::inference(format!("Matrix creation failed: {}", e)))
}

fn check_score(label: i64, probability: f64) -> Result<RowScore, String> {
    if !probability.is_finite() || !(0.0..=1.0).contains(&probability) {
        return Err(format!("probability {} outside [0, 1]", probability));
    }
    let class_label = match label {
        0 => 0u8,
        1 => 1u8,
        other => return Err(format!("unexpected class label {}", other)),
    };
    // At exactly the threshold either label is consistent: `predict` may break the
    // tie on the decision score (`> 0`) or on the probability (`>= 0.5`).
    let expected = u8::from(probability > DECISION_THRESHOLD);
    if probability != DECISION_THRESHOLD && class_label != expected {
        return Err(format!(
            "label {} disagrees with probability {:.4}",
            class_label, probability
        ));
    }
    Ok(RowScore {
        class_label,
        probability,
    })
}
