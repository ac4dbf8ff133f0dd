use crate::domain::errors::ClassifierError;
use ndarray::Array2;
use std::sync::Arc;

/// Interface for a loaded binary classifier.
///
/// Rows arrive as an `n x 13` matrix in `FEATURE_NAMES` column order.
/// Implementations must be read-only after construction so a single instance
/// can serve concurrent requests without locking.
pub trait Classifier: Send + Sync {
    /// Predicted class label per row
    fn predict(&self, rows: &Array2<f64>) -> Result<Vec<i64>, ClassifierError>;

    /// Probability of the positive class (1) per row
    fn predict_proba(&self, rows: &Array2<f64>) -> Result<Vec<f64>, ClassifierError>;

    /// Human-readable model type label
    fn model_type(&self) -> &str;

    /// Feature names in the column order the model expects
    fn feature_names(&self) -> Vec<String>;
}

/// Process-wide, read-only handle to the loaded classifier
pub type ModelHandle = Arc<dyn Classifier>;
