use crate::domain::errors::ClassifierError;
use crate::domain::ml::feature_registry;
use crate::domain::ports::Classifier;
use ndarray::Array2;
use std::sync::atomic::{AtomicUsize, Ordering};

#[derive(Debug, Clone)]
enum MockBehavior {
    /// Same label and probability for every row
    Constant { label: i64, probability: f64 },
    /// Every call fails with the given message
    Failing(String),
}

/// In-memory classifier for tests and local runs without a model artifact.
///
/// Counts `predict` calls so callers can assert that rejected requests never
/// reach the model.
#[derive(Debug)]
pub struct MockClassifier {
    behavior: MockBehavior,
    predict_calls: AtomicUsize,
}

impl MockClassifier {
    pub fn constant(label: i64, probability: f64) -> Self {
        Self {
            behavior: MockBehavior::Constant { label, probability },
            predict_calls: AtomicUsize::new(0),
        }
    }

    pub fn failing(message: impl Into<String>) -> Self {
        Self {
            behavior: MockBehavior::Failing(message.into()),
            predict_calls: AtomicUsize::new(0),
        }
    }

    pub fn predict_calls(&self) -> usize {
        self.predict_calls.load(Ordering::SeqCst)
    }
}

impl Classifier for MockClassifier {
    fn predict(&self, rows: &Array2<f64>) -> Result<Vec<i64>, ClassifierError> {
        self.predict_calls.fetch_add(1, Ordering::SeqCst);
        match &self.behavior {
            MockBehavior::Constant { label, .. } => Ok(vec![*label; rows.nrows()]),
            MockBehavior::Failing(message) => Err(ClassifierError::Other(message.clone())),
        }
    }

    fn predict_proba(&self, rows: &Array2<f64>) -> Result<Vec<f64>, ClassifierError> {
        match &self.behavior {
            MockBehavior::Constant { probability, .. } => Ok(vec![*probability; rows.nrows()]),
            MockBehavior::Failing(message) => Err(ClassifierError::Other(message.clone())),
        }
    }

    fn model_type(&self) -> &str {
        "Mock Classifier"
    }

    fn feature_names(&self) -> Vec<String> {
        feature_registry::feature_names()
    }
}
