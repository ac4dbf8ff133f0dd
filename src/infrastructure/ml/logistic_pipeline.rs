use crate::domain::errors::{ClassifierError, ModelLoadError};
use crate::domain::ml::feature_registry::{FEATURE_COUNT, FEATURE_NAMES};
use crate::domain::ports::Classifier;
use ndarray::{Array1, Array2};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;
use tracing::info;

/// Per-feature standardisation fitted at training time
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StandardScaler {
    pub mean: Vec<f64>,
    pub scale: Vec<f64>,
}

/// Standard scaler followed by a logistic regression, loaded from a JSON artifact.
///
/// ```json
/// {
///   "model_type": "Logistic Regression Pipeline",
///   "feature_names": ["age", "sex", ...],
///   "scaler": { "mean": [...], "scale": [...] },
///   "coefficients": [...],
///   "intercept": -0.42
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogisticPipeline {
    model_type: String,
    feature_names: Vec<String>,
    scaler: StandardScaler,
    coefficients: Vec<f64>,
    intercept: f64,
}

impl LogisticPipeline {
    pub fn new(
        model_type: impl Into<String>,
        scaler: StandardScaler,
        coefficients: Vec<f64>,
        intercept: f64,
    ) -> Result<Self, ModelLoadError> {
        let pipeline = Self {
            model_type: model_type.into(),
            feature_names: FEATURE_NAMES.iter().map(|n| n.to_string()).collect(),
            scaler,
            coefficients,
            intercept,
        };
        pipeline.validate()?;
        Ok(pipeline)
    }

    /// Loads and validates the artifact at `path`.
    pub fn load(path: &Path) -> Result<Self, ModelLoadError> {
        if !path.exists() {
            return Err(ModelLoadError::NotFound {
                path: path.to_path_buf(),
            });
        }

        let file = File::open(path).map_err(|source| ModelLoadError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let pipeline = Self::from_reader(BufReader::new(file))?;
        info!("Loaded model artifact from {:?}", path);
        Ok(pipeline)
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Self, ModelLoadError> {
        let pipeline: Self = serde_json::from_reader(reader)?;
        pipeline.validate()?;
        Ok(pipeline)
    }

    pub fn from_json_str(json: &str) -> Result<Self, ModelLoadError> {
        let pipeline: Self = serde_json::from_str(json)?;
        pipeline.validate()?;
        Ok(pipeline)
    }

    fn validate(&self) -> Result<(), ModelLoadError> {
        let invalid = |reason: String| Err(ModelLoadError::InvalidArtifact { reason });

        if self.feature_names.len() != FEATURE_COUNT
            || self
                .feature_names
                .iter()
                .zip(FEATURE_NAMES.iter())
                .any(|(a, b)| a != b)
        {
            return invalid(format!(
                "feature_names must be {:?}, got {:?}",
                FEATURE_NAMES, self.feature_names
            ));
        }

        for (label, values) in [
            ("scaler.mean", &self.scaler.mean),
            ("scaler.scale", &self.scaler.scale),
            ("coefficients", &self.coefficients),
        ] {
            if values.len() != FEATURE_COUNT {
                return invalid(format!(
                    "{} has {} entries, expected {}",
                    label,
                    values.len(),
                    FEATURE_COUNT
                ));
            }
            if values.iter().any(|v| !v.is_finite()) {
                return invalid(format!("{} contains non-finite values", label));
            }
        }

        if self.scaler.scale.iter().any(|s| *s == 0.0) {
            return invalid("scaler.scale contains zero entries".to_string());
        }
        if !self.intercept.is_finite() {
            return invalid("intercept is not finite".to_string());
        }
        Ok(())
    }

    /// Linear score per row after standardisation
    fn decision_function(&self, rows: &Array2<f64>) -> Result<Array1<f64>, ClassifierError> {
        if rows.ncols() != FEATURE_COUNT {
            return Err(ClassifierError::ShapeMismatch {
                expected: FEATURE_COUNT,
                actual: rows.ncols(),
            });
        }

        let mean = Array1::from(self.scaler.mean.clone());
        let scale = Array1::from(self.scaler.scale.clone());
        let coefficients = Array1::from(self.coefficients.clone());

        let mut standardized = rows.to_owned();
        for mut row in standardized.rows_mut() {
            row -= &mean;
            row /= &scale;
        }

        let scores = standardized.dot(&coefficients) + self.intercept;
        if scores.iter().any(|s| !s.is_finite()) {
            return Err(ClassifierError::Numeric(
                "non-finite decision score".to_string(),
            ));
        }
        Ok(scores)
    }
}

fn sigmoid(z: f64) -> f64 {
    if z >= 0.0 {
        1.0 / (1.0 + (-z).exp())
    } else {
        let e = z.exp();
        e / (1.0 + e)
    }
}

impl Classifier for LogisticPipeline {
    fn predict(&self, rows: &Array2<f64>) -> Result<Vec<i64>, ClassifierError> {
        Ok(self
            .predict_proba(rows)?
            .into_iter()
            .map(|p| i64::from(p >= 0.5))
            .collect())
    }

    fn predict_proba(&self, rows: &Array2<f64>) -> Result<Vec<f64>, ClassifierError> {
        Ok(self
            .decision_function(rows)?
            .iter()
            .map(|z| sigmoid(*z))
            .collect())
    }

    fn model_type(&self) -> &str {
        &self.model_type
    }

    fn feature_names(&self) -> Vec<String> {
        self.feature_names.clone()
    }
}
