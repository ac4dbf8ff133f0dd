use crate::domain::errors::ViolationReason;

/// Number of clinical features consumed by the classifier.
pub const FEATURE_COUNT: usize = 13;

/// Ordered list of feature names.
/// This order MUST match the column order the model artifact was fitted on.
/// Any change here is a breaking change for deployed models.
pub const FEATURE_NAMES: [&str; FEATURE_COUNT] = [
    "age", "sex", "cp", "trestbps", "chol", "fbs", "restecg", "thalach", "exang", "oldpeak",
    "slope", "ca", "thal",
];

/// Declared numeric type of a feature.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeatureKind {
    Real,
    Integer,
}

/// Closed numeric range a feature value must fall into.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FeatureBound {
    pub name: &'static str,
    pub kind: FeatureKind,
    pub min: f64,
    pub max: f64,
}

impl FeatureBound {
    /// Inclusive on both ends.
    pub fn contains(&self, value: f64) -> bool {
        value >= self.min && value <= self.max
    }

    /// Checks a parsed value against the declared type and range. Never clamps.
    pub fn check(&self, value: f64) -> Result<f64, ViolationReason> {
        if !value.is_finite() {
            return Err(ViolationReason::NotFinite);
        }
        if self.kind == FeatureKind::Integer && value.fract() != 0.0 {
            return Err(ViolationReason::NotInteger);
        }
        if !self.contains(value) {
            return Err(ViolationReason::OutOfRange {
                min: self.min,
                max: self.max,
            });
        }
        Ok(value)
    }
}

/// Input contract, one entry per feature, in `FEATURE_NAMES` order.
pub static FEATURE_BOUNDS: [FeatureBound; FEATURE_COUNT] = [
    FeatureBound {
        name: "age",
        kind: FeatureKind::Real,
        min: 0.0,
        max: 120.0,
    },
    FeatureBound {
        name: "sex",
        kind: FeatureKind::Real,
        min: 0.0,
        max: 1.0,
    },
    FeatureBound {
        name: "cp",
        kind: FeatureKind::Integer,
        min: 0.0,
        max: 3.0,
    },
    FeatureBound {
        name: "trestbps",
        kind: FeatureKind::Integer,
        min: 0.0,
        max: 300.0,
    },
    FeatureBound {
        name: "chol",
        kind: FeatureKind::Integer,
        min: 0.0,
        max: 600.0,
    },
    FeatureBound {
        name: "fbs",
        kind: FeatureKind::Integer,
        min: 0.0,
        max: 1.0,
    },
    FeatureBound {
        name: "restecg",
        kind: FeatureKind::Integer,
        min: 0.0,
        max: 2.0,
    },
    FeatureBound {
        name: "thalach",
        kind: FeatureKind::Integer,
        min: 0.0,
        max: 300.0,
    },
    FeatureBound {
        name: "exang",
        kind: FeatureKind::Integer,
        min: 0.0,
        max: 1.0,
    },
    FeatureBound {
        name: "oldpeak",
        kind: FeatureKind::Real,
        min: -10.0,
        max: 10.0,
    },
    FeatureBound {
        name: "slope",
        kind: FeatureKind::Integer,
        min: 0.0,
        max: 2.0,
    },
    FeatureBound {
        name: "ca",
        kind: FeatureKind::Integer,
        min: 0.0,
        max: 4.0,
    },
    FeatureBound {
        name: "thal",
        kind: FeatureKind::Integer,
        min: 0.0,
        max: 3.0,
    },
];

/// Feature names as owned strings, e.g. for model metadata responses.
pub fn feature_names() -> Vec<String> {
    FEATURE_NAMES.iter().map(|n| n.to_string()).collect()
}
