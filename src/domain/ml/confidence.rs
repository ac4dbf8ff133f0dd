use serde::{Deserialize, Serialize};
use std::fmt;

/// Outside (HIGH_LOWER, HIGH_UPPER) a prediction is High confidence.
pub const HIGH_LOWER: f64 = 0.3;
pub const HIGH_UPPER: f64 = 0.7;
/// Outside (MEDIUM_LOWER, MEDIUM_UPPER) and not High, a prediction is Medium.
pub const MEDIUM_LOWER: f64 = 0.4;
pub const MEDIUM_UPPER: f64 = 0.6;

/// Coarse confidence band derived from the predicted probability alone
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Confidence {
    Low,
    Medium,
    High,
}

impl Confidence {
    /// Maps a probability to its band.
    ///
    /// Both comparisons are strict, so 0.3 and 0.7 land in Medium while 0.4 and 0.6
    /// land in Low. The bands are not symmetric around 0.5 at the edges; this matches
    /// the deployed behavior and is kept as-is pending product review.
    pub fn from_probability(probability: f64) -> Self {
        if probability < HIGH_LOWER || probability > HIGH_UPPER {
            Confidence::High
        } else if probability < MEDIUM_LOWER || probability > MEDIUM_UPPER {
            Confidence::Medium
        } else {
            Confidence::Low
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Confidence::Low => "Low",
            Confidence::Medium => "Medium",
            Confidence::High => "High",
        }
    }
}

impl fmt::Display for Confidence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
