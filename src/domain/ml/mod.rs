pub mod confidence;
pub mod feature_registry;
pub mod types;

pub use confidence::Confidence;
pub use types::{BatchPrediction, FeatureRow, PredictionResult, RowScore};
