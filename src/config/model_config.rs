//! Model artifact configuration parsing from environment variables.

use std::path::PathBuf;

pub const DEFAULT_MODEL_PATH: &str = "logistic_pipeline_model.json";

/// Model environment configuration
#[derive(Debug, Clone)]
pub struct ModelEnvConfig {
    pub model_path: PathBuf,
}

impl ModelEnvConfig {
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let model_path = lookup("MODEL_PATH")
            .filter(|p| !p.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_MODEL_PATH.to_string());
        Self {
            model_path: PathBuf::from(model_path),
        }
    }
}
