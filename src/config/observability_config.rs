//! Observability configuration parsing from environment variables.

/// Observability environment configuration
#[derive(Debug, Clone)]
pub struct ObservabilityEnvConfig {
    pub enabled: bool,
}

impl Default for ObservabilityEnvConfig {
    fn default() -> Self {
        Self { enabled: true }
    }
}

impl ObservabilityEnvConfig {
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        Self {
            enabled: lookup("OBSERVABILITY_ENABLED")
                .unwrap_or_else(|| "true".to_string())
                .parse::<bool>()
                .unwrap_or(true),
        }
    }
}
