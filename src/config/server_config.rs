//! HTTP server configuration parsing from environment variables.

use anyhow::{Context, Result, bail};

/// Server environment configuration
#[derive(Debug, Clone)]
pub struct ServerEnvConfig {
    pub bind_address: String,
    pub port: u16,
    pub request_timeout_secs: u64,
}

impl Default for ServerEnvConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0".to_string(),
            port: 8000,
            request_timeout_secs: 30,
        }
    }
}

impl ServerEnvConfig {
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let port = match lookup("SERVER_PORT") {
            Some(raw) => raw
                .trim()
                .parse::<u16>()
                .context(format!("Failed to parse SERVER_PORT: {}", raw))?,
            None => defaults.port,
        };

        let request_timeout_secs = match lookup("REQUEST_TIMEOUT_SECS") {
            Some(raw) => raw
                .trim()
                .parse::<u64>()
                .context(format!("Failed to parse REQUEST_TIMEOUT_SECS: {}", raw))?,
            None => defaults.request_timeout_secs,
        };
        if request_timeout_secs == 0 {
            bail!("REQUEST_TIMEOUT_SECS must be greater than 0");
        }

        Ok(Self {
            bind_address: lookup("SERVER_BIND_ADDRESS").unwrap_or(defaults.bind_address),
            port,
            request_timeout_secs,
        })
    }
}
