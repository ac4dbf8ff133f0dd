//! Configuration module for the prediction service.
//!
//! This module provides structured configuration loading from environment variables,
//! organized by concern: Server, Model, and Observability.

mod model_config;
mod observability_config;
mod server_config;

pub use model_config::{DEFAULT_MODEL_PATH, ModelEnvConfig};
pub use observability_config::ObservabilityEnvConfig;
pub use server_config::ServerEnvConfig;

use anyhow::{Context, Result};
use std::env;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

/// Main application configuration.
#[derive(Debug, Clone)]
pub struct Config {
    // Model
    pub model_path: PathBuf,

    // Server
    pub bind_address: String,
    pub port: u16,
    pub request_timeout_secs: u64,

    // Observability
    pub observability_enabled: bool,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration through an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let model = ModelEnvConfig::from_lookup(&lookup);
        let server = ServerEnvConfig::from_lookup(&lookup).context("Failed to load server config")?;
        let observability = ObservabilityEnvConfig::from_lookup(&lookup);

        Ok(Self {
            model_path: model.model_path,

            bind_address: server.bind_address,
            port: server.port,
            request_timeout_secs: server.request_timeout_secs,

            observability_enabled: observability.enabled,
        })
    }

    pub fn socket_addr(&self) -> Result<SocketAddr> {
        format!("{}:{}", self.bind_address, self.port)
            .parse::<SocketAddr>()
            .context(format!(
                "Invalid SERVER_BIND_ADDRESS/SERVER_PORT: {}:{}",
                self.bind_address, self.port
            ))
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}
