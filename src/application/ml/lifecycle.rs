use crate::domain::errors::ModelLoadError;
use crate::domain::ports::ModelHandle;
use std::fmt;
use tracing::{error, info};

/// Load state of the process-wide model
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadState {
    Unloaded,
    Loading,
    Ready,
    /// Terminal. The process must not serve traffic.
    Failed,
}

impl fmt::Display for LoadState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            LoadState::Unloaded => "unloaded",
            LoadState::Loading => "loading",
            LoadState::Ready => "ready",
            LoadState::Failed => "failed",
        };
        f.write_str(label)
    }
}

/// Drives `Unloaded -> Loading -> Ready | Failed` exactly once.
pub struct ModelLifecycle {
    state: LoadState,
}

impl Default for ModelLifecycle {
    fn default() -> Self {
        Self::new()
    }
}

impl ModelLifecycle {
    pub fn new() -> Self {
        Self {
            state: LoadState::Unloaded,
        }
    }

    pub fn state(&self) -> LoadState {
        self.state
    }

    /// Runs `loader` and records the outcome. A second attempt is refused.
    pub fn load_with<F>(&mut self, loader: F) -> Result<ModelHandle, ModelLoadError>
    where
        F: FnOnce() -> Result<ModelHandle, ModelLoadError>,
    {
        if self.state != LoadState::Unloaded {
            return Err(ModelLoadError::AlreadyAttempted {
                state: self.state.to_string(),
            });
        }

        self.state = LoadState::Loading;
        info!("Loading model...");

        match loader() {
            Ok(handle) => {
                self.state = LoadState::Ready;
                info!(
                    "Model loaded successfully: {} ({} features)",
                    handle.model_type(),
                    handle.feature_names().len()
                );
                Ok(handle)
            }
            Err(e) => {
                self.state = LoadState::Failed;
                error!("Error loading model: {}", e);
                Err(e)
            }
        }
    }
}
