pub mod batch;
pub mod inference;
pub mod lifecycle;
pub mod service;

pub use batch::{BatchOrchestrator, MAX_BATCH_SIZE};
pub use inference::InferenceInvoker;
pub use lifecycle::{LoadState, ModelLifecycle};
pub use service::{HealthStatus, ModelInfo, PredictionService};
