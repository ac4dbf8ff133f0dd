// Inference pipeline: invoker, batch orchestration, model lifecycle, service facade
pub mod ml;
