//! Prometheus metrics definitions for the prediction service
//!
//! All metrics use the `hypertension_` prefix.

use prometheus::{
    CounterVec, Gauge, HistogramOpts, HistogramVec, Opts, Registry, TextEncoder,
    core::{AtomicF64, GenericGauge},
};
use std::sync::Arc;

/// Prometheus metrics for the prediction API
#[derive(Clone)]
pub struct Metrics {
    registry: Arc<Registry>,
    /// Requests by endpoint and outcome (ok or error kind)
    pub requests_total: CounterVec,
    /// Predicted rows by class label
    pub predictions_total: CounterVec,
    /// Predicted rows by confidence band
    pub confidence_total: CounterVec,
    /// Time spent in validation + inference, per endpoint
    pub inference_latency_seconds: HistogramVec,
    /// Model loaded (1) or not (0)
    pub model_loaded: GenericGauge<AtomicF64>,
}

impl Metrics {
    /// Create a new Metrics instance with all gauges and counters registered
    pub fn new() -> anyhow::Result<Self> {
        let registry = Registry::new();

        let requests_total = CounterVec::new(
            Opts::new(
                "hypertension_requests_total",
                "Total API requests by endpoint and outcome",
            ),
            &["endpoint", "outcome"],
        )?;
        registry.register(Box::new(requests_total.clone()))?;

        let predictions_total = CounterVec::new(
            Opts::new(
                "hypertension_predictions_total",
                "Total predicted rows by class label",
            ),
            &["class"],
        )?;
        registry.register(Box::new(predictions_total.clone()))?;

        let confidence_total = CounterVec::new(
            Opts::new(
                "hypertension_confidence_total",
                "Total predicted rows by confidence band",
            ),
            &["band"],
        )?;
        registry.register(Box::new(confidence_total.clone()))?;

        let inference_latency_seconds = HistogramVec::new(
            HistogramOpts::new(
                "hypertension_inference_latency_seconds",
                "Validation and inference latency in seconds",
            )
            .buckets(vec![
                0.0005, 0.001, 0.0025, 0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0,
            ]),
            &["endpoint"],
        )?;
        registry.register(Box::new(inference_latency_seconds.clone()))?;

        let model_loaded = Gauge::with_opts(Opts::new(
            "hypertension_model_loaded",
            "Model loaded (1) or not (0)",
        ))?;
        registry.register(Box::new(model_loaded.clone()))?;

        Ok(Self {
            registry: Arc::new(registry),
            requests_total,
            predictions_total,
            confidence_total,
            inference_latency_seconds,
            model_loaded,
        })
    }

    /// Render all metrics in Prometheus text format
    pub fn render(&self) -> String {
        let encoder = TextEncoder::new();
        let metric_families = self.registry.gather();
        encoder
            .encode_to_string(&metric_families)
            .unwrap_or_default()
    }

    pub fn set_model_loaded(&self, loaded: bool) {
        self.model_loaded.set(if loaded { 1.0 } else { 0.0 });
    }

    /// Increment request counter
    pub fn inc_requests(&self, endpoint: &str, outcome: &str) {
        self.requests_total
            .with_label_values(&[endpoint, outcome])
            .inc();
    }

    /// Count one predicted row
    pub fn record_prediction(&self, class_label: u8, band: &str) {
        self.predictions_total
            .with_label_values(&[class_label.to_string().as_str()])
            .inc();
        self.confidence_total.with_label_values(&[band]).inc();
    }

    /// Observe inference latency
    pub fn observe_latency(&self, endpoint: &str, latency: f64) {
        self.inference_latency_seconds
            .with_label_values(&[endpoint])
            .observe(latency);
    }
}
