//! Pull-based observability for the prediction API
//!
//! Metrics are collected in-process and exposed in Prometheus text format
//! on `GET /metrics`.

pub mod metrics;

pub use metrics::Metrics;
