// Axum HTTP API
pub mod http;
