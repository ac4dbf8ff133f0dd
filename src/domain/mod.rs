// Feature schema, scores and confidence bands
pub mod ml;

// Port interfaces
pub mod ports;

// Input contract enforcement
pub mod validation;

// Domain-specific error types
pub mod errors;
