//! Error types for the storecast core pipeline

use thiserror::Error;

/// Errors that can occur in the core prediction pipeline
#[derive(Error, Debug)]
pub enum ForecastError {
    /// Input record violates the expected schema or value ranges
    #[error("malformed record: {0}")]
    MalformedRecord(String),

    /// Assembled feature vector does not match the model's schema
    #[error("feature schema mismatch: expected {expected} columns, got {actual}")]
    SchemaMismatch { expected: usize, actual: usize },

    /// Underlying model evaluation failed
    #[error("inference failed: {0}")]
    Inference(String),

    /// Artifact reload failed; the previous model keeps serving
    #[error("model reload failed: {0}")]
    Reload(String),

    /// Artifact structure failed validation at load time
    #[error("model validation failed: {0}")]
    Validation(String),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Result type for core operations
pub type Result<T> = std::result::Result<T, ForecastError>;
