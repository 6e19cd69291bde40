//! Error types for spk-model

use thiserror::Error;

/// Result type for spk-model operations
pub type Result<T> = std::result::Result<T, ModelError>;

/// spk-model error types
#[derive(Error, Debug)]
pub enum ModelError {
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Tensor error: {0}")]
    Tensor(#[from] candle_core::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
