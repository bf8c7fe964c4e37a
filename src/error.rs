//! Error types for the Anamnesis notes client
//!
//! This module provides error handling using thiserror for structured error
//! definitions and anyhow for error propagation at the edges.

use thiserror::Error;

/// Main error type for Anamnesis operations
#[derive(Error, Debug)]
pub enum AnamnesisError {
    /// Backend rejected a request with a non-success status
    #[error("Backend error: {0}")]
    Backend(String),

    /// HTTP request error
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Active-window probe failed
    #[error("Context probe error: {0}")]
    ContextProbe(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Control-socket communication failed
    #[error("IPC error: {0}")]
    Ipc(String),

    /// Generic error with context
    #[error("{0}")]
    Other(String),
}

/// Result type alias for Anamnesis operations
pub type Result<T> = std::result::Result<T, AnamnesisError>;

/// Convert anyhow::Error to AnamnesisError
impl From<anyhow::Error> for AnamnesisError {
    fn from(err: anyhow::Error) -> Self {
        AnamnesisError::Other(err.to_string())
    }
}
