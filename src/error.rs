//! Error types for the agllm feedback pipeline
//!
//! Every failure that reaches this enum is fatal to the run. Recoverable
//! conditions (undecodable source files, missing prompt templates) are
//! handled where they occur and only logged.

use thiserror::Error;

/// Main error type for agllm operations
#[derive(Error, Debug)]
pub enum AgllmError {
    /// Bad invocation or missing required input
    #[error("Usage error: {0}")]
    Usage(String),

    /// Database operation failed
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// Generation endpoint answered with a failure or an unusable body
    #[error("LLM API error: {0}")]
    LlmApi(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// HTTP request error
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Generic error with context
    #[error("{0}")]
    Other(String),
}

/// Result type alias for agllm operations
pub type Result<T> = std::result::Result<T, AgllmError>;

/// Convert anyhow::Error to AgllmError
impl From<anyhow::Error> for AgllmError {
    fn from(err: anyhow::Error) -> Self {
        AgllmError::Other(err.to_string())
    }
}
