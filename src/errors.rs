//! Error types for AskBuddy
//!
//! Provider failures are collapsed into "no answer" by the provider chain,
//! so these variants mostly surface from the store, configuration and CLI.

use thiserror::Error;

/// Main error type for the AskBuddy answer pipeline
#[derive(Error, Debug)]
pub enum AskError {
    /// Response store could not be read or written
    #[error("Response store error at {path}: {reason}")]
    StoreError { path: String, reason: String },

    /// Knowledge provider failures (network, status, malformed body)
    #[error("Provider {provider} failed: {message}")]
    ProviderError { provider: String, message: String },

    /// JSON parsing errors
    #[error("JSON parse error: {0}")]
    JsonParseError(String),

    /// HTTP client errors
    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    /// Serialization errors
    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    /// I/O errors
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Timeout errors
    #[error("Operation timed out after {duration_ms}ms")]
    Timeout { duration_ms: u64 },

    /// Speech input/output errors
    #[error("Speech error: {0}")]
    SpeechError(String),

    /// Generic errors with context
    #[error("AskBuddy error: {0}")]
    Generic(String),
}

impl AskError {
    /// Build a provider error from anything displayable
    pub fn provider(provider: &str, message: impl std::fmt::Display) -> Self {
        AskError::ProviderError {
            provider: provider.to_string(),
            message: message.to_string(),
        }
    }

    /// Build a store error for the given path
    pub fn store(path: &std::path::Path, reason: impl std::fmt::Display) -> Self {
        AskError::StoreError {
            path: path.display().to_string(),
            reason: reason.to_string(),
        }
    }
}

/// Result type alias for AskBuddy operations
pub type Result<T> = std::result::Result<T, AskError>;

/// Convert anyhow errors to AskError
impl From<anyhow::Error> for AskError {
    fn from(err: anyhow::Error) -> Self {
        AskError::Generic(err.to_string())
    }
}
