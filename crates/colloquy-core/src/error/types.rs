//! Core error types and traits

use thiserror::Error;

/// Result type alias for Colloquy operations
pub type ColloquyResult<T> = Result<T, ColloquyError>;

/// Unified error trait implemented by [`ColloquyError`].
///
/// - error_code(): unique code for programmatic identification
/// - message(): human-readable message
/// - context(): optional additional context
pub trait UnifiedError: std::error::Error + Send + Sync {
    /// Get the error code for programmatic handling
    fn error_code(&self) -> &str;

    /// Get the human-readable error message
    fn message(&self) -> &str;

    /// Get optional context about the error
    fn context(&self) -> Option<&str> {
        None
    }

    /// Check if this error is retryable
    fn is_retryable(&self) -> bool {
        false
    }
}

/// Main error type for Colloquy
#[derive(Error, Debug, Clone)]
pub enum ColloquyError {
    /// Configuration could not be read, parsed or validated
    #[error("Configuration error: {message}")]
    Config {
        message: String,
        context: Option<String>,
    },

    /// The message store could not serve a history read
    #[error("Storage error: {message}")]
    Storage {
        message: String,
        conversation_id: Option<String>,
        context: Option<String>,
    },

    /// The upstream model stream failed mid-flight
    #[error("Stream error: {message}")]
    Stream {
        message: String,
        context: Option<String>,
    },

    /// The client event sink is closed
    #[error("Client disconnected: {message}")]
    ClientGone { message: String },

    /// IO errors
    #[error("IO error: {message}")]
    Io {
        message: String,
        path: Option<String>,
        context: Option<String>,
    },

    /// JSON serialization/deserialization errors
    #[error("JSON error: {message}")]
    Json {
        message: String,
        context: Option<String>,
    },

    /// Invalid input errors
    #[error("Invalid input: {message}")]
    InvalidInput {
        message: String,
        field: Option<String>,
        context: Option<String>,
    },

    /// Operation was cancelled by the caller
    #[error("Operation was cancelled")]
    Cancelled,

    /// Generic error with context
    #[error("Error: {message}")]
    Other {
        message: String,
        context: Option<String>,
    },
}
