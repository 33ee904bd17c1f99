//! End-user facing error text
//!
//! The forwarder's `error` event is shown to the person chatting, so it must
//! not leak provider internals. Each error maps to a category and a short,
//! stable sentence.

use super::types::ColloquyError;

/// Error category for user-facing messages
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// Configuration issues
    Configuration,
    /// History could not be loaded
    Storage,
    /// The model stream broke off
    Upstream,
    /// The client went away
    Disconnected,
    /// Invalid caller input
    UserInput,
    /// User- or caller-initiated cancellation
    Cancellation,
    /// Everything else
    Internal,
}

impl ErrorCategory {
    /// Get a user-friendly category name
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Configuration => "Configuration Error",
            Self::Storage => "History Unavailable",
            Self::Upstream => "Model Stream Error",
            Self::Disconnected => "Client Disconnected",
            Self::UserInput => "Invalid Input",
            Self::Cancellation => "Cancelled",
            Self::Internal => "Internal Error",
        }
    }
}

impl ColloquyError {
    /// Get the category of this error
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::Config { .. } => ErrorCategory::Configuration,
            Self::Storage { .. } => ErrorCategory::Storage,
            Self::Stream { .. } => ErrorCategory::Upstream,
            Self::ClientGone { .. } => ErrorCategory::Disconnected,
            Self::InvalidInput { .. } => ErrorCategory::UserInput,
            Self::Cancelled => ErrorCategory::Cancellation,
            Self::Io { .. } | Self::Json { .. } | Self::Other { .. } => ErrorCategory::Internal,
        }
    }

    /// Sentence shown to the end user for this turn
    pub fn user_message(&self) -> String {
        match self {
            Self::Stream { .. } => {
                "The response was interrupted before it finished. Please try again.".to_string()
            }
            Self::Storage { .. } => {
                "Earlier messages could not be loaded; replying with limited context.".to_string()
            }
            Self::Cancelled => "The response was cancelled.".to_string(),
            Self::InvalidInput { message, .. } => format!("Invalid request: {}", message),
            _ => "Something went wrong while generating the response.".to_string(),
        }
    }
}
