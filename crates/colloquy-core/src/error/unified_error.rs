//! UnifiedError trait implementation for ColloquyError

use super::types::{ColloquyError, UnifiedError};

impl UnifiedError for ColloquyError {
    fn error_code(&self) -> &str {
        match self {
            Self::Config { .. } => "COLLOQUY_CONFIG",
            Self::Storage { .. } => "COLLOQUY_STORAGE",
            Self::Stream { .. } => "COLLOQUY_STREAM",
            Self::ClientGone { .. } => "COLLOQUY_CLIENT_GONE",
            Self::Io { .. } => "COLLOQUY_IO",
            Self::Json { .. } => "COLLOQUY_JSON",
            Self::InvalidInput { .. } => "COLLOQUY_INVALID_INPUT",
            Self::Cancelled => "COLLOQUY_CANCELLED",
            Self::Other { .. } => "COLLOQUY_OTHER",
        }
    }

    fn message(&self) -> &str {
        match self {
            Self::Config { message, .. } => message,
            Self::Storage { message, .. } => message,
            Self::Stream { message, .. } => message,
            Self::ClientGone { message } => message,
            Self::Io { message, .. } => message,
            Self::Json { message, .. } => message,
            Self::InvalidInput { message, .. } => message,
            Self::Cancelled => "Operation was cancelled",
            Self::Other { message, .. } => message,
        }
    }

    fn context(&self) -> Option<&str> {
        match self {
            Self::Config { context, .. } => context.as_deref(),
            Self::Storage { context, .. } => context.as_deref(),
            Self::Stream { context, .. } => context.as_deref(),
            Self::Io { context, .. } => context.as_deref(),
            Self::Json { context, .. } => context.as_deref(),
            Self::InvalidInput { context, .. } => context.as_deref(),
            Self::Other { context, .. } => context.as_deref(),
            Self::ClientGone { .. } | Self::Cancelled => None,
        }
    }

    fn is_retryable(&self) -> bool {
        matches!(self, Self::Storage { .. } | Self::Stream { .. })
    }
}
