//! Constructor methods for ColloquyError

use super::types::ColloquyError;

impl ColloquyError {
    /// Create a new configuration error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
            context: None,
        }
    }

    /// Create a configuration error with context
    pub fn config_with_context(message: impl Into<String>, context: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
            context: Some(context.into()),
        }
    }

    /// Create a new storage error
    pub fn storage(message: impl Into<String>) -> Self {
        Self::Storage {
            message: message.into(),
            conversation_id: None,
            context: None,
        }
    }

    /// Create a storage error for a specific conversation
    pub fn storage_for(message: impl Into<String>, conversation_id: impl Into<String>) -> Self {
        Self::Storage {
            message: message.into(),
            conversation_id: Some(conversation_id.into()),
            context: None,
        }
    }

    /// Create a new upstream stream error
    pub fn stream(message: impl Into<String>) -> Self {
        Self::Stream {
            message: message.into(),
            context: None,
        }
    }

    /// Create a stream error with context
    pub fn stream_with_context(message: impl Into<String>, context: impl Into<String>) -> Self {
        Self::Stream {
            message: message.into(),
            context: Some(context.into()),
        }
    }

    /// Create a client-disconnected error
    pub fn client_gone(message: impl Into<String>) -> Self {
        Self::ClientGone {
            message: message.into(),
        }
    }

    /// Create a new IO error
    pub fn io(message: impl Into<String>) -> Self {
        Self::Io {
            message: message.into(),
            path: None,
            context: None,
        }
    }

    /// Create an IO error with path
    pub fn io_with_path(message: impl Into<String>, path: impl Into<String>) -> Self {
        Self::Io {
            message: message.into(),
            path: Some(path.into()),
            context: None,
        }
    }

    /// Create a new JSON error
    pub fn json(message: impl Into<String>) -> Self {
        Self::Json {
            message: message.into(),
            context: None,
        }
    }

    /// Create a new invalid input error
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput {
            message: message.into(),
            field: None,
            context: None,
        }
    }

    /// Create an invalid input error for a named field
    pub fn invalid_field(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidInput {
            message: message.into(),
            field: Some(field.into()),
            context: None,
        }
    }

    /// Create a generic error
    pub fn other(message: impl Into<String>) -> Self {
        Self::Other {
            message: message.into(),
            context: None,
        }
    }

    /// Attach context to an existing error
    pub fn with_context(self, ctx: impl Into<String>) -> Self {
        let ctx = Some(ctx.into());
        match self {
            Self::Config { message, .. } => Self::Config {
                message,
                context: ctx,
            },
            Self::Storage {
                message,
                conversation_id,
                ..
            } => Self::Storage {
                message,
                conversation_id,
                context: ctx,
            },
            Self::Stream { message, .. } => Self::Stream {
                message,
                context: ctx,
            },
            Self::Io { message, path, .. } => Self::Io {
                message,
                path,
                context: ctx,
            },
            Self::Json { message, .. } => Self::Json {
                message,
                context: ctx,
            },
            Self::InvalidInput { message, field, .. } => Self::InvalidInput {
                message,
                field,
                context: ctx,
            },
            Self::Other { message, .. } => Self::Other {
                message,
                context: ctx,
            },
            other @ (Self::ClientGone { .. } | Self::Cancelled) => other,
        }
    }
}
