//! From trait implementations for ColloquyError conversions

use super::types::ColloquyError;

impl From<anyhow::Error> for ColloquyError {
    fn from(error: anyhow::Error) -> Self {
        Self::other(error.to_string())
    }
}

impl From<std::io::Error> for ColloquyError {
    fn from(error: std::io::Error) -> Self {
        Self::io(error.to_string())
    }
}

impl From<serde_json::Error> for ColloquyError {
    fn from(error: serde_json::Error) -> Self {
        Self::json(error.to_string())
    }
}

impl From<toml::de::Error> for ColloquyError {
    fn from(error: toml::de::Error) -> Self {
        Self::config_with_context(error.to_string(), "Deserializing TOML configuration")
    }
}

impl From<serde_yaml::Error> for ColloquyError {
    fn from(error: serde_yaml::Error) -> Self {
        Self::config_with_context(error.to_string(), "Deserializing YAML configuration")
    }
}

impl<T> From<tokio::sync::mpsc::error::SendError<T>> for ColloquyError {
    fn from(_: tokio::sync::mpsc::error::SendError<T>) -> Self {
        Self::client_gone("event receiver dropped")
    }
}
