//! Configuration validation

use super::logging_config::{LOG_FORMATS, LOG_LEVELS};
use super::model::ColloquyConfig;
use crate::error::{ColloquyError, ColloquyResult};

/// Configuration validator
pub struct ConfigValidator;

impl ConfigValidator {
    /// Validate a complete configuration
    ///
    /// # Errors
    ///
    /// Returns a `Config` error naming the first offending field.
    pub fn validate(config: &ColloquyConfig) -> ColloquyResult<()> {
        Self::validate_context(config)?;
        Self::validate_stream(config)?;
        Self::validate_logging(config)?;
        Ok(())
    }

    /// Budgets, floors and summary settings
    pub fn validate_context(config: &ColloquyConfig) -> ColloquyResult<()> {
        let context = &config.context;
        if context.max_tokens == 0 {
            return Err(ColloquyError::config("context.max_tokens must be greater than 0"));
        }
        if context.max_messages == 0 {
            return Err(ColloquyError::config("context.max_messages must be greater than 0"));
        }

        let summary = &context.summary;
        if !(summary.budget_ratio > 0.0 && summary.budget_ratio <= 1.0) {
            return Err(ColloquyError::config(format!(
                "context.summary.budget_ratio must be in (0, 1], got {}",
                summary.budget_ratio
            )));
        }
        if summary.max_length == 0 {
            return Err(ColloquyError::config(
                "context.summary.max_length must be greater than 0",
            ));
        }
        if summary.recent_messages == 0 {
            return Err(ColloquyError::config(
                "context.summary.recent_messages must be greater than 0",
            ));
        }
        if context.priority.floor_message_token_cap == Some(0) {
            return Err(ColloquyError::config(
                "context.priority.floor_message_token_cap must be greater than 0 when set",
            ));
        }
        Ok(())
    }

    /// Thinking tags
    pub fn validate_stream(config: &ColloquyConfig) -> ColloquyResult<()> {
        config
            .stream
            .delimiters()
            .map(|_| ())
            .map_err(|e| ColloquyError::config_with_context(e.to_string(), "Validating [stream] tags"))
    }

    /// Log level and format
    pub fn validate_logging(config: &ColloquyConfig) -> ColloquyResult<()> {
        if !LOG_LEVELS.contains(&config.logging.level.as_str()) {
            return Err(ColloquyError::config(format!(
                "Invalid log level '{}'. Valid levels are: {:?}",
                config.logging.level, LOG_LEVELS
            )));
        }
        if !LOG_FORMATS.contains(&config.logging.format.as_str()) {
            return Err(ColloquyError::config(format!(
                "Invalid log format '{}'. Valid formats are: {:?}",
                config.logging.format, LOG_FORMATS
            )));
        }
        Ok(())
    }
}
