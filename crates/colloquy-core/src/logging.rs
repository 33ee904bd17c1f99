//! Global tracing subscriber setup

use tracing_subscriber::EnvFilter;

use crate::config::LoggingConfig;
use crate::error::{ColloquyError, ColloquyResult};

/// Install a fmt subscriber for the process.
///
/// `RUST_LOG` takes precedence over `config.level`. Returns `Ok(false)` when a
/// global subscriber was already installed, which is left in place.
pub fn init_logging(config: &LoggingConfig) -> ColloquyResult<bool> {
    let filter = build_filter(config)?;
    let builder = tracing_subscriber::fmt().with_env_filter(filter);

    let installed = match config.format.as_str() {
        "json" => builder.json().try_init(),
        "compact" => builder.compact().try_init(),
        "pretty" => builder.pretty().try_init(),
        other => {
            return Err(ColloquyError::config(format!(
                "Invalid log format '{}'",
                other
            )));
        }
    };

    match installed {
        Ok(()) => {
            tracing::debug!(level = %config.level, format = %config.format, "logging initialised");
            Ok(true)
        }
        Err(_) => Ok(false),
    }
}

fn build_filter(config: &LoggingConfig) -> ColloquyResult<EnvFilter> {
    if let Ok(filter) = EnvFilter::try_from_default_env() {
        return Ok(filter);
    }
    EnvFilter::try_new(&config.level).map_err(|e| {
        ColloquyError::config_with_context(
            format!("Invalid log level '{}': {}", config.level, e),
            "Building the tracing filter",
        )
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_second_init_is_tolerated() {
        let config = LoggingConfig {
            level: "warn".to_string(),
            format: "compact".to_string(),
        };
        // the first call may lose to another test's subscriber
        let _ = init_logging(&config).unwrap();
        assert!(!init_logging(&config).unwrap());
    }

    #[test]
    fn test_unknown_format_rejected() {
        let config = LoggingConfig {
            level: "info".to_string(),
            format: "xml".to_string(),
        };
        assert!(init_logging(&config).is_err());
    }
}
