//! Environment variable overrides

use std::env;
use std::str::FromStr;

use super::model::ColloquyConfig;
use crate::error::{ColloquyError, ColloquyResult};

pub const ENV_MAX_TOKENS: &str = "COLLOQUY_MAX_TOKENS";
pub const ENV_MAX_MESSAGES: &str = "COLLOQUY_MAX_MESSAGES";
pub const ENV_CONTEXT_POLICY: &str = "COLLOQUY_CONTEXT_POLICY";
pub const ENV_THINK_OPEN: &str = "COLLOQUY_THINK_OPEN";
pub const ENV_THINK_CLOSE: &str = "COLLOQUY_THINK_CLOSE";
pub const ENV_DISCONNECT_POLICY: &str = "COLLOQUY_DISCONNECT_POLICY";
pub const ENV_LOG_LEVEL: &str = "COLLOQUY_LOG_LEVEL";
pub const ENV_LOG_FORMAT: &str = "COLLOQUY_LOG_FORMAT";

/// Apply `COLLOQUY_*` variables from the process environment
pub fn apply_env(config: &mut ColloquyConfig) -> ColloquyResult<()> {
    apply_env_with(config, |key| env::var(key).ok())
}

/// Apply overrides using `lookup` as the variable source
pub fn apply_env_with<F>(config: &mut ColloquyConfig, lookup: F) -> ColloquyResult<()>
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(value) = lookup(ENV_MAX_TOKENS) {
        config.context.max_tokens = parse_var(ENV_MAX_TOKENS, &value)?;
    }
    if let Some(value) = lookup(ENV_MAX_MESSAGES) {
        config.context.max_messages = parse_var(ENV_MAX_MESSAGES, &value)?;
    }
    if let Some(value) = lookup(ENV_CONTEXT_POLICY) {
        config.context.default_policy = parse_var(ENV_CONTEXT_POLICY, &value)?;
    }
    if let Some(value) = lookup(ENV_THINK_OPEN) {
        config.stream.open_tag = value;
    }
    if let Some(value) = lookup(ENV_THINK_CLOSE) {
        config.stream.close_tag = value;
    }
    if let Some(value) = lookup(ENV_DISCONNECT_POLICY) {
        config.stream.disconnect_policy = parse_var(ENV_DISCONNECT_POLICY, &value)?;
    }
    if let Some(value) = lookup(ENV_LOG_LEVEL) {
        config.logging.level = value.trim().to_lowercase();
    }
    if let Some(value) = lookup(ENV_LOG_FORMAT) {
        config.logging.format = value.trim().to_lowercase();
    }
    Ok(())
}

fn parse_var<T>(key: &str, value: &str) -> ColloquyResult<T>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    value.trim().parse::<T>().map_err(|e| {
        ColloquyError::config_with_context(
            format!("Invalid {} value '{}'", key, value),
            e.to_string(),
        )
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::SelectionPolicy;
    use crate::stream::DisconnectPolicy;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| vars.get(key).cloned()
    }

    #[test]
    fn test_overrides_apply() {
        let mut config = ColloquyConfig::default();
        apply_env_with(
            &mut config,
            lookup(&[
                (ENV_MAX_TOKENS, "2048"),
                (ENV_MAX_MESSAGES, " 20 "),
                (ENV_CONTEXT_POLICY, "priority"),
                (ENV_THINK_OPEN, "<r>"),
                (ENV_THINK_CLOSE, "</r>"),
                (ENV_DISCONNECT_POLICY, "abort"),
                (ENV_LOG_LEVEL, "DEBUG"),
                (ENV_LOG_FORMAT, "json"),
            ]),
        )
        .unwrap();

        assert_eq!(config.context.max_tokens, 2_048);
        assert_eq!(config.context.max_messages, 20);
        assert_eq!(config.context.default_policy, SelectionPolicy::Priority);
        assert_eq!(config.stream.open_tag, "<r>");
        assert_eq!(config.stream.close_tag, "</r>");
        assert_eq!(config.stream.disconnect_policy, DisconnectPolicy::Abort);
        assert_eq!(config.logging.level, "debug");
        assert_eq!(config.logging.format, "json");
    }

    #[test]
    fn test_unset_vars_leave_config_alone() {
        let mut config = ColloquyConfig::default();
        apply_env_with(&mut config, lookup(&[])).unwrap();
        assert_eq!(config, ColloquyConfig::default());
    }

    #[test]
    fn test_bad_number_is_config_error() {
        let mut config = ColloquyConfig::default();
        let err = apply_env_with(&mut config, lookup(&[(ENV_MAX_TOKENS, "lots")])).unwrap_err();
        assert!(matches!(err, ColloquyError::Config { .. }));
        assert!(err.to_string().contains(ENV_MAX_TOKENS));
    }

    #[test]
    fn test_parse_var_typed() {
        assert_eq!(parse_var::<usize>(ENV_MAX_MESSAGES, " 12\n").unwrap(), 12);
        assert_eq!(
            parse_var::<SelectionPolicy>(ENV_CONTEXT_POLICY, "summary").unwrap(),
            SelectionPolicy::Summarized
        );

        let err = parse_var::<usize>(ENV_MAX_MESSAGES, "-3").unwrap_err();
        match err {
            ColloquyError::Config { message, context } => {
                assert!(message.contains("'-3'"));
                assert!(context.is_some());
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }
}
