//! Configuration management
//!
//! Defaults, an optional TOML/YAML/JSON file, and `COLLOQUY_*` environment
//! overrides, validated before use.

pub mod env_loader;
pub mod file_loader;
pub mod loader;
pub mod logging_config;
pub mod model;
pub mod validation;

pub use loader::{CONFIG_FILE_NAME, ConfigLoader, ConfigSource, default_config_path, load_config};
pub use logging_config::LoggingConfig;
pub use model::ColloquyConfig;
pub use validation::ConfigValidator;
