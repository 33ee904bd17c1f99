//! Layered configuration loading

use std::path::{Path, PathBuf};

use super::env_loader::apply_env_with;
use super::file_loader::load_from_file;
use super::model::ColloquyConfig;
use super::validation::ConfigValidator;
use crate::error::ColloquyResult;

/// Default config file name inside the per-user config directory
pub const CONFIG_FILE_NAME: &str = "config.toml";

/// `<config dir>/colloquy/config.toml`, if the platform has a config dir
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("colloquy").join(CONFIG_FILE_NAME))
}

/// Source of configuration data
#[derive(Debug, Clone)]
pub enum ConfigSource {
    /// Configuration from a file
    File(PathBuf),
    /// `COLLOQUY_*` environment variables
    Environment,
    /// Default configuration
    Default,
}

type EnvLookup = Box<dyn Fn(&str) -> Option<String> + Send + Sync>;

/// Configuration loader with support for multiple sources.
///
/// Sources apply in the order added. A file replaces everything before it,
/// with unset fields taking their defaults; environment variables override
/// single fields. The result is validated once at the end.
pub struct ConfigLoader {
    sources: Vec<ConfigSource>,
    env_lookup: EnvLookup,
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigLoader {
    /// Create a new config loader
    pub fn new() -> Self {
        Self {
            sources: Vec::new(),
            env_lookup: Box::new(|key| std::env::var(key).ok()),
        }
    }

    /// Add a configuration source
    pub fn add_source(mut self, source: ConfigSource) -> Self {
        self.sources.push(source);
        self
    }

    /// Add a file source
    pub fn with_file<P: AsRef<Path>>(self, path: P) -> Self {
        self.add_source(ConfigSource::File(path.as_ref().to_path_buf()))
    }

    /// Add environment variables source
    pub fn with_env(self) -> Self {
        self.add_source(ConfigSource::Environment)
    }

    /// Add default configuration source
    pub fn with_defaults(self) -> Self {
        self.add_source(ConfigSource::Default)
    }

    /// Read environment variables through `lookup` instead of the process env
    pub fn with_env_lookup<F>(mut self, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String> + Send + Sync + 'static,
    {
        self.env_lookup = Box::new(lookup);
        self
    }

    /// Load configuration from all sources
    pub fn load(self) -> ColloquyResult<ColloquyConfig> {
        let mut config = ColloquyConfig::default();

        for source in &self.sources {
            match source {
                ConfigSource::Default => {
                    tracing::debug!("Loading default config");
                    config = ColloquyConfig::default();
                }
                ConfigSource::File(path) => {
                    tracing::debug!("Loading config from file: {}", path.display());
                    config = load_from_file(path)?;
                }
                ConfigSource::Environment => {
                    tracing::debug!("Applying environment overrides");
                    apply_env_with(&mut config, &self.env_lookup)?;
                }
            }
        }

        ConfigValidator::validate(&config)?;
        Ok(config)
    }
}

/// Defaults, then the file at `path` (or the default location), then the
/// environment
pub fn load_config(path: Option<&Path>) -> ColloquyResult<ColloquyConfig> {
    let mut loader = ConfigLoader::new().with_defaults();
    match path.map(Path::to_path_buf).or_else(default_config_path) {
        Some(file) => loader = loader.with_file(file),
        None => tracing::debug!("no config directory on this platform, skipping config file"),
    }
    loader.with_env().load()
}
