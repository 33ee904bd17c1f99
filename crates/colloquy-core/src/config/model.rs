//! Top-level configuration model

use serde::{Deserialize, Serialize};

use super::logging_config::LoggingConfig;
use crate::context::ContextConfig;
use crate::stream::StreamConfig;

/// Complete Colloquy configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ColloquyConfig {
    /// Context selection
    pub context: ContextConfig,
    /// Stream demultiplexing and relay
    pub stream: StreamConfig,
    pub logging: LoggingConfig,
}

impl ColloquyConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Check every section
    pub fn validate(&self) -> crate::error::ColloquyResult<()> {
        super::validation::ConfigValidator::validate(self)
    }
}
