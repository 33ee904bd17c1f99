//! Stream handling configuration

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::demux::{DEFAULT_CLOSE_TAG, DEFAULT_OPEN_TAG, Delimiters};
use crate::error::{ColloquyError, ColloquyResult};

/// What the relay does when the client goes away mid-stream
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DisconnectPolicy {
    /// Stop reading the upstream stream
    Abort,
    /// Keep reading so the outcome holds the full response
    #[default]
    Drain,
}

impl fmt::Display for DisconnectPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DisconnectPolicy::Abort => write!(f, "abort"),
            DisconnectPolicy::Drain => write!(f, "drain"),
        }
    }
}

impl FromStr for DisconnectPolicy {
    type Err = ColloquyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "abort" => Ok(Self::Abort),
            "drain" => Ok(Self::Drain),
            other => Err(ColloquyError::invalid_field(
                "stream.disconnect_policy",
                format!("unknown disconnect policy '{}'", other),
            )),
        }
    }
}

/// Configuration for stream demultiplexing and relay
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StreamConfig {
    /// Tag that opens a thinking block
    pub open_tag: String,
    /// Tag that closes a thinking block
    pub close_tag: String,
    pub disconnect_policy: DisconnectPolicy,
}

impl Default for StreamConfig {
    fn default() -> Self {
        Self {
            open_tag: DEFAULT_OPEN_TAG.to_string(),
            close_tag: DEFAULT_CLOSE_TAG.to_string(),
            disconnect_policy: DisconnectPolicy::Drain,
        }
    }
}

impl StreamConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_tags(mut self, open: impl Into<String>, close: impl Into<String>) -> Self {
        self.open_tag = open.into();
        self.close_tag = close.into();
        self
    }

    pub fn with_disconnect_policy(mut self, policy: DisconnectPolicy) -> Self {
        self.disconnect_policy = policy;
        self
    }

    /// Validated delimiters for a demultiplexer
    pub fn delimiters(&self) -> ColloquyResult<Delimiters> {
        Delimiters::new(self.open_tag.clone(), self.close_tag.clone())
    }
}
