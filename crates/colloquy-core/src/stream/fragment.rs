//! Upstream model stream fragments

use futures::Stream;
use serde::{Deserialize, Serialize};
use std::pin::Pin;

use crate::error::ColloquyResult;

/// One piece of model output as delivered by the upstream client
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum StreamFragment {
    /// Text that may carry inline thinking tags
    Text(String),
    /// Raw bytes of inline-tagged text, possibly cut inside a character
    Bytes(Vec<u8>),
    /// Pre-separated channels from an API that splits them natively
    Delta {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        content: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        thinking: Option<String>,
    },
}

impl StreamFragment {
    pub fn text(text: impl Into<String>) -> Self {
        Self::Text(text.into())
    }

    /// Structured delta carrying only answer text
    pub fn content_delta(content: impl Into<String>) -> Self {
        Self::Delta {
            content: Some(content.into()),
            thinking: None,
        }
    }

    /// Structured delta carrying only reasoning text
    pub fn thinking_delta(thinking: impl Into<String>) -> Self {
        Self::Delta {
            content: None,
            thinking: Some(thinking.into()),
        }
    }
}

/// Stream of fragments from one model call
pub type FragmentStream = Pin<Box<dyn Stream<Item = ColloquyResult<StreamFragment>> + Send>>;
