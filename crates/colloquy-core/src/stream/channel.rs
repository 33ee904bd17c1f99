//! Output channels of a model stream

use serde::{Deserialize, Serialize};
use std::fmt;

/// Logical sub-stream of model output
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StreamChannel {
    /// User-visible answer text
    Content,
    /// Intermediate reasoning
    Thinking,
}

impl StreamChannel {
    pub fn as_str(&self) -> &'static str {
        match self {
            StreamChannel::Content => "content",
            StreamChannel::Thinking => "thinking",
        }
    }
}

impl fmt::Display for StreamChannel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A classified piece of text, never empty
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StreamEmission {
    pub channel: StreamChannel,
    pub text: String,
}

impl StreamEmission {
    pub fn content(text: impl Into<String>) -> Self {
        Self {
            channel: StreamChannel::Content,
            text: text.into(),
        }
    }

    pub fn thinking(text: impl Into<String>) -> Self {
        Self {
            channel: StreamChannel::Thinking,
            text: text.into(),
        }
    }
}
