//! Token estimation for conversation messages
//!
//! We do not ship a tokenizer. A character-count heuristic is close enough for
//! budgeting, and it is monotonic in input length, which the greedy budget
//! checks in the selectors rely on.

use crate::message::Message;

/// Default characters per token
pub const DEFAULT_CHARS_PER_TOKEN: f32 = 4.0;

/// Token estimator for messages and raw text
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TokenEstimator {
    /// Characters per token (average)
    chars_per_token: f32,
}

impl Default for TokenEstimator {
    fn default() -> Self {
        Self::new()
    }
}

impl TokenEstimator {
    /// Create a new token estimator with the default ratio
    pub const fn new() -> Self {
        Self {
            chars_per_token: DEFAULT_CHARS_PER_TOKEN,
        }
    }

    /// Create an estimator with a custom ratio.
    ///
    /// Non-positive or non-finite ratios fall back to the default.
    pub fn with_chars_per_token(chars_per_token: f32) -> Self {
        if chars_per_token.is_finite() && chars_per_token > 0.0 {
            Self { chars_per_token }
        } else {
            Self::new()
        }
    }

    pub fn chars_per_token(&self) -> f32 {
        self.chars_per_token
    }

    /// Estimate tokens for a string: `ceil(chars / chars_per_token)`
    pub fn estimate(&self, text: &str) -> usize {
        let chars = text.chars().count();
        if chars == 0 {
            return 0;
        }
        (chars as f64 / self.chars_per_token as f64).ceil() as usize
    }

    /// Estimate tokens for a single message.
    ///
    /// A precomputed `token_count` wins. Attachments are never tokenized.
    pub fn estimate_message(&self, message: &Message) -> usize {
        message
            .token_count
            .unwrap_or_else(|| self.estimate(&message.content))
    }
}
