//! Extractive summary of early conversation history
//!
//! Long conversations keep their early intent through a short synthetic
//! preamble built from what the user said first. No model call is involved, so
//! the result is a pure function of its input.

use crate::message::{Message, MessageRole};

/// Sentence that opens every summary
pub const SUMMARY_PREFIX: &str = "Summary of earlier conversation: the user previously discussed: ";

/// Returned when there is nothing to summarize
pub const EMPTY_SUMMARY: &str = "No earlier conversation to summarize.";

/// Builds summaries from the leading user messages of a conversation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConversationSummarizer {
    /// How many user messages feed the summary
    max_user_messages: usize,
}

impl Default for ConversationSummarizer {
    fn default() -> Self {
        Self::new()
    }
}

impl ConversationSummarizer {
    pub fn new() -> Self {
        Self {
            max_user_messages: 20,
        }
    }

    /// Set how many user messages are considered
    pub fn with_max_user_messages(mut self, max: usize) -> Self {
        self.max_user_messages = max;
        self
    }

    pub fn max_user_messages(&self) -> usize {
        self.max_user_messages
    }

    /// Summarize `messages` into at most `max_length` characters.
    ///
    /// Only user messages count, in input order, with their content joined
    /// verbatim. The whole returned string, prefix included, respects
    /// `max_length`.
    pub fn summarize<'a, I>(&self, messages: I, max_length: usize) -> String
    where
        I: IntoIterator<Item = &'a Message>,
    {
        let user_contents: Vec<&str> = messages
            .into_iter()
            .filter(|m| m.role == MessageRole::User)
            .take(self.max_user_messages)
            .map(|m| m.content.as_str())
            .collect();

        if user_contents.is_empty() {
            return clip(EMPTY_SUMMARY, max_length).to_string();
        }
        let body = user_contents.join(" ");

        let mut summary = String::with_capacity(SUMMARY_PREFIX.len() + body.len());
        summary.push_str(SUMMARY_PREFIX);
        summary.push_str(&body);
        clip(&summary, max_length).to_string()
    }
}

/// Longest prefix of `text` holding at most `max_chars` characters
fn clip(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((byte_index, _)) => &text[..byte_index],
        None => text,
    }
}
