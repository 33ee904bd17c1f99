//! Selector output handed to the prompt-building step

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::config::SelectionPolicy;
use crate::message::{Attachment, Message, MessageRole, PromptMessage};

/// One selected message, stripped down to what the model needs
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContextMessage {
    pub role: MessageRole,
    pub content: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub attachments: Vec<Attachment>,
    pub created_at: DateTime<Utc>,
}

impl From<&Message> for ContextMessage {
    fn from(message: &Message) -> Self {
        Self {
            role: message.role,
            content: message.content.clone(),
            attachments: message.attachments.clone(),
            created_at: message.created_at,
        }
    }
}

impl From<ContextMessage> for PromptMessage {
    fn from(message: ContextMessage) -> Self {
        Self {
            role: message.role,
            content: message.content,
            attachments: message.attachments,
        }
    }
}

/// Bounded, chronologically ordered subset of a conversation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContextWindow {
    /// Selected messages, oldest first
    pub messages: Vec<ContextMessage>,
    /// Synthetic preamble covering history that was left out
    pub summary: Option<String>,
    /// Estimated tokens of `messages` plus `summary`
    pub estimated_tokens: usize,
    /// Policy that produced this window
    pub policy: SelectionPolicy,
}

impl ContextWindow {
    /// A window with nothing in it
    pub fn empty(policy: SelectionPolicy) -> Self {
        Self {
            messages: Vec::new(),
            summary: None,
            estimated_tokens: 0,
            policy,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty() && self.summary.is_none()
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    /// Render the window as prompt messages.
    ///
    /// A summary becomes a leading system message.
    pub fn into_prompt_messages(self) -> Vec<PromptMessage> {
        let mut prompt = Vec::with_capacity(self.messages.len() + 1);
        if let Some(summary) = self.summary {
            prompt.push(PromptMessage {
                role: MessageRole::System,
                content: summary,
                attachments: Vec::new(),
            });
        }
        prompt.extend(self.messages.into_iter().map(PromptMessage::from));
        prompt
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_window() {
        let window = ContextWindow::empty(SelectionPolicy::Recency);
        assert!(window.is_empty());
        assert_eq!(window.len(), 0);
        assert!(window.into_prompt_messages().is_empty());
    }

    #[test]
    fn test_summary_leads_prompt() {
        let window = ContextWindow {
            messages: vec![
                ContextMessage::from(&Message::user("What next?")),
                ContextMessage::from(&Message::assistant("Lunch.")),
            ],
            summary: Some("Summary of earlier conversation: planning".to_string()),
            estimated_tokens: 20,
            policy: SelectionPolicy::Summarized,
        };

        let prompt = window.into_prompt_messages();
        assert_eq!(prompt.len(), 3);
        assert_eq!(prompt[0].role, MessageRole::System);
        assert!(prompt[0].content.starts_with("Summary of earlier"));
        assert_eq!(prompt[1].content, "What next?");
        assert_eq!(prompt[2].role, MessageRole::Assistant);
    }

    #[test]
    fn test_attachments_ride_along() {
        let message = Message::user("see file")
            .with_attachment(Attachment::new("a.pdf", "application/pdf", vec![1, 2, 3]));
        let selected = ContextMessage::from(&message);
        assert_eq!(selected.attachments.len(), 1);

        let prompt = PromptMessage::from(selected);
        assert_eq!(prompt.attachments[0].name, "a.pdf");
    }
}
