//! Conversation message types
//!
//! [`Message`] is what the persistence layer hands us. It is read-only from the
//! core's point of view: selection never mutates content, only chooses which
//! messages to forward.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use uuid::Uuid;

/// Metadata key marking a transient search-progress message
pub const SEARCH_PROGRESS_KEY: &str = "isSearchProgress";

/// Role of a message in the conversation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    /// System message (instructions)
    System,
    /// User message (human input)
    User,
    /// Assistant message (model response)
    Assistant,
}

impl std::fmt::Display for MessageRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MessageRole::System => write!(f, "system"),
            MessageRole::User => write!(f, "user"),
            MessageRole::Assistant => write!(f, "assistant"),
        }
    }
}

/// A binary-bearing side item owned by a message
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attachment {
    /// Display name (usually the original file name)
    pub name: String,
    /// MIME type, e.g. `image/png`
    pub mime_type: String,
    /// Raw payload; never tokenized
    #[serde(default)]
    pub data: Vec<u8>,
}

impl Attachment {
    pub fn new(name: impl Into<String>, mime_type: impl Into<String>, data: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            mime_type: mime_type.into(),
            data,
        }
    }
}

/// A persisted conversation message
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    /// Unique identifier
    pub id: Uuid,
    /// Role of the message author
    pub role: MessageRole,
    /// Message text
    pub content: String,
    /// Creation time; defines the order within a conversation
    pub created_at: DateTime<Utc>,
    /// Precomputed token estimate, if the store kept one
    #[serde(default)]
    pub token_count: Option<usize>,
    /// Attachments carried alongside the message
    #[serde(default)]
    pub attachments: Vec<Attachment>,
    /// Open key-value bag
    #[serde(default)]
    pub metadata: HashMap<String, serde_json::Value>,
}

impl Message {
    /// Create a message with the given role, stamped now
    pub fn new(role: MessageRole, content: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            role,
            content: content.into(),
            created_at: Utc::now(),
            token_count: None,
            attachments: Vec::new(),
            metadata: HashMap::new(),
        }
    }

    /// Create a new user message
    pub fn user(content: impl Into<String>) -> Self {
        Self::new(MessageRole::User, content)
    }

    /// Create a new assistant message
    pub fn assistant(content: impl Into<String>) -> Self {
        Self::new(MessageRole::Assistant, content)
    }

    /// Create a new system message
    pub fn system(content: impl Into<String>) -> Self {
        Self::new(MessageRole::System, content)
    }

    /// Set the creation time
    pub fn at(mut self, created_at: DateTime<Utc>) -> Self {
        self.created_at = created_at;
        self
    }

    /// Set a precomputed token count
    pub fn with_token_count(mut self, tokens: usize) -> Self {
        self.token_count = Some(tokens);
        self
    }

    /// Add an attachment
    pub fn with_attachment(mut self, attachment: Attachment) -> Self {
        self.attachments.push(attachment);
        self
    }

    /// Set a metadata entry
    pub fn with_metadata(mut self, key: impl Into<String>, value: serde_json::Value) -> Self {
        self.metadata.insert(key.into(), value);
        self
    }

    /// Mark as a transient search-progress message
    pub fn as_search_progress(self) -> Self {
        self.with_metadata(SEARCH_PROGRESS_KEY, serde_json::Value::Bool(true))
    }

    /// Whether this message is a transient search-progress notice
    pub fn is_search_progress(&self) -> bool {
        matches!(
            self.metadata.get(SEARCH_PROGRESS_KEY),
            Some(serde_json::Value::Bool(true))
        )
    }

    pub fn has_attachments(&self) -> bool {
        !self.attachments.is_empty()
    }

    /// Content length in characters (not bytes)
    pub fn char_len(&self) -> usize {
        self.content.chars().count()
    }
}

/// Message shape handed to the prompt-building step
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PromptMessage {
    pub role: MessageRole,
    pub content: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub attachments: Vec<Attachment>,
}
