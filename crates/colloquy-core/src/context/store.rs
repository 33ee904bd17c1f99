//! Message history source

use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::RwLock;

use crate::error::ColloquyResult;
use crate::message::Message;

/// Read access to persisted conversation history.
///
/// Both methods return messages oldest first.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MessageStore: Send + Sync {
    /// Full history of a conversation
    async fn fetch_history(&self, conversation_id: &str) -> ColloquyResult<Vec<Message>>;

    /// The `limit` most recent messages of a conversation
    async fn fetch_recent(
        &self,
        conversation_id: &str,
        limit: usize,
    ) -> ColloquyResult<Vec<Message>>;
}

/// Process-local store, for tests and embedding
#[derive(Debug, Default)]
pub struct InMemoryMessageStore {
    conversations: RwLock<HashMap<String, Vec<Message>>>,
}

impl InMemoryMessageStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a message, keeping the conversation in chronological order
    pub async fn append(&self, conversation_id: impl Into<String>, message: Message) {
        let mut conversations = self.conversations.write().await;
        let messages = conversations.entry(conversation_id.into()).or_default();
        let at = messages.partition_point(|m| m.created_at <= message.created_at);
        messages.insert(at, message);
    }

    /// Append many messages
    pub async fn extend<I>(&self, conversation_id: impl Into<String>, messages: I)
    where
        I: IntoIterator<Item = Message>,
    {
        let conversation_id = conversation_id.into();
        for message in messages {
            self.append(conversation_id.clone(), message).await;
        }
    }

    pub async fn len(&self, conversation_id: &str) -> usize {
        self.conversations
            .read()
            .await
            .get(conversation_id)
            .map_or(0, Vec::len)
    }
}

#[async_trait]
impl MessageStore for InMemoryMessageStore {
    async fn fetch_history(&self, conversation_id: &str) -> ColloquyResult<Vec<Message>> {
        Ok(self
            .conversations
            .read()
            .await
            .get(conversation_id)
            .cloned()
            .unwrap_or_default())
    }

    async fn fetch_recent(
        &self,
        conversation_id: &str,
        limit: usize,
    ) -> ColloquyResult<Vec<Message>> {
        let conversations = self.conversations.read().await;
        let messages = conversations
            .get(conversation_id)
            .map(Vec::as_slice)
            .unwrap_or_default();
        let start = messages.len().saturating_sub(limit);
        Ok(messages[start..].to_vec())
    }
}
