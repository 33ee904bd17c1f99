//! Fetch history and build the context window for one turn

use std::sync::Arc;

use super::config::{ContextConfig, SelectionConstraints, SelectionPolicy};
use super::recency::RecencyWindowSelector;
use super::selector::{ContextSelector, PolicySelector};
use super::store::MessageStore;
use super::window::ContextWindow;
use crate::error::UnifiedError;

/// Joins a [`MessageStore`] with the configured selection policy.
///
/// Assembly never fails. A history read error degrades to an empty window so
/// the turn can still proceed with less context.
pub struct ContextAssembler {
    config: ContextConfig,
    store: Arc<dyn MessageStore>,
    selector: PolicySelector,
    fallback: RecencyWindowSelector,
}

impl ContextAssembler {
    pub fn new(config: ContextConfig, store: Arc<dyn MessageStore>) -> Self {
        Self {
            selector: PolicySelector::from_config(&config),
            fallback: RecencyWindowSelector::from_config(&config),
            config,
            store,
        }
    }

    pub fn config(&self) -> &ContextConfig {
        &self.config
    }

    /// Default constraints from the config
    pub fn default_constraints(&self) -> SelectionConstraints {
        self.config.constraints()
    }

    /// Build a window using the configured default policy
    pub async fn assemble(
        &self,
        conversation_id: &str,
        constraints: &SelectionConstraints,
    ) -> ContextWindow {
        self.assemble_with_policy(self.config.default_policy, conversation_id, constraints)
            .await
    }

    /// Build a window with an explicit policy
    pub async fn assemble_with_policy(
        &self,
        policy: SelectionPolicy,
        conversation_id: &str,
        constraints: &SelectionConstraints,
    ) -> ContextWindow {
        match self.store.fetch_history(conversation_id).await {
            Ok(history) => self.selector.select_with(policy, &history, constraints),
            Err(err) => {
                tracing::warn!(
                    conversation_id,
                    code = err.error_code(),
                    error = %err,
                    "history fetch failed, continuing without context"
                );
                ContextWindow::empty(policy)
            }
        }
    }

    /// Like [`assemble`](Self::assemble), but on a failed history read tries
    /// the store's recent-messages query before giving up.
    pub async fn assemble_with_fallback(
        &self,
        conversation_id: &str,
        constraints: &SelectionConstraints,
    ) -> ContextWindow {
        let policy = self.config.default_policy;
        let err = match self.store.fetch_history(conversation_id).await {
            Ok(history) => return self.selector.select_with(policy, &history, constraints),
            Err(err) => err,
        };

        tracing::warn!(
            conversation_id,
            code = err.error_code(),
            error = %err,
            "history fetch failed, falling back to recent messages"
        );

        match self
            .store
            .fetch_recent(conversation_id, constraints.max_messages)
            .await
        {
            Ok(recent) => self.fallback.select_context(&recent, constraints),
            Err(err) => {
                tracing::warn!(
                    conversation_id,
                    code = err.error_code(),
                    error = %err,
                    "recent-messages fallback failed, continuing without context"
                );
                ContextWindow::empty(SelectionPolicy::Recency)
            }
        }
    }
}
