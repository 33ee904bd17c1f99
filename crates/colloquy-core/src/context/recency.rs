//! Recency-window selection

use super::config::{ContextConfig, SelectionConstraints, SelectionPolicy};
use super::estimator::TokenEstimator;
use super::selector::{Candidate, ContextSelector, build_window, candidates};
use super::window::ContextWindow;
use crate::message::Message;

/// Keeps the most recent messages that fit the budget.
///
/// The newest `mandatory_recent` messages are always admitted so the model
/// sees the exchange it has to answer, even when that alone is over budget.
#[derive(Debug, Clone)]
pub struct RecencyWindowSelector {
    estimator: TokenEstimator,
    mandatory_recent: usize,
}

impl Default for RecencyWindowSelector {
    fn default() -> Self {
        Self::new(ContextConfig::default().mandatory_recent)
    }
}

impl RecencyWindowSelector {
    pub fn new(mandatory_recent: usize) -> Self {
        Self {
            estimator: TokenEstimator::new(),
            mandatory_recent,
        }
    }

    pub fn from_config(config: &ContextConfig) -> Self {
        Self::new(config.mandatory_recent)
    }

    pub fn with_estimator(mut self, estimator: TokenEstimator) -> Self {
        self.estimator = estimator;
        self
    }

    pub fn mandatory_recent(&self) -> usize {
        self.mandatory_recent
    }

    pub(crate) fn estimator(&self) -> &TokenEstimator {
        &self.estimator
    }
}

/// Scan newest to oldest and admit under the budget.
///
/// Returns the admitted candidates newest first.
pub(crate) fn select_recent<'a>(
    pool: &[Candidate<'a>],
    max_tokens: usize,
    max_messages: usize,
    mandatory_recent: usize,
) -> Vec<Candidate<'a>> {
    let mut admitted = Vec::new();
    let mut total = 0usize;

    for candidate in pool.iter().rev() {
        if admitted.len() >= max_messages {
            break;
        }
        let mandatory = admitted.len() < mandatory_recent;
        if !mandatory && total.saturating_add(candidate.tokens) > max_tokens {
            break;
        }
        total = total.saturating_add(candidate.tokens);
        admitted.push(*candidate);
    }

    if total > max_tokens {
        tracing::warn!(
            total,
            max_tokens,
            "mandatory recent messages exceed the token budget"
        );
    }
    admitted
}

impl ContextSelector for RecencyWindowSelector {
    fn policy(&self) -> SelectionPolicy {
        SelectionPolicy::Recency
    }

    fn select_context(
        &self,
        history: &[Message],
        constraints: &SelectionConstraints,
    ) -> ContextWindow {
        let pool = candidates(history, &self.estimator);
        let selected = select_recent(
            &pool,
            constraints.max_tokens,
            constraints.max_messages,
            self.mandatory_recent,
        );

        tracing::debug!(
            history = history.len(),
            eligible = pool.len(),
            selected = selected.len(),
            "recency window selected"
        );
        build_window(selected, None, SelectionPolicy::Recency, &self.estimator)
    }
}
