//! Importance-weighted selection

use std::cmp::Reverse;

use super::config::{PriorityConfig, PriorityWeights, SelectionConstraints, SelectionPolicy};
use super::estimator::TokenEstimator;
use super::selector::{Candidate, ContextSelector, build_window, candidates};
use super::window::ContextWindow;
use crate::message::{Message, MessageRole};

/// Ranks messages by a weighted score and admits the best ones.
///
/// Once the budget is hit, messages keep being admitted until
/// `floor_messages` are selected. That floor can overshoot `max_tokens`.
/// Set `floor_message_token_cap` to skip oversized floor candidates.
#[derive(Debug, Clone, Default)]
pub struct PrioritySelector {
    estimator: TokenEstimator,
    config: PriorityConfig,
}

impl PrioritySelector {
    pub fn new(config: PriorityConfig) -> Self {
        Self {
            estimator: TokenEstimator::new(),
            config,
        }
    }

    pub fn with_estimator(mut self, estimator: TokenEstimator) -> Self {
        self.estimator = estimator;
        self
    }

    pub fn config(&self) -> &PriorityConfig {
        &self.config
    }

    /// Score one message. `recency_index` 0 is the newest message.
    pub fn score(&self, message: &Message, recency_index: usize) -> u32 {
        score_message(
            &self.config.weights,
            self.config.length_threshold,
            message,
            recency_index,
        )
    }
}

/// `max(0, recency - index) + bonuses`
pub fn score_message(
    weights: &PriorityWeights,
    length_threshold: usize,
    message: &Message,
    recency_index: usize,
) -> u32 {
    let index = u32::try_from(recency_index).unwrap_or(u32::MAX);
    let mut score = weights.recency_weight.saturating_sub(index);

    if message.has_attachments() {
        score += weights.attachment_bonus;
    }
    match message.role {
        MessageRole::User => score += weights.user_bonus,
        MessageRole::System => score += weights.system_bonus,
        MessageRole::Assistant => {}
    }
    if message.char_len() > length_threshold {
        score += weights.length_bonus;
    }
    score
}

impl ContextSelector for PrioritySelector {
    fn policy(&self) -> SelectionPolicy {
        SelectionPolicy::Priority
    }

    fn select_context(
        &self,
        history: &[Message],
        constraints: &SelectionConstraints,
    ) -> ContextWindow {
        let pool = candidates(history, &self.estimator);
        let newest = pool.len().saturating_sub(1);

        let mut ranked: Vec<(u32, Candidate<'_>)> = pool
            .iter()
            .enumerate()
            .map(|(i, c)| (self.score(c.message, newest - i), *c))
            .collect();
        // score descending, then more recent first
        ranked.sort_by_key(|(score, c)| (Reverse(*score), Reverse(c.position)));

        let mut selected = Vec::new();
        let mut total = 0usize;
        let mut over_budget = 0usize;

        for (_, candidate) in ranked {
            if selected.len() >= constraints.max_messages {
                break;
            }
            if total.saturating_add(candidate.tokens) <= constraints.max_tokens {
                total = total.saturating_add(candidate.tokens);
                selected.push(candidate);
                continue;
            }
            if selected.len() >= self.config.floor_messages {
                break;
            }
            if self
                .config
                .floor_message_token_cap
                .is_some_and(|cap| candidate.tokens > cap)
            {
                continue;
            }
            total = total.saturating_add(candidate.tokens);
            over_budget += 1;
            selected.push(candidate);
        }

        if over_budget > 0 {
            tracing::debug!(
                over_budget,
                total,
                max_tokens = constraints.max_tokens,
                "priority floor admitted messages past the budget"
            );
        }
        tracing::debug!(
            eligible = pool.len(),
            selected = selected.len(),
            "priority selection done"
        );
        build_window(selected, None, SelectionPolicy::Priority, &self.estimator)
    }
}
