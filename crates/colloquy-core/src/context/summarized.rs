//! Summary plus recency window for long conversations

use super::config::{ContextConfig, SelectionConstraints, SelectionPolicy, SummaryConfig};
use super::estimator::TokenEstimator;
use super::recency::{RecencyWindowSelector, select_recent};
use super::selector::{ContextSelector, build_window, candidates};
use super::summarizer::ConversationSummarizer;
use super::window::ContextWindow;
use crate::message::Message;

/// Collapses early history into a summary and keeps a short recent tail.
///
/// Histories at or below `trigger_message_count` eligible messages fall
/// through to the plain recency window.
#[derive(Debug, Clone)]
pub struct SummarizedSelector {
    recency: RecencyWindowSelector,
    summarizer: ConversationSummarizer,
    config: SummaryConfig,
}

impl Default for SummarizedSelector {
    fn default() -> Self {
        Self::from_config(&ContextConfig::default())
    }
}

impl SummarizedSelector {
    pub fn new(recency: RecencyWindowSelector, config: SummaryConfig) -> Self {
        Self {
            recency,
            summarizer: ConversationSummarizer::new().with_max_user_messages(config.max_user_messages),
            config,
        }
    }

    pub fn from_config(config: &ContextConfig) -> Self {
        Self::new(RecencyWindowSelector::from_config(config), config.summary)
    }

    pub fn config(&self) -> &SummaryConfig {
        &self.config
    }

    fn estimator(&self) -> &TokenEstimator {
        self.recency.estimator()
    }

    /// Token budget left for recent messages once the summary is placed
    fn recent_budget(&self, max_tokens: usize, summary_tokens: usize) -> usize {
        let ratio_budget = (max_tokens as f64 * self.config.budget_ratio).floor() as usize;
        ratio_budget.min(max_tokens.saturating_sub(summary_tokens))
    }
}

impl ContextSelector for SummarizedSelector {
    fn policy(&self) -> SelectionPolicy {
        SelectionPolicy::Summarized
    }

    fn select_context(
        &self,
        history: &[Message],
        constraints: &SelectionConstraints,
    ) -> ContextWindow {
        let pool = candidates(history, self.estimator());
        if pool.len() <= self.config.trigger_message_count {
            tracing::debug!(
                eligible = pool.len(),
                trigger = self.config.trigger_message_count,
                "history below summary trigger, using recency window"
            );
            return self.recency.select_context(history, constraints);
        }

        let mut summary = Some(
            self.summarizer
                .summarize(pool.iter().map(|c| c.message), self.config.max_length),
        );
        let mut summary_tokens = summary
            .as_deref()
            .map_or(0, |s| self.estimator().estimate(s));

        if summary_tokens > constraints.max_tokens {
            tracing::warn!(
                summary_tokens,
                max_tokens = constraints.max_tokens,
                "summary alone exceeds the token budget, dropping it"
            );
            summary = None;
            summary_tokens = 0;
        }

        let budget = self.recent_budget(constraints.max_tokens, summary_tokens);
        let max_messages = constraints.max_messages.min(self.config.recent_messages);
        let selected = select_recent(
            &pool,
            budget,
            max_messages,
            self.recency.mandatory_recent(),
        );

        tracing::info!(
            eligible = pool.len(),
            selected = selected.len(),
            budget,
            summary_tokens,
            "summarized long conversation"
        );
        build_window(
            selected,
            summary,
            SelectionPolicy::Summarized,
            self.estimator(),
        )
    }
}
