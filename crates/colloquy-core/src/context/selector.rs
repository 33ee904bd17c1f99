//! Context selection interface and policy dispatch

use super::config::{ContextConfig, SelectionConstraints, SelectionPolicy};
use super::estimator::TokenEstimator;
use super::priority::PrioritySelector;
use super::recency::RecencyWindowSelector;
use super::summarized::SummarizedSelector;
use super::window::{ContextMessage, ContextWindow};
use crate::message::Message;

/// Chooses which prior messages are sent to the model for one turn.
///
/// Implementations never fail. Search-progress messages are dropped before any
/// policy runs, and the returned messages are always oldest first.
pub trait ContextSelector: Send + Sync {
    /// Policy tag this selector implements
    fn policy(&self) -> SelectionPolicy;

    /// Select a bounded subset of `history` (chronological input)
    fn select_context(
        &self,
        history: &[Message],
        constraints: &SelectionConstraints,
    ) -> ContextWindow;
}

/// A history message with its original position and token estimate
#[derive(Debug, Clone, Copy)]
pub(crate) struct Candidate<'a> {
    pub position: usize,
    pub message: &'a Message,
    pub tokens: usize,
}

/// Drop search-progress messages and estimate the rest, keeping input order
pub(crate) fn candidates<'a>(
    history: &'a [Message],
    estimator: &TokenEstimator,
) -> Vec<Candidate<'a>> {
    history
        .iter()
        .enumerate()
        .filter(|(_, message)| !message.is_search_progress())
        .map(|(position, message)| Candidate {
            position,
            message,
            tokens: estimator.estimate_message(message),
        })
        .collect()
}

/// Number of messages that survive the search-progress filter
pub(crate) fn eligible_count(history: &[Message]) -> usize {
    history.iter().filter(|m| !m.is_search_progress()).count()
}

/// Sort the selection chronologically and wrap it in a window
pub(crate) fn build_window(
    mut selected: Vec<Candidate<'_>>,
    summary: Option<String>,
    policy: SelectionPolicy,
    estimator: &TokenEstimator,
) -> ContextWindow {
    selected.sort_by(|a, b| {
        a.message
            .created_at
            .cmp(&b.message.created_at)
            .then(a.position.cmp(&b.position))
    });

    let summary_tokens = summary.as_deref().map_or(0, |s| estimator.estimate(s));
    let estimated_tokens = selected
        .iter()
        .fold(summary_tokens, |total, c| total.saturating_add(c.tokens));

    ContextWindow {
        messages: selected
            .iter()
            .map(|c| ContextMessage::from(c.message))
            .collect(),
        summary,
        estimated_tokens,
        policy,
    }
}

/// Runs whichever policy the caller names
#[derive(Debug, Clone)]
pub struct PolicySelector {
    policy: SelectionPolicy,
    trigger_message_count: usize,
    recency: RecencyWindowSelector,
    priority: PrioritySelector,
    summarized: SummarizedSelector,
}

impl Default for PolicySelector {
    fn default() -> Self {
        Self::from_config(&ContextConfig::default())
    }
}

impl PolicySelector {
    /// Build all three policies from one config; dispatches on `default_policy`
    pub fn from_config(config: &ContextConfig) -> Self {
        Self {
            policy: config.default_policy,
            trigger_message_count: config.summary.trigger_message_count,
            recency: RecencyWindowSelector::from_config(config),
            priority: PrioritySelector::new(config.priority),
            summarized: SummarizedSelector::from_config(config),
        }
    }

    /// Use a different policy with the same settings
    pub fn with_policy(mut self, policy: SelectionPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Select with an explicit policy, ignoring the configured one
    pub fn select_with(
        &self,
        policy: SelectionPolicy,
        history: &[Message],
        constraints: &SelectionConstraints,
    ) -> ContextWindow {
        let selector: &dyn ContextSelector = match self.resolve(policy, history) {
            SelectionPolicy::Priority => &self.priority,
            SelectionPolicy::Summarized => &self.summarized,
            SelectionPolicy::Recency | SelectionPolicy::Auto => &self.recency,
        };
        selector.select_context(history, constraints)
    }

    /// Map `Auto` onto a concrete policy for this history
    pub fn resolve(&self, policy: SelectionPolicy, history: &[Message]) -> SelectionPolicy {
        match policy {
            SelectionPolicy::Auto => {
                let eligible = eligible_count(history);
                let resolved = if eligible > self.trigger_message_count {
                    SelectionPolicy::Summarized
                } else {
                    SelectionPolicy::Recency
                };
                tracing::debug!(eligible, policy = %resolved, "resolved auto selection policy");
                resolved
            }
            other => other,
        }
    }
}

impl ContextSelector for PolicySelector {
    fn policy(&self) -> SelectionPolicy {
        self.policy
    }

    fn select_context(
        &self,
        history: &[Message],
        constraints: &SelectionConstraints,
    ) -> ContextWindow {
        self.select_with(self.policy, history, constraints)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::message::Attachment;
    use chrono::{Duration, TimeZone, Utc};
    use proptest::prelude::*;

    fn history(count: usize) -> Vec<Message> {
        let start = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        (0..count)
            .map(|i| {
                let msg = if i % 2 == 0 {
                    Message::user(format!("question {}", i))
                } else {
                    Message::assistant(format!("answer {}", i))
                };
                msg.at(start + Duration::seconds(i as i64))
            })
            .collect()
    }

    #[test]
    fn test_auto_picks_recency_for_short_history() {
        let selector = PolicySelector::default();
        let window = selector.select_context(&history(10), &SelectionConstraints::new(1_000, 50));
        assert_eq!(window.policy, SelectionPolicy::Recency);
        assert!(window.summary.is_none());
    }

    #[test]
    fn test_auto_picks_summarized_past_trigger() {
        let selector = PolicySelector::default();
        let window = selector.select_context(&history(101), &SelectionConstraints::new(8_000, 50));
        assert_eq!(window.policy, SelectionPolicy::Summarized);
        assert!(window.summary.is_some());
    }

    #[test]
    fn test_auto_counts_only_eligible_messages() {
        let mut messages = history(100);
        messages.push(Message::system("Searching...").as_search_progress());

        let selector = PolicySelector::default();
        assert_eq!(
            selector.resolve(SelectionPolicy::Auto, &messages),
            SelectionPolicy::Recency
        );
    }

    #[test]
    fn test_explicit_policy_dispatch() {
        let selector = PolicySelector::default().with_policy(SelectionPolicy::Priority);
        assert_eq!(selector.policy(), SelectionPolicy::Priority);

        let window = selector.select_context(&history(5), &SelectionConstraints::new(1_000, 50));
        assert_eq!(window.policy, SelectionPolicy::Priority);
        assert_eq!(window.len(), 5);
    }

    #[test]
    fn test_build_window_orders_by_time_then_position() {
        let estimator = TokenEstimator::new();
        let same_time = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let messages = vec![
            Message::user("first").at(same_time),
            Message::user("second").at(same_time),
            Message::user("zeroth").at(same_time - Duration::seconds(5)),
        ];
        let mut selected = candidates(&messages, &estimator);
        selected.reverse();

        let window = build_window(selected, None, SelectionPolicy::Recency, &estimator);
        let contents: Vec<_> = window.messages.iter().map(|m| m.content.as_str()).collect();
        assert_eq!(contents, vec!["zeroth", "first", "second"]);
    }

    /// role, content length, stored token count, offset in seconds, attachment, search progress
    type MessageShape = (u8, usize, Option<usize>, i64, bool, bool);

    fn arb_history() -> impl Strategy<Value = Vec<MessageShape>> {
        proptest::collection::vec(
            (
                0u8..3,
                0usize..400,
                proptest::option::of(0usize..300),
                0i64..10_000,
                any::<bool>(),
                proptest::bool::weighted(0.1),
            ),
            0..40,
        )
    }

    fn build_history(shapes: &[MessageShape]) -> Vec<Message> {
        let start = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        shapes
            .iter()
            .enumerate()
            .map(|(i, &(role, len, tokens, offset, attached, progress))| {
                let content = if progress {
                    format!("searching {}", i)
                } else {
                    format!("m{} {}", i, "x".repeat(len))
                };
                let mut msg = match role {
                    0 => Message::user(content),
                    1 => Message::assistant(content),
                    _ => Message::system(content),
                };
                msg = msg.at(start + Duration::seconds(offset));
                if let Some(tokens) = tokens {
                    msg = msg.with_token_count(tokens);
                }
                if attached {
                    msg = msg.with_attachment(Attachment::new("a.png", "image/png", vec![1]));
                }
                if progress {
                    msg = msg.as_search_progress();
                }
                msg
            })
            .collect()
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(200))]

        #[test]
        fn prop_every_policy_keeps_window_invariants(
            shapes in arb_history(),
            max_tokens in 1usize..2_000,
            max_messages in 1usize..30,
        ) {
            let config = ContextConfig::default().with_summary_trigger(5);
            let selector = PolicySelector::from_config(&config);
            let history = build_history(&shapes);
            let constraints = SelectionConstraints::new(max_tokens, max_messages);

            for policy in [
                SelectionPolicy::Recency,
                SelectionPolicy::Priority,
                SelectionPolicy::Summarized,
            ] {
                let window = selector.select_with(policy, &history, &constraints);

                prop_assert!(window.len() <= max_messages);
                prop_assert!(
                    window.messages.windows(2).all(|w| w[0].created_at <= w[1].created_at),
                    "{} output is not chronological", policy
                );
                prop_assert!(
                    !window.messages.iter().any(|m| m.content.starts_with("searching")),
                    "{} kept a search-progress message", policy
                );

                if window.estimated_tokens > max_tokens {
                    let allowance = match policy {
                        SelectionPolicy::Priority => config.priority.floor_messages,
                        _ => config.mandatory_recent,
                    };
                    prop_assert!(
                        window.len() <= allowance,
                        "{} overran the budget with {} messages", policy, window.len()
                    );
                }
            }
        }
    }
}
