//! Context selection configuration

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::ColloquyError;

/// Which selection policy to run for a turn
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SelectionPolicy {
    /// Most recent messages that fit the budget
    Recency,
    /// Importance-weighted selection
    Priority,
    /// Synthetic summary of early history plus a recency window
    Summarized,
    /// Summarized above the trigger size, recency otherwise
    #[default]
    Auto,
}

impl fmt::Display for SelectionPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Recency => "recency",
            Self::Priority => "priority",
            Self::Summarized => "summarized",
            Self::Auto => "auto",
        };
        f.write_str(name)
    }
}

impl FromStr for SelectionPolicy {
    type Err = ColloquyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "recency" => Ok(Self::Recency),
            "priority" => Ok(Self::Priority),
            "summarized" | "summary" => Ok(Self::Summarized),
            "auto" => Ok(Self::Auto),
            other => Err(ColloquyError::invalid_field(
                "context.default_policy",
                format!("unknown selection policy '{}'", other),
            )),
        }
    }
}

/// Per-call limits handed to a selector
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectionConstraints {
    /// Token budget for messages plus summary
    pub max_tokens: usize,
    /// Upper bound on the number of messages returned
    pub max_messages: usize,
}

impl SelectionConstraints {
    pub fn new(max_tokens: usize, max_messages: usize) -> Self {
        Self {
            max_tokens,
            max_messages,
        }
    }
}

/// Scoring weights for the priority policy
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PriorityWeights {
    /// Score of the most recent message; decays by one per step back
    pub recency_weight: u32,
    /// Bonus for carrying at least one attachment
    pub attachment_bonus: u32,
    /// Bonus for user-authored messages
    pub user_bonus: u32,
    /// Bonus for long messages
    pub length_bonus: u32,
    /// Bonus for system messages
    pub system_bonus: u32,
}

impl Default for PriorityWeights {
    fn default() -> Self {
        Self {
            recency_weight: 10,
            attachment_bonus: 5,
            user_bonus: 2,
            length_bonus: 3,
            system_bonus: 8,
        }
    }
}

/// Priority policy settings
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PriorityConfig {
    pub weights: PriorityWeights,
    /// Content longer than this many characters earns the length bonus
    pub length_threshold: usize,
    /// Messages still admitted past the budget until this many are selected
    pub floor_messages: usize,
    /// When set, over-budget floor candidates above this size are skipped
    pub floor_message_token_cap: Option<usize>,
}

impl Default for PriorityConfig {
    fn default() -> Self {
        Self {
            weights: PriorityWeights::default(),
            length_threshold: 200,
            floor_messages: 10,
            floor_message_token_cap: None,
        }
    }
}

/// Summarized policy and summarizer settings
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SummaryConfig {
    /// The summarized policy applies above this many messages
    pub trigger_message_count: usize,
    /// How many early user messages feed the summary
    pub max_user_messages: usize,
    /// Maximum summary length in characters
    pub max_length: usize,
    /// Share of the token budget left for the recency window
    pub budget_ratio: f64,
    /// Cap on messages returned alongside the summary
    pub recent_messages: usize,
}

impl Default for SummaryConfig {
    fn default() -> Self {
        Self {
            trigger_message_count: 100,
            max_user_messages: 20,
            max_length: 1000,
            budget_ratio: 0.7,
            recent_messages: 15,
        }
    }
}

/// Configuration for context selection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ContextConfig {
    /// Policy used by the assembler when the caller does not pick one
    pub default_policy: SelectionPolicy,
    /// Default token budget
    pub max_tokens: usize,
    /// Default message cap
    pub max_messages: usize,
    /// Most recent messages admitted regardless of budget
    pub mandatory_recent: usize,
    pub priority: PriorityConfig,
    pub summary: SummaryConfig,
}

impl Default for ContextConfig {
    fn default() -> Self {
        Self {
            default_policy: SelectionPolicy::Auto,
            max_tokens: 8_000,
            max_messages: 50,
            mandatory_recent: 4,
            priority: PriorityConfig::default(),
            summary: SummaryConfig::default(),
        }
    }
}

impl ContextConfig {
    /// Create a new context config with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the default policy
    pub fn with_policy(mut self, policy: SelectionPolicy) -> Self {
        self.default_policy = policy;
        self
    }

    /// Set the default token budget
    pub fn with_max_tokens(mut self, max: usize) -> Self {
        self.max_tokens = max;
        self
    }

    /// Set the default message cap
    pub fn with_max_messages(mut self, max: usize) -> Self {
        self.max_messages = max;
        self
    }

    /// Set the summarized-policy trigger
    pub fn with_summary_trigger(mut self, count: usize) -> Self {
        self.summary.trigger_message_count = count;
        self
    }

    /// Default per-call constraints derived from this config
    pub fn constraints(&self) -> SelectionConstraints {
        SelectionConstraints::new(self.max_tokens, self.max_messages)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_weights() {
        let weights = PriorityWeights::default();
        assert_eq!(weights.recency_weight, 10);
        assert_eq!(weights.attachment_bonus, 5);
        assert_eq!(weights.user_bonus, 2);
        assert_eq!(weights.length_bonus, 3);
        assert_eq!(weights.system_bonus, 8);
    }

    #[test]
    fn test_policy_from_str() {
        assert_eq!("Priority".parse::<SelectionPolicy>().unwrap(), SelectionPolicy::Priority);
        assert_eq!(" summary ".parse::<SelectionPolicy>().unwrap(), SelectionPolicy::Summarized);
        assert!("fifo".parse::<SelectionPolicy>().is_err());
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config: ContextConfig = toml::from_str(
            r#"
            default_policy = "priority"
            [summary]
            max_length = 400
            "#,
        )
        .unwrap();

        assert_eq!(config.default_policy, SelectionPolicy::Priority);
        assert_eq!(config.summary.max_length, 400);
        assert_eq!(config.summary.trigger_message_count, 100);
        assert_eq!(config.mandatory_recent, 4);
    }

    #[test]
    fn test_builder() {
        let config = ContextConfig::new()
            .with_policy(SelectionPolicy::Recency)
            .with_max_tokens(2_000)
            .with_max_messages(12);
        assert_eq!(config.constraints(), SelectionConstraints::new(2_000, 12));
    }
}
