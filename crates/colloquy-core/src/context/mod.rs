//! Conversation context selection
//!
//! Decides which prior messages go to the model for a turn under a token
//! budget. Three policies share the [`ContextSelector`] trait:
//!
//! - [`RecencyWindowSelector`]: newest messages first, with a guaranteed tail
//! - [`PrioritySelector`]: weighted importance scoring
//! - [`SummarizedSelector`]: early-history summary plus a recency window
//!
//! [`PolicySelector`] dispatches by [`SelectionPolicy`], and
//! [`ContextAssembler`] wires a selector to a [`MessageStore`].

mod assembler;
mod config;
mod estimator;
mod priority;
mod recency;
mod selector;
mod store;
mod summarized;
mod summarizer;
mod window;

pub use assembler::ContextAssembler;
pub use config::{
    ContextConfig, PriorityConfig, PriorityWeights, SelectionConstraints, SelectionPolicy,
    SummaryConfig,
};
pub use estimator::{DEFAULT_CHARS_PER_TOKEN, TokenEstimator};
pub use priority::{PrioritySelector, score_message};
pub use recency::RecencyWindowSelector;
pub use selector::{ContextSelector, PolicySelector};
pub use store::{InMemoryMessageStore, MessageStore};
pub use summarized::SummarizedSelector;
pub use summarizer::{ConversationSummarizer, EMPTY_SUMMARY, SUMMARY_PREFIX};
pub use window::{ContextMessage, ContextWindow};
