//! Colloquy core: conversation context assembly and response-stream handling
//! for an LLM chat backend.
//!
//! - [`context`] picks which prior messages go to the model under a token
//!   budget (recency, priority and summarized policies).
//! - [`stream`] splits the model's output into answer and thinking channels
//!   and forwards it to the client.

pub mod config;
pub mod context;
pub mod error;
pub mod logging;
pub mod message;
pub mod stream;

pub use config::{ColloquyConfig, ConfigLoader, LoggingConfig, load_config};
pub use context::{
    ContextAssembler, ContextConfig, ContextSelector, ContextWindow, InMemoryMessageStore,
    MessageStore, PolicySelector, SelectionConstraints, SelectionPolicy, TokenEstimator,
};
pub use error::{ColloquyError, ColloquyResult, UnifiedError};
pub use logging::init_logging;
pub use message::{Attachment, Message, MessageRole, PromptMessage};
pub use stream::{
    Delimiters, EventSink, ForwarderEvent, ResponseForwarder, StreamConfig, StreamDemultiplexer,
    StreamFragment, StreamOutcome, StreamRelay,
};
