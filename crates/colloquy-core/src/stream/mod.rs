//! Model response stream handling
//!
//! Upstream fragments flow through the [`StreamDemultiplexer`], which splits
//! inline `<think>` blocks from the answer, into a [`ResponseForwarder`] that
//! sends `{type, data}` events to the client. [`StreamRelay`] drives one call
//! end to end and returns a [`StreamOutcome`] for persistence.

mod channel;
mod config;
mod demux;
mod forwarder;
mod fragment;
mod relay;
mod sse;
mod state;
mod utf8;

pub use channel::{StreamChannel, StreamEmission};
pub use config::{DisconnectPolicy, StreamConfig};
pub use demux::{DEFAULT_CLOSE_TAG, DEFAULT_OPEN_TAG, Delimiters, StreamDemultiplexer};
pub use forwarder::{EventKind, EventSink, ForwarderEvent, ResponseForwarder};
pub use fragment::{FragmentStream, StreamFragment};
pub use relay::{StreamOutcome, StreamRelay, StreamStatus};
pub use sse::{SseFrame, events_to_sse};
pub use state::{DemuxMode, StreamState};
pub use utf8::Utf8Carry;
