//! Inline thinking-tag demultiplexer
//!
//! Splits a stream of text fragments into `content` and `thinking` on literal
//! delimiter tags. Fragments arrive at arbitrary boundaries, so a tag may be
//! split across two or more of them:
//!
//! ```text
//! "Hello <th" | "ink>reasoning</thi" | "nk> world"
//!  content: "Hello " ... " world"
//!  thinking: "reasoning"
//! ```
//!
//! The trailing part of a fragment that could still grow into a tag is held
//! in `pending` until the next fragment decides it.


use super::channel::{StreamChannel, StreamEmission};
use super::state::{DemuxMode, StreamState};
use crate::error::{ColloquyError, ColloquyResult};

/// Default opening tag
pub const DEFAULT_OPEN_TAG: &str = "<think>";
/// Default closing tag
pub const DEFAULT_CLOSE_TAG: &str = "</think>";

/// Opening and closing tags of a thinking block
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Delimiters {
    open: String,
    close: String,
}

impl Default for Delimiters {
    fn default() -> Self {
        Self {
            open: DEFAULT_OPEN_TAG.to_string(),
            close: DEFAULT_CLOSE_TAG.to_string(),
        }
    }
}

impl Delimiters {
    /// Tags must be non-empty and distinct
    pub fn new(open: impl Into<String>, close: impl Into<String>) -> ColloquyResult<Self> {
        let open = open.into();
        let close = close.into();
        if open.is_empty() || close.is_empty() {
            return Err(ColloquyError::invalid_field(
                "stream.open_tag",
                "thinking delimiters must not be empty",
            ));
        }
        if open == close {
            return Err(ColloquyError::invalid_field(
                "stream.close_tag",
                "opening and closing delimiters must differ",
            ));
        }
        Ok(Self { open, close })
    }

    pub fn open(&self) -> &str {
        &self.open
    }

    pub fn close(&self) -> &str {
        &self.close
    }

    fn for_mode(&self, mode: DemuxMode) -> &str {
        match mode {
            DemuxMode::Plain => &self.open,
            DemuxMode::InThinking => &self.close,
        }
    }
}

/// State machine for one model call
#[derive(Debug, Clone, Default)]
pub struct StreamDemultiplexer {
    delimiters: Delimiters,
    state: StreamState,
}

impl StreamDemultiplexer {
    pub fn new(delimiters: Delimiters) -> Self {
        Self {
            delimiters,
            state: StreamState::new(),
        }
    }

    pub fn delimiters(&self) -> &Delimiters {
        &self.delimiters
    }

    pub fn state(&self) -> &StreamState {
        &self.state
    }

    pub fn mode(&self) -> DemuxMode {
        self.state.mode
    }

    /// Consume one fragment and return what can be classified so far
    pub fn push(&mut self, fragment: &str) -> Vec<StreamEmission> {
        let mut buffer = std::mem::take(&mut self.state.pending);
        buffer.push_str(fragment);

        let mut emissions = Vec::new();
        let mut rest = buffer.as_str();

        loop {
            let mode = self.state.mode;
            let delimiter = self.delimiters.for_mode(mode);

            match rest.find(delimiter) {
                Some(index) => {
                    emit(&mut self.state, &mut emissions, mode.channel(), &rest[..index]);
                    rest = &rest[index + delimiter.len()..];
                    self.state.mode = mode.toggled();
                }
                None => {
                    let held = partial_delimiter_len(rest, delimiter);
                    let split = rest.len() - held;
                    emit(&mut self.state, &mut emissions, mode.channel(), &rest[..split]);
                    self.state.pending = rest[split..].to_string();
                    break;
                }
            }
        }

        emissions
    }

    /// Flush held text to the current mode's channel and hand back the state.
    ///
    /// An unterminated thinking block releases everything on `thinking`.
    pub fn finish(mut self) -> (Vec<StreamEmission>, StreamState) {
        let pending = std::mem::take(&mut self.state.pending);
        let mut emissions = Vec::new();
        let mode = self.state.mode;

        if mode == DemuxMode::InThinking {
            tracing::debug!(
                thinking_len = self.state.accumulated_thinking.len() + pending.len(),
                "stream ended inside a thinking block"
            );
        }
        emit(&mut self.state, &mut emissions, mode.channel(), &pending);
        (emissions, self.state)
    }
}

/// Record and queue non-empty text
fn emit(
    state: &mut StreamState,
    emissions: &mut Vec<StreamEmission>,
    channel: StreamChannel,
    text: &str,
) {
    if text.is_empty() {
        return;
    }
    state.record(channel, text);
    emissions.push(StreamEmission {
        channel,
        text: text.to_string(),
    });
}

/// Length of the longest suffix of `text` that is a proper prefix of `delimiter`
fn partial_delimiter_len(text: &str, delimiter: &str) -> usize {
    let longest = text.len().min(delimiter.len().saturating_sub(1));
    (1..=longest)
        .rev()
        .find(|&len| delimiter.is_char_boundary(len) && text.ends_with(&delimiter[..len]))
        .unwrap_or(0)
}
