//! Per-call demultiplexer state

use super::channel::StreamChannel;

/// Which channel incoming text currently belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DemuxMode {
    #[default]
    Plain,
    InThinking,
}

impl DemuxMode {
    /// Channel that text in this mode is emitted on
    pub fn channel(&self) -> StreamChannel {
        match self {
            DemuxMode::Plain => StreamChannel::Content,
            DemuxMode::InThinking => StreamChannel::Thinking,
        }
    }

    pub(crate) fn toggled(&self) -> Self {
        match self {
            DemuxMode::Plain => DemuxMode::InThinking,
            DemuxMode::InThinking => DemuxMode::Plain,
        }
    }
}

/// State of one stream, owned by exactly one demultiplexer.
///
/// Created when a model call starts streaming and handed back by
/// `StreamDemultiplexer::finish` for persistence.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StreamState {
    pub(crate) mode: DemuxMode,
    pub(crate) pending: String,
    pub(crate) accumulated_content: String,
    pub(crate) accumulated_thinking: String,
}

impl StreamState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn mode(&self) -> DemuxMode {
        self.mode
    }

    /// Held-back text that may be the start of a delimiter
    pub fn pending(&self) -> &str {
        &self.pending
    }

    pub fn accumulated_content(&self) -> &str {
        &self.accumulated_content
    }

    pub fn accumulated_thinking(&self) -> &str {
        &self.accumulated_thinking
    }

    /// Split into `(content, thinking)`
    pub fn into_parts(self) -> (String, String) {
        (self.accumulated_content, self.accumulated_thinking)
    }

    pub(crate) fn record(&mut self, channel: StreamChannel, text: &str) {
        match channel {
            StreamChannel::Content => self.accumulated_content.push_str(text),
            StreamChannel::Thinking => self.accumulated_thinking.push_str(text),
        }
    }
}
