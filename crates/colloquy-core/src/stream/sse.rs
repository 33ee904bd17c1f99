//! Server-sent-event rendering of forwarder events

use futures::{Stream, StreamExt};
use std::fmt;

use super::forwarder::ForwarderEvent;

/// One SSE frame
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SseFrame {
    /// Event type
    pub event: Option<String>,
    /// Event data, a single line
    pub data: String,
    /// Event ID
    pub id: Option<String>,
}

impl SseFrame {
    pub fn new(data: impl Into<String>) -> Self {
        Self {
            event: None,
            data: data.into(),
            id: None,
        }
    }

    /// Set event type
    pub fn with_event(mut self, event: impl Into<String>) -> Self {
        self.event = Some(event.into());
        self
    }

    /// Set event ID
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }
}

impl fmt::Display for SseFrame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(event) = &self.event {
            writeln!(f, "event: {}", event)?;
        }
        if let Some(id) = &self.id {
            writeln!(f, "id: {}", id)?;
        }
        for line in self.data.split('\n') {
            writeln!(f, "data: {}", line)?;
        }
        writeln!(f)
    }
}

impl From<&ForwarderEvent> for SseFrame {
    fn from(event: &ForwarderEvent) -> Self {
        // JSON-encoded, so newlines in the payload stay on one data line
        let payload = serde_json::json!({
            "type": event.kind.as_str(),
            "data": event.data,
        });
        SseFrame::new(payload.to_string()).with_event(event.kind.as_str())
    }
}

/// Render a stream of forwarder events as SSE text
pub fn events_to_sse<S>(events: S) -> impl Stream<Item = String> + Send
where
    S: Stream<Item = ForwarderEvent> + Send,
{
    events.map(|event| SseFrame::from(&event).to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stream::StreamChannel;

    #[test]
    fn test_frame_format() {
        let frame = SseFrame::from(&ForwarderEvent::chunk(StreamChannel::Content, "a\nb"));
        let text = frame.to_string();
        let lines: Vec<&str> = text.split('\n').collect();

        assert_eq!(lines[0], "event: content");
        assert_eq!(lines[2..], ["", ""]);
        let payload: serde_json::Value =
            serde_json::from_str(lines[1].strip_prefix("data: ").unwrap()).unwrap();
        assert_eq!(payload, serde_json::json!({"type": "content", "data": "a\nb"}));
    }

    #[test]
    fn test_raw_multiline_data() {
        let frame = SseFrame::new("one\ntwo").with_id("7");
        assert_eq!(frame.to_string(), "id: 7\ndata: one\ndata: two\n\n");
    }

    #[tokio::test]
    async fn test_events_to_sse() {
        let events = futures::stream::iter(vec![
            ForwarderEvent::chunk(StreamChannel::Thinking, "x"),
            ForwarderEvent::done(),
        ]);
        let frames: Vec<String> = events_to_sse(events).collect().await;
        assert_eq!(frames.len(), 2);
        assert!(frames[0].starts_with("event: thinking\n"));
        assert!(frames[1].starts_with("event: done\n"));
    }
}
