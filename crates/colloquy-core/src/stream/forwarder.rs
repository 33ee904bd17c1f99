//! Relays demultiplexed output to a connected client

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;
use tokio::sync::mpsc;

use super::channel::StreamChannel;
use crate::error::{ColloquyError, ColloquyResult};

/// Identity of a client-facing event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventKind {
    Content,
    Thinking,
    Done,
    Error,
}

impl EventKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            EventKind::Content => "content",
            EventKind::Thinking => "thinking",
            EventKind::Done => "done",
            EventKind::Error => "error",
        }
    }

    /// `done` and `error` end a stream
    pub fn is_terminal(&self) -> bool {
        matches!(self, EventKind::Done | EventKind::Error)
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<StreamChannel> for EventKind {
    fn from(channel: StreamChannel) -> Self {
        match channel {
            StreamChannel::Content => EventKind::Content,
            StreamChannel::Thinking => EventKind::Thinking,
        }
    }
}

/// Wire payload: `{"type": "...", "data": "..."}`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ForwarderEvent {
    #[serde(rename = "type")]
    pub kind: EventKind,
    pub data: String,
}

impl ForwarderEvent {
    pub fn chunk(channel: StreamChannel, data: impl Into<String>) -> Self {
        Self {
            kind: channel.into(),
            data: data.into(),
        }
    }

    pub fn done() -> Self {
        Self {
            kind: EventKind::Done,
            data: String::new(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            kind: EventKind::Error,
            data: message.into(),
        }
    }

    pub fn is_terminal(&self) -> bool {
        self.kind.is_terminal()
    }

    pub fn to_json(&self) -> ColloquyResult<String> {
        Ok(serde_json::to_string(self)?)
    }
}

/// Destination for forwarder events, usually the transport's outbound queue.
///
/// A closed destination reports [`ColloquyError::ClientGone`].
#[async_trait]
pub trait EventSink: Send {
    async fn send_event(&mut self, event: ForwarderEvent) -> ColloquyResult<()>;
}

#[async_trait]
impl EventSink for mpsc::Sender<ForwarderEvent> {
    async fn send_event(&mut self, event: ForwarderEvent) -> ColloquyResult<()> {
        self.send(event).await.map_err(ColloquyError::from)
    }
}

#[async_trait]
impl EventSink for mpsc::UnboundedSender<ForwarderEvent> {
    async fn send_event(&mut self, event: ForwarderEvent) -> ColloquyResult<()> {
        self.send(event).map_err(ColloquyError::from)
    }
}

/// Collects events in memory
#[async_trait]
impl EventSink for Vec<ForwarderEvent> {
    async fn send_event(&mut self, event: ForwarderEvent) -> ColloquyResult<()> {
        self.push(event);
        Ok(())
    }
}

/// Sends chunk events in call order, then exactly one terminal event.
///
/// Nothing is buffered. After `done` or `error` every further call is a
/// no-op. Once the sink reports the client gone, chunk forwards fail fast
/// with `ClientGone` and terminal calls are dropped.
#[derive(Debug)]
pub struct ResponseForwarder<S: EventSink> {
    sink: S,
    terminated: bool,
    disconnected: bool,
    sent: usize,
}

impl<S: EventSink> ResponseForwarder<S> {
    pub fn new(sink: S) -> Self {
        Self {
            sink,
            terminated: false,
            disconnected: false,
            sent: 0,
        }
    }

    /// Forward one chunk. Empty chunks are skipped.
    pub async fn forward(&mut self, channel: StreamChannel, chunk: &str) -> ColloquyResult<()> {
        if self.terminated || chunk.is_empty() {
            return Ok(());
        }
        if self.disconnected {
            return Err(ColloquyError::client_gone("client already disconnected"));
        }
        self.send(ForwarderEvent::chunk(channel, chunk)).await
    }

    /// Signal normal completion
    pub async fn done(&mut self) -> ColloquyResult<()> {
        self.terminate(ForwarderEvent::done()).await
    }

    /// Signal failure with a message for the end user
    pub async fn error(&mut self, message: impl Into<String>) -> ColloquyResult<()> {
        self.terminate(ForwarderEvent::error(message)).await
    }

    pub fn is_terminated(&self) -> bool {
        self.terminated
    }

    pub fn is_disconnected(&self) -> bool {
        self.disconnected
    }

    /// Events successfully handed to the sink
    pub fn events_sent(&self) -> usize {
        self.sent
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn into_sink(self) -> S {
        self.sink
    }

    async fn terminate(&mut self, event: ForwarderEvent) -> ColloquyResult<()> {
        if self.terminated {
            tracing::debug!(kind = %event.kind, "ignoring second terminal event");
            return Ok(());
        }
        self.terminated = true;
        if self.disconnected {
            return Ok(());
        }
        self.send(event).await
    }

    async fn send(&mut self, event: ForwarderEvent) -> ColloquyResult<()> {
        match self.sink.send_event(event).await {
            Ok(()) => {
                self.sent += 1;
                Ok(())
            }
            Err(err) => {
                if matches!(err, ColloquyError::ClientGone { .. }) {
                    tracing::debug!("client disconnected, forwarder stops sending");
                    self.disconnected = true;
                }
                Err(err)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_wire_shape() {
        let event = ForwarderEvent::chunk(StreamChannel::Thinking, "step 1\nstep 2");
        assert_eq!(
            event.to_json().unwrap(),
            r#"{"type":"thinking","data":"step 1\nstep 2"}"#
        );
        assert_eq!(
            ForwarderEvent::done().to_json().unwrap(),
            r#"{"type":"done","data":""}"#
        );
    }

    #[tokio::test]
    async fn test_order_and_single_terminal() {
        let mut forwarder = ResponseForwarder::new(Vec::new());
        forwarder.forward(StreamChannel::Content, "Hel").await.unwrap();
        forwarder.forward(StreamChannel::Thinking, "hmm").await.unwrap();
        forwarder.forward(StreamChannel::Content, "lo").await.unwrap();
        forwarder.forward(StreamChannel::Content, "").await.unwrap();
        forwarder.done().await.unwrap();
        forwarder.error("late failure").await.unwrap();
        forwarder.done().await.unwrap();
        forwarder.forward(StreamChannel::Content, "after").await.unwrap();

        let events = forwarder.into_sink();
        let kinds: Vec<_> = events.iter().map(|e| e.kind).collect();
        assert_eq!(
            kinds,
            vec![
                EventKind::Content,
                EventKind::Thinking,
                EventKind::Content,
                EventKind::Done
            ]
        );
        assert_eq!(events[2].data, "lo");
    }

    #[tokio::test]
    async fn test_error_excludes_done() {
        let mut forwarder = ResponseForwarder::new(Vec::new());
        forwarder.error("model unavailable").await.unwrap();
        forwarder.done().await.unwrap();

        let events = forwarder.into_sink();
        assert_eq!(events, vec![ForwarderEvent::error("model unavailable")]);
    }

    #[tokio::test]
    async fn test_mpsc_sink() {
        let (tx, mut rx) = mpsc::channel(8);
        let mut forwarder = ResponseForwarder::new(tx);
        forwarder.forward(StreamChannel::Content, "hi").await.unwrap();
        forwarder.done().await.unwrap();
        assert_eq!(forwarder.events_sent(), 2);
        drop(forwarder);

        assert_eq!(
            rx.recv().await,
            Some(ForwarderEvent::chunk(StreamChannel::Content, "hi"))
        );
        assert_eq!(rx.recv().await, Some(ForwarderEvent::done()));
        assert_eq!(rx.recv().await, None);
    }

    #[tokio::test]
    async fn test_closed_receiver_is_client_gone() {
        let (tx, rx) = mpsc::unbounded_channel();
        drop(rx);

        let mut forwarder = ResponseForwarder::new(tx);
        let err = forwarder
            .forward(StreamChannel::Content, "hello")
            .await
            .unwrap_err();
        assert!(matches!(err, ColloquyError::ClientGone { .. }));
        assert!(forwarder.is_disconnected());

        // later chunks fail fast, terminal calls are dropped quietly
        assert!(forwarder.forward(StreamChannel::Content, "x").await.is_err());
        assert!(forwarder.done().await.is_ok());
        assert_eq!(forwarder.events_sent(), 0);
    }
}
