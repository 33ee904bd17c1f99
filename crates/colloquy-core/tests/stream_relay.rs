//! Integration tests for response streaming
//!
//! Relays upstream fragments through the demultiplexer and forwarder into a
//! client channel, then renders the received events as SSE.

use colloquy_core::{
    ColloquyError, ColloquyResult, ForwarderEvent, ResponseForwarder, StreamConfig,
    StreamFragment, StreamRelay,
    stream::{EventKind, StreamStatus, events_to_sse},
};
use futures::{StreamExt, stream};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

async fn drain(mut rx: mpsc::Receiver<ForwarderEvent>) -> Vec<ForwarderEvent> {
    let mut events = Vec::new();
    while let Some(event) = rx.recv().await {
        events.push(event);
    }
    events
}

fn text_fragments(parts: &[&str]) -> Vec<ColloquyResult<StreamFragment>> {
    parts.iter().map(|p| Ok(StreamFragment::text(*p))).collect()
}

fn joined(events: &[ForwarderEvent], kind: EventKind) -> String {
    events
        .iter()
        .filter(|e| e.kind == kind)
        .map(|e| e.data.as_str())
        .collect()
}

#[tokio::test]
async fn test_thinking_split_across_fragments() -> ColloquyResult<()> {
    let relay = StreamRelay::new(StreamConfig::default())?;
    let (tx, rx) = mpsc::channel(32);
    let mut forwarder = ResponseForwarder::new(tx);

    let upstream = stream::iter(text_fragments(&["Hello <th", "ink>reasoning</thi", "nk> world"]));
    let outcome = relay
        .relay(upstream, &mut forwarder, &CancellationToken::new())
        .await;
    drop(forwarder);

    assert!(outcome.is_complete());
    assert_eq!(outcome.content, "Hello  world");
    assert_eq!(outcome.thinking, "reasoning");
    assert_eq!(outcome.fragments, 3);

    let events = drain(rx).await;
    assert_eq!(joined(&events, EventKind::Content), "Hello  world");
    assert_eq!(joined(&events, EventKind::Thinking), "reasoning");
    assert_eq!(events.last(), Some(&ForwarderEvent::done()));
    assert_eq!(events.iter().filter(|e| e.is_terminal()).count(), 1);
    Ok(())
}

#[tokio::test]
async fn test_upstream_failure_ends_with_one_error() -> ColloquyResult<()> {
    let relay = StreamRelay::new(StreamConfig::default())?;
    let (tx, rx) = mpsc::channel(32);
    let mut forwarder = ResponseForwarder::new(tx);

    let upstream = stream::iter(vec![
        Ok(StreamFragment::text("partial <think>hm")),
        Err(ColloquyError::stream("connection reset by peer")),
        Ok(StreamFragment::text("never seen")),
    ]);
    let outcome = relay
        .relay(upstream, &mut forwarder, &CancellationToken::new())
        .await;
    drop(forwarder);

    assert!(outcome.is_error());
    assert!(matches!(outcome.status, StreamStatus::Failed(_)));
    assert!(outcome.content.starts_with("partial "));
    assert!(!outcome.content.contains("never seen"));

    let events = drain(rx).await;
    let terminal: Vec<_> = events.iter().filter(|e| e.is_terminal()).collect();
    assert_eq!(terminal.len(), 1);
    assert_eq!(terminal[0].kind, EventKind::Error);
    assert!(!terminal[0].data.contains("connection reset"));
    assert!(!events.iter().any(|e| e.kind == EventKind::Done));
    Ok(())
}

#[tokio::test]
async fn test_relayed_events_render_as_sse() -> ColloquyResult<()> {
    let relay = StreamRelay::new(StreamConfig::default())?;
    let (tx, rx) = mpsc::channel(32);
    let mut forwarder = ResponseForwarder::new(tx);

    let upstream = stream::iter(vec![
        Ok(StreamFragment::thinking_delta("plan")),
        Ok(StreamFragment::content_delta("answer")),
    ]);
    relay
        .relay(upstream, &mut forwarder, &CancellationToken::new())
        .await;
    drop(forwarder);

    let events = drain(rx).await;
    let frames: Vec<String> = events_to_sse(stream::iter(events)).collect().await;

    assert_eq!(frames.len(), 3);
    assert!(frames[0].starts_with("event: thinking\ndata: "));
    assert!(frames[1].starts_with("event: content\ndata: "));
    assert!(frames[2].starts_with("event: done\ndata: "));
    assert!(frames.iter().all(|f| f.ends_with("\n\n")));
    Ok(())
}

#[tokio::test]
async fn test_client_leaving_keeps_outcome() -> ColloquyResult<()> {
    let relay = StreamRelay::new(StreamConfig::default())?;
    let (tx, rx) = mpsc::channel(32);
    drop(rx);
    let mut forwarder = ResponseForwarder::new(tx);

    let upstream = stream::iter(text_fragments(&["one <think>two</think>", " three"]));
    let outcome = relay
        .relay(upstream, &mut forwarder, &CancellationToken::new())
        .await;

    assert!(outcome.client_disconnected);
    assert!(outcome.is_complete());
    assert_eq!(outcome.content, "one  three");
    assert_eq!(outcome.thinking, "two");
    assert_eq!(forwarder.events_sent(), 0);
    Ok(())
}
