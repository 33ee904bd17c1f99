//! Drive one model stream from upstream fragments to the client

use futures::{Stream, StreamExt};
use serde::{Deserialize, Serialize};
use tokio_util::sync::CancellationToken;

use super::channel::{StreamChannel, StreamEmission};
use super::config::{DisconnectPolicy, StreamConfig};
use super::demux::{Delimiters, StreamDemultiplexer};
use super::forwarder::{EventSink, ResponseForwarder};
use super::fragment::StreamFragment;
use super::utf8::Utf8Carry;
use crate::context::TokenEstimator;
use crate::error::{ColloquyResult, UnifiedError};

/// How a relayed stream ended
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", content = "reason", rename_all = "snake_case")]
pub enum StreamStatus {
    /// Upstream finished normally
    Completed,
    /// Upstream failed; carries the internal error text
    Failed(String),
    /// Stopped by the caller, or by the client leaving under `Abort`
    Cancelled,
}

/// Everything the persistence step needs about one model response
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StreamOutcome {
    pub content: String,
    pub thinking: String,
    pub status: StreamStatus,
    /// Upstream fragments consumed
    pub fragments: usize,
    pub content_tokens: usize,
    pub thinking_tokens: usize,
    /// Whether the client went away before the end
    pub client_disconnected: bool,
}

impl StreamOutcome {
    /// Persist with an error marker when true
    pub fn is_error(&self) -> bool {
        matches!(self.status, StreamStatus::Failed(_))
    }

    pub fn is_complete(&self) -> bool {
        self.status == StreamStatus::Completed
    }
}

/// Text gathered so far for one call
#[derive(Debug, Default)]
struct RelayRun {
    content: String,
    thinking: String,
    fragments: usize,
    client_gone: bool,
}

impl RelayRun {
    fn record(&mut self, emission: &StreamEmission) {
        match emission.channel {
            StreamChannel::Content => self.content.push_str(&emission.text),
            StreamChannel::Thinking => self.thinking.push_str(&emission.text),
        }
    }
}

/// Runs the demultiplexer and forwarder over an upstream stream
#[derive(Debug, Clone)]
pub struct StreamRelay {
    config: StreamConfig,
    delimiters: Delimiters,
    estimator: TokenEstimator,
}

impl StreamRelay {
    /// Fails if the configured tags are empty or equal
    pub fn new(config: StreamConfig) -> ColloquyResult<Self> {
        let delimiters = config.delimiters()?;
        Ok(Self {
            config,
            delimiters,
            estimator: TokenEstimator::new(),
        })
    }

    pub fn config(&self) -> &StreamConfig {
        &self.config
    }

    /// Consume `stream` until it ends, fails, or `cancel` fires.
    ///
    /// Inline-tagged text goes through a fresh demultiplexer, structured
    /// deltas skip it. A normal end sends `done`; an upstream failure sends
    /// one `error` with the user-facing message; cancellation sends nothing.
    pub async fn relay<St, S>(
        &self,
        stream: St,
        forwarder: &mut ResponseForwarder<S>,
        cancel: &CancellationToken,
    ) -> StreamOutcome
    where
        St: Stream<Item = ColloquyResult<StreamFragment>>,
        S: EventSink,
    {
        let mut stream = std::pin::pin!(stream);
        let mut demux = StreamDemultiplexer::new(self.delimiters.clone());
        let mut utf8 = Utf8Carry::new();
        let mut run = RelayRun::default();
        let mut failure = None;

        let status = loop {
            let next = tokio::select! {
                biased;
                _ = cancel.cancelled() => None,
                next = stream.next() => Some(next),
            };
            let Some(next) = next else {
                tracing::debug!(fragments = run.fragments, "stream cancelled by caller");
                break StreamStatus::Cancelled;
            };

            let fragment = match next {
                None => break StreamStatus::Completed,
                Some(Ok(fragment)) => fragment,
                Some(Err(err)) => {
                    tracing::warn!(
                        code = err.error_code(),
                        error = %err,
                        fragments = run.fragments,
                        "upstream stream failed"
                    );
                    let reason = err.to_string();
                    failure = Some(err);
                    break StreamStatus::Failed(reason);
                }
            };
            run.fragments += 1;

            let emissions = match fragment {
                StreamFragment::Text(text) => {
                    // bytes still carried belong before this text
                    let carried = utf8.finish();
                    let mut emissions = if carried.is_empty() {
                        Vec::new()
                    } else {
                        demux.push(&carried)
                    };
                    emissions.extend(demux.push(&text));
                    emissions
                }
                StreamFragment::Bytes(bytes) => demux.push(&utf8.decode(&bytes)),
                StreamFragment::Delta { content, thinking } => delta_emissions(content, thinking),
            };
            self.deliver(&mut run, forwarder, emissions).await;

            if run.client_gone && self.config.disconnect_policy == DisconnectPolicy::Abort {
                break StreamStatus::Cancelled;
            }
        };

        let leftover = utf8.finish();
        let mut tail = if leftover.is_empty() {
            Vec::new()
        } else {
            demux.push(&leftover)
        };
        tail.extend(demux.finish().0);

        match (&status, failure) {
            (StreamStatus::Completed, _) => {
                self.deliver(&mut run, forwarder, tail).await;
                if let Err(err) = forwarder.done().await {
                    tracing::debug!(error = %err, "could not deliver done event");
                }
            }
            (StreamStatus::Failed(_), Some(err)) => {
                tail.iter().for_each(|e| run.record(e));
                if let Err(send_err) = forwarder.error(err.user_message()).await {
                    tracing::debug!(error = %send_err, "could not deliver error event");
                }
            }
            _ => tail.iter().for_each(|e| run.record(e)),
        }

        let outcome = StreamOutcome {
            content_tokens: self.estimator.estimate(&run.content),
            thinking_tokens: self.estimator.estimate(&run.thinking),
            content: run.content,
            thinking: run.thinking,
            status,
            fragments: run.fragments,
            client_disconnected: run.client_gone,
        };
        tracing::info!(
            fragments = outcome.fragments,
            content_tokens = outcome.content_tokens,
            thinking_tokens = outcome.thinking_tokens,
            status = ?outcome.status,
            client_disconnected = outcome.client_disconnected,
            "stream finished"
        );
        outcome
    }

    /// Record emissions and forward them while the client is still there
    async fn deliver<S: EventSink>(
        &self,
        run: &mut RelayRun,
        forwarder: &mut ResponseForwarder<S>,
        emissions: Vec<StreamEmission>,
    ) {
        for emission in emissions {
            run.record(&emission);
            if run.client_gone {
                continue;
            }
            if let Err(err) = forwarder.forward(emission.channel, &emission.text).await {
                tracing::info!(
                    policy = %self.config.disconnect_policy,
                    error = %err,
                    "client disconnected mid-stream"
                );
                run.client_gone = true;
            }
        }
    }
}

/// Structured deltas map straight onto channels, reasoning first
fn delta_emissions(content: Option<String>, thinking: Option<String>) -> Vec<StreamEmission> {
    [
        thinking.map(StreamEmission::thinking),
        content.map(StreamEmission::content),
    ]
    .into_iter()
    .flatten()
    .filter(|e| !e.text.is_empty())
    .collect()
}
