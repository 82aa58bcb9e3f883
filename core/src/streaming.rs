//! Streaming Orchestrator
//!
//! Owns one network exchange per conversational turn: opens the stream via a
//! [`ChatBackend`], pumps raw deliveries through an [`SseDecoder`], and
//! delivers typed events to the turn that started the exchange.
//!
//! # Delivery contract
//!
//! For one exchange, zero or more [`ChatEvent::Chunk`] events arrive first,
//! then exactly one terminal event ([`ChatEvent::Complete`] or
//! [`ChatEvent::Error`]), then the channel closes. Events arrive in the
//! order the transport delivered their bytes. A transport that closes
//! without the `[DONE]` sentinel is a normal completion; a transport fault
//! or an in-band error frame is terminal and nothing follows it.

use std::sync::Arc;

use futures::StreamExt;
use tokio::sync::mpsc;

use crate::backend::{ByteStream, ChatBackend};
use crate::sse::{SseDecoder, SseFrame};

/// Channel capacity for one exchange.
const EVENT_CHANNEL_CAPACITY: usize = 100;

/// Event delivered to the turn that opened the exchange.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ChatEvent {
    /// Incremental answer text.
    Chunk(String),
    /// The answer finished streaming.
    Complete,
    /// The exchange failed; the partial answer should be discarded.
    Error(String),
}

/// Client that runs streaming exchanges against a backend.
#[derive(Clone)]
pub struct ChatClient {
    backend: Arc<dyn ChatBackend>,
}

impl ChatClient {
    /// Create a client over the given backend.
    #[must_use]
    pub fn new(backend: Arc<dyn ChatBackend>) -> Self {
        Self { backend }
    }

    /// Open one streaming exchange for `question`.
    ///
    /// Never fails directly: establishment failures arrive as a single
    /// [`ChatEvent::Error`] on the returned channel, so every exchange ends
    /// with exactly one terminal event regardless of how it went wrong.
    pub async fn ask_streaming(&self, question: &str) -> mpsc::Receiver<ChatEvent> {
        let (tx, rx) = mpsc::channel(EVENT_CHANNEL_CAPACITY);

        match self.backend.open_stream(question).await {
            Ok(stream) => {
                tokio::spawn(pump_stream(stream, tx));
            }
            Err(err) => {
                tracing::warn!(backend = self.backend.name(), %err, "failed to open exchange");
                let _ = tx.send(ChatEvent::Error(err.to_string())).await;
            }
        }

        rx
    }
}

/// Read deliveries until a terminal frame, closure, or fault.
async fn pump_stream(mut stream: ByteStream, tx: mpsc::Sender<ChatEvent>) {
    let mut decoder = SseDecoder::new();

    while let Some(delivery) = stream.next().await {
        match delivery {
            Ok(bytes) => {
                for frame in decoder.feed(&bytes) {
                    match frame {
                        SseFrame::Content(text) => {
                            if tx.send(ChatEvent::Chunk(text)).await.is_err() {
                                // Receiver dropped, stop streaming
                                return;
                            }
                        }
                        SseFrame::Done => {
                            let _ = tx.send(ChatEvent::Complete).await;
                            return;
                        }
                        SseFrame::Error(message) => {
                            let _ = tx.send(ChatEvent::Error(message)).await;
                            return;
                        }
                    }
                }
            }
            Err(err) => {
                let _ = tx.send(ChatEvent::Error(err.to_string())).await;
                return;
            }
        }
    }

    // Graceful closure without the sentinel is a normal completion.
    let _ = tx.send(ChatEvent::Complete).await;
}
