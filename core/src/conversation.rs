//! Conversation State Machine
//!
//! Ordered message log for one document-QA session, plus the streaming and
//! error flags a presentation layer needs to disable input and show error
//! banners. The machine folds [`ChatEvent`]s from the streaming orchestrator
//! into the log.
//!
//! # Turn lifecycle
//!
//! ```text
//! Idle ──Send──▶ AwaitingFirstChunk ──Chunk──▶ Streaming ──Complete──▶ Idle
//!                        │                        │
//!                        └────────Error───────────┴──▶ Idle (error set,
//!                                                      placeholder removed)
//! ```
//!
//! Exactly one turn may be in flight: `begin_turn` rejects while a response
//! is still streaming, regardless of what the UI allows. On error the
//! partially streamed answer is discarded entirely; only the error banner
//! remains until the next successful Send clears it.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::ChatError;
use crate::streaming::ChatEvent;

// ============================================================================
// Core Types
// ============================================================================

/// Unique identifier for a conversation
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ConversationId(pub Uuid);

impl ConversationId {
    /// Create a new unique conversation ID
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for ConversationId {
    fn default() -> Self {
        Self::new()
    }
}

/// Identifier for one message.
///
/// Allocated from a per-conversation counter, so creation order defines log
/// order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct MessageId(u64);

/// Who sent a message
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Role {
    /// User input
    User,
    /// The assistant's answer
    Assistant,
}

/// One conversational turn.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Message {
    /// Unique, creation-ordered identifier
    pub id: MessageId,
    /// Who sent this message
    pub role: Role,
    /// Accumulated content; empty while an assistant turn awaits its first chunk
    pub text: String,
    /// True while this assistant turn is still receiving chunks
    pub is_streaming: bool,
}

/// Observable position in the turn lifecycle
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum TurnState {
    /// No turn in flight
    #[default]
    Idle,
    /// Placeholder appended, no content received yet
    AwaitingFirstChunk,
    /// At least one chunk received
    Streaming,
}

/// Immutable view published to the presentation layer after each transition.
#[derive(Clone, Debug, Serialize)]
pub struct ConversationSnapshot {
    /// Messages in log order
    pub messages: Vec<Message>,
    /// Whether a response is currently streaming (input should be disabled)
    pub is_streaming: bool,
    /// Conversation-level error banner, if any
    pub error: Option<String>,
}

// ============================================================================
// Conversation
// ============================================================================

/// Ordered message log with single-flight turn handling.
#[derive(Debug)]
pub struct Conversation {
    /// Unique conversation identifier
    id: ConversationId,
    /// Messages in creation order
    messages: Vec<Message>,
    /// Error banner shown until the next successful Send
    error: Option<String>,
    /// Mirrors the in-flight assistant message's flag, conversation-scoped
    is_streaming: bool,
    /// Accumulated chunk text for the in-flight turn, kept outside the
    /// rendered message so each republish is one whole-string update
    stream_buffer: String,
    /// Placeholder message receiving the streamed answer
    streaming_id: Option<MessageId>,
    /// Next message ID to allocate
    next_id: u64,
}

impl Default for Conversation {
    fn default() -> Self {
        Self::new()
    }
}

impl Conversation {
    /// Create an empty conversation
    #[must_use]
    pub fn new() -> Self {
        Self {
            id: ConversationId::new(),
            messages: Vec::new(),
            error: None,
            is_streaming: false,
            stream_buffer: String::new(),
            streaming_id: None,
            next_id: 0,
        }
    }

    /// Get the conversation ID
    #[must_use]
    pub fn id(&self) -> ConversationId {
        self.id
    }

    /// Messages in log order
    #[must_use]
    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    /// Whether a response is currently streaming
    #[must_use]
    pub fn is_streaming(&self) -> bool {
        self.is_streaming
    }

    /// Current error banner, if any
    #[must_use]
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Current position in the turn lifecycle
    #[must_use]
    pub fn state(&self) -> TurnState {
        if !self.is_streaming {
            TurnState::Idle
        } else if self.stream_buffer.is_empty() {
            TurnState::AwaitingFirstChunk
        } else {
            TurnState::Streaming
        }
    }

    /// Send transition: append the user turn and an empty streaming
    /// placeholder for the answer.
    ///
    /// Rejected with [`ChatError::TurnInFlight`] while a response is still
    /// streaming. On success any previous error banner is cleared and the
    /// placeholder's ID is returned.
    pub fn begin_turn(&mut self, question: impl Into<String>) -> Result<MessageId, ChatError> {
        if self.is_streaming {
            return Err(ChatError::TurnInFlight);
        }

        self.error = None;
        self.stream_buffer.clear();

        let user_id = self.alloc_id();
        self.messages.push(Message {
            id: user_id,
            role: Role::User,
            text: question.into(),
            is_streaming: false,
        });

        let assistant_id = self.alloc_id();
        self.messages.push(Message {
            id: assistant_id,
            role: Role::Assistant,
            text: String::new(),
            is_streaming: true,
        });

        self.streaming_id = Some(assistant_id);
        self.is_streaming = true;
        Ok(assistant_id)
    }

    /// Fold one orchestrator event into the log.
    ///
    /// Events arriving outside an in-flight turn are ignored.
    pub fn apply(&mut self, event: ChatEvent) {
        let Some(assistant_id) = self.streaming_id else {
            tracing::debug!(?event, "event outside an in-flight turn, ignoring");
            return;
        };

        match event {
            ChatEvent::Chunk(text) => {
                self.stream_buffer.push_str(&text);
                let full = self.stream_buffer.clone();
                if let Some(message) = self.message_mut(assistant_id) {
                    message.text = full;
                }
            }
            ChatEvent::Complete => {
                if let Some(message) = self.message_mut(assistant_id) {
                    message.is_streaming = false;
                }
                self.is_streaming = false;
                self.streaming_id = None;
            }
            ChatEvent::Error(message) => {
                // A partially streamed, now-abandoned answer is not kept.
                self.messages.retain(|m| m.id != assistant_id);
                self.error = Some(message);
                self.is_streaming = false;
                self.streaming_id = None;
            }
        }
    }

    /// Immutable snapshot for rendering
    #[must_use]
    pub fn snapshot(&self) -> ConversationSnapshot {
        ConversationSnapshot {
            messages: self.messages.clone(),
            is_streaming: self.is_streaming,
            error: self.error.clone(),
        }
    }

    fn alloc_id(&mut self) -> MessageId {
        let id = MessageId(self.next_id);
        self.next_id += 1;
        id
    }

    fn message_mut(&mut self, id: MessageId) -> Option<&mut Message> {
        self.messages.iter_mut().find(|m| m.id == id)
    }
}

// ============================================================================
// Tests
// ============================================================================
