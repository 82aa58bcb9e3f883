//! Chat Session
//!
//! Thin glue binding one [`Conversation`] to a [`ChatClient`]: the Send
//! transition opens the streaming exchange, and the events fold back into
//! the log. Single-flight is enforced by the conversation guard, not by any
//! transport state.

use tokio::sync::mpsc;

use crate::conversation::{Conversation, ConversationSnapshot};
use crate::error::ChatError;
use crate::streaming::{ChatClient, ChatEvent};

/// One user-facing chat session over an uploaded document.
pub struct ChatSession {
    conversation: Conversation,
    client: ChatClient,
}

impl ChatSession {
    /// Create a session with an empty conversation.
    #[must_use]
    pub fn new(client: ChatClient) -> Self {
        Self {
            conversation: Conversation::new(),
            client,
        }
    }

    /// The underlying conversation.
    #[must_use]
    pub fn conversation(&self) -> &Conversation {
        &self.conversation
    }

    /// Start a turn: guarded Send transition, then open the exchange.
    ///
    /// Returns the event channel for the exchange; the caller folds each
    /// event into the conversation with [`ChatSession::apply`].
    /// [`ChatSession::run_turn`] does both in one call.
    pub async fn send(&mut self, question: &str) -> Result<mpsc::Receiver<ChatEvent>, ChatError> {
        self.conversation.begin_turn(question)?;
        Ok(self.client.ask_streaming(question).await)
    }

    /// Fold one event into the conversation and publish a fresh snapshot.
    pub fn apply(&mut self, event: ChatEvent) -> ConversationSnapshot {
        self.conversation.apply(event);
        self.conversation.snapshot()
    }

    /// Drive one full turn to its terminal event.
    ///
    /// A failed exchange does not return `Err`: the failure lands in the
    /// conversation's error banner, exactly as a surface would present it.
    /// `Err` here means the turn never started (send guard).
    pub async fn run_turn(&mut self, question: &str) -> Result<ConversationSnapshot, ChatError> {
        let mut events = self.send(question).await?;
        while let Some(event) = events.recv().await {
            self.conversation.apply(event);
        }
        Ok(self.conversation.snapshot())
    }
}
