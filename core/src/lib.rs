//! Paperchat Core - Streaming Document-QA Conversation Engine
//!
//! Headless core for a "chat with your paper" assistant: it opens one
//! streaming exchange per user question, decodes the server-pushed event
//! stream incrementally, and folds the result into an ordered conversation
//! log. No UI dependencies; any surface (web, TUI, headless tests) renders
//! the published snapshots.
//!
//! # Architecture
//!
//! ```text
//! user question
//!      │
//! ┌────▼───────┐  open_stream   ┌─────────────┐
//! │ ChatSession│ ─────────────▶ │ ChatBackend │  POST /api/chat
//! │  (guard)   │                └──────┬──────┘
//! └────┬───────┘                       │ raw byte deliveries
//!      │                        ┌──────▼──────┐
//!      │  ChatEvent             │  SseDecoder │  blank-line framing,
//!      │◀────────────────────── │  (frames)   │  data: payloads
//! ┌────▼───────────┐            └─────────────┘
//! │  Conversation  │
//! │  (message log) │──▶ ConversationSnapshot (rendered by the surface)
//! └────────────────┘
//! ```
//!
//! # Delivery guarantees
//!
//! - Frames decode in input order no matter how the transport chunks the
//!   bytes, down to splits inside a multi-byte character.
//! - Each exchange delivers zero or more `Chunk` events, then exactly one of
//!   `Complete`/`Error`, always last.
//! - Only one turn may stream at a time; the conversation guard rejects a
//!   Send while a response is in flight.
//!
//! # Module Overview
//!
//! - [`sse`]: incremental frame decoder for the event stream
//! - [`streaming`]: per-exchange orchestrator and event delivery
//! - [`conversation`]: message log and turn state machine
//! - [`backend`]: seam to the document-QA service (HTTP implementation)
//! - [`session`]: glue binding a conversation to the orchestrator
//! - [`config`]: backend endpoint settings
//! - [`error`]: error taxonomy

#![deny(missing_docs)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod backend;
pub mod config;
pub mod conversation;
pub mod error;
pub mod session;
pub mod sse;
pub mod streaming;

// Re-exports for convenience
pub use backend::{ByteStream, ChatBackend, HttpBackend};
pub use config::ChatConfig;
pub use conversation::{
    Conversation, ConversationId, ConversationSnapshot, Message, MessageId, Role, TurnState,
};
pub use error::ChatError;
pub use session::ChatSession;
pub use sse::{SseDecoder, SseFrame, DONE_SENTINEL};
pub use streaming::{ChatClient, ChatEvent};
