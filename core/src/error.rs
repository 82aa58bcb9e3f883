//! Error Taxonomy
//!
//! Failure classes for the streaming pipeline: the exchange never opened,
//! the server rejected the request, the transport died while the stream was
//! open, or a caller tried to start a turn mid-stream. Malformed stream
//! frames are not errors; the decoder skips them locally.

use thiserror::Error;

/// Errors surfaced by the chat core.
#[derive(Debug, Error)]
pub enum ChatError {
    /// The streaming exchange could not be established.
    #[error("failed to reach backend: {0}")]
    Connect(String),

    /// The backend answered with a non-success status.
    ///
    /// Carries the server-supplied `detail` message when one was present,
    /// otherwise a generic description of the status.
    #[error("{0}")]
    Backend(String),

    /// The transport failed while the stream was open.
    #[error("stream transport error: {0}")]
    Transport(String),

    /// A turn was started while a response is still streaming.
    #[error("a response is already streaming")]
    TurnInFlight,
}
