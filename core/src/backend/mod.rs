//! Document-QA Backend Integration
//!
//! Abstracted access to the service that answers questions about the
//! uploaded document. The streaming orchestrator only ever talks to the
//! [`ChatBackend`] trait, so tests can drive it with scripted byte streams
//! instead of a live server.
//!
//! # Usage
//!
//! ```ignore
//! use paperchat_core::backend::{ChatBackend, HttpBackend};
//!
//! let backend = HttpBackend::from_env();
//! let stream = backend.open_stream("What problem does the paper solve?").await?;
//! ```

mod http;
mod traits;

pub use http::HttpBackend;
pub use traits::{ByteStream, ChatBackend};
