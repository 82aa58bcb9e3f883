//! Backend Trait
//!
//! Seam between the streaming orchestrator and the document-QA service.
//! The orchestrator needs two capabilities: open one streaming exchange for
//! a question, and probe whether the service is reachable.

use std::pin::Pin;

use async_trait::async_trait;
use futures::Stream;

use crate::error::ChatError;

/// Raw increments from an open exchange.
///
/// Items are byte deliveries exactly as the transport produced them; frame
/// boundaries are the decoder's problem, not the transport's.
pub type ByteStream = Pin<Box<dyn Stream<Item = Result<Vec<u8>, ChatError>> + Send>>;

/// A service that can answer questions about the uploaded document.
#[async_trait]
pub trait ChatBackend: Send + Sync {
    /// Backend name for logging.
    fn name(&self) -> &str;

    /// Check if the backend is healthy and reachable.
    async fn health_check(&self) -> bool;

    /// Open one streaming exchange for `question`.
    ///
    /// Fails with [`ChatError::Connect`] when the request never reached the
    /// service, and [`ChatError::Backend`] when it answered with a
    /// non-success status.
    async fn open_stream(&self, question: &str) -> Result<ByteStream, ChatError>;
}
