//! HTTP Backend Implementation
//!
//! reqwest client for the document-QA service.
//!
//! # Service API
//!
//! - `POST /api/chat` with `{"question": ...}` - streamed answer as
//!   `text/event-stream`
//! - `GET /` - liveness probe
//!
//! Non-success statuses carry a JSON body whose `detail` field holds the
//! human-readable reason (e.g. "No document uploaded"); that message is
//! preferred over a generic one when surfacing the failure.

use std::time::Duration;

use async_trait::async_trait;
use futures::StreamExt;

use super::traits::{ByteStream, ChatBackend};
use crate::config::ChatConfig;
use crate::error::ChatError;

/// HTTP client for the document-QA service.
#[derive(Clone)]
pub struct HttpBackend {
    config: ChatConfig,
    http_client: reqwest::Client,
}

impl HttpBackend {
    /// Create a backend from connection settings.
    #[must_use]
    pub fn new(config: ChatConfig) -> Self {
        let http_client = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .build()
            .expect("Failed to create HTTP client");

        Self {
            config,
            http_client,
        }
    }

    /// Create a backend from environment variables.
    #[must_use]
    pub fn from_env() -> Self {
        Self::new(ChatConfig::from_env())
    }

    /// Get the chat endpoint URL.
    fn chat_url(&self) -> String {
        format!("{}/api/chat", self.config.base_url)
    }

    /// Get the liveness probe URL.
    fn health_url(&self) -> String {
        format!("{}/", self.config.base_url)
    }
}

impl Default for HttpBackend {
    fn default() -> Self {
        Self::new(ChatConfig::default())
    }
}

#[async_trait]
impl ChatBackend for HttpBackend {
    fn name(&self) -> &str {
        "paperchat-api"
    }

    async fn health_check(&self) -> bool {
        self.http_client
            .get(self.health_url())
            .timeout(Duration::from_secs(5))
            .send()
            .await
            .map(|response| response.status().is_success())
            .unwrap_or(false)
    }

    async fn open_stream(&self, question: &str) -> Result<ByteStream, ChatError> {
        let response = self
            .http_client
            .post(self.chat_url())
            .json(&serde_json::json!({ "question": question }))
            .send()
            .await
            .map_err(|err| ChatError::Connect(err.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = extract_detail(&body)
                .unwrap_or_else(|| format!("request failed with status {status}"));
            return Err(ChatError::Backend(message));
        }

        let stream = response.bytes_stream().map(|delivery| {
            delivery
                .map(|bytes| bytes.to_vec())
                .map_err(|err| ChatError::Transport(err.to_string()))
        });

        Ok(Box::pin(stream))
    }
}

/// Pull the server-supplied `detail` message out of an error body.
fn extract_detail(body: &str) -> Option<String> {
    let value: serde_json::Value = serde_json::from_str(body).ok()?;
    value
        .get("detail")
        .and_then(|detail| detail.as_str())
        .map(String::from)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_urls_from_config() {
        let backend = HttpBackend::new(ChatConfig::new("http://example.com:9000"));
        assert_eq!(backend.chat_url(), "http://example.com:9000/api/chat");
        assert_eq!(backend.health_url(), "http://example.com:9000/");
    }

    #[test]
    fn test_extract_detail() {
        assert_eq!(
            extract_detail("{\"detail\":\"No document uploaded\"}"),
            Some("No document uploaded".to_string())
        );
        assert_eq!(extract_detail("Internal Server Error"), None);
        assert_eq!(extract_detail("{\"message\":\"other shape\"}"), None);
    }
}
