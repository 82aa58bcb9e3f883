//! Backend Endpoint Configuration
//!
//! Connection settings for the document-QA service. Environment variables
//! override the defaults so the core runs unconfigured against a local
//! backend.

use std::time::Duration;

const DEFAULT_BASE_URL: &str = "http://localhost:8000";
const DEFAULT_TIMEOUT_SECS: u64 = 120;

/// Connection settings for the document-QA backend.
#[derive(Clone, Debug)]
pub struct ChatConfig {
    /// Base URL of the service, without a trailing slash.
    pub base_url: String,
    /// Overall request timeout, long enough for a full streamed answer.
    pub request_timeout: Duration,
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self::new(DEFAULT_BASE_URL)
    }
}

impl ChatConfig {
    /// Create a config pointing at `base_url` with the default timeout.
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            base_url,
            request_timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }

    /// Create from environment variables.
    ///
    /// Reads `PAPERCHAT_API_URL` and `PAPERCHAT_TIMEOUT_SECS`, falling back
    /// to `http://localhost:8000` and 120 seconds.
    #[must_use]
    pub fn from_env() -> Self {
        let base_url =
            std::env::var("PAPERCHAT_API_URL").unwrap_or_else(|_| DEFAULT_BASE_URL.to_string());
        let timeout_secs: u64 = std::env::var("PAPERCHAT_TIMEOUT_SECS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(DEFAULT_TIMEOUT_SECS);

        Self {
            request_timeout: Duration::from_secs(timeout_secs),
            ..Self::new(base_url)
        }
    }

    /// Set the request timeout.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }
}
