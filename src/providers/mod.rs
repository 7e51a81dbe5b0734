//! Completion endpoint integration
//!
//! A completion client turns the latest user message (plus the web-search
//! flag) into reply text. Only one caller convention exists: prior turns are
//! never sent.

mod http;

use std::sync::Arc;
use std::time::Instant;

use async_trait::async_trait;
use thiserror::Error;

pub use http::{HttpCompletionClient, HttpCompletionConfig};

/// A successful reply from the completion endpoint
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Completion {
    pub reply: String,
    /// Whether the server actually applied web search. May differ from
    /// what was requested.
    pub used_web_search: Option<bool>,
}

impl Completion {
    pub fn new(reply: impl Into<String>, used_web_search: Option<bool>) -> Self {
        Self {
            reply: reply.into(),
            used_web_search,
        }
    }
}

#[derive(Debug, Error)]
pub enum CompletionError {
    #[error("Request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("{0}")]
    Service(String),

    #[error("HTTP {0}: {1}")]
    Status(reqwest::StatusCode, String),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

/// Sends one message to an external completion endpoint
#[async_trait]
pub trait CompletionClient: Send + Sync {
    async fn complete(
        &self,
        message: &str,
        web_search_enabled: bool,
    ) -> Result<Completion, CompletionError>;
}

/// Logging wrapper for completion clients
pub struct LoggingClient {
    inner: Arc<dyn CompletionClient>,
}

impl LoggingClient {
    pub fn new(inner: Arc<dyn CompletionClient>) -> Self {
        Self { inner }
    }
}

#[async_trait]
impl CompletionClient for LoggingClient {
    async fn complete(
        &self,
        message: &str,
        web_search_enabled: bool,
    ) -> Result<Completion, CompletionError> {
        let start = Instant::now();
        let result = self.inner.complete(message, web_search_enabled).await;
        let duration = start.elapsed();

        match &result {
            Ok(completion) => {
                tracing::info!(
                    duration_ms = %duration.as_millis(),
                    web_search_requested = web_search_enabled,
                    web_search_used = ?completion.used_web_search,
                    reply_len = completion.reply.len(),
                    "Completion succeeded"
                );
            }
            Err(e) => {
                tracing::error!(
                    duration_ms = %duration.as_millis(),
                    web_search_requested = web_search_enabled,
                    error = %e,
                    "Completion failed"
                );
            }
        }

        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Echo;

    #[async_trait]
    impl CompletionClient for Echo {
        async fn complete(
            &self,
            message: &str,
            web_search_enabled: bool,
        ) -> Result<Completion, CompletionError> {
            if message == "fail" {
                return Err(CompletionError::Service("boom".to_string()));
            }
            Ok(Completion::new(message.to_uppercase(), Some(web_search_enabled)))
        }
    }

    #[tokio::test]
    async fn test_logging_client_passes_through() {
        let client = LoggingClient::new(Arc::new(Echo));

        let completion = client.complete("hello", true).await.unwrap();
        assert_eq!(completion, Completion::new("HELLO", Some(true)));

        let err = client.complete("fail", false).await.unwrap_err();
        assert!(matches!(err, CompletionError::Service(ref m) if m == "boom"));
    }

    #[test]
    fn test_error_messages() {
        assert_eq!(
            CompletionError::Service("rate limited".to_string()).to_string(),
            "rate limited"
        );
        assert_eq!(
            CompletionError::Status(reqwest::StatusCode::BAD_GATEWAY, "upstream".to_string())
                .to_string(),
            "HTTP 502 Bad Gateway: upstream"
        );
    }
}
