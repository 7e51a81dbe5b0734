//! HTTP completion endpoint
//!
//! Speaks the hosted chat function's JSON contract:
//!
//! ```text
//! POST <endpoint>   {"message": "...", "webSearchEnabled": true}
//! 200               {"reply": "...", "hasWebSearch": true}
//! any status        {"error": "..."}
//! ```
//!
//! No request timeout is configured; the transport default applies.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use super::{Completion, CompletionClient, CompletionError};

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct CompletionRequest<'a> {
    message: &'a str,
    web_search_enabled: bool,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum CompletionPayload {
    // Checked first so an error field wins even next to a reply.
    Failure {
        error: ErrorField,
    },
    Success {
        reply: String,
        #[serde(default, rename = "hasWebSearch")]
        has_web_search: Option<bool>,
    },
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ErrorField {
    Message(String),
    Detailed { message: String },
    Other(serde_json::Value),
}

impl ErrorField {
    fn into_message(self) -> String {
        match self {
            ErrorField::Message(m) | ErrorField::Detailed { message: m } => m,
            ErrorField::Other(value) => value.to_string(),
        }
    }
}

/// Endpoint settings
#[derive(Debug, Clone)]
pub struct HttpCompletionConfig {
    /// Full URL of the completion function
    pub endpoint: String,
    /// Sent as a bearer token when present
    pub api_key: Option<String>,
}

pub struct HttpCompletionClient {
    config: HttpCompletionConfig,
    client: Client,
}

impl HttpCompletionClient {
    pub fn new(config: HttpCompletionConfig) -> Self {
        Self {
            config,
            client: Client::new(),
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.config.endpoint
    }
}

#[async_trait]
impl CompletionClient for HttpCompletionClient {
    async fn complete(
        &self,
        message: &str,
        web_search_enabled: bool,
    ) -> Result<Completion, CompletionError> {
        let request = CompletionRequest {
            message,
            web_search_enabled,
        };

        let mut req_builder = self.client.post(&self.config.endpoint);

        if let Some(ref api_key) = self.config.api_key {
            req_builder = req_builder.bearer_auth(api_key);
        }

        let response = req_builder.json(&request).send().await?;

        let status = response.status();
        let body = response.text().await?;

        match (
            status.is_success(),
            serde_json::from_str::<CompletionPayload>(&body),
        ) {
            (_, Ok(CompletionPayload::Failure { error })) => {
                Err(CompletionError::Service(error.into_message()))
            }
            (true, Ok(CompletionPayload::Success { reply, has_web_search })) => {
                Ok(Completion::new(reply, has_web_search))
            }
            (false, _) => Err(CompletionError::Status(status, body)),
            (true, Err(e)) => Err(CompletionError::InvalidResponse(format!(
                "Failed to parse response: {} - Body: {}",
                e, body
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::{header, HeaderMap, StatusCode};
    use axum::{routing::post, Json, Router};
    use serde_json::Value;
    use std::sync::{Arc, Mutex};

    type Seen = Arc<Mutex<Vec<(Option<String>, Value)>>>;

    /// Serves a fixed response on `/chat` and records every request
    async fn spawn_stub(status: StatusCode, body: &'static str) -> (String, Seen) {
        let seen: Seen = Arc::new(Mutex::new(Vec::new()));
        let recorder = seen.clone();

        let app = Router::new().route(
            "/chat",
            post(move |headers: HeaderMap, Json(request): Json<Value>| {
                let recorder = recorder.clone();
                async move {
                    let auth = headers
                        .get(header::AUTHORIZATION)
                        .and_then(|v| v.to_str().ok())
                        .map(str::to_string);
                    recorder.lock().unwrap().push((auth, request));
                    (status, [(header::CONTENT_TYPE, "application/json")], body)
                }
            }),
        );

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        (format!("http://{}/chat", addr), seen)
    }

    fn client(endpoint: String, api_key: Option<&str>) -> HttpCompletionClient {
        HttpCompletionClient::new(HttpCompletionConfig {
            endpoint,
            api_key: api_key.map(str::to_string),
        })
    }

    #[tokio::test]
    async fn test_sends_latest_message_and_flag() {
        let (url, seen) = spawn_stub(
            StatusCode::OK,
            r#"{"reply": "It is sunny", "hasWebSearch": true}"#,
        )
        .await;

        let completion = client(url, Some("secret"))
            .complete("weather today", true)
            .await
            .unwrap();

        assert_eq!(completion.reply, "It is sunny");
        assert_eq!(completion.used_web_search, Some(true));

        let seen = seen.lock().unwrap();
        assert_eq!(seen.len(), 1);
        let (auth, request) = &seen[0];
        assert_eq!(auth.as_deref(), Some("Bearer secret"));
        assert_eq!(
            request,
            &serde_json::json!({"message": "weather today", "webSearchEnabled": true})
        );
    }

    #[tokio::test]
    async fn test_server_may_decline_web_search() {
        let (url, _) = spawn_stub(StatusCode::OK, r#"{"reply": "Hi", "hasWebSearch": false}"#).await;

        let completion = client(url, None).complete("Hello", true).await.unwrap();
        assert_eq!(completion.used_web_search, Some(false));
    }

    #[tokio::test]
    async fn test_missing_web_search_flag() {
        let (url, seen) = spawn_stub(StatusCode::OK, r#"{"reply": "Hi"}"#).await;

        let completion = client(url, None).complete("Hello", false).await.unwrap();
        assert_eq!(completion.used_web_search, None);
        assert_eq!(seen.lock().unwrap()[0].0, None);
    }

    #[tokio::test]
    async fn test_error_field_in_successful_response() {
        let (url, _) = spawn_stub(StatusCode::OK, r#"{"error": "rate limited"}"#).await;

        let err = client(url, None).complete("Hello", false).await.unwrap_err();
        assert!(matches!(err, CompletionError::Service(ref m) if m == "rate limited"));
    }

    #[tokio::test]
    async fn test_error_object_on_failure_status() {
        let (url, _) = spawn_stub(
            StatusCode::TOO_MANY_REQUESTS,
            r#"{"error": {"message": "slow down"}}"#,
        )
        .await;

        let err = client(url, None).complete("Hello", false).await.unwrap_err();
        assert!(matches!(err, CompletionError::Service(ref m) if m == "slow down"));
    }

    #[tokio::test]
    async fn test_error_field_of_any_shape() {
        let (url, _) = spawn_stub(StatusCode::OK, r#"{"error": 42}"#).await;
        let err = client(url, None).complete("Hello", false).await.unwrap_err();
        assert!(matches!(err, CompletionError::Service(ref m) if m == "42"));

        let (url, _) = spawn_stub(
            StatusCode::BAD_REQUEST,
            r#"{"error": {"code": "quota", "retry": true}}"#,
        )
        .await;
        let err = client(url, None).complete("Hello", false).await.unwrap_err();
        assert!(
            matches!(err, CompletionError::Service(ref m) if m == r#"{"code":"quota","retry":true}"#)
        );
    }

    #[tokio::test]
    async fn test_failure_status_without_error_field() {
        let (url, _) = spawn_stub(StatusCode::INTERNAL_SERVER_ERROR, "oops").await;

        let err = client(url, None).complete("Hello", false).await.unwrap_err();
        match err {
            CompletionError::Status(status, body) => {
                assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
                assert_eq!(body, "oops");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_malformed_success_body() {
        let (url, _) = spawn_stub(StatusCode::OK, r#"{"answer": "wrong shape"}"#).await;

        let err = client(url, None).complete("Hello", false).await.unwrap_err();
        assert!(matches!(err, CompletionError::InvalidResponse(_)));
    }

    #[tokio::test]
    async fn test_unreachable_endpoint() {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let err = client(format!("http://{}/chat", addr), None)
            .complete("Hello", false)
            .await
            .unwrap_err();
        assert!(matches!(err, CompletionError::Transport(_)));
    }
}
