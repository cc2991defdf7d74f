// SPDX-FileCopyrightText: 2026 SpiritBytes Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP client for the OpenAI Chat Completions API.
//!
//! One attempt per call. Retrying is a user decision surfaced by the mood
//! flow, so transient statuses are reported rather than retried here.

use std::time::Duration;

use secrecy::{ExposeSecret, SecretString};
use spiritbytes_core::{AdapterType, SpiritError};
use tracing::debug;

use crate::types::{ApiErrorResponse, ChatRequest, ChatResponse};

/// Connection-level ceiling. Per-call budgets are applied by callers.
const CLIENT_TIMEOUT: Duration = Duration::from_secs(120);

#[derive(Clone)]
pub struct OpenAiClient {
    client: reqwest::Client,
    api_key: SecretString,
    base_url: String,
}

impl std::fmt::Debug for OpenAiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OpenAiClient")
            .field("base_url", &self.base_url)
            .field("api_key", &"[REDACTED]")
            .finish()
    }
}

impl OpenAiClient {
    pub fn new(api_key: SecretString, base_url: String) -> Result<Self, SpiritError> {
        let client = reqwest::Client::builder()
            .timeout(CLIENT_TIMEOUT)
            .build()
            .map_err(|e| SpiritError::Transport {
                service: AdapterType::Completion,
                message: format!("failed to build HTTP client: {e}"),
                status: None,
                source: Some(Box::new(e)),
            })?;
        Ok(Self {
            client,
            api_key,
            base_url,
        })
    }

    /// Overrides the endpoint (for testing with wiremock).
    #[cfg(test)]
    pub fn with_base_url(mut self, url: String) -> Self {
        self.base_url = url;
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub async fn chat(&self, request: &ChatRequest) -> Result<ChatResponse, SpiritError> {
        let response = self
            .client
            .post(&self.base_url)
            .bearer_auth(self.api_key.expose_secret())
            .json(request)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    SpiritError::Timeout {
                        service: AdapterType::Completion,
                        duration: CLIENT_TIMEOUT,
                    }
                } else {
                    SpiritError::Transport {
                        service: AdapterType::Completion,
                        message: format!("HTTP request failed: {e}"),
                        status: None,
                        source: Some(Box::new(e)),
                    }
                }
            })?;

        let status = response.status();
        debug!(status = %status, model = %request.model, "completion response received");

        let body = response.text().await.map_err(|e| SpiritError::Transport {
            service: AdapterType::Completion,
            message: format!("failed to read response body: {e}"),
            status: Some(status.as_u16()),
            source: Some(Box::new(e)),
        })?;

        if !status.is_success() {
            let message = match serde_json::from_str::<ApiErrorResponse>(&body) {
                Ok(api_err) => format!("OpenAI API error ({status}): {}", api_err.error.message),
                Err(_) => format!("API returned {status}: {body}"),
            };
            return Err(SpiritError::Transport {
                service: AdapterType::Completion,
                message,
                status: Some(status.as_u16()),
                source: None,
            });
        }

        serde_json::from_str(&body).map_err(|e| SpiritError::Transport {
            service: AdapterType::Completion,
            message: format!("failed to parse API response: {e}"),
            status: Some(status.as_u16()),
            source: Some(Box::new(e)),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ChatMessage;
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn test_client(server: &MockServer) -> OpenAiClient {
        OpenAiClient::new(SecretString::from("sk-test".to_string()), String::new())
            .unwrap()
            .with_base_url(format!("{}/v1/chat/completions", server.uri()))
    }

    fn request() -> ChatRequest {
        ChatRequest {
            model: "gpt-3.5-turbo".into(),
            messages: vec![ChatMessage::user("hello")],
            temperature: 0.7,
            max_tokens: 50,
        }
    }

    #[tokio::test]
    async fn successful_chat_returns_choices() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/chat/completions"))
            .and(header("authorization", "Bearer sk-test"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "model": "gpt-3.5-turbo-0125",
                "choices": [{"message": {"role": "assistant", "content": "[]"}}]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let resp = test_client(&server).chat(&request()).await.unwrap();
        assert_eq!(resp.first_content(), Some("[]"));
        assert_eq!(resp.model, "gpt-3.5-turbo-0125");
    }

    #[tokio::test]
    async fn server_error_is_not_retried() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
            .expect(1)
            .mount(&server)
            .await;

        let err = test_client(&server).chat(&request()).await.unwrap_err();
        assert_eq!(err.status(), Some(500));
        assert!(err.is_retryable());
    }

    #[tokio::test]
    async fn api_error_envelope_is_reported() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(401).set_body_json(serde_json::json!({
                "error": {"message": "Incorrect API key provided", "type": "invalid_request_error"}
            })))
            .mount(&server)
            .await;

        let err = test_client(&server).chat(&request()).await.unwrap_err();
        assert!(err.to_string().contains("Incorrect API key provided"));
        assert_eq!(err.status(), Some(401));
    }

    #[test]
    fn debug_redacts_key() {
        let client =
            OpenAiClient::new(SecretString::from("sk-secret".to_string()), "u".into()).unwrap();
        assert!(!format!("{client:?}").contains("sk-secret"));
    }
}
