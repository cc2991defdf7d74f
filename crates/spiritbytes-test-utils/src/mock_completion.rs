// SPDX-FileCopyrightText: 2026 SpiritBytes Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Scripted completion service.

use std::collections::VecDeque;
use std::time::Duration;

use async_trait::async_trait;
use spiritbytes_core::{
    AdapterType, CompletionAdapter, CompletionRequest, CompletionResponse, HealthStatus,
    PluginAdapter, SpiritError,
};
use tokio::sync::Mutex;

/// One scripted answer.
#[derive(Debug, Clone)]
pub enum MockReply {
    Text(String),
    /// Fail with a transport error carrying this status.
    Status(u16),
    /// Wait, then answer with the text.
    Delayed(Duration, String),
}

impl MockReply {
    pub(crate) async fn resolve(self, service: AdapterType) -> Result<String, SpiritError> {
        match self {
            MockReply::Text(text) => Ok(text),
            MockReply::Status(status) => Err(SpiritError::Transport {
                service,
                message: format!("mock returned {status}"),
                status: Some(status),
                source: None,
            }),
            MockReply::Delayed(delay, text) => {
                tokio::time::sleep(delay).await;
                Ok(text)
            }
        }
    }
}

/// Replies are popped in FIFO order; an empty queue answers
/// `"mock response"`. Every request is recorded.
pub struct MockCompletion {
    configured: bool,
    replies: Mutex<VecDeque<MockReply>>,
    requests: Mutex<Vec<CompletionRequest>>,
}

impl MockCompletion {
    pub fn new() -> Self {
        Self {
            configured: true,
            replies: Mutex::new(VecDeque::new()),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn with_responses(responses: Vec<String>) -> Self {
        Self {
            replies: Mutex::new(responses.into_iter().map(MockReply::Text).collect()),
            ..Self::new()
        }
    }

    /// A provider without credentials: `complete` is refused.
    pub fn unconfigured() -> Self {
        Self {
            configured: false,
            ..Self::new()
        }
    }

    pub async fn push(&self, reply: MockReply) {
        self.replies.lock().await.push_back(reply);
    }

    pub async fn push_text(&self, text: impl Into<String>) {
        self.push(MockReply::Text(text.into())).await;
    }

    pub async fn requests(&self) -> Vec<CompletionRequest> {
        self.requests.lock().await.clone()
    }

    pub async fn call_count(&self) -> usize {
        self.requests.lock().await.len()
    }
}

impl Default for MockCompletion {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl PluginAdapter for MockCompletion {
    fn name(&self) -> &str {
        "mock-completion"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Completion
    }

    async fn health_check(&self) -> Result<HealthStatus, SpiritError> {
        Ok(HealthStatus::Healthy)
    }
}

#[async_trait]
impl CompletionAdapter for MockCompletion {
    fn is_configured(&self) -> bool {
        self.configured
    }

    async fn complete(
        &self,
        request: CompletionRequest,
    ) -> Result<CompletionResponse, SpiritError> {
        if !self.configured {
            return Err(SpiritError::Validation("mock completion has no key".into()));
        }
        self.requests.lock().await.push(request);
        let reply = self
            .replies
            .lock()
            .await
            .pop_front()
            .unwrap_or_else(|| MockReply::Text("mock response".into()));
        let content = reply.resolve(AdapterType::Completion).await?;
        Ok(CompletionResponse {
            content,
            model: "mock-model".into(),
        })
    }
}
