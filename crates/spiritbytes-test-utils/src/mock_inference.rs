// SPDX-FileCopyrightText: 2026 SpiritBytes Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Scripted inference transport and in-memory blob store.

use std::collections::{HashMap, VecDeque};

use async_trait::async_trait;
use spiritbytes_core::{
    AdapterType, BlobRef, BlobStore, HealthStatus, InferenceTransport, PluginAdapter, SpiritError,
};
use tokio::sync::Mutex;

use crate::mock_completion::MockReply;

/// Body of a successful analysis with the given `(label, confidence)` pairs.
pub fn analysis_body(emotions: &[(&str, f64)]) -> String {
    let emotions: Vec<serde_json::Value> = emotions
        .iter()
        .map(|(label, confidence)| serde_json::json!({"type": label, "confidence": confidence}))
        .collect();
    serde_json::json!({
        "success": true,
        "message": if emotions.is_empty() { "No emotions detected" } else { "Emotions detected" },
        "emotions": emotions,
    })
    .to_string()
}

/// Inference transport answering from a FIFO of scripted bodies.
pub struct MockInference {
    replies: Mutex<VecDeque<MockReply>>,
    submitted: Mutex<Vec<usize>>,
}

impl MockInference {
    pub fn new() -> Self {
        Self {
            replies: Mutex::new(VecDeque::new()),
            submitted: Mutex::new(Vec::new()),
        }
    }

    pub async fn push(&self, reply: MockReply) {
        self.replies.lock().await.push_back(reply);
    }

    pub async fn push_emotions(&self, emotions: &[(&str, f64)]) {
        self.push(MockReply::Text(analysis_body(emotions))).await;
    }

    /// Sizes of the images submitted so far.
    pub async fn submitted(&self) -> Vec<usize> {
        self.submitted.lock().await.clone()
    }
}

impl Default for MockInference {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl PluginAdapter for MockInference {
    fn name(&self) -> &str {
        "mock-inference"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Inference
    }

    async fn health_check(&self) -> Result<HealthStatus, SpiritError> {
        Ok(HealthStatus::Healthy)
    }
}

#[async_trait]
impl InferenceTransport for MockInference {
    async fn submit(&self, image: Vec<u8>) -> Result<String, SpiritError> {
        self.submitted.lock().await.push(image.len());
        let reply = self
            .replies
            .lock()
            .await
            .pop_front()
            .unwrap_or_else(|| MockReply::Text(analysis_body(&[])));
        reply.resolve(AdapterType::Inference).await
    }
}

/// Blob store keeping objects in memory, optionally refusing uploads.
pub struct MockBlobStore {
    bucket: String,
    objects: Mutex<HashMap<String, Vec<u8>>>,
    reject_with: Mutex<Option<u16>>,
}

impl MockBlobStore {
    pub fn new(bucket: impl Into<String>) -> Self {
        Self {
            bucket: bucket.into(),
            objects: Mutex::new(HashMap::new()),
            reject_with: Mutex::new(None),
        }
    }

    /// Make every following upload fail with `status`.
    pub async fn reject_uploads(&self, status: u16) {
        *self.reject_with.lock().await = Some(status);
    }

    pub async fn object(&self, key: &str) -> Option<Vec<u8>> {
        self.objects.lock().await.get(key).cloned()
    }

    pub async fn len(&self) -> usize {
        self.objects.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

#[async_trait]
impl PluginAdapter for MockBlobStore {
    fn name(&self) -> &str {
        "mock-blob"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::BlobStore
    }

    async fn health_check(&self) -> Result<HealthStatus, SpiritError> {
        Ok(HealthStatus::Healthy)
    }
}

#[async_trait]
impl BlobStore for MockBlobStore {
    fn bucket(&self) -> &str {
        &self.bucket
    }

    async fn put_object(
        &self,
        key: &str,
        bytes: Vec<u8>,
        _content_type: &str,
    ) -> Result<BlobRef, SpiritError> {
        if let Some(status) = *self.reject_with.lock().await {
            return Err(SpiritError::Transport {
                service: AdapterType::BlobStore,
                message: format!("upload returned {status}"),
                status: Some(status),
                source: None,
            });
        }
        self.objects.lock().await.insert(key.to_string(), bytes);
        Ok(BlobRef {
            bucket: self.bucket.clone(),
            key: key.to_string(),
        })
    }
}
