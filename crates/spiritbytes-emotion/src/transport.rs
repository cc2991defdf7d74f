// SPDX-FileCopyrightText: 2026 SpiritBytes Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The two ways an image reaches the inference service.

use std::sync::Arc;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use async_trait::async_trait;
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use rand::Rng;
use serde::Serialize;
use spiritbytes_config::SpiritConfig;
use spiritbytes_config::model::TransportKind;
use spiritbytes_core::{
    AdapterType, BlobStore, HealthStatus, InferenceTransport, PluginAdapter, SpiritError,
    with_timeout,
};
use tracing::{debug, info};

use crate::blob::HttpBlobStore;

const CLIENT_TIMEOUT: Duration = Duration::from_secs(120);
const BASE36: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";

/// Unique object key: `emotion-<unix millis>-<13 base-36 chars>.jpg`.
pub fn image_key() -> String {
    let millis = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis())
        .unwrap_or_default();
    let mut rng = rand::thread_rng();
    let suffix: String = (0..13)
        .map(|_| BASE36[rng.gen_range(0..BASE36.len())] as char)
        .collect();
    format!("emotion-{millis}-{suffix}.jpg")
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct BlobReferenceBody<'a> {
    image_key: &'a str,
    bucket_name: &'a str,
}

#[derive(Serialize)]
struct InlineBody {
    image: String,
}

/// POST JSON to the analyze endpoint and return the raw body.
#[derive(Debug, Clone)]
struct AnalyzeEndpoint {
    client: reqwest::Client,
    url: String,
}

impl AnalyzeEndpoint {
    fn new(url: String) -> Result<Self, SpiritError> {
        let client = reqwest::Client::builder()
            .timeout(CLIENT_TIMEOUT)
            .build()
            .map_err(|e| SpiritError::Transport {
                service: AdapterType::Inference,
                message: format!("failed to build HTTP client: {e}"),
                status: None,
                source: Some(Box::new(e)),
            })?;
        Ok(Self { client, url })
    }

    async fn post<B: Serialize + Sync>(&self, body: &B) -> Result<String, SpiritError> {
        let response = self
            .client
            .post(&self.url)
            .json(body)
            .send()
            .await
            .map_err(|e| SpiritError::Transport {
                service: AdapterType::Inference,
                message: format!("HTTP request failed: {e}"),
                status: None,
                source: Some(Box::new(e)),
            })?;

        let status = response.status();
        let text = response.text().await.map_err(|e| SpiritError::Transport {
            service: AdapterType::Inference,
            message: format!("failed to read response body: {e}"),
            status: Some(status.as_u16()),
            source: Some(Box::new(e)),
        })?;
        debug!(status = %status, len = text.len(), "inference response received");

        if !status.is_success() {
            return Err(SpiritError::Transport {
                service: AdapterType::Inference,
                message: format!("inference returned {status}: {text}"),
                status: Some(status.as_u16()),
                source: None,
            });
        }
        Ok(text)
    }
}

/// Upload to the blob store, then send `{imageKey, bucketName}`.
pub struct BlobReferenceTransport {
    blob: Arc<dyn BlobStore>,
    endpoint: AnalyzeEndpoint,
    upload_timeout: Duration,
    inference_timeout: Duration,
}

impl BlobReferenceTransport {
    pub fn new(
        blob: Arc<dyn BlobStore>,
        endpoint: String,
        upload_timeout: Duration,
        inference_timeout: Duration,
    ) -> Result<Self, SpiritError> {
        Ok(Self {
            blob,
            endpoint: AnalyzeEndpoint::new(endpoint)?,
            upload_timeout,
            inference_timeout,
        })
    }
}

#[async_trait]
impl PluginAdapter for BlobReferenceTransport {
    fn name(&self) -> &str {
        "inference-blob-reference"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Inference
    }

    async fn health_check(&self) -> Result<HealthStatus, SpiritError> {
        self.blob.health_check().await
    }
}

#[async_trait]
impl InferenceTransport for BlobReferenceTransport {
    async fn submit(&self, image: Vec<u8>) -> Result<String, SpiritError> {
        let key = image_key();
        let blob = with_timeout(
            AdapterType::BlobStore,
            self.upload_timeout,
            self.blob.put_object(&key, image, "image/jpeg"),
        )
        .await?;

        let body = BlobReferenceBody {
            image_key: &blob.key,
            bucket_name: &blob.bucket,
        };
        with_timeout(
            AdapterType::Inference,
            self.inference_timeout,
            self.endpoint.post(&body),
        )
        .await
    }
}

/// Send the image inline as a base64 data URI.
pub struct InlineTransport {
    endpoint: AnalyzeEndpoint,
    inference_timeout: Duration,
}

impl InlineTransport {
    pub fn new(endpoint: String, inference_timeout: Duration) -> Result<Self, SpiritError> {
        Ok(Self {
            endpoint: AnalyzeEndpoint::new(endpoint)?,
            inference_timeout,
        })
    }
}

#[async_trait]
impl PluginAdapter for InlineTransport {
    fn name(&self) -> &str {
        "inference-inline"
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
impl InferenceTransport for InlineTransport {
    async fn submit(&self, image: Vec<u8>) -> Result<String, SpiritError> {
        let body = InlineBody {
            image: format!("data:image/jpeg;base64,{}", STANDARD.encode(&image)),
        };
        with_timeout(
            AdapterType::Inference,
            self.inference_timeout,
            self.endpoint.post(&body),
        )
        .await
    }
}

/// Build the configured transport. `None` when no endpoint is set.
pub fn build_transport(
    config: &SpiritConfig,
) -> Result<Option<Arc<dyn InferenceTransport>>, SpiritError> {
    let Some(endpoint) = config.inference.endpoint.clone() else {
        return Ok(None);
    };
    let timeouts = &config.timeouts;
    let inference_timeout = Duration::from_secs(timeouts.inference_secs);

    let transport: Arc<dyn InferenceTransport> = match config.inference.transport {
        TransportKind::BlobReference => {
            let blob = Arc::new(HttpBlobStore::new(&config.blob_store)?);
            Arc::new(BlobReferenceTransport::new(
                blob,
                endpoint,
                Duration::from_secs(timeouts.upload_secs),
                inference_timeout,
            )?)
        }
        TransportKind::Inline => Arc::new(InlineTransport::new(endpoint, inference_timeout)?),
    };
    info!(transport = transport.name(), "inference transport ready");
    Ok(Some(transport))
}
