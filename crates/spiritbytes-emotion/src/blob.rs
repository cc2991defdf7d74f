// SPDX-FileCopyrightText: 2026 SpiritBytes Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Blob store reached with a plain HTTP PUT per object.

use std::time::Duration;

use async_trait::async_trait;
use spiritbytes_config::model::BlobStoreConfig;
use spiritbytes_core::{AdapterType, BlobRef, BlobStore, HealthStatus, PluginAdapter, SpiritError};
use tracing::debug;

const CLIENT_TIMEOUT: Duration = Duration::from_secs(120);

/// Uploads to `url_template` with `{bucket}`, `{region}` and `{key}` filled in.
#[derive(Debug, Clone)]
pub struct HttpBlobStore {
    client: reqwest::Client,
    bucket: String,
    region: String,
    url_template: String,
}

impl HttpBlobStore {
    pub fn new(config: &BlobStoreConfig) -> Result<Self, SpiritError> {
        let client = reqwest::Client::builder()
            .timeout(CLIENT_TIMEOUT)
            .build()
            .map_err(|e| SpiritError::Transport {
                service: AdapterType::BlobStore,
                message: format!("failed to build HTTP client: {e}"),
                status: None,
                source: Some(Box::new(e)),
            })?;
        Ok(Self {
            client,
            bucket: config.bucket.clone(),
            region: config.region.clone(),
            url_template: config.url_template.clone(),
        })
    }

    pub fn object_url(&self, key: &str) -> String {
        self.url_template
            .replace("{bucket}", &self.bucket)
            .replace("{region}", &self.region)
            .replace("{key}", key)
    }
}

#[async_trait]
impl PluginAdapter for HttpBlobStore {
    fn name(&self) -> &str {
        "blob-http"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::BlobStore
    }

    /// Uploading is the only permitted operation, so health is limited to
    /// the URL being well formed.
    async fn health_check(&self) -> Result<HealthStatus, SpiritError> {
        let url = self.object_url("health");
        if url.starts_with("http://") || url.starts_with("https://") {
            Ok(HealthStatus::Healthy)
        } else {
            Ok(HealthStatus::Unhealthy(format!("unusable upload URL: {url}")))
        }
    }
}

#[async_trait]
impl BlobStore for HttpBlobStore {
    fn bucket(&self) -> &str {
        &self.bucket
    }

    async fn put_object(
        &self,
        key: &str,
        bytes: Vec<u8>,
        content_type: &str,
    ) -> Result<BlobRef, SpiritError> {
        let url = self.object_url(key);
        let size = bytes.len();
        let response = self
            .client
            .put(&url)
            .header(reqwest::header::CONTENT_TYPE, content_type)
            .body(bytes)
            .send()
            .await
            .map_err(|e| SpiritError::Transport {
                service: AdapterType::BlobStore,
                message: format!("upload failed: {e}"),
                status: None,
                source: Some(Box::new(e)),
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(SpiritError::Transport {
                service: AdapterType::BlobStore,
                message: format!("upload returned {status}: {body}"),
                status: Some(status.as_u16()),
                source: None,
            });
        }

        debug!(key, size, bucket = %self.bucket, "image uploaded");
        Ok(BlobRef {
            bucket: self.bucket.clone(),
            key: key.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{body_bytes, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn store(server: &MockServer) -> HttpBlobStore {
        HttpBlobStore::new(&BlobStoreConfig {
            bucket: "photos".into(),
            region: "us-east-2".into(),
            url_template: format!("{}/{{bucket}}/{{key}}", server.uri()),
        })
        .unwrap()
    }

    #[test]
    fn template_placeholders_are_filled() {
        let store = HttpBlobStore::new(&BlobStoreConfig::default()).unwrap();
        assert_eq!(
            store.object_url("emotion-1-abc.jpg"),
            "https://spiritbytes-profile-photos.s3.us-east-2.amazonaws.com/emotion-1-abc.jpg"
        );
    }

    #[tokio::test]
    async fn put_sends_jpeg_bytes() {
        let server = MockServer::start().await;
        Mock::given(method("PUT"))
            .and(path("/photos/face.jpg"))
            .and(header("content-type", "image/jpeg"))
            .and(body_bytes(vec![0xFF, 0xD8]))
            .respond_with(ResponseTemplate::new(200))
            .expect(1)
            .mount(&server)
            .await;

        let blob = store(&server)
            .put_object("face.jpg", vec![0xFF, 0xD8], "image/jpeg")
            .await
            .unwrap();
        assert_eq!(blob.bucket, "photos");
        assert_eq!(blob.key, "face.jpg");
    }

    #[tokio::test]
    async fn forbidden_upload_is_transport_error() {
        let server = MockServer::start().await;
        Mock::given(method("PUT"))
            .respond_with(ResponseTemplate::new(403).set_body_string("AccessDenied"))
            .expect(1)
            .mount(&server)
            .await;

        let err = store(&server)
            .put_object("face.jpg", vec![1], "image/jpeg")
            .await
            .unwrap_err();
        assert_eq!(err.status(), Some(403));
        assert!(err.is_retryable());
    }
}
