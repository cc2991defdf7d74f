// SPDX-FileCopyrightText: 2026 SpiritBytes Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP client for the identity provider's user-attribute endpoint.
//!
//! `GET {endpoint}/users/{user_id}/attributes` returns
//! `{"attributes": {"diet": "...", "allergens": "..."}}`; `PUT` to the same
//! path with the same envelope merges the given attributes.

use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use spiritbytes_config::model::IdentityConfig;
use spiritbytes_core::{AdapterType, AttributeStore, HealthStatus, PluginAdapter, SpiritError};
use tracing::debug;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(15);

#[derive(Debug, Default, Serialize, Deserialize)]
struct AttributeEnvelope {
    #[serde(default)]
    attributes: HashMap<String, String>,
}

/// Attribute store backed by the identity provider's REST API.
pub struct HttpAttributeStore {
    client: reqwest::Client,
    url: String,
    access_token: SecretString,
}

impl std::fmt::Debug for HttpAttributeStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpAttributeStore")
            .field("url", &self.url)
            .field("access_token", &"[REDACTED]")
            .finish()
    }
}

impl HttpAttributeStore {
    pub fn new(
        endpoint: &str,
        user_id: &str,
        access_token: SecretString,
    ) -> Result<Self, SpiritError> {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| SpiritError::Transport {
                service: AdapterType::Identity,
                message: format!("failed to build HTTP client: {e}"),
                status: None,
                source: Some(Box::new(e)),
            })?;
        Ok(Self {
            client,
            url: format!(
                "{}/users/{}/attributes",
                endpoint.trim_end_matches('/'),
                user_id
            ),
            access_token,
        })
    }

    /// Build a store when the identity section is fully configured.
    pub fn from_config(config: &IdentityConfig) -> Result<Option<Self>, SpiritError> {
        match (&config.endpoint, &config.user_id, &config.access_token) {
            (Some(endpoint), Some(user_id), Some(token)) => Ok(Some(Self::new(
                endpoint,
                user_id,
                SecretString::from(token.clone()),
            )?)),
            _ => Ok(None),
        }
    }

    fn map_send_err(e: reqwest::Error) -> SpiritError {
        if e.is_timeout() {
            return SpiritError::Timeout {
                service: AdapterType::Identity,
                duration: REQUEST_TIMEOUT,
            };
        }
        SpiritError::Transport {
            service: AdapterType::Identity,
            message: format!("HTTP request failed: {e}"),
            status: None,
            source: Some(Box::new(e)),
        }
    }

    async fn check_status(response: reqwest::Response) -> Result<reqwest::Response, SpiritError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().await.unwrap_or_default();
        Err(SpiritError::Transport {
            service: AdapterType::Identity,
            message: format!("identity provider returned {status}: {body}"),
            status: Some(status.as_u16()),
            source: None,
        })
    }
}

#[async_trait]
impl PluginAdapter for HttpAttributeStore {
    fn name(&self) -> &str {
        "identity-http"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Identity
    }

    async fn health_check(&self) -> Result<HealthStatus, SpiritError> {
        match self.get_attributes().await {
            Ok(_) => Ok(HealthStatus::Healthy),
            Err(e) => Ok(HealthStatus::Unhealthy(e.to_string())),
        }
    }
}

#[async_trait]
impl AttributeStore for HttpAttributeStore {
    async fn get_attributes(&self) -> Result<HashMap<String, String>, SpiritError> {
        let response = self
            .client
            .get(&self.url)
            .bearer_auth(self.access_token.expose_secret())
            .send()
            .await
            .map_err(Self::map_send_err)?;
        let response = Self::check_status(response).await?;
        let body = response.text().await.map_err(Self::map_send_err)?;
        let envelope: AttributeEnvelope = serde_json::from_str(&body)?;
        debug!(count = envelope.attributes.len(), "fetched user attributes");
        Ok(envelope.attributes)
    }

    async fn set_attributes(
        &self,
        attributes: HashMap<String, String>,
    ) -> Result<(), SpiritError> {
        let response = self
            .client
            .put(&self.url)
            .bearer_auth(self.access_token.expose_secret())
            .json(&AttributeEnvelope { attributes })
            .send()
            .await
            .map_err(Self::map_send_err)?;
        Self::check_status(response).await?;
        debug!("updated user attributes");
        Ok(())
    }
}
