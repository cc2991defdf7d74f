// SPDX-FileCopyrightText: 2026 SpiritBytes Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! OpenAI chat-completions adapter for SpiritBytes.
//!
//! Implements [`CompletionAdapter`] for recipe generation and detail
//! expansion. A missing API key is not a construction error: the provider
//! reports `is_configured() == false` and callers turn that into a
//! validation error or a template fallback.

pub mod client;
pub mod types;

use async_trait::async_trait;
use secrecy::SecretString;
use spiritbytes_config::SpiritConfig;
use spiritbytes_core::{
    AdapterType, CompletionAdapter, CompletionRequest, CompletionResponse, HealthStatus,
    PluginAdapter, SpiritError,
};
use tracing::{debug, info, warn};

use crate::client::OpenAiClient;
use crate::types::{ChatMessage, ChatRequest};

/// Environment variable consulted when the config carries no key.
pub const API_KEY_ENV: &str = "OPENAI_API_KEY";

pub struct OpenAiProvider {
    client: Option<OpenAiClient>,
    model: String,
    temperature: f32,
    max_tokens: u32,
}

impl OpenAiProvider {
    /// Build the provider from the completion section.
    ///
    /// # API Key Resolution
    /// 1. `completion.api_key` if set and non-empty
    /// 2. `OPENAI_API_KEY` environment variable
    /// 3. Otherwise the provider is built unconfigured
    pub fn new(config: &SpiritConfig) -> Result<Self, SpiritError> {
        let completion = &config.completion;
        let client = match resolve_api_key(&completion.api_key) {
            Some(key) => Some(OpenAiClient::new(key, completion.base_url.clone())?),
            None => {
                warn!("no OpenAI API key configured, completion calls will be refused");
                None
            }
        };

        info!(model = %completion.model, configured = client.is_some(), "OpenAI provider initialized");
        Ok(Self {
            client,
            model: completion.model.clone(),
            temperature: completion.temperature,
            max_tokens: completion.max_tokens,
        })
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    fn to_chat_request(&self, request: CompletionRequest) -> ChatRequest {
        ChatRequest {
            model: self.model.clone(),
            messages: vec![
                ChatMessage::system(request.system_prompt),
                ChatMessage::user(request.user_prompt),
            ],
            temperature: request.temperature.unwrap_or(self.temperature),
            max_tokens: request.max_tokens.unwrap_or(self.max_tokens),
        }
    }
}

#[async_trait]
impl PluginAdapter for OpenAiProvider {
    fn name(&self) -> &str {
        "openai"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Completion
    }

    /// Reports configuration only; a real call would spend quota.
    async fn health_check(&self) -> Result<HealthStatus, SpiritError> {
        if self.client.is_some() {
            Ok(HealthStatus::Healthy)
        } else {
            Ok(HealthStatus::Unhealthy(format!(
                "no API key (set completion.api_key or {API_KEY_ENV})"
            )))
        }
    }
}

#[async_trait]
impl CompletionAdapter for OpenAiProvider {
    fn is_configured(&self) -> bool {
        self.client.is_some()
    }

    async fn complete(
        &self,
        request: CompletionRequest,
    ) -> Result<CompletionResponse, SpiritError> {
        let client = self.client.as_ref().ok_or_else(|| {
            SpiritError::Validation(format!(
                "OpenAI API key not found. Set completion.api_key in config or {API_KEY_ENV}."
            ))
        })?;

        let chat = self.to_chat_request(request);
        let response = client.chat(&chat).await?;
        let content = response
            .first_content()
            .ok_or_else(|| SpiritError::Parse {
                message: "completion response had no content".into(),
            })?
            .to_string();

        debug!(model = %response.model, chars = content.len(), "completion finished");
        let model = if response.model.is_empty() {
            self.model.clone()
        } else {
            response.model
        };
        Ok(CompletionResponse { content, model })
    }
}

fn resolve_api_key(config_key: &Option<String>) -> Option<SecretString> {
    if let Some(key) = config_key
        && !key.trim().is_empty()
    {
        return Some(SecretString::from(key.clone()));
    }
    std::env::var(API_KEY_ENV)
        .ok()
        .filter(|k| !k.trim().is_empty())
        .map(SecretString::from)
}
