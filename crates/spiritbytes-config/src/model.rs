// SPDX-FileCopyrightText: 2026 SpiritBytes Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration model structs.
//!
//! All structs use `#[serde(deny_unknown_fields)]` so a misspelled key is
//! reported at startup instead of silently ignored.

use serde::{Deserialize, Serialize};

/// Top-level SpiritBytes configuration.
///
/// Every client receives the section it needs at construction; nothing reads
/// configuration from globals.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct SpiritConfig {
    #[serde(default)]
    pub app: AppConfig,

    /// Completion (LLM) service settings.
    #[serde(default)]
    pub completion: CompletionConfig,

    /// Emotion inference endpoint settings.
    #[serde(default)]
    pub inference: InferenceConfig,

    /// Object storage used by the blob-reference inference transport.
    #[serde(default)]
    pub blob_store: BlobStoreConfig,

    /// Remote user-attribute store.
    #[serde(default)]
    pub identity: IdentityConfig,

    /// Local SQLite persistence.
    #[serde(default)]
    pub storage: StorageConfig,

    #[serde(default)]
    pub generation: GenerationConfig,

    /// Per-call budgets for the four external call types.
    #[serde(default)]
    pub timeouts: TimeoutConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct AppConfig {
    /// Logging level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Completion service configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct CompletionConfig {
    /// API key. `None` falls back to the `OPENAI_API_KEY` environment variable.
    #[serde(default)]
    pub api_key: Option<String>,

    /// Chat completions endpoint.
    #[serde(default = "default_completion_url")]
    pub base_url: String,

    #[serde(default = "default_model")]
    pub model: String,

    #[serde(default = "default_temperature")]
    pub temperature: f32,

    /// Upper bound on generated tokens per call.
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,
}

impl Default for CompletionConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: default_completion_url(),
            model: default_model(),
            temperature: default_temperature(),
            max_tokens: default_max_tokens(),
        }
    }
}

fn default_completion_url() -> String {
    "https://api.openai.com/v1/chat/completions".to_string()
}

fn default_model() -> String {
    "gpt-3.5-turbo".to_string()
}

fn default_temperature() -> f32 {
    0.7
}

fn default_max_tokens() -> u32 {
    1000
}

/// How images travel to the inference service.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TransportKind {
    /// Upload to the blob store, then send `{imageKey, bucketName}`.
    #[default]
    BlobReference,
    /// Send the image inline as a base64 data URI.
    Inline,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct InferenceConfig {
    /// Analyze endpoint. `None` disables photo analysis.
    #[serde(default)]
    pub endpoint: Option<String>,

    #[serde(default)]
    pub transport: TransportKind,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct BlobStoreConfig {
    #[serde(default = "default_bucket")]
    pub bucket: String,

    #[serde(default = "default_region")]
    pub region: String,

    /// Upload URL with `{bucket}`, `{region}` and `{key}` placeholders.
    #[serde(default = "default_url_template")]
    pub url_template: String,
}

impl Default for BlobStoreConfig {
    fn default() -> Self {
        Self {
            bucket: default_bucket(),
            region: default_region(),
            url_template: default_url_template(),
        }
    }
}

fn default_bucket() -> String {
    "spiritbytes-profile-photos".to_string()
}

fn default_region() -> String {
    "us-east-2".to_string()
}

fn default_url_template() -> String {
    "https://{bucket}.s3.{region}.amazonaws.com/{key}".to_string()
}

/// Identity provider attribute API. All three fields are needed for remote sync.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct IdentityConfig {
    #[serde(default)]
    pub endpoint: Option<String>,

    #[serde(default)]
    pub user_id: Option<String>,

    #[serde(default)]
    pub access_token: Option<String>,
}

impl IdentityConfig {
    /// Whether remote preference sync can be attempted.
    pub fn is_configured(&self) -> bool {
        self.endpoint.is_some() && self.user_id.is_some() && self.access_token.is_some()
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct StorageConfig {
    #[serde(default = "default_database_path")]
    pub database_path: String,

    #[serde(default = "default_wal_mode")]
    pub wal_mode: bool,

    /// Namespace for the persisted keys, e.g. `spiritbytes_saved_recipes`.
    #[serde(default = "default_key_prefix")]
    pub key_prefix: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            database_path: default_database_path(),
            wal_mode: default_wal_mode(),
            key_prefix: default_key_prefix(),
        }
    }
}

fn default_database_path() -> String {
    dirs::data_dir()
        .map(|d| d.join("spiritbytes").join("spiritbytes.db"))
        .map(|p| p.display().to_string())
        .unwrap_or_else(|| "spiritbytes.db".to_string())
}

fn default_wal_mode() -> bool {
    true
}

fn default_key_prefix() -> String {
    "spiritbytes".to_string()
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct GenerationConfig {
    /// Recipes requested per generation call.
    #[serde(default = "default_recipe_count")]
    pub recipe_count: u32,

    /// Show the curated catalogue when generation fails instead of an error.
    #[serde(default)]
    pub fallback_to_curated: bool,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            recipe_count: default_recipe_count(),
            fallback_to_curated: false,
        }
    }
}

fn default_recipe_count() -> u32 {
    3
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct TimeoutConfig {
    #[serde(default = "default_upload_secs")]
    pub upload_secs: u64,

    #[serde(default = "default_inference_secs")]
    pub inference_secs: u64,

    #[serde(default = "default_generate_secs")]
    pub generate_secs: u64,

    #[serde(default = "default_detail_secs")]
    pub detail_secs: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self {
            upload_secs: default_upload_secs(),
            inference_secs: default_inference_secs(),
            generate_secs: default_generate_secs(),
            detail_secs: default_detail_secs(),
        }
    }
}

fn default_upload_secs() -> u64 {
    30
}

fn default_inference_secs() -> u64 {
    30
}

fn default_generate_secs() -> u64 {
    60
}

fn default_detail_secs() -> u64 {
    45
}
