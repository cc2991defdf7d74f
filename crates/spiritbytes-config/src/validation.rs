// SPDX-FileCopyrightText: 2026 SpiritBytes Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Post-deserialization validation for configuration values.

use crate::diagnostic::ConfigError;
use crate::model::SpiritConfig;

const LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error"];

/// Validate a deserialized configuration, collecting every failure.
pub fn validate_config(config: &SpiritConfig) -> Result<(), Vec<ConfigError>> {
    let mut errors = Vec::new();

    if !LOG_LEVELS.contains(&config.app.log_level.as_str()) {
        errors.push(ConfigError::validation(format!(
            "app.log_level must be one of {}, got `{}`",
            LOG_LEVELS.join(", "),
            config.app.log_level
        )));
    }

    let completion = &config.completion;
    if !(0.0..=2.0).contains(&completion.temperature) {
        errors.push(ConfigError::validation(format!(
            "completion.temperature must be between 0.0 and 2.0, got {}",
            completion.temperature
        )));
    }
    if completion.max_tokens == 0 {
        errors.push(ConfigError::validation(
            "completion.max_tokens must be greater than 0",
        ));
    }
    check_http_url(&mut errors, "completion.base_url", &completion.base_url);
    if completion.model.trim().is_empty() {
        errors.push(ConfigError::validation("completion.model must not be empty"));
    }

    if let Some(endpoint) = &config.inference.endpoint {
        check_http_url(&mut errors, "inference.endpoint", endpoint);
    }

    let blob = &config.blob_store;
    if blob.bucket.trim().is_empty() {
        errors.push(ConfigError::validation("blob_store.bucket must not be empty"));
    }
    if !blob.url_template.contains("{key}") {
        errors.push(ConfigError::validation(
            "blob_store.url_template must contain the `{key}` placeholder",
        ));
    }

    let identity = &config.identity;
    if let Some(endpoint) = &identity.endpoint {
        check_http_url(&mut errors, "identity.endpoint", endpoint);
        if identity.user_id.is_none() {
            errors.push(ConfigError::validation(
                "identity.user_id is required when identity.endpoint is set",
            ));
        }
    }

    if config.storage.database_path.trim().is_empty() {
        errors.push(ConfigError::validation(
            "storage.database_path must not be empty",
        ));
    }
    let prefix = &config.storage.key_prefix;
    if prefix.is_empty() || prefix.chars().any(char::is_whitespace) {
        errors.push(ConfigError::validation(format!(
            "storage.key_prefix must be a non-empty word, got `{prefix}`"
        )));
    }

    let count = config.generation.recipe_count;
    if !(1..=10).contains(&count) {
        errors.push(ConfigError::validation(format!(
            "generation.recipe_count must be between 1 and 10, got {count}"
        )));
    }

    let timeouts = &config.timeouts;
    for (name, secs) in [
        ("upload_secs", timeouts.upload_secs),
        ("inference_secs", timeouts.inference_secs),
        ("generate_secs", timeouts.generate_secs),
        ("detail_secs", timeouts.detail_secs),
    ] {
        if secs == 0 {
            errors.push(ConfigError::validation(format!(
                "timeouts.{name} must be greater than 0"
            )));
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn check_http_url(errors: &mut Vec<ConfigError>, key: &str, value: &str) {
    if !(value.starts_with("http://") || value.starts_with("https://")) {
        errors.push(ConfigError::validation(format!(
            "{key} must be an http(s) URL, got `{value}`"
        )));
    }
}
