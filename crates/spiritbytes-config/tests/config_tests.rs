// SPDX-FileCopyrightText: 2026 SpiritBytes Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Integration tests for the SpiritBytes configuration system.

use spiritbytes_config::diagnostic::ConfigError;
use spiritbytes_config::model::{SpiritConfig, TransportKind};
use spiritbytes_config::{
    load_and_validate_path, load_and_validate_str, load_config, load_config_from_str,
};

#[test]
fn valid_toml_deserializes_into_spirit_config() {
    let toml = r#"
[app]
log_level = "debug"

[completion]
api_key = "sk-test-123"
model = "gpt-4o-mini"
temperature = 0.4
max_tokens = 800

[inference]
endpoint = "https://inference.example.com/analyze"
transport = "inline"

[blob_store]
bucket = "faces"
region = "eu-west-1"

[identity]
endpoint = "https://id.example.com"
user_id = "user-1"
access_token = "token"

[storage]
database_path = "/tmp/spiritbytes-test.db"
wal_mode = false
key_prefix = "sb"

[generation]
recipe_count = 5
fallback_to_curated = true

[timeouts]
upload_secs = 10
inference_secs = 11
generate_secs = 12
detail_secs = 13
"#;

    let config = load_config_from_str(toml).expect("valid TOML should deserialize");
    assert_eq!(config.app.log_level, "debug");
    assert_eq!(config.completion.api_key.as_deref(), Some("sk-test-123"));
    assert_eq!(config.completion.model, "gpt-4o-mini");
    assert_eq!(config.completion.max_tokens, 800);
    assert_eq!(config.inference.transport, TransportKind::Inline);
    assert_eq!(config.blob_store.bucket, "faces");
    assert!(config.identity.is_configured());
    assert!(!config.storage.wal_mode);
    assert_eq!(config.storage.key_prefix, "sb");
    assert_eq!(config.generation.recipe_count, 5);
    assert!(config.generation.fallback_to_curated);
    assert_eq!(config.timeouts.detail_secs, 13);
}

#[test]
fn empty_toml_uses_defaults() {
    let config = load_config_from_str("").expect("empty TOML should use defaults");

    assert_eq!(config.app.log_level, "info");
    assert!(config.completion.api_key.is_none());
    assert_eq!(config.completion.model, "gpt-3.5-turbo");
    assert_eq!(config.completion.temperature, 0.7);
    assert_eq!(config.completion.max_tokens, 1000);
    assert!(config.inference.endpoint.is_none());
    assert_eq!(config.inference.transport, TransportKind::BlobReference);
    assert_eq!(config.blob_store.bucket, "spiritbytes-profile-photos");
    assert_eq!(config.blob_store.region, "us-east-2");
    assert!(!config.identity.is_configured());
    assert_eq!(config.storage.key_prefix, "spiritbytes");
    assert_eq!(config.generation.recipe_count, 3);
    assert!(!config.generation.fallback_to_curated);
    assert_eq!(config.timeouts.generate_secs, 60);
}

#[test]
fn unknown_field_produces_suggestion() {
    let toml = r#"
[completion]
temprature = 0.2
"#;

    let errors = load_and_validate_str(toml).expect_err("should reject unknown field");
    match &errors[0] {
        ConfigError::UnknownKey {
            key,
            suggestion,
            span,
            ..
        } => {
            assert_eq!(key, "temprature");
            assert_eq!(suggestion.as_deref(), Some("temperature"));
            assert!(span.is_some(), "inline source should yield a span");
        }
        other => panic!("expected UnknownKey, got {other:?}"),
    }
}

#[test]
fn unknown_transport_is_rejected() {
    let toml = r#"
[inference]
transport = "carrier_pigeon"
"#;
    assert!(load_config_from_str(toml).is_err());
}

#[test]
fn wrong_type_reports_invalid_type() {
    let toml = r#"
[generation]
recipe_count = "three"
"#;

    let errors = load_and_validate_str(toml).expect_err("should reject string count");
    assert!(
        matches!(&errors[0], ConfigError::InvalidType { .. } | ConfigError::Other(_)),
        "got: {errors:?}"
    );
}

#[test]
fn validation_runs_after_deserialization() {
    let toml = r#"
[generation]
recipe_count = 50
"#;

    let errors = load_and_validate_str(toml).expect_err("count out of range");
    assert!(matches!(&errors[0], ConfigError::Validation { .. }));
    assert!(errors[0].to_string().contains("recipe_count"));
}

#[test]
fn env_vars_override_files() {
    figment::Jail::expect_with(|jail| {
        jail.create_file(
            "spiritbytes.toml",
            r#"
[completion]
model = "from-toml"
"#,
        )?;
        jail.set_env("SPIRITBYTES_COMPLETION_MODEL", "from-env");
        jail.set_env("SPIRITBYTES_BLOB_STORE_BUCKET", "env-bucket");
        jail.set_env("SPIRITBYTES_GENERATION_RECIPE_COUNT", "2");

        let config: SpiritConfig = load_config()?;
        assert_eq!(config.completion.model, "from-env");
        assert_eq!(config.blob_store.bucket, "env-bucket");
        assert_eq!(config.generation.recipe_count, 2);
        Ok(())
    });
}

#[test]
fn local_file_is_picked_up() {
    figment::Jail::expect_with(|jail| {
        jail.create_file(
            "spiritbytes.toml",
            r#"
[storage]
key_prefix = "jailed"
"#,
        )?;
        let config = load_config()?;
        assert_eq!(config.storage.key_prefix, "jailed");
        Ok(())
    });
}

#[test]
fn explicit_path_is_validated() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("custom.toml");
    std::fs::write(&path, "[timeouts]\nupload_secs = 0\n").unwrap();

    let errors = load_and_validate_path(&path).expect_err("zero timeout is invalid");
    assert!(errors[0].to_string().contains("timeouts.upload_secs"));
}

#[test]
fn defaults_round_trip_through_toml() {
    let config = SpiritConfig::default();
    let rendered = toml::to_string(&config).expect("defaults serialize");
    let parsed = load_and_validate_str(&rendered).expect("rendered defaults are valid");
    assert_eq!(parsed.completion.model, config.completion.model);
}
