// SPDX-FileCopyrightText: 2026 SpiritBytes Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration loader using Figment for layered config merging.
//!
//! Lookup order: `./spiritbytes.toml` > `~/.config/spiritbytes/spiritbytes.toml`
//! > `/etc/spiritbytes/spiritbytes.toml`, with `SPIRITBYTES_` environment
//! overrides on top.

#![allow(clippy::result_large_err)] // figment::Error is external and cannot be boxed without wrapper

use std::path::Path;

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};

use crate::model::SpiritConfig;

/// Config sections, longest first so `blob_store_` wins over any shorter prefix.
const SECTIONS: &[&str] = &[
    "blob_store",
    "completion",
    "generation",
    "inference",
    "identity",
    "timeouts",
    "storage",
    "app",
];

/// Load configuration from the standard XDG hierarchy with env var overrides.
///
/// Merge order (later overrides earlier):
/// 1. Compiled defaults
/// 2. `/etc/spiritbytes/spiritbytes.toml`
/// 3. `~/.config/spiritbytes/spiritbytes.toml`
/// 4. `./spiritbytes.toml`
/// 5. `SPIRITBYTES_*` environment variables
pub fn load_config() -> Result<SpiritConfig, figment::Error> {
    build_figment().extract()
}

/// Load configuration from a TOML string only (no files, no env).
pub fn load_config_from_str(toml_content: &str) -> Result<SpiritConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(SpiritConfig::default()))
        .merge(Toml::string(toml_content))
        .extract()
}

/// Load configuration from a specific file path with env var overrides.
pub fn load_config_from_path(path: &Path) -> Result<SpiritConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(SpiritConfig::default()))
        .merge(Toml::file(path))
        .merge(env_provider())
        .extract()
}

/// Build the Figment used for config loading, before extraction.
pub fn build_figment() -> Figment {
    Figment::new()
        .merge(Serialized::defaults(SpiritConfig::default()))
        .merge(Toml::file("/etc/spiritbytes/spiritbytes.toml"))
        .merge(Toml::file(user_config_path().unwrap_or_default()))
        .merge(Toml::file("spiritbytes.toml"))
        .merge(env_provider())
}

/// Path of the per-user config file, if the platform has a config dir.
pub fn user_config_path() -> Option<std::path::PathBuf> {
    dirs::config_dir().map(|d| d.join("spiritbytes/spiritbytes.toml"))
}

/// Environment provider with explicit section mapping.
///
/// `Env::split("_")` would turn `SPIRITBYTES_COMPLETION_API_KEY` into
/// `completion.api.key`; mapping the known section prefix keeps the field
/// name intact (`completion.api_key`).
fn env_provider() -> Env {
    Env::prefixed("SPIRITBYTES_").map(|key| map_env_key(key.as_str()).into())
}

fn map_env_key(key: &str) -> String {
    for section in SECTIONS {
        if let Some(field) = key
            .strip_prefix(section)
            .and_then(|rest| rest.strip_prefix('_'))
        {
            return format!("{section}.{field}");
        }
    }
    key.to_string()
}
