// SPDX-FileCopyrightText: 2026 SpiritBytes Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Base adapter trait that all external-service adapters implement.

use async_trait::async_trait;

use crate::error::SpiritError;
use crate::types::{AdapterType, HealthStatus};

/// Identity and health reporting shared by every adapter.
#[async_trait]
pub trait PluginAdapter: Send + Sync + 'static {
    /// Returns the human-readable name of this adapter instance.
    fn name(&self) -> &str;

    /// Returns the semantic version of this adapter.
    fn version(&self) -> semver::Version;

    /// Returns which collaborator this adapter stands in for.
    fn adapter_type(&self) -> AdapterType;

    /// Performs a cheap health check without consuming paid quota.
    async fn health_check(&self) -> Result<HealthStatus, SpiritError>;
}
