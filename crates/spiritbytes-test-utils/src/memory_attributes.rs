// SPDX-FileCopyrightText: 2026 SpiritBytes Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use spiritbytes_core::{
    AdapterType, AttributeStore, HealthStatus, PluginAdapter, PreferenceSource, SpiritError,
    UserFoodPreferences,
};
use tokio::sync::Mutex;

/// Identity attribute store in memory. `set_failing(true)` makes every call
/// fail as if the provider were unreachable.
#[derive(Default)]
pub struct MemoryAttributeStore {
    attributes: Mutex<HashMap<String, String>>,
    failing: AtomicBool,
}

impl MemoryAttributeStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    pub async fn insert(&self, name: &str, value: &str) {
        self.attributes
            .lock()
            .await
            .insert(name.to_string(), value.to_string());
    }

    pub async fn snapshot(&self) -> HashMap<String, String> {
        self.attributes.lock().await.clone()
    }

    fn check(&self) -> Result<(), SpiritError> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(SpiritError::transport(AdapterType::Identity, "identity provider unreachable"));
        }
        Ok(())
    }
}

#[async_trait]
impl PluginAdapter for MemoryAttributeStore {
    fn name(&self) -> &str {
        "memory-attributes"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Identity
    }

    async fn health_check(&self) -> Result<HealthStatus, SpiritError> {
        match self.check() {
            Ok(()) => Ok(HealthStatus::Healthy),
            Err(e) => Ok(HealthStatus::Unhealthy(e.to_string())),
        }
    }
}

#[async_trait]
impl AttributeStore for MemoryAttributeStore {
    async fn get_attributes(&self) -> Result<HashMap<String, String>, SpiritError> {
        self.check()?;
        Ok(self.snapshot().await)
    }

    async fn set_attributes(
        &self,
        attributes: HashMap<String, String>,
    ) -> Result<(), SpiritError> {
        self.check()?;
        self.attributes.lock().await.extend(attributes);
        Ok(())
    }
}

/// Fixed preferences for clients that only read them.
pub struct StaticPreferences(pub UserFoodPreferences);

#[async_trait]
impl PreferenceSource for StaticPreferences {
    async fn current_preferences(&self) -> Result<UserFoodPreferences, SpiritError> {
        Ok(self.0.clone())
    }
}
