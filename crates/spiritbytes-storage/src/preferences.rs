// SPDX-FileCopyrightText: 2026 SpiritBytes Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Dietary preferences: local store plus opportunistic remote mirror.
//!
//! The local copy is what the app reads for display and prompt building;
//! it is always available offline. The identity provider's attributes are
//! the long-term record and are reconciled when reachable.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use spiritbytes_core::{AttributeStore, PreferenceSource, SpiritError, UserFoodPreferences};
use tracing::{debug, info, warn};

use crate::database::Database;
use crate::queries::kv;

/// Remote attribute holding the comma-joined diet tags.
pub const DIET_ATTRIBUTE: &str = "diet";
/// Remote attribute holding the allergen text.
pub const ALLERGENS_ATTRIBUTE: &str = "allergens";

/// Diet options offered by the preference picker.
pub const DIET_OPTIONS: &[&str] = &[
    "Vegetarian",
    "Vegan",
    "Gluten Free",
    "High Protein",
    "Low Carb",
    "Low Fat",
];

/// Where [`PreferenceStore::fetch_remote`] got its answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PreferenceOrigin {
    /// Pulled from the identity provider and mirrored locally.
    Remote,
    /// Remote unavailable or unconfigured; local copy returned.
    Local,
}

pub struct PreferenceStore {
    db: Database,
    remote: Option<Arc<dyn AttributeStore>>,
    diets_key: String,
    allergens_key: String,
}

impl PreferenceStore {
    pub fn new(db: Database, key_prefix: &str) -> Self {
        Self {
            db,
            remote: None,
            diets_key: format!("{key_prefix}_diet_preferences"),
            allergens_key: format!("{key_prefix}_allergens"),
        }
    }

    /// Attach the identity provider's attribute store.
    pub fn with_remote(mut self, remote: Arc<dyn AttributeStore>) -> Self {
        self.remote = Some(remote);
        self
    }

    pub fn has_remote(&self) -> bool {
        self.remote.is_some()
    }

    pub async fn get_local_preferences(&self) -> Result<UserFoodPreferences, SpiritError> {
        let keys = [self.diets_key.as_str(), self.allergens_key.as_str()];
        let values = kv::get_many(&self.db, &keys).await?;
        let mut values = values.into_iter();
        let diets = values.next().flatten().unwrap_or_default();
        let allergens = values.next().flatten().unwrap_or_default();
        Ok(UserFoodPreferences::from_joined(&diets, allergens))
    }

    /// Write both fields in one transaction.
    pub async fn save_local_preferences(
        &self,
        prefs: &UserFoodPreferences,
    ) -> Result<(), SpiritError> {
        kv::put_many(
            &self.db,
            vec![
                (self.diets_key.clone(), prefs.diets_joined()),
                (self.allergens_key.clone(), prefs.allergens().to_string()),
            ],
        )
        .await?;
        debug!(
            diets = prefs.diets().len(),
            has_allergens = prefs.has_allergens(),
            "preferences saved locally"
        );
        Ok(())
    }

    /// Pull preferences from the identity provider and mirror them locally.
    ///
    /// A remote failure is logged and answered from the local copy; only a
    /// local storage failure is returned as an error.
    pub async fn fetch_remote(
        &self,
    ) -> Result<(UserFoodPreferences, PreferenceOrigin), SpiritError> {
        let Some(remote) = &self.remote else {
            return Ok((self.get_local_preferences().await?, PreferenceOrigin::Local));
        };

        match remote.get_attributes().await {
            Ok(attributes) => {
                let prefs = from_attributes(&attributes);
                self.save_local_preferences(&prefs).await?;
                info!(diets = prefs.diets().len(), "preferences pulled from identity store");
                Ok((prefs, PreferenceOrigin::Remote))
            }
            Err(e) => {
                warn!(error = %e, "remote preferences unavailable, using local copy");
                Ok((self.get_local_preferences().await?, PreferenceOrigin::Local))
            }
        }
    }

    /// Write locally, then remotely.
    ///
    /// The local write is durable before the remote call starts. A remote
    /// failure returns [`SpiritError::PartialPersistence`] so the caller can
    /// report "saved on this device only".
    pub async fn save_preferences(&self, prefs: &UserFoodPreferences) -> Result<(), SpiritError> {
        self.save_local_preferences(prefs).await?;

        let Some(remote) = &self.remote else {
            debug!("no identity store configured, preferences kept locally");
            return Ok(());
        };

        remote
            .set_attributes(to_attributes(prefs))
            .await
            .map_err(|e| {
                warn!(error = %e, "remote preference save failed after local write");
                SpiritError::PartialPersistence {
                    message: e.to_string(),
                }
            })
    }

    /// Push the local copy to the identity provider.
    pub async fn sync_remote(&self) -> Result<(), SpiritError> {
        let remote = self.remote.as_ref().ok_or_else(|| {
            SpiritError::Validation("no identity store configured for preference sync".into())
        })?;
        let prefs = self.get_local_preferences().await?;
        remote.set_attributes(to_attributes(&prefs)).await?;
        info!("local preferences pushed to identity store");
        Ok(())
    }
}

#[async_trait]
impl PreferenceSource for PreferenceStore {
    async fn current_preferences(&self) -> Result<UserFoodPreferences, SpiritError> {
        self.get_local_preferences().await
    }
}

fn from_attributes(attributes: &HashMap<String, String>) -> UserFoodPreferences {
    UserFoodPreferences::from_joined(
        attributes.get(DIET_ATTRIBUTE).map(String::as_str).unwrap_or(""),
        attributes.get(ALLERGENS_ATTRIBUTE).cloned().unwrap_or_default(),
    )
}

fn to_attributes(prefs: &UserFoodPreferences) -> HashMap<String, String> {
    HashMap::from([
        (DIET_ATTRIBUTE.to_string(), prefs.diets_joined()),
        (ALLERGENS_ATTRIBUTE.to_string(), prefs.allergens().to_string()),
    ])
}

#[cfg(test)]
mod tests {
    use super::*;
    use spiritbytes_core::{AdapterType, HealthStatus, PluginAdapter};
    use tracing_test::traced_test;

    struct Unreachable;

    #[async_trait]
    impl PluginAdapter for Unreachable {
        fn name(&self) -> &str {
            "unreachable"
        }
        fn version(&self) -> semver::Version {
            semver::Version::new(0, 0, 0)
        }
        fn adapter_type(&self) -> AdapterType {
            AdapterType::Identity
        }
        async fn health_check(&self) -> Result<HealthStatus, SpiritError> {
            Ok(HealthStatus::Unhealthy("down".into()))
        }
    }

    #[async_trait]
    impl AttributeStore for Unreachable {
        async fn get_attributes(&self) -> Result<HashMap<String, String>, SpiritError> {
            Err(SpiritError::transport(AdapterType::Identity, "connection refused"))
        }
        async fn set_attributes(
            &self,
            _attributes: HashMap<String, String>,
        ) -> Result<(), SpiritError> {
            Err(SpiritError::transport(AdapterType::Identity, "connection refused"))
        }
    }

    #[tokio::test]
    #[traced_test]
    async fn unreachable_remote_falls_back_with_warning() {
        let db = Database::open_in_memory().await.unwrap();
        let store = PreferenceStore::new(db, "spiritbytes").with_remote(Arc::new(Unreachable));
        let (prefs, origin) = store.fetch_remote().await.unwrap();
        assert_eq!(origin, PreferenceOrigin::Local);
        assert_eq!(prefs, UserFoodPreferences::default());
        assert!(logs_contain("remote preferences unavailable"));
    }

    #[test]
    fn attributes_round_trip() {
        let prefs = UserFoodPreferences::new(["Vegan", "Low Fat"], "shellfish");
        assert_eq!(from_attributes(&to_attributes(&prefs)), prefs);
    }

    #[test]
    fn missing_attributes_mean_no_preferences() {
        let prefs = from_attributes(&HashMap::new());
        assert!(!prefs.has_diet_restrictions());
        assert!(!prefs.has_allergens());
    }

    #[tokio::test]
    async fn local_round_trip_keeps_invariants() {
        let db = Database::open_in_memory().await.unwrap();
        let store = PreferenceStore::new(db, "spiritbytes");

        let empty = store.get_local_preferences().await.unwrap();
        assert_eq!(empty, UserFoodPreferences::default());

        let prefs = UserFoodPreferences::new(["Vegetarian", "Gluten Free"], "tree nuts");
        store.save_local_preferences(&prefs).await.unwrap();
        let loaded = store.get_local_preferences().await.unwrap();
        assert_eq!(loaded, prefs);
        assert_eq!(loaded.has_diet_restrictions(), !loaded.diets().is_empty());
    }

    #[tokio::test]
    async fn sync_without_remote_is_a_validation_error() {
        let db = Database::open_in_memory().await.unwrap();
        let store = PreferenceStore::new(db, "spiritbytes");
        let err = store.sync_remote().await.unwrap_err();
        assert!(matches!(err, SpiritError::Validation(_)));
    }
}
