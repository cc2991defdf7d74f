// SPDX-FileCopyrightText: 2026 SpiritBytes Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! A complete mood flow over mock services and a temp SQLite database.

use std::sync::Arc;
use std::time::Duration;

use spiritbytes_core::{
    AttributeStore, CompletionAdapter, InferenceTransport, PreferenceSource, SpiritError,
};
use spiritbytes_emotion::EmotionClient;
use spiritbytes_flow::{FlowServices, FlowSettings, MoodFlow};
use spiritbytes_recipes::{RecipeDetailClient, RecipeGenerator};
use spiritbytes_storage::{Database, PreferenceStore, RecipeArchive};

use crate::memory_attributes::MemoryAttributeStore;
use crate::mock_completion::MockCompletion;
use crate::mock_inference::MockInference;

const KEY_PREFIX: &str = "test";

pub struct FlowHarnessBuilder {
    responses: Vec<String>,
    configured: bool,
    with_inference: bool,
    fallback_to_curated: bool,
    recipe_count: u32,
    timeout: Duration,
}

impl FlowHarnessBuilder {
    fn new() -> Self {
        Self {
            responses: Vec::new(),
            configured: true,
            with_inference: true,
            fallback_to_curated: false,
            recipe_count: 3,
            timeout: Duration::from_secs(30),
        }
    }

    /// Completion replies, in call order.
    pub fn with_mock_responses(mut self, responses: Vec<String>) -> Self {
        self.responses = responses;
        self
    }

    /// Build without a completion credential.
    pub fn without_completion_key(mut self) -> Self {
        self.configured = false;
        self
    }

    /// Build without an inference endpoint.
    pub fn without_inference(mut self) -> Self {
        self.with_inference = false;
        self
    }

    pub fn with_curated_fallback(mut self) -> Self {
        self.fallback_to_curated = true;
        self
    }

    pub fn with_recipe_count(mut self, count: u32) -> Self {
        self.recipe_count = count;
        self
    }

    /// Time budget for generation and detail calls.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub async fn build(self) -> Result<FlowHarness, SpiritError> {
        let temp_dir =
            tempfile::TempDir::new().map_err(|e| SpiritError::Storage { source: e.into() })?;
        let db_path = temp_dir.path().join("spiritbytes.db");
        let db = Database::open_path(&db_path.to_string_lossy(), true).await?;

        let completion = Arc::new(if self.configured {
            MockCompletion::with_responses(self.responses)
        } else {
            MockCompletion::unconfigured()
        });
        let inference = Arc::new(MockInference::new());
        let attributes = Arc::new(MemoryAttributeStore::new());

        let archive = Arc::new(RecipeArchive::new(db.clone(), KEY_PREFIX));
        let preferences = Arc::new(
            PreferenceStore::new(db, KEY_PREFIX)
                .with_remote(attributes.clone() as Arc<dyn AttributeStore>),
        );

        let completion_dyn = completion.clone() as Arc<dyn CompletionAdapter>;
        let prefs_dyn = preferences.clone() as Arc<dyn PreferenceSource>;
        let emotion = self
            .with_inference
            .then(|| EmotionClient::new(inference.clone() as Arc<dyn InferenceTransport>));

        let services = FlowServices {
            emotion,
            generator: RecipeGenerator::new(
                completion_dyn.clone(),
                prefs_dyn.clone(),
                self.timeout,
            ),
            details: RecipeDetailClient::new(completion_dyn, prefs_dyn, self.timeout),
            archive: archive.clone(),
            preferences: preferences.clone(),
        };
        let settings = FlowSettings {
            recipe_count: self.recipe_count,
            fallback_to_curated: self.fallback_to_curated,
        };

        Ok(FlowHarness {
            flow: Arc::new(MoodFlow::new(services, settings)),
            completion,
            inference,
            attributes,
            archive,
            preferences,
            _temp_dir: temp_dir,
        })
    }
}

/// Owns the temp directory; the database lives as long as the harness.
pub struct FlowHarness {
    pub flow: Arc<MoodFlow>,
    pub completion: Arc<MockCompletion>,
    pub inference: Arc<MockInference>,
    pub attributes: Arc<MemoryAttributeStore>,
    pub archive: Arc<RecipeArchive>,
    pub preferences: Arc<PreferenceStore>,
    _temp_dir: tempfile::TempDir,
}

impl FlowHarness {
    pub fn builder() -> FlowHarnessBuilder {
        FlowHarnessBuilder::new()
    }
}
