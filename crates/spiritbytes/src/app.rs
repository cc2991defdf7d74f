// SPDX-FileCopyrightText: 2026 SpiritBytes Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Wires the configured adapters into clients and stores.

use std::sync::Arc;
use std::time::Duration;

use spiritbytes_config::SpiritConfig;
use spiritbytes_core::{AttributeStore, CompletionAdapter, PreferenceSource, SpiritError};
use spiritbytes_emotion::{EmotionClient, build_transport};
use spiritbytes_flow::{FlowServices, FlowSettings, MoodFlow};
use spiritbytes_openai::OpenAiProvider;
use spiritbytes_recipes::{RecipeDetailClient, RecipeGenerator};
use spiritbytes_storage::{Database, HttpAttributeStore, PreferenceStore, RecipeArchive};
use tracing::debug;

pub struct App {
    pub emotion: Option<EmotionClient>,
    pub generator: RecipeGenerator,
    pub details: RecipeDetailClient,
    pub archive: Arc<RecipeArchive>,
    pub preferences: Arc<PreferenceStore>,
}

impl App {
    pub async fn assemble(config: &SpiritConfig) -> Result<Self, SpiritError> {
        let db = Database::open(&config.storage).await?;
        let prefix = &config.storage.key_prefix;

        let mut preferences = PreferenceStore::new(db.clone(), prefix);
        if let Some(remote) = HttpAttributeStore::from_config(&config.identity)? {
            preferences = preferences.with_remote(Arc::new(remote) as Arc<dyn AttributeStore>);
        }
        let preferences = Arc::new(preferences);
        let archive = Arc::new(RecipeArchive::new(db, prefix));

        let completion: Arc<dyn CompletionAdapter> = Arc::new(OpenAiProvider::new(config)?);
        let prefs_source = preferences.clone() as Arc<dyn PreferenceSource>;
        let timeouts = &config.timeouts;
        let generator = RecipeGenerator::new(
            completion.clone(),
            prefs_source.clone(),
            Duration::from_secs(timeouts.generate_secs),
        );
        let details = RecipeDetailClient::new(
            completion,
            prefs_source,
            Duration::from_secs(timeouts.detail_secs),
        );

        let emotion = build_transport(config)?.map(EmotionClient::new);
        debug!(
            inference = emotion.is_some(),
            remote_preferences = preferences.has_remote(),
            "application assembled"
        );

        Ok(Self {
            emotion,
            generator,
            details,
            archive,
            preferences,
        })
    }

    pub fn into_flow(self, config: &SpiritConfig) -> MoodFlow {
        MoodFlow::new(
            FlowServices {
                emotion: self.emotion,
                generator: self.generator,
                details: self.details,
                archive: self.archive,
                preferences: self.preferences,
            },
            FlowSettings::from(&config.generation),
        )
    }
}
