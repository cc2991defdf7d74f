// SPDX-FileCopyrightText: 2026 SpiritBytes Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Recipe generation through the completion service.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use spiritbytes_core::{
    AdapterType, CompletionAdapter, PaletteColor, PreferenceSource, Recipe, RecipeBatch,
    RecipeSource, SpiritError, UserFoodPreferences, with_timeout,
};
use tracing::{debug, info, warn};

use crate::parse::{RecipeDraft, parse_recipes};
use crate::prompt::recipe_request;

/// Generates mood-matched recipes. Never substitutes curated content:
/// every failure is returned to the caller.
#[derive(Clone)]
pub struct RecipeGenerator {
    completion: Arc<dyn CompletionAdapter>,
    preferences: Arc<dyn PreferenceSource>,
    timeout: Duration,
}

impl RecipeGenerator {
    pub fn new(
        completion: Arc<dyn CompletionAdapter>,
        preferences: Arc<dyn PreferenceSource>,
        timeout: Duration,
    ) -> Self {
        Self {
            completion,
            preferences,
            timeout,
        }
    }

    pub async fn generate_recipes(&self, mood: &str, count: u32) -> Result<RecipeBatch, SpiritError> {
        self.generate_recipes_for_moods(&[mood.to_string()], count)
            .await
    }

    /// Generate for ranked moods, strongest first.
    ///
    /// An empty batch is a success; the caller decides whether to retry.
    pub async fn generate_recipes_for_moods(
        &self,
        moods: &[String],
        count: u32,
    ) -> Result<RecipeBatch, SpiritError> {
        let moods: Vec<String> = moods
            .iter()
            .map(|m| m.trim().to_string())
            .filter(|m| !m.is_empty())
            .collect();
        let Some(primary) = moods.first().cloned() else {
            return Err(SpiritError::Validation("at least one mood is required".into()));
        };
        if count == 0 {
            return Err(SpiritError::Validation("recipe count must be at least 1".into()));
        }
        if !self.completion.is_configured() {
            return Err(SpiritError::Validation(
                "recipe generation needs a completion API key".into(),
            ));
        }

        let prefs = self.current_preferences().await;
        let request = recipe_request(&moods, count, &prefs);
        debug!(mood = %primary, moods = moods.len(), count, "requesting recipes");

        let response = with_timeout(
            AdapterType::Completion,
            self.timeout,
            self.completion.complete(request),
        )
        .await?;

        // The chain ends with text reconstruction, which only fails when the
        // reply holds no recipe at all.
        let parsed = match parse_recipes(&response.content, &primary) {
            Ok(parsed) => parsed,
            Err(e) => {
                info!(mood = %primary, reason = %e, "completion returned no recipes");
                return Ok(RecipeBatch {
                    recipes: Vec::new(),
                    source: RecipeSource::Model,
                });
            }
        };

        let recipes = assemble(parsed.drafts);
        info!(
            mood = %primary,
            recipes = recipes.len(),
            source = %parsed.source,
            strategy = parsed.strategy,
            "recipes generated"
        );
        Ok(RecipeBatch {
            recipes,
            source: parsed.source,
        })
    }

    /// Preferences constrain prompts but never block them.
    async fn current_preferences(&self) -> UserFoodPreferences {
        match self.preferences.current_preferences().await {
            Ok(prefs) => prefs,
            Err(e) => {
                warn!(error = %e, "preferences unavailable, generating without constraints");
                UserFoodPreferences::default()
            }
        }
    }
}

/// Assign ids and palette colors by position.
fn assemble(drafts: Vec<RecipeDraft>) -> Vec<Recipe> {
    let stamp = Utc::now().timestamp_millis();
    drafts
        .into_iter()
        .enumerate()
        .map(|(index, draft)| Recipe {
            id: format!("{stamp}-{index}"),
            title: draft.title,
            description: draft.description,
            color: PaletteColor::for_index(index),
            ingredients: draft.ingredients,
        })
        .collect()
}
