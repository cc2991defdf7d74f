// SPDX-FileCopyrightText: 2026 SpiritBytes Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The user's saved recipes, stored as one JSON array.
//!
//! Every mutation is a whole-collection read-modify-write executed by
//! [`kv::update`], i.e. inside one transaction on the writer thread, so a
//! save and a remove racing each other cannot drop either change.

use chrono::Utc;
use spiritbytes_core::{PaletteColor, RecipeDetails, SavedRecipe, SpiritError};
use tracing::{debug, info, warn};

use crate::database::Database;
use crate::queries::kv::{self, KvWrite};

/// Outcome of [`RecipeArchive::toggle_saved`].
#[derive(Debug, Clone, PartialEq)]
pub enum SaveToggle {
    Saved(SavedRecipe),
    Removed,
}

pub struct RecipeArchive {
    db: Database,
    key: String,
}

impl RecipeArchive {
    pub fn new(db: Database, key_prefix: &str) -> Self {
        Self {
            db,
            key: format!("{key_prefix}_saved_recipes"),
        }
    }

    /// Save `details`. An existing entry with the same title is replaced,
    /// keeping titles unique within the archive.
    pub async fn save_recipe(
        &self,
        details: &RecipeDetails,
        mood: &str,
        color: PaletteColor,
    ) -> Result<SavedRecipe, SpiritError> {
        let details = details.clone();
        let mood = mood.to_string();
        let saved = kv::update(&self.db, &self.key, move |current| {
            let mut recipes = decode(current.as_deref())?;
            recipes.retain(|r| r.title != details.title);
            let saved = new_entry(&recipes, details, mood, color);
            recipes.push(saved.clone());
            Ok((KvWrite::Put(encode(&recipes)?), saved))
        })
        .await?;
        info!(title = %saved.title, mood = %saved.mood, "recipe saved");
        Ok(saved)
    }

    /// Remove every entry titled `title`. Returns whether anything was removed.
    pub async fn remove_recipe(&self, title: &str) -> Result<bool, SpiritError> {
        let title = title.to_string();
        let removed = kv::update(&self.db, &self.key, move |current| {
            let mut recipes = decode(current.as_deref())?;
            let before = recipes.len();
            recipes.retain(|r| r.title != title);
            if recipes.len() == before {
                return Ok((KvWrite::Keep, false));
            }
            Ok((KvWrite::Put(encode(&recipes)?), true))
        })
        .await?;
        debug!(removed, "remove_recipe finished");
        Ok(removed)
    }

    /// All saved recipes in save order.
    ///
    /// A collection that no longer parses is reported as empty, matching how
    /// the list screen behaves; mutations refuse to overwrite it.
    pub async fn get_saved_recipes(&self) -> Result<Vec<SavedRecipe>, SpiritError> {
        let raw = kv::get(&self.db, &self.key).await?;
        match decode(raw.as_deref()) {
            Ok(recipes) => Ok(recipes),
            Err(e) => {
                warn!(error = %e, key = %self.key, "saved recipes unreadable, treating as empty");
                Ok(Vec::new())
            }
        }
    }

    pub async fn get_saved_recipe_by_title(
        &self,
        title: &str,
    ) -> Result<Option<SavedRecipe>, SpiritError> {
        Ok(self
            .get_saved_recipes()
            .await?
            .into_iter()
            .find(|r| r.title == title))
    }

    pub async fn is_recipe_saved(&self, title: &str) -> Result<bool, SpiritError> {
        Ok(self
            .get_saved_recipes()
            .await?
            .iter()
            .any(|r| r.title == title))
    }

    pub async fn clear_saved_recipes(&self) -> Result<(), SpiritError> {
        kv::delete(&self.db, &self.key).await?;
        info!("saved recipes cleared");
        Ok(())
    }

    /// Save `details` unless a recipe with its title is already saved, in
    /// which case remove it. Decided and applied in one transaction.
    pub async fn toggle_saved(
        &self,
        details: &RecipeDetails,
        mood: &str,
        color: PaletteColor,
    ) -> Result<SaveToggle, SpiritError> {
        let details = details.clone();
        let mood = mood.to_string();
        let outcome = kv::update(&self.db, &self.key, move |current| {
            let mut recipes = decode(current.as_deref())?;
            let before = recipes.len();
            recipes.retain(|r| r.title != details.title);
            let outcome = if recipes.len() < before {
                SaveToggle::Removed
            } else {
                let saved = new_entry(&recipes, details, mood, color);
                recipes.push(saved.clone());
                SaveToggle::Saved(saved)
            };
            Ok((KvWrite::Put(encode(&recipes)?), outcome))
        })
        .await?;
        debug!(saved = matches!(outcome, SaveToggle::Saved(_)), "save toggled");
        Ok(outcome)
    }
}

fn decode(raw: Option<&str>) -> Result<Vec<SavedRecipe>, SpiritError> {
    match raw {
        None => Ok(Vec::new()),
        Some(s) if s.trim().is_empty() => Ok(Vec::new()),
        Some(s) => serde_json::from_str(s).map_err(|e| SpiritError::Parse {
            message: format!("saved recipes are not valid JSON: {e}"),
        }),
    }
}

fn encode(recipes: &[SavedRecipe]) -> Result<String, SpiritError> {
    serde_json::to_string(recipes).map_err(|e| SpiritError::Internal(e.to_string()))
}

/// Build an entry whose `recipe_<millis>` id is unique among `existing`.
fn new_entry(
    existing: &[SavedRecipe],
    details: RecipeDetails,
    mood: String,
    color: PaletteColor,
) -> SavedRecipe {
    let now = Utc::now();
    let mut millis = now.timestamp_millis();
    while existing.iter().any(|r| r.id == format!("recipe_{millis}")) {
        millis += 1;
    }
    SavedRecipe {
        id: format!("recipe_{millis}"),
        title: details.title.clone(),
        mood,
        saved_at: now,
        color,
        recipe_details: details,
    }
}
