// SPDX-FileCopyrightText: 2026 SpiritBytes Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Common types shared by the clients, stores, and the mood flow.

use std::path::PathBuf;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

use crate::error::SpiritError;
use crate::palette::PaletteColor;

/// Health status reported by adapter health checks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HealthStatus {
    /// Adapter is fully operational.
    Healthy,
    /// Adapter is operational but experiencing issues.
    Degraded(String),
    /// Adapter is not operational.
    Unhealthy(String),
}

/// Identifies an external collaborator. Also names the service in errors.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum AdapterType {
    BlobStore,
    Inference,
    Completion,
    Identity,
    Storage,
}

// --- Emotion inference ---

/// A raw emotion reading produced by the inference service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Emotion {
    /// Raw inference label, e.g. `HAPPY`.
    #[serde(rename = "type")]
    pub label: String,
    /// Confidence on a 0-100 scale.
    pub confidence: f64,
}

/// The inference service's answer for one image.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmotionAnalysis {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub emotions: Vec<Emotion>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
}

impl EmotionAnalysis {
    /// A successful call that found no face.
    pub fn is_empty(&self) -> bool {
        self.emotions.is_empty()
    }
}

/// An emotion translated into the mood vocabulary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MappedEmotion {
    #[serde(rename = "type")]
    pub mood: String,
    pub percentage: u8,
}

/// Image bytes from the capture device.
#[derive(Debug, Clone)]
pub enum ImageHandle {
    Path(PathBuf),
    Bytes(Vec<u8>),
}

impl ImageHandle {
    /// Reads the JPEG bytes behind the handle.
    pub async fn into_bytes(self) -> Result<Vec<u8>, SpiritError> {
        let bytes = match self {
            ImageHandle::Bytes(bytes) => bytes,
            ImageHandle::Path(path) => tokio::fs::read(&path).await.map_err(|e| {
                SpiritError::Validation(format!("cannot read image {}: {e}", path.display()))
            })?,
        };
        if bytes.is_empty() {
            return Err(SpiritError::Validation("image is empty".into()));
        }
        Ok(bytes)
    }
}

// --- Recipes ---

/// A recipe ingredient and why it helps the mood.
///
/// Upstream payloads sometimes list ingredients as bare strings; those
/// deserialize with empty `benefits`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "IngredientRepr")]
pub struct Ingredient {
    pub name: String,
    pub benefits: String,
}

impl Ingredient {
    pub fn new(name: impl Into<String>, benefits: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            benefits: benefits.into(),
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum IngredientRepr {
    Plain(String),
    Detailed {
        name: String,
        #[serde(default)]
        benefits: Option<String>,
    },
}

impl From<IngredientRepr> for Ingredient {
    fn from(repr: IngredientRepr) -> Self {
        match repr {
            IngredientRepr::Plain(name) => Ingredient::new(name, ""),
            IngredientRepr::Detailed { name, benefits } => {
                Ingredient::new(name, benefits.unwrap_or_default())
            }
        }
    }
}

/// A recipe suggestion shown on the recipe list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recipe {
    pub id: String,
    pub title: String,
    pub description: String,
    pub color: PaletteColor,
    pub ingredients: Vec<Ingredient>,
}

/// Where a batch of recipes came from.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum RecipeSource {
    /// Parsed from the completion service's JSON.
    Model,
    /// Rebuilt from free text the completion service returned.
    Reconstructed,
    /// Static catalogue content.
    Curated,
}

/// Recipes together with their provenance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecipeBatch {
    pub recipes: Vec<Recipe>,
    pub source: RecipeSource,
}

impl RecipeBatch {
    pub fn is_empty(&self) -> bool {
        self.recipes.is_empty()
    }
}

/// One preparation step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecipeStep {
    pub title: String,
    pub description: String,
}

impl RecipeStep {
    pub fn new(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
        }
    }
}

/// The expanded recipe shown on the detail screen.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecipeDetails {
    pub title: String,
    pub difficulty: String,
    pub time: String,
    pub servings: String,
    pub ingredients: Vec<String>,
    pub instructions: Vec<RecipeStep>,
}

/// A recipe the user saved, with the context it was saved in.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SavedRecipe {
    pub id: String,
    pub title: String,
    pub mood: String,
    pub saved_at: DateTime<Utc>,
    pub color: PaletteColor,
    pub recipe_details: RecipeDetails,
}

// --- Preferences ---

/// Diet tags and allergen notes that constrain recipe prompts.
///
/// Tags are trimmed and deduplicated on construction so the derived flags
/// always agree with the stored data.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct UserFoodPreferences {
    diets: Vec<String>,
    allergens: String,
}

impl UserFoodPreferences {
    pub fn new<I, S>(diets: I, allergens: impl Into<String>) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut unique: Vec<String> = Vec::new();
        for tag in diets {
            let tag = tag.as_ref().trim();
            if !tag.is_empty() && !unique.iter().any(|t| t == tag) {
                unique.push(tag.to_string());
            }
        }
        Self {
            diets: unique,
            allergens: allergens.into(),
        }
    }

    /// Parses the comma-joined storage form of the diet tags.
    pub fn from_joined(diets: &str, allergens: impl Into<String>) -> Self {
        Self::new(diets.split(','), allergens)
    }

    pub fn diets(&self) -> &[String] {
        &self.diets
    }

    pub fn allergens(&self) -> &str {
        &self.allergens
    }

    /// Diet tags in their comma-joined storage form.
    pub fn diets_joined(&self) -> String {
        self.diets.join(",")
    }

    pub fn has_diet_restrictions(&self) -> bool {
        !self.diets.is_empty()
    }

    pub fn has_allergens(&self) -> bool {
        !self.allergens.trim().is_empty()
    }
}

// --- Completion ---

/// A single-shot request to the completion service.
#[derive(Debug, Clone, PartialEq)]
pub struct CompletionRequest {
    pub system_prompt: String,
    pub user_prompt: String,
    /// Overrides the adapter's configured temperature.
    pub temperature: Option<f32>,
    /// Overrides the adapter's configured output budget.
    pub max_tokens: Option<u32>,
}

impl CompletionRequest {
    pub fn new(system_prompt: impl Into<String>, user_prompt: impl Into<String>) -> Self {
        Self {
            system_prompt: system_prompt.into(),
            user_prompt: user_prompt.into(),
            temperature: None,
            max_tokens: None,
        }
    }
}

/// Text returned by the completion service.
#[derive(Debug, Clone, PartialEq)]
pub struct CompletionResponse {
    pub content: String,
    pub model: String,
}
