// SPDX-FileCopyrightText: 2026 SpiritBytes Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Core library for SpiritBytes.
//!
//! Holds the data model that flows through the emotion-to-recipe pipeline,
//! the shared [`SpiritError`] taxonomy, and the adapter traits behind which
//! every external service sits.

pub mod error;
pub mod palette;
pub mod timeout;
pub mod traits;
pub mod types;

pub use error::SpiritError;
pub use palette::{PALETTE, PaletteColor};
pub use timeout::with_timeout;
pub use types::{
    AdapterType, CompletionRequest, CompletionResponse, Emotion, EmotionAnalysis, HealthStatus,
    ImageHandle, Ingredient, MappedEmotion, Recipe, RecipeBatch, RecipeDetails, RecipeSource,
    RecipeStep, SavedRecipe, UserFoodPreferences,
};

pub use traits::{
    AttributeStore, BlobRef, BlobStore, CompletionAdapter, InferenceTransport, PluginAdapter,
    PreferenceSource,
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn adapter_type_round_trips() {
        use std::str::FromStr;

        let variants = [
            AdapterType::BlobStore,
            AdapterType::Inference,
            AdapterType::Completion,
            AdapterType::Identity,
            AdapterType::Storage,
        ];
        for variant in &variants {
            let s = variant.to_string();
            let parsed = AdapterType::from_str(&s).expect("should parse back");
            assert_eq!(*variant, parsed);
        }
        assert_eq!(AdapterType::BlobStore.to_string(), "blob_store");
    }

    #[test]
    fn recipe_source_serializes_snake_case() {
        let json = serde_json::to_string(&RecipeSource::Reconstructed).unwrap();
        assert_eq!(json, "\"reconstructed\"");
    }

    #[test]
    fn all_adapter_traits_are_exported() {
        fn _assert_plugin<T: PluginAdapter>() {}
        fn _assert_completion<T: CompletionAdapter>() {}
        fn _assert_blob<T: BlobStore>() {}
        fn _assert_inference<T: InferenceTransport>() {}
        fn _assert_attributes<T: AttributeStore>() {}
        fn _assert_preferences<T: PreferenceSource>() {}
    }
}
