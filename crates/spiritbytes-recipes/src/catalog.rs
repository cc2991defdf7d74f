// SPDX-FileCopyrightText: 2026 SpiritBytes Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Hand-written recipes shown when generated ones are unavailable.

use spiritbytes_core::{Ingredient, PaletteColor, Recipe, RecipeBatch, RecipeSource};

struct CuratedRecipe {
    id: &'static str,
    title: &'static str,
    description: &'static str,
    color: PaletteColor,
    ingredients: [(&'static str, &'static str); 3],
}

const CALM: &[CuratedRecipe] = &[
    CuratedRecipe {
        id: "curated-1",
        title: "Banana & Peanut Butter Toast",
        description: "You'll want something easy, comforting and soothing",
        color: PaletteColor::SandBeige,
        ingredients: [
            ("Bananas", "Rich in magnesium and potassium, which help relax muscles"),
            ("Whole Grain Bread", "Complex carbs promote serotonin production"),
            ("Peanut Butter", "Contains tryptophan which helps produce melatonin"),
        ],
    },
    CuratedRecipe {
        id: "curated-2",
        title: "Turmeric Golden Milk",
        description: "A warm drink to help you unwind and relax",
        color: PaletteColor::Terracotta,
        ingredients: [
            ("Turmeric", "Anti-inflammatory properties that help reduce stress"),
            ("Warm Milk", "Contains tryptophan which promotes better sleep"),
            ("Honey", "Natural sweetener that helps soothe the mind"),
        ],
    },
    CuratedRecipe {
        id: "curated-3",
        title: "Avocado Cucumber Toast",
        description: "Light and refreshing for a calming effect",
        color: PaletteColor::OliveGreen,
        ingredients: [
            ("Avocado", "Rich in B vitamins that help reduce anxiety"),
            ("Cucumber", "Hydrating and contains antioxidants"),
            ("Whole Grain Bread", "Provides sustained energy and mood stability"),
        ],
    },
];

const HAPPY: &[CuratedRecipe] = &[
    CuratedRecipe {
        id: "curated-4",
        title: "Berry Smoothie Bowl",
        description: "Maintain your positive mood with these uplifting foods",
        color: PaletteColor::Terracotta,
        ingredients: [
            ("Berries", "Rich in antioxidants that support brain health"),
            ("Greek Yogurt", "Probiotics can enhance mood and cognitive function"),
            ("Honey", "Natural sweetener that helps maintain energy levels"),
        ],
    },
    CuratedRecipe {
        id: "curated-5",
        title: "Citrus Quinoa Salad",
        description: "Fresh and energizing to complement your mood",
        color: PaletteColor::SageMoss,
        ingredients: [
            ("Quinoa", "Complete protein that helps maintain stable energy"),
            ("Citrus Fruits", "Vitamin C boosts immune system and mood"),
            ("Nuts", "Healthy fats support brain function and positive mood"),
        ],
    },
];

const TIRED: &[CuratedRecipe] = &[
    CuratedRecipe {
        id: "curated-6",
        title: "Energy-Boosting Oatmeal",
        description: "Natural energy that lasts throughout the day",
        color: PaletteColor::EarthBrown,
        ingredients: [
            ("Oats", "Slow-release carbs provide sustained energy"),
            ("Nuts & Seeds", "Protein and healthy fats for long-lasting fuel"),
            ("Cinnamon", "Helps regulate blood sugar for steady energy"),
        ],
    },
    CuratedRecipe {
        id: "curated-7",
        title: "Green Power Smoothie",
        description: "Revitalizing nutrients to fight fatigue",
        color: PaletteColor::OliveGreen,
        ingredients: [
            ("Spinach", "Iron helps combat fatigue and increase energy"),
            ("Banana", "Natural sugars provide quick energy boost"),
            ("Chia Seeds", "Omega-3s support brain function and reduce fatigue"),
        ],
    },
];

/// Moods with their own curated set. Anything else gets the Calm set.
pub const CURATED_MOODS: &[&str] = &["Calm", "Happy", "Tired"];

/// Curated recipes for `mood` (case-insensitive), tagged as curated.
pub fn curated_recipes(mood: &str) -> RecipeBatch {
    let set = match mood.trim().to_lowercase().as_str() {
        "happy" => HAPPY,
        "tired" => TIRED,
        _ => CALM,
    };
    RecipeBatch {
        recipes: set.iter().map(to_recipe).collect(),
        source: RecipeSource::Curated,
    }
}

fn to_recipe(curated: &CuratedRecipe) -> Recipe {
    Recipe {
        id: curated.id.to_string(),
        title: curated.title.to_string(),
        description: curated.description.to_string(),
        color: curated.color,
        ingredients: curated
            .ingredients
            .iter()
            .map(|(name, benefits)| Ingredient::new(*name, *benefits))
            .collect(),
    }
}
