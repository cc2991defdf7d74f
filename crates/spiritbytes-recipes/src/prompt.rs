// SPDX-FileCopyrightText: 2026 SpiritBytes Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Prompt text for recipe generation and detail expansion.

use spiritbytes_core::{CompletionRequest, UserFoodPreferences};

const PERSONA: &str =
    "You are a nutrition expert and chef who specializes in mood-boosting foods.";

/// Mood used in detail prompts when the caller has none.
pub const DEFAULT_DETAIL_MOOD: &str = "tired";

/// Weighted description of ranked moods.
///
/// `["Happy"]` is "Happy", `["Happy", "Calm"]` is "primarily Happy with
/// elements of Calm", and three or more join the secondary moods with a
/// final "and".
pub fn describe_moods(moods: &[String]) -> String {
    match moods {
        [] => String::new(),
        [only] => only.clone(),
        [primary, rest @ ..] => format!("primarily {primary} with elements of {}", join_and(rest)),
    }
}

fn join_and(items: &[String]) -> String {
    match items {
        [] => String::new(),
        [only] => only.clone(),
        [init @ .., last] => format!("{} and {last}", init.join(", ")),
    }
}

/// Diet and allergen clauses, empty when the user has no constraints.
pub fn preference_clauses(prefs: &UserFoodPreferences) -> String {
    let mut clauses = String::new();
    if prefs.has_diet_restrictions() {
        clauses.push_str(&format!(
            "\nEvery recipe must fit these dietary preferences: {}.",
            prefs.diets().join(", ")
        ));
    }
    if prefs.has_allergens() {
        clauses.push_str(&format!(
            "\nThe user is allergic to: {}. Do not use these ingredients or anything containing them.",
            prefs.allergens().trim()
        ));
    }
    clauses
}

/// Prompts asking for `count` recipe summaries for the ranked `moods`.
pub fn recipe_request(
    moods: &[String],
    count: u32,
    prefs: &UserFoodPreferences,
) -> CompletionRequest {
    let description = describe_moods(moods);
    let mut system = format!(
        "{PERSONA}\nGenerate {count} different recipe ideas that would be helpful for someone who is feeling \"{description}\"."
    );
    if moods.len() > 1 {
        system.push_str(&format!(
            "\nChoose ingredients mainly for the dominant mood ({}) while still acknowledging the secondary moods.",
            moods[0]
        ));
    }
    system.push_str(&preference_clauses(prefs));

    let user = format!(
        r#"For each recipe, include:
1. A title
2. A short description explaining why this food is good for someone feeling {description}
3. Three key ingredients with specific benefits related to the mood

Return the data in JSON format with this exact structure:
{{
  "recipes": [
    {{
      "title": "Recipe Title",
      "description": "Why this is good for mood",
      "ingredients": [
        {{"name": "Ingredient 1", "benefits": "Specific benefit"}},
        {{"name": "Ingredient 2", "benefits": "Specific benefit"}},
        {{"name": "Ingredient 3", "benefits": "Specific benefit"}}
      ]
    }}
  ]
}}

Do not include any text before or after the JSON."#
    );

    CompletionRequest::new(system, user)
}

/// Prompts asking for the full recipe behind `title`.
pub fn detail_request(
    title: &str,
    mood: Option<&str>,
    prefs: &UserFoodPreferences,
) -> CompletionRequest {
    let mood = mood
        .map(str::trim)
        .filter(|m| !m.is_empty())
        .unwrap_or(DEFAULT_DETAIL_MOOD);
    let mut system = format!(
        "{PERSONA}\nCreate a detailed recipe for \"{title}\" that would be helpful for someone who is feeling {mood}."
    );
    system.push_str(&preference_clauses(prefs));

    let user = r#"Please provide a complete recipe with:
1. A difficulty level (Very Easy, Easy, Medium, Hard)
2. Preparation time
3. Number of servings
4. A list of ingredients with measurements
5. Step-by-step instructions, with each step having a title and detailed description

Return the data in JSON format with this exact structure:
{
  "difficulty": "Easy",
  "time": "15 Minutes",
  "servings": "2 Servings",
  "ingredients": ["Ingredient 1 with quantity", "Ingredient 2 with quantity", ...],
  "instructions": [
    {
      "title": "Step 1 title",
      "description": "Detailed instructions for step 1"
    },
    {
      "title": "Step 2 title",
      "description": "Detailed instructions for step 2"
    }
  ]
}

Keep the recipe simple, nutritious, and easy to prepare. Focus on whole foods and ingredients that support brain health."#;

    CompletionRequest::new(system, user)
}
