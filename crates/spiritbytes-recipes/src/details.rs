// SPDX-FileCopyrightText: 2026 SpiritBytes Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Full recipe details, generated or from an offline template.

use std::sync::Arc;
use std::time::Duration;

use serde::Deserialize;
use spiritbytes_core::{
    AdapterType, CompletionAdapter, PreferenceSource, RecipeDetails, RecipeStep,
    UserFoodPreferences, with_timeout,
};
use strum::Display;
use tracing::{debug, info, warn};

use crate::parse::{ParseError, parse_braced, parse_json, strip_fences};
use crate::prompt::detail_request;

/// Where a [`RecipeDetails`] came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
#[strum(serialize_all = "snake_case")]
pub enum DetailOrigin {
    Model,
    Template,
}

/// A scalar field models write as either `"2 Servings"` or `2`.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum TextOrNumber {
    Text(String),
    Number(serde_json::Number),
}

impl TextOrNumber {
    fn into_text(self) -> String {
        match self {
            Self::Text(text) => text,
            Self::Number(number) => number.to_string(),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum StepDraft {
    Titled(RecipeStep),
    Bare(String),
}

#[derive(Debug, Default, Deserialize)]
struct DetailDraft {
    #[serde(default)]
    difficulty: Option<TextOrNumber>,
    #[serde(default)]
    time: Option<TextOrNumber>,
    #[serde(default)]
    servings: Option<TextOrNumber>,
    #[serde(default)]
    ingredients: Vec<TextOrNumber>,
    #[serde(default)]
    instructions: Vec<StepDraft>,
}

impl DetailDraft {
    fn into_details(self, title: &str) -> RecipeDetails {
        fn or_default(value: Option<TextOrNumber>, default: &str) -> String {
            value
                .map(TextOrNumber::into_text)
                .filter(|v| !v.trim().is_empty())
                .unwrap_or_else(|| default.to_string())
        }
        let instructions = self
            .instructions
            .into_iter()
            .enumerate()
            .map(|(index, step)| match step {
                StepDraft::Titled(step) => step,
                StepDraft::Bare(text) => RecipeStep::new(format!("Step {}", index + 1), text),
            })
            .collect();
        RecipeDetails {
            title: title.to_string(),
            difficulty: or_default(self.difficulty, "Easy"),
            time: or_default(self.time, "15 Minutes"),
            servings: or_default(self.servings, "2 Servings"),
            ingredients: self
                .ingredients
                .into_iter()
                .map(TextOrNumber::into_text)
                .collect(),
            instructions,
        }
    }
}

fn parse_detail_draft(content: &str) -> Result<DetailDraft, ParseError> {
    let cleaned = strip_fences(content);
    parse_json(cleaned).or_else(|_| parse_braced(cleaned))
}

/// Expands a recipe title into ingredients and steps. Never fails.
#[derive(Clone)]
pub struct RecipeDetailClient {
    completion: Arc<dyn CompletionAdapter>,
    preferences: Arc<dyn PreferenceSource>,
    timeout: Duration,
}

impl RecipeDetailClient {
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

    pub async fn get_recipe_details(&self, title: &str, mood: Option<&str>) -> RecipeDetails {
        self.get_recipe_details_traced(title, mood).await.0
    }

    /// Like [`get_recipe_details`](Self::get_recipe_details), also reporting
    /// whether the template was used.
    pub async fn get_recipe_details_traced(
        &self,
        title: &str,
        mood: Option<&str>,
    ) -> (RecipeDetails, DetailOrigin) {
        if !self.completion.is_configured() {
            debug!(title, "no completion credential, using detail template");
            return (template_details(title), DetailOrigin::Template);
        }

        let prefs = match self.preferences.current_preferences().await {
            Ok(prefs) => prefs,
            Err(e) => {
                warn!(error = %e, "preferences unavailable for detail prompt");
                UserFoodPreferences::default()
            }
        };

        let request = detail_request(title, mood, &prefs);
        let response = match with_timeout(
            AdapterType::Completion,
            self.timeout,
            self.completion.complete(request),
        )
        .await
        {
            Ok(response) => response,
            Err(e) => {
                warn!(title, error = %e, "detail generation failed, using template");
                return (template_details(title), DetailOrigin::Template);
            }
        };

        match parse_detail_draft(&response.content) {
            Ok(draft) => {
                let details = draft.into_details(title);
                info!(title, steps = details.instructions.len(), "recipe details generated");
                (details, DetailOrigin::Model)
            }
            Err(e) => {
                warn!(title, error = %e, "detail content unusable, using template");
                (template_details(title), DetailOrigin::Template)
            }
        }
    }
}

fn steps(items: &[(&str, &str)]) -> Vec<RecipeStep> {
    items
        .iter()
        .map(|(title, description)| RecipeStep::new(*title, *description))
        .collect()
}

fn lines(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

/// Offline details chosen by keywords in the title.
///
/// Checked in order: smoothie, bowl, tea or latte, toast, then a generic
/// recipe.
pub fn template_details(title: &str) -> RecipeDetails {
    let lower = title.to_lowercase();
    let (difficulty, time, servings, ingredients, instructions) = if lower.contains("smoothie") {
        (
            "Very Easy",
            "5 Minutes",
            "1 Serving",
            lines(&[
                "1 cup plant-based milk",
                "1 banana",
                "1/2 cup frozen berries",
                "1 tablespoon nut butter",
                "1 teaspoon honey or maple syrup (optional)",
                "1 tablespoon chia seeds",
            ]),
            steps(&[
                (
                    "Prepare Ingredients",
                    "Gather all ingredients and measure them out. Peel the banana and break it into chunks.",
                ),
                (
                    "Blend",
                    "Add all ingredients to a blender and blend on high until smooth and creamy, about 30-60 seconds.",
                ),
                (
                    "Serve",
                    "Pour into a glass or bowl. If serving as a smoothie bowl, top with additional fruits, nuts, or granola.",
                ),
            ]),
        )
    } else if lower.contains("bowl") {
        (
            "Easy",
            "15 Minutes",
            "1 Serving",
            lines(&[
                "1/2 cup cooked quinoa or rice",
                "1 cup mixed vegetables (spinach, bell peppers, cherry tomatoes)",
                "1/2 avocado, sliced",
                "1/4 cup chickpeas or beans",
                "1 tablespoon olive oil",
                "1 teaspoon lemon juice",
                "Salt and pepper to taste",
            ]),
            steps(&[
                (
                    "Prepare Base",
                    "If not already cooked, prepare quinoa or rice according to package instructions. Place in the bottom of a bowl.",
                ),
                (
                    "Arrange Toppings",
                    "Arrange vegetables, avocado, and chickpeas on top of the base in sections.",
                ),
                (
                    "Make Dressing",
                    "In a small bowl, whisk together olive oil, lemon juice, salt, and pepper.",
                ),
                (
                    "Finish and Serve",
                    "Drizzle the dressing over the bowl and enjoy immediately.",
                ),
            ]),
        )
    } else if lower.contains("tea") || lower.contains("latte") {
        (
            "Very Easy",
            "10 Minutes",
            "1 Serving",
            lines(&[
                "1 cup milk of choice",
                "1 teaspoon honey or maple syrup",
                "1/4 teaspoon cinnamon",
                "1/4 teaspoon turmeric (if golden latte)",
                "1 tea bag or 1 teaspoon loose tea leaves",
            ]),
            steps(&[
                (
                    "Heat Milk",
                    "In a small saucepan, gently heat the milk over medium-low heat until hot but not boiling.",
                ),
                (
                    "Add Flavors",
                    "Whisk in honey, cinnamon, and turmeric (if using) until well combined.",
                ),
                (
                    "Add Tea",
                    "Add the tea bag or leaves and allow to steep for 3-5 minutes, or according to tea package instructions.",
                ),
                (
                    "Strain and Serve",
                    "Remove the tea bag or strain out tea leaves. Pour into your favorite mug and enjoy while warm.",
                ),
            ]),
        )
    } else if lower.contains("toast") {
        (
            "Very Easy",
            "5 Minutes",
            "1 Serving",
            lines(&[
                "1 slice of bread (whole grain recommended)",
                "1 tablespoon nut butter or avocado",
                "1/2 banana, sliced or 1/4 avocado, mashed",
                "Pinch of cinnamon or red pepper flakes",
                "Drizzle of honey (optional)",
            ]),
            steps(&[
                (
                    "Toast the Bread",
                    "Place the bread in a toaster and toast to your preferred level of crispiness.",
                ),
                (
                    "Add Spread",
                    "Spread the nut butter or mashed avocado evenly over the warm toast.",
                ),
                (
                    "Add Toppings",
                    "Arrange banana slices on top, or add other toppings of your choice.",
                ),
                (
                    "Final Touch",
                    "Sprinkle with cinnamon for sweet toast, or red pepper flakes for savory avocado toast. Add a drizzle of honey if desired.",
                ),
            ]),
        )
    } else {
        (
            "Easy",
            "20 Minutes",
            "2 Servings",
            lines(&[
                "2 cups main ingredient",
                "1 tablespoon olive oil or butter",
                "1/2 cup supplementary ingredient",
                "1 teaspoon seasoning",
                "Salt and pepper to taste",
            ]),
            steps(&[
                (
                    "Prepare Ingredients",
                    "Gather and measure all ingredients. Wash and chop any produce as needed.",
                ),
                (
                    "Cook Main Components",
                    "Heat oil in a pan over medium heat. Add main ingredients and cook until properly done.",
                ),
                (
                    "Combine Ingredients",
                    "Add the remaining ingredients and cook for another few minutes until everything is well combined.",
                ),
                (
                    "Serve",
                    "Plate the dish and serve immediately while warm. Enjoy!",
                ),
            ]),
        )
    };

    RecipeDetails {
        title: title.to_string(),
        difficulty: difficulty.to_string(),
        time: time.to_string(),
        servings: servings.to_string(),
        ingredients,
        instructions,
    }
}
