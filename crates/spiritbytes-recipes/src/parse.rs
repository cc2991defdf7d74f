// SPDX-FileCopyrightText: 2026 SpiritBytes Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Turning completion text into recipe drafts.
//!
//! The model is asked for strict JSON but does not always comply. Content
//! goes through fence stripping and then an ordered chain of strategies;
//! the first one that yields drafts wins.

use std::sync::LazyLock;

use regex::Regex;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use spiritbytes_core::{Ingredient, RecipeSource};
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParseError {
    #[error("not valid recipe JSON: {0}")]
    InvalidJson(String),

    #[error("no JSON object found")]
    NoJsonObject,

    #[error("no recipes found in text")]
    NoRecipes,
}

/// A recipe as the model described it, before ids and colors are assigned.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RecipeDraft {
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub ingredients: Vec<Ingredient>,
}

/// The shapes the model answers with.
#[derive(Deserialize)]
#[serde(untagged)]
enum RecipeEnvelope {
    Wrapped { recipes: Vec<RecipeDraft> },
    List(Vec<RecipeDraft>),
    Single(RecipeDraft),
}

impl From<RecipeEnvelope> for Vec<RecipeDraft> {
    fn from(envelope: RecipeEnvelope) -> Self {
        match envelope {
            RecipeEnvelope::Wrapped { recipes } | RecipeEnvelope::List(recipes) => recipes,
            RecipeEnvelope::Single(recipe) => vec![recipe],
        }
    }
}

/// Remove a surrounding Markdown code fence (```json, ```JSON or bare ```).
pub fn strip_fences(content: &str) -> &str {
    let trimmed = content.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let rest = rest
        .strip_prefix("json")
        .or_else(|| rest.strip_prefix("JSON"))
        .unwrap_or(rest);
    let rest = rest.strip_suffix("```").unwrap_or(rest);
    rest.trim()
}

/// Parse JSON as-is.
pub fn parse_json<T: DeserializeOwned>(content: &str) -> Result<T, ParseError> {
    serde_json::from_str(content).map_err(|e| ParseError::InvalidJson(e.to_string()))
}

/// Parse the span from the first `{` to the last `}`.
pub fn parse_braced<T: DeserializeOwned>(content: &str) -> Result<T, ParseError> {
    let start = content.find('{').ok_or(ParseError::NoJsonObject)?;
    let end = content.rfind('}').ok_or(ParseError::NoJsonObject)?;
    if end <= start {
        return Err(ParseError::NoJsonObject);
    }
    parse_json(&content[start..=end])
}

/// One way of reading recipe drafts out of completion text.
pub trait ParseStrategy: Send + Sync {
    fn name(&self) -> &'static str;

    /// Provenance recorded when this strategy succeeds.
    fn source(&self) -> RecipeSource;

    fn parse(&self, content: &str, mood: &str) -> Result<Vec<RecipeDraft>, ParseError>;
}

pub struct DirectJson;

impl ParseStrategy for DirectJson {
    fn name(&self) -> &'static str {
        "direct_json"
    }

    fn source(&self) -> RecipeSource {
        RecipeSource::Model
    }

    fn parse(&self, content: &str, _mood: &str) -> Result<Vec<RecipeDraft>, ParseError> {
        parse_json::<RecipeEnvelope>(content).map(Into::into)
    }
}

pub struct BracketExtract;

impl ParseStrategy for BracketExtract {
    fn name(&self) -> &'static str {
        "bracket_extract"
    }

    fn source(&self) -> RecipeSource {
        RecipeSource::Model
    }

    fn parse(&self, content: &str, _mood: &str) -> Result<Vec<RecipeDraft>, ParseError> {
        parse_braced::<RecipeEnvelope>(content).map(Into::into)
    }
}

/// Rebuilds recipes from a numbered plain-text list.
pub struct TextReconstruction;

static LIST_MARKER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\d+\.\s+").expect("list marker pattern is valid"));

static INGREDIENT_SECTION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?is)ingredients?:?(.*?)(?:benefits|preparation|instructions|directions|steps|$)")
        .expect("ingredient section pattern is valid")
});

const TITLE_LIMIT: usize = 50;

impl ParseStrategy for TextReconstruction {
    fn name(&self) -> &'static str {
        "text_reconstruction"
    }

    fn source(&self) -> RecipeSource {
        RecipeSource::Reconstructed
    }

    fn parse(&self, content: &str, mood: &str) -> Result<Vec<RecipeDraft>, ParseError> {
        // Unnumbered text is a refusal or a cut-off reply, not a recipe list.
        let mut blocks: Vec<&str> = LIST_MARKER.split(content).collect();
        if blocks.len() < 2 {
            return Err(ParseError::NoRecipes);
        }
        // Text before the first marker is preamble.
        blocks.remove(0);

        let drafts: Vec<RecipeDraft> = blocks
            .into_iter()
            .map(str::trim)
            .filter(|block| !block.is_empty() && !block.starts_with(['{', '[']))
            .filter_map(|block| reconstruct_block(block, mood))
            .collect();

        if drafts.is_empty() {
            return Err(ParseError::NoRecipes);
        }
        Ok(drafts)
    }
}

fn reconstruct_block(block: &str, mood: &str) -> Option<RecipeDraft> {
    let lines: Vec<&str> = block
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect();
    let first = *lines.first()?;

    let description = lines
        .get(1)
        .map(|line| line.to_string())
        .unwrap_or_else(|| format!("Great for improving your {mood} mood"));

    let mut ingredients: Vec<Ingredient> = INGREDIENT_SECTION
        .captures(block)
        .and_then(|caps| caps.get(1))
        .map(|section| {
            section
                .as_str()
                .split(['\n', '•', '-'])
                .map(str::trim)
                .filter(|item| !item.is_empty())
                .take(3)
                .map(|item| Ingredient::new(item, format!("Great for {mood} mood support")))
                .collect()
        })
        .unwrap_or_default();

    if ingredients.is_empty() {
        ingredients = fallback_ingredients(mood);
    }

    Some(RecipeDraft {
        title: shorten_title(first, block),
        description,
        ingredients,
    })
}

fn shorten_title(first_line: &str, block: &str) -> String {
    if first_line.chars().count() <= TITLE_LIMIT {
        return first_line.to_string();
    }
    let first_sentence = block.split('.').next().unwrap_or_default().trim();
    if first_sentence.chars().count() < TITLE_LIMIT {
        return first_sentence.to_string();
    }
    let cut: String = first_line.chars().take(TITLE_LIMIT).collect();
    format!("{cut}...")
}

/// Ingredients used when reconstructed text names none.
pub fn fallback_ingredients(mood: &str) -> Vec<Ingredient> {
    match mood.to_lowercase().as_str() {
        "calm" | "relaxed" => vec![
            Ingredient::new("Chamomile Tea", "Contains apigenin that promotes relaxation"),
            Ingredient::new("Oats", "Rich in melatonin for calming effects"),
            Ingredient::new("Almonds", "Contains magnesium which helps reduce stress"),
        ],
        "happy" | "energetic" => vec![
            Ingredient::new("Dark Chocolate", "Releases endorphins for mood boosting"),
            Ingredient::new("Bananas", "Contains mood-enhancing vitamin B6"),
            Ingredient::new("Berries", "Antioxidants support brain health"),
        ],
        _ => vec![
            Ingredient::new("Whole Grains", "Provides steady energy release"),
            Ingredient::new("Leafy Greens", "Rich in folate that helps mental function"),
            Ingredient::new("Nuts", "Contains healthy fats for brain health"),
        ],
    }
}

/// Strategies in the order they are tried.
pub static STRATEGIES: &[&dyn ParseStrategy] = &[&DirectJson, &BracketExtract, &TextReconstruction];

/// Outcome of [`parse_recipes`].
#[derive(Debug)]
pub struct ParsedRecipes {
    pub drafts: Vec<RecipeDraft>,
    pub source: RecipeSource,
    pub strategy: &'static str,
}

/// Run the strategy chain over fence-stripped `content`.
///
/// Returns the last strategy's error when every strategy fails.
pub fn parse_recipes(content: &str, mood: &str) -> Result<ParsedRecipes, ParseError> {
    let cleaned = strip_fences(content);
    let mut last_error = ParseError::NoRecipes;
    for strategy in STRATEGIES {
        match strategy.parse(cleaned, mood) {
            Ok(drafts) => {
                return Ok(ParsedRecipes {
                    drafts,
                    source: strategy.source(),
                    strategy: strategy.name(),
                });
            }
            Err(e) => {
                tracing::debug!(strategy = strategy.name(), error = %e, "parse strategy failed");
                last_error = e;
            }
        }
    }
    Err(last_error)
}

#[cfg(test)]
mod tests {
    use super::*;

    const GOLDEN_MILK: &str = r#"{"recipes":[{"title":"Turmeric Golden Milk","description":"Warm and soothing","ingredients":[{"name":"Turmeric","benefits":"Anti-inflammatory"}]}]}"#;

    #[test]
    fn fences_are_stripped() {
        assert_eq!(strip_fences("```json\n{}\n```"), "{}");
        assert_eq!(strip_fences("```JSON\n[]```"), "[]");
        assert_eq!(strip_fences("```\n{\"a\":1}\n```"), "{\"a\":1}");
        assert_eq!(strip_fences("  {}  "), "{}");
    }

    #[test]
    fn fenced_and_plain_json_parse_identically() {
        let fenced = format!("```json\n{GOLDEN_MILK}\n```");
        let plain = parse_recipes(GOLDEN_MILK, "Calm").unwrap();
        let from_fence = parse_recipes(&fenced, "Calm").unwrap();
        assert_eq!(plain.drafts, from_fence.drafts);
        assert_eq!(from_fence.source, RecipeSource::Model);
        assert_eq!(from_fence.strategy, "direct_json");
    }

    #[test]
    fn envelope_shapes_normalize() {
        let list = r#"[{"title":"A"},{"title":"B","ingredients":["Oats"]}]"#;
        let drafts = DirectJson.parse(list, "Calm").unwrap();
        assert_eq!(drafts.len(), 2);
        assert_eq!(drafts[1].ingredients, vec![Ingredient::new("Oats", "")]);

        let single = r#"{"title":"Solo","description":"d"}"#;
        assert_eq!(DirectJson.parse(single, "Calm").unwrap()[0].title, "Solo");
    }

    #[test]
    fn ingredient_counts_are_not_forced() {
        let drafts = DirectJson.parse(GOLDEN_MILK, "Calm").unwrap();
        assert_eq!(drafts[0].ingredients.len(), 1);
    }

    #[test]
    fn chatter_around_json_is_extracted() {
        let content = format!("Sure! Here you go:\n{GOLDEN_MILK}\nEnjoy!");
        let parsed = parse_recipes(&content, "Calm").unwrap();
        assert_eq!(parsed.strategy, "bracket_extract");
        assert_eq!(parsed.drafts[0].title, "Turmeric Golden Milk");
    }

    #[test]
    fn numbered_text_is_reconstructed() {
        let text = "Here are some ideas:\n\n1. Warm Oatmeal\nComforting and filling.\nIngredients:\n- Oats\n- Honey\n- Walnuts\n- Milk\nInstructions: cook it.\n\n2. Chamomile Tea\nA soothing drink before bed.";
        let parsed = parse_recipes(text, "Calm").unwrap();
        assert_eq!(parsed.source, RecipeSource::Reconstructed);
        assert_eq!(parsed.drafts.len(), 2);

        let oatmeal = &parsed.drafts[0];
        assert_eq!(oatmeal.title, "Warm Oatmeal");
        assert_eq!(oatmeal.description, "Comforting and filling.");
        let names: Vec<&str> = oatmeal.ingredients.iter().map(|i| i.name.as_str()).collect();
        assert_eq!(names, ["Oats", "Honey", "Walnuts"]);
        assert_eq!(oatmeal.ingredients[0].benefits, "Great for Calm mood support");

        let tea = &parsed.drafts[1];
        assert_eq!(tea.ingredients, fallback_ingredients("calm"));
    }

    #[test]
    fn text_without_ingredients_uses_mood_fallback() {
        let text = "1. Sunny Bowl";
        let drafts = TextReconstruction.parse(text, "Sad").unwrap();
        assert_eq!(drafts[0].title, "Sunny Bowl");
        assert_eq!(drafts[0].description, "Great for improving your Sad mood");
        assert_eq!(drafts[0].ingredients, fallback_ingredients("Sad"));
        assert_eq!(drafts[0].ingredients[0].name, "Whole Grains");
    }

    #[test]
    fn long_titles_are_shortened() {
        let long = "A".repeat(60);
        assert_eq!(shorten_title(&long, &long), format!("{}...", "A".repeat(50)));

        let line = format!("Berry Oat Bake. {}", "x".repeat(60));
        assert_eq!(shorten_title(&line, &line), "Berry Oat Bake");
    }

    #[test]
    fn unnumbered_text_is_not_a_recipe() {
        let refusal = "I'm sorry, but I can't help with that request.";
        assert_eq!(parse_recipes(refusal, "Calm").unwrap_err(), ParseError::NoRecipes);

        let truncated = "{\n  \"recipes\": [\n    {\"title\": \"Oat";
        assert_eq!(parse_recipes(truncated, "Calm").unwrap_err(), ParseError::NoRecipes);
    }

    #[test]
    fn json_fragments_after_a_marker_are_skipped() {
        let text = "1. {\"title\": \"Oat\n2. Banana Toast\nQuick and sweet.";
        let drafts = TextReconstruction.parse(text, "Happy").unwrap();
        assert_eq!(drafts.len(), 1);
        assert_eq!(drafts[0].title, "Banana Toast");
    }

    #[test]
    fn blank_content_fails_every_strategy() {
        assert_eq!(parse_recipes("   ", "Calm").unwrap_err(), ParseError::NoRecipes);
    }
}
