// SPDX-FileCopyrightText: 2026 SpiritBytes Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Mood-driven recipes for SpiritBytes.
//!
//! [`RecipeGenerator`] asks the completion service for recipe summaries and
//! is strict about failures. [`RecipeDetailClient`] expands one title into
//! a full recipe and always answers, falling back to offline templates.
//! [`curated_recipes`] is the hand-written catalogue callers may show
//! instead of generated content.

pub mod catalog;
pub mod details;
pub mod generator;
pub mod parse;
pub mod prompt;

pub use catalog::curated_recipes;
pub use details::{DetailOrigin, RecipeDetailClient, template_details};
pub use generator::RecipeGenerator;
pub use parse::{ParseError, RecipeDraft, parse_recipes};
