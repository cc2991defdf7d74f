// SPDX-FileCopyrightText: 2026 SpiritBytes Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Terminal rendering. Colors only when stdout is a terminal and `--plain`
//! is not set.

use std::io::IsTerminal;

use colored::Colorize;
use spiritbytes_core::{
    MappedEmotion, RecipeBatch, RecipeDetails, RecipeSource, SavedRecipe, UserFoodPreferences,
};

pub struct Output {
    color: bool,
}

impl Output {
    pub fn new(plain: bool) -> Self {
        Self {
            color: !plain && std::io::stdout().is_terminal(),
        }
    }

    pub fn heading(&self, text: &str) {
        if self.color {
            println!("\n  {}", text.bold());
        } else {
            println!("\n  {text}");
        }
        println!("  {}", "-".repeat(50));
    }

    pub fn success(&self, text: &str) {
        if self.color {
            println!("  {} {text}", "✓".green());
        } else {
            println!("  [OK]   {text}");
        }
    }

    pub fn warn(&self, text: &str) {
        if self.color {
            println!("  {} {}", "!".yellow(), text.yellow());
        } else {
            println!("  [WARN] {text}");
        }
    }

    pub fn error(&self, text: &str) {
        if self.color {
            eprintln!("{} {text}", "error:".red().bold());
        } else {
            eprintln!("error: {text}");
        }
    }

    pub fn line(&self, text: &str) {
        println!("  {text}");
    }

    pub fn emotions(&self, emotions: &[MappedEmotion]) {
        for (rank, emotion) in emotions.iter().enumerate() {
            let bar = "#".repeat(usize::from(emotion.percentage / 5));
            let label = format!("{:<10}", emotion.mood);
            if self.color && rank == 0 {
                println!("  {} {:>3}% {}", label.bold(), emotion.percentage, bar.cyan());
            } else {
                println!("  {label} {:>3}% {bar}", emotion.percentage);
            }
        }
    }

    pub fn batch(&self, batch: &RecipeBatch) {
        for (i, recipe) in batch.recipes.iter().enumerate() {
            let title = format!("{}. {}", i + 1, recipe.title);
            if self.color {
                println!("  {}  {}", title.bold(), recipe.color.hex().dimmed());
            } else {
                println!("  {title}  [{}]", recipe.color);
            }
            if !recipe.description.is_empty() {
                println!("     {}", recipe.description);
            }
            for ingredient in &recipe.ingredients {
                if ingredient.benefits.is_empty() {
                    println!("     - {}", ingredient.name);
                } else {
                    println!("     - {}: {}", ingredient.name, ingredient.benefits);
                }
            }
        }
        match batch.source {
            RecipeSource::Curated => self.warn("showing curated recipes"),
            RecipeSource::Reconstructed => self.line("(rebuilt from a free-text answer)"),
            RecipeSource::Model => {}
        }
    }

    pub fn details(&self, details: &RecipeDetails) {
        self.heading(&details.title);
        self.line(&format!(
            "{} | {} | {}",
            details.difficulty, details.time, details.servings
        ));
        println!();
        self.line("Ingredients");
        for item in &details.ingredients {
            self.line(&format!("  - {item}"));
        }
        println!();
        self.line("Instructions");
        for (i, step) in details.instructions.iter().enumerate() {
            let title = format!("{}. {}", i + 1, step.title);
            if self.color {
                self.line(&format!("  {}", title.bold()));
            } else {
                self.line(&format!("  {title}"));
            }
            self.line(&format!("     {}", step.description));
        }
    }

    pub fn saved(&self, recipes: &[SavedRecipe]) {
        if recipes.is_empty() {
            self.line("no saved recipes");
            return;
        }
        for recipe in recipes {
            self.line(&format!(
                "{:<40} {:<10} {}",
                recipe.title,
                recipe.mood,
                recipe.saved_at.format("%Y-%m-%d %H:%M")
            ));
        }
    }

    pub fn preferences(&self, prefs: &UserFoodPreferences) {
        let diets = if prefs.has_diet_restrictions() {
            prefs.diets().join(", ")
        } else {
            "none".to_string()
        };
        let allergens = if prefs.has_allergens() {
            prefs.allergens()
        } else {
            "none"
        };
        self.line(&format!("diets:     {diets}"));
        self.line(&format!("allergens: {allergens}"));
    }
}
