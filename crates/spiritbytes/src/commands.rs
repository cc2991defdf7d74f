// SPDX-FileCopyrightText: 2026 SpiritBytes Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

use std::path::PathBuf;

use spiritbytes_core::{ImageHandle, SpiritError, UserFoodPreferences};
use spiritbytes_emotion::{EmotionClient, primary_mood, top_three_emotions};
use spiritbytes_flow::{FlowNotice, FlowOutcome, FlowState, MoodFlow};
use spiritbytes_recipes::{DetailOrigin, curated_recipes};
use spiritbytes_storage::{DIET_OPTIONS, PreferenceOrigin};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader};
use tracing::warn;

use crate::app::App;
use crate::render::Output;

fn emotion_client(app: &App) -> Result<&EmotionClient, SpiritError> {
    app.emotion.as_ref().ok_or_else(|| {
        SpiritError::Config("set inference.endpoint to analyze photos".into())
    })
}

pub async fn analyze(app: &App, image: PathBuf, out: &Output) -> Result<(), SpiritError> {
    let analysis = emotion_client(app)?
        .analyze_emotion(ImageHandle::Path(image))
        .await?;
    if !analysis.success {
        return Err(SpiritError::Internal(format!(
            "emotion analysis failed: {}",
            analysis.message
        )));
    }
    if analysis.is_empty() {
        out.warn("no face detected, try a brighter, front-facing photo");
        return Ok(());
    }
    out.heading("Mood reading");
    out.emotions(&top_three_emotions(&analysis.emotions));
    if let Some(mood) = primary_mood(&analysis.emotions) {
        out.line(&format!("Try: spiritbytes recipes --mood {mood}"));
    }
    Ok(())
}

pub async fn recipes(
    app: &App,
    moods: &[String],
    count: u32,
    fallback: bool,
    out: &Output,
) -> Result<(), SpiritError> {
    let primary = moods.first().map(String::as_str).unwrap_or_default();
    let batch = match app.generator.generate_recipes_for_moods(moods, count).await {
        Ok(batch) if !batch.is_empty() => batch,
        Ok(_) if fallback => curated_recipes(primary),
        Ok(_) => {
            out.warn("no recipes were generated, try again");
            return Ok(());
        }
        Err(e) if fallback => {
            warn!(error = %e, "generation failed, using curated recipes");
            curated_recipes(primary)
        }
        Err(e) => return Err(e),
    };
    out.heading(&format!("Recipes for {}", moods.join(", ")));
    out.batch(&batch);
    Ok(())
}

pub async fn detail(
    app: &App,
    title: &str,
    mood: Option<&str>,
    out: &Output,
) -> Result<(), SpiritError> {
    let (details, origin) = app.details.get_recipe_details_traced(title, mood).await;
    out.details(&details);
    if origin == DetailOrigin::Template {
        out.warn("generated details unavailable, showing a standard recipe");
    }
    Ok(())
}

pub async fn saved_list(app: &App, out: &Output) -> Result<(), SpiritError> {
    let recipes = app.archive.get_saved_recipes().await?;
    out.heading(&format!("Saved recipes ({})", recipes.len()));
    out.saved(&recipes);
    Ok(())
}

pub async fn saved_show(app: &App, title: &str, out: &Output) -> Result<(), SpiritError> {
    let saved = app
        .archive
        .get_saved_recipe_by_title(title)
        .await?
        .ok_or_else(|| SpiritError::Validation(format!("no saved recipe titled {title:?}")))?;
    out.details(&saved.recipe_details);
    out.line(&format!("saved for mood {} on {}", saved.mood, saved.saved_at.format("%Y-%m-%d")));
    Ok(())
}

pub async fn saved_remove(app: &App, title: &str, out: &Output) -> Result<(), SpiritError> {
    if app.archive.remove_recipe(title).await? {
        out.success(&format!("removed {title}"));
    } else {
        out.warn(&format!("{title} was not saved"));
    }
    Ok(())
}

pub async fn saved_clear(app: &App, out: &Output) -> Result<(), SpiritError> {
    app.archive.clear_saved_recipes().await?;
    out.success("saved recipes cleared");
    Ok(())
}

pub async fn prefs_show(app: &App, out: &Output) -> Result<(), SpiritError> {
    let prefs = app.preferences.get_local_preferences().await?;
    out.heading("Food preferences");
    out.preferences(&prefs);
    Ok(())
}

pub async fn prefs_set(
    app: &App,
    diets: &[String],
    allergens: &str,
    out: &Output,
) -> Result<(), SpiritError> {
    for diet in diets {
        if !DIET_OPTIONS.iter().any(|o| o.eq_ignore_ascii_case(diet.trim())) {
            out.warn(&format!("{diet} is not one of: {}", DIET_OPTIONS.join(", ")));
        }
    }
    let prefs = UserFoodPreferences::new(diets, allergens);
    match app.preferences.save_preferences(&prefs).await {
        Ok(()) => out.success("preferences saved"),
        Err(SpiritError::PartialPersistence { message }) => {
            out.warn(&format!("saved on this device only: {message}"));
        }
        Err(e) => return Err(e),
    }
    out.preferences(&prefs);
    Ok(())
}

pub async fn prefs_pull(app: &App, out: &Output) -> Result<(), SpiritError> {
    let (prefs, origin) = app.preferences.fetch_remote().await?;
    match origin {
        PreferenceOrigin::Remote => out.success("preferences pulled from your account"),
        PreferenceOrigin::Local => out.warn("account unavailable, showing local preferences"),
    }
    out.preferences(&prefs);
    Ok(())
}

pub async fn prefs_push(app: &App, out: &Output) -> Result<(), SpiritError> {
    if !app.preferences.has_remote() {
        return Err(SpiritError::Config(
            "set identity.endpoint, identity.user_id and identity.access_token to sync".into(),
        ));
    }
    app.preferences.sync_remote().await?;
    out.success("preferences pushed to your account");
    Ok(())
}

#[derive(Debug, Clone, Copy)]
pub struct RunOptions {
    pub yes: bool,
    pub pick: Option<usize>,
    pub save: bool,
}

/// Drive one mood session from photo to (optionally) a saved recipe.
pub async fn run(
    flow: MoodFlow,
    image: PathBuf,
    options: RunOptions,
    out: &Output,
) -> Result<(), SpiritError> {
    let mut prompt = Prompt::new(BufReader::new(tokio::io::stdin()));
    let result = run_session(&flow, image, options, &mut prompt, out).await;
    flow.close().await;
    result
}

async fn run_session<R: AsyncBufRead + Unpin>(
    flow: &MoodFlow,
    image: PathBuf,
    options: RunOptions,
    prompt: &mut Prompt<R>,
    out: &Output,
) -> Result<(), SpiritError> {
    flow.start_capture().await?;
    let outcome = flow.submit_photo(ImageHandle::Path(image)).await?;
    let snapshot = flow.snapshot().await;
    match (outcome, snapshot.notice) {
        (FlowOutcome::Applied(FlowState::AwaitingConfirmation), _) => {}
        (_, Some(FlowNotice::NoFaceDetected)) => {
            out.warn("no face detected, try a brighter, front-facing photo");
            return Ok(());
        }
        (_, Some(FlowNotice::InferenceFailed { message, .. })) => {
            return Err(SpiritError::Internal(format!("could not read the photo: {message}")));
        }
        (outcome, _) => {
            return Err(SpiritError::Internal(format!("unexpected photo outcome {outcome:?}")));
        }
    }

    out.heading("Mood reading");
    out.emotions(&snapshot.emotions);
    if !options.yes && !prompt.ask("Use this reading?", true).await {
        flow.reject_reading().await?;
        out.line("reading discarded");
        return Ok(());
    }

    flow.confirm_reading().await?;
    while flow.state().await == FlowState::GeneratingRecipes {
        let notice = flow.snapshot().await.notice;
        let message = match notice {
            Some(FlowNotice::GenerationFailed { message, .. }) => message,
            Some(FlowNotice::NoRecipes) => "no recipes were generated".to_string(),
            _ => "recipe generation did not finish".to_string(),
        };
        out.warn(&message);
        if options.yes || !prompt.ask("Try again?", false).await {
            return Err(SpiritError::Internal(message));
        }
        flow.retry_generation().await?;
    }

    let snapshot = flow.snapshot().await;
    let batch = snapshot
        .batch
        .ok_or_else(|| SpiritError::Internal("recipes missing after generation".into()))?;
    out.heading(&format!("Recipes for {}", snapshot.moods.join(", ")));
    if let Some(FlowNotice::ShowingCurated { reason }) = &snapshot.notice {
        out.warn(&format!("generation failed ({reason})"));
    }
    out.batch(&batch);

    let Some(pick) = options.pick else {
        return Ok(());
    };
    let recipe = pick
        .checked_sub(1)
        .and_then(|i| batch.recipes.get(i))
        .ok_or_else(|| {
            SpiritError::Validation(format!(
                "--pick must be between 1 and {}",
                batch.recipes.len()
            ))
        })?;

    flow.select_recipe(&recipe.id).await?;
    let snapshot = flow.snapshot().await;
    if let Some(details) = &snapshot.details {
        out.details(details);
    }
    if snapshot.detail_origin == Some(DetailOrigin::Template) {
        out.warn("generated details unavailable, showing a standard recipe");
    }

    if options.save {
        if snapshot.state == FlowState::Saved {
            out.line("already in your saved recipes");
        } else {
            flow.toggle_save().await?;
            out.success(&format!("saved {}", recipe.title));
        }
    }
    Ok(())
}

/// Yes/no questions read from one shared buffered input.
struct Prompt<R> {
    input: R,
}

impl<R: AsyncBufRead + Unpin> Prompt<R> {
    fn new(input: R) -> Self {
        Self { input }
    }

    /// End of input picks `default`.
    async fn ask(&mut self, question: &str, default: bool) -> bool {
        let hint = if default { "[Y/n]" } else { "[y/N]" };
        println!("  {question} {hint}");
        let mut line = String::new();
        match self.input.read_line(&mut line).await {
            Ok(0) | Err(_) => default,
            Ok(_) => match line.trim().to_ascii_lowercase().as_str() {
                "" => default,
                "y" | "yes" => true,
                _ => false,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn piped_answers_reach_every_question() {
        let mut prompt = Prompt::new(&b"y\nn\nyes\n"[..]);
        assert!(prompt.ask("first?", false).await);
        assert!(!prompt.ask("second?", true).await);
        assert!(prompt.ask("third?", false).await);
        assert!(!prompt.ask("after the end?", false).await);
        assert!(prompt.ask("after the end?", true).await);
    }

    #[tokio::test]
    async fn blank_answer_takes_the_default() {
        let mut prompt = Prompt::new(&b"\n\n"[..]);
        assert!(prompt.ask("keep?", true).await);
        assert!(!prompt.ask("retry?", false).await);
    }
}
