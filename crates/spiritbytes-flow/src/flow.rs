// SPDX-FileCopyrightText: 2026 SpiritBytes Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The mood session state machine.
//!
//! Every user action takes the session lock briefly, checks the current
//! state, bumps the generation counter and releases the lock before any
//! external call. When the call returns, its result is applied only if the
//! counter has not moved; otherwise it is discarded. `close` cancels every
//! in-flight call.

use std::future::Future;
use std::sync::Arc;

use spiritbytes_config::model::GenerationConfig;
use spiritbytes_core::{
    ImageHandle, PaletteColor, SpiritError, UserFoodPreferences,
};
use spiritbytes_emotion::{EmotionClient, top_three_emotions};
use spiritbytes_recipes::{RecipeDetailClient, RecipeGenerator, curated_recipes};
use spiritbytes_storage::{PreferenceStore, RecipeArchive, SaveToggle};
use tokio::sync::{Mutex, broadcast};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::state::{FlowEvent, FlowNotice, FlowOutcome, FlowSnapshot, FlowState, Session};

const EVENT_CAPACITY: usize = 64;

/// Mood used for saving when the session never picked one.
const DEFAULT_MOOD: &str = "Calm";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FlowSettings {
    pub recipe_count: u32,
    pub fallback_to_curated: bool,
}

impl From<&GenerationConfig> for FlowSettings {
    fn from(config: &GenerationConfig) -> Self {
        Self {
            recipe_count: config.recipe_count,
            fallback_to_curated: config.fallback_to_curated,
        }
    }
}

/// The clients and stores a flow drives.
pub struct FlowServices {
    /// `None` when no inference endpoint is configured.
    pub emotion: Option<EmotionClient>,
    pub generator: RecipeGenerator,
    pub details: RecipeDetailClient,
    pub archive: Arc<RecipeArchive>,
    pub preferences: Arc<PreferenceStore>,
}

pub struct MoodFlow {
    session: Mutex<Session>,
    services: FlowServices,
    settings: FlowSettings,
    events: broadcast::Sender<FlowEvent>,
    cancel: CancellationToken,
}

impl MoodFlow {
    pub fn new(services: FlowServices, settings: FlowSettings) -> Self {
        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        Self {
            session: Mutex::new(Session::new()),
            services,
            settings,
            events,
            cancel: CancellationToken::new(),
        }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<FlowEvent> {
        self.events.subscribe()
    }

    pub async fn state(&self) -> FlowState {
        self.session.lock().await.state
    }

    pub async fn snapshot(&self) -> FlowSnapshot {
        self.session.lock().await.snapshot()
    }

    pub fn is_closed(&self) -> bool {
        self.cancel.is_cancelled()
    }

    // --- capture and inference ---

    pub async fn start_capture(&self) -> Result<FlowState, SpiritError> {
        self.ensure_open()?;
        let mut session = self.session.lock().await;
        expect_state(&session, &[FlowState::Idle, FlowState::Capturing], "start capture")?;
        session.bump();
        session.notice = None;
        self.transition(&mut session, FlowState::Capturing);
        Ok(session.state)
    }

    /// Analyze a photo taken in `Capturing`.
    ///
    /// Emotions found: `AwaitingConfirmation`. No face: back to `Idle`
    /// with [`FlowNotice::NoFaceDetected`]. Failure: back to `Capturing`
    /// with [`FlowNotice::InferenceFailed`].
    pub async fn submit_photo(&self, image: ImageHandle) -> Result<FlowOutcome, SpiritError> {
        self.ensure_open()?;
        let emotion = self.services.emotion.as_ref().ok_or_else(|| {
            SpiritError::Validation("photo analysis needs an inference endpoint".into())
        })?;

        let generation = {
            let mut session = self.session.lock().await;
            expect_state(&session, &[FlowState::Capturing], "submit a photo")?;
            let generation = session.bump();
            session.notice = None;
            session.emotions.clear();
            self.transition(&mut session, FlowState::Inferring);
            generation
        };

        let Some(result) = self.guarded(emotion.analyze_emotion(image)).await else {
            return Ok(FlowOutcome::Discarded);
        };

        let mut session = self.session.lock().await;
        if !self.is_current(&session, generation) {
            debug!(generation, "stale inference result discarded");
            return Ok(FlowOutcome::Discarded);
        }

        match result {
            Ok(analysis) if !analysis.success => {
                warn!(message = %analysis.message, "inference reported failure");
                session.notice = Some(FlowNotice::InferenceFailed {
                    message: if analysis.message.is_empty() {
                        "emotion analysis failed".into()
                    } else {
                        analysis.message
                    },
                    retryable: true,
                });
                self.transition(&mut session, FlowState::Capturing);
            }
            Ok(analysis) if analysis.is_empty() => {
                info!("no face detected");
                session.notice = Some(FlowNotice::NoFaceDetected);
                self.transition(&mut session, FlowState::Idle);
            }
            Ok(analysis) => {
                session.emotions = top_three_emotions(&analysis.emotions);
                info!(
                    mood = %session.emotions[0].mood,
                    readings = session.emotions.len(),
                    "emotions read"
                );
                self.transition(&mut session, FlowState::AwaitingConfirmation);
            }
            Err(e) => {
                warn!(error = %e, "emotion analysis failed");
                session.notice = Some(FlowNotice::InferenceFailed {
                    message: e.to_string(),
                    retryable: e.is_retryable(),
                });
                self.transition(&mut session, FlowState::Capturing);
            }
        }
        Ok(FlowOutcome::Applied(session.state))
    }

    pub async fn reject_reading(&self) -> Result<FlowState, SpiritError> {
        self.ensure_open()?;
        let mut session = self.session.lock().await;
        expect_state(&session, &[FlowState::AwaitingConfirmation], "reject a reading")?;
        session.bump();
        session.emotions.clear();
        self.transition(&mut session, FlowState::Idle);
        Ok(session.state)
    }

    // --- generation ---

    /// Accept the emotion reading and generate recipes for its moods.
    pub async fn confirm_reading(&self) -> Result<FlowOutcome, SpiritError> {
        self.ensure_open()?;
        self.run_generation(GenerationStart::Confirm).await
    }

    /// Generate for a self-reported mood, skipping inference.
    pub async fn select_mood(&self, mood: &str) -> Result<FlowOutcome, SpiritError> {
        self.ensure_open()?;
        let mood = mood.trim();
        if mood.is_empty() {
            return Err(SpiritError::Validation("mood must not be empty".into()));
        }
        self.run_generation(GenerationStart::Mood(mood.to_string())).await
    }

    /// Re-run a generation that failed or came back empty.
    pub async fn retry_generation(&self) -> Result<FlowOutcome, SpiritError> {
        self.ensure_open()?;
        self.run_generation(GenerationStart::Retry).await
    }

    /// The state check and the move to `GeneratingRecipes` share one lock.
    async fn run_generation(&self, start: GenerationStart) -> Result<FlowOutcome, SpiritError> {
        let (generation, moods) = {
            let mut session = self.session.lock().await;
            match start {
                GenerationStart::Confirm => {
                    expect_state(
                        &session,
                        &[FlowState::AwaitingConfirmation],
                        "confirm a reading",
                    )?;
                    let moods = session.emotions.iter().map(|e| e.mood.clone()).collect();
                    session.moods = moods;
                }
                GenerationStart::Mood(mood) => {
                    expect_state(
                        &session,
                        &[FlowState::Idle, FlowState::DisplayingRecipes],
                        "select a mood",
                    )?;
                    session.emotions.clear();
                    session.moods = vec![mood];
                }
                GenerationStart::Retry => {
                    expect_state(&session, &[FlowState::GeneratingRecipes], "retry generation")?;
                    if session.last_error.is_none() {
                        return Err(SpiritError::Validation(
                            "recipe generation is still running".into(),
                        ));
                    }
                }
            }
            let generation = session.bump();
            session.notice = None;
            session.last_error = None;
            session.batch = None;
            session.clear_detail();
            self.transition(&mut session, FlowState::GeneratingRecipes);
            (generation, session.moods.clone())
        };

        let Some(result) = self
            .guarded(
                self.services
                    .generator
                    .generate_recipes_for_moods(&moods, self.settings.recipe_count),
            )
            .await
        else {
            return Ok(FlowOutcome::Discarded);
        };

        let mut session = self.session.lock().await;
        if !self.is_current(&session, generation) {
            debug!(generation, "stale generation result discarded");
            return Ok(FlowOutcome::Discarded);
        }

        let primary = moods.first().map(String::as_str).unwrap_or(DEFAULT_MOOD);
        let failure = match result {
            Ok(batch) if !batch.is_empty() => {
                session.batch = Some(batch);
                self.transition(&mut session, FlowState::DisplayingRecipes);
                return Ok(FlowOutcome::Applied(session.state));
            }
            Ok(_) => (FlowNotice::NoRecipes, "no recipes were generated".to_string()),
            Err(e) => {
                let message = e.to_string();
                (
                    FlowNotice::GenerationFailed {
                        message: message.clone(),
                        retryable: e.is_retryable(),
                    },
                    message,
                )
            }
        };

        let (notice, message) = failure;
        if self.settings.fallback_to_curated {
            info!(mood = primary, reason = %message, "showing curated recipes");
            session.batch = Some(curated_recipes(primary));
            session.notice = Some(FlowNotice::ShowingCurated { reason: message });
            self.transition(&mut session, FlowState::DisplayingRecipes);
        } else {
            warn!(mood = primary, error = %message, "recipe generation failed");
            session.notice = Some(notice);
            session.last_error = Some(message);
        }
        Ok(FlowOutcome::Applied(session.state))
    }

    // --- details and saving ---

    /// Open the recipe with `recipe_id` from the displayed batch.
    pub async fn select_recipe(&self, recipe_id: &str) -> Result<FlowOutcome, SpiritError> {
        self.ensure_open()?;
        let (generation, recipe, mood) = {
            let mut session = self.session.lock().await;
            expect_state(&session, &[FlowState::DisplayingRecipes], "select a recipe")?;
            let recipe = session
                .batch
                .as_ref()
                .and_then(|b| b.recipes.iter().find(|r| r.id == recipe_id))
                .cloned()
                .ok_or_else(|| SpiritError::Validation(format!("no recipe with id {recipe_id}")))?;
            let generation = session.bump();
            session.notice = None;
            session.selected = Some(recipe.clone());
            self.transition(&mut session, FlowState::DetailLoading);
            (generation, recipe, session.moods.first().cloned())
        };

        let details = &self.services.details;
        let archive = &self.services.archive;
        let Some(((details, origin), saved)) = self
            .guarded(async {
                let fetched = details
                    .get_recipe_details_traced(&recipe.title, mood.as_deref())
                    .await;
                let saved = archive.is_recipe_saved(&recipe.title).await;
                (fetched, saved)
            })
            .await
        else {
            return Ok(FlowOutcome::Discarded);
        };

        let mut session = self.session.lock().await;
        if !self.is_current(&session, generation) {
            debug!(generation, "stale recipe details discarded");
            return Ok(FlowOutcome::Discarded);
        }

        let already_saved = saved.unwrap_or_else(|e| {
            warn!(error = %e, "could not check saved recipes");
            false
        });
        session.details = Some(details);
        session.detail_origin = Some(origin);
        let next = if already_saved {
            FlowState::Saved
        } else {
            FlowState::DetailReady
        };
        self.transition(&mut session, next);
        Ok(FlowOutcome::Applied(session.state))
    }

    /// Save the open recipe, or remove it when it is already saved.
    pub async fn toggle_save(&self) -> Result<FlowState, SpiritError> {
        self.ensure_open()?;
        let mut session = self.session.lock().await;
        expect_state(&session, &[FlowState::DetailReady, FlowState::Saved], "save a recipe")?;
        let details = session
            .details
            .clone()
            .ok_or_else(|| SpiritError::Internal("detail state without details".into()))?;
        let color = session
            .selected
            .as_ref()
            .map(|r| r.color)
            .unwrap_or(PaletteColor::SandBeige);
        let mood = session
            .moods
            .first()
            .cloned()
            .unwrap_or_else(|| DEFAULT_MOOD.to_string());

        // Held across the write so a concurrent `back` cannot interleave.
        let toggled = self
            .services
            .archive
            .toggle_saved(&details, &mood, color)
            .await?;
        let next = match toggled {
            SaveToggle::Saved(_) => FlowState::Saved,
            SaveToggle::Removed => FlowState::DetailReady,
        };
        session.bump();
        self.transition(&mut session, next);
        let _ = self.events.send(FlowEvent::ArchiveChanged);
        Ok(session.state)
    }

    // --- navigation ---

    pub async fn back(&self) -> Result<FlowState, SpiritError> {
        self.ensure_open()?;
        let mut session = self.session.lock().await;
        expect_state(
            &session,
            &[FlowState::DetailLoading, FlowState::DetailReady, FlowState::Saved],
            "go back",
        )?;
        session.bump();
        session.clear_detail();
        session.notice = None;
        self.transition(&mut session, FlowState::DisplayingRecipes);
        Ok(session.state)
    }

    /// Return to `Idle` from any state, dropping in-flight results.
    pub async fn reset(&self) -> Result<FlowState, SpiritError> {
        self.ensure_open()?;
        let mut session = self.session.lock().await;
        let generation = session.bump();
        let from = session.state;
        *session = Session::new();
        session.generation = generation;
        if from != FlowState::Idle {
            let _ = self.events.send(FlowEvent::StateChanged {
                from,
                to: FlowState::Idle,
                generation,
            });
        }
        Ok(session.state)
    }

    /// Stop the session. In-flight calls are abandoned and every later
    /// action is refused.
    pub async fn close(&self) {
        self.cancel.cancel();
        let mut session = self.session.lock().await;
        session.bump();
        info!(state = %session.state, "flow closed");
    }

    // --- preferences ---

    pub async fn preferences(&self) -> Result<UserFoodPreferences, SpiritError> {
        self.services.preferences.get_local_preferences().await
    }

    /// Save preferences locally and remotely.
    ///
    /// [`SpiritError::PartialPersistence`] still counts as a change: the
    /// local copy was written.
    pub async fn update_preferences(&self, prefs: &UserFoodPreferences) -> Result<(), SpiritError> {
        self.ensure_open()?;
        let result = self.services.preferences.save_preferences(prefs).await;
        if matches!(result, Ok(()) | Err(SpiritError::PartialPersistence { .. })) {
            let _ = self.events.send(FlowEvent::PreferencesChanged);
        }
        if let Err(SpiritError::PartialPersistence { message }) = &result {
            self.session.lock().await.notice = Some(FlowNotice::SavedLocallyOnly {
                message: message.clone(),
            });
        }
        result
    }

    // --- helpers ---

    fn ensure_open(&self) -> Result<(), SpiritError> {
        if self.cancel.is_cancelled() {
            return Err(SpiritError::Validation("the mood session is closed".into()));
        }
        Ok(())
    }

    fn is_current(&self, session: &Session, generation: u64) -> bool {
        !self.cancel.is_cancelled() && session.generation == generation
    }

    /// Run `fut` unless the flow is closed first.
    async fn guarded<T>(&self, fut: impl Future<Output = T>) -> Option<T> {
        tokio::select! {
            _ = self.cancel.cancelled() => None,
            out = fut => Some(out),
        }
    }

    fn transition(&self, session: &mut Session, to: FlowState) {
        let from = session.state;
        session.state = to;
        debug!(phase = %to, from = %from, generation = session.generation, "flow transition");
        let _ = self.events.send(FlowEvent::StateChanged {
            from,
            to,
            generation: session.generation,
        });
    }
}

/// How a generation run picks its moods.
enum GenerationStart {
    Confirm,
    Mood(String),
    Retry,
}

fn expect_state(session: &Session, allowed: &[FlowState], action: &str) -> Result<(), SpiritError> {
    if allowed.contains(&session.state) {
        Ok(())
    } else {
        Err(SpiritError::Validation(format!(
            "cannot {action} while {}",
            session.state
        )))
    }
}
