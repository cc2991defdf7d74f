// SPDX-FileCopyrightText: 2026 SpiritBytes Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! States, notices and events of a mood session.

use spiritbytes_core::{MappedEmotion, Recipe, RecipeBatch, RecipeDetails};
use spiritbytes_recipes::DetailOrigin;
use strum::Display;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
#[strum(serialize_all = "snake_case")]
pub enum FlowState {
    Idle,
    Capturing,
    Inferring,
    AwaitingConfirmation,
    GeneratingRecipes,
    DisplayingRecipes,
    DetailLoading,
    DetailReady,
    Saved,
}

/// User-facing message attached to the current state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FlowNotice {
    /// Inference succeeded but found no face.
    NoFaceDetected,
    /// Upload or inference failed; the user stays on the camera.
    InferenceFailed { message: String, retryable: bool },
    /// Generation failed; `retry_generation` re-runs it.
    GenerationFailed { message: String, retryable: bool },
    /// Generation returned nothing usable.
    NoRecipes,
    /// Curated recipes are shown because generation failed.
    ShowingCurated { reason: String },
    /// The save happened on this device but not on the identity provider.
    SavedLocallyOnly { message: String },
}

/// Change notifications for views that cache flow or storage data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FlowEvent {
    StateChanged {
        from: FlowState,
        to: FlowState,
        generation: u64,
    },
    ArchiveChanged,
    PreferencesChanged,
}

/// Result of a step whose async work may have been overtaken.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlowOutcome {
    /// The result was applied and the flow is now in this state.
    Applied(FlowState),
    /// A newer user action or `close` superseded the step.
    Discarded,
}

/// Read-only copy of a session.
#[derive(Debug, Clone, PartialEq)]
pub struct FlowSnapshot {
    pub state: FlowState,
    pub generation: u64,
    pub emotions: Vec<MappedEmotion>,
    pub moods: Vec<String>,
    pub batch: Option<RecipeBatch>,
    pub selected: Option<Recipe>,
    pub details: Option<RecipeDetails>,
    pub detail_origin: Option<DetailOrigin>,
    pub notice: Option<FlowNotice>,
    pub last_error: Option<String>,
}

#[derive(Debug)]
pub(crate) struct Session {
    pub state: FlowState,
    pub generation: u64,
    pub emotions: Vec<MappedEmotion>,
    pub moods: Vec<String>,
    pub batch: Option<RecipeBatch>,
    pub selected: Option<Recipe>,
    pub details: Option<RecipeDetails>,
    pub detail_origin: Option<DetailOrigin>,
    pub notice: Option<FlowNotice>,
    pub last_error: Option<String>,
}

impl Session {
    pub fn new() -> Self {
        Self {
            state: FlowState::Idle,
            generation: 0,
            emotions: Vec::new(),
            moods: Vec::new(),
            batch: None,
            selected: None,
            details: None,
            detail_origin: None,
            notice: None,
            last_error: None,
        }
    }

    /// Start a new step: invalidates results of every earlier one.
    pub fn bump(&mut self) -> u64 {
        self.generation += 1;
        self.generation
    }

    pub fn clear_detail(&mut self) {
        self.selected = None;
        self.details = None;
        self.detail_origin = None;
    }

    pub fn snapshot(&self) -> FlowSnapshot {
        FlowSnapshot {
            state: self.state,
            generation: self.generation,
            emotions: self.emotions.clone(),
            moods: self.moods.clone(),
            batch: self.batch.clone(),
            selected: self.selected.clone(),
            details: self.details.clone(),
            detail_origin: self.detail_origin,
            notice: self.notice.clone(),
            last_error: self.last_error.clone(),
        }
    }
}
