// SPDX-FileCopyrightText: 2026 SpiritBytes Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Mood session orchestration for SpiritBytes.
//!
//! [`MoodFlow`] binds photo analysis, recipe generation, recipe details and
//! the archive into one session driven by user actions:
//!
//! ```text
//! Idle -> Capturing -> Inferring -> AwaitingConfirmation -> GeneratingRecipes
//!      -> DisplayingRecipes -> DetailLoading -> DetailReady <-> Saved
//! ```

pub mod flow;
pub mod state;

pub use flow::{FlowServices, FlowSettings, MoodFlow};
pub use state::{FlowEvent, FlowNotice, FlowOutcome, FlowSnapshot, FlowState};
