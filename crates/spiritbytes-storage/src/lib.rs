// SPDX-FileCopyrightText: 2026 SpiritBytes Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Persistence for SpiritBytes.
//!
//! A single SQLite file holds the saved-recipe archive and the local copy
//! of the user's food preferences as JSON values under namespaced keys.
//! [`remote::HttpAttributeStore`] mirrors preferences to the identity
//! provider.

pub mod archive;
pub mod database;
pub mod migrations;
pub mod preferences;
pub mod queries;
pub mod remote;

pub use archive::{RecipeArchive, SaveToggle};
pub use database::Database;
pub use preferences::{PreferenceOrigin, PreferenceStore, DIET_OPTIONS};
pub use remote::HttpAttributeStore;
