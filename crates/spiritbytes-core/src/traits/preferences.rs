// SPDX-FileCopyrightText: 2026 SpiritBytes Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

use async_trait::async_trait;

use crate::error::SpiritError;
use crate::types::UserFoodPreferences;

/// Read access to the current dietary constraints.
#[async_trait]
pub trait PreferenceSource: Send + Sync {
    async fn current_preferences(&self) -> Result<UserFoodPreferences, SpiritError>;
}
