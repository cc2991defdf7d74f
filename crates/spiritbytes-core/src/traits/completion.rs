// SPDX-FileCopyrightText: 2026 SpiritBytes Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Completion service adapter (the LLM behind recipe generation).

use async_trait::async_trait;

use crate::error::SpiritError;
use crate::traits::adapter::PluginAdapter;
use crate::types::{CompletionRequest, CompletionResponse};

#[async_trait]
pub trait CompletionAdapter: PluginAdapter {
    /// Whether a credential is available. Callers check this before
    /// building prompts so a missing key surfaces as a validation error.
    fn is_configured(&self) -> bool;

    /// Sends a single-shot completion and returns the assistant text.
    async fn complete(&self, request: CompletionRequest)
    -> Result<CompletionResponse, SpiritError>;
}
