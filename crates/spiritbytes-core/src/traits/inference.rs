// SPDX-FileCopyrightText: 2026 SpiritBytes Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Emotion inference transport.

use async_trait::async_trait;

use crate::error::SpiritError;
use crate::traits::adapter::PluginAdapter;

/// Delivers an image to the inference service and returns the raw body.
///
/// Implementations differ only in how the image travels (blob reference or
/// inline bytes). The body is returned unparsed because it is untrusted.
#[async_trait]
pub trait InferenceTransport: PluginAdapter {
    async fn submit(&self, image: Vec<u8>) -> Result<String, SpiritError>;
}
