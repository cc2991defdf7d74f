// SPDX-FileCopyrightText: 2026 SpiritBytes Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

use std::sync::Arc;

use spiritbytes_core::{EmotionAnalysis, ImageHandle, InferenceTransport, SpiritError};
use tracing::{debug, info};

use crate::parse::parse_analysis;

/// Sends one photo through the configured transport and decodes the answer.
#[derive(Clone)]
pub struct EmotionClient {
    transport: Arc<dyn InferenceTransport>,
}

impl EmotionClient {
    pub fn new(transport: Arc<dyn InferenceTransport>) -> Self {
        Self { transport }
    }

    /// Analyze the face in `image`.
    ///
    /// Fails on an unreadable image, upload failure, timeout or a non-2xx
    /// inference status. A body that does not decode is not an error: it
    /// comes back as an unsuccessful analysis. Zero emotions is a success.
    pub async fn analyze_emotion(&self, image: ImageHandle) -> Result<EmotionAnalysis, SpiritError> {
        let bytes = image.into_bytes().await?;
        debug!(size = bytes.len(), transport = self.transport.name(), "submitting image");

        let body = self.transport.submit(bytes).await?;
        let analysis = parse_analysis(&body);
        info!(
            success = analysis.success,
            emotions = analysis.emotions.len(),
            "emotion analysis finished"
        );
        Ok(analysis)
    }

    pub fn transport(&self) -> &Arc<dyn InferenceTransport> {
        &self.transport
    }
}
