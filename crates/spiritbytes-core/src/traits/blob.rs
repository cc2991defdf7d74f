// SPDX-FileCopyrightText: 2026 SpiritBytes Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Object storage adapter used to hand images to the inference service.

use async_trait::async_trait;

use crate::error::SpiritError;
use crate::traits::adapter::PluginAdapter;

/// Location of an uploaded object.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlobRef {
    pub bucket: String,
    pub key: String,
}

#[async_trait]
pub trait BlobStore: PluginAdapter {
    /// Container the store writes into.
    fn bucket(&self) -> &str;

    /// Uploads `bytes` under `key`. Called at most once per key.
    async fn put_object(
        &self,
        key: &str,
        bytes: Vec<u8>,
        content_type: &str,
    ) -> Result<BlobRef, SpiritError>;
}
