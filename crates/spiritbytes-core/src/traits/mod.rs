// SPDX-FileCopyrightText: 2026 SpiritBytes Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Adapter traits for the external collaborators of the mood pipeline.
//!
//! Every adapter extends [`PluginAdapter`] and uses `#[async_trait]` so the
//! clients can hold them as `Arc<dyn ...>` and tests can swap in doubles.

pub mod adapter;
pub mod attributes;
pub mod blob;
pub mod completion;
pub mod inference;
pub mod preferences;

pub use adapter::PluginAdapter;
pub use attributes::AttributeStore;
pub use blob::{BlobRef, BlobStore};
pub use completion::CompletionAdapter;
pub use inference::InferenceTransport;
pub use preferences::PreferenceSource;
