// SPDX-FileCopyrightText: 2026 SpiritBytes Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Emotion inference for SpiritBytes.
//!
//! [`EmotionClient`] ships a photo to the inference service through an
//! [`InferenceTransport`](spiritbytes_core::InferenceTransport) and decodes
//! the reply; [`mood`] turns raw labels into the mood vocabulary used by
//! recipe generation.

pub mod blob;
pub mod client;
pub mod mood;
pub mod parse;
pub mod transport;

pub use blob::HttpBlobStore;
pub use client::EmotionClient;
pub use mood::{map_emotion_to_mood, primary_mood, top_three_emotions};
pub use parse::parse_analysis;
pub use transport::{BlobReferenceTransport, InlineTransport, build_transport};
