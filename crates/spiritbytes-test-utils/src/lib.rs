// SPDX-FileCopyrightText: 2026 SpiritBytes Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test doubles for SpiritBytes integration tests.
//!
//! - [`MockCompletion`] - scripted completion service
//! - [`MockInference`] / [`MockBlobStore`] - scripted photo analysis
//! - [`MemoryAttributeStore`] - identity attributes in memory
//! - [`FlowHarness`] - a full [`MoodFlow`](spiritbytes_flow::MoodFlow) over the mocks

pub mod harness;
pub mod memory_attributes;
pub mod mock_completion;
pub mod mock_inference;

pub use harness::{FlowHarness, FlowHarnessBuilder};
pub use memory_attributes::{MemoryAttributeStore, StaticPreferences};
pub use mock_completion::{MockCompletion, MockReply};
pub use mock_inference::{MockBlobStore, MockInference, analysis_body};
