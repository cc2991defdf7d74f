// SPDX-FileCopyrightText: 2026 SpiritBytes Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Remote user-attribute store exposed by the identity provider.

use std::collections::HashMap;

use async_trait::async_trait;

use crate::error::SpiritError;
use crate::traits::adapter::PluginAdapter;

/// Named string attributes of the signed-in user.
#[async_trait]
pub trait AttributeStore: PluginAdapter {
    async fn get_attributes(&self) -> Result<HashMap<String, String>, SpiritError>;

    /// Writes the given attributes, leaving others untouched.
    async fn set_attributes(&self, attributes: HashMap<String, String>)
    -> Result<(), SpiritError>;
}
