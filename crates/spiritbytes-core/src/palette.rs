// SPDX-FileCopyrightText: 2026 SpiritBytes Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Recipe card colors.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// One of the five earth tones recipe cards cycle through.
///
/// Serialized as the token name. Older archives stored the raw hex value,
/// which is still accepted on read.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
#[strum(serialize_all = "camelCase")]
#[serde(rename_all = "camelCase")]
pub enum PaletteColor {
    #[serde(alias = "#c19e75")]
    SandBeige,
    #[serde(alias = "#ae7e5c")]
    Terracotta,
    #[serde(alias = "#6d6941")]
    OliveGreen,
    #[serde(alias = "#8d6c45")]
    EarthBrown,
    #[serde(alias = "#807b54")]
    SageMoss,
}

/// Palette order used when assigning colors by position.
pub const PALETTE: [PaletteColor; 5] = [
    PaletteColor::SandBeige,
    PaletteColor::Terracotta,
    PaletteColor::OliveGreen,
    PaletteColor::EarthBrown,
    PaletteColor::SageMoss,
];

impl PaletteColor {
    /// Color for the recipe at `index` in a batch.
    pub fn for_index(index: usize) -> Self {
        PALETTE[index % PALETTE.len()]
    }

    pub fn hex(self) -> &'static str {
        match self {
            PaletteColor::SandBeige => "#c19e75",
            PaletteColor::Terracotta => "#ae7e5c",
            PaletteColor::OliveGreen => "#6d6941",
            PaletteColor::EarthBrown => "#8d6c45",
            PaletteColor::SageMoss => "#807b54",
        }
    }
}
