use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// RGBA color.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Color {
    pub red: u8,
    pub green: u8,
    pub blue: u8,
    pub alpha: u8,
}

impl Color {
    pub const BLACK: Self = Self { red: 0, green: 0, blue: 0, alpha: 255 };
    pub const WHITE: Self = Self { red: 255, green: 255, blue: 255, alpha: 255 };

    /// Perceived brightness in the 0..=255 range (ITU-R BT.601 weights).
    #[must_use]
    pub fn brightness(&self) -> u8 {
        let weighted =
            299 * u32::from(self.red) + 587 * u32::from(self.green) + 114 * u32::from(self.blue);
        u8::try_from(weighted / 1000).unwrap_or(u8::MAX)
    }
}

/// Font and background colors used to render one label value.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LabelColors {
    pub font: Color,
    pub background: Color,
}

/// Label key -> label value -> colors.
pub type LabelsColorMap = BTreeMap<String, BTreeMap<String, LabelColors>>;
