use sha2::{Digest, Sha256};
use std::collections::BTreeSet;

use crate::models::{Color, LabelColors, LabelsColorMap};

/// Synthetic label key used to color alert receivers.
pub const RECEIVER_LABEL: &str = "@receiver";

/// Brightness above which label text is rendered black.
const BRIGHTNESS_THRESHOLD: u8 = 125;

/// Assigns deterministic colors to configured label keys.
#[derive(Debug, Clone, Default)]
pub struct LabelColorizer {
    keys: BTreeSet<String>,
}

impl LabelColorizer {
    #[must_use]
    pub fn new<I, S>(keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self { keys: keys.into_iter().map(Into::into).collect() }
    }

    #[must_use]
    pub fn is_enabled(&self, key: &str) -> bool {
        self.keys.contains(key)
    }

    /// Records a color for `key=value` in `colors`.
    ///
    /// Does nothing for unconfigured keys or when the pair already has a
    /// color, so earlier assignments always win.
    pub fn assign(&self, colors: &mut LabelsColorMap, key: &str, value: &str) {
        if !self.is_enabled(key) {
            return;
        }
        colors
            .entry(key.to_string())
            .or_default()
            .entry(value.to_string())
            .or_insert_with(|| color_for(key, value));
    }
}

/// Derives the colors for one label pair from a hash of `key=value`.
#[must_use]
pub fn color_for(key: &str, value: &str) -> LabelColors {
    let digest = Sha256::new().chain_update(key).chain_update("=").chain_update(value).finalize();
    let background = Color { red: digest[0], green: digest[1], blue: digest[2], alpha: 255 };
    let font =
        if background.brightness() > BRIGHTNESS_THRESHOLD { Color::BLACK } else { Color::WHITE };
    LabelColors { font, background }
}
