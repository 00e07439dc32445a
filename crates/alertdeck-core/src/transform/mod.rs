//! Pure, independently testable transforms applied during a pull cycle.
//!
//! - [`LabelColorizer`]: deterministic label colors, first assignment wins
//! - [`AutocompleteBuilder`]: filter hints derived from final alert lists
//! - [`JiraDetector`]: issue-tracker IDs extracted from silence comments

pub mod autocomplete;
pub mod colors;
pub mod jira;

pub use autocomplete::{build_autocomplete, AutocompleteBuilder};
pub use colors::{color_for, LabelColorizer, RECEIVER_LABEL};
pub use jira::{JiraDetector, JiraRule};

/// Transform configuration shared by every poller.
#[derive(Debug, Clone, Default)]
pub struct Transforms {
    pub colorizer: LabelColorizer,
    pub jira: JiraDetector,
}

impl Transforms {
    #[must_use]
    pub fn new(colorizer: LabelColorizer, jira: JiraDetector) -> Self {
        Self { colorizer, jira }
    }
}
