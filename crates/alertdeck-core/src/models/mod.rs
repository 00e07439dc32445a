//! Canonical data model shared by every schema generation.
//!
//! Decoders map upstream payloads into these types; everything downstream of
//! decoding (deduplication, correlation, snapshots) only sees this model.

pub mod alert;
pub mod autocomplete;
pub mod colors;
pub mod group;
pub mod silence;

pub use alert::{Alert, AlertInstanceState, AlertState, LabelSet};
pub use autocomplete::Autocomplete;
pub use colors::{Color, LabelColors, LabelsColorMap};
pub use group::{labels_fingerprint, AlertGroup};
pub use silence::{Matcher, Silence};
