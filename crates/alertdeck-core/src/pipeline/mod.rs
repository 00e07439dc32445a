//! Pure reconciliation of one cycle's decoded data.
//!
//! ```text
//! raw groups ──► deduplicate ──► correlate(silences) ──► colors / autocomplete
//!                                                      └─► sort + hash per group
//! ```
//!
//! Nothing here performs I/O; the poller feeds decoded data in and publishes
//! the [`Reconciled`] result.

pub mod correlate;
pub mod dedup;

use chrono::{DateTime, Utc};
use std::collections::HashMap;

use crate::{
    models::{AlertGroup, Autocomplete, LabelsColorMap, Silence},
    transform::{AutocompleteBuilder, Transforms, RECEIVER_LABEL},
};

pub use correlate::{correlate, matching_silences, InstanceContext};
pub use dedup::deduplicate;

/// Output of [`reconcile`].
#[derive(Debug, Clone, Default)]
pub struct Reconciled {
    pub groups: Vec<AlertGroup>,
    pub colors: LabelsColorMap,
    pub autocomplete: Vec<Autocomplete>,
}

/// Runs deduplication, silence correlation and post-processing.
#[must_use]
pub fn reconcile(
    raw: Vec<AlertGroup>,
    silences: &HashMap<String, Silence>,
    context: &InstanceContext,
    transforms: &Transforms,
    started_at: DateTime<Utc>,
) -> Reconciled {
    let mut groups = deduplicate(raw);
    correlate(&mut groups, silences, context, started_at);

    let mut colors = LabelsColorMap::new();
    let mut autocomplete = AutocompleteBuilder::new();

    for group in &mut groups {
        for alert in &group.alerts {
            if let Some(receiver) = &alert.receiver {
                transforms.colorizer.assign(&mut colors, RECEIVER_LABEL, receiver);
            }
            for (key, value) in &alert.labels {
                transforms.colorizer.assign(&mut colors, key, value);
            }
        }
        group.finalize();
        autocomplete.add_alerts(&group.alerts);
    }

    Reconciled { groups, colors, autocomplete: autocomplete.build() }
}
