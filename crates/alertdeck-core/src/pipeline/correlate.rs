use chrono::{DateTime, Utc};
use std::collections::{BTreeMap, HashMap};

use crate::models::{Alert, AlertGroup, AlertInstanceState, Silence};

/// Instance details attached to every alert of a cycle.
#[derive(Debug, Clone)]
pub struct InstanceContext {
    pub name: String,
    pub public_uri: String,
}

/// Resolves the silences an alert references.
///
/// Unknown IDs are skipped. A single match is kept even when expired. With
/// two or more matches, those that ended before `started_at` are dropped,
/// unless that would drop all of them.
#[must_use]
pub fn matching_silences(
    alert: &Alert,
    silences: &HashMap<String, Silence>,
    started_at: DateTime<Utc>,
) -> BTreeMap<String, Silence> {
    let mut matched: BTreeMap<String, Silence> = alert
        .silenced_by
        .iter()
        .filter_map(|id| silences.get(id).map(|s| (id.clone(), s.clone())))
        .collect();

    if matched.len() > 1 && matched.values().any(|s| !s.is_expired_at(started_at)) {
        matched.retain(|_, s| !s.is_expired_at(started_at));
    }
    matched
}

/// Attaches per-instance state, including resolved silences, to every alert.
///
/// Replaces any previously attached state, so repeated calls are stable.
pub fn correlate(
    groups: &mut [AlertGroup],
    silences: &HashMap<String, Silence>,
    context: &InstanceContext,
    started_at: DateTime<Utc>,
) {
    for alert in groups.iter_mut().flat_map(|g| g.alerts.iter_mut()) {
        let attached = matching_silences(alert, silences, started_at);
        alert.alertmanager = vec![AlertInstanceState {
            name: context.name.clone(),
            uri: context.public_uri.clone(),
            state: alert.state,
            starts_at: alert.starts_at,
            ends_at: alert.ends_at,
            source: alert.generator_url.clone(),
            silences: attached,
        }];
    }
}
