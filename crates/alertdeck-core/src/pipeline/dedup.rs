use std::collections::{HashMap, HashSet};

use crate::models::{labels_fingerprint, AlertGroup};

/// Collapses duplicate groups and alerts.
///
/// Groups are keyed by [`labels_fingerprint`]; the first group seen under a
/// key fixes its labels and receiver. Within a group, alerts are keyed by
/// [`Alert::content_fingerprint`](crate::models::Alert::content_fingerprint)
/// and the first occurrence is kept. Each kept alert gets its fingerprint
/// assigned. Output order follows first appearance, and running this on its
/// own output is a no-op.
#[must_use]
pub fn deduplicate(raw: Vec<AlertGroup>) -> Vec<AlertGroup> {
    let mut groups: Vec<AlertGroup> = Vec::with_capacity(raw.len());
    let mut group_index: HashMap<String, usize> = HashMap::with_capacity(raw.len());
    let mut seen_alerts: Vec<HashSet<String>> = Vec::with_capacity(raw.len());

    for group in raw {
        let id = labels_fingerprint(&group.labels);
        let index = *group_index.entry(id).or_insert_with(|| {
            groups.push(AlertGroup::new(group.receiver.clone(), group.labels.clone(), Vec::new()));
            seen_alerts.push(HashSet::new());
            groups.len() - 1
        });

        for mut alert in group.alerts {
            let fingerprint = alert.content_fingerprint();
            if seen_alerts[index].insert(fingerprint.clone()) {
                alert.fingerprint = fingerprint;
                groups[index].alerts.push(alert);
            }
        }
    }

    groups
}
