use serde::{Deserialize, Serialize};

use super::alert::{Alert, LabelSet};
use crate::utils::Fingerprinter;

/// Deterministic identity of a label set.
///
/// Depends only on the sorted key/value pairs, never on arrival order.
#[must_use]
pub fn labels_fingerprint(labels: &LabelSet) -> String {
    let mut fp = Fingerprinter::new();
    fp.write_map(labels);
    fp.finish()
}

/// Alerts sharing one grouping label set.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AlertGroup {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub receiver: Option<String>,
    pub labels: LabelSet,
    pub alerts: Vec<Alert>,
    /// [`labels_fingerprint`] of `labels`.
    pub id: String,
    /// Checksum of the final alert list, see [`AlertGroup::content_fingerprint`].
    pub hash: String,
    pub silenced_count: usize,
    pub unsilenced_count: usize,
}

impl AlertGroup {
    #[must_use]
    pub fn new(receiver: Option<String>, labels: LabelSet, alerts: Vec<Alert>) -> Self {
        let id = labels_fingerprint(&labels);
        Self { receiver, labels, alerts, id, ..Default::default() }
    }

    /// Sorts alerts by start time descending, ties broken by fingerprint.
    pub fn sort_alerts(&mut self) {
        self.alerts.sort_by(|a, b| {
            b.starts_at.cmp(&a.starts_at).then_with(|| a.fingerprint.cmp(&b.fingerprint))
        });
    }

    /// Checksum over the alert list in its current order.
    #[must_use]
    pub fn content_fingerprint(&self) -> String {
        let mut fp = Fingerprinter::new();
        fp.write_u64(self.alerts.len() as u64);
        for alert in &self.alerts {
            alert.write_full(&mut fp);
        }
        fp.finish()
    }

    /// Sorts alerts, then recomputes silence counters and the content hash.
    pub fn finalize(&mut self) {
        self.sort_alerts();
        self.silenced_count = self.alerts.iter().filter(|a| a.is_silenced()).count();
        self.unsilenced_count = self.alerts.len() - self.silenced_count;
        self.hash = self.content_fingerprint();
    }
}
