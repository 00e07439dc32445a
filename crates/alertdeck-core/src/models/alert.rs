use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use url::Url;

use super::silence::Silence;
use crate::utils::Fingerprinter;

/// Label or annotation set, ordered by key.
pub type LabelSet = BTreeMap<String, String>;

/// Derived state of an alert.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AlertState {
    /// State could not be determined.
    #[default]
    Unprocessed,
    /// Firing and neither silenced nor inhibited.
    Active,
    /// Silenced or inhibited.
    Suppressed,
}

impl AlertState {
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Unprocessed => "unprocessed",
            Self::Active => "active",
            Self::Suppressed => "suppressed",
        }
    }
}

/// Per-instance view of an alert, attached during silence correlation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AlertInstanceState {
    /// Instance display name.
    pub name: String,
    /// Public-facing URI of the instance (real or proxied).
    pub uri: String,
    pub state: AlertState,
    pub starts_at: DateTime<Utc>,
    pub ends_at: DateTime<Utc>,
    /// Origin URL of the alert (generator URL).
    pub source: String,
    /// Silences from the same cycle that this alert references.
    pub silences: BTreeMap<String, Silence>,
}

/// Canonical alert.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Alert {
    pub labels: LabelSet,
    pub annotations: LabelSet,
    /// Annotations whose value is an absolute http(s) URL.
    pub links: LabelSet,
    pub starts_at: DateTime<Utc>,
    pub ends_at: DateTime<Utc>,
    #[serde(rename = "generatorURL")]
    pub generator_url: String,
    pub inhibited: bool,
    /// Receiver of the routing block this alert was listed under.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub receiver: Option<String>,
    /// IDs of silences referenced by upstream.
    pub silenced_by: Vec<String>,
    /// Legacy schemas only report how many silences match, not which ones.
    ///
    /// This is a display marker and never a silence reference.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub legacy_silenced_count: Option<u64>,
    pub state: AlertState,
    pub alertmanager: Vec<AlertInstanceState>,
    pub fingerprint: String,
}

impl Alert {
    /// Moves URL-valued annotations into `links` and derives `state`.
    ///
    /// Called by every decoder so that the canonical form, and therefore the
    /// content fingerprint, does not depend on the schema generation.
    #[must_use]
    pub fn normalized(mut self) -> Self {
        let (annotations, links): (LabelSet, LabelSet) =
            std::mem::take(&mut self.annotations).into_iter().partition(|(_, v)| !is_link(v));
        self.annotations = annotations;
        self.links.extend(links);
        self.state = self.derive_state();
        self
    }

    /// Returns `true` if upstream reports the alert as silenced.
    #[must_use]
    pub fn is_silenced(&self) -> bool {
        !self.silenced_by.is_empty() || self.legacy_silenced_count.is_some()
    }

    #[must_use]
    pub fn derive_state(&self) -> AlertState {
        if self.inhibited || self.is_silenced() {
            AlertState::Suppressed
        } else {
            AlertState::Active
        }
    }

    /// Fingerprint over the upstream-provided content of this alert.
    ///
    /// Covers labels, annotations, links, the validity window, generator URL,
    /// the inhibited flag and silence references. Derived fields (state,
    /// per-instance context, receiver) are excluded.
    #[must_use]
    pub fn content_fingerprint(&self) -> String {
        let mut fp = Fingerprinter::new();
        fp.write_map(&self.labels)
            .write_map(&self.annotations)
            .write_map(&self.links)
            .write_timestamp(&self.starts_at)
            .write_timestamp(&self.ends_at)
            .write_str(&self.generator_url)
            .write_bool(self.inhibited)
            .write_list(&self.silenced_by);
        match self.legacy_silenced_count {
            Some(count) => fp.write_u64(count),
            None => fp.write_opt_str(None),
        };
        fp.finish()
    }

    /// Feeds the full derived alert, including attached silences, into `fp`.
    pub(crate) fn write_full(&self, fp: &mut Fingerprinter) {
        fp.write_str(&self.fingerprint)
            .write_str(self.state.as_str())
            .write_opt_str(self.receiver.as_deref());
        fp.write_u64(self.alertmanager.len() as u64);
        for instance in &self.alertmanager {
            fp.write_str(&instance.name)
                .write_str(&instance.uri)
                .write_str(instance.state.as_str())
                .write_str(&instance.source);
            fp.write_u64(instance.silences.len() as u64);
            for silence in instance.silences.values() {
                fp.write_str(&silence.id)
                    .write_timestamp(&silence.starts_at)
                    .write_timestamp(&silence.ends_at)
                    .write_str(&silence.created_by)
                    .write_str(&silence.comment);
            }
        }
    }
}

fn is_link(value: &str) -> bool {
    Url::parse(value).is_ok_and(|url| matches!(url.scheme(), "http" | "https"))
}
