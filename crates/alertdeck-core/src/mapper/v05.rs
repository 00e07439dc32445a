//! Alertmanager 0.5+ wire schema.
//!
//! Alerts reference the exact silences that match them, and silences are
//! returned as a flat, unpaginated list with string IDs.

use chrono::{DateTime, Utc};
use serde::Deserialize;

use super::envelope::{decode_envelope, nullable};
use crate::{
    models::{Alert, AlertGroup, LabelSet, Matcher, Silence},
    upstream::UpstreamError,
};

/// Silence references as emitted by different 0.x releases: a single ID
/// (empty when not silenced) or a list of IDs.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum SilencedField {
    One(String),
    Many(Vec<String>),
}

impl Default for SilencedField {
    fn default() -> Self {
        Self::Many(Vec::new())
    }
}

impl SilencedField {
    fn into_ids(self) -> Vec<String> {
        match self {
            Self::One(id) => vec![id],
            Self::Many(ids) => ids,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawAlert {
    #[serde(default, deserialize_with = "nullable")]
    labels: LabelSet,
    #[serde(default, deserialize_with = "nullable")]
    annotations: LabelSet,
    starts_at: DateTime<Utc>,
    ends_at: DateTime<Utc>,
    #[serde(default, rename = "generatorURL")]
    generator_url: String,
    #[serde(default)]
    inhibited: bool,
    #[serde(default, deserialize_with = "nullable")]
    silenced: SilencedField,
    #[serde(default, deserialize_with = "nullable")]
    silenced_by: Vec<String>,
}

#[derive(Debug, Default, Deserialize)]
struct RouteOpts {
    #[serde(default)]
    receiver: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawBlock {
    #[serde(default, deserialize_with = "nullable")]
    alerts: Vec<RawAlert>,
    #[serde(default, deserialize_with = "nullable")]
    route_opts: RouteOpts,
}

#[derive(Debug, Deserialize)]
struct RawGroup {
    #[serde(default, deserialize_with = "nullable")]
    labels: LabelSet,
    #[serde(default)]
    receiver: Option<String>,
    #[serde(default, deserialize_with = "nullable")]
    blocks: Vec<RawBlock>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawSilence {
    id: String,
    #[serde(default, deserialize_with = "nullable")]
    matchers: Vec<Matcher>,
    starts_at: DateTime<Utc>,
    ends_at: DateTime<Utc>,
    created_at: DateTime<Utc>,
    #[serde(default)]
    created_by: String,
    #[serde(default)]
    comment: String,
}

impl RawAlert {
    fn into_alert(self, receiver: Option<String>) -> Alert {
        let mut silenced_by = self.silenced.into_ids();
        for id in self.silenced_by {
            if !silenced_by.contains(&id) {
                silenced_by.push(id);
            }
        }
        silenced_by.retain(|id| !id.is_empty());

        Alert {
            labels: self.labels,
            annotations: self.annotations,
            starts_at: self.starts_at,
            ends_at: self.ends_at,
            generator_url: self.generator_url,
            inhibited: self.inhibited,
            receiver,
            silenced_by,
            ..Default::default()
        }
        .normalized()
    }
}

impl From<RawSilence> for Silence {
    fn from(raw: RawSilence) -> Self {
        Silence {
            id: raw.id,
            matchers: raw.matchers,
            starts_at: raw.starts_at,
            ends_at: raw.ends_at,
            created_at: raw.created_at,
            created_by: raw.created_by,
            comment: raw.comment,
            jira_id: None,
            jira_url: None,
        }
    }
}

pub(super) fn decode_alerts(body: &[u8]) -> Result<Vec<AlertGroup>, UpstreamError> {
    let groups: Vec<RawGroup> = decode_envelope(body)?;
    Ok(groups
        .into_iter()
        .map(|group| {
            let group_receiver = group.receiver;
            let mut alerts = Vec::new();
            for block in group.blocks {
                let receiver = block.route_opts.receiver.or_else(|| group_receiver.clone());
                alerts.extend(block.alerts.into_iter().map(|a| a.into_alert(receiver.clone())));
            }
            AlertGroup::new(group_receiver, group.labels, alerts)
        })
        .collect())
}

pub(super) fn decode_silences(body: &[u8]) -> Result<Vec<Silence>, UpstreamError> {
    let silences: Vec<RawSilence> = decode_envelope(body)?;
    Ok(silences.into_iter().map(Silence::from).collect())
}
