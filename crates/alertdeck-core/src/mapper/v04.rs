//! Alertmanager 0.4 wire schema.
//!
//! Differences from later releases:
//! - `silenced` on an alert is a bare counter, kept as
//!   [`Alert::legacy_silenced_count`] and never treated as a silence ID
//! - silence IDs are integers
//! - the silences endpoint is paginated and wraps the list in
//!   `{silences, totalSilences}`

use chrono::{DateTime, Utc};
use serde::Deserialize;

use super::envelope::{decode_envelope, nullable};
use crate::{
    models::{Alert, AlertGroup, LabelSet, Matcher, Silence},
    upstream::UpstreamError,
};

/// Page size requested from the paginated silences endpoint.
///
/// Large enough to fetch every silence in one round-trip.
pub const SILENCES_PAGE_LIMIT: u32 = u32::MAX;

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
    #[serde(default)]
    silenced: u64,
}

#[derive(Debug, Deserialize)]
struct RawBlock {
    #[serde(default, deserialize_with = "nullable")]
    alerts: Vec<RawAlert>,
}

#[derive(Debug, Deserialize)]
struct RawGroup {
    #[serde(default, deserialize_with = "nullable")]
    labels: LabelSet,
    #[serde(default, deserialize_with = "nullable")]
    blocks: Vec<RawBlock>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawSilence {
    id: u64,
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

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SilencePage {
    #[serde(default, deserialize_with = "nullable")]
    silences: Vec<RawSilence>,
    #[serde(default)]
    total_silences: u64,
}

impl From<RawAlert> for Alert {
    fn from(raw: RawAlert) -> Self {
        Alert {
            labels: raw.labels,
            annotations: raw.annotations,
            starts_at: raw.starts_at,
            ends_at: raw.ends_at,
            generator_url: raw.generator_url,
            inhibited: raw.inhibited,
            legacy_silenced_count: (raw.silenced > 0).then_some(raw.silenced),
            ..Default::default()
        }
        .normalized()
    }
}

impl From<RawSilence> for Silence {
    fn from(raw: RawSilence) -> Self {
        Silence {
            id: raw.id.to_string(),
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
            let alerts = group
                .blocks
                .into_iter()
                .flat_map(|block| block.alerts)
                .map(Alert::from)
                .collect();
            AlertGroup::new(None, group.labels, alerts)
        })
        .collect())
}

pub(super) fn decode_silences(body: &[u8]) -> Result<Vec<Silence>, UpstreamError> {
    let page: SilencePage = decode_envelope(body)?;
    if page.total_silences > page.silences.len() as u64 {
        tracing::warn!(
            received = page.silences.len(),
            total = page.total_silences,
            "silence listing was truncated by upstream pagination"
        );
    }
    Ok(page.silences.into_iter().map(Silence::from).collect())
}
