//! Per-instance published state.
//!
//! # Consistency Model
//!
//! A [`Snapshot`] is built completely off to the side and then published
//! with a single `ArcSwap` store. Readers either see the previous snapshot or
//! the new one in full, never a mix of fields from two cycles. Nothing is
//! ever mutated in place after publication.
//!
//! Accessors returning owned data clone out of the current snapshot. Callers
//! needing several fields from the same cycle should take
//! [`SnapshotStore::snapshot`] once and read from that.

use arc_swap::ArcSwap;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::{collections::HashMap, sync::Arc};
use thiserror::Error;

use crate::models::{AlertGroup, Autocomplete, LabelsColorMap, Silence};

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum SnapshotError {
    #[error("Silence '{0}' not found")]
    SilenceNotFound(String),
}

/// Result of one pull cycle.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    pub alert_groups: Vec<AlertGroup>,
    pub silences: HashMap<String, Silence>,
    pub colors: LabelsColorMap,
    pub autocomplete: Vec<Autocomplete>,
    /// Last error, empty after a successful cycle.
    pub error: String,
    /// Upstream version the cycle was decoded with.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    /// Start of the cycle that produced this snapshot.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pulled_at: Option<DateTime<Utc>>,
}

impl Snapshot {
    /// Empty snapshot carrying only an error message.
    #[must_use]
    pub fn failed(error: impl Into<String>) -> Self {
        Self { error: error.into(), ..Default::default() }
    }
}

/// Holder of the latest [`Snapshot`] for one instance.
#[derive(Debug)]
pub struct SnapshotStore {
    current: ArcSwap<Snapshot>,
}

impl Default for SnapshotStore {
    fn default() -> Self {
        Self::new()
    }
}

impl SnapshotStore {
    #[must_use]
    pub fn new() -> Self {
        Self { current: ArcSwap::from_pointee(Snapshot::default()) }
    }

    /// Current snapshot, shared without copying.
    #[must_use]
    pub fn snapshot(&self) -> Arc<Snapshot> {
        self.current.load_full()
    }

    /// Replaces the current snapshot.
    pub fn publish(&self, snapshot: Snapshot) {
        self.current.store(Arc::new(snapshot));
    }

    /// Replaces the current snapshot with an empty one recording `error`.
    pub fn clear(&self, error: impl Into<String>) {
        self.publish(Snapshot::failed(error));
    }

    #[must_use]
    pub fn alerts(&self) -> Vec<AlertGroup> {
        self.current.load().alert_groups.clone()
    }

    /// # Errors
    ///
    /// Returns [`SnapshotError::SilenceNotFound`] if `id` is not part of the
    /// current snapshot.
    pub fn silence_by_id(&self, id: &str) -> Result<Silence, SnapshotError> {
        self.current
            .load()
            .silences
            .get(id)
            .cloned()
            .ok_or_else(|| SnapshotError::SilenceNotFound(id.to_string()))
    }

    #[must_use]
    pub fn silences(&self) -> HashMap<String, Silence> {
        self.current.load().silences.clone()
    }

    #[must_use]
    pub fn colors(&self) -> LabelsColorMap {
        self.current.load().colors.clone()
    }

    #[must_use]
    pub fn autocomplete(&self) -> Vec<Autocomplete> {
        self.current.load().autocomplete.clone()
    }

    #[must_use]
    pub fn error(&self) -> String {
        self.current.load().error.clone()
    }
}
