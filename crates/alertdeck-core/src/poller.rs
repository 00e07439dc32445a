//! One-instance pull cycle orchestration.
//!
//! ```text
//! probe version ─► resolve mappers ─► fetch silences ─► fetch alerts
//!                                                          │
//!              publish snapshot ◄─ reconcile ◄─────────────┘
//! ```
//!
//! Any failure after the probe clears the instance snapshot and records the
//! error instead of leaving stale data in place. The probe itself never
//! fails; it falls back to the newest schema generation.
//!
//! Cycles for different instances are independent. Running two cycles for
//! the same instance concurrently is not prevented here; callers scheduling
//! pulls must serialize them per instance.

use chrono::{DateTime, Utc};
use std::{collections::HashMap, sync::Arc, time::Instant};
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::{
    mapper::{Mapper, Mappers},
    metrics,
    models::Silence,
    pipeline::{self, InstanceContext},
    snapshot::{Snapshot, SnapshotStore},
    transform::Transforms,
    types::Instance,
    upstream::{probe, ErrorCategory, HttpClient, UpstreamError},
    version::SchemaVersion,
};

/// Stage of the cycle a [`PullError`] originated from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PullStage {
    Silences,
    Alerts,
}

impl PullStage {
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Silences => "silences",
            Self::Alerts => "alerts",
        }
    }
}

/// Failed pull cycle.
///
/// Displays exactly as the underlying [`UpstreamError`], which is also the
/// string recorded in the cleared snapshot.
#[derive(Error, Debug)]
#[error("{error}")]
pub struct PullError {
    pub stage: PullStage,
    pub error: UpstreamError,
}

impl PullError {
    fn silences(error: UpstreamError) -> Self {
        Self { stage: PullStage::Silences, error }
    }

    fn alerts(error: UpstreamError) -> Self {
        Self { stage: PullStage::Alerts, error }
    }

    #[must_use]
    pub fn category(&self) -> ErrorCategory {
        self.error.category()
    }
}

/// Pulls and publishes data for one [`Instance`].
pub struct Poller {
    instance: Instance,
    http_client: Arc<HttpClient>,
    mappers: Arc<Mappers>,
    transforms: Arc<Transforms>,
    store: Arc<SnapshotStore>,
}

impl Poller {
    #[must_use]
    pub fn new(instance: Instance, http_client: Arc<HttpClient>) -> Self {
        Self {
            instance,
            http_client,
            mappers: Arc::new(Mappers::builtin()),
            transforms: Arc::new(Transforms::default()),
            store: Arc::new(SnapshotStore::new()),
        }
    }

    #[must_use]
    pub fn with_mappers(mut self, mappers: Arc<Mappers>) -> Self {
        self.mappers = mappers;
        self
    }

    #[must_use]
    pub fn with_transforms(mut self, transforms: Arc<Transforms>) -> Self {
        self.transforms = transforms;
        self
    }

    #[must_use]
    pub fn instance(&self) -> &Instance {
        &self.instance
    }

    /// Store readers use to access the published snapshot.
    #[must_use]
    pub fn store(&self) -> &Arc<SnapshotStore> {
        &self.store
    }

    /// Runs one full cycle and publishes its result.
    ///
    /// On success the new snapshot replaces the previous one. On failure the
    /// snapshot is cleared, the error string is recorded in it and the error
    /// is returned.
    ///
    /// # Errors
    ///
    /// Returns [`PullError`] tagged with the failing stage. Silences are
    /// pulled first, so a silence failure means alerts were never requested.
    pub async fn pull(&self) -> Result<(), PullError> {
        let name = &self.instance.name;
        metrics::record_pull_cycle(name);
        let started_at = Utc::now();
        let start = Instant::now();

        let version = probe::detect(&self.http_client, &self.instance).await;

        match self.run_cycle(&version, started_at).await {
            Ok(snapshot) => {
                let (groups, silences) = (snapshot.alert_groups.len(), snapshot.silences.len());
                self.store.publish(snapshot);
                metrics::record_snapshot_size(name, groups, silences);
                info!(
                    instance = %name,
                    version = %version,
                    groups,
                    silences,
                    elapsed_ms = start.elapsed().as_millis(),
                    "pull completed"
                );
                Ok(())
            }
            Err(err) => {
                warn!(
                    instance = %name,
                    stage = err.stage.as_str(),
                    category = err.category().as_str(),
                    error = %err,
                    "pull failed, clearing instance data"
                );
                self.store.clear(err.to_string());
                metrics::record_pull_error(name, err.stage.as_str(), err.category());
                metrics::record_snapshot_size(name, 0, 0);
                Err(err)
            }
        }
    }

    async fn run_cycle(
        &self,
        version: &SchemaVersion,
        started_at: DateTime<Utc>,
    ) -> Result<Snapshot, PullError> {
        let silence_mapper = self.mappers.resolve_silences(version).map_err(PullError::silences)?;
        let alert_mapper = self.mappers.resolve_alerts(version).map_err(PullError::alerts)?;

        let silences: HashMap<String, Silence> = self
            .fetch(&silence_mapper)
            .await
            .map_err(PullError::silences)?
            .into_iter()
            .map(|mut silence| {
                self.transforms.jira.apply(&mut silence);
                (silence.id.clone(), silence)
            })
            .collect();

        let raw_groups = self.fetch(&alert_mapper).await.map_err(PullError::alerts)?;

        let context = InstanceContext {
            name: self.instance.name.to_string(),
            public_uri: self.instance.public_uri(),
        };
        let reconciled =
            pipeline::reconcile(raw_groups, &silences, &context, &self.transforms, started_at);
        debug!(
            instance = %self.instance.name,
            groups = reconciled.groups.len(),
            hints = reconciled.autocomplete.len(),
            "reconciled alert groups"
        );

        Ok(Snapshot {
            alert_groups: reconciled.groups,
            silences,
            colors: reconciled.colors,
            autocomplete: reconciled.autocomplete,
            error: String::new(),
            version: Some(version.to_string()),
            pulled_at: Some(started_at),
        })
    }

    async fn fetch<M: Mapper>(&self, mapper: &M) -> Result<Vec<M::Output>, UpstreamError> {
        let url = mapper.absolute_url(&self.instance.uri)?;
        let start = Instant::now();

        let body = self.http_client.get(&url, self.instance.timeout).await.map_err(|e| {
            warn!(instance = %self.instance.name, url = %url, error = %e, "request failed");
            e
        })?;
        let items = mapper.decode(&body)?;

        info!(
            instance = %self.instance.name,
            kind = %M::KIND,
            count = items.len(),
            elapsed_ms = start.elapsed().as_millis(),
            "fetched upstream data"
        );
        Ok(items)
    }
}
