//! # Alertdeck Core
//!
//! Data-aggregation core of the alertdeck dashboard. It polls Alertmanager
//! instances that may run different, incompatible API generations,
//! normalizes their alerts and silences into one model, and publishes a
//! self-consistent snapshot per instance.
//!
//! - **[`upstream`]**: shared HTTP client, version probe and error taxonomy.
//! - **[`mapper`]**: per-generation decoders and the version-range tables
//!   that select them.
//! - **[`pipeline`]**: deduplication, silence correlation and post-processing.
//! - **[`transform`]**: label colors, autocomplete hints, issue-tracker links.
//! - **[`snapshot`]**: atomically replaced per-instance state.
//! - **[`poller`]**: one-instance cycle orchestration.
//! - **[`config`]**: layered configuration loading.
//!
//! ## Pull Cycle
//!
//! ```text
//! ┌──────────────┐   version    ┌─────────────┐
//! │ VersionProbe │ ───────────► │  Mappers    │  (range → decoder)
//! └──────────────┘              └──────┬──────┘
//!                                      │ silence + alert mapper
//!                                      ▼
//!                     ┌────────────────────────────────┐
//!                     │ fetch silences ─► fetch alerts │
//!                     └───────────────┬────────────────┘
//!                                     ▼
//!                ┌──────────────────────────────────────────┐
//!                │ deduplicate ─► correlate ─► sort + hash  │
//!                └───────────────────┬──────────────────────┘
//!                                    ▼
//!                           ┌─────────────────┐
//!                           │  SnapshotStore  │ ◄── readers
//!                           └─────────────────┘
//! ```
//!
//! Scheduling, retries and serving are left to the embedding application.

pub mod config;
pub mod mapper;
pub mod metrics;
pub mod models;
pub mod pipeline;
pub mod poller;
pub mod snapshot;
pub mod transform;
pub mod types;
pub mod upstream;
pub mod utils;
pub mod version;

pub use poller::{Poller, PullError, PullStage};
pub use snapshot::{Snapshot, SnapshotError, SnapshotStore};
pub use types::Instance;
pub use version::SchemaVersion;
