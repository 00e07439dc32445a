//! Schema-generation dispatch.
//!
//! Each upstream API generation has one [`AlertMapper`] and one
//! [`SilenceMapper`] variant. A mapper knows the version range it supports,
//! the endpoint it reads from (plus any query arguments) and how to decode
//! the response body into canonical models.
//!
//! [`Mappers`] holds the ordered `(range, mapper)` tables used to pick a
//! mapper for a detected [`SchemaVersion`]. Tables are built once and owned
//! by whoever runs the pull cycle; there is no global registration.
//!
//! | Generation | Versions          | Alerts silenced field | Silence ID | Silences query  |
//! |------------|-------------------|-----------------------|------------|-----------------|
//! | `V04`      | `>=0.4.0 <0.5.0`  | counter               | integer    | `limit=<u32 max>` |
//! | `V05`      | `>=0.5.0`         | silence ID(s)         | string     | none            |

pub mod envelope;
pub mod v04;
pub mod v05;

use std::fmt;
use url::Url;

use crate::{
    models::{AlertGroup, Silence},
    upstream::UpstreamError,
    utils::join_url,
    version::{SchemaVersion, VersionRange},
};

pub use envelope::{decode_envelope, STATUS_SUCCESS};

/// Relative path of the alert groups endpoint.
pub const ALERTS_PATH: &str = "api/v1/alerts/groups";
/// Relative path of the silences endpoint.
pub const SILENCES_PATH: &str = "api/v1/silences";

/// Kind of data a mapper decodes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DataKind {
    Alerts,
    Silences,
}

impl DataKind {
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Alerts => "alert",
            Self::Silences => "silence",
        }
    }
}

impl fmt::Display for DataKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Version-bound decoder for one kind of upstream data.
pub trait Mapper {
    /// Canonical entity produced by [`Mapper::decode`].
    type Output;

    const KIND: DataKind;

    /// Versions this mapper handles by default.
    fn supported_range(&self) -> VersionRange;

    /// Endpoint path relative to the instance base URI.
    fn path(&self) -> &'static str;

    /// Query string appended to the endpoint, if any.
    fn query_args(&self) -> Option<String> {
        None
    }

    /// Decodes a complete response body.
    ///
    /// # Errors
    ///
    /// Returns [`UpstreamError::Decode`] for malformed bodies and
    /// [`UpstreamError::UpstreamStatus`] for non-success envelopes.
    fn decode(&self, body: &[u8]) -> Result<Vec<Self::Output>, UpstreamError>;

    /// Full endpoint URL for an instance rooted at `base_uri`.
    ///
    /// # Errors
    ///
    /// Returns [`UpstreamError::InvalidUrl`] if `base_uri` is not absolute.
    fn absolute_url(&self, base_uri: &str) -> Result<Url, UpstreamError> {
        let mut url = join_url(base_uri, self.path())?;
        if let Some(query) = self.query_args() {
            url.set_query(Some(&query));
        }
        Ok(url)
    }
}

/// Alert group decoders, one per schema generation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlertMapper {
    V04,
    V05,
}

impl Mapper for AlertMapper {
    type Output = AlertGroup;

    const KIND: DataKind = DataKind::Alerts;

    fn supported_range(&self) -> VersionRange {
        match self {
            Self::V04 => {
                VersionRange::new(SchemaVersion::new(0, 4, 0), SchemaVersion::new(0, 5, 0))
            }
            Self::V05 => VersionRange::at_least(SchemaVersion::new(0, 5, 0)),
        }
    }

    fn path(&self) -> &'static str {
        ALERTS_PATH
    }

    fn decode(&self, body: &[u8]) -> Result<Vec<AlertGroup>, UpstreamError> {
        match self {
            Self::V04 => v04::decode_alerts(body),
            Self::V05 => v05::decode_alerts(body),
        }
    }
}

/// Silence decoders, one per schema generation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SilenceMapper {
    V04,
    V05,
}

impl Mapper for SilenceMapper {
    type Output = Silence;

    const KIND: DataKind = DataKind::Silences;

    fn supported_range(&self) -> VersionRange {
        match self {
            Self::V04 => {
                VersionRange::new(SchemaVersion::new(0, 4, 0), SchemaVersion::new(0, 5, 0))
            }
            Self::V05 => VersionRange::at_least(SchemaVersion::new(0, 5, 0)),
        }
    }

    fn path(&self) -> &'static str {
        SILENCES_PATH
    }

    fn query_args(&self) -> Option<String> {
        match self {
            Self::V04 => Some(format!("limit={}", v04::SILENCES_PAGE_LIMIT)),
            Self::V05 => None,
        }
    }

    fn decode(&self, body: &[u8]) -> Result<Vec<Silence>, UpstreamError> {
        match self {
            Self::V04 => v04::decode_silences(body),
            Self::V05 => v05::decode_silences(body),
        }
    }
}

/// Ordered `(range, mapper)` table for one data kind.
///
/// Ranges are expected not to overlap; lookup returns the first match in
/// registration order.
#[derive(Debug, Clone)]
pub struct MapperRegistry<M> {
    entries: Vec<(VersionRange, M)>,
}

impl<M> Default for MapperRegistry<M> {
    fn default() -> Self {
        Self { entries: Vec::new() }
    }
}

impl<M: Mapper> MapperRegistry<M> {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends `mapper` under its own supported range.
    #[must_use]
    pub fn with(mut self, mapper: M) -> Self {
        let range = mapper.supported_range();
        self.register(range, mapper);
        self
    }

    /// Appends `mapper` under an explicit range.
    pub fn register(&mut self, range: VersionRange, mapper: M) {
        self.entries.push((range, mapper));
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns the first mapper whose range contains `version`.
    ///
    /// # Errors
    ///
    /// Returns [`UpstreamError::UnsupportedVersion`] if no range matches.
    pub fn resolve(&self, version: &SchemaVersion) -> Result<&M, UpstreamError> {
        self.entries
            .iter()
            .find(|(range, _)| range.contains(version))
            .map(|(_, mapper)| mapper)
            .ok_or_else(|| UpstreamError::UnsupportedVersion {
                kind: M::KIND,
                version: version.to_string(),
            })
    }
}

/// Alert and silence tables used by a poller.
#[derive(Debug, Clone)]
pub struct Mappers {
    pub alerts: MapperRegistry<AlertMapper>,
    pub silences: MapperRegistry<SilenceMapper>,
}

impl Mappers {
    /// Tables with every built-in schema generation, oldest first.
    #[must_use]
    pub fn builtin() -> Self {
        Self {
            alerts: MapperRegistry::new().with(AlertMapper::V04).with(AlertMapper::V05),
            silences: MapperRegistry::new().with(SilenceMapper::V04).with(SilenceMapper::V05),
        }
    }

    /// # Errors
    ///
    /// Returns [`UpstreamError::UnsupportedVersion`] if no alert mapper matches.
    pub fn resolve_alerts(&self, version: &SchemaVersion) -> Result<AlertMapper, UpstreamError> {
        self.alerts.resolve(version).copied()
    }

    /// # Errors
    ///
    /// Returns [`UpstreamError::UnsupportedVersion`] if no silence mapper matches.
    pub fn resolve_silences(
        &self,
        version: &SchemaVersion,
    ) -> Result<SilenceMapper, UpstreamError> {
        self.silences.resolve(version).copied()
    }
}

impl Default for Mappers {
    fn default() -> Self {
        Self::builtin()
    }
}
