//! Lenient semantic version parsing for upstream schema dispatch.
//!
//! Alertmanager builds shipped by distributions often carry suffixes such as
//! `0.15.0~rc.1~git20180507.28967e3+ds`. Everything after the first `~` is
//! discarded before parsing, build metadata (`+...`) is ignored, and a leading
//! `v` is accepted. What remains is parsed by [`semver::Version`]. Anything
//! that still fails to parse is treated as [`SchemaVersion::latest`] by
//! [`SchemaVersion::parse_or_latest`].

use semver::{BuildMetadata, Comparator, Op, Version, VersionReq};
use std::{cmp::Ordering, fmt, str::FromStr};
use thiserror::Error;

/// Version reported when the real upstream version cannot be determined.
///
/// Chosen so that it falls into the newest registered schema generation.
const LATEST_MAJOR: u64 = 999;

/// Errors produced while parsing a version string.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum VersionParseError {
    /// Input was empty after trimming distribution suffixes.
    #[error("empty version string")]
    Empty,

    /// Trimmed input is not a valid semantic version.
    #[error("invalid version '{input}': {reason}")]
    Invalid { input: String, reason: String },
}

/// A parsed `major.minor.patch[-pre]` version without build metadata.
///
/// Ordering is semver precedence: a pre-release sorts before the release with
/// the same numeric triple, and numeric pre-release identifiers compare
/// numerically (`rc.2 < rc.10`).
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SchemaVersion(Version);

impl SchemaVersion {
    #[must_use]
    pub const fn new(major: u64, minor: u64, patch: u64) -> Self {
        Self(Version::new(major, minor, patch))
    }

    /// Sentinel used whenever the upstream version is unknown.
    #[must_use]
    pub const fn latest() -> Self {
        Self::new(LATEST_MAJOR, 0, 0)
    }

    #[must_use]
    pub fn is_latest_sentinel(&self) -> bool {
        *self == Self::latest()
    }

    #[must_use]
    pub fn as_semver(&self) -> &Version {
        &self.0
    }

    /// Pre-release part, if any (`rc.0` for `0.5.0-rc.0`).
    #[must_use]
    pub fn pre(&self) -> Option<&str> {
        (!self.0.pre.is_empty()).then(|| self.0.pre.as_str())
    }

    /// Parses a version string leniently.
    ///
    /// # Errors
    ///
    /// Returns [`VersionParseError`] if nothing is left after trimming or the
    /// rest is not a `major.minor.patch[-pre]` semantic version.
    pub fn parse(input: &str) -> Result<Self, VersionParseError> {
        let trimmed = trim_distribution(input.trim());
        let trimmed = trimmed.strip_prefix('v').unwrap_or(trimmed);
        let without_build = trimmed.split_once('+').map_or(trimmed, |(head, _)| head);

        if without_build.is_empty() {
            return Err(VersionParseError::Empty);
        }

        let mut version = Version::parse(without_build).map_err(|e| {
            VersionParseError::Invalid { input: input.to_string(), reason: e.to_string() }
        })?;
        version.build = BuildMetadata::EMPTY;
        Ok(Self(version))
    }

    /// Parses a version string, falling back to [`SchemaVersion::latest`].
    #[must_use]
    pub fn parse_or_latest(input: &str) -> Self {
        match Self::parse(input) {
            Ok(version) => version,
            Err(e) => {
                tracing::warn!(version = input, error = %e, "version string parsing failed");
                Self::latest()
            }
        }
    }
}

/// Drops any distribution-specific suffix starting at the first `~`.
fn trim_distribution(version: &str) -> &str {
    version.split_once('~').map_or(version, |(head, _)| head)
}

impl fmt::Display for SchemaVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl FromStr for SchemaVersion {
    type Err = VersionParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

/// Version requirement a mapper generation supports, such as
/// `>=0.4.0, <0.5.0`.
///
/// Comparators are evaluated by semver precedence. Unlike
/// [`VersionReq::matches`], pre-releases are not excluded from ranges whose
/// bounds have no pre-release, so `0.15.0-rc.1` satisfies `>=0.5.0`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VersionRange(VersionReq);

fn comparator(op: Op, bound: &SchemaVersion) -> Comparator {
    let version = bound.as_semver();
    Comparator {
        op,
        major: version.major,
        minor: Some(version.minor),
        patch: Some(version.patch),
        pre: version.pre.clone(),
    }
}

impl VersionRange {
    /// Half-open range `>=min, <max`.
    #[must_use]
    pub fn new(min: SchemaVersion, max: SchemaVersion) -> Self {
        Self(VersionReq {
            comparators: vec![comparator(Op::GreaterEq, &min), comparator(Op::Less, &max)],
        })
    }

    /// Unbounded range `>=min`.
    #[must_use]
    pub fn at_least(min: SchemaVersion) -> Self {
        Self(VersionReq { comparators: vec![comparator(Op::GreaterEq, &min)] })
    }

    /// Parses a requirement string such as `">=0.4.0, <0.5.0"`.
    ///
    /// # Errors
    ///
    /// Returns [`semver::Error`] if `input` is not a valid requirement.
    pub fn parse(input: &str) -> Result<Self, semver::Error> {
        VersionReq::parse(input).map(Self)
    }

    #[must_use]
    pub fn contains(&self, version: &SchemaVersion) -> bool {
        self.0.comparators.iter().all(|c| comparator_matches(c, version.as_semver()))
    }
}

fn comparator_matches(comparator: &Comparator, version: &Version) -> bool {
    let bound = Version {
        major: comparator.major,
        minor: comparator.minor.unwrap_or(0),
        patch: comparator.patch.unwrap_or(0),
        pre: comparator.pre.clone(),
        build: BuildMetadata::EMPTY,
    };
    let ordering = version.cmp(&bound);
    match comparator.op {
        Op::Exact => ordering == Ordering::Equal,
        Op::Greater => ordering == Ordering::Greater,
        Op::GreaterEq => ordering != Ordering::Less,
        Op::Less => ordering == Ordering::Less,
        Op::LessEq => ordering != Ordering::Greater,
        // Tilde, caret and wildcard keep cargo semantics.
        _ => VersionReq { comparators: vec![comparator.clone()] }.matches(version),
    }
}

impl fmt::Display for VersionRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}
