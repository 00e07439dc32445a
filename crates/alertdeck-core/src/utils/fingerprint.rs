//! Deterministic content fingerprints.
//!
//! Fingerprints identify alert groups and alerts across cycles and must be
//! stable across processes and releases, so they are computed with SHA-256
//! rather than a seeded in-memory hasher.
//!
//! # Type Discrimination
//!
//! Each component written to a [`Fingerprinter`] is prefixed with a
//! discriminant byte, and variable-length data is length-prefixed, so that
//! distinct inputs cannot collide by concatenation:
//! - Bool: 1u8 + value
//! - Integer: 2u8 + little-endian bytes
//! - String: 3u8 + length + bytes
//! - List: 4u8 + length + each element
//! - Map: 5u8 + length + (key, value) pairs in key order
//! - Timestamp: 6u8 + seconds + nanoseconds
//! - Absent optional: 0u8

use chrono::{DateTime, Utc};
use sha2::{Digest, Sha256};
use std::collections::BTreeMap;

/// Incremental SHA-256 fingerprint builder.
pub struct Fingerprinter {
    hasher: Sha256,
}

impl Fingerprinter {
    #[must_use]
    pub fn new() -> Self {
        Self { hasher: Sha256::new() }
    }

    fn write_len(&mut self, len: usize) {
        self.hasher.update((len as u64).to_le_bytes());
    }

    pub fn write_bool(&mut self, value: bool) -> &mut Self {
        self.hasher.update([1u8, u8::from(value)]);
        self
    }

    pub fn write_u64(&mut self, value: u64) -> &mut Self {
        self.hasher.update([2u8]);
        self.hasher.update(value.to_le_bytes());
        self
    }

    pub fn write_str(&mut self, value: &str) -> &mut Self {
        self.hasher.update([3u8]);
        self.write_len(value.len());
        self.hasher.update(value.as_bytes());
        self
    }

    pub fn write_opt_str(&mut self, value: Option<&str>) -> &mut Self {
        match value {
            Some(value) => self.write_str(value),
            None => {
                self.hasher.update([0u8]);
                self
            }
        }
    }

    pub fn write_list<S: AsRef<str>>(&mut self, items: &[S]) -> &mut Self {
        self.hasher.update([4u8]);
        self.write_len(items.len());
        for item in items {
            self.write_str(item.as_ref());
        }
        self
    }

    pub fn write_map(&mut self, map: &BTreeMap<String, String>) -> &mut Self {
        self.hasher.update([5u8]);
        self.write_len(map.len());
        for (key, value) in map {
            self.write_str(key);
            self.write_str(value);
        }
        self
    }

    pub fn write_timestamp(&mut self, value: &DateTime<Utc>) -> &mut Self {
        self.hasher.update([6u8]);
        self.hasher.update(value.timestamp().to_le_bytes());
        self.hasher.update(value.timestamp_subsec_nanos().to_le_bytes());
        self
    }

    /// Consumes the builder and returns the lowercase hex digest.
    #[must_use]
    pub fn finish(self) -> String {
        format!("{:x}", self.hasher.finalize())
    }
}

impl Default for Fingerprinter {
    fn default() -> Self {
        Self::new()
    }
}
