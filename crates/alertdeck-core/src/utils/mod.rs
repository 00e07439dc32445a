//! Shared helpers.
//!
//! ## Fingerprints (`fingerprint`)
//! - SHA-256 over type-discriminated, length-prefixed components
//! - Used for alert group identity, alert deduplication and group change hashes
//!
//! ## URL joining (`join_url`)
//! - Appends a relative API path to an instance base URI, keeping any base path

pub mod fingerprint;

pub use fingerprint::Fingerprinter;

use url::Url;

/// Joins `sub_path` onto the path of `base_uri`.
///
/// `http://am:9093/prefix` + `api/v1/status` yields
/// `http://am:9093/prefix/api/v1/status`.
///
/// # Errors
///
/// Returns [`url::ParseError`] if `base_uri` is not an absolute URL.
pub fn join_url(base_uri: &str, sub_path: &str) -> Result<Url, url::ParseError> {
    let mut url = Url::parse(base_uri)?;
    let joined = format!(
        "{}/{}",
        url.path().trim_end_matches('/'),
        sub_path.trim_start_matches('/')
    );
    url.set_path(&joined);
    Ok(url)
}
