//! Communication with upstream Alertmanager instances.
//!
//! - [`HttpClient`]: shared, concurrency-limited GET fetcher with per-request
//!   timeouts and no internal retries
//! - [`probe::detect`]: fail-open version detection against `api/v1/status`
//! - [`UpstreamError`]: error taxonomy for every stage that talks to upstream

pub mod errors;
pub mod http_client;
pub mod probe;

pub use errors::{ErrorCategory, UpstreamError};
pub use http_client::{HttpClient, HttpClientConfig};
