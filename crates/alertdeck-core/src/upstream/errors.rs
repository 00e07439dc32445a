use thiserror::Error;

use crate::mapper::DataKind;

/// Coarse classification of pull failures.
///
/// Used for metric labels and for deciding how a failure is reported. Every
/// category aborts the cycle; none of them is retried internally.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCategory {
    /// The upstream could not be reached or answered with a non-2xx status.
    Transport,
    /// The response body was not valid JSON for the expected schema.
    Decode,
    /// A well-formed envelope reported a non-success status.
    Upstream,
    /// No registered mapper handles the detected version.
    UnsupportedVersion,
}

impl ErrorCategory {
    /// Returns a static string representation for metrics labels.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Transport => "transport",
            Self::Decode => "decode",
            Self::Upstream => "upstream",
            Self::UnsupportedVersion => "unsupported_version",
        }
    }
}

/// Errors that can occur while pulling data from an Alertmanager instance.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum UpstreamError {
    /// Request exceeded the instance's configured timeout.
    #[error("Request timeout")]
    Timeout,

    /// Failed to establish a connection to the upstream endpoint.
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    /// HTTP-level error occurred (non-2xx status code).
    ///
    /// First field is the HTTP status code, second is the (truncated) body.
    #[error("HTTP error {0}: {1}")]
    HttpError(u16, String),

    /// Network-level error from the underlying HTTP client.
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// Instance URI could not be joined with an endpoint path.
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// Maximum concurrent requests limit has been reached.
    #[error("Concurrency limit reached: {0}")]
    ConcurrencyLimit(String),

    /// Response body was not valid JSON for the expected schema.
    #[error("Decode error: {0}")]
    Decode(#[from] serde_json::Error),

    /// Upstream envelope reported a non-success status.
    ///
    /// Carries the envelope's own error message.
    #[error("Upstream error: {0}")]
    UpstreamStatus(String),

    /// No registered mapper supports the detected version.
    #[error("Can't find {kind} mapper for Alertmanager {version}")]
    UnsupportedVersion { kind: DataKind, version: String },
}

impl UpstreamError {
    #[must_use]
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::Timeout |
            Self::ConnectionFailed(_) |
            Self::HttpError(_, _) |
            Self::Network(_) |
            Self::InvalidUrl(_) |
            Self::ConcurrencyLimit(_) => ErrorCategory::Transport,
            Self::Decode(_) => ErrorCategory::Decode,
            Self::UpstreamStatus(_) => ErrorCategory::Upstream,
            Self::UnsupportedVersion { .. } => ErrorCategory::UnsupportedVersion,
        }
    }

    /// Returns `true` if the error happened before a usable response arrived.
    #[must_use]
    pub fn is_transport(&self) -> bool {
        self.category() == ErrorCategory::Transport
    }
}

impl From<url::ParseError> for UpstreamError {
    fn from(e: url::ParseError) -> Self {
        Self::InvalidUrl(e.to_string())
    }
}
