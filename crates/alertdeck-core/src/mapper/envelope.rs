//! Response envelope shared by every Alertmanager v1 API endpoint.

use serde::{de::DeserializeOwned, Deserialize, Deserializer};
use serde_json::Value;

use crate::upstream::UpstreamError;

/// Value of the envelope `status` field on success.
pub const STATUS_SUCCESS: &str = "success";

#[derive(Debug, Deserialize)]
struct Envelope {
    #[serde(default, deserialize_with = "nullable")]
    status: String,
    #[serde(default)]
    data: Value,
    #[serde(default, deserialize_with = "nullable")]
    error: String,
}

/// Decodes `{status, data, error}` and returns the typed `data` payload.
///
/// The status is checked before `data` is interpreted, so an error envelope
/// whose `data` has an unexpected shape still surfaces the upstream message.
/// A `null` or missing `data` on success decodes to `T::default()`.
///
/// # Errors
///
/// - [`UpstreamError::Decode`] if the body is not JSON or `data` does not match `T`
/// - [`UpstreamError::UpstreamStatus`] if `status` is not [`STATUS_SUCCESS`]
pub fn decode_envelope<T>(body: &[u8]) -> Result<T, UpstreamError>
where
    T: DeserializeOwned + Default,
{
    let envelope: Envelope = serde_json::from_slice(body)?;

    if envelope.status != STATUS_SUCCESS {
        let message = if envelope.error.is_empty() {
            format!("unexpected response status '{}'", envelope.status)
        } else {
            envelope.error
        };
        return Err(UpstreamError::UpstreamStatus(message));
    }

    if envelope.data.is_null() {
        return Ok(T::default());
    }
    Ok(serde_json::from_value(envelope.data)?)
}

/// Deserializes `null` as `T::default()`.
///
/// Upstream emits `null` for empty maps and lists in several places.
pub(crate) fn nullable<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}
