use serde::Deserialize;
use tracing::{error, info};

use super::{HttpClient, UpstreamError};
use crate::{mapper::decode_envelope, types::Instance, utils::join_url, version::SchemaVersion};

/// Relative path of the status endpoint.
pub const STATUS_PATH: &str = "api/v1/status";

#[derive(Debug, Default, Deserialize)]
struct VersionInfo {
    #[serde(default)]
    version: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct StatusData {
    #[serde(default)]
    version_info: VersionInfo,
}

/// Asks the instance which Alertmanager version it runs.
///
/// Never fails: any problem (bad URI, transport error, malformed or
/// non-success response, missing or unparsable version) is logged and
/// [`SchemaVersion::latest`] is returned so that the newest mapper
/// generation is used.
pub async fn detect(http_client: &HttpClient, instance: &Instance) -> SchemaVersion {
    match fetch_version(http_client, instance).await {
        Ok(raw) if raw.is_empty() => {
            error!(instance = %instance.name, "no version information in Alertmanager API");
            SchemaVersion::latest()
        }
        Ok(raw) => match SchemaVersion::parse(&raw) {
            Ok(version) => {
                info!(instance = %instance.name, version = %version, "remote Alertmanager version");
                version
            }
            Err(e) => {
                error!(
                    instance = %instance.name,
                    version = %raw,
                    error = %e,
                    "Alertmanager version string parsing failed"
                );
                SchemaVersion::latest()
            }
        },
        Err(e) => {
            error!(instance = %instance.name, error = %e, "version probe failed");
            SchemaVersion::latest()
        }
    }
}

async fn fetch_version(
    http_client: &HttpClient,
    instance: &Instance,
) -> Result<String, UpstreamError> {
    let url = join_url(&instance.uri, STATUS_PATH)?;
    let body = http_client.get(&url, instance.timeout).await?;
    let status: StatusData = decode_envelope(&body)?;
    Ok(status.version_info.version.trim().to_string())
}
