//! Mockito-backed Alertmanager v1 API.

use alertdeck_core::{upstream::HttpClient, Instance, Poller};
use mockito::{Matcher, Mock, Server, ServerGuard};
use serde_json::{json, Value};
use std::{sync::Arc, time::Duration};

pub const STATUS_PATH: &str = "/api/v1/status";
pub const ALERTS_PATH: &str = "/api/v1/alerts/groups";
pub const SILENCES_PATH: &str = "/api/v1/silences";

/// Page size the legacy silences endpoint is always asked for.
pub const LEGACY_SILENCES_LIMIT: &str = "4294967295";

/// Wraps a `success` envelope around `data`.
#[must_use]
pub fn success(data: Value) -> Value {
    json!({ "status": "success", "data": data })
}

/// Builder for a mocked Alertmanager instance.
pub struct AlertmanagerMockBuilder {
    server: ServerGuard,
    mocks: Vec<Mock>,
}

impl AlertmanagerMockBuilder {
    pub async fn new() -> Self {
        Self { server: Server::new_async().await, mocks: Vec::new() }
    }

    #[must_use]
    pub fn url(&self) -> String {
        self.server.url()
    }

    /// Instance pointing at this mock server.
    #[must_use]
    pub fn instance(&self, name: &str) -> Instance {
        Instance::new(name, self.url(), Duration::from_secs(2))
    }

    /// Poller with default mappers and transforms for this mock server.
    #[must_use]
    pub fn poller(&self, name: &str) -> Poller {
        let client = Arc::new(HttpClient::new().expect("http client"));
        Poller::new(self.instance(name), client)
    }

    async fn mock_json(&mut self, path: &str, query: Matcher, body: Value) -> Mock {
        self.server
            .mock("GET", path)
            .match_query(query)
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(body.to_string())
            .create_async()
            .await
    }

    /// Status endpoint reporting `version`.
    pub async fn mock_status(&mut self, version: &str) -> &mut Self {
        let mock = self
            .mock_json(
                STATUS_PATH,
                Matcher::Any,
                success(json!({ "versionInfo": { "version": version } })),
            )
            .await;
        self.mocks.push(mock);
        self
    }

    /// Status endpoint that succeeds without any version information.
    pub async fn mock_status_without_version(&mut self) -> &mut Self {
        let mock = self.mock_json(STATUS_PATH, Matcher::Any, success(json!({}))).await;
        self.mocks.push(mock);
        self
    }

    /// Alert groups endpoint returning `groups`.
    pub async fn mock_alerts(&mut self, groups: Vec<Value>) -> &mut Self {
        let mock = self.mock_json(ALERTS_PATH, Matcher::Any, success(Value::Array(groups))).await;
        self.mocks.push(mock);
        self
    }

    /// Alert groups endpoint that must never be requested.
    ///
    /// The returned mock is asserted by the caller.
    pub async fn mock_alerts_not_requested(&mut self) -> Mock {
        self.server
            .mock("GET", ALERTS_PATH)
            .match_query(Matcher::Any)
            .with_status(200)
            .with_body(success(json!([])).to_string())
            .expect(0)
            .create_async()
            .await
    }

    /// Paginated legacy silences endpoint.
    ///
    /// Only matches when the full page size is requested.
    pub async fn mock_silences_v04(&mut self, silences: Vec<Value>) -> &mut Self {
        let total = silences.len();
        let mock = self
            .mock_json(
                SILENCES_PATH,
                Matcher::UrlEncoded("limit".into(), LEGACY_SILENCES_LIMIT.into()),
                success(json!({ "silences": silences, "totalSilences": total })),
            )
            .await;
        self.mocks.push(mock);
        self
    }

    /// Flat silences list of 0.5 and later.
    pub async fn mock_silences_v05(&mut self, silences: Vec<Value>) -> &mut Self {
        let mock =
            self.mock_json(SILENCES_PATH, Matcher::Any, success(Value::Array(silences))).await;
        self.mocks.push(mock);
        self
    }

    /// Endpoint answering with an `error` envelope.
    pub async fn mock_error_envelope(&mut self, path: &str, message: &str) -> &mut Self {
        let mock = self
            .mock_json(path, Matcher::Any, json!({ "status": "error", "error": message }))
            .await;
        self.mocks.push(mock);
        self
    }

    /// Endpoint answering with a non-2xx HTTP status.
    pub async fn mock_http_error(&mut self, path: &str, status: usize) -> &mut Self {
        let mock = self
            .server
            .mock("GET", path)
            .match_query(Matcher::Any)
            .with_status(status)
            .with_body("internal error")
            .create_async()
            .await;
        self.mocks.push(mock);
        self
    }

    /// Endpoint answering with a body that is not JSON.
    pub async fn mock_garbage(&mut self, path: &str) -> &mut Self {
        let mock = self
            .server
            .mock("GET", path)
            .match_query(Matcher::Any)
            .with_status(200)
            .with_body("<html>not json</html>")
            .create_async()
            .await;
        self.mocks.push(mock);
        self
    }

    /// Drops every registered mock so the next cycle can be staged.
    pub fn reset(&mut self) {
        self.mocks.clear();
        self.server.reset();
    }
}
