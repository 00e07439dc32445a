//! Payload fixtures for both Alertmanager schema generations.
//!
//! Timestamps are relative to the current time so that expiry checks made
//! during a pull cycle see live and expired silences as intended.

use chrono::{Duration, Utc};
use serde_json::{json, Map, Value};

fn labels(pairs: &[(&str, &str)]) -> Value {
    Value::Object(
        pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), Value::String((*v).to_string())))
            .collect::<Map<_, _>>(),
    )
}

fn timestamp(offset: Duration) -> String {
    (Utc::now() + offset).to_rfc3339()
}

/// Alert in the 0.5+ shape, silenced by `silenced_by`.
#[must_use]
pub fn alert(pairs: &[(&str, &str)], silenced_by: &[&str]) -> Value {
    json!({
        "labels": labels(pairs),
        "annotations": {
            "summary": "something broke",
            "runbook": "https://runbooks.example.com/x",
        },
        "startsAt": "2024-05-01T10:00:00Z",
        "endsAt": "0001-01-01T00:00:00Z",
        "generatorURL": "http://prometheus.example.com/graph",
        "inhibited": false,
        "silenced": silenced_by,
    })
}

/// Alert in the 0.4 shape with a bare silenced counter.
#[must_use]
pub fn legacy_alert(pairs: &[(&str, &str)], silenced: u64) -> Value {
    json!({
        "labels": labels(pairs),
        "annotations": { "summary": "something broke" },
        "startsAt": "2024-05-01T10:00:00Z",
        "endsAt": "0001-01-01T00:00:00Z",
        "generatorURL": "http://prometheus.example.com/graph",
        "inhibited": false,
        "silenced": silenced,
    })
}

/// Group in the 0.4 shape with a single block.
#[must_use]
pub fn legacy_group(pairs: &[(&str, &str)], alerts: Vec<Value>) -> Value {
    json!({
        "labels": labels(pairs),
        "blocks": [{ "alerts": alerts }],
    })
}

/// Group in the 0.5+ shape routed to `receiver`.
#[must_use]
pub fn group(pairs: &[(&str, &str)], receiver: &str, alerts: Vec<Value>) -> Value {
    json!({
        "labels": labels(pairs),
        "receiver": receiver,
        "blocks": [{ "alerts": alerts, "routeOpts": { "receiver": receiver } }],
    })
}

/// Silence in the 0.5+ shape ending `ends_in` from now.
#[must_use]
pub fn silence(id: &str, ends_in: Duration, comment: &str) -> Value {
    json!({
        "id": id,
        "matchers": [{ "name": "alertname", "value": "Down", "isRegex": false }],
        "startsAt": timestamp(-Duration::days(3)),
        "endsAt": timestamp(ends_in),
        "createdAt": timestamp(-Duration::days(3)),
        "createdBy": "oncall@example.com",
        "comment": comment,
    })
}

/// Silence in the 0.4 shape with a numeric ID.
#[must_use]
pub fn legacy_silence(id: u64, ends_in: Duration, comment: &str) -> Value {
    let mut value = silence("", ends_in, comment);
    value["id"] = json!(id);
    value
}
