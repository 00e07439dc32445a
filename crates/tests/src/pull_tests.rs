//! Successful pull cycles across schema generations.

use crate::mock_infrastructure::{fixtures, AlertmanagerMockBuilder};
use alertdeck_core::{models::AlertState, upstream::HttpClient, Poller};
use chrono::Duration;
use std::sync::Arc;

#[tokio::test]
async fn test_legacy_cycle_stringifies_silence_ids() {
    let mut mock = AlertmanagerMockBuilder::new().await;
    mock.mock_status("0.4.2").await;
    mock.mock_silences_v04(vec![fixtures::legacy_silence(42, Duration::days(1), "disk swap")])
        .await;
    mock.mock_alerts(vec![fixtures::legacy_group(
        &[("alertname", "Down")],
        vec![
            fixtures::legacy_alert(&[("alertname", "Down"), ("instance", "a")], 1),
            fixtures::legacy_alert(&[("alertname", "Down"), ("instance", "b")], 0),
        ],
    )])
    .await;

    let poller = mock.poller("legacy");
    poller.pull().await.unwrap();

    let snapshot = poller.store().snapshot();
    assert!(snapshot.error.is_empty());
    assert_eq!(snapshot.version.as_deref(), Some("0.4.2"));

    let silence = poller.store().silence_by_id("42").unwrap();
    assert_eq!(silence.comment, "disk swap");

    assert_eq!(snapshot.alert_groups.len(), 1);
    let group = &snapshot.alert_groups[0];
    assert_eq!(group.alerts.len(), 2);
    assert_eq!(group.silenced_count, 1);
    assert_eq!(group.unsilenced_count, 1);

    let silenced = group.alerts.iter().find(|a| a.labels["instance"] == "a").unwrap();
    assert_eq!(silenced.legacy_silenced_count, Some(1));
    assert!(silenced.silenced_by.is_empty());
    assert_eq!(silenced.state, AlertState::Suppressed);
    // A bare counter cannot be resolved to a silence.
    assert!(silenced.alertmanager[0].silences.is_empty());

    let firing = group.alerts.iter().find(|a| a.labels["instance"] == "b").unwrap();
    assert_eq!(firing.legacy_silenced_count, None);
    assert_eq!(firing.state, AlertState::Active);
}

#[tokio::test]
async fn test_cycle_drops_expired_silences_next_to_live_ones() {
    let mut mock = AlertmanagerMockBuilder::new().await;
    mock.mock_status("0.5.1").await;
    mock.mock_silences_v05(vec![
        fixtures::silence("expired", -Duration::hours(1), ""),
        fixtures::silence("live", Duration::days(1), ""),
        fixtures::silence("old", -Duration::hours(2), ""),
    ])
    .await;
    mock.mock_alerts(vec![fixtures::group(
        &[("alertname", "Down")],
        "team-a",
        vec![
            fixtures::alert(
                &[("alertname", "Down"), ("instance", "a")],
                &["expired", "live", "missing"],
            ),
            fixtures::alert(&[("alertname", "Down"), ("instance", "b")], &["old"]),
        ],
    )])
    .await;

    let poller = mock.poller("am1");
    poller.pull().await.unwrap();

    let snapshot = poller.store().snapshot();
    assert_eq!(snapshot.silences.len(), 3);

    let group = &snapshot.alert_groups[0];
    let a = group.alerts.iter().find(|a| a.labels["instance"] == "a").unwrap();
    let attached: Vec<&String> = a.alertmanager[0].silences.keys().collect();
    assert_eq!(attached, vec!["live"]);
    assert_eq!(a.receiver.as_deref(), Some("team-a"));

    // A lone expired silence stays attached.
    let b = group.alerts.iter().find(|a| a.labels["instance"] == "b").unwrap();
    assert!(b.alertmanager[0].silences.contains_key("old"));

    assert_eq!(a.alertmanager[0].name, "am1");
    assert_eq!(a.alertmanager[0].uri, mock.url());
}

#[tokio::test]
async fn test_missing_version_uses_newest_schema() {
    let mut mock = AlertmanagerMockBuilder::new().await;
    mock.mock_status_without_version().await;
    mock.mock_silences_v05(vec![fixtures::silence("s1", Duration::days(1), "")]).await;
    mock.mock_alerts(vec![fixtures::group(
        &[("alertname", "Down")],
        "team-a",
        vec![fixtures::alert(&[("alertname", "Down")], &["s1"])],
    )])
    .await;

    let poller = mock.poller("unknown");
    poller.pull().await.unwrap();

    let snapshot = poller.store().snapshot();
    assert_eq!(snapshot.version.as_deref(), Some("999.0.0"));
    assert!(snapshot.silences.contains_key("s1"));
    assert_eq!(snapshot.alert_groups[0].alerts[0].silenced_by, vec!["s1".to_string()]);
}

#[tokio::test]
async fn test_failed_probe_still_pulls() {
    let mut mock = AlertmanagerMockBuilder::new().await;
    mock.mock_http_error("/api/v1/status", 404).await;
    mock.mock_silences_v05(vec![]).await;
    mock.mock_alerts(vec![]).await;

    let poller = mock.poller("no-status");
    poller.pull().await.unwrap();

    let snapshot = poller.store().snapshot();
    assert!(snapshot.error.is_empty());
    assert_eq!(snapshot.version.as_deref(), Some("999.0.0"));
    assert!(snapshot.alert_groups.is_empty());
}

#[tokio::test]
async fn test_prerelease_uses_legacy_schema() {
    let mut mock = AlertmanagerMockBuilder::new().await;
    mock.mock_status("0.5.0-rc.0").await;
    mock.mock_silences_v04(vec![fixtures::legacy_silence(7, Duration::days(1), "")]).await;
    mock.mock_alerts(vec![]).await;

    let poller = mock.poller("rc");
    poller.pull().await.unwrap();

    assert!(poller.store().silence_by_id("7").is_ok());
}

#[tokio::test]
async fn test_duplicate_groups_are_merged() {
    let mut mock = AlertmanagerMockBuilder::new().await;
    mock.mock_status("0.5.0").await;
    mock.mock_silences_v05(vec![]).await;
    let alert = fixtures::alert(&[("alertname", "Down"), ("instance", "a")], &[]);
    mock.mock_alerts(vec![
        fixtures::group(&[("alertname", "Down")], "team-a", vec![alert.clone()]),
        fixtures::group(&[("alertname", "Up")], "team-a", vec![]),
        fixtures::group(
            &[("alertname", "Down")],
            "team-b",
            vec![alert, fixtures::alert(&[("alertname", "Down"), ("instance", "b")], &[])],
        ),
    ])
    .await;

    let poller = mock.poller("dups");
    poller.pull().await.unwrap();

    let groups = poller.store().alerts();
    assert_eq!(groups.len(), 2);
    assert_eq!(groups[0].labels["alertname"], "Down");
    assert_eq!(groups[0].receiver.as_deref(), Some("team-a"));
    assert_eq!(groups[0].alerts.len(), 2);
    assert!(groups[0].alerts.iter().all(|a| !a.fingerprint.is_empty()));
    assert_eq!(groups[1].labels["alertname"], "Up");
}

#[tokio::test]
async fn test_proxied_instance_reports_public_uri() {
    let mut mock = AlertmanagerMockBuilder::new().await;
    mock.mock_status("0.5.0").await;
    mock.mock_silences_v05(vec![]).await;
    mock.mock_alerts(vec![fixtures::group(
        &[("alertname", "Down")],
        "team-a",
        vec![fixtures::alert(&[("alertname", "Down")], &[])],
    )])
    .await;

    let client = Arc::new(HttpClient::new().unwrap());
    let poller = Poller::new(mock.instance("eu").with_proxy("/alertdeck/"), client);
    poller.pull().await.unwrap();

    let groups = poller.store().alerts();
    assert_eq!(groups[0].alerts[0].alertmanager[0].uri, "/alertdeck/proxy/alertmanager/eu");
}

#[tokio::test]
async fn test_new_cycle_replaces_previous_snapshot() {
    let mut mock = AlertmanagerMockBuilder::new().await;
    mock.mock_status("0.5.0").await;
    mock.mock_silences_v05(vec![fixtures::silence("s1", Duration::days(1), "")]).await;
    mock.mock_alerts(vec![
        fixtures::group(
            &[("alertname", "A")],
            "r",
            vec![fixtures::alert(&[("alertname", "A")], &[])],
        ),
        fixtures::group(
            &[("alertname", "B")],
            "r",
            vec![fixtures::alert(&[("alertname", "B")], &[])],
        ),
    ])
    .await;

    let poller = mock.poller("am");
    poller.pull().await.unwrap();
    let first = poller.store().snapshot();
    assert_eq!(first.alert_groups.len(), 2);

    mock.reset();
    mock.mock_status("0.5.0").await;
    mock.mock_silences_v05(vec![]).await;
    mock.mock_alerts(vec![fixtures::group(
        &[("alertname", "B")],
        "r",
        vec![fixtures::alert(&[("alertname", "B")], &[])],
    )])
    .await;

    poller.pull().await.unwrap();
    let second = poller.store().snapshot();
    assert_eq!(second.alert_groups.len(), 1);
    assert!(second.silences.is_empty());
    assert!(poller.store().silence_by_id("s1").is_err());

    // Readers holding the old snapshot keep a consistent view.
    assert_eq!(first.alert_groups.len(), 2);
    assert!(first.silences.contains_key("s1"));
}
