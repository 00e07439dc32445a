//! Failed pull cycles: error attribution and snapshot clearing.

use crate::mock_infrastructure::{
    alertmanager_mock::{ALERTS_PATH, SILENCES_PATH},
    fixtures, AlertmanagerMockBuilder,
};
use alertdeck_core::{upstream::ErrorCategory, PullStage};
use chrono::Duration;

/// Stages a healthy 0.5 instance with one group and one silence.
async fn healthy(mock: &mut AlertmanagerMockBuilder) {
    mock.mock_status("0.5.0").await;
    mock.mock_silences_v05(vec![fixtures::silence("s1", Duration::days(1), "")]).await;
    mock.mock_alerts(vec![fixtures::group(
        &[("alertname", "Down")],
        "team-a",
        vec![fixtures::alert(&[("alertname", "Down")], &["s1"])],
    )])
    .await;
}

#[tokio::test]
async fn test_silence_failure_skips_alerts_and_clears_snapshot() {
    let mut mock = AlertmanagerMockBuilder::new().await;
    healthy(&mut mock).await;

    let poller = mock.poller("am");
    poller.pull().await.unwrap();
    assert_eq!(poller.store().alerts().len(), 1);

    mock.reset();
    mock.mock_status("0.5.0").await;
    mock.mock_error_envelope(SILENCES_PATH, "storage unavailable").await;
    let alerts = mock.mock_alerts_not_requested().await;

    let err = poller.pull().await.unwrap_err();
    assert_eq!(err.stage, PullStage::Silences);
    assert_eq!(err.category(), ErrorCategory::Upstream);
    assert_eq!(err.to_string(), "Upstream error: storage unavailable");
    alerts.assert_async().await;

    let snapshot = poller.store().snapshot();
    assert_eq!(snapshot.error, "Upstream error: storage unavailable");
    assert!(snapshot.alert_groups.is_empty());
    assert!(snapshot.silences.is_empty());
    assert!(snapshot.colors.is_empty());
    assert!(snapshot.autocomplete.is_empty());
    assert!(poller.store().silence_by_id("s1").is_err());
}

#[tokio::test]
async fn test_alert_http_error_is_transport_failure() {
    let mut mock = AlertmanagerMockBuilder::new().await;
    mock.mock_status("0.5.0").await;
    mock.mock_silences_v05(vec![fixtures::silence("s1", Duration::days(1), "")]).await;
    mock.mock_http_error(ALERTS_PATH, 500).await;

    let poller = mock.poller("am");
    let err = poller.pull().await.unwrap_err();
    assert_eq!(err.stage, PullStage::Alerts);
    assert_eq!(err.category(), ErrorCategory::Transport);

    // Silences fetched earlier in the failed cycle are not published.
    let snapshot = poller.store().snapshot();
    assert!(snapshot.silences.is_empty());
    assert_eq!(snapshot.error, err.to_string());
}

#[tokio::test]
async fn test_malformed_alerts_body_is_decode_failure() {
    let mut mock = AlertmanagerMockBuilder::new().await;
    mock.mock_status("0.5.0").await;
    mock.mock_silences_v05(vec![]).await;
    mock.mock_garbage(ALERTS_PATH).await;

    let poller = mock.poller("am");
    let err = poller.pull().await.unwrap_err();
    assert_eq!(err.stage, PullStage::Alerts);
    assert_eq!(err.category(), ErrorCategory::Decode);
    assert!(poller.store().error().starts_with("Decode error"));
}

#[tokio::test]
async fn test_unexpected_envelope_status() {
    let mut mock = AlertmanagerMockBuilder::new().await;
    mock.mock_status("0.5.0").await;
    mock.mock_silences_v05(vec![]).await;
    mock.mock_error_envelope(ALERTS_PATH, "").await;

    let poller = mock.poller("am");
    let err = poller.pull().await.unwrap_err();
    assert_eq!(err.stage, PullStage::Alerts);
    assert_eq!(err.category(), ErrorCategory::Upstream);
    assert_eq!(err.to_string(), "Upstream error: unexpected response status 'error'");
}

#[tokio::test]
async fn test_unsupported_version_requests_nothing() {
    let mut mock = AlertmanagerMockBuilder::new().await;
    mock.mock_status("0.3.0").await;
    let alerts = mock.mock_alerts_not_requested().await;

    let poller = mock.poller("ancient");
    let err = poller.pull().await.unwrap_err();
    assert_eq!(err.stage, PullStage::Silences);
    assert_eq!(err.category(), ErrorCategory::UnsupportedVersion);
    assert_eq!(err.to_string(), "Can't find silence mapper for Alertmanager 0.3.0");
    alerts.assert_async().await;

    assert_eq!(poller.store().error(), err.to_string());
}

#[tokio::test]
async fn test_recovery_after_failure() {
    let mut mock = AlertmanagerMockBuilder::new().await;
    mock.mock_status("0.5.0").await;
    mock.mock_http_error(SILENCES_PATH, 503).await;

    let poller = mock.poller("flaky");
    assert!(poller.pull().await.is_err());
    assert!(!poller.store().error().is_empty());

    mock.reset();
    healthy(&mut mock).await;

    poller.pull().await.unwrap();
    assert!(poller.store().error().is_empty());
    assert_eq!(poller.store().alerts().len(), 1);
}
