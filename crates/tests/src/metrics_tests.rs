//! Pull metrics rendered through a Prometheus recorder.
//!
//! The recorder is installed thread-locally and the cycles run on a
//! current-thread runtime, so tests do not share global metric state.

use crate::mock_infrastructure::{
    alertmanager_mock::SILENCES_PATH, fixtures, AlertmanagerMockBuilder,
};
use chrono::Duration;
use metrics_exporter_prometheus::PrometheusBuilder;
use std::future::Future;

/// Runs `cycle` with a local recorder and returns the rendered exposition.
fn render_after<F: Future<Output = ()>>(cycle: impl FnOnce() -> F) -> String {
    let recorder = PrometheusBuilder::new().build_recorder();
    let handle = recorder.handle();
    let runtime = tokio::runtime::Builder::new_current_thread().enable_all().build().unwrap();

    metrics::with_local_recorder(&recorder, || runtime.block_on(cycle()));
    handle.render()
}

/// Value of the sample named `name` carrying every label in `labels`.
fn sample(rendered: &str, name: &str, labels: &[(&str, &str)]) -> Option<f64> {
    let (with_labels, bare) = (format!("{name}{{"), format!("{name} "));
    rendered
        .lines()
        .filter(|line| line.starts_with(&with_labels) || line.starts_with(&bare))
        .find(|line| labels.iter().all(|(k, v)| line.contains(&format!("{k}=\"{v}\""))))
        .and_then(|line| line.rsplit(' ').next())
        .and_then(|value| value.parse().ok())
}

async fn stage_healthy(mock: &mut AlertmanagerMockBuilder) {
    mock.mock_status("0.5.0").await;
    mock.mock_silences_v05(vec![fixtures::silence("s1", Duration::days(1), "")]).await;
    mock.mock_alerts(vec![fixtures::group(
        &[("alertname", "Down")],
        "team-a",
        vec![fixtures::alert(&[("alertname", "Down")], &["s1"])],
    )])
    .await;
}

#[test]
fn test_successful_pull_sets_size_gauges() {
    let rendered = render_after(|| async {
        let mut mock = AlertmanagerMockBuilder::new().await;
        stage_healthy(&mut mock).await;
        mock.poller("am").pull().await.unwrap();
    });

    let instance = [("instance", "am")];
    assert_eq!(sample(&rendered, "alertdeck_pull_cycles_total", &instance), Some(1.0));
    assert_eq!(sample(&rendered, "alertdeck_alert_groups", &instance), Some(1.0));
    assert_eq!(sample(&rendered, "alertdeck_silences", &instance), Some(1.0));
    assert_eq!(sample(&rendered, "alertdeck_pull_errors_total", &instance), None);
}

#[test]
fn test_failed_silence_fetch_records_error_and_zeroes_gauges() {
    let rendered = render_after(|| async {
        let mut mock = AlertmanagerMockBuilder::new().await;
        stage_healthy(&mut mock).await;
        let poller = mock.poller("am");
        poller.pull().await.unwrap();

        mock.reset();
        mock.mock_status("0.5.0").await;
        mock.mock_error_envelope(SILENCES_PATH, "storage unavailable").await;
        poller.pull().await.unwrap_err();
    });

    let instance = [("instance", "am")];
    assert_eq!(sample(&rendered, "alertdeck_pull_cycles_total", &instance), Some(2.0));
    assert_eq!(
        sample(
            &rendered,
            "alertdeck_pull_errors_total",
            &[("instance", "am"), ("stage", "silences"), ("category", "upstream")],
        ),
        Some(1.0)
    );
    assert_eq!(sample(&rendered, "alertdeck_alert_groups", &instance), Some(0.0));
    assert_eq!(sample(&rendered, "alertdeck_silences", &instance), Some(0.0));
}

#[test]
fn test_alert_stage_failure_is_labelled() {
    let rendered = render_after(|| async {
        let mut mock = AlertmanagerMockBuilder::new().await;
        mock.mock_status("0.5.0").await;
        mock.mock_silences_v05(vec![]).await;
        mock.mock_garbage("/api/v1/alerts/groups").await;
        mock.poller("am").pull().await.unwrap_err();
    });

    assert_eq!(
        sample(
            &rendered,
            "alertdeck_pull_errors_total",
            &[("instance", "am"), ("stage", "alerts"), ("category", "decode")],
        ),
        Some(1.0)
    );
}
