//! Per-instance pull metrics.
//!
//! Recorded through the `metrics` facade. No recorder is installed here; when
//! none is installed by the embedding binary these calls are no-ops.
//!
//! | Metric | Type | Labels |
//! |--------|------|--------|
//! | `alertdeck_pull_cycles_total` | counter | `instance` |
//! | `alertdeck_pull_errors_total` | counter | `instance`, `stage`, `category` |
//! | `alertdeck_alert_groups` | gauge | `instance` |
//! | `alertdeck_silences` | gauge | `instance` |

use metrics::{counter, gauge};

use crate::upstream::ErrorCategory;

pub const PULL_CYCLES_TOTAL: &str = "alertdeck_pull_cycles_total";
pub const PULL_ERRORS_TOTAL: &str = "alertdeck_pull_errors_total";
pub const ALERT_GROUPS: &str = "alertdeck_alert_groups";
pub const SILENCES: &str = "alertdeck_silences";

pub fn record_pull_cycle(instance: &str) {
    counter!(PULL_CYCLES_TOTAL, "instance" => instance.to_string()).increment(1);
}

pub fn record_pull_error(instance: &str, stage: &'static str, category: ErrorCategory) {
    counter!(
        PULL_ERRORS_TOTAL,
        "instance" => instance.to_string(),
        "stage" => stage,
        "category" => category.as_str()
    )
    .increment(1);
}

/// Sets the size gauges after a snapshot has been published or cleared.
#[allow(clippy::cast_precision_loss)]
pub fn record_snapshot_size(instance: &str, alert_groups: usize, silences: usize) {
    gauge!(ALERT_GROUPS, "instance" => instance.to_string()).set(alert_groups as f64);
    gauge!(SILENCES, "instance" => instance.to_string()).set(silences as f64);
}
