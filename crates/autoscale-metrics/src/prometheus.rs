//! Prometheus text exposition for `CountersSnapshot` (4.I).

use crate::counters::CountersSnapshot;

/// Render a counters snapshot into the Prometheus text exposition format.
pub fn render(snapshot: &CountersSnapshot) -> String {
    let mut out = String::new();

    out.push_str("# HELP autoscaler_requests_total Ticks processed, by outcome.\n");
    out.push_str("# TYPE autoscaler_requests_total counter\n");
    out.push_str(&format!(
        "autoscaler_requests_total{{outcome=\"success\"}} {}\n",
        snapshot.requests_success
    ));
    out.push_str(&format!(
        "autoscaler_requests_total{{outcome=\"failed\"}} {}\n",
        snapshot.requests_failed
    ));

    out.push_str("# HELP autoscaler_scaling_total Resize attempts, by outcome.\n");
    out.push_str("# TYPE autoscaler_scaling_total counter\n");
    out.push_str(&format!(
        "autoscaler_scaling_total{{outcome=\"success\"}} {}\n",
        snapshot.scaling_success
    ));
    out.push_str(&format!(
        "autoscaler_scaling_total{{outcome=\"failed\"}} {}\n",
        snapshot.scaling_failed
    ));

    out.push_str("# HELP autoscaler_scaling_denied_total Ticks that declined to resize, by reason.\n");
    out.push_str("# TYPE autoscaler_scaling_denied_total counter\n");
    out.push_str(&format!(
        "autoscaler_scaling_denied_total{{reason=\"MAX_SIZE\"}} {}\n",
        snapshot.denied_max_size
    ));
    out.push_str(&format!(
        "autoscaler_scaling_denied_total{{reason=\"CURRENT_SIZE\"}} {}\n",
        snapshot.denied_current_size
    ));
    out.push_str(&format!(
        "autoscaler_scaling_denied_total{{reason=\"IN_PROGRESS\"}} {}\n",
        snapshot.denied_in_progress
    ));
    out.push_str(&format!(
        "autoscaler_scaling_denied_total{{reason=\"WITHIN_COOLDOWN\"}} {}\n",
        snapshot.denied_within_cooldown
    ));

    out.push_str("# HELP autoscaler_scaling_duration_ms_count Resize durations observed.\n");
    out.push_str("# TYPE autoscaler_scaling_duration_ms_count counter\n");
    out.push_str(&format!(
        "autoscaler_scaling_duration_ms_count {}\n",
        snapshot.scaling_duration_count
    ));
    out.push_str("# HELP autoscaler_scaling_duration_ms_sum Sum of resize durations in milliseconds.\n");
    out.push_str("# TYPE autoscaler_scaling_duration_ms_sum counter\n");
    out.push_str(&format!(
        "autoscaler_scaling_duration_ms_sum {}\n",
        snapshot.scaling_duration_sum_ms
    ));

    out
}
