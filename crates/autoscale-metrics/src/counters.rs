//! `AtomicCounters` — lock-free tallies for admission/success/failure
//! counts, plus a mutex-protected histogram for scaling duration (4.I).

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;

use tracing::debug;

use autoscale_core::ports::Counters;
use autoscale_core::types::DenialReason;

#[derive(Default)]
struct DenialCounts {
    max_size: AtomicU64,
    current_size: AtomicU64,
    in_progress: AtomicU64,
    within_cooldown: AtomicU64,
}

impl DenialCounts {
    fn bump(&self, reason: DenialReason) {
        let counter = match reason {
            DenialReason::MaxSize => &self.max_size,
            DenialReason::CurrentSize => &self.current_size,
            DenialReason::InProgress => &self.in_progress,
            DenialReason::WithinCooldown => &self.within_cooldown,
        };
        counter.fetch_add(1, Ordering::Relaxed);
    }
}

/// Snapshot of all counters at a point in time, for rendering (e.g. to
/// Prometheus text exposition).
#[derive(Debug, Clone, Copy, Default)]
pub struct CountersSnapshot {
    pub requests_success: u64,
    pub requests_failed: u64,
    pub scaling_success: u64,
    pub scaling_failed: u64,
    pub denied_max_size: u64,
    pub denied_current_size: u64,
    pub denied_in_progress: u64,
    pub denied_within_cooldown: u64,
    pub scaling_duration_count: u64,
    pub scaling_duration_sum_ms: u64,
}

/// Atomics-per-bucket counters facade (4.I). `scaling_duration` samples
/// accumulate in a `Mutex<Vec<u64>>`; everything else is a plain
/// `AtomicU64`.
#[derive(Default)]
pub struct AtomicCounters {
    requests_success: AtomicU64,
    requests_failed: AtomicU64,
    scaling_success: AtomicU64,
    scaling_failed: AtomicU64,
    denied: DenialCounts,
    durations: Mutex<Vec<u64>>,
}

impl AtomicCounters {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn snapshot(&self) -> CountersSnapshot {
        let durations = self.durations.lock().unwrap();
        CountersSnapshot {
            requests_success: self.requests_success.load(Ordering::Relaxed),
            requests_failed: self.requests_failed.load(Ordering::Relaxed),
            scaling_success: self.scaling_success.load(Ordering::Relaxed),
            scaling_failed: self.scaling_failed.load(Ordering::Relaxed),
            denied_max_size: self.denied.max_size.load(Ordering::Relaxed),
            denied_current_size: self.denied.current_size.load(Ordering::Relaxed),
            denied_in_progress: self.denied.in_progress.load(Ordering::Relaxed),
            denied_within_cooldown: self.denied.within_cooldown.load(Ordering::Relaxed),
            scaling_duration_count: durations.len() as u64,
            scaling_duration_sum_ms: durations.iter().sum(),
        }
    }
}

impl Counters for AtomicCounters {
    fn requests_success(&self) {
        self.requests_success.fetch_add(1, Ordering::Relaxed);
    }

    fn requests_failed(&self) {
        self.requests_failed.fetch_add(1, Ordering::Relaxed);
    }

    fn scaling_success(&self) {
        self.scaling_success.fetch_add(1, Ordering::Relaxed);
    }

    fn scaling_failed(&self) {
        self.scaling_failed.fetch_add(1, Ordering::Relaxed);
    }

    fn scaling_denied(&self, reason: DenialReason) {
        self.denied.bump(reason);
    }

    fn scaling_duration(&self, method: &str, previous_size: i64, requested_size: i64, duration_ms: u64) {
        self.durations.lock().unwrap().push(duration_ms);
        debug!(method, previous_size, requested_size, duration_ms, "scaling duration recorded");
    }

    fn flush(&self) {
        // No external metrics timeseries store is in scope; this is
        // the hook point where a push-gateway client would go.
        debug!("counters flush (no-op)");
    }
}
