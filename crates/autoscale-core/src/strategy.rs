//! Sizing strategies (4.B) and the registry that resolves them by name
//! (4.A).

use std::collections::HashMap;
use std::sync::Arc;

use crate::types::InstanceSnapshot;

/// Name of the strategy substituted whenever the requested one is
/// unknown (4.A).
pub const DEFAULT_METHOD: &str = "STEPWISE";

/// A pure mapping from a snapshot to a suggested capacity (§3:
/// "SizingStrategy"). Implementations MUST clamp their result to
/// `[min_size, max_size]` (4.B).
///
/// `suggest` is the primary operation; a strategy that only implements
/// the legacy operation below leaves it at the default `None`, and the
/// orchestrator falls back to `suggest_legacy` with a deprecation
/// warning (§3, §4.B, §9). A strategy that implements neither has "no
/// usable sizing operation" (§7.2).
pub trait SizingStrategy: Send + Sync {
    fn suggest(&self, _snapshot: &InstanceSnapshot) -> Option<i64> {
        None
    }

    /// Legacy sizing operation (§3/§9), consulted only when `suggest`
    /// returns `None`.
    fn suggest_legacy(&self, _snapshot: &InstanceSnapshot) -> Option<i64> {
        None
    }
}

fn clamp(value: i64, snapshot: &InstanceSnapshot) -> i64 {
    value.clamp(snapshot.min_size, snapshot.max_size)
}

/// Moves one fixed step toward the metric-implied target. The default
/// strategy (4.A fallback).
pub struct Stepwise {
    pub step: i64,
}

impl Default for Stepwise {
    fn default() -> Self {
        Self { step: 1 }
    }
}

impl SizingStrategy for Stepwise {
    fn suggest(&self, snapshot: &InstanceSnapshot) -> Option<i64> {
        let Some(metric) = snapshot.metrics.first() else {
            return Some(clamp(snapshot.current_size, snapshot));
        };
        let target = if metric.value > metric.threshold + metric.margin {
            snapshot.current_size + self.step
        } else if metric.value < metric.threshold - metric.margin {
            snapshot.current_size - self.step
        } else {
            snapshot.current_size
        };
        Some(clamp(target, snapshot))
    }
}

/// Scales proportionally to the ratio of the leading metric's value to
/// its threshold, the same `desired = current * (value / threshold)`
/// shape used throughout ratio-based autoscalers.
pub struct Linear;

impl SizingStrategy for Linear {
    fn suggest(&self, snapshot: &InstanceSnapshot) -> Option<i64> {
        let Some(metric) = snapshot.metrics.first() else {
            return Some(clamp(snapshot.current_size, snapshot));
        };
        if metric.threshold <= 0.0 {
            return Some(clamp(snapshot.current_size, snapshot));
        }
        let ratio = metric.value / metric.threshold;
        let desired = (snapshot.current_size as f64 * ratio).ceil() as i64;
        Some(clamp(desired, snapshot))
    }
}

/// Reads the suggested size straight off a metric named `target_size`.
pub struct Direct;

impl SizingStrategy for Direct {
    fn suggest(&self, snapshot: &InstanceSnapshot) -> Option<i64> {
        match snapshot.find_metric("target_size") {
            Some(metric) => Some(clamp(metric.value.round() as i64, snapshot)),
            None => Some(clamp(snapshot.current_size, snapshot)),
        }
    }
}

/// Strips characters that would let a strategy name escape the
/// registry namespace, then lowercases (4.A).
fn normalize_name(name: &str) -> String {
    name.chars()
        .filter(|c| c.is_ascii_alphanumeric() || *c == '_' || *c == '-')
        .collect::<String>()
        .to_lowercase()
}

/// Holds named sizing strategies; resolves by name with fallback to
/// the default (4.A). Built once at startup and never mutated — the
/// registry is read-mostly, so a plain `HashMap` is enough.
pub struct Registry {
    strategies: HashMap<String, Arc<dyn SizingStrategy>>,
}

impl Registry {
    pub fn new() -> Self {
        let mut strategies: HashMap<String, Arc<dyn SizingStrategy>> = HashMap::new();
        strategies.insert(
            normalize_name(DEFAULT_METHOD),
            Arc::new(Stepwise::default()),
        );
        strategies.insert("linear".to_string(), Arc::new(Linear));
        strategies.insert("direct".to_string(), Arc::new(Direct));
        Self { strategies }
    }

    pub fn register(&mut self, name: &str, strategy: Arc<dyn SizingStrategy>) {
        self.strategies.insert(normalize_name(name), strategy);
    }

    /// Resolve a strategy by name. On miss: logs a warning, substitutes
    /// the default, and returns the name that was actually resolved so
    /// the caller can rewrite the snapshot's `scaling_method` (4.A).
    pub fn resolve(&self, requested_name: &str) -> (Arc<dyn SizingStrategy>, String) {
        let normalized = normalize_name(requested_name);
        match self.strategies.get(&normalized) {
            Some(strategy) => (strategy.clone(), normalized),
            None => {
                tracing::warn!(
                    requested = requested_name,
                    default = DEFAULT_METHOD,
                    "unknown scaling method, falling back to default"
                );
                let default = self
                    .strategies
                    .get(&normalize_name(DEFAULT_METHOD))
                    .expect("default strategy is always registered")
                    .clone();
                (default, DEFAULT_METHOD.to_string())
            }
        }
    }
}

impl Default for Registry {
    fn default() -> Self {
        Self::new()
    }
}
