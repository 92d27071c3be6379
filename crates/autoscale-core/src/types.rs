//! Domain types for the autoscaler core.
//!
//! These mirror the wire schema in the specification: an
//! `InstanceSnapshot` arrives once per tick, a `PersistedState` is read
//! and written once per tick, and an `OperationOutcome` is produced by
//! reconciling an in-flight long-running operation.

use serde::{Deserialize, Serialize};

/// Capacity unit for a database instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Units {
    Nodes,
    ProcessingUnits,
}

/// One observed metric at tick time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricSample {
    pub name: String,
    pub value: f64,
    pub threshold: f64,
    #[serde(default)]
    pub margin: f64,
}

/// The per-tick immutable observation of one instance.
///
/// Snapshot is immutable within a tick; the orchestrator may rewrite
/// `scaling_method` to the default name when the requested strategy is
/// unknown (4.A).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InstanceSnapshot {
    pub project_id: String,
    pub instance_id: String,
    pub units: Units,
    pub current_size: i64,
    pub min_size: i64,
    pub max_size: i64,
    pub scale_out_cooling_minutes: u32,
    pub scale_in_cooling_minutes: u32,
    #[serde(default)]
    pub overload_cooling_minutes: Option<u32>,
    #[serde(default)]
    pub is_overloaded: bool,
    pub scaling_method: String,
    #[serde(default)]
    pub downstream_topic: Option<String>,
    #[serde(default)]
    pub metrics: Vec<MetricSample>,
    /// Names the `StateStore` backend a `StateStoreFactory` should
    /// construct for this tick (4.C: "constructed per tick via a
    /// factory that inspects the snapshot").
    #[serde(default = "default_store_backend")]
    pub store_backend: String,
    #[serde(default)]
    pub store_location: String,
    /// Base URL the `ResizeClient`/`OperationStatusClient` adapters
    /// should target for this instance's resize API.
    #[serde(default)]
    pub resize_endpoint: Option<String>,
}

fn default_store_backend() -> String {
    "memory".to_string()
}

impl InstanceSnapshot {
    pub fn key(&self) -> String {
        format!("{}/{}", self.project_id, self.instance_id)
    }

    pub fn find_metric(&self, name: &str) -> Option<&MetricSample> {
        self.metrics.iter().find(|m| m.name == name)
    }
}

/// One durable record per `(project, instance)`, tracking the lifecycle
/// of a resize: idle -> requested/in-progress -> completed/failed.
///
/// Invariants (I1-I3 in the specification):
/// - `scaling_operation_id == None` implies `scaling_method`,
///   `scaling_previous_size`, and `scaling_requested_size` are all `None`.
/// - When `scaling_operation_id` is `Some`, `last_scaling_timestamp > 0`
///   and `last_scaling_complete_timestamp` is `None`.
/// - `last_scaling_complete_timestamp >= last_scaling_timestamp` whenever
///   both are non-zero.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PersistedState {
    pub scaling_operation_id: Option<String>,
    pub last_scaling_timestamp: i64,
    pub last_scaling_complete_timestamp: Option<i64>,
    pub scaling_method: Option<String>,
    pub scaling_previous_size: Option<i64>,
    pub scaling_requested_size: Option<i64>,
}

impl PersistedState {
    /// The record returned when no state exists yet for an instance
    /// (4.C: `get() -> PersistedState` never fails on a missing key).
    pub fn idle() -> Self {
        Self {
            scaling_operation_id: None,
            last_scaling_timestamp: 0,
            last_scaling_complete_timestamp: None,
            scaling_method: None,
            scaling_previous_size: None,
            scaling_requested_size: None,
        }
    }

    pub fn is_in_flight(&self) -> bool {
        self.scaling_operation_id.is_some()
    }

    /// The timestamp the cooldown evaluator measures from: the last
    /// completion if known, otherwise the last attempt (4.F).
    pub fn cooldown_reference(&self) -> i64 {
        self.last_scaling_complete_timestamp
            .unwrap_or(self.last_scaling_timestamp)
    }

    /// Debug-only invariant check, never run on the hot path. Used in
    /// tests and behind `debug_assert!` at state-mutation points.
    #[cfg(any(test, debug_assertions))]
    pub fn check_invariants(&self) -> Result<(), String> {
        if self.scaling_operation_id.is_none()
            && (self.scaling_method.is_some()
                || self.scaling_previous_size.is_some()
                || self.scaling_requested_size.is_some())
        {
            return Err("idle state carries in-flight metadata".into());
        }
        if self.scaling_operation_id.is_some() {
            if self.last_scaling_timestamp <= 0 {
                return Err("in-flight state has no start timestamp".into());
            }
            if self.last_scaling_complete_timestamp.is_some() {
                return Err("in-flight state has a completion timestamp".into());
            }
        }
        if let Some(complete) = self.last_scaling_complete_timestamp
            && self.last_scaling_timestamp != 0
            && complete < self.last_scaling_timestamp
        {
            return Err("completion precedes start".into());
        }
        Ok(())
    }
}

/// Result of polling the long-running resize operation (4.E / §3).
#[derive(Debug, Clone, PartialEq)]
pub enum OperationOutcome {
    InProgress { fulfillment: Fulfillment },
    Succeeded { start_time: i64, end_time: Option<i64> },
    Failed { error: String },
    Unknown,
}

/// The service's advertised completion window for a resize.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Fulfillment {
    Normal,
    Extended,
    #[default]
    Unspecified,
}

/// The closed enumeration of reasons a tick may decline to resize (4.G).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DenialReason {
    MaxSize,
    CurrentSize,
    InProgress,
    WithinCooldown,
}

/// An opaque handle to a submitted resize operation (4.D).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OperationHandle {
    pub operation_id: String,
}

/// Metadata the status API reports alongside `{done, error?}` (§6).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OperationStatusPayload {
    pub done: bool,
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub start_time: Option<i64>,
    #[serde(default)]
    pub end_time: Option<i64>,
    #[serde(default)]
    pub fulfillment: Option<Fulfillment>,
    #[serde(default)]
    pub node_count: Option<i64>,
    #[serde(default)]
    pub processing_units: Option<i64>,
}

/// Outcome of a single `Orchestrator::tick` call, returned to ingress
/// adapters so they can render a response without re-reading the store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum TickOutcome {
    Denied {
        reason: DenialReason,
    },
    ResizeStarted {
        operation_id: String,
        previous_size: i64,
        requested_size: i64,
    },
    ResizeFailed {
        error: String,
    },
}

