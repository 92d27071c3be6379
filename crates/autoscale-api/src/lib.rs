//! Ingress adapters (§6): `axum` HTTP router, message-bus envelope
//! decoding, and a direct in-process call for embedding/tests.
//!
//! | Method | Path | Description |
//! |---|---|---|
//! | POST | `/v1/tick` | Run one orchestrator tick for a JSON `InstanceSnapshot` |
//! | GET | `/healthz` | Liveness probe |
//! | GET | `/metrics` | Prometheus exposition |

pub mod envelope;
pub mod handlers;

use std::collections::HashMap;
use std::sync::Arc;

use axum::routing::{get, post};
use axum::Router;

use autoscale_core::error::CoreResult;
use autoscale_core::types::{InstanceSnapshot, TickOutcome};
use autoscale_core::Orchestrator;
use autoscale_metrics::AtomicCounters;

pub use envelope::{decode_envelope, EnvelopeError};

/// Per-`"{project}/{instance}"` overrides applied to an incoming
/// snapshot before it reaches the orchestrator (configured daemon-side,
/// used when an ingress adapter's payload doesn't already carry them).
#[derive(Debug, Clone, Default)]
pub struct InstanceOverride {
    pub resize_endpoint: Option<String>,
    pub downstream_topic: Option<String>,
}

/// Daemon-wide defaults merged onto every snapshot ingested through
/// this API, plus per-instance overrides keyed by `snapshot.key()`.
#[derive(Debug, Clone, Default)]
pub struct SnapshotDefaults {
    pub state_backend: Option<String>,
    pub state_location: Option<String>,
    pub instances: HashMap<String, InstanceOverride>,
}

impl SnapshotDefaults {
    /// Fills in the fields a snapshot left unset: `store_backend`/
    /// `store_location` fall back to the daemon's default backend, and
    /// `resize_endpoint`/`downstream_topic` fall back to the override
    /// registered for this instance, if any.
    pub fn apply(&self, snapshot: &mut InstanceSnapshot) {
        if let Some(backend) = &self.state_backend {
            if snapshot.store_backend == "memory" {
                snapshot.store_backend = backend.clone();
            }
        }
        if snapshot.store_location.is_empty() {
            if let Some(location) = &self.state_location {
                snapshot.store_location = location.clone();
            }
        }
        if let Some(instance) = self.instances.get(&snapshot.key()) {
            if snapshot.resize_endpoint.is_none() {
                snapshot.resize_endpoint = instance.resize_endpoint.clone();
            }
            if snapshot.downstream_topic.is_none() {
                snapshot.downstream_topic = instance.downstream_topic.clone();
            }
        }
    }
}

/// Shared state for API handlers.
#[derive(Clone)]
pub struct ApiState {
    pub orchestrator: Arc<Orchestrator>,
    pub counters: Arc<AtomicCounters>,
    pub defaults: Arc<SnapshotDefaults>,
}

/// Build the complete API router.
pub fn build_router(state: ApiState) -> Router {
    Router::new()
        .route("/v1/tick", post(handlers::tick))
        .route("/healthz", get(handlers::healthz))
        .route("/metrics", get(handlers::prometheus_metrics))
        .with_state(state)
}

/// Direct in-process call (§6c): run one tick without going through
/// HTTP, for embedding or tests.
pub async fn tick_in_process(
    orchestrator: &Orchestrator,
    snapshot: InstanceSnapshot,
    now_ms: i64,
) -> CoreResult<TickOutcome> {
    orchestrator.tick(snapshot, now_ms).await
}
