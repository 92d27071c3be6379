//! Port traits — the external collaborators listed as out of scope in
//! the specification (§1/§6). Concrete adapters live in sibling crates
//! (`autoscale-state`, `autoscale-remote`, `autoscale-events`,
//! `autoscale-metrics`); this crate only depends on the trait objects.

use async_trait::async_trait;

use crate::error::{RemoteResult, StateResult};
use crate::types::{
    DenialReason, InstanceSnapshot, OperationHandle, OperationStatusPayload, PersistedState,
};

/// Component C — read/write of a single per-instance state record.
#[async_trait]
pub trait StateStore: Send + Sync {
    async fn get(&self, key: &str) -> StateResult<PersistedState>;
    async fn update(&self, key: &str, state: &PersistedState) -> StateResult<()>;
    /// Scoped release of any open store session. Most adapters back
    /// this with `Drop` and treat `close` as a no-op; it exists as an
    /// explicit operation because §4.C names it as one.
    async fn close(&self) -> StateResult<()>;
}

/// Resolves the `StateStore` adapter named on a snapshot (§4.C: "the
/// adapter is constructed per tick via a factory that inspects the
/// snapshot").
pub trait StateStoreFactory: Send + Sync {
    fn open(&self, snapshot: &InstanceSnapshot) -> StateResult<std::sync::Arc<dyn StateStore>>;
}

/// Component D — issues a resize request, returns an opaque operation
/// handle. No retry: failures are reported to the caller (§4.D).
#[async_trait]
pub trait ResizeClient: Send + Sync {
    async fn start(
        &self,
        snapshot: &InstanceSnapshot,
        target_size: i64,
    ) -> RemoteResult<OperationHandle>;
}

/// Component E's remote collaborator — fetches the status of a
/// long-running resize operation.
#[async_trait]
pub trait OperationStatusClient: Send + Sync {
    async fn get_status(
        &self,
        snapshot: &InstanceSnapshot,
        operation_id: &str,
    ) -> RemoteResult<OperationStatusPayload>;
}

/// Component H — publishes scaling lifecycle events. Best-effort:
/// failures are logged by the implementation and never propagated
/// (§4.H, §7.6), hence no `Result` in the signature.
#[async_trait]
pub trait DownstreamEmitter: Send + Sync {
    async fn emit(&self, event_name: &str, snapshot: &InstanceSnapshot, suggested_size: i64);
}

/// Component I — admission/success/failure tallies and a
/// scaling-duration histogram (§4.I).
pub trait Counters: Send + Sync {
    fn requests_success(&self);
    fn requests_failed(&self);
    fn scaling_success(&self);
    fn scaling_failed(&self);
    fn scaling_denied(&self, reason: DenialReason);
    fn scaling_duration(&self, method: &str, previous_size: i64, requested_size: i64, duration_ms: u64);
    /// Every tick ends with a best-effort flush (§4.I).
    fn flush(&self);
}
