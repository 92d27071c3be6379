//! Operation Tracker (4.E) — reconciles an in-flight long-running
//! resize operation against the persisted state.

use crate::ports::{Counters, OperationStatusClient};
use crate::types::{Fulfillment, InstanceSnapshot, OperationStatusPayload, PersistedState, Units};

/// Reconcile `state`'s in-flight operation (if any) against the remote
/// status API. Returns the possibly-mutated state and, when the
/// operation is still running, its fulfillment classification.
///
/// Pure apart from the injected `client`/`counters` side effects —
/// callers are responsible for persisting the returned state (the
/// orchestrator does this immediately after calling `reconcile`, so the
/// "tracker persists before returning" contract in §4.E holds at the
/// call site).
pub async fn reconcile(
    client: &dyn OperationStatusClient,
    state: PersistedState,
    snapshot: &InstanceSnapshot,
    now_ms: i64,
    counters: &dyn Counters,
) -> (PersistedState, Option<Fulfillment>) {
    let Some(operation_id) = state.scaling_operation_id.clone() else {
        return (state, None);
    };

    match client.get_status(snapshot, &operation_id).await {
        Ok(payload) => apply_payload(state, snapshot, now_ms, counters, payload),
        Err(err) => {
            tracing::warn!(
                instance = %snapshot.key(),
                operation_id,
                error = %err,
                "status API unreachable, treating operation as completed by fallback"
            );
            (fallback_complete(state, now_ms, counters), None)
        }
    }
}

fn apply_payload(
    state: PersistedState,
    snapshot: &InstanceSnapshot,
    now_ms: i64,
    counters: &dyn Counters,
    payload: OperationStatusPayload,
) -> (PersistedState, Option<Fulfillment>) {
    if !payload.done {
        let mut state = state;
        backfill_requested_size(&mut state, snapshot, &payload);
        let fulfillment = payload.fulfillment.unwrap_or(Fulfillment::Unspecified);
        return (state, Some(fulfillment));
    }

    if let Some(error) = payload.error {
        tracing::warn!(
            instance = %snapshot.key(),
            error,
            "resize operation failed"
        );
        counters.scaling_failed();
        return (
            PersistedState {
                scaling_operation_id: None,
                last_scaling_timestamp: 0,
                last_scaling_complete_timestamp: None,
                scaling_method: None,
                scaling_previous_size: None,
                scaling_requested_size: None,
            },
            None,
        );
    }

    // Success.
    let complete_at = match payload.end_time {
        Some(end_time) => end_time,
        None => {
            tracing::warn!(
                instance = %snapshot.key(),
                "operation end time missing, falling back to start time"
            );
            state.last_scaling_timestamp
        }
    };
    record_success(&state, snapshot, complete_at, counters);

    (
        PersistedState {
            scaling_operation_id: None,
            last_scaling_timestamp: state.last_scaling_timestamp,
            last_scaling_complete_timestamp: Some(complete_at),
            scaling_method: None,
            scaling_previous_size: None,
            scaling_requested_size: None,
        },
        None,
    )
}

/// Status-API-error policy (§4.E, §9): treat as success-by-fallback so
/// the autoscaler never wedges on its inability to read status. The
/// authoritative resize service eventually reconciles the resize on
/// its own.
fn fallback_complete(state: PersistedState, _now_ms: i64, counters: &dyn Counters) -> PersistedState {
    let complete_at = state.last_scaling_timestamp;
    counters.scaling_duration(
        state.scaling_method.as_deref().unwrap_or(""),
        state.scaling_previous_size.unwrap_or(0),
        state.scaling_requested_size.unwrap_or(0),
        (complete_at - state.last_scaling_timestamp).max(0) as u64,
    );
    counters.scaling_success();
    PersistedState {
        scaling_operation_id: None,
        last_scaling_timestamp: state.last_scaling_timestamp,
        last_scaling_complete_timestamp: Some(complete_at),
        scaling_method: None,
        scaling_previous_size: None,
        scaling_requested_size: None,
    }
}

fn record_success(
    state: &PersistedState,
    snapshot: &InstanceSnapshot,
    complete_at: i64,
    counters: &dyn Counters,
) {
    let duration_ms = (complete_at - state.last_scaling_timestamp).max(0) as u64;
    counters.scaling_duration(
        state
            .scaling_method
            .as_deref()
            .unwrap_or(snapshot.scaling_method.as_str()),
        state.scaling_previous_size.unwrap_or(snapshot.current_size),
        state.scaling_requested_size.unwrap_or(snapshot.current_size),
        duration_ms,
    );
    counters.scaling_success();
}

/// Populate `scaling_requested_size` from operation metadata (or, as a
/// last resort, the snapshot's current size) when it was never
/// recorded — compatibility with state records written by earlier
/// versions (§4.E).
fn backfill_requested_size(
    state: &mut PersistedState,
    snapshot: &InstanceSnapshot,
    payload: &OperationStatusPayload,
) {
    if state.scaling_requested_size.is_some() {
        return;
    }
    let from_metadata = match snapshot.units {
        Units::Nodes => payload.node_count,
        Units::ProcessingUnits => payload.processing_units,
    };
    state.scaling_requested_size = Some(from_metadata.unwrap_or(snapshot.current_size));
}
