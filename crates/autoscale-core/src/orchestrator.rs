//! Scaling Orchestrator (4.G) — the top-level per-tick controller that
//! composes the registry, strategies, operation tracker, and cooldown
//! evaluator.

use std::sync::Arc;

use crate::cooldown;
use crate::error::{CoreError, CoreResult};
use crate::ports::{Counters, DownstreamEmitter, OperationStatusClient, ResizeClient, StateStoreFactory};
use crate::strategy::Registry;
use crate::tracker;
use crate::types::{DenialReason, Fulfillment, InstanceSnapshot, PersistedState, TickOutcome};

pub struct Orchestrator {
    registry: Registry,
    store_factory: Arc<dyn StateStoreFactory>,
    resize_client: Arc<dyn ResizeClient>,
    status_client: Arc<dyn OperationStatusClient>,
    emitter: Arc<dyn DownstreamEmitter>,
    counters: Arc<dyn Counters>,
}

impl Orchestrator {
    pub fn new(
        registry: Registry,
        store_factory: Arc<dyn StateStoreFactory>,
        resize_client: Arc<dyn ResizeClient>,
        status_client: Arc<dyn OperationStatusClient>,
        emitter: Arc<dyn DownstreamEmitter>,
        counters: Arc<dyn Counters>,
    ) -> Self {
        Self {
            registry,
            store_factory,
            resize_client,
            status_client,
            emitter,
            counters,
        }
    }

    /// Run one tick for a single instance snapshot (§2 "Data flow per
    /// tick", §4.G "Per-tick algorithm"). Every exit path — success,
    /// denial, or error — performs a best-effort counter flush (§4.I)
    /// before returning.
    pub async fn tick(&self, snapshot: InstanceSnapshot, now_ms: i64) -> CoreResult<TickOutcome> {
        let result = self.tick_inner(snapshot, now_ms).await;
        self.counters.flush();
        result
    }

    async fn tick_inner(&self, mut snapshot: InstanceSnapshot, now_ms: i64) -> CoreResult<TickOutcome> {
        if let Err(msg) = validate(&snapshot) {
            self.counters.requests_failed();
            return Err(CoreError::Validation(msg));
        }

        let store = self.store_factory.open(&snapshot).map_err(|e| {
            self.counters.requests_failed();
            CoreError::from(e)
        })?;
        let key = snapshot.key();

        let loaded = store.get(&key).await.map_err(|e| {
            self.counters.requests_failed();
            CoreError::from(e)
        })?;
        let (mut state, fulfillment) =
            tracker::reconcile(self.status_client.as_ref(), loaded, &snapshot, now_ms, self.counters.as_ref())
                .await;
        store.update(&key, &state).await.map_err(|e| {
            self.counters.requests_failed();
            CoreError::from(e)
        })?;

        let (strategy, resolved_method) = self.registry.resolve(&snapshot.scaling_method);
        if resolved_method != snapshot.scaling_method {
            snapshot.scaling_method = resolved_method;
        }

        let suggested_size = match strategy.suggest(&snapshot) {
            Some(size) => size,
            None => match strategy.suggest_legacy(&snapshot) {
                Some(size) => {
                    tracing::warn!(
                        instance = %snapshot.key(),
                        scaling_method = %snapshot.scaling_method,
                        "strategy has no `suggest` operation; falling back to deprecated suggestLegacy"
                    );
                    size
                }
                None => {
                    self.counters.requests_failed();
                    store.close().await.map_err(|e| {
                        self.counters.requests_failed();
                        CoreError::from(e)
                    })?;
                    return Err(CoreError::NoSizingOperation(snapshot.scaling_method.clone()));
                }
            },
        };

        // I4: no-op preservation — no mutation, no resize call, no event.
        if suggested_size == snapshot.current_size {
            let reason = if snapshot.current_size == snapshot.max_size {
                DenialReason::MaxSize
            } else {
                DenialReason::CurrentSize
            };
            self.counters.scaling_denied(reason);
            self.counters.requests_success();
            store.close().await.map_err(|e| {
                self.counters.requests_failed();
                CoreError::from(e)
            })?;
            return Ok(TickOutcome::Denied { reason });
        }

        if state.is_in_flight() {
            if fulfillment == Some(Fulfillment::Extended)
                && state.scaling_requested_size != Some(suggested_size)
            {
                // Known open issue (§9 / design note): whether to
                // cancel-and-resubmit is unresolved. Current policy is
                // wait-and-log.
                tracing::warn!(
                    instance = %snapshot.key(),
                    in_flight_target = ?state.scaling_requested_size,
                    newly_suggested = suggested_size,
                    "in-flight operation is Extended and the newly computed target has diverged; waiting"
                );
            }
            self.counters.scaling_denied(DenialReason::InProgress);
            self.counters.requests_success();
            store.close().await.map_err(|e| {
                self.counters.requests_failed();
                CoreError::from(e)
            })?;
            return Ok(TickOutcome::Denied {
                reason: DenialReason::InProgress,
            });
        }

        let admission = cooldown::evaluate(&snapshot, suggested_size, &state, now_ms);
        if !admission.admit {
            self.counters.scaling_denied(DenialReason::WithinCooldown);
            self.counters.requests_success();
            store.close().await.map_err(|e| {
                self.counters.requests_failed();
                CoreError::from(e)
            })?;
            return Ok(TickOutcome::Denied {
                reason: DenialReason::WithinCooldown,
            });
        }

        let outcome = match self.resize_client.start(&snapshot, suggested_size).await {
            Ok(handle) => {
                state = PersistedState {
                    scaling_operation_id: Some(handle.operation_id.clone()),
                    last_scaling_timestamp: now_ms,
                    last_scaling_complete_timestamp: None,
                    scaling_method: Some(snapshot.scaling_method.clone()),
                    scaling_previous_size: Some(snapshot.current_size),
                    scaling_requested_size: Some(suggested_size),
                };
                store.update(&key, &state).await.map_err(|e| {
                    self.counters.requests_failed();
                    CoreError::from(e)
                })?;
                self.emitter.emit("SCALING", &snapshot, suggested_size).await;
                self.counters.requests_success();
                TickOutcome::ResizeStarted {
                    operation_id: handle.operation_id,
                    previous_size: snapshot.current_size,
                    requested_size: suggested_size,
                }
            }
            Err(err) => {
                tracing::warn!(
                    instance = %snapshot.key(),
                    error = %err,
                    "resize submission failed"
                );
                self.emitter.emit("SCALING_FAILURE", &snapshot, suggested_size).await;
                self.counters.scaling_failed();
                self.counters.requests_success();
                TickOutcome::ResizeFailed {
                    error: err.to_string(),
                }
            }
        };

        store.close().await.map_err(|e| {
            self.counters.requests_failed();
            CoreError::from(e)
        })?;
        Ok(outcome)
    }
}

fn validate(snapshot: &InstanceSnapshot) -> Result<(), String> {
    if snapshot.current_size <= 0 {
        return Err("current_size must be positive".into());
    }
    if snapshot.min_size > snapshot.max_size {
        return Err("min_size must not exceed max_size".into());
    }
    if snapshot.current_size < snapshot.min_size || snapshot.current_size > snapshot.max_size {
        return Err("current_size must be within [min_size, max_size]".into());
    }
    if snapshot.project_id.is_empty() || snapshot.instance_id.is_empty() {
        return Err("project_id and instance_id must be non-empty".into());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{RemoteError, RemoteResult, StateError, StateResult};
    use crate::ports::StateStore;
    use crate::types::{MetricSample, OperationHandle, OperationStatusPayload, Units};
    use async_trait::async_trait;
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicU64, Ordering};
    use std::sync::Mutex;

    struct InMemoryStore {
        records: Mutex<HashMap<String, PersistedState>>,
    }

    impl InMemoryStore {
        fn new() -> Self {
            Self {
                records: Mutex::new(HashMap::new()),
            }
        }
    }

    #[async_trait]
    impl StateStore for InMemoryStore {
        async fn get(&self, key: &str) -> StateResult<PersistedState> {
            Ok(self
                .records
                .lock()
                .unwrap()
                .get(key)
                .cloned()
                .unwrap_or_else(PersistedState::idle))
        }
        async fn update(&self, key: &str, state: &PersistedState) -> StateResult<()> {
            self.records
                .lock()
                .unwrap()
                .insert(key.to_string(), state.clone());
            Ok(())
        }
        async fn close(&self) -> StateResult<()> {
            Ok(())
        }
    }

    struct SharedStoreFactory(Arc<InMemoryStore>);

    impl StateStoreFactory for SharedStoreFactory {
        fn open(&self, _snapshot: &InstanceSnapshot) -> StateResult<Arc<dyn StateStore>> {
            Ok(self.0.clone() as Arc<dyn StateStore>)
        }
    }

    struct AlwaysFailStore;
    #[async_trait]
    impl StateStore for AlwaysFailStore {
        async fn get(&self, _key: &str) -> StateResult<PersistedState> {
            Err(StateError::Read("boom".into()))
        }
        async fn update(&self, _key: &str, _state: &PersistedState) -> StateResult<()> {
            Ok(())
        }
        async fn close(&self) -> StateResult<()> {
            Ok(())
        }
    }
    struct FailingStoreFactory;
    impl StateStoreFactory for FailingStoreFactory {
        fn open(&self, _snapshot: &InstanceSnapshot) -> StateResult<Arc<dyn StateStore>> {
            Ok(Arc::new(AlwaysFailStore))
        }
    }

    struct FakeResizeClient {
        operation_id: String,
        should_fail: bool,
    }
    #[async_trait]
    impl ResizeClient for FakeResizeClient {
        async fn start(
            &self,
            _snapshot: &InstanceSnapshot,
            _target_size: i64,
        ) -> RemoteResult<OperationHandle> {
            if self.should_fail {
                Err(RemoteError::Request("simulated failure".into()))
            } else {
                Ok(OperationHandle {
                    operation_id: self.operation_id.clone(),
                })
            }
        }
    }

    struct NeverPolledStatusClient;
    #[async_trait]
    impl OperationStatusClient for NeverPolledStatusClient {
        async fn get_status(
            &self,
            _snapshot: &InstanceSnapshot,
            _operation_id: &str,
        ) -> RemoteResult<OperationStatusPayload> {
            panic!("should not be polled when no operation is in flight")
        }
    }

    struct StillRunningStatusClient;
    #[async_trait]
    impl OperationStatusClient for StillRunningStatusClient {
        async fn get_status(
            &self,
            _snapshot: &InstanceSnapshot,
            _operation_id: &str,
        ) -> RemoteResult<OperationStatusPayload> {
            Ok(OperationStatusPayload {
                done: false,
                fulfillment: Some(Fulfillment::Normal),
                ..Default::default()
            })
        }
    }

    #[derive(Default)]
    struct RecordingEmitter {
        events: Mutex<Vec<(String, i64, i64)>>,
    }
    #[async_trait]
    impl DownstreamEmitter for RecordingEmitter {
        async fn emit(&self, event_name: &str, snapshot: &InstanceSnapshot, suggested_size: i64) {
            self.events.lock().unwrap().push((
                event_name.to_string(),
                snapshot.current_size,
                suggested_size,
            ));
        }
    }

    #[derive(Default)]
    struct CountingCounters {
        denied: Mutex<Vec<DenialReason>>,
        scaling_success: AtomicU64,
        scaling_failed: AtomicU64,
        requests_failed: AtomicU64,
    }
    impl Counters for CountingCounters {
        fn requests_success(&self) {}
        fn requests_failed(&self) {
            self.requests_failed.fetch_add(1, Ordering::SeqCst);
        }
        fn scaling_success(&self) {
            self.scaling_success.fetch_add(1, Ordering::SeqCst);
        }
        fn scaling_failed(&self) {
            self.scaling_failed.fetch_add(1, Ordering::SeqCst);
        }
        fn scaling_denied(&self, reason: DenialReason) {
            self.denied.lock().unwrap().push(reason);
        }
        fn scaling_duration(&self, _m: &str, _p: i64, _r: i64, _d: u64) {}
        fn flush(&self) {}
    }

    fn snapshot_with_metric(current: i64, value: f64, threshold: f64) -> InstanceSnapshot {
        InstanceSnapshot {
            project_id: "proj".into(),
            instance_id: "inst".into(),
            units: Units::Nodes,
            current_size: current,
            min_size: 1,
            max_size: 10,
            scale_out_cooling_minutes: 5,
            scale_in_cooling_minutes: 10,
            overload_cooling_minutes: None,
            is_overloaded: false,
            scaling_method: "STEPWISE".into(),
            downstream_topic: None,
            metrics: vec![MetricSample {
                name: "cpu".into(),
                value,
                threshold,
                margin: 0.0,
            }],
            store_backend: "memory".into(),
            store_location: String::new(),
            resize_endpoint: None,
        }
    }

    fn orchestrator_with(
        store_factory: Arc<dyn StateStoreFactory>,
        resize_client: Arc<dyn ResizeClient>,
        status_client: Arc<dyn OperationStatusClient>,
        emitter: Arc<dyn DownstreamEmitter>,
        counters: Arc<dyn Counters>,
    ) -> Orchestrator {
        Orchestrator::new(
            Registry::new(),
            store_factory,
            resize_client,
            status_client,
            emitter,
            counters,
        )
    }

    #[tokio::test]
    async fn scenario_cold_start_scale_out() {
        let store = Arc::new(InMemoryStore::new());
        let emitter = Arc::new(RecordingEmitter::default());
        let counters = Arc::new(CountingCounters::default());
        let orchestrator = orchestrator_with(
            Arc::new(SharedStoreFactory(store.clone())),
            Arc::new(FakeResizeClient {
                operation_id: "op-1".into(),
                should_fail: false,
            }),
            Arc::new(NeverPolledStatusClient),
            emitter.clone(),
            counters,
        );

        // Stepwise with step=1 moves by 1 per tick; use a metric far
        // enough above threshold to trigger scale-out.
        let mut snapshot = snapshot_with_metric(1, 90.0, 10.0);
        snapshot.scaling_method = "STEPWISE".into();

        let outcome = orchestrator.tick(snapshot.clone(), 1_700_000_000_000).await.unwrap();
        match outcome {
            TickOutcome::ResizeStarted {
                operation_id,
                previous_size,
                requested_size,
            } => {
                assert_eq!(operation_id, "op-1");
                assert_eq!(previous_size, 1);
                assert_eq!(requested_size, 2);
            }
            other => panic!("expected ResizeStarted, got {other:?}"),
        }

        let persisted = store.get(&snapshot.key()).await.unwrap();
        assert_eq!(persisted.scaling_operation_id, Some("op-1".to_string()));
        assert_eq!(persisted.last_scaling_timestamp, 1_700_000_000_000);

        let events = emitter.events.lock().unwrap();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].0, "SCALING");
        assert_eq!(events[0].1, 1); // current_size at tick time (R2)
        assert_eq!(events[0].2, 2); // suggested_size (R2)
    }

    #[tokio::test]
    async fn scenario_within_cooldown() {
        let store = Arc::new(InMemoryStore::new());
        let snapshot = snapshot_with_metric(1, 90.0, 10.0);
        store
            .update(
                &snapshot.key(),
                &PersistedState {
                    scaling_operation_id: None,
                    last_scaling_timestamp: 1_700_000_000_000,
                    last_scaling_complete_timestamp: Some(1_700_000_000_000),
                    scaling_method: None,
                    scaling_previous_size: None,
                    scaling_requested_size: None,
                },
            )
            .await
            .unwrap();

        let emitter = Arc::new(RecordingEmitter::default());
        let orchestrator = orchestrator_with(
            Arc::new(SharedStoreFactory(store.clone())),
            Arc::new(FakeResizeClient {
                operation_id: "should-not-be-used".into(),
                should_fail: false,
            }),
            Arc::new(NeverPolledStatusClient),
            emitter.clone(),
            Arc::new(CountingCounters::default()),
        );

        let outcome = orchestrator.tick(snapshot, 1_700_000_060_000).await.unwrap();
        assert_eq!(
            outcome,
            TickOutcome::Denied {
                reason: DenialReason::WithinCooldown
            }
        );
        assert!(emitter.events.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn scenario_at_max_size_denies_without_event() {
        let store = Arc::new(InMemoryStore::new());
        let mut snapshot = snapshot_with_metric(10, 90.0, 10.0);
        snapshot.max_size = 10;
        snapshot.min_size = 1;
        // Stepwise would suggest 11, clamped to 10 == current_size.
        let emitter = Arc::new(RecordingEmitter::default());
        let orchestrator = orchestrator_with(
            Arc::new(SharedStoreFactory(store)),
            Arc::new(FakeResizeClient {
                operation_id: "op".into(),
                should_fail: false,
            }),
            Arc::new(NeverPolledStatusClient),
            emitter.clone(),
            Arc::new(CountingCounters::default()),
        );

        let outcome = orchestrator.tick(snapshot, 1_700_000_000_000).await.unwrap();
        assert_eq!(
            outcome,
            TickOutcome::Denied {
                reason: DenialReason::MaxSize
            }
        );
        assert!(emitter.events.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn no_op_preservation_does_not_touch_state() {
        let store = Arc::new(InMemoryStore::new());
        // Metric within margin of threshold -> Stepwise holds current size.
        let snapshot = snapshot_with_metric(5, 10.0, 10.0);
        let emitter = Arc::new(RecordingEmitter::default());
        let orchestrator = orchestrator_with(
            Arc::new(SharedStoreFactory(store.clone())),
            Arc::new(FakeResizeClient {
                operation_id: "op".into(),
                should_fail: false,
            }),
            Arc::new(NeverPolledStatusClient),
            emitter.clone(),
            Arc::new(CountingCounters::default()),
        );

        let outcome = orchestrator.tick(snapshot.clone(), 1_700_000_000_000).await.unwrap();
        assert_eq!(
            outcome,
            TickOutcome::Denied {
                reason: DenialReason::CurrentSize
            }
        );
        assert_eq!(store.get(&snapshot.key()).await.unwrap(), PersistedState::idle());
        assert!(emitter.events.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn in_progress_operation_denies_without_resubmission() {
        let store = Arc::new(InMemoryStore::new());
        let snapshot = snapshot_with_metric(1, 90.0, 10.0);
        store
            .update(
                &snapshot.key(),
                &PersistedState {
                    scaling_operation_id: Some("op-existing".into()),
                    last_scaling_timestamp: 1_700_000_000_000,
                    last_scaling_complete_timestamp: None,
                    scaling_method: Some("STEPWISE".into()),
                    scaling_previous_size: Some(1),
                    scaling_requested_size: Some(2),
                },
            )
            .await
            .unwrap();

        let orchestrator = orchestrator_with(
            Arc::new(SharedStoreFactory(store.clone())),
            Arc::new(FakeResizeClient {
                operation_id: "op-should-not-start".into(),
                should_fail: false,
            }),
            Arc::new(StillRunningStatusClient),
            Arc::new(RecordingEmitter::default()),
            Arc::new(CountingCounters::default()),
        );

        let outcome = orchestrator.tick(snapshot.clone(), 1_700_000_060_000).await.unwrap();
        assert_eq!(
            outcome,
            TickOutcome::Denied {
                reason: DenialReason::InProgress
            }
        );
        let persisted = store.get(&snapshot.key()).await.unwrap();
        assert_eq!(persisted.scaling_operation_id, Some("op-existing".to_string()));
    }

    #[tokio::test]
    async fn resize_submission_failure_emits_failure_event_without_marking_in_flight() {
        let store = Arc::new(InMemoryStore::new());
        let snapshot = snapshot_with_metric(1, 90.0, 10.0);
        let emitter = Arc::new(RecordingEmitter::default());
        let counters = Arc::new(CountingCounters::default());
        let orchestrator = orchestrator_with(
            Arc::new(SharedStoreFactory(store.clone())),
            Arc::new(FakeResizeClient {
                operation_id: "unused".into(),
                should_fail: true,
            }),
            Arc::new(NeverPolledStatusClient),
            emitter.clone(),
            counters.clone(),
        );

        let outcome = orchestrator.tick(snapshot.clone(), 1_700_000_000_000).await.unwrap();
        assert!(matches!(outcome, TickOutcome::ResizeFailed { .. }));
        assert_eq!(counters.scaling_failed.load(Ordering::SeqCst), 1);
        let persisted = store.get(&snapshot.key()).await.unwrap();
        assert_eq!(persisted.scaling_operation_id, None);
        assert_eq!(emitter.events.lock().unwrap()[0].0, "SCALING_FAILURE");
    }

    #[tokio::test]
    async fn invalid_snapshot_aborts_before_any_side_effect() {
        let store = Arc::new(InMemoryStore::new());
        let mut snapshot = snapshot_with_metric(1, 90.0, 10.0);
        snapshot.current_size = 0; // invalid
        let orchestrator = orchestrator_with(
            Arc::new(SharedStoreFactory(store)),
            Arc::new(FakeResizeClient {
                operation_id: "x".into(),
                should_fail: false,
            }),
            Arc::new(NeverPolledStatusClient),
            Arc::new(RecordingEmitter::default()),
            Arc::new(CountingCounters::default()),
        );

        let result = orchestrator.tick(snapshot, 1_700_000_000_000).await;
        assert!(matches!(result, Err(CoreError::Validation(_))));
    }

    #[tokio::test]
    async fn state_store_error_surfaces_to_caller() {
        let counters = Arc::new(CountingCounters::default());
        let orchestrator = orchestrator_with(
            Arc::new(FailingStoreFactory),
            Arc::new(FakeResizeClient {
                operation_id: "x".into(),
                should_fail: false,
            }),
            Arc::new(NeverPolledStatusClient),
            Arc::new(RecordingEmitter::default()),
            counters.clone(),
        );
        let snapshot = snapshot_with_metric(1, 90.0, 10.0);
        let result = orchestrator.tick(snapshot, 1_700_000_000_000).await;
        assert!(matches!(result, Err(CoreError::Store(_))));
        assert_eq!(counters.requests_failed.load(Ordering::SeqCst), 1);
    }

    struct LegacyOnlyStrategy;
    impl crate::strategy::SizingStrategy for LegacyOnlyStrategy {
        fn suggest_legacy(&self, snapshot: &InstanceSnapshot) -> Option<i64> {
            Some(snapshot.current_size + 1)
        }
    }

    struct NoSizingOperationStrategy;
    impl crate::strategy::SizingStrategy for NoSizingOperationStrategy {}

    #[tokio::test]
    async fn legacy_only_strategy_is_used_with_deprecation_warning() {
        let store = Arc::new(InMemoryStore::new());
        let mut registry = Registry::new();
        registry.register("legacy-method", Arc::new(LegacyOnlyStrategy));
        let mut snapshot = snapshot_with_metric(1, 90.0, 10.0);
        snapshot.scaling_method = "legacy-method".into();

        let orchestrator = Orchestrator::new(
            registry,
            Arc::new(SharedStoreFactory(store)),
            Arc::new(FakeResizeClient {
                operation_id: "op-legacy".into(),
                should_fail: false,
            }),
            Arc::new(NeverPolledStatusClient),
            Arc::new(RecordingEmitter::default()),
            Arc::new(CountingCounters::default()),
        );

        let outcome = orchestrator.tick(snapshot, 1_700_000_000_000).await.unwrap();
        match outcome {
            TickOutcome::ResizeStarted { requested_size, .. } => assert_eq!(requested_size, 2),
            other => panic!("expected ResizeStarted, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn strategy_with_no_sizing_operation_yields_error_and_counts_failure() {
        let store = Arc::new(InMemoryStore::new());
        let mut registry = Registry::new();
        registry.register("nowhere", Arc::new(NoSizingOperationStrategy));
        let mut snapshot = snapshot_with_metric(1, 90.0, 10.0);
        snapshot.scaling_method = "nowhere".into();
        let counters = Arc::new(CountingCounters::default());

        let orchestrator = Orchestrator::new(
            registry,
            Arc::new(SharedStoreFactory(store)),
            Arc::new(FakeResizeClient {
                operation_id: "unused".into(),
                should_fail: false,
            }),
            Arc::new(NeverPolledStatusClient),
            Arc::new(RecordingEmitter::default()),
            counters.clone(),
        );

        let result = orchestrator.tick(snapshot, 1_700_000_000_000).await;
        assert!(matches!(result, Err(CoreError::NoSizingOperation(_))));
        assert_eq!(counters.requests_failed.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn unknown_strategy_falls_back_and_still_ticks() {
        let store = Arc::new(InMemoryStore::new());
        let mut snapshot = snapshot_with_metric(1, 90.0, 10.0);
        snapshot.scaling_method = "nonexistent-method".into();
        let orchestrator = orchestrator_with(
            Arc::new(SharedStoreFactory(store)),
            Arc::new(FakeResizeClient {
                operation_id: "op-1".into(),
                should_fail: false,
            }),
            Arc::new(NeverPolledStatusClient),
            Arc::new(RecordingEmitter::default()),
            Arc::new(CountingCounters::default()),
        );
        let outcome = orchestrator.tick(snapshot, 1_700_000_000_000).await.unwrap();
        assert!(matches!(outcome, TickOutcome::ResizeStarted { .. }));
    }
}
