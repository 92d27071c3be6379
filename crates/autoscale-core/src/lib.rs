//! Sizing strategies, the cooldown policy, the operation tracker, and
//! the orchestrator that ties them together into a per-instance,
//! per-tick resize decision.

pub mod cooldown;
pub mod error;
pub mod orchestrator;
pub mod ports;
pub mod strategy;
pub mod tracker;
pub mod types;

pub use error::{CoreError, CoreResult, RemoteError, RemoteResult, StateError, StateResult};
pub use orchestrator::Orchestrator;
pub use ports::{Counters, DownstreamEmitter, OperationStatusClient, ResizeClient, StateStore, StateStoreFactory};
pub use strategy::{Direct, Linear, Registry, SizingStrategy, Stepwise, DEFAULT_METHOD};
pub use types::{
    DenialReason, Fulfillment, InstanceSnapshot, MetricSample, OperationHandle, OperationOutcome,
    OperationStatusPayload, PersistedState, TickOutcome, Units,
};
