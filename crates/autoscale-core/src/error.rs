//! Error taxonomy for the autoscaler core (specification §7).

use thiserror::Error;

/// Errors surfaced by the `StateStore` port. Adapter crates (e.g.
/// `autoscale-state`) construct these; the core never constructs a
/// `StateError::Open` or `::Table` variant itself.
#[derive(Debug, Error)]
pub enum StateError {
    #[error("failed to open state store: {0}")]
    Open(String),

    #[error("transaction error: {0}")]
    Transaction(String),

    #[error("read error: {0}")]
    Read(String),

    #[error("write error: {0}")]
    Write(String),

    #[error("serialization error: {0}")]
    Serialize(String),

    #[error("deserialization error: {0}")]
    Deserialize(String),
}

pub type StateResult<T> = Result<T, StateError>;

/// Errors surfaced by the `ResizeClient` / `OperationStatusClient` ports.
#[derive(Debug, Error)]
pub enum RemoteError {
    #[error("resize endpoint not configured for this instance")]
    NoEndpoint,

    #[error("request error: {0}")]
    Request(String),

    #[error("unexpected response status {0}")]
    Status(u16),

    #[error("malformed response body: {0}")]
    Malformed(String),
}

pub type RemoteResult<T> = Result<T, RemoteError>;

/// Error taxonomy for a single `Orchestrator::tick` call (§7, items
/// 1-3 and 5; items 4 and 6 are recovery paths and never reach here).
#[derive(Debug, Error)]
pub enum CoreError {
    /// Parse/validation errors: the tick is aborted before any side
    /// effect (§7.1).
    #[error("invalid snapshot: {0}")]
    Validation(String),

    /// The resolved strategy exposes neither `suggest` nor
    /// `suggest_legacy` (§7.2). In practice this cannot happen for the
    /// strategies shipped in this crate, but the registry contract
    /// allows third-party strategies that could violate it.
    #[error("sizing strategy '{0}' has no usable sizing operation")]
    NoSizingOperation(String),

    /// The resize driver failed to submit the request (§7.3). The
    /// orchestrator converts this into a `SCALING_FAILURE` event and a
    /// `scaling_failed` counter rather than propagating it further, so
    /// this variant is mostly useful to callers that bypass the
    /// orchestrator's own handling (e.g. direct driver tests).
    #[error("resize submission failed: {0}")]
    Resize(#[from] RemoteError),

    /// The state store could not be read or written (§7.5).
    #[error("state store error: {0}")]
    Store(#[from] StateError),
}

pub type CoreResult<T> = Result<T, CoreError>;
