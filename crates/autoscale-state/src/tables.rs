//! redb table definition for the autoscaler state store.

use redb::TableDefinition;

/// `PersistedState`, JSON-serialized, keyed by `{project_id}/{instance_id}`.
pub const PERSISTED_STATE: TableDefinition<&str, &[u8]> = TableDefinition::new("persisted_state");
