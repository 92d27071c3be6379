//! `RedbStateStore` — durable and in-memory implementations of
//! `autoscale_core::ports::StateStore`, backed by redb.

use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;
use redb::{Database, ReadableDatabase, ReadableTable};
use tracing::debug;

use autoscale_core::error::{StateError, StateResult};
use autoscale_core::ports::StateStore;
use autoscale_core::types::PersistedState;

use crate::tables::PERSISTED_STATE;

/// Convert any `Display` error into a `StateError` variant.
macro_rules! map_err {
    ($variant:ident) => {
        |e| StateError::$variant(e.to_string())
    };
}

/// Thread-safe state store backed by redb. Cheap to clone: internally
/// an `Arc<Database>`.
#[derive(Clone)]
pub struct RedbStateStore {
    db: Arc<Database>,
}

impl RedbStateStore {
    /// Open (or create) a persistent state store at the given path.
    pub fn open(path: &Path) -> StateResult<Self> {
        let db = Database::create(path).map_err(map_err!(Open))?;
        let store = Self { db: Arc::new(db) };
        store.ensure_table()?;
        debug!(?path, "state store opened");
        Ok(store)
    }

    /// Create an ephemeral in-memory state store, for the direct
    /// in-process ingress path and for tests.
    pub fn open_in_memory() -> StateResult<Self> {
        let backend = redb::backends::InMemoryBackend::new();
        let db = Database::builder()
            .create_with_backend(backend)
            .map_err(map_err!(Open))?;
        let store = Self { db: Arc::new(db) };
        store.ensure_table()?;
        debug!("in-memory state store opened");
        Ok(store)
    }

    fn ensure_table(&self) -> StateResult<()> {
        let txn = self.db.begin_write().map_err(map_err!(Transaction))?;
        txn.open_table(PERSISTED_STATE).map_err(map_err!(Transaction))?;
        txn.commit().map_err(map_err!(Transaction))?;
        Ok(())
    }
}

#[async_trait]
impl StateStore for RedbStateStore {
    async fn get(&self, key: &str) -> StateResult<PersistedState> {
        let txn = self.db.begin_read().map_err(map_err!(Transaction))?;
        let table = txn.open_table(PERSISTED_STATE).map_err(map_err!(Transaction))?;
        match table.get(key).map_err(map_err!(Read))? {
            Some(guard) => {
                let state: PersistedState =
                    serde_json::from_slice(guard.value()).map_err(map_err!(Deserialize))?;
                Ok(state)
            }
            None => Ok(PersistedState::idle()),
        }
    }

    async fn update(&self, key: &str, state: &PersistedState) -> StateResult<()> {
        let value = serde_json::to_vec(state).map_err(map_err!(Serialize))?;
        let txn = self.db.begin_write().map_err(map_err!(Transaction))?;
        {
            let mut table = txn.open_table(PERSISTED_STATE).map_err(map_err!(Transaction))?;
            table.insert(key, value.as_slice()).map_err(map_err!(Write))?;
        }
        txn.commit().map_err(map_err!(Transaction))?;
        debug!(%key, "persisted state updated");
        Ok(())
    }

    async fn close(&self) -> StateResult<()> {
        // redb releases file locks and flushes on `Drop`; there is
        // nothing to do here beyond satisfying the trait's explicit
        // close operation.
        Ok(())
    }
}
