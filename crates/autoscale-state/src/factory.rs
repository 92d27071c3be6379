//! `StateStoreFactory` — resolves the adapter named on a snapshot
//! (4.C: "constructed per tick via a factory that inspects the
//! snapshot").

use std::collections::HashMap;
use std::path::Path;
use std::sync::{Arc, Mutex};

use autoscale_core::error::{StateError, StateResult};
use autoscale_core::ports::{StateStore, StateStoreFactory};
use autoscale_core::types::InstanceSnapshot;

use crate::store::RedbStateStore;

/// Resolves `snapshot.store_backend` ("redb" | "memory") to a concrete
/// `StateStore`, caching one `RedbStateStore` handle per distinct
/// `store_location` so a persistent database file is opened once, not
/// once per tick.
pub struct DefaultStateStoreFactory {
    on_disk: Mutex<HashMap<String, Arc<RedbStateStore>>>,
    in_memory: Mutex<Option<Arc<RedbStateStore>>>,
}

impl DefaultStateStoreFactory {
    pub fn new() -> Self {
        Self {
            on_disk: Mutex::new(HashMap::new()),
            in_memory: Mutex::new(None),
        }
    }
}

impl Default for DefaultStateStoreFactory {
    fn default() -> Self {
        Self::new()
    }
}

impl StateStoreFactory for DefaultStateStoreFactory {
    fn open(&self, snapshot: &InstanceSnapshot) -> StateResult<Arc<dyn StateStore>> {
        match snapshot.store_backend.as_str() {
            "redb" => {
                let mut cache = self.on_disk.lock().unwrap();
                if let Some(store) = cache.get(&snapshot.store_location) {
                    return Ok(store.clone() as Arc<dyn StateStore>);
                }
                if snapshot.store_location.is_empty() {
                    return Err(StateError::Open(
                        "redb backend requires a non-empty store_location".into(),
                    ));
                }
                let store = Arc::new(RedbStateStore::open(Path::new(&snapshot.store_location))?);
                cache.insert(snapshot.store_location.clone(), store.clone());
                Ok(store as Arc<dyn StateStore>)
            }
            "memory" | "" => {
                let mut slot = self.in_memory.lock().unwrap();
                if let Some(store) = slot.as_ref() {
                    return Ok(store.clone() as Arc<dyn StateStore>);
                }
                let store = Arc::new(RedbStateStore::open_in_memory()?);
                *slot = Some(store.clone());
                Ok(store as Arc<dyn StateStore>)
            }
            other => Err(StateError::Open(format!("unknown store backend '{other}'"))),
        }
    }
}
