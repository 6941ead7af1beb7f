//! InMemoryKv - HashMap-backed store for testing and development.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use super::{KeyValueStore, KvError};

/// In-memory key-value store backed by a HashMap.
///
/// Clone-friendly via Arc; clones share the same storage.
#[derive(Clone, Default)]
pub struct InMemoryKv {
    storage: Arc<RwLock<HashMap<String, String>>>,
}

impl InMemoryKv {
    /// Create a new empty store.
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for InMemoryKv {
    fn get(&self, key: &str) -> Result<Option<String>, KvError> {
        let storage = self
            .storage
            .read()
            .map_err(|_| KvError::Storage("lock poisoned".into()))?;
        Ok(storage.get(key).cloned())
    }

    fn put(&self, key: &str, value: String) -> Result<(), KvError> {
        let mut storage = self
            .storage
            .write()
            .map_err(|_| KvError::Storage("lock poisoned".into()))?;
        storage.insert(key.to_string(), value);
        Ok(())
    }
}
