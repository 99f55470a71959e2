use std::collections::HashMap;
use std::sync::RwLock;

use super::{KeyValueStore, PersistenceError};

/// In-memory store. Intended for tests and sessions without a data directory.
#[derive(Debug, Default)]
pub struct InMemoryStore {
    values: RwLock<HashMap<String, String>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for InMemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, PersistenceError> {
        let values = self.values.read().map_err(|_| PersistenceError::Poisoned)?;
        Ok(values.get(key).cloned())
    }

    fn put(&self, key: &str, value: &str) -> Result<(), PersistenceError> {
        let mut values = self.values.write().map_err(|_| PersistenceError::Poisoned)?;
        values.insert(key.to_string(), value.to_string());
        Ok(())
    }
}
