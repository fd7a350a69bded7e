use std::collections::BTreeMap;

use super::factory::{StorageConfig, StorageFactory};
use super::repository::{KeyValueStore, StorageError};

/// Volatile store backed by a `BTreeMap`. Contents are lost on drop.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: BTreeMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<bool, StorageError> {
        Ok(self.entries.remove(key).is_some())
    }

    fn keys(&self) -> Result<Vec<String>, StorageError> {
        Ok(self.entries.keys().cloned().collect())
    }
}

/// Factory for the `"memory"` backend. `location` is ignored.
pub struct MemoryStorageFactory;

impl StorageFactory for MemoryStorageFactory {
    fn backend_name(&self) -> &'static str {
        "memory"
    }

    fn create(&self, _config: &StorageConfig) -> Result<Box<dyn KeyValueStore>, StorageError> {
        Ok(Box::new(MemoryStore::new()))
    }
}
