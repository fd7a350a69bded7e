use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use super::memory::MemoryStorageFactory;
use super::repository::{KeyValueStore, StorageError};

/// Backend-agnostic storage configuration.
///
/// `backend` must match the [`StorageFactory::backend_name`] of a registered
/// factory. `location` is passed through to that factory unchanged; its
/// meaning is backend-specific.
///
/// | backend  | location examples          |
/// |----------|----------------------------|
/// | `memory` | ignored                    |
/// | `file`   | `pricing-store.toml`       |
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Lowercase identifier matching a registered factory (e.g. `"file"`).
    pub backend: String,
    /// Opaque value forwarded to the factory's `create` method.
    pub location: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            backend: "memory".to_string(),
            location: String::new(),
        }
    }
}

/// One implementation per storage backend, registered with a
/// [`StorageRegistry`] at startup.
pub trait StorageFactory: Send + Sync {
    /// Unique, lowercase identifier for this backend.
    fn backend_name(&self) -> &'static str;

    /// Open (or create) the backing store described by `config`.
    fn create(&self, config: &StorageConfig) -> Result<Box<dyn KeyValueStore>, StorageError>;
}

/// Registry of [`StorageFactory`] instances, keyed by backend name.
///
/// [`StorageRegistry::new`] starts with the `"memory"` backend registered;
/// other crates add theirs with [`register`](StorageRegistry::register).
pub struct StorageRegistry {
    factories: HashMap<&'static str, Box<dyn StorageFactory>>,
}

impl StorageRegistry {
    pub fn new() -> Self {
        let mut registry = Self::empty();
        registry.register(Box::new(MemoryStorageFactory));
        registry
    }

    /// A registry with no backends at all.
    pub fn empty() -> Self {
        Self {
            factories: HashMap::new(),
        }
    }

    /// Register a backend factory, replacing any factory with the same name.
    pub fn register(&mut self, factory: Box<dyn StorageFactory>) {
        self.factories.insert(factory.backend_name(), factory);
    }

    /// Names of every registered backend, sorted alphabetically.
    pub fn available_backends(&self) -> Vec<&'static str> {
        let mut names: Vec<_> = self.factories.keys().copied().collect();
        names.sort_unstable();
        names
    }

    /// Dispatch to the factory matching `config.backend`.
    ///
    /// # Errors
    /// * [`StorageError::Configuration`] when no factory is registered for
    ///   the requested backend.
    /// * Any error the chosen factory returns.
    pub fn create(&self, config: &StorageConfig) -> Result<Box<dyn KeyValueStore>, StorageError> {
        let factory = self
            .factories
            .get(config.backend.as_str())
            .ok_or_else(|| {
                StorageError::Configuration(format!(
                    "unknown backend '{}'; available: {:?}",
                    config.backend,
                    self.available_backends()
                ))
            })?;

        factory.create(config)
    }
}

impl Default for StorageRegistry {
    fn default() -> Self {
        Self::new()
    }
}
