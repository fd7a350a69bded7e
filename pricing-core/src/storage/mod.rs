//! Pluggable key/value persistence.

pub mod factory;
mod memory;
pub mod repository;

pub use factory::{StorageConfig, StorageFactory, StorageRegistry};
pub use memory::{MemoryStorageFactory, MemoryStore};
pub use repository::{KeyValueStore, StorageError};
