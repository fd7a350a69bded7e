use pricing_core::KeyValueStore;
use pricing_core::StorageError;
use pricing_core::storage::{StorageConfig, StorageFactory};

use crate::store::FileStore;

/// [`StorageFactory`] for TOML files on disk.
///
/// Register this with a [`pricing_core::storage::StorageRegistry`] to make the
/// `"file"` backend available:
///
/// ```rust,no_run
/// use pricing_core::storage::StorageRegistry;
/// use pricing_store_file::FileStorageFactory;
///
/// let mut registry = StorageRegistry::new();
/// registry.register(Box::new(FileStorageFactory));
/// ```
pub struct FileStorageFactory;

impl StorageFactory for FileStorageFactory {
    fn backend_name(&self) -> &'static str {
        "file"
    }

    /// `config.location` is the path of the TOML document.
    fn create(&self, config: &StorageConfig) -> Result<Box<dyn KeyValueStore>, StorageError> {
        if config.location.trim().is_empty() {
            return Err(StorageError::Configuration(
                "file backend requires a location".to_string(),
            ));
        }
        Ok(Box::new(FileStore::open(&config.location)?))
    }
}
