//! File-backed [`KeyValueStore`](pricing_core::KeyValueStore) for the
//! `"file"` storage backend.

mod factory;
mod store;

pub use factory::FileStorageFactory;
pub use store::FileStore;
