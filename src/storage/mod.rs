//! Storage - The persistence medium under every record store.
//!
//! A medium is a flat key/value space of string blobs. Each record store owns
//! one key and overwrites the whole blob on every mutation, so backends only
//! need whole-value `get` and `set`.
//!
//! ## Example
//!
//! ```ignore
//! use beacon_store::{BlobStorage, InMemoryStorage};
//!
//! let storage = InMemoryStorage::new().with_quota(5 * 1024 * 1024);
//! storage.set("incidentes", "[]")?;
//! assert_eq!(storage.get("incidentes")?.as_deref(), Some("[]"));
//! ```

mod file;
mod in_memory;

use std::sync::Arc;

use crate::error::StorageError;

/// Whole-blob key/value persistence.
///
/// `set` must not return until the value is durable for the backend: a later
/// `get` (from this or a freshly opened handle) observes it.
pub trait BlobStorage: Send + Sync {
    /// Read the blob stored under `key`. `Ok(None)` when nothing was ever written.
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Replace the blob stored under `key`.
    fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;
}

impl<T: BlobStorage + ?Sized> BlobStorage for Arc<T> {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        (**self).set(key, value)
    }
}

pub use file::FileStorage;
pub use in_memory::InMemoryStorage;
