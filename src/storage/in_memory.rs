//! InMemoryStorage - HashMap-backed medium for tests and embedded use.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use super::BlobStorage;
use crate::error::StorageError;

/// In-memory blob storage backed by a HashMap.
///
/// Clone-friendly via Arc: clones share the same blobs, which is how tests
/// simulate a reload (open a second store over a clone of the medium).
#[derive(Clone, Default)]
pub struct InMemoryStorage {
    blobs: Arc<RwLock<HashMap<String, String>>>,
    quota: Option<usize>,
}

impl InMemoryStorage {
    /// Create a new empty medium with no quota.
    pub fn new() -> Self {
        Self::default()
    }

    /// Reject writes that would make the total stored bytes exceed `bytes`.
    pub fn with_quota(mut self, bytes: usize) -> Self {
        self.quota = Some(bytes);
        self
    }

    /// Total bytes currently stored (keys plus values).
    pub fn used_bytes(&self) -> usize {
        self.blobs
            .read()
            .map(|blobs| footprint(&blobs))
            .unwrap_or_default()
    }
}

fn footprint(blobs: &HashMap<String, String>) -> usize {
    blobs.iter().map(|(k, v)| k.len() + v.len()).sum()
}

impl BlobStorage for InMemoryStorage {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let blobs = self
            .blobs
            .read()
            .map_err(|_| StorageError::LockPoisoned("read"))?;
        Ok(blobs.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let mut blobs = self
            .blobs
            .write()
            .map_err(|_| StorageError::LockPoisoned("write"))?;

        if let Some(limit) = self.quota {
            let current = footprint(&blobs);
            let replaced = blobs.get(key).map(|v| key.len() + v.len()).unwrap_or(0);
            let requested = current - replaced + key.len() + value.len();
            if requested > limit {
                return Err(StorageError::QuotaExceeded {
                    key: key.to_string(),
                    limit,
                    requested,
                });
            }
        }

        blobs.insert(key.to_string(), value.to_string());
        Ok(())
    }
}
