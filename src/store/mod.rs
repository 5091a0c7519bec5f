//! Record Store - The durable, newest-first collection behind every domain.
//!
//! A `RecordStore` owns the canonical sequence of records for one payload type
//! and writes the whole sequence to its blob before any mutation returns. The
//! new sequence is encoded and written first and only swapped in once the
//! write succeeded, so what callers can read is always what is durable.
//!
//! ## Example
//!
//! ```ignore
//! use beacon_store::{InMemoryStorage, RecordStore};
//!
//! let storage = InMemoryStorage::new();
//! let store = RecordStore::<Incident, _>::open(storage.clone());
//!
//! let first = store.append(robbery)?;
//! let second = store.append(vandalism)?;
//! assert_eq!(store.list()[0].id(), second.id()); // newest first
//!
//! // A second handle over the same medium sees the same records.
//! let reopened = RecordStore::<Incident, _>::open(storage);
//! assert_eq!(reopened.list(), store.list());
//! ```

mod layout;

use std::collections::HashSet;
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use chrono::Utc;

use crate::error::StoreError;
use crate::record::{Collection, IdGenerator, Record, UuidGenerator};
use crate::storage::BlobStorage;
use layout::Pending;

/// Point-in-time copy of a store.
#[derive(Debug, Clone, PartialEq)]
pub struct Snapshot<P> {
    /// Bumps on every durable mutation and on every reload.
    pub revision: u64,
    /// Records, newest first.
    pub records: Vec<Record<P>>,
}

struct StoreState<P> {
    records: Vec<Record<P>>,
    revision: u64,
}

/// Durable record store for one payload type.
///
/// Clone-friendly via Arc: clones share the same records and medium, so a UI
/// handle and a notifier thread observe the same sequence.
pub struct RecordStore<P, S> {
    key: Arc<str>,
    storage: Arc<S>,
    ids: Arc<dyn IdGenerator>,
    state: Arc<RwLock<StoreState<P>>>,
}

impl<P, S> Clone for RecordStore<P, S> {
    fn clone(&self) -> Self {
        RecordStore {
            key: Arc::clone(&self.key),
            storage: Arc::clone(&self.storage),
            ids: Arc::clone(&self.ids),
            state: Arc::clone(&self.state),
        }
    }
}

impl<P, S> RecordStore<P, S>
where
    P: Collection,
    S: BlobStorage,
{
    /// Open the store under the payload's default key and load persisted state.
    pub fn open(storage: S) -> Self {
        Self::open_with_key(storage, P::STORAGE_KEY)
    }

    /// Open the store under an explicit key and load persisted state.
    pub fn open_with_key(storage: S, key: impl Into<String>) -> Self {
        let key: String = key.into();
        let store = RecordStore {
            key: Arc::from(key),
            storage: Arc::new(storage),
            ids: Arc::new(UuidGenerator),
            state: Arc::new(RwLock::new(StoreState {
                records: Vec::new(),
                revision: 0,
            })),
        };
        store.load();
        store
    }

    /// Use a different identity generator for records appended from now on.
    pub fn with_id_generator(mut self, ids: impl IdGenerator + 'static) -> Self {
        self.ids = Arc::new(ids);
        self
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    /// Replace the in-memory sequence with whatever the medium holds.
    ///
    /// A missing, empty, unreadable or malformed blob loads as an empty store;
    /// this never fails. Returns the number of records loaded.
    pub fn load(&self) -> usize {
        let records = self.read_persisted();
        let count = records.len();

        let mut state = self.write();
        state.records = records;
        state.revision += 1;

        tracing::debug!(key = %self.key, records = count, "record store loaded");
        count
    }

    fn read_persisted(&self) -> Vec<Record<P>> {
        let blob = match self.storage.get(&self.key) {
            Ok(Some(blob)) if !blob.trim().is_empty() => blob,
            Ok(_) => return Vec::new(),
            Err(err) => {
                tracing::warn!(key = %self.key, error = %err, "unreadable storage, starting empty");
                return Vec::new();
            }
        };

        let records: Vec<Record<P>> = match layout::decode(&blob) {
            Ok(records) => records,
            Err(err) => {
                tracing::warn!(key = %self.key, error = %err, "corrupt storage, starting empty");
                return Vec::new();
            }
        };

        // Keep the newest occurrence if an older blob carries a repeated id.
        let mut seen = HashSet::with_capacity(records.len());
        let total = records.len();
        let unique: Vec<Record<P>> = records
            .into_iter()
            .filter(|record| seen.insert(record.id().to_string()))
            .collect();
        if unique.len() != total {
            tracing::warn!(
                key = %self.key,
                dropped = total - unique.len(),
                "duplicate record ids in storage"
            );
        }
        unique
    }

    /// Create a record for `payload` with a fresh id and the current time,
    /// make it the newest record and persist.
    ///
    /// All-or-nothing: on error the store is unchanged.
    pub fn append(&self, payload: P) -> Result<Record<P>, StoreError> {
        let mut state = self.write();

        let id = self.fresh_id(&state.records);
        let record = Record::new(id, payload, Utc::now());

        self.persist(&Pending::Prepend {
            record: &record,
            records: &state.records,
        })?;
        state.records.insert(0, record.clone());
        state.revision += 1;

        tracing::debug!(key = %self.key, id = %record.id(), "record appended");
        Ok(record)
    }

    /// Apply `mutator` to the payload of record `id` and persist.
    ///
    /// Identity and creation time are untouched. On error the store is
    /// unchanged, and so it is if `mutator` panics. `mutator` runs while the
    /// store is locked for writing and must not call back into this store.
    pub fn update<F>(&self, id: &str, mutator: F) -> Result<Record<P>, StoreError>
    where
        F: FnOnce(&mut P),
    {
        let mut state = self.write();

        let index = state
            .records
            .iter()
            .position(|record| record.id() == id)
            .ok_or_else(|| StoreError::NotFound {
                collection: self.key.to_string(),
                id: id.to_string(),
            })?;

        let mut updated = state.records[index].clone();
        mutator(updated.payload_mut());

        self.persist(&Pending::Replace {
            index,
            record: &updated,
            records: &state.records,
        })?;
        state.records[index] = updated.clone();
        state.revision += 1;

        tracing::debug!(key = %self.key, id = %id, "record updated");
        Ok(updated)
    }

    /// Newest-first copy of every record.
    pub fn list(&self) -> Vec<Record<P>> {
        self.read().records.clone()
    }

    pub fn snapshot(&self) -> Snapshot<P> {
        let state = self.read();
        Snapshot {
            revision: state.revision,
            records: state.records.clone(),
        }
    }

    /// Cheap change check for pollers: re-read when this moves.
    pub fn revision(&self) -> u64 {
        self.read().revision
    }

    pub fn get(&self, id: &str) -> Option<Record<P>> {
        self.read()
            .records
            .iter()
            .find(|record| record.id() == id)
            .cloned()
    }

    /// Newest-first copy of the records matching `predicate`.
    pub fn find<F>(&self, predicate: F) -> Vec<Record<P>>
    where
        F: Fn(&Record<P>) -> bool,
    {
        self.read()
            .records
            .iter()
            .filter(|record| predicate(record))
            .cloned()
            .collect()
    }

    pub fn len(&self) -> usize {
        self.read().records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Writers change the sequence only after a successful write, and every
    /// caller-supplied step runs before that point, so a lock poisoned by a
    /// panic still guards a consistent sequence.
    fn read(&self) -> RwLockReadGuard<'_, StoreState<P>> {
        self.state.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, StoreState<P>> {
        self.state.write().unwrap_or_else(PoisonError::into_inner)
    }

    fn fresh_id(&self, records: &[Record<P>]) -> String {
        for _ in 0..8 {
            let id = self.ids.next_id();
            if !records.iter().any(|record| record.id() == id) {
                return id;
            }
            tracing::warn!(key = %self.key, id = %id, "generated id already in use, retrying");
        }
        // A generator that keeps colliding is broken; fall back to random ids.
        loop {
            let id = UuidGenerator.next_id();
            if !records.iter().any(|record| record.id() == id) {
                return id;
            }
        }
    }

    fn persist(&self, pending: &Pending<'_, P>) -> Result<(), StoreError> {
        let blob = layout::encode(pending).map_err(|e| StoreError::Serialization(e.to_string()))?;

        self.storage.set(&self.key, &blob).map_err(|source| {
            tracing::warn!(key = %self.key, error = %source, "persisting record store failed");
            StoreError::Persistence {
                key: self.key.to_string(),
                source,
            }
        })?;

        tracing::trace!(key = %self.key, records = pending.len(), bytes = blob.len(), "record store persisted");
        Ok(())
    }
}
