use std::fmt;

/// Errors raised by a [`BlobStorage`](crate::BlobStorage) backend.
#[derive(Debug)]
pub enum StorageError {
    /// File I/O error.
    Io(std::io::Error),
    /// The write would grow the medium past its quota.
    QuotaExceeded {
        key: String,
        limit: usize,
        requested: usize,
    },
    LockPoisoned(&'static str),
}

impl fmt::Display for StorageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StorageError::Io(err) => write!(f, "storage I/O error: {}", err),
            StorageError::QuotaExceeded {
                key,
                limit,
                requested,
            } => write!(
                f,
                "storage quota exceeded writing {} ({} bytes requested, limit {})",
                key, requested, limit
            ),
            StorageError::LockPoisoned(operation) => {
                write!(f, "storage lock poisoned during {}", operation)
            }
        }
    }
}

impl std::error::Error for StorageError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            StorageError::Io(err) => Some(err),
            _ => None,
        }
    }
}

impl From<std::io::Error> for StorageError {
    fn from(err: std::io::Error) -> Self {
        StorageError::Io(err)
    }
}

/// Errors surfaced to callers of store, aggregator and facade operations.
///
/// Only data-integrity failures show up here. A blob that fails to decode on
/// load is treated as an empty store, and a denied notification permission is
/// not an error at all.
#[derive(Debug)]
pub enum StoreError {
    /// Writing the snapshot to the medium failed. The in-memory sequence is
    /// unchanged and still matches the last durable state.
    Persistence { key: String, source: StorageError },
    /// No record with this id exists. Nothing was changed.
    NotFound { collection: String, id: String },
    /// Encoding the snapshot failed. Nothing was changed.
    Serialization(String),
    /// A rating fell outside the accepted range. Nothing was changed.
    InvalidScore { score: i64, min: i64, max: i64 },
}

impl StoreError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, StoreError::NotFound { .. })
    }

    pub fn is_persistence(&self) -> bool {
        matches!(self, StoreError::Persistence { .. })
    }
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoreError::Persistence { key, source } => {
                write!(f, "failed to persist {}: {}", key, source)
            }
            StoreError::NotFound { collection, id } => {
                write!(f, "record not found: {}:{}", collection, id)
            }
            StoreError::Serialization(msg) => write!(f, "record serialization error: {}", msg),
            StoreError::InvalidScore { score, min, max } => {
                write!(f, "score {} outside accepted range {}..={}", score, min, max)
            }
        }
    }
}

impl std::error::Error for StoreError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            StoreError::Persistence { source, .. } => Some(source),
            _ => None,
        }
    }
}
