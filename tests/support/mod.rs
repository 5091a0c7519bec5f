//! Shared fixtures for the integration tests.

#![allow(dead_code)]

use beacon_store::{
    BlobStorage, InMemoryStorage, Incident, IncidentKind, Location, Notification,
    NotificationSink, Permission, StorageError,
};
use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

pub fn incident(kind: IncidentKind, description: &str) -> Incident {
    Incident {
        kind,
        description: description.to_string(),
        location: Location {
            lat: -34.6037,
            lng: -58.3816,
        },
        image: None,
        reporter_id: "user-1".to_string(),
    }
}

/// In-memory storage whose writes can be switched off, like a full or
/// read-only disk.
#[derive(Clone, Default)]
pub struct FlakyStorage {
    inner: InMemoryStorage,
    failing: Arc<AtomicBool>,
}

impl FlakyStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fail_writes(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    pub fn inner(&self) -> &InMemoryStorage {
        &self.inner
    }
}

impl BlobStorage for FlakyStorage {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        self.inner.get(key)
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(StorageError::Io(std::io::Error::new(
                std::io::ErrorKind::Other,
                "disk full",
            )));
        }
        self.inner.set(key, value)
    }
}

#[derive(Debug)]
pub struct SinkDown;

impl fmt::Display for SinkDown {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "sink down")
    }
}

/// Sink that records what it was handed and can be told to fail.
#[derive(Clone)]
pub struct RecordingSink {
    pub received: Arc<Mutex<Vec<Notification>>>,
    pub permission: Arc<Mutex<Permission>>,
    pub requests: Arc<Mutex<usize>>,
    pub failing: Arc<AtomicBool>,
}

impl RecordingSink {
    pub fn new(permission: Permission) -> Self {
        Self {
            received: Arc::new(Mutex::new(Vec::new())),
            permission: Arc::new(Mutex::new(permission)),
            requests: Arc::new(Mutex::new(0)),
            failing: Arc::new(AtomicBool::new(false)),
        }
    }

    pub fn granted() -> Self {
        Self::new(Permission::Granted)
    }

    pub fn set_permission(&self, permission: Permission) {
        *self.permission.lock().unwrap() = permission;
    }

    pub fn bodies(&self) -> Vec<String> {
        self.received
            .lock()
            .unwrap()
            .iter()
            .map(|n| n.body.clone())
            .collect()
    }
}

impl NotificationSink for RecordingSink {
    type Error = SinkDown;

    fn permission(&self) -> Permission {
        *self.permission.lock().unwrap()
    }

    fn request_permission(&mut self) -> Permission {
        *self.requests.lock().unwrap() += 1;
        self.permission()
    }

    fn notify(&mut self, notification: &Notification) -> Result<(), Self::Error> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(SinkDown);
        }
        self.received.lock().unwrap().push(notification.clone());
        Ok(())
    }
}
