//! Records - The envelope every persisted domain payload travels in.
//!
//! A record pairs an immutable identity and creation timestamp with a domain
//! payload. Persisted records flatten the payload next to the envelope fields:
//!
//! ```text
//! { "id": "V1StGXR8_Z5jdHi6B-myT", "tipo": "robo", ..., "fecha": "2024-03-01T18:22:04.512Z" }
//! ```

mod id;

use chrono::{DateTime, Utc};
use serde::{de::DeserializeOwned, Deserialize, Serialize};

pub use id::{IdGenerator, SequentialIds, UuidGenerator};

/// Trait for payload types that can be kept in a record store.
pub trait Collection: Serialize + DeserializeOwned + Clone + Send + Sync + 'static {
    /// Default blob key the store persists this collection under
    /// (e.g. "incidentes"). Maps to one `localStorage` entry, one file, etc.
    const STORAGE_KEY: &'static str;

    /// When set, the blob is a persisted-state envelope
    /// `{"state": {"<field>": [...]}, "version": 0}` instead of a bare array.
    const STATE_FIELD: Option<&'static str> = None;
}

/// A persisted domain record.
///
/// `id` and `created_at` are fixed when the store creates the record; only the
/// payload can change afterwards, and only through the store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record<P> {
    id: String,
    #[serde(flatten)]
    payload: P,
    #[serde(rename = "fecha", alias = "timestamp")]
    created_at: DateTime<Utc>,
}

impl<P> Record<P> {
    pub(crate) fn new(id: String, payload: P, created_at: DateTime<Utc>) -> Self {
        Record {
            id,
            payload,
            created_at,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn payload(&self) -> &P {
        &self.payload
    }

    pub fn into_payload(self) -> P {
        self.payload
    }

    pub(crate) fn payload_mut(&mut self) -> &mut P {
        &mut self.payload
    }
}

impl<P> std::ops::Deref for Record<P> {
    type Target = P;

    fn deref(&self) -> &P {
        &self.payload
    }
}
