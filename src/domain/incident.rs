use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::StoreError;
use crate::notifier::{Notification, Notify};
use crate::record::{IdGenerator, Record};
use crate::storage::BlobStorage;
use crate::store::RecordStore;
use crate::Collection;

/// What kind of incident was reported. Persisted with the app's Spanish names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum IncidentKind {
    #[serde(rename = "robo")]
    Theft,
    #[serde(rename = "vandalismo")]
    Vandalism,
    #[serde(rename = "sospechoso")]
    Suspicious,
    #[serde(rename = "accidente")]
    Accident,
}

impl IncidentKind {
    pub const ALL: [IncidentKind; 4] = [
        IncidentKind::Theft,
        IncidentKind::Vandalism,
        IncidentKind::Suspicious,
        IncidentKind::Accident,
    ];

    /// The persisted name.
    pub fn as_str(&self) -> &'static str {
        match self {
            IncidentKind::Theft => "robo",
            IncidentKind::Vandalism => "vandalismo",
            IncidentKind::Suspicious => "sospechoso",
            IncidentKind::Accident => "accidente",
        }
    }
}

impl fmt::Display for IncidentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownIncidentKind(pub String);

impl fmt::Display for UnknownIncidentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown incident kind: {}", self.0)
    }
}

impl std::error::Error for UnknownIncidentKind {}

impl FromStr for IncidentKind {
    type Err = UnknownIncidentKind;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        IncidentKind::ALL
            .into_iter()
            .find(|kind| kind.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| UnknownIncidentKind(s.to_string()))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub lat: f64,
    pub lng: f64,
}

/// A neighborhood incident report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Collection)]
#[collection(key = "incidentes")]
pub struct Incident {
    #[serde(rename = "tipo")]
    pub kind: IncidentKind,
    #[serde(rename = "descripcion")]
    pub description: String,
    #[serde(rename = "ubicacion")]
    pub location: Location,
    #[serde(rename = "imagen", default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(rename = "usuarioId")]
    pub reporter_id: String,
}

impl Notify for Incident {
    fn notification(&self, default_icon: &str) -> Notification {
        Notification {
            title: "New alert".to_string(),
            body: format!("{}: {}", self.kind, self.description),
            icon: self
                .image
                .clone()
                .filter(|image| !image.is_empty())
                .unwrap_or_else(|| default_icon.to_string()),
        }
    }
}

/// Incident reports. No ratings.
pub struct IncidentStore<S> {
    records: RecordStore<Incident, S>,
}

impl<S> Clone for IncidentStore<S> {
    fn clone(&self) -> Self {
        IncidentStore {
            records: self.records.clone(),
        }
    }
}

impl<S: BlobStorage> IncidentStore<S> {
    pub fn open(storage: S) -> Self {
        Self::from_store(RecordStore::open(storage))
    }

    pub fn from_store(records: RecordStore<Incident, S>) -> Self {
        IncidentStore { records }
    }

    pub fn with_id_generator(self, ids: impl IdGenerator + 'static) -> Self {
        Self::from_store(self.records.with_id_generator(ids))
    }

    /// The underlying store, for notifiers and snapshot polling.
    pub fn records(&self) -> &RecordStore<Incident, S> {
        &self.records
    }

    pub fn report(&self, incident: Incident) -> Result<Record<Incident>, StoreError> {
        self.records.append(incident)
    }

    pub fn list(&self) -> Vec<Record<Incident>> {
        self.records.list()
    }

    pub fn get(&self, id: &str) -> Option<Record<Incident>> {
        self.records.get(id)
    }

    pub fn by_kind(&self, kind: IncidentKind) -> Vec<Record<Incident>> {
        self.records.find(|record| record.kind == kind)
    }
}
