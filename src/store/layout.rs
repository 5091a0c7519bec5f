//! Blob layout - How a record sequence is laid out inside its blob.
//!
//! Two layouts are understood:
//! - a bare JSON array of records, newest first
//! - a persisted-state envelope `{"state": {"<field>": [...]}, "version": 0}`,
//!   used by collections whose [`Collection::STATE_FIELD`] is set
//!
//! Envelope collections also accept a bare array on read, and always write
//! the envelope.

use std::iter;

use serde::ser::{Serialize, SerializeMap, SerializeStruct, Serializer};
use serde_json::Value;

use crate::record::{Collection, Record};

/// Version written into new envelopes.
const ENVELOPE_VERSION: u64 = 0;

pub(super) fn decode<P: Collection>(blob: &str) -> Result<Vec<Record<P>>, serde_json::Error> {
    let value: Value = serde_json::from_str(blob)?;

    let records = match (P::STATE_FIELD, value) {
        (Some(field), Value::Object(mut envelope)) => {
            let found = envelope
                .get_mut("state")
                .and_then(|state| state.get_mut(field))
                .map(Value::take);
            match found {
                Some(records) => records,
                // An envelope without our field holds no records yet.
                None => return Ok(Vec::new()),
            }
        }
        (_, value) => value,
    };

    serde_json::from_value(records)
}

pub(super) fn encode<P: Collection>(pending: &Pending<'_, P>) -> Result<String, serde_json::Error> {
    match P::STATE_FIELD {
        Some(field) => serde_json::to_string(&Envelope { field, pending }),
        None => serde_json::to_string(pending),
    }
}

/// The stored sequence as it will look once a change is applied, serialized
/// without touching the live sequence.
pub(super) enum Pending<'a, P> {
    Prepend {
        record: &'a Record<P>,
        records: &'a [Record<P>],
    },
    Replace {
        index: usize,
        record: &'a Record<P>,
        records: &'a [Record<P>],
    },
}

impl<P> Pending<'_, P> {
    pub(super) fn len(&self) -> usize {
        match self {
            Pending::Prepend { records, .. } => records.len() + 1,
            Pending::Replace { records, .. } => records.len(),
        }
    }
}

impl<P: Serialize> Serialize for Pending<'_, P> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match *self {
            Pending::Prepend { record, records } => {
                serializer.collect_seq(iter::once(record).chain(records))
            }
            Pending::Replace {
                index,
                record,
                records,
            } => serializer.collect_seq(
                records
                    .iter()
                    .enumerate()
                    .map(|(i, current)| if i == index { record } else { current }),
            ),
        }
    }
}

struct Envelope<'a, 'b, P> {
    field: &'static str,
    pending: &'a Pending<'b, P>,
}

struct State<'a, 'b, P> {
    field: &'static str,
    pending: &'a Pending<'b, P>,
}

impl<P: Serialize> Serialize for Envelope<'_, '_, P> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut envelope = serializer.serialize_struct("Envelope", 2)?;
        envelope.serialize_field(
            "state",
            &State {
                field: self.field,
                pending: self.pending,
            },
        )?;
        envelope.serialize_field("version", &ENVELOPE_VERSION)?;
        envelope.end()
    }
}

impl<P: Serialize> Serialize for State<'_, '_, P> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_map(Some(1))?;
        state.serialize_entry(self.field, self.pending)?;
        state.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use serde::{Deserialize, Serialize};

    #[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
    struct Plain {
        text: String,
    }

    impl Collection for Plain {
        const STORAGE_KEY: &'static str = "plain";
    }

    #[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
    struct Wrapped {
        text: String,
    }

    impl Collection for Wrapped {
        const STORAGE_KEY: &'static str = "wrapped-storage";
        const STATE_FIELD: Option<&'static str> = Some("items");
    }

    fn record<P>(id: &str, payload: P) -> Record<P> {
        let at = Utc.with_ymd_and_hms(2024, 5, 10, 12, 0, 0).unwrap();
        Record::new(id.to_string(), payload, at)
    }

    #[test]
    fn envelope_round_trip() {
        let existing = vec![record("a", Wrapped { text: "old".into() })];
        let new = record("b", Wrapped { text: "new".into() });
        let blob = encode(&Pending::Prepend {
            record: &new,
            records: &existing,
        })
        .unwrap();

        let json: Value = serde_json::from_str(&blob).unwrap();
        assert_eq!(json["version"], 0);
        assert_eq!(json["state"]["items"][0]["id"], "b");
        assert_eq!(json["state"]["items"][1]["id"], "a");

        let decoded: Vec<Record<Wrapped>> = decode(&blob).unwrap();
        assert_eq!(decoded, vec![new, existing[0].clone()]);
    }

    #[test]
    fn envelope_collections_accept_bare_arrays() {
        let blob = r#"[{"id":"a","text":"t","fecha":"2024-05-10T12:00:00Z"}]"#;
        let decoded: Vec<Record<Wrapped>> = decode(blob).unwrap();
        assert_eq!(decoded[0].id(), "a");
    }

    #[test]
    fn envelope_without_field_is_empty() {
        let decoded: Vec<Record<Wrapped>> = decode(r#"{"state":{},"version":0}"#).unwrap();
        assert!(decoded.is_empty());
    }

    #[test]
    fn plain_collections_reject_objects() {
        assert!(decode::<Plain>(r#"{"state":{"items":[]},"version":0}"#).is_err());
    }

    #[test]
    fn replace_swaps_only_the_indexed_record() {
        let existing = vec![
            record("a", Plain { text: "1".into() }),
            record("b", Plain { text: "2".into() }),
        ];
        let changed = record("b", Plain { text: "2!".into() });
        let pending = Pending::Replace {
            index: 1,
            record: &changed,
            records: &existing,
        };
        assert_eq!(pending.len(), 2);

        let decoded: Vec<Record<Plain>> = decode(&encode(&pending).unwrap()).unwrap();
        assert_eq!(decoded[0], existing[0]);
        assert_eq!(decoded[1].text, "2!");
    }
}
