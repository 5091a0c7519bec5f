use std::collections::BTreeMap;
use std::fmt;

use serde::de::{Deserialize, DeserializeOwned, Deserializer};
use serde::ser::{Serialize, Serializer};

use crate::error::StoreError;

/// Numeric score type for ratings.
pub trait Score:
    Copy + Ord + fmt::Debug + Serialize + DeserializeOwned + Send + Sync + 'static
{
    fn to_f64(self) -> f64;
    fn to_i64(self) -> i64;
}

macro_rules! impl_score {
    ($($ty:ty),*) => {
        $(
            impl Score for $ty {
                fn to_f64(self) -> f64 {
                    self as f64
                }

                fn to_i64(self) -> i64 {
                    self as i64
                }
            }
        )*
    };
}

impl_score!(u8, u16, u32, i8, i16, i32, i64);

/// Inclusive bounds a score must fall within.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScoreRange<S> {
    min: S,
    max: S,
}

impl<S: Score> ScoreRange<S> {
    /// `None` if `min > max`.
    pub fn new(min: S, max: S) -> Option<Self> {
        (min <= max).then_some(ScoreRange { min, max })
    }

    pub fn min(&self) -> S {
        self.min
    }

    pub fn max(&self) -> S {
        self.max
    }

    pub fn contains(&self, score: S) -> bool {
        self.min <= score && score <= self.max
    }

    pub fn check(&self, score: S) -> Result<S, StoreError> {
        if self.contains(score) {
            Ok(score)
        } else {
            Err(StoreError::InvalidScore {
                score: score.to_i64(),
                min: self.min.to_i64(),
                max: self.max.to_i64(),
            })
        }
    }
}

impl ScoreRange<u8> {
    /// The 1 to 5 star scale used across the app.
    pub const STARS: ScoreRange<u8> = ScoreRange { min: 1, max: 5 };
}

/// Ratings attached to one record: at most one score per actor.
///
/// Persisted as an array of `{"usuarioId": ..., "valor": ...}` objects. When
/// an array repeats an actor, the later entry wins.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ratings<S> {
    scores: BTreeMap<String, S>,
}

impl<S> Default for Ratings<S> {
    fn default() -> Self {
        Ratings {
            scores: BTreeMap::new(),
        }
    }
}

impl<S: Score> Ratings<S> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set `actor`'s score, replacing any earlier one. Returns the replaced score.
    pub fn upsert(&mut self, actor: impl Into<String>, score: S) -> Option<S> {
        self.scores.insert(actor.into(), score)
    }

    pub fn get(&self, actor: &str) -> Option<S> {
        self.scores.get(actor).copied()
    }

    /// Number of distinct actors who rated.
    pub fn len(&self) -> usize {
        self.scores.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scores.is_empty()
    }

    /// Arithmetic mean, or `0.0` when nobody rated.
    pub fn average(&self) -> f64 {
        if self.scores.is_empty() {
            return 0.0;
        }
        let sum: f64 = self.scores.values().map(|s| s.to_f64()).sum();
        sum / self.scores.len() as f64
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, S)> + '_ {
        self.scores.iter().map(|(actor, score)| (actor.as_str(), *score))
    }
}

impl<S: Score> FromIterator<(String, S)> for Ratings<S> {
    fn from_iter<I: IntoIterator<Item = (String, S)>>(iter: I) -> Self {
        let mut ratings = Ratings::new();
        for (actor, score) in iter {
            ratings.upsert(actor, score);
        }
        ratings
    }
}

#[derive(serde::Serialize)]
#[serde(rename_all = "camelCase")]
struct RatingEntryRef<'a, S> {
    usuario_id: &'a str,
    valor: S,
}

#[derive(serde::Deserialize)]
#[serde(rename_all = "camelCase")]
struct RatingEntry<S> {
    usuario_id: String,
    valor: S,
}

impl<S: Score> Serialize for Ratings<S> {
    fn serialize<Z: Serializer>(&self, serializer: Z) -> Result<Z::Ok, Z::Error> {
        serializer.collect_seq(self.scores.iter().map(|(actor, score)| RatingEntryRef {
            usuario_id: actor,
            valor: *score,
        }))
    }
}

impl<'de, S: Score> Deserialize<'de> for Ratings<S> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let entries = Vec::<RatingEntry<S>>::deserialize(deserializer)?;
        Ok(entries
            .into_iter()
            .map(|entry| (entry.usuario_id, entry.valor))
            .collect())
    }
}
