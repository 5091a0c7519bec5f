use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::error::StoreError;
use crate::rating::{RatingAggregator, Ratings, ScoreRange};
use crate::record::{IdGenerator, Record};
use crate::storage::BlobStorage;
use crate::store::RecordStore;
use crate::{Collection, Rated};

/// A community safety tip.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Collection, Rated)]
#[collection(key = "consejos-storage", state_field = "consejos")]
pub struct SafetyTip {
    #[serde(rename = "usuarioId")]
    pub author_id: String,
    #[serde(rename = "categoria")]
    pub category: String,
    #[serde(rename = "titulo")]
    pub title: String,
    #[serde(rename = "descripcion")]
    pub description: String,
    #[serde(rename = "imagen", default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(rename = "consejos", default)]
    pub steps: Vec<String>,
    #[rated]
    #[serde(rename = "calificaciones", default)]
    pub ratings: Ratings<u8>,
}

/// What a user submits; ratings start empty.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct NewTip {
    pub author_id: String,
    pub category: String,
    pub title: String,
    pub description: String,
    pub image: Option<String>,
    pub steps: Vec<String>,
}

impl From<NewTip> for SafetyTip {
    fn from(tip: NewTip) -> Self {
        SafetyTip {
            author_id: tip.author_id,
            category: tip.category,
            title: tip.title,
            description: tip.description,
            image: tip.image,
            steps: tip.steps,
            ratings: Ratings::new(),
        }
    }
}

/// Safety tips with star ratings and category filtering.
pub struct TipStore<S> {
    records: RecordStore<SafetyTip, S>,
    range: ScoreRange<u8>,
}

impl<S> Clone for TipStore<S> {
    fn clone(&self) -> Self {
        TipStore {
            records: self.records.clone(),
            range: self.range,
        }
    }
}

impl<S: BlobStorage> TipStore<S> {
    pub fn open(storage: S) -> Self {
        Self::from_store(RecordStore::open(storage))
    }

    pub fn from_store(records: RecordStore<SafetyTip, S>) -> Self {
        TipStore {
            records,
            range: ScoreRange::<u8>::STARS,
        }
    }

    pub fn with_score_range(mut self, range: ScoreRange<u8>) -> Self {
        self.range = range;
        self
    }

    pub fn with_id_generator(mut self, ids: impl IdGenerator + 'static) -> Self {
        self.records = self.records.with_id_generator(ids);
        self
    }

    pub fn records(&self) -> &RecordStore<SafetyTip, S> {
        &self.records
    }

    fn ratings(&self) -> RatingAggregator<'_, SafetyTip, S> {
        RatingAggregator::new(&self.records).with_range(self.range)
    }

    pub fn add(&self, tip: NewTip) -> Result<Record<SafetyTip>, StoreError> {
        self.records.append(tip.into())
    }

    pub fn rate(&self, tip_id: &str, actor_id: &str, score: u8) -> Result<Record<SafetyTip>, StoreError> {
        self.ratings().rate(tip_id, actor_id, score)
    }

    pub fn average_for(&self, tip_id: &str) -> f64 {
        self.ratings().average_for(tip_id)
    }

    pub fn count_for(&self, tip_id: &str) -> usize {
        self.ratings().count_for(tip_id)
    }

    pub fn score_by(&self, tip_id: &str, actor_id: &str) -> Option<u8> {
        self.ratings().score_by(tip_id, actor_id)
    }

    pub fn list(&self) -> Vec<Record<SafetyTip>> {
        self.records.list()
    }

    pub fn get(&self, id: &str) -> Option<Record<SafetyTip>> {
        self.records.get(id)
    }

    pub fn by_category(&self, category: &str) -> Vec<Record<SafetyTip>> {
        self.records.find(|record| record.category == category)
    }

    /// Distinct categories in the order they first appear, newest first.
    pub fn categories(&self) -> Vec<String> {
        let mut seen = HashSet::new();
        let mut categories = Vec::new();
        for record in self.records.list() {
            let category = record.into_payload().category;
            if seen.insert(category.clone()) {
                categories.push(category);
            }
        }
        categories
    }
}
