use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::incident::IncidentKind;
use crate::error::StoreError;
use crate::rating::{RatingAggregator, Ratings, ScoreRange};
use crate::record::{IdGenerator, Record, UuidGenerator};
use crate::storage::BlobStorage;
use crate::store::RecordStore;
use crate::{Collection, Rated};

/// A comment left on a recommendation. Comments are append-only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Comment {
    pub id: String,
    #[serde(rename = "usuarioId")]
    pub author_id: String,
    #[serde(rename = "texto")]
    pub text: String,
    #[serde(rename = "fecha", alias = "timestamp")]
    pub created_at: DateTime<Utc>,
}

/// What to do about a given kind of incident.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Collection, Rated)]
#[collection(key = "recomendaciones-storage", state_field = "recomendaciones")]
pub struct Recommendation {
    #[serde(rename = "tipoIncidente")]
    pub incident_kind: IncidentKind,
    #[serde(rename = "titulo")]
    pub title: String,
    #[serde(rename = "descripcion")]
    pub description: String,
    #[serde(rename = "pasos", default)]
    pub steps: Vec<String>,
    #[serde(rename = "imagen", default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[rated]
    #[serde(rename = "calificaciones", default)]
    pub ratings: Ratings<u8>,
    #[serde(rename = "comentarios", default)]
    pub comments: Vec<Comment>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewRecommendation {
    pub incident_kind: IncidentKind,
    pub title: String,
    pub description: String,
    pub steps: Vec<String>,
    pub image: Option<String>,
}

impl From<NewRecommendation> for Recommendation {
    fn from(rec: NewRecommendation) -> Self {
        Recommendation {
            incident_kind: rec.incident_kind,
            title: rec.title,
            description: rec.description,
            steps: rec.steps,
            image: rec.image,
            ratings: Ratings::new(),
            comments: Vec::new(),
        }
    }
}

/// Recommendations per incident type, with ratings and comments.
pub struct RecommendationStore<S> {
    records: RecordStore<Recommendation, S>,
    range: ScoreRange<u8>,
    comment_ids: Arc<dyn IdGenerator>,
}

impl<S> Clone for RecommendationStore<S> {
    fn clone(&self) -> Self {
        RecommendationStore {
            records: self.records.clone(),
            range: self.range,
            comment_ids: self.comment_ids.clone(),
        }
    }
}

impl<S: BlobStorage> RecommendationStore<S> {
    pub fn open(storage: S) -> Self {
        Self::from_store(RecordStore::open(storage))
    }

    pub fn from_store(records: RecordStore<Recommendation, S>) -> Self {
        RecommendationStore {
            records,
            range: ScoreRange::<u8>::STARS,
            comment_ids: Arc::new(UuidGenerator),
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

    /// Id source for comments. Defaults to UUIDs.
    pub fn with_comment_ids(mut self, ids: impl IdGenerator + 'static) -> Self {
        self.comment_ids = Arc::new(ids);
        self
    }

    pub fn records(&self) -> &RecordStore<Recommendation, S> {
        &self.records
    }

    fn ratings(&self) -> RatingAggregator<'_, Recommendation, S> {
        RatingAggregator::new(&self.records).with_range(self.range)
    }

    pub fn add(&self, rec: NewRecommendation) -> Result<Record<Recommendation>, StoreError> {
        self.records.append(rec.into())
    }

    pub fn rate(
        &self,
        rec_id: &str,
        actor_id: &str,
        score: u8,
    ) -> Result<Record<Recommendation>, StoreError> {
        self.ratings().rate(rec_id, actor_id, score)
    }

    pub fn average_for(&self, rec_id: &str) -> f64 {
        self.ratings().average_for(rec_id)
    }

    pub fn count_for(&self, rec_id: &str) -> usize {
        self.ratings().count_for(rec_id)
    }

    /// Append a comment to the recommendation and persist it.
    pub fn comment(&self, rec_id: &str, actor_id: &str, text: &str) -> Result<Comment, StoreError> {
        let comment = Comment {
            id: self.comment_ids.next_id(),
            author_id: actor_id.to_string(),
            text: text.to_string(),
            created_at: Utc::now(),
        };

        let pushed = comment.clone();
        self.records.update(rec_id, move |rec| rec.comments.push(pushed))?;

        tracing::debug!(
            key = %self.records.key(),
            record = %rec_id,
            comment = %comment.id,
            "comment added"
        );
        Ok(comment)
    }

    /// Comments on the recommendation, oldest first. Empty if it does not exist.
    pub fn comments_for(&self, rec_id: &str) -> Vec<Comment> {
        self.records
            .get(rec_id)
            .map(|record| record.into_payload().comments)
            .unwrap_or_default()
    }

    pub fn by_incident_type(&self, kind: IncidentKind) -> Vec<Record<Recommendation>> {
        self.records.find(|record| record.incident_kind == kind)
    }

    pub fn count_by_incident_type(&self, kind: IncidentKind) -> usize {
        self.by_incident_type(kind).len()
    }

    pub fn list(&self) -> Vec<Record<Recommendation>> {
        self.records.list()
    }

    pub fn get(&self, id: &str) -> Option<Record<Recommendation>> {
        self.records.get(id)
    }
}
