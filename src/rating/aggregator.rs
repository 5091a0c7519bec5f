use super::{Rated, ScoreRange};
use crate::error::StoreError;
use crate::record::Record;
use crate::storage::BlobStorage;
use crate::store::RecordStore;

/// Rating operations over a record store whose payload is [`Rated`].
///
/// Holds no ratings of its own: every query reads the store's current
/// snapshot and every `rate` is a store update.
pub struct RatingAggregator<'a, P: Rated, S> {
    store: &'a RecordStore<P, S>,
    range: Option<ScoreRange<P::Score>>,
}

impl<'a, P, S> RatingAggregator<'a, P, S>
where
    P: Rated,
    S: BlobStorage,
{
    pub fn new(store: &'a RecordStore<P, S>) -> Self {
        RatingAggregator { store, range: None }
    }

    /// Reject scores outside `range` with `StoreError::InvalidScore`.
    pub fn with_range(mut self, range: ScoreRange<P::Score>) -> Self {
        self.range = Some(range);
        self
    }

    /// Set `actor_id`'s score on the record, replacing any score the same actor
    /// gave before. Rating twice with the same score leaves the same state as
    /// rating once.
    pub fn rate(
        &self,
        record_id: &str,
        actor_id: &str,
        score: P::Score,
    ) -> Result<Record<P>, StoreError> {
        if let Some(range) = &self.range {
            range.check(score)?;
        }

        let record = self.store.update(record_id, |payload| {
            payload.ratings_mut().upsert(actor_id, score);
        })?;

        tracing::debug!(
            key = %self.store.key(),
            record = %record_id,
            actor = %actor_id,
            score = ?score,
            "rating recorded"
        );
        Ok(record)
    }

    /// Mean score for the record; `0.0` when it has no ratings or does not exist.
    pub fn average_for(&self, record_id: &str) -> f64 {
        self.store
            .get(record_id)
            .map(|record| record.ratings().average())
            .unwrap_or(0.0)
    }

    /// Number of distinct actors who rated the record.
    pub fn count_for(&self, record_id: &str) -> usize {
        self.store
            .get(record_id)
            .map(|record| record.ratings().len())
            .unwrap_or(0)
    }

    /// The score `actor_id` gave, if any.
    pub fn score_by(&self, record_id: &str, actor_id: &str) -> Option<P::Score> {
        self.store
            .get(record_id)
            .and_then(|record| record.ratings().get(actor_id))
    }
}
