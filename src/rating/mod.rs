//! Ratings - Per-actor scores on records and their running averages.
//!
//! Scores live inside the rated payload, keyed by actor, so the record store
//! stays the single source of truth and "rate again" replaces the actor's
//! earlier score instead of adding a second one.
//!
//! ## Example
//!
//! ```ignore
//! use beacon_store::{RatingAggregator, Ratings, Rated, ScoreRange};
//!
//! #[derive(Clone, Serialize, Deserialize, Collection, Rated)]
//! struct SafetyTip {
//!     title: String,
//!     #[rated]
//!     calificaciones: Ratings<u8>,
//! }
//!
//! let ratings = RatingAggregator::new(&store).with_range(ScoreRange::STARS);
//! ratings.rate(tip.id(), "ana", 4)?;
//! ratings.rate(tip.id(), "luis", 2)?;
//! ratings.rate(tip.id(), "ana", 4)?; // no change
//! assert_eq!(ratings.average_for(tip.id()), 3.0);
//! assert_eq!(ratings.count_for(tip.id()), 2);
//! ```

mod aggregator;
mod ratings;

use crate::record::Collection;

/// Trait for payloads that carry per-actor ratings.
pub trait Rated: Collection {
    type Score: Score;

    fn ratings(&self) -> &Ratings<Self::Score>;

    fn ratings_mut(&mut self) -> &mut Ratings<Self::Score>;
}

pub use aggregator::RatingAggregator;
pub use ratings::{Ratings, Score, ScoreRange};
