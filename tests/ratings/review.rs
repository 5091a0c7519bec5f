use beacon_store::{
    Collection, InMemoryStorage, Rated, RatingAggregator, Ratings, RecordStore, ScoreRange,
    StoreError,
};
use serde::{Deserialize, Serialize};

/// A payload with no explicit key and a signed score type.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, Collection, Rated)]
pub struct VenueReview {
    pub venue: String,
    pub ratings: Ratings<i8>,
}

fn review(venue: &str) -> VenueReview {
    VenueReview {
        venue: venue.to_string(),
        ratings: Ratings::new(),
    }
}

#[test]
fn derived_key_defaults_to_snake_case_plural() {
    assert_eq!(VenueReview::STORAGE_KEY, "venue_reviews");
}

#[test]
fn aggregator_over_custom_payload() {
    let store = RecordStore::<VenueReview, _>::open(InMemoryStorage::new());
    let park = store.append(review("park")).unwrap();
    let ratings = RatingAggregator::new(&store).with_range(ScoreRange::new(-2, 2).unwrap());

    ratings.rate(park.id(), "ana", 2).unwrap();
    ratings.rate(park.id(), "luis", -1).unwrap();
    ratings.rate(park.id(), "ana", 1).unwrap();

    assert_eq!(ratings.count_for(park.id()), 2);
    assert_eq!(ratings.average_for(park.id()), 0.0);
    assert_eq!(ratings.score_by(park.id(), "ana"), Some(1));
    assert_eq!(store.get(park.id()).unwrap().ratings().len(), 2);
}

#[test]
fn out_of_range_and_missing_records() {
    let store = RecordStore::<VenueReview, _>::open(InMemoryStorage::new());
    let park = store.append(review("park")).unwrap();
    let ratings = RatingAggregator::new(&store).with_range(ScoreRange::new(-2, 2).unwrap());
    let revision = store.revision();

    let err = ratings.rate(park.id(), "ana", 3).unwrap_err();
    assert!(matches!(
        err,
        StoreError::InvalidScore {
            score: 3,
            min: -2,
            max: 2
        }
    ));
    assert_eq!(store.revision(), revision);

    let err = ratings.rate("missing", "ana", 1).unwrap_err();
    assert!(err.is_not_found());
    assert_eq!(ratings.average_for("missing"), 0.0);
    assert_eq!(ratings.count_for("missing"), 0);
}

#[test]
fn unbounded_aggregator_accepts_any_score() {
    let store = RecordStore::<VenueReview, _>::open(InMemoryStorage::new());
    let park = store.append(review("park")).unwrap();

    RatingAggregator::new(&store)
        .rate(park.id(), "ana", i8::MIN)
        .unwrap();
    assert_eq!(
        RatingAggregator::new(&store).score_by(park.id(), "ana"),
        Some(i8::MIN)
    );
}
