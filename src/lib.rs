//! Durable local record stores for neighborhood-safety reports.
//!
//! - [`RecordStore`] keeps a newest-first collection in one storage blob and
//!   rewrites the blob on every mutation.
//! - [`RatingAggregator`] keeps one score per actor on rated records.
//! - [`ChangeFeedNotifier`] polls a store and announces each new record at
//!   most once.
//! - [`IncidentStore`], [`TipStore`] and [`RecommendationStore`] are the
//!   domain facades; [`Stores`] opens all three from a [`BeaconConfig`].

// Lets the derive macros refer to `beacon_store::...` from inside this crate.
extern crate self as beacon_store;

mod config;
mod domain;
mod error;
mod hub;
mod notifier;
mod rating;
mod record;
mod storage;
mod store;

pub use beacon_store_macros::{Collection, Rated};
pub use config::{BeaconConfig, ConfigError, NotifierConfig, RatingConfig, StorageKeys};
pub use domain::{
    Comment, Incident, IncidentKind, IncidentStore, Location, NewRecommendation, NewTip,
    Recommendation, RecommendationStore, SafetyTip, TipStore, UnknownIncidentKind,
};
pub use error::{StorageError, StoreError};
pub use hub::Stores;
#[cfg(feature = "emitter")]
pub use notifier::LocalEmitterNotifier;
pub use notifier::{
    ChangeFeedNotifier, FeedState, LogNotifier, LogNotifierError, Notification,
    NotificationSink, NotifierStats, NotifierThread, Notify, Permission, TickReport,
};
pub use rating::{Rated, RatingAggregator, Ratings, Score, ScoreRange};
pub use record::{Collection, IdGenerator, Record, SequentialIds, UuidGenerator};
pub use storage::{BlobStorage, FileStorage, InMemoryStorage};
pub use store::{RecordStore, Snapshot};

// Callers subscribe to `LocalEmitterNotifier` through this type.
#[cfg(feature = "emitter")]
pub use event_emitter_rs::EventEmitter;
