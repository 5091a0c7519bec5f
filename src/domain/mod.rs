//! Domain - The three collections the app keeps.
//!
//! Each facade wraps one [`RecordStore`](crate::RecordStore) and exposes the
//! operations the screens need:
//! - `IncidentStore` - Incident reports (`incidentes`), no ratings
//! - `TipStore` - Safety tips (`consejos-storage`) with star ratings
//! - `RecommendationStore` - Per-incident-type advice
//!   (`recomendaciones-storage`) with ratings and comments
//!
//! Facades are cheap to clone and clones share state.
//!
//! ## Example
//!
//! ```ignore
//! use beacon_store::{InMemoryStorage, IncidentKind, NewTip, TipStore};
//!
//! let tips = TipStore::open(InMemoryStorage::new());
//! let tip = tips.add(NewTip { category: "hogar".into(), ..Default::default() })?;
//! tips.rate(tip.id(), "user-1", 5)?;
//! assert_eq!(tips.average_for(tip.id()), 5.0);
//! ```

mod incident;
mod recommendation;
mod tip;

pub use incident::{Incident, IncidentKind, IncidentStore, Location, UnknownIncidentKind};
pub use recommendation::{Comment, NewRecommendation, Recommendation, RecommendationStore};
pub use tip::{NewTip, SafetyTip, TipStore};
