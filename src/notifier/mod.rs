//! Change Feed - One notification per newly arrived record.
//!
//! This module provides the pieces for announcing new records:
//! - `ChangeFeedNotifier` - Baseline tracking and the per-process marker set
//! - `NotificationSink` - Trait for handing notifications to the platform
//! - `LogNotifier` - Logging/buffering sink for tests and headless runs
//! - `LocalEmitterNotifier` - In-process event emitter (requires `emitter` feature)
//! - `NotifierThread` - Background polling at a fixed interval
//!
//! The marker set lives only as long as the notifier: a fresh process (or a
//! fresh notifier) starts with an empty set and only reports records that
//! arrive after it arms.
//!
//! ## Example
//!
//! ```ignore
//! use beacon_store::{ChangeFeedNotifier, LogNotifier};
//!
//! let mut notifier = ChangeFeedNotifier::new(LogNotifier::new());
//! notifier.arm(&incidents);
//!
//! incidents.append(report)?;
//! let report = notifier.tick(&incidents);
//! assert_eq!(report.delivered, 1);
//! ```

mod feed;
mod sink;
mod thread;

pub use feed::{ChangeFeedNotifier, FeedState, NotifierStats, Notify, TickReport};
#[cfg(feature = "emitter")]
pub use sink::LocalEmitterNotifier;
pub use sink::{LogNotifier, LogNotifierError, Notification, NotificationSink, Permission};
pub use thread::NotifierThread;
