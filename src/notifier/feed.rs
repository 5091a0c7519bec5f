use std::collections::HashSet;

use super::sink::{Notification, NotificationSink, Permission};
use crate::record::{Collection, Record};
use crate::storage::BlobStorage;
use crate::store::RecordStore;

/// Payloads that know how to announce themselves.
pub trait Notify {
    /// Render the notification for this payload. `default_icon` is used when
    /// the payload has no image of its own.
    fn notification(&self, default_icon: &str) -> Notification;
}

/// Lifecycle of a [`ChangeFeedNotifier`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeedState {
    /// No baseline taken yet.
    Idle,
    /// Holding the record count seen on the previous tick.
    Armed { baseline: usize },
    /// Terminal. Ticks do nothing.
    Stopped,
}

/// Outcome of a single tick.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct TickReport {
    /// Records beyond the baseline on this tick.
    pub new_records: usize,
    /// New records not already in the marker set. Each is marked exactly once.
    pub attempted: usize,
    /// Handed to the sink successfully.
    pub delivered: usize,
    /// Marked without emitting: filtered out, disabled, or permission not granted.
    pub suppressed: usize,
    /// The sink returned an error. Still marked.
    pub failed: usize,
}

/// Running totals across ticks.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct NotifierStats {
    pub ticks: usize,
    pub delivered: usize,
    pub suppressed: usize,
    pub failed: usize,
}

type RecordFilter<P> = Box<dyn Fn(&Record<P>) -> bool + Send>;

/// Watches a record store and sends one notification per record that shows
/// up after arming.
///
/// The store is newest-first, so growth from `baseline` to `current` means the
/// first `current - baseline` records are new; they are emitted oldest first.
/// A record id enters the marker set the first time it is seen, whatever
/// happens to the emission, so granting permission later never replays a
/// backlog.
pub struct ChangeFeedNotifier<P, N> {
    sink: N,
    state: FeedState,
    sent: HashSet<String>,
    filter: Option<RecordFilter<P>>,
    enabled: bool,
    default_icon: String,
    stats: NotifierStats,
}

impl<P, N> ChangeFeedNotifier<P, N> {
    pub const DEFAULT_ICON: &'static str = "/default-icon.png";

    pub fn new(sink: N) -> Self {
        ChangeFeedNotifier {
            sink,
            state: FeedState::Idle,
            sent: HashSet::new(),
            filter: None,
            enabled: true,
            default_icon: Self::DEFAULT_ICON.to_string(),
            stats: NotifierStats::default(),
        }
    }

    /// Only emit records matching `filter`. Rejected records are still marked.
    pub fn with_filter<F>(mut self, filter: F) -> Self
    where
        F: Fn(&Record<P>) -> bool + Send + 'static,
    {
        self.filter = Some(Box::new(filter));
        self
    }

    /// When disabled, new records are marked but nothing is emitted.
    pub fn with_enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    pub fn with_default_icon(mut self, icon: impl Into<String>) -> Self {
        self.default_icon = icon.into();
        self
    }

    pub fn state(&self) -> FeedState {
        self.state
    }

    pub fn stats(&self) -> &NotifierStats {
        &self.stats
    }

    /// Whether a notification was already attempted for `id`.
    pub fn has_sent(&self, id: &str) -> bool {
        self.sent.contains(id)
    }

    pub fn sent_count(&self) -> usize {
        self.sent.len()
    }

    pub fn sink(&self) -> &N {
        &self.sink
    }

    pub fn sink_mut(&mut self) -> &mut N {
        &mut self.sink
    }

    pub fn into_sink(self) -> N {
        self.sink
    }

    /// Move to the terminal state. Later ticks are no-ops.
    pub fn stop(&mut self) {
        self.state = FeedState::Stopped;
    }
}

impl<P, N> ChangeFeedNotifier<P, N>
where
    P: Collection + Notify,
    N: NotificationSink,
{
    /// Take the baseline from `store` without emitting anything, asking the
    /// platform for permission once if it has not been asked yet.
    ///
    /// Only leaves `Idle`; arming an armed or stopped notifier does nothing.
    pub fn arm<S: BlobStorage>(&mut self, store: &RecordStore<P, S>) {
        if self.state != FeedState::Idle {
            return;
        }

        if self.enabled && self.sink.permission() == Permission::Default {
            let answer = self.sink.request_permission();
            tracing::debug!(permission = ?answer, "notification permission requested");
        }

        let baseline = store.len();
        self.state = FeedState::Armed { baseline };
        tracing::debug!(key = %store.key(), baseline, "change feed armed");
    }

    /// Compare the store against the baseline and emit for new records.
    ///
    /// An idle notifier arms on its first tick and emits nothing.
    pub fn tick<S: BlobStorage>(&mut self, store: &RecordStore<P, S>) -> TickReport {
        let baseline = match self.state {
            FeedState::Stopped => return TickReport::default(),
            FeedState::Idle => {
                self.arm(store);
                self.stats.ticks += 1;
                return TickReport::default();
            }
            FeedState::Armed { baseline } => baseline,
        };

        let records = store.list();
        let current = records.len();
        let mut report = TickReport::default();

        if current > baseline {
            report.new_records = current - baseline;
            let permission = self.sink.permission();

            for record in records[..report.new_records].iter().rev() {
                if !self.sent.insert(record.id().to_string()) {
                    continue;
                }
                report.attempted += 1;
                self.emit(record, permission, &mut report);
            }

            tracing::debug!(
                key = %store.key(),
                new = report.new_records,
                delivered = report.delivered,
                suppressed = report.suppressed,
                failed = report.failed,
                "change feed tick"
            );
        }

        self.state = FeedState::Armed { baseline: current };
        self.stats.ticks += 1;
        self.stats.delivered += report.delivered;
        self.stats.suppressed += report.suppressed;
        self.stats.failed += report.failed;
        report
    }

    fn emit(&mut self, record: &Record<P>, permission: Permission, report: &mut TickReport) {
        if !self.enabled {
            report.suppressed += 1;
            return;
        }

        if let Some(filter) = &self.filter {
            if !filter(record) {
                report.suppressed += 1;
                return;
            }
        }

        if permission != Permission::Granted {
            tracing::debug!(id = %record.id(), permission = ?permission, "notification skipped");
            report.suppressed += 1;
            return;
        }

        let notification = record.payload().notification(&self.default_icon);
        match self.sink.notify(&notification) {
            Ok(()) => report.delivered += 1,
            Err(err) => {
                tracing::warn!(id = %record.id(), error = %err, "notification failed");
                report.failed += 1;
            }
        }
    }
}
