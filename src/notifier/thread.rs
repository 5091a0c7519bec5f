//! Threaded change feed for background polling.
//!
//! This module provides a background thread that ticks a
//! [`ChangeFeedNotifier`] against a record store at a fixed interval.

use std::sync::mpsc::{channel, RecvTimeoutError, Sender};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use super::feed::{ChangeFeedNotifier, Notify};
use super::sink::NotificationSink;
use crate::record::Collection;
use crate::storage::BlobStorage;
use crate::store::RecordStore;

/// A background thread that polls a store and emits notifications.
///
/// ## Example
///
/// ```ignore
/// use beacon_store::{ChangeFeedNotifier, LogNotifier, NotifierThread};
/// use std::time::Duration;
///
/// let notifier = ChangeFeedNotifier::new(LogNotifier::new());
/// let thread = NotifierThread::spawn(incidents.clone(), notifier, Duration::from_secs(1));
///
/// // ... records get appended ...
///
/// // Stop polling and get the notifier back
/// let notifier = thread.stop();
/// println!("Delivered {} notifications", notifier.stats().delivered);
/// ```
pub struct NotifierThread<P, N> {
    stop_tx: Sender<()>,
    handle: Option<JoinHandle<ChangeFeedNotifier<P, N>>>,
}

impl<P, N> NotifierThread<P, N>
where
    P: Collection + Notify,
    N: NotificationSink + Send + 'static,
{
    pub const DEFAULT_INTERVAL: Duration = Duration::from_secs(1);

    /// Arm `notifier` against `store` on the calling thread, then tick it every
    /// `poll_interval` on a new thread until stopped.
    ///
    /// Arming before the thread starts means every record appended after
    /// `spawn` returns is reported.
    pub fn spawn<S>(
        store: RecordStore<P, S>,
        mut notifier: ChangeFeedNotifier<P, N>,
        poll_interval: Duration,
    ) -> Self
    where
        S: BlobStorage + 'static,
    {
        let (stop_tx, stop_rx) = channel();
        notifier.arm(&store);
        tracing::info!(key = %store.key(), interval = ?poll_interval, "change feed started");

        let handle = thread::spawn(move || {
            loop {
                match stop_rx.recv_timeout(poll_interval) {
                    Err(RecvTimeoutError::Timeout) => {
                        notifier.tick(&store);
                    }
                    Ok(()) | Err(RecvTimeoutError::Disconnected) => break,
                }
            }

            notifier.stop();
            let stats = notifier.stats();
            tracing::info!(
                key = %store.key(),
                ticks = stats.ticks,
                delivered = stats.delivered,
                suppressed = stats.suppressed,
                failed = stats.failed,
                "change feed stopped"
            );
            notifier
        });

        Self {
            stop_tx,
            handle: Some(handle),
        }
    }

    /// Signal the thread to stop and wait for it to finish.
    ///
    /// Returns the stopped notifier with its statistics and marker set, or
    /// `None` if the polling thread panicked.
    pub fn stop(mut self) -> Option<ChangeFeedNotifier<P, N>> {
        let _ = self.stop_tx.send(());
        self.handle.take().and_then(|handle| handle.join().ok())
    }

    /// Signal the thread to stop without waiting.
    pub fn signal_stop(&self) {
        let _ = self.stop_tx.send(());
    }
}

impl<P, N> Drop for NotifierThread<P, N> {
    fn drop(&mut self) {
        let _ = self.stop_tx.send(());
        // Don't join on drop - let the thread finish its current tick
    }
}
