//! Stores - The three domain facades opened over one medium.
//!
//! ```ignore
//! use beacon_store::{BeaconConfig, FileStorage, LogNotifier, Stores};
//!
//! let config = BeaconConfig::from_toml_str(&text)?.with_data_dir("./data");
//! let stores = Stores::<FileStorage>::open_data_dir(&config)?;
//! let feed = stores.spawn_notifier(LogNotifier::new());
//! stores.incidents.report(incident)?;
//! ```

use std::sync::Arc;

use crate::config::{BeaconConfig, ConfigError, NotifierConfig};
use crate::domain::{Incident, IncidentStore, RecommendationStore, TipStore};
use crate::notifier::{ChangeFeedNotifier, NotificationSink, NotifierThread};
use crate::record::Record;
use crate::storage::{BlobStorage, FileStorage};
use crate::store::RecordStore;

/// Incident, tip and recommendation stores sharing one storage medium.
pub struct Stores<S> {
    pub incidents: IncidentStore<Arc<S>>,
    pub tips: TipStore<Arc<S>>,
    pub recommendations: RecommendationStore<Arc<S>>,
    notifier: NotifierConfig,
}

impl<S> Clone for Stores<S> {
    fn clone(&self) -> Self {
        Stores {
            incidents: self.incidents.clone(),
            tips: self.tips.clone(),
            recommendations: self.recommendations.clone(),
            notifier: self.notifier.clone(),
        }
    }
}

impl<S: BlobStorage> Stores<S> {
    /// Open every collection under the configured keys and score range.
    pub fn open(storage: S, config: &BeaconConfig) -> Result<Self, ConfigError> {
        let range = config.rating.score_range()?;
        let storage = Arc::new(storage);
        let keys = &config.storage_keys;

        let stores = Stores {
            incidents: IncidentStore::from_store(RecordStore::open_with_key(
                storage.clone(),
                keys.incidents.clone(),
            )),
            tips: TipStore::from_store(RecordStore::open_with_key(storage.clone(), keys.tips.clone()))
                .with_score_range(range),
            recommendations: RecommendationStore::from_store(RecordStore::open_with_key(
                storage,
                keys.recommendations.clone(),
            ))
            .with_score_range(range),
            notifier: config.notifier.clone(),
        };

        tracing::info!(
            incidents = stores.incidents.records().len(),
            tips = stores.tips.records().len(),
            recommendations = stores.recommendations.records().len(),
            "stores opened"
        );
        Ok(stores)
    }

    pub fn notifier_config(&self) -> &NotifierConfig {
        &self.notifier
    }

    /// A change feed over incidents honoring the notifier settings: the
    /// enabled flag, the alert kinds and the default icon.
    pub fn incident_notifier<N: NotificationSink>(&self, sink: N) -> ChangeFeedNotifier<Incident, N> {
        let notifier = ChangeFeedNotifier::new(sink)
            .with_enabled(self.notifier.enabled)
            .with_default_icon(self.notifier.default_icon.clone());

        if self.notifier.alert_kinds.is_empty() {
            return notifier;
        }
        let settings = self.notifier.clone();
        notifier.with_filter(move |record: &Record<Incident>| settings.wants(record.kind))
    }

    /// Start polling incidents in the background at the configured interval.
    pub fn spawn_notifier<N>(&self, sink: N) -> NotifierThread<Incident, N>
    where
        S: 'static,
        N: NotificationSink + Send + 'static,
    {
        NotifierThread::spawn(
            self.incidents.records().clone(),
            self.incident_notifier(sink),
            self.notifier.poll_interval(),
        )
    }
}

impl Stores<FileStorage> {
    /// Open over a [`FileStorage`] rooted at the configured `data_dir`.
    pub fn open_data_dir(config: &BeaconConfig) -> Result<Self, ConfigError> {
        let dir = config.data_dir.as_ref().ok_or(ConfigError::MissingDataDir)?;
        Self::open(FileStorage::new(dir.clone()), config)
    }
}
