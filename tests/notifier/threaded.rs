use beacon_store::{
    BeaconConfig, ChangeFeedNotifier, IncidentKind, IncidentStore, InMemoryStorage, NotifierThread,
    Stores,
};
use std::thread;
use std::time::{Duration, Instant};

use crate::support::{incident, RecordingSink};

fn wait_for(sink: &RecordingSink, count: usize) -> Vec<String> {
    let deadline = Instant::now() + Duration::from_secs(5);
    loop {
        let bodies = sink.bodies();
        if bodies.len() >= count || Instant::now() > deadline {
            return bodies;
        }
        thread::sleep(Duration::from_millis(5));
    }
}

#[test]
fn polling_thread_announces_new_records() {
    let incidents = IncidentStore::open(InMemoryStorage::new());
    incidents
        .report(incident(IncidentKind::Theft, "before spawn"))
        .unwrap();

    let sink = RecordingSink::granted();
    let feed = NotifierThread::spawn(
        incidents.records().clone(),
        ChangeFeedNotifier::new(sink.clone()),
        Duration::from_millis(10),
    );

    incidents
        .report(incident(IncidentKind::Accident, "after spawn"))
        .unwrap();
    incidents
        .report(incident(IncidentKind::Vandalism, "later"))
        .unwrap();

    let bodies = wait_for(&sink, 2);
    assert_eq!(bodies, vec!["accidente: after spawn", "vandalismo: later"]);

    let notifier = feed.stop().unwrap();
    assert_eq!(notifier.stats().delivered, 2);
    assert_eq!(notifier.sent_count(), 2);
    assert!(notifier.stats().ticks >= 1);
}

#[test]
fn stopped_thread_sends_nothing_more() {
    let incidents = IncidentStore::open(InMemoryStorage::new());
    let sink = RecordingSink::granted();
    let feed = NotifierThread::spawn(
        incidents.records().clone(),
        ChangeFeedNotifier::new(sink.clone()),
        Duration::from_millis(10),
    );

    let notifier = feed.stop().unwrap();
    incidents
        .report(incident(IncidentKind::Theft, "after stop"))
        .unwrap();
    thread::sleep(Duration::from_millis(50));

    assert!(sink.bodies().is_empty());
    assert_eq!(notifier.stats().delivered, 0);
}

#[test]
fn hub_spawns_feed_with_configured_settings() {
    let config = BeaconConfig::from_toml_str(
        "[notifier]\npoll_interval_ms = 10\nalert_kinds = [\"sospechoso\"]\n",
    )
    .unwrap();
    let stores = Stores::open(InMemoryStorage::new(), &config).unwrap();
    let sink = RecordingSink::granted();
    let feed = stores.spawn_notifier(sink.clone());

    stores
        .incidents
        .report(incident(IncidentKind::Theft, "not watched"))
        .unwrap();
    stores
        .incidents
        .report(incident(IncidentKind::Suspicious, "watched"))
        .unwrap();

    let bodies = wait_for(&sink, 1);
    let notifier = feed.stop().unwrap();

    assert_eq!(bodies, vec!["sospechoso: watched"]);
    assert_eq!(notifier.sent_count(), 2);
    assert_eq!(notifier.stats().suppressed, 1);
}

#[cfg(feature = "emitter")]
#[test]
fn emitter_sink_receives_json_notifications() {
    use beacon_store::{EventEmitter, LocalEmitterNotifier, Notification};
    use std::sync::mpsc;

    let mut emitter = EventEmitter::new();
    let (tx, rx) = mpsc::channel::<String>();
    emitter.on("alerta", move |payload: String| {
        tx.send(payload).unwrap();
    });

    let incidents = IncidentStore::open(InMemoryStorage::new());
    let mut feed = ChangeFeedNotifier::new(LocalEmitterNotifier::new(emitter).with_event("alerta"));
    feed.arm(incidents.records());

    incidents
        .report(incident(IncidentKind::Accident, "bus crash"))
        .unwrap();
    let report = feed.tick(incidents.records());
    assert_eq!(report.delivered, 1);

    let payload = rx.recv_timeout(Duration::from_secs(1)).unwrap();
    let notification: Notification = serde_json::from_str(&payload).unwrap();
    assert_eq!(notification.body, "accidente: bus crash");
    assert_eq!(notification.icon, "/default-icon.png");
}
