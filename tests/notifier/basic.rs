use beacon_store::{
    ChangeFeedNotifier, FeedState, IncidentKind, IncidentStore, InMemoryStorage, Permission,
};
use std::sync::atomic::Ordering;

use crate::support::{incident, RecordingSink};

#[test]
fn nothing_is_announced_for_records_present_at_arm() {
    let incidents = IncidentStore::open(InMemoryStorage::new());
    incidents
        .report(incident(IncidentKind::Theft, "old"))
        .unwrap();

    let sink = RecordingSink::granted();
    let mut feed = ChangeFeedNotifier::new(sink.clone());
    feed.arm(incidents.records());
    assert_eq!(feed.state(), FeedState::Armed { baseline: 1 });

    let report = feed.tick(incidents.records());
    assert_eq!(report.new_records, 0);
    assert!(sink.bodies().is_empty());
}

#[test]
fn each_new_record_is_announced_once_oldest_first() {
    let incidents = IncidentStore::open(InMemoryStorage::new());
    let sink = RecordingSink::granted();
    let mut feed = ChangeFeedNotifier::new(sink.clone());
    feed.arm(incidents.records());

    incidents.report(incident(IncidentKind::Theft, "one")).unwrap();
    incidents.report(incident(IncidentKind::Accident, "two")).unwrap();
    let report = feed.tick(incidents.records());
    assert_eq!(report.delivered, 2);

    incidents.report(incident(IncidentKind::Vandalism, "three")).unwrap();
    feed.tick(incidents.records());
    feed.tick(incidents.records());

    assert_eq!(
        sink.bodies(),
        vec!["robo: one", "accidente: two", "vandalismo: three"]
    );
    assert_eq!(feed.sent_count(), 3);
    assert_eq!(feed.stats().ticks, 3);
    assert_eq!(feed.stats().delivered, 3);
}

#[test]
fn permission_is_requested_once_when_undecided() {
    let incidents = IncidentStore::open(InMemoryStorage::new());
    let sink = RecordingSink::new(Permission::Default);
    let mut feed = ChangeFeedNotifier::new(sink.clone());

    feed.arm(incidents.records());
    feed.arm(incidents.records());
    feed.tick(incidents.records());

    assert_eq!(*sink.requests.lock().unwrap(), 1);
}

#[test]
fn granting_later_does_not_replay_backlog() {
    let incidents = IncidentStore::open(InMemoryStorage::new());
    let sink = RecordingSink::new(Permission::Denied);
    let mut feed = ChangeFeedNotifier::new(sink.clone());
    feed.arm(incidents.records());

    let missed = incidents
        .report(incident(IncidentKind::Theft, "while denied"))
        .unwrap();
    let report = feed.tick(incidents.records());
    assert_eq!(report.suppressed, 1);
    assert!(feed.has_sent(missed.id()));

    sink.set_permission(Permission::Granted);
    feed.tick(incidents.records());
    assert!(sink.bodies().is_empty());

    incidents
        .report(incident(IncidentKind::Suspicious, "after grant"))
        .unwrap();
    feed.tick(incidents.records());
    assert_eq!(sink.bodies(), vec!["sospechoso: after grant"]);
}

#[test]
fn sink_failures_are_counted_and_not_retried() {
    let incidents = IncidentStore::open(InMemoryStorage::new());
    let sink = RecordingSink::granted();
    let mut feed = ChangeFeedNotifier::new(sink.clone());
    feed.arm(incidents.records());

    sink.failing.store(true, Ordering::SeqCst);
    incidents.report(incident(IncidentKind::Theft, "dropped")).unwrap();
    let report = feed.tick(incidents.records());
    assert_eq!(report.failed, 1);

    sink.failing.store(false, Ordering::SeqCst);
    feed.tick(incidents.records());
    assert!(sink.bodies().is_empty());
    assert_eq!(feed.stats().failed, 1);
}

#[test]
fn stopped_feed_ignores_new_records() {
    let incidents = IncidentStore::open(InMemoryStorage::new());
    let sink = RecordingSink::granted();
    let mut feed = ChangeFeedNotifier::new(sink.clone());
    feed.arm(incidents.records());
    feed.stop();

    incidents.report(incident(IncidentKind::Theft, "late")).unwrap();
    let report = feed.tick(incidents.records());

    assert_eq!(feed.state(), FeedState::Stopped);
    assert_eq!(report.new_records, 0);
    assert!(sink.bodies().is_empty());
}

#[test]
fn incident_image_becomes_the_icon() {
    let incidents = IncidentStore::open(InMemoryStorage::new());
    let sink = RecordingSink::granted();
    let mut feed = ChangeFeedNotifier::new(sink.clone()).with_default_icon("/icons/alert.png");
    feed.arm(incidents.records());

    let mut with_photo = incident(IncidentKind::Theft, "photo");
    with_photo.image = Some("data:image/jpeg;base64,/9j/".into());
    incidents.report(with_photo).unwrap();
    incidents.report(incident(IncidentKind::Theft, "no photo")).unwrap();
    feed.tick(incidents.records());

    let received = sink.received.lock().unwrap();
    assert_eq!(received[0].icon, "data:image/jpeg;base64,/9j/");
    assert_eq!(received[1].icon, "/icons/alert.png");
    assert_eq!(received[0].title, "New alert");
}
