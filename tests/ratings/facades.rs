use beacon_store::{
    IncidentKind, InMemoryStorage, NewRecommendation, NewTip, RecommendationStore, TipStore,
};

fn tip(category: &str) -> NewTip {
    NewTip {
        author_id: "author".into(),
        category: category.into(),
        title: format!("{} tip", category),
        description: "stay alert".into(),
        image: None,
        steps: vec!["look around".into()],
    }
}

#[test]
fn rating_twice_is_idempotent() {
    let tips = TipStore::open(InMemoryStorage::new());
    let t = tips.add(tip("calle")).unwrap();

    let once = tips.rate(t.id(), "ana", 4).unwrap();
    let twice = tips.rate(t.id(), "ana", 4).unwrap();

    assert_eq!(once.ratings, twice.ratings);
    assert_eq!(tips.count_for(t.id()), 1);
    assert_eq!(tips.average_for(t.id()), 4.0);
}

#[test]
fn rating_preserves_identity_and_position() {
    let tips = TipStore::open(InMemoryStorage::new());
    let older = tips.add(tip("hogar")).unwrap();
    let newer = tips.add(tip("calle")).unwrap();

    let rated = tips.rate(older.id(), "ana", 5).unwrap();

    assert_eq!(rated.id(), older.id());
    assert_eq!(rated.created_at(), older.created_at());
    let ids: Vec<String> = tips.list().iter().map(|r| r.id().to_string()).collect();
    assert_eq!(ids, vec![newer.id().to_string(), older.id().to_string()]);
}

#[test]
fn recommendations_rate_and_comment_independently() {
    let recs = RecommendationStore::open(InMemoryStorage::new());
    let rec = recs
        .add(NewRecommendation {
            incident_kind: IncidentKind::Accident,
            title: "first aid".into(),
            description: "check breathing".into(),
            steps: vec!["call 107".into()],
            image: None,
        })
        .unwrap();

    recs.rate(rec.id(), "ana", 5).unwrap();
    recs.rate(rec.id(), "luis", 4).unwrap();
    let comment = recs.comment(rec.id(), "ana", "clear steps").unwrap();

    assert_eq!(recs.average_for(rec.id()), 4.5);
    assert_eq!(recs.count_for(rec.id()), 2);
    assert_eq!(comment.author_id, "ana");
    assert_eq!(recs.comments_for(rec.id()), vec![comment]);
    assert_eq!(recs.count_by_incident_type(IncidentKind::Accident), 1);
    assert!(recs.rate(rec.id(), "pablo", 0).is_err());
}
