use appfit_core::{apply, ListEdit, StatusFilter, ViewOptions};
use appfit_model::{
    AppRecord, InstalledPackage, PackageId, RatingAggregate, DIMENSION_NATIVE, SCORE_DENOMINATOR,
};
use appfit_store::{MemoryStore, RecordStore};
use appfit_sync::{FakeRatingsService, ListSession, RatingsPayload, RatingsRefreshOrchestrator};
use std::collections::BTreeMap;
use std::sync::Arc;

fn pkg(id: &str) -> PackageId {
    PackageId::parse(id).expect("package id")
}

fn record(id: &str, name: &str) -> AppRecord {
    AppRecord::from_scan(InstalledPackage::new(
        pkg(id),
        name.to_string(),
        Some("1.0".to_string()),
        None,
    ))
}

#[test]
fn edits_always_patch_the_previous_display_list() {
    let mut session = ListSession::new(ViewOptions::default());

    let before = session.displayed().to_vec();
    let edits = session.set_records(vec![record("b.b", "Beta"), record("a.a", "Alpha")]);
    assert_eq!(apply(&before, &edits), session.displayed());
    assert_eq!(session.displayed()[0].display_name, "Alpha");

    let before = session.displayed().to_vec();
    let edits = session.apply_record(record("c.c", "Aardvark"));
    assert_eq!(apply(&before, &edits), session.displayed());
    assert_eq!(session.displayed()[0].display_name, "Aardvark");
}

#[tokio::test]
async fn favorite_toggle_persists_and_updates_a_favorites_view() {
    let store = Arc::new(MemoryStore::new());
    let orchestrator =
        RatingsRefreshOrchestrator::new(Arc::new(FakeRatingsService::new()), store.clone());

    store.upsert(&record("a.b", "Zeta")).expect("seed");
    store.upsert(&record("c.d", "Alpha")).expect("seed");

    let mut session = ListSession::new(ViewOptions {
        favorites_only: true,
        ..ViewOptions::default()
    });
    let edits = session.set_records(store.list_all().expect("list"));
    assert!(edits.is_empty());
    assert!(session.displayed().is_empty());

    // Optimistic toggle first, then persistence.
    let edits = session.apply_favorite(&pkg("a.b"), true);
    assert_eq!(edits.len(), 1);
    assert!(matches!(edits[0], ListEdit::Insert { index: 0, .. }));
    orchestrator
        .set_favorite(&pkg("a.b"), true)
        .await
        .expect("persist favorite");
    assert!(store
        .get(&pkg("a.b"))
        .expect("get")
        .expect("present")
        .is_favorite);

    // Un-favoriting removes the row from this view.
    let edits = session.apply_favorite(&pkg("a.b"), false);
    assert_eq!(edits, vec![ListEdit::Remove { index: 0 }]);
}

#[tokio::test]
async fn optimistic_toggle_survives_a_failed_persist() {
    let store = Arc::new(MemoryStore::new());
    let orchestrator =
        RatingsRefreshOrchestrator::new(Arc::new(FakeRatingsService::new()), store.clone());
    store.upsert(&record("a.b", "Zeta")).expect("seed");

    let mut session = ListSession::new(ViewOptions {
        favorites_only: true,
        ..ViewOptions::default()
    });
    session.set_records(store.list_all().expect("list"));
    session.apply_favorite(&pkg("a.b"), true);

    store.set_fail_writes(true);
    assert!(orchestrator.set_favorite(&pkg("a.b"), true).await.is_err());

    // The view keeps showing the toggle; it is not silently reverted.
    assert_eq!(session.displayed().len(), 1);
    assert!(session.displayed()[0].is_favorite);
}

#[tokio::test]
async fn background_ratings_load_flows_back_into_a_filtered_view() {
    let service = Arc::new(FakeRatingsService::new());
    let store = Arc::new(MemoryStore::new());
    let orchestrator = RatingsRefreshOrchestrator::new(service.clone(), store.clone());

    store.upsert(&record("a.b", "Zeta")).expect("seed");
    service
        .insert_payload(
            pkg("a.b"),
            RatingsPayload {
                ratings: Vec::new(),
                aggregates: BTreeMap::from([(
                    DIMENSION_NATIVE.to_string(),
                    RatingAggregate::new(3.5, SCORE_DENOMINATOR, DIMENSION_NATIVE.to_string(), 9),
                )]),
            },
        )
        .await;

    let mut session = ListSession::new(ViewOptions {
        status_filter: StatusFilter::Native,
        ..ViewOptions::default()
    });
    session.set_records(store.list_all().expect("list"));
    // Untested, so the status-filtered view starts empty.
    assert!(session.displayed().is_empty());

    let loaded = orchestrator
        .ensure_ratings_loaded(&pkg("a.b"))
        .await
        .expect("load");
    let edits = session.apply_record(loaded);
    assert_eq!(edits.len(), 1);
    assert!(matches!(edits[0], ListEdit::Insert { index: 0, .. }));
}
