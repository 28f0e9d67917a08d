use appfit_model::{
    AppRecord, InstalledPackage, PackageId, RatingAggregate, RatingSubmission, DIMENSION_NATIVE,
    SCORE_DENOMINATOR,
};
use appfit_store::{MemoryStore, RecordStore, SqliteStore, StoreErrorCode};
use std::collections::BTreeMap;

fn sample_record(id: &str, name: &str) -> AppRecord {
    AppRecord::from_scan(InstalledPackage::new(
        PackageId::parse(id).expect("id"),
        name.to_string(),
        Some("1.2.3".to_string()),
        Some("com.android.vending".to_string()),
    ))
}

fn rated_record(id: &str, name: &str) -> AppRecord {
    let mut record = sample_record(id, name);
    record.apply_ratings(
        vec![RatingSubmission::new(
            DIMENSION_NATIVE.to_string(),
            4.0,
            Some("1.2.3".to_string()),
            Some("works".to_string()),
        )],
        BTreeMap::from([(
            DIMENSION_NATIVE.to_string(),
            RatingAggregate::new(4.0, SCORE_DENOMINATOR, DIMENSION_NATIVE.to_string(), 1),
        )]),
    );
    record
}

fn contract_roundtrip(store: &dyn RecordStore) {
    let record = rated_record("com.example.one", "One");
    store.upsert(&record).expect("upsert");
    let loaded = store
        .get(&record.package)
        .expect("get")
        .expect("record present");
    assert_eq!(loaded, record);

    let missing = PackageId::parse("com.example.absent").expect("id");
    assert!(store.get(&missing).expect("get").is_none());
}

fn contract_favorite(store: &dyn RecordStore) {
    let record = sample_record("com.example.fav", "Fav");
    store.upsert(&record).expect("upsert");
    store.set_favorite(&record.package, true).expect("favorite");
    let loaded = store.get(&record.package).expect("get").expect("present");
    assert!(loaded.is_favorite);

    let missing = PackageId::parse("com.example.absent").expect("id");
    let err = store.set_favorite(&missing, true).expect_err("not found");
    assert_eq!(err.code, StoreErrorCode::NotFound);
}

fn contract_search_and_delete(store: &dyn RecordStore) {
    store.upsert(&sample_record("a.alpha", "Alpha One")).expect("upsert");
    store.upsert(&sample_record("b.beta", "Beta Two")).expect("upsert");
    store
        .upsert(&sample_record("c.gamma", "Another Alpha"))
        .expect("upsert");

    let hits = store.search("Alpha").expect("search");
    assert_eq!(hits.len(), 2);
    assert!(hits.iter().all(|r| r.display_name.contains("Alpha")));

    let none = store.search("zzz").expect("search");
    assert!(none.is_empty());

    let target = PackageId::parse("a.alpha").expect("id");
    store.delete(&target).expect("delete");
    assert!(store.get(&target).expect("get").is_none());
    assert_eq!(store.list_all().expect("list").len(), 2);
}

#[test]
fn sqlite_store_satisfies_the_contract() {
    let dir = tempfile::tempdir().expect("tempdir");
    let store = SqliteStore::open(&dir.path().join("records.sqlite")).expect("open");
    contract_roundtrip(&store);
    contract_favorite(&store);
    contract_search_and_delete(&store);
}

#[test]
fn in_memory_sqlite_store_satisfies_the_contract() {
    let store = SqliteStore::open_in_memory().expect("open");
    contract_roundtrip(&store);
    contract_favorite(&store);
    contract_search_and_delete(&store);
}

#[test]
fn memory_store_satisfies_the_contract() {
    let store = MemoryStore::new();
    contract_roundtrip(&store);
    contract_favorite(&store);
    contract_search_and_delete(&store);
}

#[test]
fn sqlite_store_persists_across_reopen() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("records.sqlite");
    {
        let store = SqliteStore::open(&path).expect("open");
        store.upsert(&rated_record("com.example.keep", "Keep")).expect("upsert");
    }
    let store = SqliteStore::open(&path).expect("reopen");
    let loaded = store
        .get(&PackageId::parse("com.example.keep").expect("id"))
        .expect("get")
        .expect("present");
    assert!(loaded.ratings_loaded);
    assert_eq!(loaded.ratings.len(), 1);
}

#[test]
fn memory_store_write_failure_is_surfaced() {
    let store = MemoryStore::new();
    store.upsert(&sample_record("a.a", "A")).expect("upsert");
    store.set_fail_writes(true);
    let err = store
        .set_favorite(&PackageId::parse("a.a").expect("id"), true)
        .expect_err("injected failure");
    assert_eq!(err.code, StoreErrorCode::Io);
    store.set_fail_writes(false);
    store
        .set_favorite(&PackageId::parse("a.a").expect("id"), true)
        .expect("write again");
}
