use appfit_core::{compute, diff, ListEdit, NameOrder, SourceFilter, StatusFilter, StatusSort, ViewOptions};
use appfit_model::{
    AppRecord, InstalledPackage, PackageId, RatingAggregate, DIMENSION_NATIVE, SCORE_DENOMINATOR,
};

fn record(id: &str, name: &str, installed_from: Option<&str>) -> AppRecord {
    AppRecord::from_scan(InstalledPackage::new(
        PackageId::parse(id).expect("id"),
        name.to_string(),
        Some("1.0".to_string()),
        installed_from.map(str::to_string),
    ))
}

fn with_native_status(mut record: AppRecord, score: f32, total: u32) -> AppRecord {
    record.status_aggregate.insert(
        DIMENSION_NATIVE.to_string(),
        RatingAggregate::new(score, SCORE_DENOMINATOR, DIMENSION_NATIVE.to_string(), total),
    );
    record
}

fn names(list: &[AppRecord]) -> Vec<&str> {
    list.iter().map(|r| r.display_name.as_str()).collect()
}

#[test]
fn default_options_sort_a_to_z() {
    let records = vec![
        record("a.b", "Zeta", Some("sideload")),
        record("c.d", "Alpha", Some("com.android.vending")),
    ];
    let out = compute(&records, &ViewOptions::default());
    assert_eq!(names(&out), vec!["Alpha", "Zeta"]);
}

#[test]
fn official_store_filter_keeps_only_store_family_installs() {
    let records = vec![
        record("a.b", "Zeta", Some("sideload")),
        record("c.d", "Alpha", Some("com.android.vending")),
    ];
    let options = ViewOptions {
        source_filter: SourceFilter::OfficialStore,
        ..ViewOptions::default()
    };
    let out = compute(&records, &options);
    assert_eq!(out.len(), 1);
    assert_eq!(out[0].package.as_str(), "c.d");
}

#[test]
fn other_source_filter_excludes_store_family_and_uninstalled() {
    let mut not_installed = record("e.f", "Gamma", None);
    not_installed.clear_install_state();
    let records = vec![
        record("a.b", "Zeta", Some("sideload")),
        record("c.d", "Alpha", Some("com.android.vending")),
        not_installed,
    ];
    let options = ViewOptions {
        source_filter: SourceFilter::Other,
        ..ViewOptions::default()
    };
    let out = compute(&records, &options);
    assert_eq!(out.len(), 1);
    assert_eq!(out[0].package.as_str(), "a.b");
}

#[test]
fn untested_records_are_excluded_from_a_status_filtered_view() {
    let records = vec![
        with_native_status(record("a.b", "Zeta", None), 0.0, 0),
        with_native_status(record("c.d", "Alpha", None), 3.5, 12),
        record("e.f", "Gamma", None),
    ];
    let options = ViewOptions {
        status_filter: StatusFilter::Native,
        ..ViewOptions::default()
    };
    let out = compute(&records, &options);
    assert_eq!(out.len(), 1);
    assert_eq!(out[0].package.as_str(), "c.d");
}

#[test]
fn status_sort_orders_by_rank_then_name() {
    let records = vec![
        with_native_status(record("a.a", "Delta", None), 4.0, 3),
        with_native_status(record("b.b", "Alpha", None), 1.5, 3),
        with_native_status(record("c.c", "Charlie", None), 4.0, 3),
        with_native_status(record("d.d", "Bravo", None), 2.5, 3),
    ];
    let descending = ViewOptions {
        status_filter: StatusFilter::Native,
        status_sort: StatusSort::Desc,
        ..ViewOptions::default()
    };
    let out = compute(&records, &descending);
    assert_eq!(names(&out), vec!["Charlie", "Delta", "Bravo", "Alpha"]);

    let ascending = ViewOptions {
        status_sort: StatusSort::Asc,
        ..descending
    };
    let out = compute(&records, &ascending);
    assert_eq!(names(&out), vec!["Alpha", "Bravo", "Charlie", "Delta"]);
}

#[test]
fn z_to_a_reverses_names_but_keeps_package_tiebreak_total() {
    let records = vec![
        record("b.b", "Same", None),
        record("a.a", "Same", None),
        record("c.c", "Other", None),
    ];
    let options = ViewOptions {
        name_order: NameOrder::ZToA,
        ..ViewOptions::default()
    };
    let out = compute(&records, &options);
    assert_eq!(names(&out), vec!["Same", "Same", "Other"]);
    assert_eq!(out[0].package.as_str(), "a.a");
    assert_eq!(out[1].package.as_str(), "b.b");
}

#[test]
fn unfavoriting_removes_from_a_favorites_view_with_one_edit() {
    let mut fav = record("a.b", "Zeta", None);
    fav.is_favorite = true;
    let other = record("c.d", "Alpha", None);
    let options = ViewOptions {
        favorites_only: true,
        ..ViewOptions::default()
    };

    let records = vec![fav.clone(), other.clone()];
    let shown = compute(&records, &options);
    assert_eq!(names(&shown), vec!["Zeta"]);

    let mut unfaved = fav;
    unfaved.is_favorite = false;
    let next = compute(&[unfaved, other], &options);
    assert!(next.is_empty());
    assert_eq!(diff(&shown, &next), vec![ListEdit::Remove { index: 0 }]);
}
