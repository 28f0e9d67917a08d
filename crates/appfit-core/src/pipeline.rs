// SPDX-License-Identifier: Apache-2.0

use crate::options::{NameOrder, SourceFilter, StatusSort, ViewOptions};
use appfit_model::{is_official_store, AppRecord};
use std::cmp::Ordering;

/// Derive the ordered display list from the known-record set.
///
/// Deterministic: identical inputs always produce an identical sequence,
/// which is what makes diffing the output meaningful. The stages run in a
/// fixed order: favorites gate, install-source filter, status filter, then
/// a single sort over status rank / name / package id.
///
/// Records whose selected dimension is untested are dropped from a
/// status-filtered view, not sorted to the bottom.
#[must_use]
pub fn compute(records: &[AppRecord], options: &ViewOptions) -> Vec<AppRecord> {
    let mut out: Vec<AppRecord> = records
        .iter()
        .filter(|r| !options.favorites_only || r.is_favorite)
        .filter(|r| source_matches(r, options.source_filter))
        .filter(|r| match options.status_filter.dimension() {
            None => true,
            Some(dimension) => r.status_for(dimension).is_tested(),
        })
        .cloned()
        .collect();

    out.sort_by(|a, b| compare(a, b, options));
    out
}

fn source_matches(record: &AppRecord, filter: SourceFilter) -> bool {
    match filter {
        SourceFilter::Any => true,
        SourceFilter::OfficialStore => record
            .installed_from
            .as_deref()
            .is_some_and(is_official_store),
        SourceFilter::Other => record
            .installed_from
            .as_deref()
            .is_some_and(|source| !is_official_store(source)),
    }
}

fn compare(a: &AppRecord, b: &AppRecord, options: &ViewOptions) -> Ordering {
    let by_status = match (options.status_sort, options.status_filter.dimension()) {
        (StatusSort::None, _) | (_, None) => Ordering::Equal,
        (StatusSort::Asc, Some(dimension)) => a
            .status_for(dimension)
            .rank()
            .cmp(&b.status_for(dimension).rank()),
        (StatusSort::Desc, Some(dimension)) => b
            .status_for(dimension)
            .rank()
            .cmp(&a.status_for(dimension).rank()),
    };
    by_status
        .then_with(|| match options.name_order {
            NameOrder::AToZ => a.display_name.cmp(&b.display_name),
            NameOrder::ZToA => b.display_name.cmp(&a.display_name),
        })
        // Package id breaks name ties so the order is total.
        .then_with(|| a.package.cmp(&b.package))
}
