// SPDX-License-Identifier: Apache-2.0

use appfit_model::{AppRecord, CompatStatus, PackageId};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

/// One patch instruction against the previously displayed list.
///
/// Indices are valid at the point the edit is applied, assuming every
/// earlier edit in the sequence has already been applied.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "op")]
#[non_exhaustive]
pub enum ListEdit {
    Insert { index: usize, record: AppRecord },
    Remove { index: usize },
    Move { from: usize, to: usize },
    Update { index: usize, record: AppRecord },
}

/// Value equality over the fields the rendering layer actually shows:
/// name, install version/source, favorite flag, and the status string of
/// each rating dimension. Invisible churn (raw scores inside a bucket,
/// the submissions list) does not count as a change.
#[must_use]
pub fn display_eq(a: &AppRecord, b: &AppRecord) -> bool {
    fn statuses(record: &AppRecord) -> Vec<(&str, CompatStatus)> {
        record
            .status_aggregate
            .iter()
            .map(|(dimension, aggregate)| (dimension.as_str(), aggregate.status()))
            .collect()
    }
    a.display_name == b.display_name
        && a.installed_version == b.installed_version
        && a.installed_from == b.installed_from
        && a.is_installed == b.is_installed
        && a.is_favorite == b.is_favorite
        && statuses(a) == statuses(b)
}

/// Compute the edit sequence that patches `previous` into `next`.
///
/// Identity is the package id. Removals are emitted first (descending
/// index), then moves/inserts realizing the target order, then updates
/// for records whose display-relevant content changed. Typical small
/// deltas (one item added, removed, or toggled) produce a single edit.
#[must_use]
pub fn diff(previous: &[AppRecord], next: &[AppRecord]) -> Vec<ListEdit> {
    let mut edits = Vec::new();
    let next_keys: HashSet<&PackageId> = next.iter().map(|r| &r.package).collect();

    let mut working: Vec<&PackageId> = previous.iter().map(|r| &r.package).collect();
    for index in (0..working.len()).rev() {
        if !next_keys.contains(working[index]) {
            edits.push(ListEdit::Remove { index });
            working.remove(index);
        }
    }

    for (target, record) in next.iter().enumerate() {
        // Positions before `target` already agree with `next`, so any
        // match found here sits at or past `target`.
        match working.iter().position(|key| **key == record.package) {
            Some(current) if current == target => {}
            Some(current) => {
                let key = working.remove(current);
                working.insert(target, key);
                edits.push(ListEdit::Move {
                    from: current,
                    to: target,
                });
            }
            None => {
                working.insert(target, &record.package);
                edits.push(ListEdit::Insert {
                    index: target,
                    record: record.clone(),
                });
            }
        }
    }

    let previous_by_key: HashMap<&PackageId, &AppRecord> =
        previous.iter().map(|r| (&r.package, r)).collect();
    for (index, record) in next.iter().enumerate() {
        if let Some(old) = previous_by_key.get(&record.package) {
            if !display_eq(old, record) {
                edits.push(ListEdit::Update {
                    index,
                    record: record.clone(),
                });
            }
        }
    }

    edits
}

/// Apply an edit sequence produced by [`diff`] to a list snapshot.
///
/// The rendering layer performs the equivalent of this on its own widget
/// state; the function exists so the self-consistency contract
/// (`apply(previous, diff(previous, next)) == next`) is checkable.
#[must_use]
pub fn apply(previous: &[AppRecord], edits: &[ListEdit]) -> Vec<AppRecord> {
    let mut list = previous.to_vec();
    for edit in edits {
        match edit {
            ListEdit::Insert { index, record } => list.insert(*index, record.clone()),
            ListEdit::Remove { index } => {
                list.remove(*index);
            }
            ListEdit::Move { from, to } => {
                let record = list.remove(*from);
                list.insert(*to, record);
            }
            ListEdit::Update { index, record } => list[*index] = record.clone(),
        }
    }
    list
}
