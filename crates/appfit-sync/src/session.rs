// SPDX-License-Identifier: Apache-2.0

use appfit_core::{compute, diff, ListEdit, ViewOptions};
use appfit_model::{AppRecord, PackageId};

/// One screen's view of the known-record set.
///
/// The session owns its copy of the set and the last displayed list; the
/// set is only ever replaced wholesale or mutated through the methods
/// here, and every mutation returns the edit batch that patches the
/// previously displayed list into the new one. Hand the edits to the
/// rendering layer; nothing else may touch its widget state.
pub struct ListSession {
    records: Vec<AppRecord>,
    displayed: Vec<AppRecord>,
    options: ViewOptions,
}

impl ListSession {
    #[must_use]
    pub fn new(options: ViewOptions) -> Self {
        Self {
            records: Vec::new(),
            displayed: Vec::new(),
            options,
        }
    }

    #[must_use]
    pub fn displayed(&self) -> &[AppRecord] {
        &self.displayed
    }

    #[must_use]
    pub fn options(&self) -> ViewOptions {
        self.options
    }

    /// Replace the known set wholesale (after a rebuild or first load).
    pub fn set_records(&mut self, records: Vec<AppRecord>) -> Vec<ListEdit> {
        self.records = records;
        self.recompute()
    }

    /// Change the active filter/sort options.
    pub fn set_options(&mut self, options: ViewOptions) -> Vec<ListEdit> {
        self.options = options;
        self.recompute()
    }

    /// Merge one completed record back into the set (e.g. after a ratings
    /// refresh finished in the background).
    pub fn apply_record(&mut self, record: AppRecord) -> Vec<ListEdit> {
        match self.records.iter_mut().find(|r| r.package == record.package) {
            Some(existing) => *existing = record,
            None => self.records.push(record),
        }
        self.recompute()
    }

    /// Optimistic favorite toggle. The in-memory value stays even if the
    /// caller's persistence attempt later fails; persistence rides on
    /// `RatingsRefreshOrchestrator::set_favorite`.
    pub fn apply_favorite(&mut self, package: &PackageId, favorite: bool) -> Vec<ListEdit> {
        if let Some(record) = self.records.iter_mut().find(|r| &r.package == package) {
            record.is_favorite = favorite;
        }
        self.recompute()
    }

    fn recompute(&mut self) -> Vec<ListEdit> {
        let next = compute(&self.records, &self.options);
        let edits = diff(&self.displayed, &next);
        self.displayed = next;
        edits
    }
}
