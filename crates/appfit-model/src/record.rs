// SPDX-License-Identifier: Apache-2.0

use crate::package::{InstalledPackage, PackageId};
use crate::rating::{RatingAggregate, RatingSubmission};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Per-package record merging locally known install state with remotely
/// fetched community ratings.
///
/// A record owns its submissions and aggregates exclusively; nothing is
/// shared across records. `ratings_loaded` is monotonic for the process
/// lifetime: once remote ratings have been merged it never flips back.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
#[non_exhaustive]
pub struct AppRecord {
    pub package: PackageId,
    pub display_name: String,
    pub installed_version: Option<String>,
    pub installed_from: Option<String>,
    pub is_installed: bool,
    pub is_favorite: bool,
    /// Whether the remote directory knows this package at all.
    pub in_directory: bool,
    pub ratings_loaded: bool,
    pub ratings: Vec<RatingSubmission>,
    pub status_aggregate: BTreeMap<String, RatingAggregate>,
}

impl AppRecord {
    /// Record for a package discovered by the device scan.
    #[must_use]
    pub fn from_scan(scan: InstalledPackage) -> Self {
        Self {
            package: scan.package,
            display_name: scan.display_name,
            installed_version: scan.installed_version,
            installed_from: scan.installed_from,
            is_installed: true,
            is_favorite: false,
            in_directory: false,
            ratings_loaded: false,
            ratings: Vec::new(),
            status_aggregate: BTreeMap::new(),
        }
    }

    /// Record for a package known only to the remote directory.
    #[must_use]
    pub fn from_directory(package: PackageId, display_name: String) -> Self {
        Self {
            package,
            display_name,
            installed_version: None,
            installed_from: None,
            is_installed: false,
            is_favorite: false,
            in_directory: true,
            ratings_loaded: false,
            ratings: Vec::new(),
            status_aggregate: BTreeMap::new(),
        }
    }

    /// Refresh install state from a newer scan row, keeping everything the
    /// scan does not know about (favorite flag, ratings, directory flag).
    pub fn absorb_scan(&mut self, scan: InstalledPackage) {
        self.display_name = scan.display_name;
        self.installed_version = scan.installed_version;
        self.installed_from = scan.installed_from;
        self.is_installed = true;
    }

    /// The package is gone from the device; keep the directory-side data.
    pub fn clear_install_state(&mut self) {
        self.is_installed = false;
        self.installed_version = None;
        self.installed_from = None;
    }

    /// Merge a successful ratings fetch into the record.
    pub fn apply_ratings(
        &mut self,
        ratings: Vec<RatingSubmission>,
        aggregates: BTreeMap<String, RatingAggregate>,
    ) {
        self.ratings = ratings;
        self.status_aggregate = aggregates;
        self.ratings_loaded = true;
        self.in_directory = true;
    }

    /// Status for one rating dimension; absent aggregates are untested.
    #[must_use]
    pub fn status_for(&self, dimension: &str) -> crate::rating::CompatStatus {
        self.status_aggregate
            .get(dimension)
            .map_or(crate::rating::CompatStatus::Untested, RatingAggregate::status)
    }
}
