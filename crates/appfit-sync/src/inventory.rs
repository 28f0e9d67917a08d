// SPDX-License-Identifier: Apache-2.0

use crate::SyncError;
use appfit_model::{AppRecord, InstalledPackage, PackageId};
use appfit_store::RecordStore;
use std::collections::HashSet;
use tracing::info;

/// Source of the device's installed-package scan.
pub trait PackageInventory: Send + Sync {
    fn list_installed(&self) -> Vec<InstalledPackage>;
}

/// Fixed inventory snapshot, used by tests and by imports from a file.
pub struct StaticInventory {
    packages: Vec<InstalledPackage>,
}

impl StaticInventory {
    #[must_use]
    pub fn new(packages: Vec<InstalledPackage>) -> Self {
        Self { packages }
    }
}

impl PackageInventory for StaticInventory {
    fn list_installed(&self) -> Vec<InstalledPackage> {
        self.packages.clone()
    }
}

/// Merge a fresh device scan into the store and return the rebuilt set.
///
/// Existing records keep everything the scan does not know about
/// (favorite flag, ratings, directory membership). Records whose package
/// is gone from the device lose their install state if the directory
/// knows them, and are deleted outright if it does not.
pub fn rebuild_known_set(
    store: &dyn RecordStore,
    inventory: &dyn PackageInventory,
) -> Result<Vec<AppRecord>, SyncError> {
    let scan = inventory.list_installed();
    let scanned: HashSet<PackageId> = scan.iter().map(|p| p.package.clone()).collect();

    for pkg in scan {
        match store.get(&pkg.package)? {
            Some(mut existing) => {
                existing.absorb_scan(pkg);
                store.upsert(&existing)?;
            }
            None => {
                store.upsert(&AppRecord::from_scan(pkg))?;
            }
        }
    }

    for record in store.list_all()? {
        if record.is_installed && !scanned.contains(&record.package) {
            if record.in_directory {
                let mut kept = record;
                kept.clear_install_state();
                store.upsert(&kept)?;
            } else {
                store.delete(&record.package)?;
            }
        }
    }

    let rebuilt = store.list_all()?;
    info!(records = rebuilt.len(), "known-record set rebuilt");
    Ok(rebuilt)
}
