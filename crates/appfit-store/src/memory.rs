// SPDX-License-Identifier: Apache-2.0

use crate::{RecordStore, StoreError, StoreErrorCode};
use appfit_model::{AppRecord, PackageId};
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

/// In-memory store for tests; writes can be made to fail on demand.
#[derive(Default)]
pub struct MemoryStore {
    records: Mutex<BTreeMap<PackageId, AppRecord>>,
    fail_writes: AtomicBool,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// While set, every mutating call returns an io error.
    pub fn set_fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::Relaxed);
    }

    fn check_writable(&self) -> Result<(), StoreError> {
        if self.fail_writes.load(Ordering::Relaxed) {
            return Err(StoreError::new(
                StoreErrorCode::Io,
                "injected write failure",
            ));
        }
        Ok(())
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, BTreeMap<PackageId, AppRecord>>, StoreError> {
        self.records
            .lock()
            .map_err(|_| StoreError::new(StoreErrorCode::Internal, "store mutex poisoned"))
    }
}

impl RecordStore for MemoryStore {
    fn get(&self, package: &PackageId) -> Result<Option<AppRecord>, StoreError> {
        Ok(self.lock()?.get(package).cloned())
    }

    fn upsert(&self, record: &AppRecord) -> Result<(), StoreError> {
        self.check_writable()?;
        self.lock()?.insert(record.package.clone(), record.clone());
        Ok(())
    }

    fn set_favorite(&self, package: &PackageId, favorite: bool) -> Result<(), StoreError> {
        self.check_writable()?;
        let mut records = self.lock()?;
        match records.get_mut(package) {
            Some(record) => {
                record.is_favorite = favorite;
                Ok(())
            }
            None => Err(StoreError::new(
                StoreErrorCode::NotFound,
                format!("no record for {package}"),
            )),
        }
    }

    fn list_all(&self) -> Result<Vec<AppRecord>, StoreError> {
        Ok(self.lock()?.values().cloned().collect())
    }

    fn search(&self, name_fragment: &str) -> Result<Vec<AppRecord>, StoreError> {
        let needle = name_fragment.to_lowercase();
        Ok(self
            .lock()?
            .values()
            .filter(|r| r.display_name.to_lowercase().contains(&needle))
            .cloned()
            .collect())
    }

    fn delete(&self, package: &PackageId) -> Result<(), StoreError> {
        self.check_writable()?;
        self.lock()?.remove(package);
        Ok(())
    }
}
