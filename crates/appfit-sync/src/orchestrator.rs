// SPDX-License-Identifier: Apache-2.0

use crate::coalesce::KeyedLocks;
use crate::service::RatingsService;
use crate::{SyncError, SyncErrorCode};
use appfit_model::{AppRecord, PackageId};
use appfit_store::RecordStore;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{info, warn};

/// Per-package ratings lifecycle. `Loaded` is terminal for the process
/// lifetime; `LoadFailed` returns to `Loading` on the next explicit call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum LoadState {
    NotLoaded,
    Loading,
    Loaded,
    LoadFailed,
}

/// Coordinates fetch-or-reuse of remote ratings per package.
///
/// At most one fetch is in flight per package id: concurrent callers
/// queue on a keyed lock and re-check the state once they hold it, so the
/// second caller of an already-loading package reuses the first caller's
/// result instead of issuing a duplicate fetch. A successful fetch is the
/// only path that mutates persisted rating data.
pub struct RatingsRefreshOrchestrator {
    service: Arc<dyn RatingsService>,
    store: Arc<dyn RecordStore>,
    states: Mutex<HashMap<PackageId, LoadState>>,
    inflight: KeyedLocks,
    writes: KeyedLocks,
}

impl RatingsRefreshOrchestrator {
    #[must_use]
    pub fn new(service: Arc<dyn RatingsService>, store: Arc<dyn RecordStore>) -> Self {
        Self {
            service,
            store,
            states: Mutex::new(HashMap::new()),
            inflight: KeyedLocks::new(),
            writes: KeyedLocks::new(),
        }
    }

    pub async fn load_state(&self, package: &PackageId) -> LoadState {
        self.states
            .lock()
            .await
            .get(package)
            .copied()
            .unwrap_or(LoadState::NotLoaded)
    }

    async fn set_state(&self, package: &PackageId, state: LoadState) {
        self.states.lock().await.insert(package.clone(), state);
    }

    fn stored_record(&self, package: &PackageId) -> Result<AppRecord, SyncError> {
        self.store.get(package)?.ok_or_else(|| {
            SyncError::new(
                SyncErrorCode::NotFound,
                format!("no local record for {package}"),
            )
        })
    }

    /// Fetch-or-reuse ratings for one record.
    ///
    /// No-op returning the stored record once `Loaded`. On failure the
    /// record keeps its prior persisted state, nothing partial is written,
    /// and the error is surfaced without automatic retry; a later call
    /// retries from `LoadFailed`.
    pub async fn ensure_ratings_loaded(&self, package: &PackageId) -> Result<AppRecord, SyncError> {
        if self.load_state(package).await == LoadState::Loaded {
            return self.stored_record(package);
        }

        let _flight = self.inflight.acquire(package.as_str()).await;
        // A queued caller lands here after the first one finished.
        if self.load_state(package).await == LoadState::Loaded {
            return self.stored_record(package);
        }

        self.set_state(package, LoadState::Loading).await;
        match self.service.fetch_ratings(package).await {
            Ok(payload) => {
                let _write = self.writes.acquire(package.as_str()).await;
                let mut record = match self.stored_record(package) {
                    Ok(record) => record,
                    Err(err) => {
                        self.set_state(package, LoadState::LoadFailed).await;
                        return Err(err);
                    }
                };
                record.apply_ratings(payload.ratings, payload.aggregates);
                if let Err(err) = self.store.upsert(&record) {
                    self.set_state(package, LoadState::LoadFailed).await;
                    warn!(package = %package, error = %err, "ratings persist failed");
                    return Err(err.into());
                }
                self.set_state(package, LoadState::Loaded).await;
                info!(package = %package, ratings = record.ratings.len(), "ratings loaded");
                Ok(record)
            }
            Err(err) => {
                self.set_state(package, LoadState::LoadFailed).await;
                warn!(package = %package, error = %err, "ratings fetch failed");
                Err(err.into())
            }
        }
    }

    /// Persist the favorite flag, serialized with every other write for
    /// the same package so an earlier in-flight write cannot overtake a
    /// later one.
    ///
    /// On storage failure the caller's optimistic in-memory toggle is
    /// deliberately NOT reverted; the flag rides along with the next
    /// successful whole-record upsert.
    pub async fn set_favorite(&self, package: &PackageId, favorite: bool) -> Result<(), SyncError> {
        let _write = self.writes.acquire(package.as_str()).await;
        self.store.set_favorite(package, favorite)?;
        Ok(())
    }
}
