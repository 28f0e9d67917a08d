#![forbid(unsafe_code)]
//! Async coordination between the device, the local store, and the remote
//! ratings service: the per-package refresh state machine, single-flight
//! fetch coalescing, serialized per-package writes, inventory rebuilds,
//! debounced recomputation, and the per-screen list session.

mod coalesce;
mod debounce;
mod inventory;
mod orchestrator;
mod service;
mod session;

pub use coalesce::KeyedLocks;
pub use debounce::{Debouncer, DEFAULT_DEBOUNCE};
pub use inventory::{rebuild_known_set, PackageInventory, StaticInventory};
pub use orchestrator::{LoadState, RatingsRefreshOrchestrator};
pub use service::{
    FakeRatingsService, HttpRatingsService, RatingsPayload, RatingsService, RetryPolicy,
    ServiceError, ServiceErrorCode,
};
pub use session::ListSession;

use appfit_store::{StoreError, StoreErrorCode};
use std::fmt::{Display, Formatter};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum SyncErrorCode {
    Network,
    Deserialization,
    NotFound,
    Storage,
    Internal,
}

impl SyncErrorCode {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Network => "network_error",
            Self::Deserialization => "deserialization_error",
            Self::NotFound => "not_found",
            Self::Storage => "storage_error",
            Self::Internal => "internal_error",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncError {
    pub code: SyncErrorCode,
    pub message: String,
}

impl SyncError {
    #[must_use]
    pub fn new(code: SyncErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }
}

impl Display for SyncError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.code.as_str(), self.message)
    }
}

impl std::error::Error for SyncError {}

impl From<StoreError> for SyncError {
    fn from(err: StoreError) -> Self {
        let code = match err.code {
            StoreErrorCode::NotFound => SyncErrorCode::NotFound,
            _ => SyncErrorCode::Storage,
        };
        Self::new(code, err.to_string())
    }
}

impl From<ServiceError> for SyncError {
    fn from(err: ServiceError) -> Self {
        let code = match err.code {
            ServiceErrorCode::NotFound => SyncErrorCode::NotFound,
            ServiceErrorCode::Deserialization => SyncErrorCode::Deserialization,
            ServiceErrorCode::Network => SyncErrorCode::Network,
        };
        Self::new(code, err.to_string())
    }
}

pub const CRATE_NAME: &str = "appfit-sync";
