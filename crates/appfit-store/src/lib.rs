#![forbid(unsafe_code)]
//! Local persistence for the known-record set.
//!
//! The [`RecordStore`] trait is the only surface the rest of the
//! workspace sees; [`SqliteStore`] is the on-device implementation and
//! [`MemoryStore`] the test double.

mod memory;
mod sqlite;

pub use memory::MemoryStore;
pub use sqlite::SqliteStore;

use appfit_model::{AppRecord, PackageId};
use std::fmt::{Display, Formatter};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum StoreErrorCode {
    NotFound,
    Validation,
    Io,
    Internal,
}

impl StoreErrorCode {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::NotFound => "not_found",
            Self::Validation => "validation_error",
            Self::Io => "io_error",
            Self::Internal => "internal_error",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreError {
    pub code: StoreErrorCode,
    pub message: String,
}

impl StoreError {
    #[must_use]
    pub fn new(code: StoreErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.code.as_str(), self.message)
    }
}

impl std::error::Error for StoreError {}

/// Persistent store keyed by package id.
///
/// `upsert` writes the whole record; `set_favorite` exists so the one
/// user-mutable flag can be written without first re-reading the record.
pub trait RecordStore: Send + Sync {
    fn get(&self, package: &PackageId) -> Result<Option<AppRecord>, StoreError>;
    fn upsert(&self, record: &AppRecord) -> Result<(), StoreError>;
    fn set_favorite(&self, package: &PackageId, favorite: bool) -> Result<(), StoreError>;
    fn list_all(&self) -> Result<Vec<AppRecord>, StoreError>;
    fn search(&self, name_fragment: &str) -> Result<Vec<AppRecord>, StoreError>;
    fn delete(&self, package: &PackageId) -> Result<(), StoreError>;
}
