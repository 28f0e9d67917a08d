#![forbid(unsafe_code)]
//! appfit model SSOT.
//!
//! Value types shared by every other crate: validated package identifiers,
//! rating aggregates and their derived compatibility status, and the
//! per-package record that merges local install state with remotely
//! fetched community ratings.

mod package;
mod rating;
mod record;

pub use package::{
    is_official_store, InstalledPackage, PackageId, ParseError, ID_MAX_LEN, NAME_MAX_LEN,
    OFFICIAL_STORE_FAMILY,
};
pub use rating::{
    CompatStatus, RatingAggregate, RatingSubmission, DIMENSION_BRIDGED, DIMENSION_NATIVE,
    SCORE_DENOMINATOR,
};
pub use record::AppRecord;

pub const CRATE_NAME: &str = "appfit-model";
