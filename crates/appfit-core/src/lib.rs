#![forbid(unsafe_code)]
//! Pure computation over the known-record set: the filter/sort pipeline
//! that derives a display list, and the incremental differ that turns two
//! display lists into a minimal edit sequence for the rendering layer.
//!
//! Nothing in this crate suspends or touches I/O; both entry points are
//! deterministic functions of their inputs and may run on any thread.

mod diff;
mod options;
mod pipeline;

pub use diff::{apply, diff, display_eq, ListEdit};
pub use options::{NameOrder, SourceFilter, StatusFilter, StatusSort, ViewOptions};
pub use pipeline::compute;

pub const CRATE_NAME: &str = "appfit-core";
