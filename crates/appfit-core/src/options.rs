// SPDX-License-Identifier: Apache-2.0

use appfit_model::{DIMENSION_BRIDGED, DIMENSION_NATIVE};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
#[non_exhaustive]
pub enum SourceFilter {
    #[default]
    Any,
    OfficialStore,
    Other,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
#[non_exhaustive]
pub enum StatusFilter {
    #[default]
    Any,
    Native,
    Bridged,
}

impl StatusFilter {
    /// The rating dimension this filter selects, if any.
    #[must_use]
    pub const fn dimension(self) -> Option<&'static str> {
        match self {
            Self::Any => None,
            Self::Native => Some(DIMENSION_NATIVE),
            Self::Bridged => Some(DIMENSION_BRIDGED),
        }
    }
}

/// Ordering over status rank; only meaningful when a dimension is selected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
#[non_exhaustive]
pub enum StatusSort {
    #[default]
    None,
    Asc,
    Desc,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
#[non_exhaustive]
pub enum NameOrder {
    #[default]
    AToZ,
    ZToA,
}

/// The user-selected view options a screen feeds into [`crate::compute`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(deny_unknown_fields)]
pub struct ViewOptions {
    pub source_filter: SourceFilter,
    pub status_filter: StatusFilter,
    pub status_sort: StatusSort,
    pub name_order: NameOrder,
    pub favorites_only: bool,
}
