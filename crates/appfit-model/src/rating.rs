// SPDX-License-Identifier: Apache-2.0

use crate::package::ParseError;
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

/// Rating dimension: the app running without vendor services present.
pub const DIMENSION_NATIVE: &str = "native";
/// Rating dimension: the app running behind a compatibility bridge.
pub const DIMENSION_BRIDGED: &str = "bridged";

/// Submissions score an app 1–4; every aggregate normalizes over this divisor.
pub const SCORE_DENOMINATOR: f32 = 4.0;

/// One community report folded into an aggregate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
#[non_exhaustive]
pub struct RatingSubmission {
    pub rating_type: String,
    pub score: f32,
    pub app_version: Option<String>,
    pub note: Option<String>,
}

impl RatingSubmission {
    #[must_use]
    pub fn new(
        rating_type: String,
        score: f32,
        app_version: Option<String>,
        note: Option<String>,
    ) -> Self {
        Self {
            rating_type,
            score,
            app_version,
            note,
        }
    }
}

/// Rolled-up score for one rating dimension.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
#[non_exhaustive]
pub struct RatingAggregate {
    pub score: f32,
    pub denominator: f32,
    pub rating_type: String,
    pub total_ratings: u32,
}

impl RatingAggregate {
    #[must_use]
    pub fn new(score: f32, denominator: f32, rating_type: String, total_ratings: u32) -> Self {
        Self {
            score,
            denominator,
            rating_type,
            total_ratings,
        }
    }

    /// An aggregate nothing has been folded into yet.
    #[must_use]
    pub fn untested(rating_type: String) -> Self {
        Self {
            score: 0.0,
            denominator: SCORE_DENOMINATOR,
            rating_type,
            total_ratings: 0,
        }
    }

    pub fn validate(&self) -> Result<(), ParseError> {
        if self.denominator <= 0.0 {
            return Err(ParseError::InvalidFormat(
                "aggregate denominator must be positive",
            ));
        }
        if self.score < 0.0 || self.score > self.denominator {
            return Err(ParseError::InvalidFormat(
                "aggregate score must lie in 0..=denominator",
            ));
        }
        Ok(())
    }

    /// Bucket the score ratio into a display status.
    ///
    /// Zero submissions never average into a status: such aggregates are
    /// untested regardless of the stored score.
    #[must_use]
    pub fn status(&self) -> CompatStatus {
        if self.total_ratings == 0 || self.denominator <= 0.0 {
            return CompatStatus::Untested;
        }
        let ratio = self.score / self.denominator;
        if ratio < 0.5 {
            CompatStatus::Unusable
        } else if ratio < 0.75 {
            CompatStatus::MajorIssues
        } else if ratio < 1.0 {
            CompatStatus::MinorIssues
        } else {
            CompatStatus::Perfect
        }
    }
}

/// Display bucket over a rating aggregate.
///
/// Total order, best first: Perfect > MinorIssues > MajorIssues >
/// Unusable > Untested.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[non_exhaustive]
pub enum CompatStatus {
    Perfect,
    MinorIssues,
    MajorIssues,
    Unusable,
    Untested,
}

impl CompatStatus {
    #[must_use]
    pub const fn rank(self) -> u8 {
        match self {
            Self::Perfect => 4,
            Self::MinorIssues => 3,
            Self::MajorIssues => 2,
            Self::Unusable => 1,
            Self::Untested => 0,
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Perfect => "perfect",
            Self::MinorIssues => "minor_issues",
            Self::MajorIssues => "major_issues",
            Self::Unusable => "unusable",
            Self::Untested => "untested",
        }
    }

    #[must_use]
    pub const fn is_tested(self) -> bool {
        !matches!(self, Self::Untested)
    }
}

impl Display for CompatStatus {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
