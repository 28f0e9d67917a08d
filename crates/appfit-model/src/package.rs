// SPDX-License-Identifier: Apache-2.0

use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

pub const ID_MAX_LEN: usize = 256;
pub const NAME_MAX_LEN: usize = 256;

/// Install-source identifiers treated as standard app marketplaces.
pub const OFFICIAL_STORE_FAMILY: [&str; 2] = ["com.android.vending", "com.aurora.store"];

#[must_use]
pub fn is_official_store(source: &str) -> bool {
    OFFICIAL_STORE_FAMILY.contains(&source)
}

#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ParseError {
    Empty(&'static str),
    Trimmed(&'static str),
    TooLong(&'static str, usize),
    InvalidFormat(&'static str),
}

impl Display for ParseError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Empty(name) => write!(f, "{name} must not be empty"),
            Self::Trimmed(name) => {
                write!(f, "{name} must not contain leading/trailing whitespace")
            }
            Self::TooLong(name, max) => write!(f, "{name} exceeds max length {max}"),
            Self::InvalidFormat(msg) => f.write_str(msg),
        }
    }
}

impl std::error::Error for ParseError {}

/// Reverse-DNS package identifier, the stable key for a record's lifetime.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, PartialOrd, Ord)]
#[serde(transparent)]
#[non_exhaustive]
pub struct PackageId(String);

impl PackageId {
    pub fn parse(input: &str) -> Result<Self, ParseError> {
        if input.is_empty() {
            return Err(ParseError::Empty("package_id"));
        }
        if input.trim() != input {
            return Err(ParseError::Trimmed("package_id"));
        }
        if input.len() > ID_MAX_LEN {
            return Err(ParseError::TooLong("package_id", ID_MAX_LEN));
        }
        if input.chars().any(char::is_whitespace) {
            return Err(ParseError::InvalidFormat(
                "package_id must not contain whitespace",
            ));
        }
        Ok(Self(input.to_string()))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for PackageId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// One row of a device package scan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
#[non_exhaustive]
pub struct InstalledPackage {
    pub package: PackageId,
    pub display_name: String,
    pub installed_version: Option<String>,
    pub installed_from: Option<String>,
}

impl InstalledPackage {
    #[must_use]
    pub fn new(
        package: PackageId,
        display_name: String,
        installed_version: Option<String>,
        installed_from: Option<String>,
    ) -> Self {
        Self {
            package,
            display_name,
            installed_version,
            installed_from,
        }
    }
}
