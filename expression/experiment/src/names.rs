use std::borrow::Borrow;
use std::fmt::{Display, Formatter};
use std::str::FromStr;

use thiserror::Error;

/// The name of an experimental factor, e.g. `Age` or `Treatment`.
///
/// Unique within a design. Names may contain inner spaces (`cell type`) but never tabs, line breaks or
/// other control characters, and never leading or trailing whitespace, since they appear as columns of a
/// tab-delimited file.
#[derive(
    Debug,
    serde::Serialize,
    serde::Deserialize,
    Clone,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash
)]
#[serde(try_from = "String", into = "String")]
pub struct FactorName(String);

impl FactorName {
    fn is_valid(value: &str) -> bool {
        if value.is_empty() {
            return false;
        }

        if value.trim() != value {
            return false;
        }

        !value.chars().any(char::is_control)
    }

    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl FromStr for FactorName {
    type Err = NameError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::try_from(s.to_string())
    }
}

impl TryFrom<String> for FactorName {
    type Error = NameError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        if Self::is_valid(&value) {
            Ok(Self(value))
        } else {
            Err(NameError::InvalidFactorName(value))
        }
    }
}

impl From<FactorName> for String {
    fn from(value: FactorName) -> Self {
        value.0
    }
}

impl Borrow<str> for FactorName {
    fn borrow(&self) -> &str {
        self.as_str()
    }
}

impl Display for FactorName {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.0.as_str())
    }
}

/// The short name of an expression experiment, e.g. `GSE1234`.
///
/// Used in file names and in the `<sample>__<short_name>` sample alias, so no whitespace at all.
#[derive(
    Debug,
    serde::Serialize,
    serde::Deserialize,
    Clone,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash
)]
#[serde(try_from = "String", into = "String")]
pub struct ShortName(String);

impl ShortName {
    fn is_valid(value: &str) -> bool {
        if value.is_empty() {
            return false;
        }

        !value
            .chars()
            .any(|c| c.is_whitespace() || c.is_control() || c == '/')
    }

    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }

    /// `<token>__<short_name>`, the name a sample is given when its name clashes with another experiment's.
    pub fn sample_alias(&self, token: &str) -> String {
        format!("{}__{}", token, self.0)
    }
}

impl FromStr for ShortName {
    type Err = NameError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::try_from(s.to_string())
    }
}

impl TryFrom<String> for ShortName {
    type Error = NameError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        if Self::is_valid(&value) {
            Ok(Self(value))
        } else {
            Err(NameError::InvalidShortName(value))
        }
    }
}

impl From<ShortName> for String {
    fn from(value: ShortName) -> Self {
        value.0
    }
}

impl Display for ShortName {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.0.as_str())
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum NameError {
    #[error("Invalid factor name: '{0}'")]
    InvalidFactorName(String),
    #[error("Invalid experiment short name: '{0}'")]
    InvalidShortName(String),
}
