//! # License Versions
//!
//! Version identifiers are opaque strings owned by the catalog (`"2.0"`,
//! `"2.5"`, `"3.0"`, and `"-"` for unversioned public-domain tools). Within
//! one jurisdiction all licenses share one version set, so the governing
//! version is simply the maximum under [`Version`]'s ordering.
//!
//! ## Ordering
//!
//! Identifiers are split on `.` and compared segment by segment. Two
//! segments that both parse as unsigned integers compare numerically, two
//! non-numeric segments compare lexicographically, and a numeric segment
//! sorts before a non-numeric one. A version that is a strict
//! prefix of another sorts first. Remaining ties (`"2.0"` vs `"2.00"`) fall
//! back to the raw string so that `Ord` agrees with `Eq`.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// Placeholder version carried by unversioned catalog entries.
pub const UNVERSIONED: &str = "-";

/// A license version identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Version(String);

impl Version {
    /// Create a version from a string. Surrounding whitespace is trimmed.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::InvalidVersion`] if the trimmed string is empty.
    pub fn new(value: impl Into<String>) -> Result<Self, ValidationError> {
        let s = value.into();
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(ValidationError::InvalidVersion);
        }
        Ok(Self(trimmed.to_string()))
    }

    /// The `"-"` version used by unversioned entries.
    pub fn unversioned() -> Self {
        Self(UNVERSIONED.to_string())
    }

    /// Whether this is the `"-"` placeholder.
    pub fn is_unversioned(&self) -> bool {
        self.0 == UNVERSIONED
    }

    /// Access the version string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

fn compare_segments(a: &str, b: &str) -> Ordering {
    match (a.parse::<u64>(), b.parse::<u64>()) {
        (Ok(x), Ok(y)) => x.cmp(&y),
        (Ok(_), Err(_)) => Ordering::Less,
        (Err(_), Ok(_)) => Ordering::Greater,
        (Err(_), Err(_)) => a.cmp(b),
    }
}

impl Ord for Version {
    fn cmp(&self, other: &Self) -> Ordering {
        let mut left = self.0.split('.');
        let mut right = other.0.split('.');
        loop {
            match (left.next(), right.next()) {
                (Some(a), Some(b)) => match compare_segments(a, b) {
                    Ordering::Equal => continue,
                    unequal => return unequal,
                },
                (None, Some(_)) => return Ordering::Less,
                (Some(_), None) => return Ordering::Greater,
                (None, None) => return self.0.cmp(&other.0),
            }
        }
    }
}

impl PartialOrd for Version {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl TryFrom<String> for Version {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Version> for String {
    fn from(v: Version) -> Self {
        v.0
    }
}

impl std::fmt::Display for Version {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn v(s: &str) -> Version {
        Version::new(s).unwrap()
    }

    #[test]
    fn version_trims_and_rejects_empty() {
        assert_eq!(v(" 2.5 ").as_str(), "2.5");
        assert!(Version::new("").is_err());
        assert!(Version::new("  ").is_err());
    }

    #[test]
    fn numeric_segments_compare_numerically() {
        assert!(v("10.0") > v("9.0"));
        assert!(v("2.5") > v("2.0"));
        assert!(v("3.0") > v("2.5"));
    }

    #[test]
    fn prefix_sorts_first() {
        assert!(v("2") < v("2.0"));
        assert!(v("2.1") < v("2.1.1"));
    }

    #[test]
    fn non_numeric_segments_compare_lexically() {
        assert!(v("2.0-beta") < v("2.0-rc"));
        assert!(v("a") < v("b"));
    }

    #[test]
    fn max_picks_latest() {
        let versions = [v("1.0"), v("2.5"), v("2.0"), v("3.0")];
        assert_eq!(versions.iter().max().unwrap().as_str(), "3.0");
    }

    #[test]
    fn ord_agrees_with_eq() {
        assert_ne!(v("2.0"), v("2.00"));
        assert_ne!(v("2.0").cmp(&v("2.00")), Ordering::Equal);
    }

    #[test]
    fn unversioned_placeholder() {
        assert!(Version::unversioned().is_unversioned());
        assert_eq!(v("-"), Version::unversioned());
        assert!(!v("3.0").is_unversioned());
    }
}
