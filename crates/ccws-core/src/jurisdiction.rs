//! # Jurisdiction Identifiers
//!
//! A jurisdiction identifies the legal scope under which a distinct set of
//! license variants applies (`"nl"`, `"de"`, `"us"`). The reserved
//! identifier `"-"` names the jurisdiction-agnostic bucket: unported
//! licenses and the public-domain tools live there.
//!
//! ## Validation
//!
//! [`JurisdictionId`] is validated to be non-empty at construction time and
//! stored trimmed.

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// Reserved identifier for the jurisdiction-agnostic bucket.
pub const AGNOSTIC_JURISDICTION: &str = "-";

/// A jurisdiction identifier, typically an ISO 3166-1 alpha-2 code or `"-"`.
///
/// # Validation
///
/// Must be a non-empty string after trimming. No further format restrictions
/// are imposed because jurisdiction naming is owned by the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct JurisdictionId(String);

impl JurisdictionId {
    /// Create a jurisdiction identifier from a string, validating non-emptiness.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::InvalidJurisdictionId`] if the string is
    /// empty or whitespace-only.
    pub fn new(value: impl Into<String>) -> Result<Self, ValidationError> {
        let s = value.into();
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(ValidationError::InvalidJurisdictionId);
        }
        Ok(Self(trimmed.to_string()))
    }

    /// The jurisdiction-agnostic bucket `"-"`.
    pub fn agnostic() -> Self {
        Self(AGNOSTIC_JURISDICTION.to_string())
    }

    /// Whether this is the jurisdiction-agnostic bucket.
    pub fn is_agnostic(&self) -> bool {
        self.0 == AGNOSTIC_JURISDICTION
    }

    /// Access the jurisdiction identifier string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for JurisdictionId {
    fn default() -> Self {
        Self::agnostic()
    }
}

impl TryFrom<String> for JurisdictionId {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<JurisdictionId> for String {
    fn from(id: JurisdictionId) -> Self {
        id.0
    }
}

impl std::fmt::Display for JurisdictionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
