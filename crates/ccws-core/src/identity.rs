//! # License, Class, and Locale Identifiers
//!
//! Domain-primitive newtypes for the identifiers the resolution engine
//! passes around. Each is a distinct type: you cannot pass a [`LocaleId`]
//! where a [`LicenseClass`] is expected.
//!
//! ## Validation
//!
//! All identifiers reject empty input. [`LocaleId`] additionally restricts
//! its alphabet to ASCII letters, digits, `_` and `-`. The `licenses/<code>`
//! shape of a [`LicenseUri`] is not checked at construction; it is a
//! precondition of ordering and is checked where the sort key is taken.

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// The literal path segment that precedes a license's canonical sort key.
pub const LICENSES_SEGMENT: &str = "licenses";

// ---------------------------------------------------------------------------
// License classes
// ---------------------------------------------------------------------------

/// A named bucket of related license variants (`"standard"`, `"publicdomain"`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct LicenseClass(String);

impl LicenseClass {
    /// Create a license class identifier.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::InvalidLicenseClass`] if the string is
    /// empty or whitespace-only.
    pub fn new(value: impl Into<String>) -> Result<Self, ValidationError> {
        let s = value.into();
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(ValidationError::InvalidLicenseClass);
        }
        Ok(Self(trimmed.to_string()))
    }

    /// The `"standard"` class: jurisdiction-ported, versioned licenses.
    pub fn standard() -> Self {
        Self("standard".to_string())
    }

    /// The `"publicdomain"` class: jurisdiction- and version-agnostic tools.
    pub fn publicdomain() -> Self {
        Self("publicdomain".to_string())
    }

    /// Access the class identifier string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for LicenseClass {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<LicenseClass> for String {
    fn from(c: LicenseClass) -> Self {
        c.0
    }
}

impl std::fmt::Display for LicenseClass {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ---------------------------------------------------------------------------
// License identifiers
// ---------------------------------------------------------------------------

/// A URI-shaped license identifier such as
/// `http://creativecommons.org/licenses/by-nc-sa/2.5/nl/`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct LicenseUri(String);

impl LicenseUri {
    /// Create a license identifier.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::InvalidLicenseUri`] if the string is
    /// empty or whitespace-only.
    pub fn new(value: impl Into<String>) -> Result<Self, ValidationError> {
        let s = value.into();
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(ValidationError::InvalidLicenseUri);
        }
        Ok(Self(trimmed.to_string()))
    }

    /// The path segment immediately following the first `"licenses"`
    /// segment when the identifier is split on `/`.
    ///
    /// Returns `None` when there is no `"licenses"` segment or when nothing
    /// non-empty follows it.
    pub fn sort_key(&self) -> Option<&str> {
        let mut segments = self.0.split('/');
        segments.find(|segment| *segment == LICENSES_SEGMENT)?;
        segments.next().filter(|key| !key.is_empty())
    }

    /// Whether `needle` occurs anywhere within the identifier.
    pub fn contains(&self, needle: &str) -> bool {
        self.0.contains(needle)
    }

    /// Access the identifier string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for LicenseUri {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<LicenseUri> for String {
    fn from(uri: LicenseUri) -> Self {
        uri.0
    }
}

impl std::fmt::Display for LicenseUri {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ---------------------------------------------------------------------------
// Locales
// ---------------------------------------------------------------------------

/// A supported locale identifier (`"en"`, `"de"`, `"pt_BR"`, `"zh-Hant"`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct LocaleId(String);

impl LocaleId {
    /// Create a locale identifier, validating its alphabet.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::InvalidLocale`] if the trimmed string is
    /// empty or contains characters outside `[A-Za-z0-9_-]`.
    pub fn new(value: impl Into<String>) -> Result<Self, ValidationError> {
        let s = value.into();
        let trimmed = s.trim();
        if trimmed.is_empty()
            || !trimmed
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
        {
            return Err(ValidationError::InvalidLocale(s));
        }
        Ok(Self(trimmed.to_string()))
    }

    /// The base language: everything before the first `_` or `-`.
    pub fn language(&self) -> &str {
        self.0
            .split(|c: char| c == '_' || c == '-')
            .next()
            .unwrap_or(&self.0)
    }

    /// Access the locale string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for LocaleId {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<LocaleId> for String {
    fn from(l: LocaleId) -> Self {
        l.0
    }
}

impl std::fmt::Display for LocaleId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ---------------------------------------------------------------------------
// Resolved details
// ---------------------------------------------------------------------------

/// A resolved, localized license record: what the chooser shows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LicenseDetail {
    /// The license identifier.
    pub uri: LicenseUri,
    /// The human-readable name in the requested locale.
    pub name: String,
}
