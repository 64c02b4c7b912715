//! # Error Hierarchy
//!
//! Structured error types for the license resolution engine, built with
//! `thiserror`. No `Box<dyn Error>`, no `.unwrap()` outside tests.
//!
//! Two families:
//!
//! - [`ValidationError`]: a domain primitive was constructed from malformed
//!   input (empty jurisdiction, illegal locale characters, ...).
//! - [`ResolutionError`]: a well-formed request could not be resolved
//!   against the catalog. These surface at the request boundary as structured
//!   error responses.

use thiserror::Error;

/// Validation errors for domain primitive newtypes.
///
/// Each identifier type enforces format constraints at construction time.
/// The error carries the rejected input so operators can see what arrived.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Jurisdiction identifier is empty.
    #[error("invalid jurisdiction ID: must be non-empty")]
    InvalidJurisdictionId,

    /// Version identifier is empty.
    #[error("invalid version: must be non-empty")]
    InvalidVersion,

    /// License class identifier is empty.
    #[error("invalid license class: must be non-empty")]
    InvalidLicenseClass,

    /// License URI is empty.
    #[error("invalid license URI: must be non-empty")]
    InvalidLicenseUri,

    /// Locale identifier is empty or contains characters outside
    /// `[A-Za-z0-9_-]`.
    #[error("invalid locale ID: \"{0}\" (expected ASCII letters, digits, '_' or '-')")]
    InvalidLocale(String),
}

/// Failures of the license resolution engine.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ResolutionError {
    /// The jurisdiction has no registered versions in the standard class.
    #[error("unknown jurisdiction: \"{jurisdiction}\" has no registered license versions")]
    UnknownJurisdiction {
        /// The requested jurisdiction.
        jurisdiction: String,
    },

    /// An explicit version was requested that the jurisdiction does not carry.
    #[error("invalid version \"{requested}\" for jurisdiction \"{jurisdiction}\" (available: {})", available.join(", "))]
    InvalidVersion {
        /// The requested jurisdiction.
        jurisdiction: String,
        /// The version that was asked for.
        requested: String,
        /// The versions the jurisdiction actually carries, in ascending order.
        available: Vec<String>,
    },

    /// A license identifier lacks the `licenses` path segment (or the
    /// segment that must follow it), so no canonical sort key exists.
    #[error("malformed license identifier: \"{uri}\" (expected a 'licenses/<code>' path segment)")]
    MalformedIdentifier {
        /// The offending identifier.
        uri: String,
    },

    /// Detail lookup was asked about a license the catalog does not know.
    #[error("unknown license: \"{uri}\"")]
    UnknownLicense {
        /// The identifier that was looked up.
        uri: String,
    },

    /// The license class is not present in the catalog.
    #[error("unknown license class: \"{class}\"")]
    UnknownLicenseClass {
        /// The requested class.
        class: String,
    },
}
