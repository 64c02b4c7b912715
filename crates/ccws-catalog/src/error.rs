//! Catalog-specific error types.
//!
//! Structured errors for loading the catalog file and for resolving requests
//! against it. Load errors carry the file path; resolution failures are the
//! typed [`ResolutionError`] taxonomy from `ccws-core`, wrapped unchanged.

use std::path::PathBuf;

use ccws_core::{ResolutionError, ValidationError};
use thiserror::Error;

/// Errors that can occur during catalog operations.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// YAML parsing failed.
    #[error("failed to parse YAML at {path}: {source}")]
    YamlParse {
        path: PathBuf,
        source: serde_yaml::Error,
    },

    /// JSON parsing failed.
    #[error("failed to parse JSON at {path}: {source}")]
    JsonParse {
        path: PathBuf,
        source: serde_json::Error,
    },

    /// A required file was not found.
    #[error("required file not found: {path}")]
    FileNotFound { path: PathBuf },

    /// The catalog's default locale is not one of its supported locales.
    #[error("default locale {locale:?} is not among the supported locales")]
    UnsupportedDefaultLocale { locale: String },

    /// A request could not be resolved against the catalog.
    #[error(transparent)]
    Resolution(#[from] ResolutionError),

    /// A domain primitive was malformed.
    #[error("validation error: {0}")]
    Validation(#[from] ValidationError),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Generic serde_json error (not file-specific).
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Generic serde_yaml error (not file-specific).
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

impl CatalogError {
    /// The resolution failure behind this error, if it is one.
    pub fn as_resolution(&self) -> Option<&ResolutionError> {
        match self {
            Self::Resolution(e) => Some(e),
            _ => None,
        }
    }
}

/// Result type alias for catalog operations.
pub type CatalogResult<T> = Result<T, CatalogError>;
