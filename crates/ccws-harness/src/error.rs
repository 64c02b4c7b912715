//! Harness setup errors.
//!
//! Per-request failures during a sweep are data (see
//! [`SweepFailure`](crate::sweep::SweepFailure)); only failures that prevent
//! a sweep from running surface as [`HarnessError`].

use ccws_catalog::CatalogError;
use ccws_core::ValidationError;
use thiserror::Error;

use crate::validate::SchemaValidationError;

/// Errors that stop the harness before or while it sets up a run.
#[derive(Error, Debug)]
pub enum HarnessError {
    /// A schema could not be loaded, found, or compiled.
    #[error(transparent)]
    Schema(#[from] SchemaValidationError),

    /// The catalog could not answer a question lookup.
    #[error(transparent)]
    Catalog(#[from] CatalogError),

    /// A domain identifier was malformed.
    #[error("validation error: {0}")]
    Validation(#[from] ValidationError),
}

/// Result type alias for harness operations.
pub type HarnessResult<T> = Result<T, HarnessError>;
