//! # ccws-harness: Issuance Validation Harness
//!
//! Exhaustively exercises a license-issuance endpoint.
//!
//! - [`permute`]: lazy Cartesian product of every question field's answers.
//! - [`answers`]: the two request encodings (answers document, query
//!   string) and their decoders.
//! - [`validate`]: JSON Schema registry over `schemas/`.
//! - [`endpoint`]: the [`IssuanceEndpoint`] trait and an in-process
//!   [`CatalogIssuer`].
//! - [`sweep`]: class × combination × locale runs with accumulate-and-report
//!   or fail-fast semantics.
//!
//! ```no_run
//! use ccws_catalog::Catalog;
//! use ccws_harness::{CatalogIssuer, SchemaValidator, Sweep};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let catalog = Catalog::load("data/catalog.yaml".as_ref())?;
//! let schemas = SchemaValidator::new("schemas")?;
//! let report = Sweep::new(&catalog, &catalog, &schemas)
//!     .exclude_locales(["he"])
//!     .with_extra_param("foo", "bar")
//!     .run(&CatalogIssuer::new(&catalog))?;
//! assert!(report.is_success());
//! # Ok(())
//! # }
//! ```

pub mod answers;
pub mod endpoint;
pub mod error;
pub mod permute;
pub mod sweep;
pub mod validate;

pub use answers::{
    answers_document, decode_answers_document, decode_query_string, document_pairs, query_string,
    AnswerCombination, AnswersError, DecodedAnswers,
};
pub use endpoint::{CatalogIssuer, IssuanceEndpoint, IssueError};
pub use error::{HarnessError, HarnessResult};
pub use permute::{combination_count, permute, Permutations};
pub use sweep::{Encoding, Sweep, SweepFailure, SweepMode, SweepReport};
pub use validate::{CompiledSchema, SchemaValidationDetail, SchemaValidationError, SchemaValidator};
