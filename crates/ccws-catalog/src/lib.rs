//! # ccws-catalog: License Catalog and Resolution Engine
//!
//! Loads the license catalog and answers chooser requests against it.
//!
//! ## Resolution Pipeline
//!
//! A [`ChooserRequest`] (jurisdiction, language, exclusions, optional
//! version) flows through:
//!
//! 1. [`LocaleResolver`]: nearest supported locale, never fails.
//! 2. [`query::licenses_for`]: governing version for the jurisdiction, then
//!    the standard licenses at that version plus the public-domain entries.
//! 3. [`filter_excluded`]: drops identifiers containing any exclusion.
//! 4. [`DetailLookup`]: localized `(uri, name)` records.
//! 5. [`canonical_sort`]: stable order by the segment after `licenses`.
//!
//! ## Catalog Interfaces
//!
//! The pipeline consumes the [`LicenseSource`], [`DetailLookup`],
//! [`LocaleTable`], and [`QuestionSource`] traits. [`Catalog`] implements all
//! of them over a YAML snapshot (`data/catalog.yaml`).
//!
//! ## Caching
//!
//! [`ChooserCache`] memoizes results per catalog revision. Nothing is cached
//! unless a cache is placed in front of the chooser.

pub mod cache;
pub mod catalog;
pub mod chooser;
pub mod document;
pub mod error;
pub mod filter;
pub mod locale;
pub mod ordering;
pub mod parser;
pub mod query;
pub mod source;
pub mod validation;

pub use cache::ChooserCache;
pub use catalog::Catalog;
pub use chooser::{ChooserRequest, LicenseChooser};
pub use document::{CatalogDocument, ClassEntry, LicenseEntry, QuestionField};
pub use error::{CatalogError, CatalogResult};
pub use filter::{filter_excluded, Exclusions};
pub use locale::{nearest_supported_in, requested_language, LocaleResolver};
pub use ordering::{canonical_sort, canonical_sort_key};
pub use source::{DetailLookup, LicenseSource, LocaleTable, QuestionSource};
pub use validation::{validate_catalog, CatalogValidationResult};
