#![deny(missing_docs)]

//! # ccws-core: Foundational Types for the License Web Services
//!
//! This crate defines the types that every other crate in the workspace
//! depends on. It has no internal crate dependencies, only `serde`,
//! `serde_json`, and `thiserror` from the external ecosystem.
//!
//! ## Design Principles
//!
//! 1. **Newtype wrappers for domain primitives.** Every identifier is a
//!    distinct type. You cannot pass a [`Version`] where a [`JurisdictionId`]
//!    is expected.
//!
//! 2. **Catalog ordering lives on the type.** [`Version`] implements a total
//!    order that treats dotted numeric segments numerically, so "the latest
//!    version" is a plain `max()`.
//!
//! 3. **[`ResolutionError`] taxonomy.** Every failure of the resolution
//!    engine is a typed variant. Locale resolution has no error variant: it
//!    degrades to a default instead of failing.

pub mod error;
pub mod identity;
pub mod jurisdiction;
pub mod version;

// Re-export primary types at crate root for ergonomic imports.
pub use error::{ResolutionError, ValidationError};
pub use identity::{LicenseClass, LicenseDetail, LicenseUri, LocaleId};
pub use jurisdiction::JurisdictionId;
pub use version::Version;
