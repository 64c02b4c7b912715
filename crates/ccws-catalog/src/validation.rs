//! # Catalog Lint
//!
//! Structural checks over a loaded [`Catalog`] that the resolution engine
//! relies on but the YAML model cannot express.
//!
//! ## Errors
//!
//! - A license identifier without a `licenses` segment followed by another
//!   segment (it could never be sorted).
//! - The same identifier registered twice.
//! - No public-domain entry under jurisdiction `"-"` and version `"-"`.
//!
//! ## Warnings
//!
//! - Standard-class licenses of one jurisdiction that do not share the same
//!   version set.
//! - A question field with no answers, which empties the answer product.

use std::collections::{BTreeMap, BTreeSet, HashSet};

use serde::Serialize;

use ccws_core::{JurisdictionId, LicenseClass, Version};

use crate::catalog::Catalog;

// ---------------------------------------------------------------------------
// Validation Results
// ---------------------------------------------------------------------------

/// Result of linting a catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CatalogValidationResult {
    /// Whether the catalog is structurally valid.
    pub is_valid: bool,
    /// Validation errors, if any.
    pub errors: Vec<String>,
    /// Validation warnings (non-fatal).
    pub warnings: Vec<String>,
}

impl CatalogValidationResult {
    /// A passing result.
    pub fn ok() -> Self {
        Self {
            is_valid: true,
            errors: Vec::new(),
            warnings: Vec::new(),
        }
    }

    /// Add an error. Marks result as invalid.
    pub fn add_error(&mut self, error: String) {
        self.is_valid = false;
        self.errors.push(error);
    }

    /// Add a warning (does not affect validity).
    pub fn add_warning(&mut self, warning: String) {
        self.warnings.push(warning);
    }

    /// Merge another result into this one.
    pub fn merge(&mut self, other: CatalogValidationResult) {
        if !other.is_valid {
            self.is_valid = false;
        }
        self.errors.extend(other.errors);
        self.warnings.extend(other.warnings);
    }
}

// ---------------------------------------------------------------------------
// Catalog Validation
// ---------------------------------------------------------------------------

/// Lint `catalog`.
pub fn validate_catalog(catalog: &Catalog) -> CatalogValidationResult {
    let mut result = CatalogValidationResult::ok();
    let doc = catalog.document();

    // 1. Identifiers: sortable and unique
    let mut seen = HashSet::new();
    for uri in catalog.all_uris() {
        if uri.sort_key().is_none() {
            result.add_error(format!(
                "license identifier has no segment after \"licenses\": {uri}"
            ));
        }
        if !seen.insert(uri) {
            result.add_error(format!("duplicate license identifier: {uri}"));
        }
    }

    // 2. Public-domain entries
    let has_public_domain = doc
        .class(&LicenseClass::publicdomain())
        .into_iter()
        .flat_map(|c| &c.licenses)
        .flat_map(|l| &l.jurisdictions)
        .filter(|j| j.id.is_agnostic())
        .flat_map(|j| &j.versions)
        .any(|v| v.id.is_unversioned());
    if !has_public_domain {
        result.add_error(
            "no publicdomain license registered under jurisdiction \"-\" and version \"-\""
                .to_string(),
        );
    }

    result.merge(check_revved_as_group(catalog));
    result.merge(check_fields(catalog));

    tracing::debug!(
        errors = result.errors.len(),
        warnings = result.warnings.len(),
        "linted license catalog"
    );
    result
}

/// Every standard-class license of a jurisdiction should carry the same
/// version set.
fn check_revved_as_group(catalog: &Catalog) -> CatalogValidationResult {
    let mut result = CatalogValidationResult::ok();
    let Some(standard) = catalog.document().class(&LicenseClass::standard()) else {
        return result;
    };

    let mut by_jurisdiction: BTreeMap<&JurisdictionId, Vec<(&str, BTreeSet<&Version>)>> =
        BTreeMap::new();
    for license in &standard.licenses {
        for port in &license.jurisdictions {
            let versions = port.versions.iter().map(|v| &v.id).collect();
            by_jurisdiction
                .entry(&port.id)
                .or_default()
                .push((license.code.as_str(), versions));
        }
    }

    for (jurisdiction, licenses) in by_jurisdiction {
        let Some((_, first)) = licenses.first() else {
            continue;
        };
        for (code, versions) in &licenses[1..] {
            if versions != first {
                result.add_warning(format!(
                    "jurisdiction \"{jurisdiction}\": license \"{code}\" has versions {} but its \
                     siblings have {}",
                    join(versions),
                    join(first)
                ));
            }
        }
    }
    result
}

fn check_fields(catalog: &Catalog) -> CatalogValidationResult {
    let mut result = CatalogValidationResult::ok();
    for class in &catalog.document().classes {
        for field in class.fields.iter().filter(|f| f.answers.is_empty()) {
            result.add_warning(format!(
                "class \"{}\": field \"{}\" has no answers; the answer product is empty",
                class.id, field.id
            ));
        }
    }
    result
}

fn join(versions: &BTreeSet<&Version>) -> String {
    let parts: Vec<&str> = versions.iter().map(|v| v.as_str()).collect();
    format!("[{}]", parts.join(", "))
}
