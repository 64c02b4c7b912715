//! # Catalog Document Model
//!
//! The serde model of the catalog file. One YAML document describes every
//! license class, the question fields each class asks, and every license
//! variant per jurisdiction and version:
//!
//! ```yaml
//! default_locale: en
//! locales: [en, de, nl]
//! jurisdictions:
//!   nl: { en: Netherlands, de: Niederlande, nl: Nederland }
//! classes:
//!   - id: standard
//!     fields:
//!       - { id: commercial, answers: [y, n] }
//!     licenses:
//!       - code: by
//!         names: { en: Attribution, de: Namensnennung }
//!         jurisdictions:
//!           - id: nl
//!             versions:
//!               - { id: "2.5", uri: "http://creativecommons.org/licenses/by/2.5/nl/" }
//! ```
//!
//! Version identifiers must be quoted in YAML; an unquoted `2.5` is a float
//! and is rejected.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use ccws_core::{JurisdictionId, LicenseClass, LicenseUri, LocaleId, Version};

/// Localized strings keyed by locale.
pub type LocalizedText = BTreeMap<LocaleId, String>;

/// Root of the catalog file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogDocument {
    /// Locale used when a request names no locale or an unsupported one.
    pub default_locale: LocaleId,
    /// Every supported locale.
    pub locales: Vec<LocaleId>,
    /// Localized jurisdiction labels, appended to license names.
    #[serde(default)]
    pub jurisdictions: BTreeMap<JurisdictionId, LocalizedText>,
    /// License classes in presentation order.
    pub classes: Vec<ClassEntry>,
}

/// One license class with its questions and licenses.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassEntry {
    /// Class identifier (`standard`, `publicdomain`, ...).
    pub id: LicenseClass,
    /// Question fields asked when issuing a license of this class.
    #[serde(default)]
    pub fields: Vec<QuestionField>,
    /// License variants in this class.
    #[serde(default)]
    pub licenses: Vec<LicenseEntry>,
}

/// A question field and its legal enum answers, in presentation order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestionField {
    /// Field identifier (`commercial`, `derivatives`, `jurisdiction`).
    pub id: String,
    /// Legal answer identifiers.
    #[serde(default)]
    pub answers: Vec<String>,
}

impl QuestionField {
    /// Convenience constructor.
    pub fn new<I, S>(id: impl Into<String>, answers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            id: id.into(),
            answers: answers.into_iter().map(Into::into).collect(),
        }
    }
}

/// A license (e.g. `by-nc-sa`) and every jurisdiction/version it is ported to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LicenseEntry {
    /// Short license code.
    pub code: String,
    /// Localized license names.
    #[serde(default)]
    pub names: LocalizedText,
    /// Jurisdiction ports.
    #[serde(default)]
    pub jurisdictions: Vec<JurisdictionEntry>,
}

/// The versions of one license available under one jurisdiction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JurisdictionEntry {
    /// The jurisdiction (`"-"` for unported / agnostic).
    pub id: JurisdictionId,
    /// Versions registered for this jurisdiction.
    #[serde(default)]
    pub versions: Vec<VersionEntry>,
}

/// A concrete license variant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VersionEntry {
    /// Version identifier (`"-"` for unversioned tools).
    pub id: Version,
    /// The license identifier.
    pub uri: LicenseUri,
}

impl CatalogDocument {
    /// Look up a class entry.
    pub fn class(&self, class: &LicenseClass) -> Option<&ClassEntry> {
        self.classes.iter().find(|c| &c.id == class)
    }
}
