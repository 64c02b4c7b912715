//! # Catalog Snapshot
//!
//! [`Catalog`] is an indexed, read-only view over a [`CatalogDocument`]. It
//! implements every catalog interface ([`LicenseSource`], [`DetailLookup`],
//! [`LocaleTable`], [`QuestionSource`]) and is safe to share across threads.
//!
//! ## Revision
//!
//! The revision is the SHA-256 hex digest of the document's JSON
//! serialization. All maps in the document are ordered, so identical content
//! always yields the same revision regardless of how the YAML was laid out.

use std::collections::{BTreeSet, HashMap};
use std::path::Path;

use ccws_core::{
    JurisdictionId, LicenseClass, LicenseDetail, LicenseUri, LocaleId, ResolutionError, Version,
};

use crate::document::{CatalogDocument, LocalizedText, QuestionField};
use crate::error::{CatalogError, CatalogResult};
use crate::locale::nearest_supported_in;
use crate::parser;
use crate::source::{DetailLookup, LicenseSource, LocaleTable, QuestionSource};

/// Position of a license variant inside the document.
#[derive(Debug, Clone)]
struct VariantRef {
    class: usize,
    license: usize,
    jurisdiction: JurisdictionId,
    version: Version,
}

/// An indexed catalog snapshot.
#[derive(Debug, Clone)]
pub struct Catalog {
    document: CatalogDocument,
    revision: String,
    supported: BTreeSet<LocaleId>,
    variants: HashMap<LicenseUri, VariantRef>,
}

impl Catalog {
    /// Index a parsed document. The default locale must be one of the
    /// document's locales.
    pub fn from_document(document: CatalogDocument) -> CatalogResult<Self> {
        let supported: BTreeSet<LocaleId> = document.locales.iter().cloned().collect();
        if !supported.contains(&document.default_locale) {
            return Err(CatalogError::UnsupportedDefaultLocale {
                locale: document.default_locale.to_string(),
            });
        }
        let revision = parser::sha256_hex(&serde_json::to_vec(&document)?);

        let mut variants = HashMap::new();
        for (class_idx, class) in document.classes.iter().enumerate() {
            for (license_idx, license) in class.licenses.iter().enumerate() {
                for port in &license.jurisdictions {
                    for version in &port.versions {
                        // First registration wins; duplicates are a lint error.
                        variants
                            .entry(version.uri.clone())
                            .or_insert_with(|| VariantRef {
                                class: class_idx,
                                license: license_idx,
                                jurisdiction: port.id.clone(),
                                version: version.id.clone(),
                            });
                    }
                }
            }
        }

        tracing::debug!(
            revision = %revision,
            classes = document.classes.len(),
            variants = variants.len(),
            "indexed license catalog"
        );

        Ok(Self {
            document,
            revision,
            supported,
            variants,
        })
    }

    /// Load and index a catalog file (YAML, or JSON by `.json` extension).
    pub fn load(path: &Path) -> CatalogResult<Self> {
        let document: CatalogDocument = parser::load_typed(path)?;
        tracing::info!(path = %path.display(), "loaded license catalog");
        Self::from_document(document)
    }

    /// Parse and index a YAML catalog held in memory.
    pub fn from_yaml_str(yaml: &str) -> CatalogResult<Self> {
        Self::from_document(serde_yaml::from_str(yaml)?)
    }

    /// SHA-256 hex digest identifying this snapshot's content.
    pub fn revision(&self) -> &str {
        &self.revision
    }

    /// The underlying document.
    pub fn document(&self) -> &CatalogDocument {
        &self.document
    }

    /// Every license identifier in the catalog, in document order.
    pub fn all_uris(&self) -> Vec<&LicenseUri> {
        self.document
            .classes
            .iter()
            .flat_map(|c| &c.licenses)
            .flat_map(|l| &l.jurisdictions)
            .flat_map(|j| &j.versions)
            .map(|v| &v.uri)
            .collect()
    }

    /// Look up `locale` in a localized map: the exact locale, then its base
    /// language, then the catalog default.
    fn localized<'t>(&self, text: &'t LocalizedText, locale: &LocaleId) -> Option<&'t str> {
        text.get(locale)
            .or_else(|| {
                LocaleId::new(locale.language())
                    .ok()
                    .and_then(|base| text.get(&base))
            })
            .or_else(|| text.get(&self.document.default_locale))
            .map(String::as_str)
    }

    fn display_name(&self, variant: &VariantRef, locale: &LocaleId) -> String {
        let license = &self.document.classes[variant.class].licenses[variant.license];
        let mut parts: Vec<&str> = vec![self
            .localized(&license.names, locale)
            .unwrap_or(license.code.as_str())];
        if !variant.version.is_unversioned() {
            parts.push(variant.version.as_str());
        }
        if !variant.jurisdiction.is_agnostic() {
            if let Some(label) = self
                .document
                .jurisdictions
                .get(&variant.jurisdiction)
                .and_then(|labels| self.localized(labels, locale))
            {
                parts.push(label);
            }
        }
        parts.join(" ")
    }
}

impl LicenseSource for Catalog {
    fn versions_for(&self, jurisdiction: &JurisdictionId) -> CatalogResult<BTreeSet<Version>> {
        Ok(self
            .document
            .class(&LicenseClass::standard())
            .into_iter()
            .flat_map(|c| &c.licenses)
            .flat_map(|l| &l.jurisdictions)
            .filter(|j| &j.id == jurisdiction)
            .flat_map(|j| &j.versions)
            .map(|v| v.id.clone())
            .collect())
    }

    fn licenses_for(
        &self,
        class: &LicenseClass,
        jurisdiction: &JurisdictionId,
        version: &Version,
    ) -> CatalogResult<Vec<LicenseUri>> {
        let mut seen = BTreeSet::new();
        Ok(self
            .document
            .class(class)
            .into_iter()
            .flat_map(|c| &c.licenses)
            .flat_map(|l| &l.jurisdictions)
            .filter(|j| &j.id == jurisdiction)
            .flat_map(|j| &j.versions)
            .filter(|v| &v.id == version)
            .filter(|v| seen.insert(v.uri.clone()))
            .map(|v| v.uri.clone())
            .collect())
    }

    fn revision(&self) -> Option<&str> {
        Some(&self.revision)
    }
}

impl DetailLookup for Catalog {
    fn details_for(&self, uri: &LicenseUri, locale: &LocaleId) -> CatalogResult<LicenseDetail> {
        let variant = self
            .variants
            .get(uri)
            .ok_or_else(|| ResolutionError::UnknownLicense {
                uri: uri.to_string(),
            })?;
        Ok(LicenseDetail {
            uri: uri.clone(),
            name: self.display_name(variant, locale),
        })
     }

    fn revision(&self) -> Option<&str> {
        Some(&self.revision)
    }
}

impl LocaleTable for Catalog {
    fn supported_locales(&self) -> BTreeSet<LocaleId> {
        self.supported.clone()
    }

    fn nearest_supported(&self, token: &str) -> Option<LocaleId> {
        nearest_supported_in(&self.supported, token)
    }

    fn default_locale(&self) -> LocaleId {
        self.document.default_locale.clone()
    }
}

impl QuestionSource for Catalog {
    fn license_classes(&self) -> Vec<LicenseClass> {
        self.document.classes.iter().map(|c| c.id.clone()).collect()
    }

    fn fields_for(&self, class: &LicenseClass) -> CatalogResult<Vec<QuestionField>> {
        self.document
            .class(class)
            .map(|c| c.fields.clone())
            .ok_or_else(|| {
                ResolutionError::UnknownLicenseClass {
                    class: class.to_string(),
                }
                .into()
            })
    }
}

#[cfg(test)]
pub(crate) mod fixture {
    //! A small catalog shared by the unit tests of this crate.

    use super::Catalog;

    pub(crate) const YAML: &str = r#"
default_locale: en
locales: [en, de, pt]
jurisdictions:
  nl: { en: Netherlands, de: Niederlande }
classes:
  - id: standard
    fields:
      - { id: commercial, answers: [y, n] }
    licenses:
      - code: by
        names: { en: Attribution, de: Namensnennung, pt: Atribuição }
        jurisdictions:
          - id: "-"
            versions:
              - { id: "3.0", uri: "http://creativecommons.org/licenses/by/3.0/" }
          - id: nl
            versions:
              - { id: "2.0", uri: "http://creativecommons.org/licenses/by/2.0/nl/" }
              - { id: "2.5", uri: "http://creativecommons.org/licenses/by/2.5/nl/" }
      - code: by-sa
        names: { en: Attribution-ShareAlike }
        jurisdictions:
          - id: nl
            versions:
              - { id: "2.5", uri: "http://creativecommons.org/licenses/by-sa/2.5/nl/" }
  - id: publicdomain
    licenses:
      - code: publicdomain
        names: { en: Public Domain }
        jurisdictions:
          - id: "-"
            versions:
              - { id: "-", uri: "http://creativecommons.org/licenses/publicdomain/" }
"#;

    pub(crate) fn catalog() -> Catalog {
        Catalog::from_yaml_str(YAML).unwrap()
    }
}
