//! # License Chooser
//!
//! Composes the resolution pipeline for one request:
//!
//! ```text
//! ChooserRequest
//!   -> LocaleResolver      (language, else legacy locale, else fallback)
//!   -> query::licenses_for (governing version + public-domain entries)
//!   -> filter_excluded     (substring exclusions)
//!   -> DetailLookup        (localized names)
//!   -> canonical_sort      (stable, by segment after "licenses")
//! ```
//!
//! Every input is carried on the request; the chooser holds no per-request
//! state and can serve any number of requests against the same catalog.

use serde::{Deserialize, Serialize};

use ccws_core::{JurisdictionId, LicenseDetail, LocaleId};

use crate::catalog::Catalog;
use crate::error::CatalogResult;
use crate::filter::{filter_excluded, Exclusions};
use crate::locale::{requested_language, LocaleResolver};
use crate::ordering::canonical_sort;
use crate::query;
use crate::source::{DetailLookup, LicenseSource, LocaleTable};

/// One chooser request.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChooserRequest {
    /// Target jurisdiction; `"-"` when omitted.
    #[serde(default)]
    pub jurisdiction: JurisdictionId,
    /// Preferred language.
    #[serde(default)]
    pub language: Option<String>,
    /// Legacy locale parameter, consulted only when `language` is absent.
    #[serde(default)]
    pub locale: Option<String>,
    /// Exclusion substrings. Accepts a single string or a list.
    #[serde(default)]
    pub exclude: Exclusions,
    /// Explicit license version; the latest governs when omitted.
    #[serde(default)]
    pub version: Option<String>,
}

impl ChooserRequest {
    /// A request for `jurisdiction` with every other parameter defaulted.
    pub fn for_jurisdiction(jurisdiction: JurisdictionId) -> Self {
        Self {
            jurisdiction,
            ..Self::default()
        }
    }

    /// Set the preferred language.
    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.language = Some(language.into());
        self
    }

    /// Set the legacy locale parameter.
    pub fn with_locale(mut self, locale: impl Into<String>) -> Self {
        self.locale = Some(locale.into());
        self
    }

    /// Set the exclusions.
    pub fn with_exclude(mut self, exclude: impl Into<Exclusions>) -> Self {
        self.exclude = exclude.into();
        self
    }

    /// Request an explicit version.
    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.version = Some(version.into());
        self
    }

    /// The explicit version, trimmed. Blank counts as given.
    pub fn requested_version(&self) -> Option<&str> {
        self.version.as_deref().map(str::trim)
    }
}

/// Resolves [`ChooserRequest`]s against catalog interfaces.
pub struct LicenseChooser<'a> {
    source: &'a dyn LicenseSource,
    details: &'a dyn DetailLookup,
    locales: LocaleResolver<'a>,
}

impl std::fmt::Debug for LicenseChooser<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LicenseChooser")
            .field("revision", &self.revision())
            .field("locales", &self.locales)
            .finish()
    }
}

impl<'a> LicenseChooser<'a> {
    /// A chooser backed entirely by `catalog`.
    pub fn new(catalog: &'a Catalog) -> Self {
        Self::with_parts(catalog, catalog, LocaleResolver::new(catalog))
    }

    /// A chooser over separately supplied interfaces.
    pub fn with_parts(
        source: &'a dyn LicenseSource,
        details: &'a dyn DetailLookup,
        locales: LocaleResolver<'a>,
    ) -> Self {
        Self {
            source,
            details,
            locales,
        }
    }

    /// Replace the fallback locale, keeping the catalog default if
    /// `fallback` is unsupported.
    pub fn with_fallback_locale(mut self, table: &'a dyn LocaleTable, fallback: LocaleId) -> Self {
        self.locales = LocaleResolver::with_fallback(table, fallback);
        self
    }

    /// Combined revision of the license source and the detail lookup.
    /// `None` unless both report one.
    pub fn revision(&self) -> Option<String> {
        let source = self.source.revision()?;
        let details = self.details.revision()?;
        Some(if source == details {
            source.to_string()
        } else {
            format!("{source}+{details}")
        })
    }

    /// The supported locale `request` resolves to.
    pub fn resolve_locale(&self, request: &ChooserRequest) -> LocaleId {
        self.locales.resolve(requested_language(
            request.language.as_deref(),
            request.locale.as_deref(),
        ))
    }

    /// Resolve `request` into ordered `(uri, name)` details.
    ///
    /// # Errors
    ///
    /// Unknown jurisdiction, a version outside the jurisdiction's set, an
    /// identifier missing from the detail lookup, or a malformed identifier.
    pub fn choose(&self, request: &ChooserRequest) -> CatalogResult<Vec<LicenseDetail>> {
        let locale = self.resolve_locale(request);
        self.choose_in(request, &locale)
    }

    /// Like [`choose`](Self::choose) with the locale already resolved.
    pub fn choose_in(
        &self,
        request: &ChooserRequest,
        locale: &LocaleId,
    ) -> CatalogResult<Vec<LicenseDetail>> {
        let candidates = query::licenses_for(
            self.source,
            &request.jurisdiction,
            request.requested_version(),
        )?;
        let kept = filter_excluded(candidates, &request.exclude);
        let details = kept
            .iter()
            .map(|uri| self.details.details_for(uri, locale))
            .collect::<CatalogResult<Vec<_>>>()?;
        let sorted = canonical_sort(details)?;

        tracing::debug!(
            jurisdiction = %request.jurisdiction,
            locale = %locale,
            results = sorted.len(),
            "resolved chooser request"
        );
        Ok(sorted)
    }
}
