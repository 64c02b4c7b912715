//! # Catalog Interfaces
//!
//! The resolution engine consumes its backing data through these traits.
//! [`Catalog`](crate::Catalog) implements all of them over a YAML snapshot;
//! any other store (a database, a remote service) can be substituted.
//!
//! Every query is synchronous and either completes or fails as a whole.

use std::collections::BTreeSet;

use ccws_core::{JurisdictionId, LicenseClass, LicenseDetail, LicenseUri, LocaleId, Version};

use crate::document::QuestionField;
use crate::error::CatalogResult;

/// License identifiers per class, jurisdiction, and version.
pub trait LicenseSource {
    /// Every version registered for `jurisdiction` under the standard class,
    /// in ascending order.
    fn versions_for(&self, jurisdiction: &JurisdictionId) -> CatalogResult<BTreeSet<Version>>;

    /// Every license identifier of `class` registered for
    /// `(jurisdiction, version)`, in catalog order without duplicates.
    fn licenses_for(
        &self,
        class: &LicenseClass,
        jurisdiction: &JurisdictionId,
        version: &Version,
    ) -> CatalogResult<Vec<LicenseUri>>;

    /// An identifier of the snapshot being served. Two sources with the same
    /// revision answer every query identically. `None` means the source
    /// cannot promise that, and results derived from it must not be cached.
    fn revision(&self) -> Option<&str> {
        None
    }
}

/// Localized license records.
pub trait DetailLookup {
    /// Resolve `uri` into a [`LicenseDetail`] named in `locale`.
    fn details_for(&self, uri: &LicenseUri, locale: &LocaleId) -> CatalogResult<LicenseDetail>;

    /// Snapshot identifier for the names this lookup produces, with the same
    /// contract as [`LicenseSource::revision`].
    fn revision(&self) -> Option<&str> {
        None
    }
}

/// The table of supported locales.
pub trait LocaleTable {
    /// Every supported locale.
    fn supported_locales(&self) -> BTreeSet<LocaleId>;

    /// The nearest supported locale for a free-form token, if any.
    fn nearest_supported(&self, token: &str) -> Option<LocaleId>;

    /// The locale used when nothing nearer is found.
    fn default_locale(&self) -> LocaleId;
}

/// License classes and the questions each one asks.
pub trait QuestionSource {
    /// Every license class, in presentation order.
    fn license_classes(&self) -> Vec<LicenseClass>;

    /// The question fields of `class`, in presentation order.
    fn fields_for(&self, class: &LicenseClass) -> CatalogResult<Vec<QuestionField>>;
}
