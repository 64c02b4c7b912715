//! # Chooser Result Cache
//!
//! A transparent memo in front of [`LicenseChooser`]. Entries are keyed by
//! the chooser revision (license source and detail lookup together) plus the
//! request inputs that affect the result, so a reloaded catalog with
//! different content never serves stale entries. A chooser whose source or
//! detail lookup reports no revision bypasses the cache entirely.

use std::collections::HashMap;

use parking_lot::RwLock;

use ccws_core::{JurisdictionId, LicenseDetail, LocaleId};

use crate::chooser::{ChooserRequest, LicenseChooser};
use crate::error::CatalogResult;
use crate::filter::Exclusions;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct CacheKey {
    revision: String,
    jurisdiction: JurisdictionId,
    version: Option<String>,
    locale: LocaleId,
    exclusions: Exclusions,
}

/// Thread-safe cache of chooser results.
///
/// `parking_lot::RwLock` is non-poisoning; the lock is never held while the
/// chooser runs.
#[derive(Debug, Default)]
pub struct ChooserCache {
    entries: RwLock<HashMap<CacheKey, Vec<LicenseDetail>>>,
}

impl ChooserCache {
    /// Create an empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the cached result for `request`, or run `chooser` and cache
    /// what it returns. Errors are not cached.
    ///
    /// Inserting an entry evicts every entry from another revision.
    pub fn get_or_choose(
        &self,
        chooser: &LicenseChooser<'_>,
        request: &ChooserRequest,
    ) -> CatalogResult<Vec<LicenseDetail>> {
        let Some(revision) = chooser.revision() else {
            return chooser.choose(request);
        };

        let locale = chooser.resolve_locale(request);
        let key = CacheKey {
            revision,
            jurisdiction: request.jurisdiction.clone(),
            version: request.requested_version().map(str::to_string),
            locale,
            exclusions: request.exclude.clone(),
        };

        let hit = self.entries.read().get(&key).cloned();
        if let Some(details) = hit {
            tracing::trace!(jurisdiction = %key.jurisdiction, "chooser cache hit");
            return Ok(details);
        }

        let details = chooser.choose_in(request, &key.locale)?;
        let mut entries = self.entries.write();
        entries.retain(|k, _| k.revision == key.revision);
        entries.insert(key, details.clone());
        Ok(details)
    }

    /// Drop every entry.
    pub fn invalidate(&self) {
        self.entries.write().clear();
    }

    /// Number of cached results.
    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    /// Whether the cache is empty.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
