//! # Locale Resolution
//!
//! Maps a requested locale token onto a supported locale. The nearest-match
//! policy belongs to the [`LocaleTable`]; [`LocaleResolver`] only adds the
//! guarantees callers rely on: the result is always a supported locale, and
//! an unknown or absent token degrades to a default instead of failing.
//!
//! Legacy callers send `language` and `locale` separately; `language` wins
//! when present (see [`requested_language`]).

use std::collections::BTreeSet;

use ccws_core::LocaleId;

use crate::source::LocaleTable;

/// Pick the effective locale token from the `language` and legacy `locale`
/// request parameters.
pub fn requested_language<'a>(language: Option<&'a str>, locale: Option<&'a str>) -> Option<&'a str> {
    language.or(locale)
}

fn normalize(token: &str) -> String {
    token.trim().replace('-', "_").to_ascii_lowercase()
}

/// Nearest-match policy over a set of supported locales.
///
/// Tried in order:
/// 1. exact match;
/// 2. match ignoring case and `-`/`_` differences (`en-us` → `en_US`);
/// 3. the token's base language (`pt_PT` → `pt`), ignoring case.
pub fn nearest_supported_in(supported: &BTreeSet<LocaleId>, token: &str) -> Option<LocaleId> {
    let token = token.trim();
    if token.is_empty() {
        return None;
    }
    if let Some(exact) = supported.iter().find(|l| l.as_str() == token) {
        return Some(exact.clone());
    }

    let wanted = normalize(token);
    if let Some(loose) = supported.iter().find(|l| normalize(l.as_str()) == wanted) {
        return Some(loose.clone());
    }

    let base = wanted.split('_').next().unwrap_or(&wanted);
    supported
        .iter()
        .find(|l| normalize(l.as_str()) == base)
        .cloned()
}

/// The table default if supported, else the first supported locale. A table
/// supporting nothing leaves the default as the only answer.
fn table_fallback(table: &dyn LocaleTable) -> LocaleId {
    let default = table.default_locale();
    let supported = table.supported_locales();
    if supported.contains(&default) {
        return default;
    }
    match supported.into_iter().next() {
        Some(first) => {
            tracing::warn!(
                default = %default,
                fallback = %first,
                "default locale is unsupported; using the first supported locale"
            );
            first
        }
        None => default,
    }
}

/// Resolves request locale tokens against a [`LocaleTable`].
pub struct LocaleResolver<'a> {
    table: &'a dyn LocaleTable,
    fallback: LocaleId,
}

impl std::fmt::Debug for LocaleResolver<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LocaleResolver")
            .field("fallback", &self.fallback)
            .finish()
    }
}

impl<'a> LocaleResolver<'a> {
    /// A resolver that falls back to the table's default locale, or to its
    /// first supported locale when the default is not supported.
    pub fn new(table: &'a dyn LocaleTable) -> Self {
        let fallback = table_fallback(table);
        Self { table, fallback }
    }

    /// A resolver with a caller-wide default. An unsupported `fallback` is
    /// ignored in favour of the table's default.
    pub fn with_fallback(table: &'a dyn LocaleTable, fallback: LocaleId) -> Self {
        let fallback = if table.supported_locales().contains(&fallback) {
            fallback
        } else {
            tracing::warn!(
                fallback = %fallback,
                "configured fallback locale is unsupported; using the table default"
            );
            table_fallback(table)
        };
        Self { table, fallback }
    }

    /// The locale returned when nothing nearer is found.
    pub fn fallback(&self) -> &LocaleId {
        &self.fallback
    }

    /// Resolve a requested token. Never fails.
    pub fn resolve(&self, requested: Option<&str>) -> LocaleId {
        let Some(token) = requested.map(str::trim).filter(|t| !t.is_empty()) else {
            return self.fallback.clone();
        };
        let supported = self.table.supported_locales();
        match self.table.nearest_supported(token) {
            Some(locale) if supported.contains(&locale) => locale,
            _ => {
                tracing::warn!(
                    requested = token,
                    fallback = %self.fallback,
                    "unsupported locale requested; falling back"
                );
                self.fallback.clone()
            }
        }
    }
}
