//! # License Catalog Query
//!
//! Determines the governing version for a jurisdiction and collects the
//! candidate license set.
//!
//! ## Version selection
//!
//! A jurisdiction's licenses are revved as a group, so the version set of
//! the standard class under that jurisdiction is the jurisdiction's version
//! set. An explicit version must be a member of it (after trimming); without
//! one, the maximum version governs.
//!
//! ## Candidate set
//!
//! The standard-class licenses for `(jurisdiction, version)`, followed by
//! every public-domain entry registered under jurisdiction `"-"` and version
//! `"-"`. The public-domain entries are included for every request.

use std::collections::BTreeSet;

use ccws_core::{JurisdictionId, LicenseClass, LicenseUri, ResolutionError, Version};

use crate::error::CatalogResult;
use crate::source::LicenseSource;

/// Determine the version that governs `jurisdiction`.
///
/// # Errors
///
/// - [`ResolutionError::UnknownJurisdiction`] if the jurisdiction has no
///   registered versions.
/// - [`ResolutionError::InvalidVersion`] if `requested` is given and is not
///   one of the available versions.
pub fn governing_version<S>(
    source: &S,
    jurisdiction: &JurisdictionId,
    requested: Option<&str>,
) -> CatalogResult<Version>
where
    S: LicenseSource + ?Sized,
{
    let available = source.versions_for(jurisdiction)?;

    let Some(latest) = available.iter().max().cloned() else {
        return Err(ResolutionError::UnknownJurisdiction {
            jurisdiction: jurisdiction.to_string(),
        }
        .into());
    };

    let Some(requested) = requested else {
        tracing::debug!(jurisdiction = %jurisdiction, version = %latest, "governing version is latest");
        return Ok(latest);
    };

    match Version::new(requested) {
        Ok(version) if available.contains(&version) => {
            tracing::debug!(jurisdiction = %jurisdiction, version = %version, "governing version requested explicitly");
            Ok(version)
        }
        _ => Err(ResolutionError::InvalidVersion {
            jurisdiction: jurisdiction.to_string(),
            requested: requested.trim().to_string(),
            available: available.iter().map(|v| v.to_string()).collect(),
        }
        .into()),
    }
}

/// Every license identifier active for `jurisdiction` at the governing
/// version, plus the public-domain entries. Unfiltered and unsorted, in
/// catalog order, without duplicates.
///
/// # Errors
///
/// Propagates the failures of [`governing_version`] and of the source.
pub fn licenses_for<S>(
    source: &S,
    jurisdiction: &JurisdictionId,
    requested: Option<&str>,
) -> CatalogResult<Vec<LicenseUri>>
where
    S: LicenseSource + ?Sized,
{
    let version = governing_version(source, jurisdiction, requested)?;

    let standard = source.licenses_for(&LicenseClass::standard(), jurisdiction, &version)?;
    let public_domain = source.licenses_for(
        &LicenseClass::publicdomain(),
        &JurisdictionId::agnostic(),
        &Version::unversioned(),
    )?;

    let mut seen = BTreeSet::new();
    let candidates: Vec<LicenseUri> = standard
        .into_iter()
        .chain(public_domain)
        .filter(|uri| seen.insert(uri.clone()))
        .collect();

    tracing::debug!(
        jurisdiction = %jurisdiction,
        version = %version,
        candidates = candidates.len(),
        "collected candidate licenses"
    );
    Ok(candidates)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    use crate::error::CatalogError;

    /// In-memory source: (class, jurisdiction, version) -> uris.
    #[derive(Default)]
    struct MapSource(BTreeMap<(String, String, String), Vec<&'static str>>);

    impl MapSource {
        fn with(mut self, class: &str, j: &str, v: &str, uris: &[&'static str]) -> Self {
            self.0
                .insert((class.into(), j.into(), v.into()), uris.to_vec());
            self
        }
    }

    impl LicenseSource for MapSource {
        fn versions_for(&self, jurisdiction: &JurisdictionId) -> CatalogResult<BTreeSet<Version>> {
            Ok(self
                .0
                .keys()
                .filter(|(c, j, _)| c == "standard" && j == jurisdiction.as_str())
                .map(|(_, _, v)| Version::new(v.clone()).unwrap())
                .collect())
        }

        fn licenses_for(
            &self,
            class: &LicenseClass,
            jurisdiction: &JurisdictionId,
            version: &Version,
        ) -> CatalogResult<Vec<LicenseUri>> {
            let key = (
                class.to_string(),
                jurisdiction.to_string(),
                version.to_string(),
            );
            Ok(self
                .0
                .get(&key)
                .map(|uris| uris.iter().map(|u| LicenseUri::new(*u).unwrap()).collect())
                .unwrap_or_default())
        }
    }

    const PD: &str = "http://creativecommons.org/licenses/publicdomain/";

    fn source() -> MapSource {
        MapSource::default()
            .with(
                "standard",
                "nl",
                "2.0",
                &["http://creativecommons.org/licenses/by/2.0/nl/"],
            )
            .with(
                "standard",
                "nl",
                "2.5",
                &[
                    "http://creativecommons.org/licenses/by/2.5/nl/",
                    "http://creativecommons.org/licenses/by-nc/2.5/nl/",
                ],
            )
            .with(
                "standard",
                "xx",
                "9.0",
                &["http://creativecommons.org/licenses/by/9.0/xx/"],
            )
            .with(
                "standard",
                "xx",
                "10.0",
                &["http://creativecommons.org/licenses/by/10.0/xx/"],
            )
            .with("publicdomain", "-", "-", &[PD])
    }

    fn j(s: &str) -> JurisdictionId {
        JurisdictionId::new(s).unwrap()
    }

    #[test]
    fn latest_version_governs_by_default() {
        let v = governing_version(&source(), &j("nl"), None).unwrap();
        assert_eq!(v.as_str(), "2.5");
    }

    #[test]
    fn latest_version_is_not_string_maximum() {
        let v = governing_version(&source(), &j("xx"), None).unwrap();
        assert_eq!(v.as_str(), "10.0");
    }

    #[test]
    fn explicit_version_is_trimmed() {
        let v = governing_version(&source(), &j("nl"), Some(" 2.0 ")).unwrap();
        assert_eq!(v.as_str(), "2.0");
    }

    #[test]
    fn explicit_version_not_available_fails() {
        let err = governing_version(&source(), &j("nl"), Some("3.0")).unwrap_err();
        match err {
            CatalogError::Resolution(ResolutionError::InvalidVersion {
                jurisdiction,
                requested,
                available,
            }) => {
                assert_eq!(jurisdiction, "nl");
                assert_eq!(requested, "3.0");
                assert_eq!(available, vec!["2.0", "2.5"]);
            }
            other => panic!("expected InvalidVersion, got {other:?}"),
        }
    }

    #[test]
    fn blank_explicit_version_fails() {
        let err = governing_version(&source(), &j("nl"), Some("  ")).unwrap_err();
        assert!(matches!(
            err.as_resolution(),
            Some(ResolutionError::InvalidVersion { .. })
        ));
    }

    #[test]
    fn unknown_jurisdiction_fails_before_version_check() {
        let err = governing_version(&source(), &j("zz"), Some("2.5")).unwrap_err();
        assert!(matches!(
            err.as_resolution(),
            Some(ResolutionError::UnknownJurisdiction { .. })
        ));
    }

    #[test]
    fn candidates_include_public_domain() {
        let uris = licenses_for(&source(), &j("nl"), None).unwrap();
        let strs: Vec<&str> = uris.iter().map(|u| u.as_str()).collect();
        assert_eq!(
            strs,
            vec![
                "http://creativecommons.org/licenses/by/2.5/nl/",
                "http://creativecommons.org/licenses/by-nc/2.5/nl/",
                PD,
            ]
        );

        let older = licenses_for(&source(), &j("nl"), Some("2.0")).unwrap();
        assert_eq!(older.len(), 2);
        assert_eq!(older[1].as_str(), PD);
    }

    #[test]
    fn candidates_are_deduplicated() {
        let src = source().with(
            "standard",
            "dup",
            "1.0",
            &[
                "http://creativecommons.org/licenses/by/1.0/dup/",
                "http://creativecommons.org/licenses/by/1.0/dup/",
            ],
        );
        let uris = licenses_for(&src, &j("dup"), None).unwrap();
        assert_eq!(uris.len(), 2);
    }

    #[test]
    fn repeated_queries_are_deterministic() {
        let src = source();
        let a = licenses_for(&src, &j("nl"), None).unwrap();
        let b = licenses_for(&src, &j("nl"), None).unwrap();
        assert_eq!(a, b);
    }
}
