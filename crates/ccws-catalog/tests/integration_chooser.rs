//! Integration test: resolve chooser requests against `data/catalog.yaml`.

use std::path::PathBuf;

use ccws_catalog::{
    canonical_sort, query, validate_catalog, Catalog, ChooserCache, ChooserRequest, Exclusions,
    LicenseChooser, LicenseSource,
};
use ccws_core::{JurisdictionId, LicenseDetail, LicenseUri, ResolutionError};

const PUBLIC_DOMAIN: &str = "http://creativecommons.org/licenses/publicdomain/";

fn repo_root() -> PathBuf {
    let mut dir = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    // crates/ccws-catalog -> crates -> repo root
    dir.pop();
    dir.pop();
    dir
}

fn catalog() -> Catalog {
    Catalog::load(&repo_root().join("data").join("catalog.yaml")).expect("sample catalog loads")
}

fn j(s: &str) -> JurisdictionId {
    JurisdictionId::new(s).unwrap()
}

fn uris(details: &[LicenseDetail]) -> Vec<&str> {
    details.iter().map(|d| d.uri.as_str()).collect()
}

#[test]
fn sample_catalog_lints_clean() {
    let result = validate_catalog(&catalog());
    assert!(result.is_valid, "errors: {:?}", result.errors);
    assert!(result.warnings.is_empty(), "warnings: {:?}", result.warnings);
}

#[test]
fn every_jurisdiction_includes_public_domain() {
    let catalog = catalog();
    for name in ["-", "nl", "de", "us"] {
        let jurisdiction = j(name);
        assert!(!catalog.versions_for(&jurisdiction).unwrap().is_empty());
        let found = query::licenses_for(&catalog, &jurisdiction, None).unwrap();
        assert!(found.len() > 1, "{name}: {found:?}");
        assert!(
            found.iter().any(|u| u.as_str() == PUBLIC_DOMAIN),
            "{name} lacks public domain"
        );
        assert!(found.iter().all(|u| u.sort_key().is_some()));
    }
}

#[test]
fn nl_resolves_latest_version_in_canonical_order() {
    let catalog = catalog();
    let chooser = LicenseChooser::new(&catalog);
    let got = chooser
        .choose(&ChooserRequest::for_jurisdiction(j("nl")).with_language("nl"))
        .unwrap();
    assert_eq!(
        uris(&got),
        vec![
            "http://creativecommons.org/licenses/by/2.5/nl/",
            "http://creativecommons.org/licenses/by-nc/2.5/nl/",
            "http://creativecommons.org/licenses/by-nc-nd/2.5/nl/",
            "http://creativecommons.org/licenses/by-nc-sa/2.5/nl/",
            "http://creativecommons.org/licenses/by-nd/2.5/nl/",
            "http://creativecommons.org/licenses/by-sa/2.5/nl/",
            PUBLIC_DOMAIN,
        ]
    );
    assert_eq!(got[0].name, "Naamsvermelding 2.5 Nederland");
    assert_eq!(got[6].name, "Publiek Domein");
}

#[test]
fn single_version_jurisdiction_governs_at_that_version() {
    let catalog = catalog();
    let v = query::governing_version(&catalog, &j("de"), None).unwrap();
    assert_eq!(v.as_str(), "2.0");
}

#[test]
fn by_nc_exclusion_is_substring_based() {
    let catalog = catalog();
    let chooser = LicenseChooser::new(&catalog);
    let got = chooser
        .choose(&ChooserRequest::for_jurisdiction(j("-")).with_exclude("by-nc"))
        .unwrap();
    assert_eq!(
        uris(&got),
        vec![
            "http://creativecommons.org/licenses/by/2.5/",
            "http://creativecommons.org/licenses/by-nd/2.5/",
            "http://creativecommons.org/licenses/by-sa/2.5/",
            PUBLIC_DOMAIN,
        ]
    );
}

#[test]
fn explicit_version_outside_the_set_is_rejected() {
    let catalog = catalog();
    let chooser = LicenseChooser::new(&catalog);
    let err = chooser
        .choose(&ChooserRequest::for_jurisdiction(j("de")).with_version("2.5"))
        .unwrap_err();
    match err.as_resolution() {
        Some(ResolutionError::InvalidVersion { available, .. }) => {
            assert_eq!(available, &vec!["2.0".to_string()]);
        }
        other => panic!("expected InvalidVersion, got {other:?}"),
    }
}

#[test]
fn unknown_jurisdiction_is_rejected() {
    let catalog = catalog();
    let chooser = LicenseChooser::new(&catalog);
    let err = chooser
        .choose(&ChooserRequest::for_jurisdiction(j("zz")))
        .unwrap_err();
    assert!(matches!(
        err.as_resolution(),
        Some(ResolutionError::UnknownJurisdiction { jurisdiction }) if jurisdiction == "zz"
    ));
}

#[test]
fn sorter_rejects_identifiers_without_licenses_segment() {
    let bad = vec![LicenseDetail {
        uri: LicenseUri::new("http://creativecommons.org/publicdomain/zero/1.0/").unwrap(),
        name: "CC0".into(),
    }];
    let err = canonical_sort(bad).unwrap_err();
    assert!(matches!(
        err.as_resolution(),
        Some(ResolutionError::MalformedIdentifier { .. })
    ));
}

#[test]
fn repeated_requests_are_deterministic_and_cacheable() {
    let catalog = catalog();
    let chooser = LicenseChooser::new(&catalog);
    let request = ChooserRequest::for_jurisdiction(j("us"))
        .with_language("de")
        .with_exclude(Exclusions::from(vec!["-nd".to_string()]));

    let direct_a = chooser.choose(&request).unwrap();
    let direct_b = chooser.choose(&request).unwrap();
    assert_eq!(direct_a, direct_b);

    let cache = ChooserCache::new();
    assert_eq!(cache.get_or_choose(&chooser, &request).unwrap(), direct_a);
    assert_eq!(cache.get_or_choose(&chooser, &request).unwrap(), direct_a);
    assert_eq!(cache.len(), 1);
    assert!(direct_a.iter().all(|d| !d.uri.as_str().contains("-nd")));
    assert_eq!(direct_a[0].name, "Namensnennung 2.5 Vereinigte Staaten");
}
