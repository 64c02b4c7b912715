//! # Canonical Ordering
//!
//! Orders resolved licenses by the path segment that follows `licenses` in
//! their identifier (`by`, `by-nc`, `by-sa`, `publicdomain`). The sort is
//! stable: equal keys keep their input order.

use ccws_core::{LicenseDetail, LicenseUri, ResolutionError};

use crate::error::CatalogResult;

/// The canonical sort key of `uri`.
///
/// # Errors
///
/// [`ResolutionError::MalformedIdentifier`] when the identifier has no
/// `licenses` segment followed by a non-empty segment.
pub fn canonical_sort_key(uri: &LicenseUri) -> CatalogResult<&str> {
    uri.sort_key().ok_or_else(|| {
        ResolutionError::MalformedIdentifier {
            uri: uri.to_string(),
        }
        .into()
    })
}

/// Stable-sort details by canonical key. Every key is extracted before any
/// reordering, so a malformed identifier fails the whole call.
pub fn canonical_sort(details: Vec<LicenseDetail>) -> CatalogResult<Vec<LicenseDetail>> {
    let mut keyed = details
        .into_iter()
        .map(|detail| {
            let key = canonical_sort_key(&detail.uri)?.to_string();
            Ok((key, detail))
        })
        .collect::<CatalogResult<Vec<(String, LicenseDetail)>>>()?;
    keyed.sort_by(|a, b| a.0.cmp(&b.0));
    Ok(keyed.into_iter().map(|(_, detail)| detail).collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn detail(uri: &str, name: &str) -> LicenseDetail {
        LicenseDetail {
            uri: LicenseUri::new(uri).unwrap(),
            name: name.to_string(),
        }
    }

    fn names(details: &[LicenseDetail]) -> Vec<&str> {
        details.iter().map(|d| d.name.as_str()).collect()
    }

    #[test]
    fn sorts_by_segment_after_licenses() {
        let sorted = canonical_sort(vec![
            detail("http://creativecommons.org/licenses/by-sa/2.5/", "by-sa"),
            detail("http://creativecommons.org/licenses/publicdomain/", "pd"),
            detail("http://creativecommons.org/licenses/by/2.5/", "by"),
            detail("http://creativecommons.org/licenses/by-nc/2.5/", "by-nc"),
        ])
        .unwrap();
        assert_eq!(names(&sorted), vec!["by", "by-nc", "by-sa", "pd"]);
    }

    #[test]
    fn key_ignores_host_and_trailing_segments() {
        let sorted = canonical_sort(vec![
            detail("http://z.example/licenses/by/9.0/zz/", "z-by"),
            detail("http://a.example/licenses/by-sa/1.0/", "a-by-sa"),
        ])
        .unwrap();
        assert_eq!(names(&sorted), vec!["z-by", "a-by-sa"]);
    }

    #[test]
    fn ties_keep_input_order() {
        let sorted = canonical_sort(vec![
            detail("http://creativecommons.org/licenses/by/2.5/nl/", "second-by"),
            detail("http://creativecommons.org/licenses/by-nd/2.5/", "by-nd"),
            detail("http://creativecommons.org/licenses/by/2.0/nl/", "first-by"),
        ])
        .unwrap();
        assert_eq!(names(&sorted), vec!["second-by", "first-by", "by-nd"]);
    }

    #[test]
    fn malformed_identifier_fails_whole_sort() {
        let err = canonical_sort(vec![
            detail("http://creativecommons.org/licenses/by/2.5/", "by"),
            detail("http://example.org/by/2.5/", "bad"),
        ])
        .unwrap_err();
        assert!(matches!(
            err.as_resolution(),
            Some(ResolutionError::MalformedIdentifier { uri }) if uri == "http://example.org/by/2.5/"
        ));
    }

    #[test]
    fn missing_segment_after_licenses_is_malformed() {
        let uri = LicenseUri::new("http://example.org/licenses/").unwrap();
        assert!(canonical_sort_key(&uri).is_err());
    }

    #[test]
    fn empty_input_sorts_to_empty() {
        assert!(canonical_sort(Vec::new()).unwrap().is_empty());
    }
}
