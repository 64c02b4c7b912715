//! # Exclusion Filter
//!
//! Removes every license whose identifier contains any caller-supplied
//! exclusion substring. Matching is plain substring containment anywhere in
//! the identifier: excluding `"by-nc"` drops both `.../by-nc-nd/2.5/` and
//! `.../by-nc-sa/2.5/`.
//!
//! [`Exclusions`] is the one sequence type accepted at the boundary. A bare
//! scalar becomes a one-element sequence on conversion, and empty entries
//! are dropped there, since an empty substring would match every license.

use serde::{Deserialize, Serialize};

use ccws_core::LicenseUri;

/// An ordered list of exclusion substrings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "ExclusionsRepr", into = "Vec<String>")]
pub struct Exclusions(Vec<String>);

/// Wire shape: a single string or a list of strings.
#[derive(Deserialize)]
#[serde(untagged)]
enum ExclusionsRepr {
    One(String),
    Many(Vec<String>),
}

impl From<ExclusionsRepr> for Exclusions {
    fn from(repr: ExclusionsRepr) -> Self {
        match repr {
            ExclusionsRepr::One(s) => Self::from(s),
            ExclusionsRepr::Many(v) => Self::from(v),
        }
    }
}

impl Exclusions {
    /// No exclusions.
    pub fn none() -> Self {
        Self::default()
    }

    /// Whether `uri` matches any exclusion.
    pub fn excludes(&self, uri: &LicenseUri) -> bool {
        self.0.iter().any(|needle| uri.contains(needle))
    }

    /// The exclusion substrings.
    pub fn as_slice(&self) -> &[String] {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }
}

impl FromIterator<String> for Exclusions {
    fn from_iter<I: IntoIterator<Item = String>>(iter: I) -> Self {
        Self(iter.into_iter().filter(|s| !s.is_empty()).collect())
    }
}

impl<'a> FromIterator<&'a str> for Exclusions {
    fn from_iter<I: IntoIterator<Item = &'a str>>(iter: I) -> Self {
        iter.into_iter().map(str::to_string).collect()
    }
}

impl From<Vec<String>> for Exclusions {
    fn from(v: Vec<String>) -> Self {
        v.into_iter().collect()
    }
}

impl From<String> for Exclusions {
    fn from(s: String) -> Self {
        std::iter::once(s).collect()
    }
}

impl From<&str> for Exclusions {
    fn from(s: &str) -> Self {
        std::iter::once(s).collect()
    }
}

impl From<Exclusions> for Vec<String> {
    fn from(e: Exclusions) -> Self {
        e.0
    }
}

/// Drop every identifier matched by `exclusions`, preserving order.
pub fn filter_excluded(uris: Vec<LicenseUri>, exclusions: &Exclusions) -> Vec<LicenseUri> {
    if exclusions.is_empty() {
        return uris;
    }
    let before = uris.len();
    let kept: Vec<LicenseUri> = uris
        .into_iter()
        .filter(|uri| !exclusions.excludes(uri))
        .collect();
    tracing::debug!(
        excluded = before - kept.len(),
        kept = kept.len(),
        "applied license exclusions"
    );
    kept
}

#[cfg(test)]
mod tests {
    use super::*;

    fn uris(list: &[&str]) -> Vec<LicenseUri> {
        list.iter().map(|s| LicenseUri::new(*s).unwrap()).collect()
    }

    const ALL: &[&str] = &[
        "http://creativecommons.org/licenses/by/2.5/",
        "http://creativecommons.org/licenses/by-nc-nd/2.5/",
        "http://creativecommons.org/licenses/by-sa/2.5/",
        "http://creativecommons.org/licenses/by-nc-sa/2.5/",
        "http://creativecommons.org/licenses/publicdomain/",
    ];

    #[test]
    fn substring_match_anywhere() {
        let kept = filter_excluded(uris(ALL), &Exclusions::from("by-nc"));
        assert_eq!(
            kept,
            uris(&[
                "http://creativecommons.org/licenses/by/2.5/",
                "http://creativecommons.org/licenses/by-sa/2.5/",
                "http://creativecommons.org/licenses/publicdomain/",
            ])
        );
    }

    #[test]
    fn any_exclusion_drops() {
        let exclusions: Exclusions = ["publicdomain", "-sa"].into_iter().collect();
        let kept = filter_excluded(uris(ALL), &exclusions);
        assert_eq!(
            kept,
            uris(&[
                "http://creativecommons.org/licenses/by/2.5/",
                "http://creativecommons.org/licenses/by-nc-nd/2.5/",
            ])
        );
    }

    #[test]
    fn empty_exclusions_are_identity() {
        assert_eq!(filter_excluded(uris(ALL), &Exclusions::none()), uris(ALL));
    }

    #[test]
    fn empty_entries_are_dropped_at_the_edge() {
        let exclusions = Exclusions::from(vec![String::new(), "by-sa".to_string()]);
        assert_eq!(exclusions.len(), 1);
        assert!(Exclusions::from("").is_empty());
        assert_eq!(filter_excluded(uris(ALL), &Exclusions::from("")).len(), ALL.len());
    }

    #[test]
    fn deserializes_scalar_or_sequence() {
        let one: Exclusions = serde_json::from_str("\"by-nc\"").unwrap();
        assert_eq!(one.as_slice(), &["by-nc".to_string()]);
        let many: Exclusions = serde_json::from_str("[\"by-nc\", \"by-nd\"]").unwrap();
        assert_eq!(many.len(), 2);
        assert_eq!(serde_json::to_string(&many).unwrap(), "[\"by-nc\",\"by-nd\"]");
    }
}
