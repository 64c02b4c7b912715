//! # Issuance Endpoint
//!
//! [`IssuanceEndpoint`] is the surface the sweep drives: `issue` takes an
//! answers document, `get` takes a query string, and both return the issued
//! license as JSON. A remote service implements it over HTTP; [`CatalogIssuer`]
//! implements it in-process over a [`Catalog`].
//!
//! ## Issuance rules
//!
//! Every question field of the class must be answered with one of its legal
//! values. For the `standard` class the license code is built from the
//! answers: `by`, then `-nc` when `commercial=n`, then `-nd` when
//! `derivatives=n` or `-sa` when `derivatives=sa`. A class holding a single
//! license issues that license. The `jurisdiction` answer (default `"-"`)
//! picks the port; the port's latest version is issued.

use serde_json::{json, Value};
use thiserror::Error;

use ccws_catalog::{
    Catalog, CatalogError, DetailLookup, LocaleResolver, QuestionField, QuestionSource,
};
use ccws_core::{JurisdictionId, LicenseClass, LicenseUri, ResolutionError};

use crate::answers::{decode_answers_document, decode_query_string, AnswersError, DecodedAnswers};

/// Why an issuance request was rejected.
#[derive(Error, Debug)]
pub enum IssueError {
    /// The license class does not exist.
    #[error("unknown license class: {0}")]
    UnknownClass(String),

    /// The answers document is malformed.
    #[error("malformed answers: {0}")]
    MalformedAnswers(#[from] AnswersError),

    /// A question field was not answered.
    #[error("missing answer for field \"{field}\"")]
    MissingAnswer {
        /// The unanswered field.
        field: String,
    },

    /// An answer is not one of the field's legal values.
    #[error("invalid answer \"{value}\" for field \"{field}\"")]
    InvalidAnswer {
        /// The field.
        field: String,
        /// The rejected value.
        value: String,
    },

    /// No license in the catalog matches the answers.
    #[error("no {class} license matches {code} in jurisdiction {jurisdiction}")]
    NoMatch {
        /// License class.
        class: String,
        /// Derived license code.
        code: String,
        /// Requested jurisdiction.
        jurisdiction: String,
    },

    /// The catalog failed.
    #[error(transparent)]
    Catalog(#[from] CatalogError),

    /// The endpoint could not be reached or answered garbage.
    #[error("transport error: {0}")]
    Transport(String),
}

impl IssueError {
    /// Stable identifier for the error document.
    pub fn id(&self) -> &'static str {
        match self {
            Self::UnknownClass(_) => "invalidclass",
            Self::MalformedAnswers(_) => "malformedanswers",
            Self::MissingAnswer { .. } => "missinganswer",
            Self::InvalidAnswer { .. } => "invalidanswer",
            Self::NoMatch { .. } => "nomatch",
            Self::Catalog(_) => "catalog",
            Self::Transport(_) => "transport",
        }
    }

    /// The error as a response document (`error.schema.json`).
    pub fn to_document(&self) -> Value {
        json!({ "error": { "id": self.id(), "message": self.to_string() } })
    }
}

/// The license-issuance surface exercised by the sweep.
pub trait IssuanceEndpoint {
    /// Issue a license from a structured answers document.
    fn issue(&self, class: &LicenseClass, answers: &Value) -> Result<Value, IssueError>;

    /// Issue a license from a query string (`field=value&...&locale=id`).
    /// Unknown parameters are ignored.
    fn get(&self, class: &LicenseClass, query: &str) -> Result<Value, IssueError>;
}

/// In-process issuer backed by a catalog.
#[derive(Debug, Clone, Copy)]
pub struct CatalogIssuer<'a> {
    catalog: &'a Catalog,
}

impl<'a> CatalogIssuer<'a> {
    /// Issue from `catalog`.
    pub fn new(catalog: &'a Catalog) -> Self {
        Self { catalog }
    }

    fn fields(&self, class: &LicenseClass) -> Result<Vec<QuestionField>, IssueError> {
        self.catalog.fields_for(class).map_err(|e| match e.as_resolution() {
            Some(ResolutionError::UnknownLicenseClass { class }) => {
                IssueError::UnknownClass(class.clone())
            }
            _ => IssueError::Catalog(e),
        })
    }

    fn issue_decoded(
        &self,
        class: &LicenseClass,
        fields: &[QuestionField],
        decoded: &DecodedAnswers,
    ) -> Result<Value, IssueError> {
        for field in fields {
            let value = decoded
                .combination
                .get(&field.id)
                .ok_or_else(|| IssueError::MissingAnswer {
                    field: field.id.clone(),
                })?;
            if !field.answers.iter().any(|a| a == value) {
                return Err(IssueError::InvalidAnswer {
                    field: field.id.clone(),
                    value: value.to_string(),
                });
            }
        }

        let jurisdiction = match decoded.combination.get("jurisdiction") {
            Some(j) => JurisdictionId::new(j).map_err(CatalogError::from)?,
            None => JurisdictionId::agnostic(),
        };
        let code = self.license_code(class, decoded)?;
        let uri = self.latest_uri(class, &code, &jurisdiction)?;

        let locale = LocaleResolver::new(self.catalog).resolve(decoded.locale.as_deref());
        let detail = self.catalog.details_for(&uri, &locale)?;
        tracing::debug!(class = %class, uri = %detail.uri, locale = %locale, "issued license");

        Ok(json!({
            "license-uri": detail.uri,
            "license-name": detail.name,
            "locale": locale,
        }))
    }

    fn license_code(&self, class: &LicenseClass, decoded: &DecodedAnswers) -> Result<String, IssueError> {
        if *class == LicenseClass::standard() {
            let mut code = String::from("by");
            if decoded.combination.get("commercial") == Some("n") {
                code.push_str("-nc");
            }
            match decoded.combination.get("derivatives") {
                Some("n") => code.push_str("-nd"),
                Some("sa") => code.push_str("-sa"),
                _ => {}
            }
            return Ok(code);
        }

        match self.catalog.document().class(class).map(|c| c.licenses.as_slice()) {
            Some([only]) => Ok(only.code.clone()),
            _ => Err(IssueError::NoMatch {
                class: class.to_string(),
                code: "<ambiguous>".to_string(),
                jurisdiction: JurisdictionId::agnostic().to_string(),
            }),
        }
    }

    fn latest_uri(
        &self,
        class: &LicenseClass,
        code: &str,
        jurisdiction: &JurisdictionId,
    ) -> Result<LicenseUri, IssueError> {
        self.catalog
            .document()
            .class(class)
            .into_iter()
            .flat_map(|c| &c.licenses)
            .filter(|l| l.code == code)
            .flat_map(|l| &l.jurisdictions)
            .filter(|port| &port.id == jurisdiction)
            .flat_map(|port| &port.versions)
            .max_by(|a, b| a.id.cmp(&b.id))
            .map(|v| v.uri.clone())
            .ok_or_else(|| IssueError::NoMatch {
                class: class.to_string(),
                code: code.to_string(),
                jurisdiction: jurisdiction.to_string(),
            })
    }
}

impl IssuanceEndpoint for CatalogIssuer<'_> {
    fn issue(&self, class: &LicenseClass, answers: &Value) -> Result<Value, IssueError> {
        let fields = self.fields(class)?;
        let decoded = decode_answers_document(answers, class, &fields)?;
        self.issue_decoded(class, &fields, &decoded)
    }

    fn get(&self, class: &LicenseClass, query: &str) -> Result<Value, IssueError> {
        let fields = self.fields(class)?;
        let decoded = decode_query_string(query, &fields);
        self.issue_decoded(class, &fields, &decoded)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::answers::{answers_document, query_string, AnswerCombination};
    use ccws_core::LocaleId;

    const YAML: &str = r#"
default_locale: en
locales: [en, de]
jurisdictions:
  nl: { en: Netherlands, de: Niederlande }
classes:
  - id: standard
    fields:
      - { id: commercial, answers: [y, n] }
      - { id: derivatives, answers: [y, sa, n] }
      - { id: jurisdiction, answers: ["-", nl] }
    licenses:
      - code: by-nc-sa
        names: { en: Attribution-NonCommercial-ShareAlike }
        jurisdictions:
          - id: "-"
            versions:
              - { id: "2.0", uri: "http://creativecommons.org/licenses/by-nc-sa/2.0/" }
              - { id: "2.5", uri: "http://creativecommons.org/licenses/by-nc-sa/2.5/" }
          - id: nl
            versions:
              - { id: "2.5", uri: "http://creativecommons.org/licenses/by-nc-sa/2.5/nl/" }
  - id: publicdomain
    licenses:
      - code: publicdomain
        names: { en: Public Domain, de: Gemeinfreiheit }
        jurisdictions:
          - id: "-"
            versions:
              - { id: "-", uri: "http://creativecommons.org/licenses/publicdomain/" }
"#;

    fn catalog() -> Catalog {
        Catalog::from_yaml_str(YAML).unwrap()
    }

    fn answers(commercial: &str, derivatives: &str, jurisdiction: &str) -> AnswerCombination {
        AnswerCombination::from_pairs([
            ("commercial", commercial),
            ("derivatives", derivatives),
            ("jurisdiction", jurisdiction),
        ])
    }

    fn en() -> LocaleId {
        LocaleId::new("en").unwrap()
    }

    #[test]
    fn issue_builds_code_and_picks_latest_version() {
        let catalog = catalog();
        let issuer = CatalogIssuer::new(&catalog);
        let class = LicenseClass::standard();
        let doc = answers_document(&class, &answers("n", "sa", "-"), &en());
        let issued = issuer.issue(&class, &doc).unwrap();
        assert_eq!(
            issued["license-uri"],
            "http://creativecommons.org/licenses/by-nc-sa/2.5/"
        );
        assert_eq!(issued["locale"], "en");
    }

    #[test]
    fn get_matches_issue_and_ignores_extra_params() {
        let catalog = catalog();
        let issuer = CatalogIssuer::new(&catalog);
        let class = LicenseClass::standard();
        let combo = answers("n", "sa", "nl");

        let via_issue = issuer
            .issue(&class, &answers_document(&class, &combo, &en()))
            .unwrap();
        let via_get = issuer
            .get(&class, &format!("{}&foo=bar", query_string(&combo, &en())))
            .unwrap();
        assert_eq!(via_issue, via_get);
        assert_eq!(
            via_get["license-name"],
            "Attribution-NonCommercial-ShareAlike 2.5 Netherlands"
        );
    }

    #[test]
    fn unmatched_answers_are_no_match() {
        let catalog = catalog();
        let issuer = CatalogIssuer::new(&catalog);
        let class = LicenseClass::standard();
        let doc = answers_document(&class, &answers("y", "y", "-"), &en());
        assert!(matches!(
            issuer.issue(&class, &doc),
            Err(IssueError::NoMatch { code, .. }) if code == "by"
        ));
    }

    #[test]
    fn rejects_missing_and_illegal_answers() {
        let catalog = catalog();
        let issuer = CatalogIssuer::new(&catalog);
        let class = LicenseClass::standard();

        assert!(matches!(
            issuer.get(&class, "commercial=n&locale=en"),
            Err(IssueError::MissingAnswer { field }) if field == "derivatives"
        ));
        assert!(matches!(
            issuer.get(&class, "commercial=maybe&derivatives=y&jurisdiction=-"),
            Err(IssueError::InvalidAnswer { field, .. }) if field == "commercial"
        ));
        assert!(matches!(
            issuer.issue(&class, &json!({})),
            Err(IssueError::MalformedAnswers(AnswersError::MissingRoot))
        ));
    }

    #[test]
    fn unknown_class_is_rejected() {
        let catalog = catalog();
        let issuer = CatalogIssuer::new(&catalog);
        let err = issuer
            .get(&LicenseClass::new("blarf").unwrap(), "")
            .unwrap_err();
        assert!(matches!(err, IssueError::UnknownClass(ref c) if c == "blarf"));
        assert_eq!(err.to_document()["error"]["id"], "invalidclass");
    }

    #[test]
    fn single_license_class_without_questions() {
        let catalog = catalog();
        let issuer = CatalogIssuer::new(&catalog);
        let issued = issuer
            .get(&LicenseClass::publicdomain(), "locale=de")
            .unwrap();
        assert_eq!(issued["license-name"], "Gemeinfreiheit");
    }
}
