//! # Answer Encodings
//!
//! One [`AnswerCombination`] plus a locale can be sent to the issuance
//! endpoint two ways:
//!
//! - a structured answers document (`issue`):
//!
//!   ```json
//!   { "answers": { "locale": "de", "license-standard": { "commercial": "n", "derivatives": "sa" } } }
//!   ```
//!
//! - a query string (`get`): `commercial=n&derivatives=sa&locale=de`.
//!
//! Both decoders keep only the fields they are told about, so unknown
//! parameters such as `foo=bar` are ignored. Encoding and decoding the same
//! combination either way yields the same pairs and locale.

use serde::Serialize;
use serde_json::{Map, Value};
use thiserror::Error;

use ccws_catalog::QuestionField;
use ccws_core::{LicenseClass, LocaleId};

/// Root element of an answers document.
pub const ANSWERS_ROOT: &str = "answers";

/// Key carrying the locale, in both encodings.
pub const LOCALE_KEY: &str = "locale";

/// The per-class element inside an answers document (`license-<class>`).
pub fn class_root(class: &LicenseClass) -> String {
    format!("license-{class}")
}

/// One answer per question field, in field order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize)]
pub struct AnswerCombination {
    pairs: Vec<(String, String)>,
}

impl AnswerCombination {
    /// Build from `(field_id, value)` pairs.
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            pairs: pairs
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }

    /// The `(field_id, value)` pairs.
    pub fn pairs(&self) -> &[(String, String)] {
        &self.pairs
    }

    /// The answer given for `field`.
    pub fn get(&self, field: &str) -> Option<&str> {
        self.pairs
            .iter()
            .find(|(k, _)| k == field)
            .map(|(_, v)| v.as_str())
    }

    /// Answer values in field order.
    pub fn values(&self) -> impl Iterator<Item = &str> {
        self.pairs.iter().map(|(_, v)| v.as_str())
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }
}

impl std::fmt::Display for AnswerCombination {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let parts: Vec<String> = self.pairs.iter().map(|(k, v)| format!("{k}={v}")).collect();
        write!(f, "({})", parts.join(", "))
    }
}

/// Answers recovered from either encoding.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DecodedAnswers {
    /// The locale parameter, verbatim.
    pub locale: Option<String>,
    /// Answers for the known fields that were present, in field order.
    pub combination: AnswerCombination,
}

/// An answers document that does not have the expected shape.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AnswersError {
    /// No `answers` object at the top level.
    #[error("document has no \"answers\" object")]
    MissingRoot,

    /// No `license-<class>` object under `answers`.
    #[error("answers document has no \"{element}\" object")]
    MissingClassRoot {
        /// The expected element name.
        element: String,
    },

    /// A field or the locale is present but not a string.
    #[error("answer for \"{field}\" is not a string")]
    NonString {
        /// Offending key.
        field: String,
    },
}

/// Encode `combination` as an answers document for `class`.
pub fn answers_document(
    class: &LicenseClass,
    combination: &AnswerCombination,
    locale: &LocaleId,
) -> Value {
    let fields: Map<String, Value> = combination
        .pairs()
        .iter()
        .map(|(k, v)| (k.clone(), Value::String(v.clone())))
        .collect();

    let mut answers = Map::new();
    answers.insert(LOCALE_KEY.to_string(), Value::String(locale.to_string()));
    answers.insert(class_root(class), Value::Object(fields));

    let mut root = Map::new();
    root.insert(ANSWERS_ROOT.to_string(), Value::Object(answers));
    Value::Object(root)
}

/// Encode `combination` as a query string, locale last. No leading `?`.
pub fn query_string(combination: &AnswerCombination, locale: &LocaleId) -> String {
    url::form_urlencoded::Serializer::new(String::new())
        .extend_pairs(combination.pairs())
        .append_pair(LOCALE_KEY, locale.as_str())
        .finish()
}

/// Append extra parameters to an encoded query string.
pub fn append_params(query: &str, extra: &[(String, String)]) -> String {
    if extra.is_empty() {
        return query.to_string();
    }
    // Offset 0: the existing query counts as pairs, so `&` is inserted.
    let mut serializer = url::form_urlencoded::Serializer::for_suffix(query.to_string(), 0);
    serializer.extend_pairs(extra);
    serializer.finish()
}

/// Decode a query string, keeping the locale and the answers to `fields`.
/// A leading `?` is allowed. When a key repeats, the first value wins.
pub fn decode_query_string(query: &str, fields: &[QuestionField]) -> DecodedAnswers {
    let query = query.strip_prefix('?').unwrap_or(query);
    let params: Vec<(String, String)> = url::form_urlencoded::parse(query.as_bytes())
        .into_owned()
        .collect();
    let lookup = |key: &str| {
        params
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.clone())
    };

    let combination = AnswerCombination::from_pairs(
        fields
            .iter()
            .filter_map(|field| lookup(&field.id).map(|value| (field.id.clone(), value))),
    );
    DecodedAnswers {
        locale: lookup(LOCALE_KEY),
        combination,
    }
}

/// Decode an answers document for `class`, keeping the answers to `fields`.
///
/// # Errors
///
/// [`AnswersError`] if the document lacks the `answers` or class element,
/// or if the locale or a known field is not a string.
pub fn decode_answers_document(
    document: &Value,
    class: &LicenseClass,
    fields: &[QuestionField],
) -> Result<DecodedAnswers, AnswersError> {
    let answers = document
        .get(ANSWERS_ROOT)
        .and_then(Value::as_object)
        .ok_or(AnswersError::MissingRoot)?;

    let element = class_root(class);
    let values = answers
        .get(&element)
        .and_then(Value::as_object)
        .ok_or(AnswersError::MissingClassRoot { element })?;

    let as_string = |key: &str, value: &Value| {
        value
            .as_str()
            .map(str::to_string)
            .ok_or_else(|| AnswersError::NonString {
                field: key.to_string(),
            })
    };

    let locale = answers
        .get(LOCALE_KEY)
        .map(|v| as_string(LOCALE_KEY, v))
        .transpose()?;

    let mut pairs = Vec::new();
    for field in fields {
        if let Some(value) = values.get(&field.id) {
            pairs.push((field.id.clone(), as_string(&field.id, value)?));
        }
    }

    Ok(DecodedAnswers {
        locale,
        combination: AnswerCombination::from_pairs(pairs),
    })
}

/// The `(field, value)` pairs carried by an answers document, whatever the
/// fields are, sorted by field.
pub fn document_pairs(document: &Value, class: &LicenseClass) -> Option<Vec<(String, String)>> {
    let values = document
        .get(ANSWERS_ROOT)?
        .get(class_root(class))?
        .as_object()?;
    let mut pairs: Vec<(String, String)> = values
        .iter()
        .filter_map(|(k, v)| v.as_str().map(|s| (k.clone(), s.to_string())))
        .collect();
    pairs.sort();
    Some(pairs)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn fields() -> Vec<QuestionField> {
        vec![
            QuestionField::new("commercial", ["y", "n"]),
            QuestionField::new("derivatives", ["y", "sa", "n"]),
            QuestionField::new("jurisdiction", ["-", "nl"]),
        ]
    }

    fn combo() -> AnswerCombination {
        AnswerCombination::from_pairs([
            ("commercial", "n"),
            ("derivatives", "sa"),
            ("jurisdiction", "-"),
        ])
    }

    fn de() -> LocaleId {
        LocaleId::new("de").unwrap()
    }

    #[test]
    fn document_shape() {
        let doc = answers_document(&LicenseClass::standard(), &combo(), &de());
        assert_eq!(
            doc,
            json!({
                "answers": {
                    "locale": "de",
                    "license-standard": {
                        "commercial": "n",
                        "derivatives": "sa",
                        "jurisdiction": "-"
                    }
                }
            })
        );
    }

    #[test]
    fn query_string_shape() {
        assert_eq!(
            query_string(&combo(), &de()),
            "commercial=n&derivatives=sa&jurisdiction=-&locale=de"
        );
    }

    #[test]
    fn query_string_escapes_reserved_characters() {
        let combo = AnswerCombination::from_pairs([("title", "a&b c")]);
        let qs = query_string(&combo, &de());
        assert_eq!(qs, "title=a%26b+c&locale=de");
        let decoded = decode_query_string(&qs, &[QuestionField::new("title", ["a&b c"])]);
        assert_eq!(decoded.combination.get("title"), Some("a&b c"));
    }

    #[test]
    fn both_encodings_carry_the_same_answers() {
        let class = LicenseClass::standard();
        let doc = answers_document(&class, &combo(), &de());
        let qs = query_string(&combo(), &de());

        let from_doc = decode_answers_document(&doc, &class, &fields()).unwrap();
        let from_qs = decode_query_string(&qs, &fields());
        assert_eq!(from_doc, from_qs);
        assert_eq!(from_qs.combination, combo());
        assert_eq!(from_qs.locale.as_deref(), Some("de"));

        let mut sorted = combo().pairs().to_vec();
        sorted.sort();
        assert_eq!(document_pairs(&doc, &class), Some(sorted));
    }

    #[test]
    fn unknown_parameters_are_ignored() {
        let qs = append_params(
            &query_string(&combo(), &de()),
            &[("foo".to_string(), "bar".to_string())],
        );
        assert!(qs.ends_with("&foo=bar"));
        let decoded = decode_query_string(&format!("?{qs}"), &fields());
        assert_eq!(decoded.combination, combo());
        assert_eq!(decoded.locale.as_deref(), Some("de"));
    }

    #[test]
    fn missing_fields_are_absent_not_errors() {
        let decoded = decode_query_string("commercial=y", &fields());
        assert_eq!(decoded.combination.len(), 1);
        assert!(decoded.locale.is_none());
    }

    #[test]
    fn malformed_documents() {
        let class = LicenseClass::standard();
        assert_eq!(
            decode_answers_document(&json!({}), &class, &fields()),
            Err(AnswersError::MissingRoot)
        );
        assert_eq!(
            decode_answers_document(&json!({"answers": {"locale": "en"}}), &class, &fields()),
            Err(AnswersError::MissingClassRoot {
                element: "license-standard".into()
            })
        );
        let bad = json!({"answers": {"license-standard": {"commercial": 1}}});
        assert!(matches!(
            decode_answers_document(&bad, &class, &fields()),
            Err(AnswersError::NonString { field }) if field == "commercial"
        ));
    }

    #[test]
    fn combination_accessors() {
        let c = combo();
        assert_eq!(c.get("derivatives"), Some("sa"));
        assert_eq!(c.get("missing"), None);
        assert_eq!(c.values().collect::<Vec<_>>(), vec!["n", "sa", "-"]);
        assert_eq!(c.to_string(), "(commercial=n, derivatives=sa, jurisdiction=-)");
    }
}
