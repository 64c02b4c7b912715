//! # Issuance Sweep
//!
//! Drives an [`IssuanceEndpoint`] with every license class, every answer
//! combination, and every supported locale, once per encoding, and checks
//! each response against `issue.schema.json`. A class without question
//! fields is issued once per locale and encoding with an empty answer set.
//!
//! Requests are sequential. In [`SweepMode::AccumulateAndReport`] (the
//! default) a failing combination is recorded and the sweep moves on; in
//! [`SweepMode::FailFast`] the first failure ends the run.
//!
//! [`Sweep::probe_rejections`] covers the inverse: requests that must be
//! refused (no answers, unknown class) are refused with a conforming error
//! document.

use std::collections::BTreeSet;

use serde::Serialize;
use serde_json::{json, Value};

use ccws_catalog::{LocaleTable, QuestionSource};
use ccws_core::{LicenseClass, LocaleId};

use crate::answers::{answers_document, append_params, query_string, AnswerCombination};
use crate::endpoint::{IssuanceEndpoint, IssueError};
use crate::error::HarnessResult;
use crate::permute::permute;
use crate::validate::{CompiledSchema, SchemaValidationError, SchemaValidator};

/// Schema every issued document must satisfy.
pub const ISSUE_SCHEMA: &str = "issue.schema.json";

/// Schema every generated answers document must satisfy.
pub const ANSWERS_SCHEMA: &str = "answers.schema.json";

/// Schema every rejection must satisfy.
pub const ERROR_SCHEMA: &str = "error.schema.json";

/// Class name used to probe unknown-class handling.
const BOGUS_CLASS: &str = "blarf";

/// What to do when a request fails.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SweepMode {
    /// Record the failure and continue.
    #[default]
    AccumulateAndReport,
    /// Stop at the first failure.
    FailFast,
}

/// How the answers were sent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Encoding {
    /// Answers document via `issue`.
    Document,
    /// Query string via `get`.
    QueryString,
}

impl std::fmt::Display for Encoding {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Document => write!(f, "issue"),
            Self::QueryString => write!(f, "get"),
        }
    }
}

/// One failed request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SweepFailure {
    /// License class.
    pub class: String,
    /// Locale sent with the answers.
    pub locale: String,
    /// Which endpoint operation was called.
    pub encoding: Encoding,
    /// The request as sent.
    pub input: String,
    /// Why it failed.
    pub reason: String,
}

impl std::fmt::Display for SweepFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} {} [{}] {}: {}",
            self.encoding, self.class, self.locale, self.input, self.reason
        )
    }
}

/// Outcome of a sweep.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SweepReport {
    /// Requests sent.
    pub total: usize,
    /// Requests whose response conformed.
    pub passed: usize,
    /// Every failure, in the order encountered.
    pub failures: Vec<SweepFailure>,
}

impl SweepReport {
    /// Number of failed requests.
    pub fn failed(&self) -> usize {
        self.failures.len()
    }

    /// Whether every request passed.
    pub fn is_success(&self) -> bool {
        self.failures.is_empty()
    }

    /// Merge another report into this one.
    pub fn merge(&mut self, other: SweepReport) {
        self.total += other.total;
        self.passed += other.passed;
        self.failures.extend(other.failures);
    }

    fn record(&mut self, outcome: Result<(), SweepFailure>) -> bool {
        self.total += 1;
        match outcome {
            Ok(()) => {
                self.passed += 1;
                true
            }
            Err(failure) => {
                tracing::warn!(%failure, "issuance check failed");
                self.failures.push(failure);
                false
            }
        }
    }
}

/// A configured issuance sweep.
pub struct Sweep<'a> {
    questions: &'a dyn QuestionSource,
    locales: &'a dyn LocaleTable,
    validator: &'a SchemaValidator,
    mode: SweepMode,
    excluded_locales: BTreeSet<String>,
    extra_params: Vec<(String, String)>,
    classes: Option<Vec<LicenseClass>>,
}

impl std::fmt::Debug for Sweep<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Sweep")
            .field("mode", &self.mode)
            .field("excluded_locales", &self.excluded_locales)
            .field("extra_params", &self.extra_params)
            .field("classes", &self.classes)
            .finish()
    }
}

impl<'a> Sweep<'a> {
    /// A sweep over every class of `questions` and every locale of
    /// `locales`.
    pub fn new(
        questions: &'a dyn QuestionSource,
        locales: &'a dyn LocaleTable,
        validator: &'a SchemaValidator,
    ) -> Self {
        Self {
            questions,
            locales,
            validator,
            mode: SweepMode::default(),
            excluded_locales: BTreeSet::new(),
            extra_params: Vec::new(),
            classes: None,
        }
    }

    /// Set the failure mode.
    pub fn with_mode(mut self, mode: SweepMode) -> Self {
        self.mode = mode;
        self
    }

    /// Skip these locales.
    pub fn exclude_locales<I, S>(mut self, locales: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.excluded_locales
            .extend(locales.into_iter().map(Into::into));
        self
    }

    /// Append `key=value` to every query string. The endpoint must ignore it.
    pub fn with_extra_param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.extra_params.push((key.into(), value.into()));
        self
    }

    /// Sweep only these classes.
    pub fn only_classes(mut self, classes: Vec<LicenseClass>) -> Self {
        self.classes = Some(classes);
        self
    }

    fn classes(&self) -> Vec<LicenseClass> {
        self.classes
            .clone()
            .unwrap_or_else(|| self.questions.license_classes())
    }

    fn locales(&self) -> Vec<LocaleId> {
        self.locales
            .supported_locales()
            .into_iter()
            .filter(|l| !self.excluded_locales.contains(l.as_str()))
            .collect()
    }

    /// Run the sweep.
    ///
    /// # Errors
    ///
    /// Only setup failures: a required schema missing or uncompilable, or a
    /// class whose questions cannot be read. Endpoint failures are reported,
    /// not returned.
    pub fn run(&self, endpoint: &dyn IssuanceEndpoint) -> HarnessResult<SweepReport> {
        let issue_schema = self.validator.compile_by_filename(ISSUE_SCHEMA)?;
        let answers_schema = self.validator.compile_by_filename(ANSWERS_SCHEMA)?;
        let locales = self.locales();
        let mut report = SweepReport::default();

        tracing::info!(
            mode = ?self.mode,
            locales = locales.len(),
            "starting issuance sweep"
        );

        for class in self.classes() {
            let fields = self.questions.fields_for(&class)?;
            let no_answers = fields.is_empty().then(AnswerCombination::default);
            for combination in no_answers.into_iter().chain(permute(&fields)) {
                for locale in &locales {
                    let failure = |encoding, input: String, reason: String| SweepFailure {
                        class: class.to_string(),
                        locale: locale.to_string(),
                        encoding,
                        input,
                        reason,
                    };

                    let document = answers_document(&class, &combination, locale);
                    let input = document.to_string();
                    let outcome = answers_schema
                        .validate(&document)
                        .map_err(|e| format!("generated answers rejected: {e}"))
                        .and_then(|()| {
                            check_issued(endpoint.issue(&class, &document), &issue_schema)
                        })
                        .map_err(|reason| failure(Encoding::Document, input, reason));
                    if !report.record(outcome) && self.mode == SweepMode::FailFast {
                        return Ok(report);
                    }

                    let query = append_params(&query_string(&combination, locale), &self.extra_params);
                    let outcome = check_issued(endpoint.get(&class, &query), &issue_schema)
                        .map_err(|reason| failure(Encoding::QueryString, query.clone(), reason));
                    if !report.record(outcome) && self.mode == SweepMode::FailFast {
                        return Ok(report);
                    }
                }
            }
        }

        tracing::info!(
            total = report.total,
            passed = report.passed,
            failed = report.failed(),
            "issuance sweep finished"
        );
        Ok(report)
    }

    /// Check that requests which must fail do fail, with an error document
    /// conforming to `error.schema.json`: `issue` with no answers for every
    /// class, and both operations for an unknown class.
    pub fn probe_rejections(&self, endpoint: &dyn IssuanceEndpoint) -> HarnessResult<SweepReport> {
        let error_schema = self.validator.compile_by_filename(ERROR_SCHEMA)?;
        let mut report = SweepReport::default();
        let empty = json!({});
        let locale = self.locales.default_locale();

        let failure = |class: &LicenseClass, encoding, input: String, reason: String| SweepFailure {
            class: class.to_string(),
            locale: locale.to_string(),
            encoding,
            input,
            reason,
        };

        for class in self.classes() {
            let outcome = check_rejected(endpoint.issue(&class, &empty), &error_schema)
                .map_err(|reason| failure(&class, Encoding::Document, empty.to_string(), reason));
            if !report.record(outcome) && self.mode == SweepMode::FailFast {
                return Ok(report);
            }
        }

        let bogus = LicenseClass::new(BOGUS_CLASS)?;
        let probe = json!({ "answers": { "locale": locale.as_str(), "license-blarf": {} } });
        let outcome = check_rejected(endpoint.issue(&bogus, &probe), &error_schema)
            .map_err(|reason| failure(&bogus, Encoding::Document, probe.to_string(), reason));
        if !report.record(outcome) && self.mode == SweepMode::FailFast {
            return Ok(report);
        }
        let outcome = check_rejected(endpoint.get(&bogus, ""), &error_schema)
            .map_err(|reason| failure(&bogus, Encoding::QueryString, String::new(), reason));
        report.record(outcome);

        Ok(report)
    }
}

fn check_issued(
    response: Result<Value, IssueError>,
    schema: &CompiledSchema,
) -> Result<(), String> {
    let issued = response.map_err(|e| format!("endpoint error: {e}"))?;
    schema
        .validate(&issued)
        .map_err(|e| describe(&e, &issued))
}

fn check_rejected(
    response: Result<Value, IssueError>,
    schema: &CompiledSchema,
) -> Result<(), String> {
    match response {
        Ok(issued) => Err(format!("expected a rejection, got {issued}")),
        Err(e) => {
            let document = e.to_document();
            schema.validate(&document).map_err(|err| describe(&err, &document))
        }
    }
}

fn describe(err: &SchemaValidationError, document: &Value) -> String {
    let details: Vec<String> = err.details().iter().map(ToString::to_string).collect();
    if details.is_empty() {
        format!("{err} in {document}")
    } else {
        format!("{err}: {} in {document}", details.join("; "))
    }
}
