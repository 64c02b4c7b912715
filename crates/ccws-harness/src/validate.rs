//! # Schema Validation
//!
//! Validates JSON/YAML documents against the JSON Schema (Draft 2020-12)
//! contracts in `schemas/`. Every schema is registered by its `$id`, and
//! `$ref`s between schemas resolve against that registry, never the network.
//!
//! Schemas in this repository use `$id`s of the form
//! `https://schemas.creativecommons.org/ccws/{filename}`.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use serde_json::Value;
use thiserror::Error;

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

/// One violation found while validating a document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchemaValidationDetail {
    /// The `$id` of the violated schema.
    pub schema_path: String,
    /// JSON Pointer to the offending value.
    pub instance_path: String,
    /// Human-readable description of the violation.
    pub message: String,
}

impl std::fmt::Display for SchemaValidationDetail {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "schema={}, path={}: {}",
            self.schema_path, self.instance_path, self.message
        )
    }
}

/// Errors returned by schema validation operations.
#[derive(Error, Debug)]
pub enum SchemaValidationError {
    /// A schema file could not be read or parsed.
    #[error("failed to load schema {path}: {reason}")]
    SchemaLoadError {
        /// Path of the schema file.
        path: String,
        /// Why loading failed.
        reason: String,
    },

    /// The document could not be loaded.
    #[error("failed to load document {path}: {reason}")]
    DocumentLoadError {
        /// Path of the document.
        path: String,
        /// Why loading failed.
        reason: String,
    },

    /// The schema could not be compiled.
    #[error("failed to compile schema {schema_id}: {reason}")]
    SchemaCompileError {
        /// The schema `$id`.
        schema_id: String,
        /// Why compilation failed.
        reason: String,
    },

    /// The document does not conform to the schema.
    #[error("{count} validation error(s) against {schema_id}")]
    ValidationFailed {
        /// The violated schema.
        schema_id: String,
        /// Number of violations.
        count: usize,
        /// Every violation.
        details: Vec<SchemaValidationDetail>,
    },

    /// No schema with this `$id` or filename is registered.
    #[error("schema not found: {0}")]
    SchemaNotFound(String),

    /// I/O error while scanning the schema directory.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl SchemaValidationError {
    /// Violation details, if this is a validation failure.
    pub fn details(&self) -> &[SchemaValidationDetail] {
        match self {
            Self::ValidationFailed { details, .. } => details,
            _ => &[],
        }
    }
}

// ---------------------------------------------------------------------------
// Schema retriever for $ref resolution
// ---------------------------------------------------------------------------

/// `$id` prefix of every schema in `schemas/`.
pub const SCHEMA_URI_PREFIX: &str = "https://schemas.creativecommons.org/ccws/";

/// Resolves `$ref` URIs from the pre-loaded registry.
struct LocalSchemaRetriever {
    schemas: HashMap<String, Value>,
}

impl jsonschema::Retrieve for LocalSchemaRetriever {
    fn retrieve(
        &self,
        uri: &jsonschema::Uri<&str>,
    ) -> Result<Value, Box<dyn std::error::Error + Send + Sync>> {
        let uri_str = uri.as_str();
        self.schemas
            .get(uri_str)
            .cloned()
            .ok_or_else(|| format!("schema not found for URI: {uri_str}").into())
    }
}

// ---------------------------------------------------------------------------
// Compiled schema
// ---------------------------------------------------------------------------

/// A schema compiled once and reused for many documents.
pub struct CompiledSchema {
    schema_id: String,
    validator: jsonschema::Validator,
}

impl std::fmt::Debug for CompiledSchema {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CompiledSchema")
            .field("schema_id", &self.schema_id)
            .finish()
    }
}

impl CompiledSchema {
    /// The schema `$id`.
    pub fn schema_id(&self) -> &str {
        &self.schema_id
    }

    /// Whether `value` conforms.
    pub fn is_valid(&self, value: &Value) -> bool {
        self.validator.is_valid(value)
    }

    /// Validate `value`, collecting every violation.
    pub fn validate(&self, value: &Value) -> Result<(), SchemaValidationError> {
        let details: Vec<SchemaValidationDetail> = self
            .validator
            .iter_errors(value)
            .map(|err| SchemaValidationDetail {
                schema_path: self.schema_id.clone(),
                instance_path: err.instance_path.to_string(),
                message: err.to_string(),
            })
            .collect();

        if details.is_empty() {
            Ok(())
        } else {
            Err(SchemaValidationError::ValidationFailed {
                schema_id: self.schema_id.clone(),
                count: details.len(),
                details,
            })
        }
    }
}

// ---------------------------------------------------------------------------
// SchemaValidator
// ---------------------------------------------------------------------------

/// Registry of the JSON Schemas in a directory.
pub struct SchemaValidator {
    schema_dir: PathBuf,
    /// Schemas by `$id`.
    schema_map: HashMap<String, Value>,
    /// Schema filename (`issue.schema.json`) to `$id`.
    filename_to_id: HashMap<String, String>,
}

impl std::fmt::Debug for SchemaValidator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SchemaValidator")
            .field("schema_dir", &self.schema_dir)
            .field("schema_count", &self.schema_map.len())
            .finish()
    }
}

impl SchemaValidator {
    /// Load every `*.schema.json` under `schema_dir`.
    ///
    /// Schemas without an `$id` are registered under
    /// [`SCHEMA_URI_PREFIX`] plus their path relative to the directory.
    ///
    /// # Errors
    ///
    /// [`SchemaValidationError::SchemaLoadError`] if a schema file cannot be
    /// read or is not JSON.
    pub fn new(schema_dir: impl Into<PathBuf>) -> Result<Self, SchemaValidationError> {
        let schema_dir = schema_dir.into();
        let mut schema_map = HashMap::new();
        let mut filename_to_id = HashMap::new();

        if !schema_dir.is_dir() {
            tracing::warn!(dir = %schema_dir.display(), "schema directory does not exist");
            return Ok(Self {
                schema_dir,
                schema_map,
                filename_to_id,
            });
        }

        for path in Self::glob_schemas(&schema_dir)? {
            let load_error = |reason: String| SchemaValidationError::SchemaLoadError {
                path: path.display().to_string(),
                reason,
            };
            let content = std::fs::read_to_string(&path).map_err(|e| load_error(e.to_string()))?;
            let schema: Value =
                serde_json::from_str(&content).map_err(|e| load_error(e.to_string()))?;

            let schema_id = match schema.get("$id").and_then(Value::as_str) {
                Some(id) => id.to_string(),
                None => {
                    let rel = path.strip_prefix(&schema_dir).unwrap_or(&path);
                    format!("{SCHEMA_URI_PREFIX}{}", rel.display())
                }
            };

            if let Some(filename) = path.file_name().and_then(|f| f.to_str()) {
                filename_to_id.insert(filename.to_string(), schema_id.clone());
            }
            schema_map.insert(schema_id, schema);
        }

        tracing::debug!(
            dir = %schema_dir.display(),
            schemas = schema_map.len(),
            "loaded schema registry"
        );
        Ok(Self {
            schema_dir,
            schema_map,
            filename_to_id,
        })
    }

    /// Number of registered schemas.
    pub fn schema_count(&self) -> usize {
        self.schema_map.len()
    }

    /// The `$id` registered for a schema filename.
    pub fn schema_id_for(&self, filename: &str) -> Option<&str> {
        self.filename_to_id.get(filename).map(String::as_str)
    }

    /// Compile the schema with `schema_id`.
    pub fn compile(&self, schema_id: &str) -> Result<CompiledSchema, SchemaValidationError> {
        let schema = self
            .schema_map
            .get(schema_id)
            .ok_or_else(|| SchemaValidationError::SchemaNotFound(schema_id.to_string()))?;

        let retriever = LocalSchemaRetriever {
            schemas: self.schema_map.clone(),
        };

        let validator = jsonschema::options()
            .with_draft(jsonschema::Draft::Draft202012)
            .with_retriever(retriever)
            .build(schema)
            .map_err(|e| SchemaValidationError::SchemaCompileError {
                schema_id: schema_id.to_string(),
                reason: e.to_string(),
            })?;

        Ok(CompiledSchema {
            schema_id: schema_id.to_string(),
            validator,
        })
    }

    /// Compile the schema registered for `filename`.
    pub fn compile_by_filename(
        &self,
        filename: &str,
    ) -> Result<CompiledSchema, SchemaValidationError> {
        let schema_id = self
            .schema_id_for(filename)
            .ok_or_else(|| SchemaValidationError::SchemaNotFound(filename.to_string()))?;
        self.compile(schema_id)
    }

    /// Validate `value` against the schema registered for `filename`.
    pub fn validate_value_by_filename(
        &self,
        value: &Value,
        filename: &str,
    ) -> Result<(), SchemaValidationError> {
        self.compile_by_filename(filename)?.validate(value)
    }

    /// Validate a YAML file against the schema registered for `filename`.
    pub fn validate_yaml_file(&self, path: &Path, filename: &str) -> Result<(), SchemaValidationError> {
        let content = Self::read_document(path)?;
        let value: Value =
            serde_yaml::from_str(&content).map_err(|e| SchemaValidationError::DocumentLoadError {
                path: path.display().to_string(),
                reason: format!("YAML parse error: {e}"),
            })?;
        self.validate_value_by_filename(&value, filename)
    }

    /// Validate a JSON file against the schema registered for `filename`.
    pub fn validate_json_file(&self, path: &Path, filename: &str) -> Result<(), SchemaValidationError> {
        let content = Self::read_document(path)?;
        let value: Value =
            serde_json::from_str(&content).map_err(|e| SchemaValidationError::DocumentLoadError {
                path: path.display().to_string(),
                reason: format!("JSON parse error: {e}"),
            })?;
        self.validate_value_by_filename(&value, filename)
    }

    /// Validate a file by extension: `.json` as JSON, anything else as YAML.
    pub fn validate_file(&self, path: &Path, filename: &str) -> Result<(), SchemaValidationError> {
        match path.extension().and_then(|e| e.to_str()) {
            Some("json") => self.validate_json_file(path, filename),
            _ => self.validate_yaml_file(path, filename),
        }
    }

    // -----------------------------------------------------------------------
    // Private helpers
    // -----------------------------------------------------------------------

    fn read_document(path: &Path) -> Result<String, SchemaValidationError> {
        std::fs::read_to_string(path).map_err(|e| SchemaValidationError::DocumentLoadError {
            path: path.display().to_string(),
            reason: e.to_string(),
        })
    }

    fn glob_schemas(dir: &Path) -> Result<Vec<PathBuf>, SchemaValidationError> {
        let mut results = Vec::new();
        Self::walk_for_schemas(dir, &mut results)?;
        results.sort();
        Ok(results)
    }

    fn walk_for_schemas(dir: &Path, acc: &mut Vec<PathBuf>) -> Result<(), SchemaValidationError> {
        for entry in std::fs::read_dir(dir)? {
            let path = entry?.path();
            if path.is_dir() {
                Self::walk_for_schemas(&path, acc)?;
            } else if path
                .file_name()
                .and_then(|f| f.to_str())
                .is_some_and(|name| name.ends_with(".schema.json"))
            {
                acc.push(path);
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::io::Write;

    fn repo_root() -> PathBuf {
        // crates/ccws-harness -> crates -> repo root
        let mut dir = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
        dir.pop();
        dir.pop();
        dir
    }

    fn validator() -> SchemaValidator {
        SchemaValidator::new(repo_root().join("schemas")).expect("failed to load schemas")
    }

    #[test]
    fn loads_repository_schemas() {
        let v = validator();
        assert!(v.schema_count() >= 5);
        assert_eq!(
            v.schema_id_for("issue.schema.json"),
            Some("https://schemas.creativecommons.org/ccws/issue.schema.json")
        );
    }

    #[test]
    fn valid_issue_document_passes() {
        let doc = json!({
            "license-uri": "http://creativecommons.org/licenses/by-sa/2.5/",
            "license-name": "Attribution-ShareAlike 2.5",
            "locale": "en"
        });
        let result = validator().validate_value_by_filename(&doc, "issue.schema.json");
        assert!(result.is_ok(), "{result:?}");
    }

    #[test]
    fn cross_schema_ref_is_enforced() {
        // licenseUri lives in common.schema.json.
        let doc = json!({
            "license-uri": "http://example.org/by-sa/2.5/",
            "license-name": "x",
            "locale": "en"
        });
        let err = validator()
            .validate_value_by_filename(&doc, "issue.schema.json")
            .unwrap_err();
        let details = err.details();
        assert_eq!(details.len(), 1);
        assert_eq!(details[0].instance_path, "/license-uri");
    }

    #[test]
    fn every_violation_is_reported() {
        let err = validator()
            .validate_value_by_filename(&json!({"locale": "e n"}), "issue.schema.json")
            .unwrap_err();
        match err {
            SchemaValidationError::ValidationFailed { count, details, .. } => {
                assert!(count >= 2);
                assert_eq!(count, details.len());
            }
            other => panic!("expected ValidationFailed, got {other:?}"),
        }
    }

    #[test]
    fn compiled_schema_is_reusable() {
        let compiled = validator()
            .compile_by_filename("error.schema.json")
            .unwrap();
        assert!(compiled.is_valid(&json!({"error": {"id": "x", "message": "y"}})));
        assert!(!compiled.is_valid(&json!({"error": {}})));
        assert!(compiled.schema_id().ends_with("error.schema.json"));
    }

    #[test]
    fn unknown_schema_is_not_found() {
        let err = validator()
            .validate_value_by_filename(&json!({}), "nope.schema.json")
            .unwrap_err();
        assert!(matches!(err, SchemaValidationError::SchemaNotFound(_)));
    }

    #[test]
    fn sample_catalog_conforms() {
        let result = validator().validate_yaml_file(
            &repo_root().join("data").join("catalog.yaml"),
            "catalog.schema.json",
        );
        assert!(result.is_ok(), "{result:?}");
    }

    #[test]
    fn catalog_with_unquoted_shape_errors_is_rejected() {
        let mut file = tempfile::Builder::new().suffix(".yaml").tempfile().unwrap();
        file.write_all(b"default_locale: en\nlocales: []\nclasses: []\n")
            .unwrap();
        let err = validator()
            .validate_file(file.path(), "catalog.schema.json")
            .unwrap_err();
        assert!(err.details().len() >= 2);
    }

    #[test]
    fn missing_document_is_a_load_error() {
        let err = validator()
            .validate_json_file(Path::new("/nonexistent/doc.json"), "issue.schema.json")
            .unwrap_err();
        assert!(matches!(err, SchemaValidationError::DocumentLoadError { .. }));
    }

    #[test]
    fn missing_directory_yields_empty_registry() {
        let v = SchemaValidator::new("/nonexistent/schemas").unwrap();
        assert_eq!(v.schema_count(), 0);
    }

    #[test]
    fn schema_without_id_gets_derived_id() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("plain.schema.json"),
            r#"{"type": "object", "required": ["a"]}"#,
        )
        .unwrap();
        let v = SchemaValidator::new(dir.path()).unwrap();
        assert_eq!(
            v.schema_id_for("plain.schema.json"),
            Some("https://schemas.creativecommons.org/ccws/plain.schema.json")
        );
        assert!(v.validate_value_by_filename(&json!({}), "plain.schema.json").is_err());
    }

    #[test]
    fn unparseable_schema_is_a_load_error() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("bad.schema.json"), "{not json").unwrap();
        assert!(matches!(
            SchemaValidator::new(dir.path()),
            Err(SchemaValidationError::SchemaLoadError { .. })
        ));
    }
}
