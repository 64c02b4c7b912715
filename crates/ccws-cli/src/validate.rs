//! # Validate Subcommand
//!
//! Validates a JSON or YAML document against one schema from the schema
//! directory. The schema is named by filename (`catalog.schema.json`) or by
//! its full `$id`.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Args;

use ccws_harness::{SchemaValidationError, SchemaValidator};

use crate::config::CliConfig;
use crate::{resolve_path, EXIT_FAILURE, EXIT_OK};

/// Arguments for the `ccws validate` subcommand.
#[derive(Args, Debug)]
pub struct ValidateArgs {
    /// Schema filename (e.g. `answers.schema.json`) or `$id`.
    #[arg(long, short = 's')]
    pub schema: String,

    /// Document to validate (`.json`, `.yaml` or `.yml`).
    #[arg(value_name = "DOCUMENT")]
    pub document: PathBuf,
}

/// Execute the validate subcommand.
///
/// Returns exit code: 0 on success, 1 on validation failure, 2 on operational error.
pub fn run_validate(args: &ValidateArgs, config: &CliConfig, repo_root: &Path) -> Result<u8> {
    let schema_dir = config.schema_dir(repo_root);
    let validator = SchemaValidator::new(&schema_dir)
        .with_context(|| format!("failed to load JSON schemas from {}", schema_dir.display()))?;

    tracing::info!(
        schema_count = validator.schema_count(),
        "loaded schema registry"
    );

    let filename = schema_filename(&validator, &args.schema)
        .with_context(|| format!("unknown schema {:?}", args.schema))?;
    let document = resolve_path(&args.document, repo_root);

    match validator.validate_file(&document, &filename) {
        Ok(()) => {
            println!("OK: {} conforms to {filename}", document.display());
            Ok(EXIT_OK)
        }
        Err(SchemaValidationError::ValidationFailed { details, .. }) => {
            println!("FAIL: {} ({} error(s))", document.display(), details.len());
            for detail in &details {
                println!("  {detail}");
            }
            Ok(EXIT_FAILURE)
        }
        Err(e) => Err(e).context("validation could not run"),
    }
}

/// Map a schema argument to the filename the registry knows it by.
fn schema_filename(validator: &SchemaValidator, schema: &str) -> Option<String> {
    if validator.schema_id_for(schema).is_some() {
        return Some(schema.to_string());
    }
    let filename = schema.rsplit('/').next()?;
    validator
        .schema_id_for(filename)
        .filter(|id| *id == schema)
        .map(|_| filename.to_string())
}
