//! # Lint Subcommand
//!
//! Runs the structural catalog checks and, optionally, validates the
//! catalog file against `catalog.schema.json` first.

use std::path::Path;

use anyhow::{Context, Result};
use clap::Args;

use ccws_catalog::{validate_catalog, CatalogValidationResult};
use ccws_harness::{SchemaValidationError, SchemaValidator};

use crate::config::CliConfig;
use crate::{open_catalog, EXIT_FAILURE, EXIT_OK};

/// Schema the catalog file must conform to.
pub const CATALOG_SCHEMA: &str = "catalog.schema.json";

/// Arguments for the `ccws lint` subcommand.
#[derive(Args, Debug)]
pub struct LintArgs {
    /// Skip schema validation of the catalog file.
    #[arg(long)]
    pub no_schema: bool,

    /// Treat warnings as errors.
    #[arg(long)]
    pub strict: bool,
}

/// Execute the lint subcommand.
///
/// Returns exit code: 0 when clean, 1 on errors (or warnings with `--strict`).
pub fn run_lint(args: &LintArgs, config: &CliConfig, repo_root: &Path) -> Result<u8> {
    let mut failed = false;

    // 1. Schema conformance of the raw file.
    if !args.no_schema {
        let schema_dir = config.schema_dir(repo_root);
        let validator = SchemaValidator::new(&schema_dir)
            .with_context(|| format!("failed to load JSON schemas from {}", schema_dir.display()))?;
        let catalog_path = config.catalog_path(repo_root);
        match validator.validate_yaml_file(&catalog_path, CATALOG_SCHEMA) {
            Ok(()) => println!("Schema: {} conforms", catalog_path.display()),
            Err(SchemaValidationError::ValidationFailed { details, .. }) => {
                println!("Schema: {} FAILED", catalog_path.display());
                for detail in &details {
                    println!("  FAIL: {detail}");
                }
                // Structural checks assume a well-formed document.
                return Ok(EXIT_FAILURE);
            }
            Err(e) => return Err(e).context("schema validation could not run"),
        }
    }

    // 2. Structural checks over the loaded catalog.
    let catalog = open_catalog(config, repo_root)?;
    let result = validate_catalog(&catalog);
    print_result(&result);

    failed |= !result.is_valid;
    failed |= args.strict && !result.warnings.is_empty();

    Ok(if failed { EXIT_FAILURE } else { EXIT_OK })
}

fn print_result(result: &CatalogValidationResult) {
    println!(
        "Catalog: {} error(s), {} warning(s)",
        result.errors.len(),
        result.warnings.len()
    );
    for error in &result.errors {
        println!("  ERROR: {error}");
    }
    for warning in &result.warnings {
        println!("  WARN: {warning}");
    }
}
