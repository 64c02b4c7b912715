//! # Sweep Subcommand
//!
//! Runs the issuance sweep against the in-process [`CatalogIssuer`]: every
//! class × answer combination × locale through both encodings, plus the
//! rejection probes (empty answers, unknown class). Exercises the catalog
//! and the schemas together without a network endpoint.

use std::path::Path;

use anyhow::{Context, Result};
use clap::Args;

use ccws_core::LicenseClass;
use ccws_harness::{CatalogIssuer, SchemaValidator, Sweep, SweepMode, SweepReport};

use crate::config::CliConfig;
use crate::{open_catalog, EXIT_FAILURE, EXIT_OK};

/// Arguments for the `ccws sweep` subcommand.
#[derive(Args, Debug)]
pub struct SweepArgs {
    /// Restrict the sweep to these classes. Repeatable.
    #[arg(long, short = 'c')]
    pub class: Vec<String>,

    /// Skip these locales. Repeatable.
    #[arg(long = "skip-locale")]
    pub skip_locale: Vec<String>,

    /// Extra `key=value` parameter appended to every query string. Repeatable.
    #[arg(long = "extra", value_parser = parse_key_value)]
    pub extra: Vec<(String, String)>,

    /// Stop at the first failure.
    #[arg(long)]
    pub fail_fast: bool,

    /// Skip the rejection probes.
    #[arg(long)]
    pub no_probes: bool,

    /// Print the report as JSON.
    #[arg(long)]
    pub json: bool,
}

/// Execute the sweep subcommand.
///
/// Returns exit code: 0 when every request passed, 1 otherwise.
pub fn run_sweep(args: &SweepArgs, config: &CliConfig, repo_root: &Path) -> Result<u8> {
    let catalog = open_catalog(config, repo_root)?;
    let schema_dir = config.schema_dir(repo_root);
    let validator = SchemaValidator::new(&schema_dir)
        .with_context(|| format!("failed to load JSON schemas from {}", schema_dir.display()))?;

    let mode = if args.fail_fast {
        SweepMode::FailFast
    } else {
        SweepMode::AccumulateAndReport
    };
    let mut sweep = Sweep::new(&catalog, &catalog, &validator)
        .with_mode(mode)
        .exclude_locales(args.skip_locale.iter().cloned());
    for (key, value) in &args.extra {
        sweep = sweep.with_extra_param(key.as_str(), value.as_str());
    }
    if !args.class.is_empty() {
        let classes = args
            .class
            .iter()
            .map(|c| LicenseClass::new(c.as_str()).with_context(|| format!("invalid --class {c:?}")))
            .collect::<Result<Vec<_>>>()?;
        sweep = sweep.only_classes(classes);
    }

    let issuer = CatalogIssuer::new(&catalog);
    let mut report = sweep.run(&issuer).context("sweep could not run")?;
    if !args.no_probes && (report.is_success() || mode == SweepMode::AccumulateAndReport) {
        report.merge(
            sweep
                .probe_rejections(&issuer)
                .context("rejection probes could not run")?,
        );
    }

    print_report(&report, args.json)?;
    Ok(if report.is_success() { EXIT_OK } else { EXIT_FAILURE })
}

fn print_report(report: &SweepReport, json: bool) -> Result<()> {
    if json {
        println!(
            "{}",
            serde_json::to_string_pretty(report).context("failed to encode report")?
        );
        return Ok(());
    }
    println!("Sweep: {}/{} passed", report.passed, report.total);
    for failure in &report.failures {
        println!("  FAIL: {failure}");
    }
    if !report.is_success() {
        println!(
            "\n{} request(s) failed out of {} total.",
            report.failed(),
            report.total
        );
    }
    Ok(())
}

fn parse_key_value(raw: &str) -> Result<(String, String), String> {
    match raw.split_once('=') {
        Some((key, value)) if !key.is_empty() => Ok((key.to_string(), value.to_string())),
        _ => Err(format!("expected KEY=VALUE, got {raw:?}")),
    }
}
