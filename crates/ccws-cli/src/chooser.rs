//! # Chooser and Licenses Subcommands
//!
//! `ccws chooser` runs the full resolution pipeline for one request and
//! prints `uri<TAB>name` lines (or a JSON array with `--json`).
//! `ccws licenses` prints the unfiltered identifier set the catalog query
//! produces for a jurisdiction, before exclusion and sorting.

use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result};
use clap::Args;

use ccws_catalog::{query, ChooserRequest, Exclusions, LicenseChooser};
use ccws_core::{JurisdictionId, LicenseDetail};

use crate::config::CliConfig;
use crate::{open_catalog, EXIT_FAILURE, EXIT_OK};

/// Arguments for the `ccws chooser` subcommand.
#[derive(Args, Debug)]
pub struct ChooserArgs {
    /// Target jurisdiction; `-` for jurisdiction-agnostic licenses.
    #[arg(long, short = 'j', default_value = "-")]
    pub jurisdiction: String,

    /// Preferred language.
    #[arg(long)]
    pub language: Option<String>,

    /// Legacy locale parameter, used only without --language.
    #[arg(long)]
    pub locale: Option<String>,

    /// Drop licenses whose identifier contains this substring. Repeatable.
    #[arg(long, short = 'x')]
    pub exclude: Vec<String>,

    /// Explicit license version instead of the latest.
    #[arg(long)]
    pub version: Option<String>,

    /// Print a JSON array instead of tab-separated lines.
    #[arg(long)]
    pub json: bool,
}

impl ChooserArgs {
    /// The chooser request these arguments describe.
    pub fn to_request(&self) -> Result<ChooserRequest> {
        let jurisdiction = JurisdictionId::new(self.jurisdiction.as_str())
            .context("invalid --jurisdiction")?;
        Ok(ChooserRequest {
            jurisdiction,
            language: self.language.clone(),
            locale: self.locale.clone(),
            exclude: Exclusions::from(self.exclude.clone()),
            version: self.version.clone(),
        })
    }
}

/// Arguments for the `ccws licenses` subcommand.
#[derive(Args, Debug)]
pub struct LicensesArgs {
    /// Target jurisdiction.
    #[arg(long, short = 'j', default_value = "-")]
    pub jurisdiction: String,

    /// Explicit license version instead of the latest.
    #[arg(long)]
    pub version: Option<String>,
}

/// Execute the chooser subcommand.
///
/// Returns exit code: 0 on success, 1 when the request cannot be resolved.
pub fn run_chooser(args: &ChooserArgs, config: &CliConfig, repo_root: &Path) -> Result<u8> {
    let catalog = open_catalog(config, repo_root)?;
    let mut chooser = LicenseChooser::new(&catalog);
    if let Some(fallback) = config.fallback_locale()? {
        chooser = chooser.with_fallback_locale(&catalog, fallback);
    }

    let request = args.to_request()?;
    let details = match chooser.choose(&request) {
        Ok(details) => details,
        Err(e) => {
            eprintln!("error: {e}");
            return Ok(EXIT_FAILURE);
        }
    };

    let stdout = std::io::stdout();
    write_details(&mut stdout.lock(), &details, args.json)?;
    Ok(EXIT_OK)
}

/// Execute the licenses subcommand.
pub fn run_licenses(args: &LicensesArgs, config: &CliConfig, repo_root: &Path) -> Result<u8> {
    let catalog = open_catalog(config, repo_root)?;
    let jurisdiction =
        JurisdictionId::new(args.jurisdiction.as_str()).context("invalid --jurisdiction")?;

    match query::licenses_for(&catalog, &jurisdiction, args.version.as_deref()) {
        Ok(uris) => {
            for uri in uris {
                println!("{uri}");
            }
            Ok(EXIT_OK)
        }
        Err(e) => {
            eprintln!("error: {e}");
            Ok(EXIT_FAILURE)
        }
    }
}

fn write_details(out: &mut impl Write, details: &[LicenseDetail], json: bool) -> Result<()> {
    if json {
        serde_json::to_writer_pretty(&mut *out, details).context("failed to encode JSON")?;
        writeln!(out)?;
    } else {
        for detail in details {
            writeln!(out, "{}\t{}", detail.uri, detail.name)?;
        }
    }
    Ok(())
}
