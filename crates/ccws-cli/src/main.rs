//! # ccws CLI entry point
//!
//! Parses command-line arguments, loads configuration, and dispatches to
//! subcommand handlers.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use ccws_cli::chooser::{run_chooser, run_licenses, ChooserArgs, LicensesArgs};
use ccws_cli::lint::{run_lint, LintArgs};
use ccws_cli::questions::{run_permute, run_questions, PermuteArgs, QuestionsArgs};
use ccws_cli::sweep::{run_sweep, SweepArgs};
use ccws_cli::validate::{run_validate, ValidateArgs};
use ccws_cli::{find_repo_root, resolve_path, CliConfig, EXIT_OPERATIONAL};

/// License chooser and issuance harness.
///
/// Resolves the ordered set of licenses offered for a jurisdiction, language,
/// exclusion list and version, and exhaustively validates license issuance
/// against the JSON Schemas under `schemas/`.
#[derive(Parser, Debug)]
#[command(name = "ccws", version, about, long_about = None)]
struct Cli {
    /// Enable verbose output. Repeat for more verbosity (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Path to configuration file.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Resolve the ordered licenses offered for a request.
    Chooser(ChooserArgs),

    /// List the unfiltered license identifiers for a jurisdiction.
    Licenses(LicensesArgs),

    /// List question fields and their legal answers.
    Questions(QuestionsArgs),

    /// Enumerate every encoded answer combination for a class.
    Permute(PermuteArgs),

    /// Validate a JSON or YAML document against a schema.
    Validate(ValidateArgs),

    /// Check the catalog for structural problems.
    Lint(LintArgs),

    /// Sweep the in-process issuer over every combination and locale.
    Sweep(SweepArgs),
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    // Initialize tracing based on verbosity level.
    let filter = match cli.verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    tracing::debug!("ccws CLI starting");

    let cwd = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
    let repo_root = find_repo_root(&cwd).unwrap_or_else(|| {
        tracing::warn!("Could not locate repository root; using current directory");
        cwd.clone()
    });

    tracing::debug!(repo_root = %repo_root.display(), "resolved repository root");

    let config_path = cli.config.as_deref().map(|p| resolve_path(p, &repo_root));
    let config = match CliConfig::load(config_path.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("{e}");
            return ExitCode::from(EXIT_OPERATIONAL);
        }
    };

    tracing::debug!(?config, "loaded configuration");

    let result = match cli.command {
        Commands::Chooser(args) => run_chooser(&args, &config, &repo_root),
        Commands::Licenses(args) => run_licenses(&args, &config, &repo_root),
        Commands::Questions(args) => run_questions(&args, &config, &repo_root),
        Commands::Permute(args) => run_permute(&args, &config, &repo_root),
        Commands::Validate(args) => run_validate(&args, &config, &repo_root),
        Commands::Lint(args) => run_lint(&args, &config, &repo_root),
        Commands::Sweep(args) => run_sweep(&args, &config, &repo_root),
    };

    match result {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            tracing::error!("{e:#}");
            ExitCode::from(EXIT_OPERATIONAL)
        }
    }
}
