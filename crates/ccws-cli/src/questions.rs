//! # Questions and Permute Subcommands
//!
//! `ccws questions` lists a class's question fields with their legal
//! answers. `ccws permute` enumerates every answer combination and prints
//! each one in the requested encoding, once per locale.

use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result};
use clap::{Args, ValueEnum};

use ccws_catalog::{LocaleTable, QuestionField, QuestionSource};
use ccws_core::{LicenseClass, LocaleId};
use ccws_harness::{answers_document, combination_count, permute, query_string};

use crate::config::CliConfig;
use crate::{open_catalog, EXIT_FAILURE, EXIT_OK};

/// Arguments for the `ccws questions` subcommand.
#[derive(Args, Debug)]
pub struct QuestionsArgs {
    /// License class; every class when omitted.
    #[arg(long, short = 'c')]
    pub class: Option<String>,
}

/// How `ccws permute` prints each combination.
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PermuteFormat {
    /// One compact answers document per line.
    #[default]
    Json,
    /// One `field=value&...&locale=id` query string per line.
    Query,
}

/// Arguments for the `ccws permute` subcommand.
#[derive(Args, Debug)]
pub struct PermuteArgs {
    /// License class to enumerate.
    #[arg(long, short = 'c', default_value = "standard")]
    pub class: String,

    /// Output encoding.
    #[arg(long, value_enum, default_value_t = PermuteFormat::Json)]
    pub format: PermuteFormat,

    /// Locales to emit. Repeatable; every catalog locale when omitted.
    #[arg(long, short = 'l')]
    pub locale: Vec<String>,

    /// Print only the number of combinations.
    #[arg(long)]
    pub count: bool,
}

/// Execute the questions subcommand.
pub fn run_questions(args: &QuestionsArgs, config: &CliConfig, repo_root: &Path) -> Result<u8> {
    let catalog = open_catalog(config, repo_root)?;
    let classes = match &args.class {
        Some(class) => vec![LicenseClass::new(class.as_str()).context("invalid --class")?],
        None => catalog.license_classes(),
    };

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    for class in &classes {
        let fields = match catalog.fields_for(class) {
            Ok(fields) => fields,
            Err(e) => {
                eprintln!("error: {e}");
                return Ok(EXIT_FAILURE);
            }
        };
        write_fields(&mut out, class, &fields)?;
    }
    Ok(EXIT_OK)
}

/// Execute the permute subcommand.
pub fn run_permute(args: &PermuteArgs, config: &CliConfig, repo_root: &Path) -> Result<u8> {
    let catalog = open_catalog(config, repo_root)?;
    let class = LicenseClass::new(args.class.as_str()).context("invalid --class")?;
    let fields = match catalog.fields_for(&class) {
        Ok(fields) => fields,
        Err(e) => {
            eprintln!("error: {e}");
            return Ok(EXIT_FAILURE);
        }
    };

    if args.count {
        match combination_count(&fields) {
            Some(n) => println!("{n}"),
            None => println!("overflow"),
        }
        return Ok(EXIT_OK);
    }

    let locales: Vec<LocaleId> = if args.locale.is_empty() {
        catalog.supported_locales().into_iter().collect()
    } else {
        args.locale
            .iter()
            .map(|l| LocaleId::new(l.as_str()).with_context(|| format!("invalid --locale {l:?}")))
            .collect::<Result<_>>()?
    };

    tracing::info!(
        class = %class,
        fields = fields.len(),
        locales = locales.len(),
        "enumerating answer combinations"
    );

    let stdout = std::io::stdout();
    write_permutations(&mut stdout.lock(), &class, &fields, &locales, args.format)?;
    Ok(EXIT_OK)
}

fn write_fields(out: &mut impl Write, class: &LicenseClass, fields: &[QuestionField]) -> Result<()> {
    writeln!(out, "{class}")?;
    for field in fields {
        writeln!(out, "  {}: {}", field.id, field.answers.join(", "))?;
    }
    Ok(())
}

fn write_permutations(
    out: &mut impl Write,
    class: &LicenseClass,
    fields: &[QuestionField],
    locales: &[LocaleId],
    format: PermuteFormat,
) -> Result<()> {
    for combination in permute(fields) {
        for locale in locales {
            match format {
                PermuteFormat::Json => {
                    let document = answers_document(class, &combination, locale);
                    serde_json::to_writer(&mut *out, &document)
                        .context("failed to encode answers document")?;
                    writeln!(out)?;
                }
                PermuteFormat::Query => writeln!(out, "{}", query_string(&combination, locale))?,
            }
        }
    }
    Ok(())
}
