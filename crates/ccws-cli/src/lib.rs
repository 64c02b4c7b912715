//! # ccws-cli: Command Line for the License Resolution Engine
//!
//! Provides the `ccws` command-line interface over a YAML license catalog.
//!
//! ## Subcommands
//!
//! - `ccws chooser`: resolve a chooser request into ordered licenses.
//! - `ccws licenses`: the unfiltered identifier set for a jurisdiction.
//! - `ccws questions`: question fields and their legal answers.
//! - `ccws permute`: every encoded answer combination for a class.
//! - `ccws validate`: validate a JSON/YAML document against a schema.
//! - `ccws lint`: structural checks over the catalog.
//! - `ccws sweep`: run the issuance sweep against the in-process issuer.
//!
//! ```bash
//! ccws chooser --jurisdiction nl --language nl --exclude by-nc
//! ccws permute --class standard --format query --locale en
//! ccws validate --schema catalog.schema.json data/catalog.yaml
//! ```

pub mod chooser;
pub mod config;
pub mod lint;
pub mod questions;
pub mod sweep;
pub mod validate;

use std::path::{Path, PathBuf};

use anyhow::Context;

use ccws_catalog::Catalog;

pub use config::{CliConfig, ConfigError};

/// Exit code: command succeeded.
pub const EXIT_OK: u8 = 0;
/// Exit code: validation failure, lint errors, or failed sweep.
pub const EXIT_FAILURE: u8 = 1;
/// Exit code: operational error (unreadable file, bad configuration, ...).
pub const EXIT_OPERATIONAL: u8 = 2;

/// Resolve a path that may be relative to the repository root.
///
/// Absolute paths are returned as-is. A relative path that exists under
/// `repo_root` resolves there; otherwise it stays relative to the current
/// directory.
pub fn resolve_path(path: &Path, repo_root: &Path) -> PathBuf {
    if path.is_absolute() {
        return path.to_path_buf();
    }
    let repo_relative = repo_root.join(path);
    if repo_relative.exists() {
        repo_relative
    } else {
        path.to_path_buf()
    }
}

/// Walk up from `start` to the first directory holding both `data/` and
/// `schemas/`.
pub fn find_repo_root(start: &Path) -> Option<PathBuf> {
    let mut dir = start;
    loop {
        if dir.join("data").is_dir() && dir.join("schemas").is_dir() {
            return Some(dir.to_path_buf());
        }
        dir = dir.parent()?;
    }
}

/// Load the catalog named by `config`.
pub fn open_catalog(config: &CliConfig, repo_root: &Path) -> anyhow::Result<Catalog> {
    let path = config.catalog_path(repo_root);
    let catalog = Catalog::load(&path)
        .with_context(|| format!("failed to load catalog {}", path.display()))?;
    tracing::debug!(
        path = %path.display(),
        revision = catalog.revision(),
        "catalog ready"
    );
    Ok(catalog)
}
