//! CLI configuration.
//!
//! Loaded from an optional YAML file (`--config`), then overridden by
//! environment variables:
//!
//! - `CCWS_CATALOG` (default: `data/catalog.yaml`)
//! - `CCWS_SCHEMA_DIR` (default: `schemas`)
//! - `CCWS_DEFAULT_LOCALE` (default: the catalog's own default locale)
//!
//! Relative paths resolve against the repository root.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use ccws_core::LocaleId;

use crate::resolve_path;

/// Environment variable overriding [`CliConfig::catalog_path`].
pub const ENV_CATALOG: &str = "CCWS_CATALOG";
/// Environment variable overriding [`CliConfig::schema_dir`].
pub const ENV_SCHEMA_DIR: &str = "CCWS_SCHEMA_DIR";
/// Environment variable overriding [`CliConfig::default_locale`].
pub const ENV_DEFAULT_LOCALE: &str = "CCWS_DEFAULT_LOCALE";

/// Settings shared by every subcommand.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CliConfig {
    /// The catalog YAML file.
    pub catalog_path: PathBuf,
    /// Directory of `*.schema.json` files.
    pub schema_dir: PathBuf,
    /// Fallback locale replacing the catalog default.
    pub default_locale: Option<String>,
}

impl Default for CliConfig {
    fn default() -> Self {
        Self {
            catalog_path: PathBuf::from("data/catalog.yaml"),
            schema_dir: PathBuf::from("schemas"),
            default_locale: None,
        }
    }
}

impl CliConfig {
    /// Load the file at `path` (or start from defaults) and apply the
    /// process environment.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        config.apply_env(|var| std::env::var(var).ok())?;
        Ok(config)
    }

    /// Parse a YAML configuration file. Missing keys take their defaults.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;
        // An empty file is a valid, all-default configuration.
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(&content).map_err(|e| ConfigError::Parse {
            path: path.to_path_buf(),
            source: e,
        })
    }

    /// Apply overrides from `lookup`. Unset and blank variables are ignored.
    pub fn apply_env<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |var: &str| lookup(var).filter(|v| !v.trim().is_empty());

        if let Some(catalog) = get(ENV_CATALOG) {
            self.catalog_path = PathBuf::from(catalog);
        }
        if let Some(dir) = get(ENV_SCHEMA_DIR) {
            self.schema_dir = PathBuf::from(dir);
        }
        if let Some(locale) = get(ENV_DEFAULT_LOCALE) {
            self.default_locale = Some(locale);
        }
        self.fallback_locale().map(|_| ())
    }

    /// The configured fallback locale, validated.
    pub fn fallback_locale(&self) -> Result<Option<LocaleId>, ConfigError> {
        self.default_locale
            .as_deref()
            .map(|raw| {
                LocaleId::new(raw.trim()).map_err(|_| ConfigError::InvalidLocale(raw.to_string()))
            })
            .transpose()
    }

    /// Catalog path resolved against `repo_root`.
    pub fn catalog_path(&self, repo_root: &Path) -> PathBuf {
        resolve_path(&self.catalog_path, repo_root)
    }

    /// Schema directory resolved against `repo_root`.
    pub fn schema_dir(&self, repo_root: &Path) -> PathBuf {
        resolve_path(&self.schema_dir, repo_root)
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config {}: {source}", path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to parse config {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        source: serde_yaml::Error,
    },
    #[error("invalid default locale: \"{0}\"")]
    InvalidLocale(String),
}
