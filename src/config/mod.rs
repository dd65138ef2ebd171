//! Generator configuration (`folio.toml`).
//!
//! # Sections
//!
//! | Section   | Purpose                                          |
//! |-----------|--------------------------------------------------|
//! | `[site]`  | Channel metadata, site URL, sitemap domain       |
//! | `[build]` | Project list location, output files, minify      |
//!
//! Every field has a default, so a missing config file is not an error:
//! the generator then runs with defaults rooted at the current directory.

mod build;
mod error;
mod site;
mod util;

pub use build::BuildConfig;
pub use error::{ConfigDiagnostics, ConfigError};
pub use site::SiteInfoConfig;

use crate::{cli::Cli, debug, log};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
};
use util::find_config_file;

/// Default config file name, searched upward from the current directory.
pub const CONFIG_FILE: &str = "folio.toml";

// ============================================================================
// root configuration
// ============================================================================

/// Root configuration structure representing folio.toml
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SiteConfig {
    /// Absolute path to the config file, if one was found (internal use only)
    #[serde(skip)]
    pub config_path: Option<PathBuf>,

    /// Site root: parent of the config file, or cwd without one (internal use only)
    #[serde(skip)]
    pub root: PathBuf,

    #[serde(default)]
    pub site: SiteInfoConfig,

    #[serde(default)]
    pub build: BuildConfig,
}

impl SiteConfig {
    /// Load configuration for a run, searching from the current directory.
    pub fn load(cli: &Cli) -> Result<Self> {
        let cwd = std::env::current_dir().context("Failed to get current working directory")?;
        Self::load_from(cwd, cli)
    }

    /// Load configuration, searching upward from `cwd` for the config file.
    ///
    /// An explicitly requested file that cannot be found is an error; the
    /// default one is optional.
    fn load_from(cwd: PathBuf, cli: &Cli) -> Result<Self> {
        let name = cli.config.as_deref().unwrap_or(Path::new(CONFIG_FILE));

        let mut config = match find_config_file(&cwd, name) {
            Some(path) => {
                debug!("config"; "using {}", path.display());
                let mut config = Self::from_path(&path)?;
                config.root = path.parent().map_or_else(|| cwd.clone(), Path::to_path_buf);
                config.config_path = Some(path);
                config
            }
            None if cli.config.is_some() => {
                return Err(ConfigError::Io(
                    name.to_path_buf(),
                    std::io::Error::from(std::io::ErrorKind::NotFound),
                )
                .into());
            }
            None => {
                debug!("config"; "{} not found, using defaults", CONFIG_FILE);
                Self {
                    root: cwd,
                    ..Self::default()
                }
            }
        };

        config.apply_cli(cli);
        config.validate()?;
        Ok(config)
    }

    /// Parse configuration from TOML string
    #[cfg(test)]
    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        let (config, ignored) = Self::parse_with_ignored(content)?;
        if !ignored.is_empty() {
            Self::print_unknown_fields_warning(&ignored, Path::new(CONFIG_FILE));
        }
        Ok(config)
    }

    /// Load configuration from file path with unknown field detection.
    fn from_path(path: &Path) -> Result<Self, ConfigError> {
        let content =
            fs::read_to_string(path).map_err(|err| ConfigError::Io(path.to_path_buf(), err))?;

        let (config, ignored) = Self::parse_with_ignored(&content)?;
        if !ignored.is_empty() {
            Self::print_unknown_fields_warning(&ignored, path);
        }
        Ok(config)
    }

    /// Parse TOML content, collecting any unknown fields.
    fn parse_with_ignored(content: &str) -> Result<(Self, Vec<String>), ConfigError> {
        let mut ignored = Vec::new();
        let deserializer = toml::Deserializer::new(content);
        let config = serde_ignored::deserialize(deserializer, |path: serde_ignored::Path| {
            ignored.push(path.to_string());
        })?;
        Ok((config, ignored))
    }

    fn print_unknown_fields_warning(fields: &[String], path: &Path) {
        let display_path = path
            .file_name()
            .map(|n| n.to_string_lossy())
            .unwrap_or_else(|| path.to_string_lossy());
        log!("warning"; "unknown fields in {}, ignoring: {}", display_path, fields.join(", "));
    }

    /// Apply CLI overrides.
    fn apply_cli(&mut self, cli: &Cli) {
        if let Some(minify) = cli.minify {
            self.build.minify = minify;
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let mut diag = ConfigDiagnostics::new();
        self.site.validate(&mut diag);
        self.build.validate(&mut diag);
        diag.into_result()
    }

    // ========================================================================
    // paths
    // ========================================================================

    /// Join a path with the root directory.
    pub fn root_join(&self, path: impl AsRef<Path>) -> PathBuf {
        self.root.join(path)
    }

    pub fn projects_path(&self) -> PathBuf {
        self.root_join(&self.build.projects)
    }

    pub fn output_dir(&self) -> PathBuf {
        self.root_join(&self.build.output)
    }

    pub fn feed_path(&self) -> PathBuf {
        self.output_dir().join(&self.build.feed)
    }

    pub fn sitemap_path(&self) -> PathBuf {
        self.output_dir().join(&self.build.sitemap)
    }

    /// Published URL of the feed, for the `atom:link rel="self"` element.
    pub fn feed_url(&self) -> String {
        if let Some(url) = &self.site.feed_url {
            return url.clone();
        }

        let base = format!("{}/", self.site.url.trim_end_matches('/'));
        let feed = self.build.feed.to_string_lossy().replace('\\', "/");
        url::Url::parse(&base)
            .and_then(|base| base.join(&feed))
            .map(String::from)
            .unwrap_or_else(|_| format!("{base}{feed}"))
    }
}
