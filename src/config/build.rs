//! `[build]` configuration.
//!
//! Input and output locations. Relative paths resolve against the site root.

use super::ConfigDiagnostics;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BuildConfig {
    /// Project list (JSON).
    pub projects: PathBuf,

    /// Directory receiving `feed` and `sitemap`.
    pub output: PathBuf,

    /// Feed file name, relative to `output`.
    pub feed: PathBuf,

    /// Sitemap file name, relative to `output`.
    pub sitemap: PathBuf,

    /// Write XML on a single line.
    pub minify: bool,
}

impl Default for BuildConfig {
    fn default() -> Self {
        Self {
            projects: "data/projects.json".into(),
            output: ".".into(),
            feed: "feed.xml".into(),
            sitemap: "sitemap.xml".into(),
            minify: false,
        }
    }
}

impl BuildConfig {
    pub fn validate(&self, diag: &mut ConfigDiagnostics) {
        if self.feed.as_os_str().is_empty() {
            diag.error("build.feed", "feed file name is empty");
        }
        if self.sitemap.as_os_str().is_empty() {
            diag.error("build.sitemap", "sitemap file name is empty");
        }
        if !self.feed.as_os_str().is_empty() && self.feed == self.sitemap {
            diag.error_with_hint(
                "build.sitemap",
                format!("feed and sitemap both write to `{}`", self.feed.display()),
                "give them different file names",
            );
        }
    }
}
