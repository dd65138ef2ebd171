//! Project list loading.
//!
//! Reads the portfolio's `projects.json`:
//!
//! ```json
//! { "projects": [ { "id": "...", "title": "...", "description": "...",
//!                   "summary": "...", "url": "https://...", "date": "2024-06-15",
//!                   "tech": ["Rust", "SQLite"] } ] }
//! ```
//!
//! Loading is purely structural. Dates and id uniqueness are checked by the
//! generator, which owns the decision to abort a run.

use rustc_hash::FxHashSet;
use serde::Deserialize;
use std::{
    fs, io,
    path::{Path, PathBuf},
};
use thiserror::Error;

/// Errors raised while reading the project list.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to read project list `{0}`")]
    Read(PathBuf, #[source] io::Error),

    #[error("invalid project list `{0}`")]
    Parse(PathBuf, #[source] serde_json::Error),
}

/// One portfolio project.
#[derive(Debug, Clone, Deserialize)]
pub struct ProjectRecord {
    pub id: String,
    pub title: String,
    pub description: String,
    /// Short blurb for social posts; not part of feed or sitemap.
    #[serde(default)]
    pub summary: String,
    #[serde(default)]
    pub url: Option<String>,
    /// `YYYY-MM-DD`
    pub date: String,
    pub tech: Vec<String>,
}

impl ProjectRecord {
    /// Project URL, treating an empty string like an absent one.
    pub fn url(&self) -> Option<&str> {
        self.url.as_deref().map(str::trim).filter(|url| !url.is_empty())
    }
}

/// Project records in document order.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProjectList {
    projects: Vec<ProjectRecord>,
}

impl ProjectList {
    pub fn new(projects: Vec<ProjectRecord>) -> Self {
        Self { projects }
    }

    /// Parse a project list from JSON text. `path` is only used for errors.
    pub fn from_json(content: &str, path: &Path) -> Result<Self, LoadError> {
        serde_json::from_str(content).map_err(|err| LoadError::Parse(path.to_path_buf(), err))
    }

    pub fn records(&self) -> &[ProjectRecord] {
        &self.projects
    }

    pub fn len(&self) -> usize {
        self.projects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.projects.is_empty()
    }

    /// First id that appears more than once, in document order.
    pub fn find_duplicate_id(&self) -> Option<&str> {
        let mut seen = FxHashSet::default();
        self.projects
            .iter()
            .map(|project| project.id.as_str())
            .find(|id| !seen.insert(*id))
    }
}

/// Load the project list at `path`.
pub fn load_projects(path: &Path) -> Result<ProjectList, LoadError> {
    let content =
        fs::read_to_string(path).map_err(|err| LoadError::Read(path.to_path_buf(), err))?;
    ProjectList::from_json(&content, path)
}
