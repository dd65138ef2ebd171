//! Feed and sitemap generation.
//!
//! A run is a single batch over the project list:
//!
//! ```text
//! load → validate → build feed → build sitemap → render → write feed → write sitemap
//! ```
//!
//! Both documents are built and rendered in memory before anything touches
//! the disk, so a bad record leaves the previous outputs in place.
//!
//! - **Feed**: RSS 2.0, newest projects first (`feed.xml`)
//! - **Sitemap**: site root plus on-domain project pages (`sitemap.xml`)

pub mod feed;
pub mod sitemap;
pub mod xml;

use crate::{
    config::SiteConfig,
    debug, log,
    project::{LoadError, load_projects},
    utils::{date::Clock, plural::plural_count},
};
use feed::RssFeed;
use sitemap::Sitemap;
use std::{io, path::PathBuf};
use thiserror::Error;

/// Errors that abort a generator run.
#[derive(Debug, Error)]
pub enum GenerateError {
    #[error(transparent)]
    Load(#[from] LoadError),

    #[error("duplicate project id `{id}`")]
    DuplicateId { id: String },

    #[error("project `{id}` has invalid date `{date}`, expected YYYY-MM-DD")]
    DateFormat { id: String, date: String },

    #[error("feed failed validation: {0}")]
    InvalidFeed(String),

    #[error("failed to render {document}")]
    Render {
        document: &'static str,
        #[source]
        source: io::Error,
    },

    #[error("failed to write `{path}`")]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// What a successful run produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Report {
    pub feed_path: PathBuf,
    pub sitemap_path: PathBuf,
    /// Records in the project list.
    pub projects: usize,
    /// `<item>` elements in the feed.
    pub items: usize,
    /// `<url>` elements in the sitemap, site root included.
    pub urls: usize,
    /// Whether files were actually written.
    pub written: bool,
}

/// Run the generator once.
///
/// With `dry_run`, everything is built and rendered but nothing is written.
pub fn generate(
    config: &SiteConfig,
    clock: &dyn Clock,
    dry_run: bool,
) -> Result<Report, GenerateError> {
    let projects_path = config.projects_path();
    debug!("load"; "{}", projects_path.display());
    let projects = load_projects(&projects_path)?;
    if projects.is_empty() {
        debug!("load"; "project list is empty, writing channel and site root only");
    }

    if let Some(id) = projects.find_duplicate_id() {
        return Err(GenerateError::DuplicateId { id: id.to_string() });
    }

    let feed = RssFeed::build(&projects, config, clock)?;
    let sitemap = Sitemap::build(&projects, config, clock);
    let (items, urls) = (feed.items(), sitemap.len());

    let minify = config.build.minify;
    let feed_xml = rendered("feed", feed.render(minify))?;
    let sitemap_xml = rendered("sitemap", xml::render(&sitemap.into_element(), minify))?;

    let report = Report {
        feed_path: config.feed_path(),
        sitemap_path: config.sitemap_path(),
        projects: projects.len(),
        items,
        urls,
        written: !dry_run,
    };

    if dry_run {
        log!("dry-run"; "would write {} ({})", report.feed_path.display(), plural_count(items, "item"));
        log!("dry-run"; "would write {} ({})", report.sitemap_path.display(), plural_count(urls, "url"));
        return Ok(report);
    }

    write_document(&report.feed_path, &feed_xml)?;
    log!("feed"; "{} ({})", report.feed_path.display(), plural_count(items, "item"));

    write_document(&report.sitemap_path, &sitemap_xml)?;
    log!("sitemap"; "{} ({})", report.sitemap_path.display(), plural_count(urls, "url"));

    Ok(report)
}

fn rendered(document: &'static str, result: io::Result<String>) -> Result<String, GenerateError> {
    result.map_err(|source| GenerateError::Render { document, source })
}

fn write_document(path: &std::path::Path, content: &str) -> Result<(), GenerateError> {
    xml::write_xml(path, content).map_err(|source| GenerateError::Write {
        path: path.to_path_buf(),
        source,
    })
}
