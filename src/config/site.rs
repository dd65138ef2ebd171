//! `[site]` configuration.
//!
//! Channel metadata for the feed and the public location of the site.

use super::{ConfigDiagnostics, util::is_http_url};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteInfoConfig {
    /// Feed channel title.
    pub title: String,

    /// Site root URL (e.g., "https://example.github.io/portfolio/").
    pub url: String,

    /// Feed channel description.
    pub description: String,

    /// Language code (e.g., "en-us").
    pub language: String,

    /// Host the sitemap accepts project URLs from; subdomains match too.
    pub domain: String,

    /// Published feed URL. Defaults to `url` joined with `build.feed`.
    pub feed_url: Option<String>,

    /// Feed `<generator>` value.
    pub generator: String,
}

impl Default for SiteInfoConfig {
    fn default() -> Self {
        Self {
            title: "Bibhudendu Behera - Project Updates".into(),
            url: "https://bibhu342.github.io/bibhu-portfolio/".into(),
            description: "Latest projects and updates from Bibhudendu Behera - \
                          Data Automation & Python Engineer"
                .into(),
            language: "en-us".into(),
            domain: "github.io".into(),
            feed_url: None,
            generator: "folio".into(),
        }
    }
}

impl SiteInfoConfig {
    /// Validate site configuration.
    ///
    /// # Checks
    /// - `url` must be an absolute http(s) URL with a host
    /// - `feed_url`, when set, likewise
    /// - `domain` must be a bare, non-empty host (no scheme, port or path)
    pub fn validate(&self, diag: &mut ConfigDiagnostics) {
        if !is_http_url(&self.url) {
            diag.error_with_hint(
                "site.url",
                format!("invalid site URL `{}`", self.url),
                "use format like https://example.github.io/portfolio/",
            );
        }

        if let Some(feed_url) = &self.feed_url
            && !is_http_url(feed_url)
        {
            diag.error_with_hint(
                "site.feed_url",
                format!("invalid feed URL `{feed_url}`"),
                "use format like https://example.github.io/portfolio/feed.xml",
            );
        }

        let domain = self.domain.trim();
        if domain.trim_start_matches('.').is_empty() {
            diag.error_with_hint(
                "site.domain",
                "domain is empty, every project would be left out of the sitemap",
                "set the host the site is served from, e.g.: \"github.io\"",
            );
        } else if domain.contains(['/', ':']) {
            diag.error_with_hint(
                "site.domain",
                format!("domain `{domain}` is not a bare host, no project URL would match it"),
                "drop the scheme, port and path, e.g.: \"bibhu342.github.io\"",
            );
        }
    }
}
