//! Sitemap generation.
//!
//! Lists the site root plus every project hosted on the site's own domain.
//!
//! # Sitemap Format
//!
//! ```xml
//! <?xml version="1.0" encoding="UTF-8"?>
//! <urlset xmlns="http://www.sitemaps.org/schemas/sitemap/0.9">
//!   <url>
//!     <loc>https://example.github.io/portfolio/</loc>
//!     <lastmod>2025-01-01</lastmod>
//!     <changefreq>monthly</changefreq>
//!     <priority>1.0</priority>
//!   </url>
//! </urlset>
//! ```

use super::xml::{XmlElement, text_element};
use crate::{
    config::SiteConfig,
    debug,
    project::{ProjectList, ProjectRecord},
    utils::date::Clock,
};

const SITEMAP_NS: &str = "http://www.sitemaps.org/schemas/sitemap/0.9";

const ROOT_PRIORITY: f32 = 1.0;
const PROJECT_PRIORITY: f32 = 0.8;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeFreq {
    Monthly,
    Yearly,
}

impl ChangeFreq {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Monthly => "monthly",
            Self::Yearly => "yearly",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
struct UrlEntry {
    loc: String,
    lastmod: String,
    changefreq: ChangeFreq,
    priority: f32,
}

impl UrlEntry {
    fn into_element(self) -> XmlElement {
        XmlElement::new("url")
            .child(text_element("loc", self.loc))
            .child(text_element("lastmod", self.lastmod))
            .child(text_element("changefreq", self.changefreq.as_str()))
            .child(text_element("priority", format!("{:.1}", self.priority)))
    }
}

/// In-memory sitemap for one run.
#[derive(Debug, Clone)]
pub struct Sitemap {
    urls: Vec<UrlEntry>,
}

impl Sitemap {
    pub fn build(projects: &ProjectList, config: &SiteConfig, clock: &dyn Clock) -> Self {
        let domain = config.site.domain.as_str();

        let root = UrlEntry {
            loc: config.site.url.clone(),
            lastmod: clock.now().to_date(),
            changefreq: ChangeFreq::Monthly,
            priority: ROOT_PRIORITY,
        };

        let urls = std::iter::once(root)
            .chain(
                projects
                    .records()
                    .iter()
                    .filter_map(|project| project_entry(project, domain)),
            )
            .collect();

        Self { urls }
    }

    /// Number of `<url>` entries, site root included.
    pub fn len(&self) -> usize {
        self.urls.len()
    }

    pub fn into_element(self) -> XmlElement {
        self.urls.into_iter().fold(
            XmlElement::new("urlset").attr("xmlns", SITEMAP_NS),
            |urlset, entry| urlset.child(entry.into_element()),
        )
    }
}

fn project_entry(project: &ProjectRecord, domain: &str) -> Option<UrlEntry> {
    let Some(url) = project.url() else {
        debug!("sitemap"; "skip `{}`: no url", project.id);
        return None;
    };
    if !belongs_to_domain(url, domain) {
        debug!("sitemap"; "skip `{}`: {} is outside {}", project.id, url, domain);
        return None;
    }

    Some(UrlEntry {
        loc: url.to_string(),
        lastmod: project.date.clone(),
        changefreq: ChangeFreq::Yearly,
        priority: PROJECT_PRIORITY,
    })
}

/// Whether `url` is hosted on `domain` or one of its subdomains.
///
/// Strings that don't parse as absolute URLs fall back to a substring test.
pub fn belongs_to_domain(url: &str, domain: &str) -> bool {
    let domain = domain.trim().trim_start_matches('.').to_ascii_lowercase();
    if domain.is_empty() {
        return false;
    }

    match url::Url::parse(url) {
        Ok(parsed) => parsed.host_str().is_some_and(|host| {
            let host = host.to_ascii_lowercase();
            host == domain || host.ends_with(&format!(".{domain}"))
        }),
        Err(_) => url.to_ascii_lowercase().contains(&domain),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        generator::xml::render,
        utils::date::{DateTimeUtc, FixedClock},
    };

    const CLOCK: FixedClock = FixedClock(DateTimeUtc::new(2025, 1, 2, 8, 0, 0));

    fn make_config() -> SiteConfig {
        let mut config = SiteConfig::default();
        config.site.url = "https://someone.github.io/portfolio/".to_string();
        config.site.domain = "github.io".to_string();
        config
    }

    fn project(id: &str, url: Option<&str>, date: &str) -> ProjectRecord {
        ProjectRecord {
            id: id.to_string(),
            title: id.to_uppercase(),
            description: String::new(),
            summary: String::new(),
            url: url.map(str::to_string),
            date: date.to_string(),
            tech: Vec::new(),
        }
    }

    fn build_xml(projects: Vec<ProjectRecord>) -> String {
        let sitemap = Sitemap::build(&ProjectList::new(projects), &make_config(), &CLOCK);
        render(&sitemap.into_element(), false).unwrap()
    }

    #[test]
    fn test_sitemap_empty_has_only_root() {
        let xml = build_xml(vec![]);

        assert!(xml.contains(r#"<?xml version="1.0" encoding="UTF-8"?>"#));
        assert!(xml.contains(&format!(r#"<urlset xmlns="{SITEMAP_NS}">"#)));
        assert_eq!(xml.matches("<url>").count(), 1);
        assert!(xml.contains("<loc>https://someone.github.io/portfolio/</loc>"));
        assert!(xml.contains("<lastmod>2025-01-02</lastmod>"));
        assert!(xml.contains("<changefreq>monthly</changefreq>"));
        assert!(xml.contains("<priority>1.0</priority>"));
    }

    #[test]
    fn test_sitemap_project_entry() {
        let xml = build_xml(vec![project(
            "etl",
            Some("https://someone.github.io/etl/"),
            "2024-03-10",
        )]);

        assert_eq!(xml.matches("<url>").count(), 2);
        assert!(xml.contains("<loc>https://someone.github.io/etl/</loc>"));
        assert!(xml.contains("<lastmod>2024-03-10</lastmod>"));
        assert!(xml.contains("<changefreq>yearly</changefreq>"));
        assert!(xml.contains("<priority>0.8</priority>"));
    }

    #[test]
    fn test_sitemap_filters_absent_and_foreign_urls() {
        let projects = vec![
            project("a", Some("https://someone.github.io/a/"), "2024-01-01"),
            project("b", None, "2024-01-02"),
            project("c", Some("https://github.com/someone/c"), "2024-01-03"),
            project("d", Some("https://someone.github.io/d/"), "2024-01-04"),
            project("e", Some(""), "2024-01-05"),
        ];
        let sitemap = Sitemap::build(&ProjectList::new(projects), &make_config(), &CLOCK);
        assert_eq!(sitemap.len(), 3);

        let xml = render(&sitemap.into_element(), false).unwrap();
        assert_eq!(xml.matches("<loc>https://someone.github.io/a/</loc>").count(), 1);
        assert_eq!(xml.matches("<loc>https://someone.github.io/d/</loc>").count(), 1);
        assert!(!xml.contains("github.com/someone/c"));
    }

    #[test]
    fn test_sitemap_keeps_input_order() {
        let xml = build_xml(vec![
            project("late", Some("https://x.github.io/late/"), "2024-09-01"),
            project("early", Some("https://x.github.io/early/"), "2024-01-01"),
        ]);
        let late = xml.find("/late/").unwrap();
        let early = xml.find("/early/").unwrap();
        assert!(late < early);
    }

    #[test]
    fn test_sitemap_escapes_special_chars() {
        let xml = build_xml(vec![project(
            "q",
            Some("https://x.github.io/search?q=a&b=c"),
            "2024-01-01",
        )]);

        assert!(xml.contains("<loc>https://x.github.io/search?q=a&amp;b=c</loc>"));
    }

    #[test]
    fn test_sitemap_xml_structure() {
        let xml = build_xml(vec![]);

        let lines: Vec<&str> = xml.lines().collect();
        assert_eq!(lines[0], r#"<?xml version="1.0" encoding="UTF-8"?>"#);
        assert!(lines[1].starts_with("<urlset"));
        assert_eq!(lines.last().unwrap().trim(), "</urlset>");
    }

    #[test]
    fn test_belongs_to_domain() {
        assert!(belongs_to_domain("https://someone.github.io/x", "github.io"));
        assert!(belongs_to_domain("https://github.io/", "github.io"));
        assert!(belongs_to_domain("https://Someone.GitHub.io/x", "github.io"));
        assert!(belongs_to_domain("https://someone.github.io/x", ".github.io"));

        assert!(!belongs_to_domain("https://github.com/someone", "github.io"));
        assert!(!belongs_to_domain("https://notgithub.io/", "github.io"));
        assert!(!belongs_to_domain("https://example.com/?ref=github.io", "github.io"));
        assert!(!belongs_to_domain("https://someone.github.io/x", ""));
    }

    #[test]
    fn test_belongs_to_domain_relative_falls_back_to_substring() {
        assert!(belongs_to_domain("someone.github.io/x", "github.io"));
        assert!(!belongs_to_domain("/projects/x", "github.io"));
    }

    #[test]
    fn test_change_freq_as_str() {
        assert_eq!(ChangeFreq::Monthly.as_str(), "monthly");
        assert_eq!(ChangeFreq::Yearly.as_str(), "yearly");
    }
}
