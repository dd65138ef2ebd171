//! RSS 2.0 feed generation.
//!
//! Advertises the most recent projects, newest first.

use super::{GenerateError, xml::with_declaration};
use crate::{
    config::SiteConfig,
    project::{ProjectList, ProjectRecord},
    utils::date::{Clock, DateTimeUtc},
};
use rss::{
    CategoryBuilder, Channel, ChannelBuilder, GuidBuilder, Item, ItemBuilder,
    extension::atom::{AtomExtension, Link},
    validation::Validate,
};
use std::{collections::BTreeMap, io};

/// Maximum number of `<item>` elements.
pub const FEED_LIMIT: usize = 10;

const ATOM_NS: &str = "http://www.w3.org/2005/Atom";
const GUID_PREFIX: &str = "project-";
const FEED_MIME: &str = "application/rss+xml";

/// In-memory RSS document for one run.
#[derive(Debug, Clone)]
pub struct RssFeed {
    channel: Channel,
}

impl RssFeed {
    /// Build the feed from the full project list.
    ///
    /// Fails on the first project whose date does not parse.
    pub fn build(
        projects: &ProjectList,
        config: &SiteConfig,
        clock: &dyn Clock,
    ) -> Result<Self, GenerateError> {
        let site = &config.site;
        let items: Vec<_> = select_recent(projects.records())?
            .into_iter()
            .map(|(project, date)| project_to_item(project, date, &site.url))
            .collect();

        let channel = ChannelBuilder::default()
            .namespaces(BTreeMap::from([("atom".to_string(), ATOM_NS.to_string())]))
            .title(&site.title)
            .link(&site.url)
            .description(&site.description)
            .language(site.language.clone())
            .last_build_date(clock.now().to_rfc2822())
            .generator(site.generator.clone())
            .atom_ext(self_link(config.feed_url()))
            .items(items)
            .build();

        channel
            .validate()
            .map_err(|e| GenerateError::InvalidFeed(e.to_string()))?;
        Ok(Self { channel })
    }

    /// Number of `<item>` elements.
    pub fn items(&self) -> usize {
        self.channel.items().len()
    }

    /// Serialize with a `UTF-8` declaration, indented unless `minify` is set.
    pub fn render(&self, minify: bool) -> io::Result<String> {
        let buf = if minify {
            self.channel.write_to(Vec::new())
        } else {
            self.channel.pretty_write_to(Vec::new(), b' ', 2)
        }
        .map_err(io::Error::other)?;

        let document = String::from_utf8(buf).map_err(io::Error::other)?;
        Ok(with_declaration(&document, minify))
    }
}

/// Parse every date, then keep the newest `FEED_LIMIT` projects.
///
/// `sort_by` is stable, so projects sharing a date keep document order.
fn select_recent(
    projects: &[ProjectRecord],
) -> Result<Vec<(&ProjectRecord, DateTimeUtc)>, GenerateError> {
    let mut dated = projects
        .iter()
        .map(|project| {
            DateTimeUtc::parse(&project.date)
                .map(|date| (project, date))
                .ok_or_else(|| GenerateError::DateFormat {
                    id: project.id.clone(),
                    date: project.date.clone(),
                })
        })
        .collect::<Result<Vec<_>, _>>()?;

    dated.sort_by(|(_, a), (_, b)| b.cmp(a));
    dated.truncate(FEED_LIMIT);
    Ok(dated)
}

fn project_to_item(project: &ProjectRecord, date: DateTimeUtc, site_url: &str) -> Item {
    let categories: Vec<_> = project
        .tech
        .iter()
        .map(|tech| CategoryBuilder::default().name(tech.as_str()).build())
        .collect();

    ItemBuilder::default()
        .title(project.title.clone())
        .link(project.url().unwrap_or(site_url).to_string())
        .description(project.description.clone())
        .guid(
            GuidBuilder::default()
                .permalink(false)
                .value(format!("{GUID_PREFIX}{}", project.id))
                .build(),
        )
        .pub_date(date.to_rfc2822())
        .categories(categories)
        .build()
}

/// `<atom:link rel="self">` pointing at the published feed.
fn self_link(href: String) -> AtomExtension {
    let mut link = Link::default();
    link.set_href(href);
    link.set_rel("self");
    link.set_mime_type(Some(FEED_MIME.to_string()));

    let mut atom = AtomExtension::default();
    atom.set_links(vec![link]);
    atom
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::date::FixedClock;

    const CLOCK: FixedClock = FixedClock(DateTimeUtc::new(2025, 1, 2, 8, 30, 0));

    fn make_config() -> SiteConfig {
        let mut config = SiteConfig::default();
        config.site.title = "Portfolio Updates".to_string();
        config.site.url = "https://someone.github.io/portfolio/".to_string();
        config.site.description = "Latest projects".to_string();
        config.site.language = "en-us".to_string();
        config.site.generator = "folio".to_string();
        config
    }

    fn project(id: &str, date: &str) -> ProjectRecord {
        ProjectRecord {
            id: id.to_string(),
            title: format!("Project {id}"),
            description: format!("About {id}"),
            summary: String::new(),
            url: Some(format!("https://someone.github.io/{id}/")),
            date: date.to_string(),
            tech: Vec::new(),
        }
    }

    fn build(projects: Vec<ProjectRecord>) -> RssFeed {
        RssFeed::build(&ProjectList::new(projects), &make_config(), &CLOCK).unwrap()
    }

    fn item_ids(feed: &RssFeed) -> Vec<&str> {
        feed.channel
            .items()
            .iter()
            .filter_map(|item| item.guid())
            .map(|guid| guid.value().trim_start_matches(GUID_PREFIX))
            .collect()
    }

    #[test]
    fn test_items_sorted_newest_first() {
        let feed = build(vec![
            project("a", "2024-01-01"),
            project("b", "2024-06-15"),
            project("c", "2024-03-10"),
        ]);
        assert_eq!(feed.items(), 3);
        assert_eq!(item_ids(&feed), vec!["b", "c", "a"]);
    }

    #[test]
    fn test_equal_dates_keep_document_order() {
        let feed = build(vec![
            project("first", "2024-05-01"),
            project("older", "2024-01-01"),
            project("second", "2024-05-01"),
            project("third", "2024-05-01"),
        ]);
        assert_eq!(item_ids(&feed), vec!["first", "second", "third", "older"]);
    }

    #[test]
    fn test_feed_is_capped() {
        let feed = build(
            (1..=15)
                .map(|day| project(&format!("p{day}"), &format!("2024-01-{day:02}")))
                .collect(),
        );
        assert_eq!(feed.items(), FEED_LIMIT);

        let ids = item_ids(&feed);
        assert_eq!(ids.first(), Some(&"p15"));
        assert_eq!(ids.last(), Some(&"p6"));
    }

    #[test]
    fn test_invalid_date_fails() {
        let projects = ProjectList::new(vec![
            project("ok", "2024-01-01"),
            project("bad", "2024-13-45"),
        ]);
        let err = RssFeed::build(&projects, &make_config(), &CLOCK).unwrap_err();
        assert!(matches!(
            err,
            GenerateError::DateFormat { ref id, ref date } if id == "bad" && date == "2024-13-45"
        ));
    }

    #[test]
    fn test_item_fields() {
        let mut record = project("etl", "2024-01-01");
        record.tech = vec!["Python".into(), "Pandas".into(), "SQL".into()];
        let feed = build(vec![record]);

        let item = &feed.channel.items()[0];
        assert_eq!(item.title(), Some("Project etl"));
        assert_eq!(item.link(), Some("https://someone.github.io/etl/"));
        assert_eq!(item.description(), Some("About etl"));
        assert_eq!(item.pub_date(), Some("Mon, 01 Jan 2024 00:00:00 GMT"));

        let guid = item.guid().unwrap();
        assert_eq!(guid.value(), "project-etl");
        assert!(!guid.is_permalink());

        let categories: Vec<_> = item.categories().iter().map(|c| c.name()).collect();
        assert_eq!(categories, vec!["Python", "Pandas", "SQL"]);
    }

    #[test]
    fn test_link_falls_back_to_site_url() {
        let mut record = project("local", "2024-01-01");
        record.url = None;
        let feed = build(vec![record]);

        assert_eq!(
            feed.channel.items()[0].link(),
            Some("https://someone.github.io/portfolio/")
        );
    }

    #[test]
    fn test_channel_metadata() {
        let feed = build(vec![]);
        let channel = &feed.channel;

        assert_eq!(channel.title(), "Portfolio Updates");
        assert_eq!(channel.link(), "https://someone.github.io/portfolio/");
        assert_eq!(channel.description(), "Latest projects");
        assert_eq!(channel.language(), Some("en-us"));
        assert_eq!(channel.last_build_date(), Some("Thu, 02 Jan 2025 08:30:00 GMT"));
        assert_eq!(channel.generator(), Some("folio"));
        assert!(channel.items().is_empty());

        let links = channel.atom_ext().map(AtomExtension::links).unwrap_or_default();
        assert_eq!(links.len(), 1);
        assert_eq!(links[0].href(), "https://someone.github.io/portfolio/feed.xml");
        assert_eq!(links[0].rel(), "self");
        assert_eq!(links[0].mime_type(), Some(FEED_MIME));
    }

    #[test]
    fn test_render_document() {
        let mut record = project("etl", "2024-01-01");
        record.tech = vec!["Python".into()];
        let xml = build(vec![record]).render(false).unwrap();

        assert!(xml.starts_with("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n<rss"));
        assert_eq!(xml.matches("<?xml").count(), 1);
        assert!(xml.contains(r#"version="2.0""#));
        assert_eq!(xml.matches(&format!(r#"xmlns:atom="{ATOM_NS}""#)).count(), 1);
        assert!(xml.contains("<atom:link"));
        assert!(xml.contains(r#"rel="self""#));
        assert!(xml.contains(r#"<guid isPermaLink="false">project-etl</guid>"#));
        assert!(xml.contains("<pubDate>Mon, 01 Jan 2024 00:00:00 GMT</pubDate>"));
        assert!(xml.contains("<category>Python</category>"));
        assert!(xml.ends_with("</rss>\n"));
    }

    #[test]
    fn test_render_minified_is_one_line() {
        let xml = build(vec![project("a", "2024-01-01")]).render(true).unwrap();
        assert_eq!(xml.lines().count(), 1);
        assert!(xml.starts_with("<?xml version=\"1.0\" encoding=\"UTF-8\"?><rss"));
    }

    #[test]
    fn test_text_is_escaped() {
        let mut record = project("esc", "2024-01-01");
        record.title = "R&D <beta>".to_string();
        let xml = build(vec![record]).render(true).unwrap();

        assert!(xml.contains("<title>R&amp;D &lt;beta&gt;</title>"));
    }

    #[test]
    fn test_invalid_item_link_fails_validation() {
        let mut record = project("rel", "2024-01-01");
        record.url = Some("not a url".to_string());
        let projects = ProjectList::new(vec![record]);

        let err = RssFeed::build(&projects, &make_config(), &CLOCK).unwrap_err();
        assert!(matches!(err, GenerateError::InvalidFeed(_)));
    }
}
