//! XML element tree and serializer.
//!
//! The sitemap is built as an [`XmlElement`] tree and rendered through
//! `quick-xml`'s writer, which handles escaping of text and attribute values.
//! The feed is serialized by `rss` and only gets its declaration fixed up
//! by [`with_declaration`].
//!
//! ```ignore
//! let root = XmlElement::new("urlset")
//!     .attr("xmlns", SITEMAP_NS)
//!     .child(XmlElement::new("url").child(XmlElement::new("loc").text(url)));
//! let xml = render(&root, false)?;
//! ```

use quick_xml::{
    Writer,
    events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event},
};
use std::{fs, io, path::Path};

/// Declaration every output document starts with.
pub const XML_DECLARATION: &str = r#"<?xml version="1.0" encoding="UTF-8"?>"#;

/// A single element with ordered attributes, optional text and ordered children.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct XmlElement {
    name: String,
    attrs: Vec<(String, String)>,
    text: Option<String>,
    children: Vec<XmlElement>,
}

impl XmlElement {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            attrs: Vec::new(),
            text: None,
            children: Vec::new(),
        }
    }

    pub fn attr(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.attrs.push((key.into(), value.into()));
        self
    }

    pub fn text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    pub fn child(mut self, child: XmlElement) -> Self {
        self.children.push(child);
        self
    }
}

/// Shorthand for `<name>text</name>`.
pub fn text_element(name: &str, text: impl Into<String>) -> XmlElement {
    XmlElement::new(name).text(text)
}

/// Render a tree as a UTF-8 document with a leading XML declaration.
///
/// Indented with two spaces unless `minify` is set.
pub fn render(root: &XmlElement, minify: bool) -> io::Result<String> {
    let mut writer = if minify {
        Writer::new(Vec::new())
    } else {
        Writer::new_with_indent(Vec::new(), b' ', 2)
    };

    emit(
        &mut writer,
        Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)),
    )?;
    write_element(&mut writer, root)?;

    let mut bytes = writer.into_inner();
    bytes.push(b'\n');
    String::from_utf8(bytes).map_err(io::Error::other)
}

fn write_element<W: io::Write>(writer: &mut Writer<W>, element: &XmlElement) -> io::Result<()> {
    let mut start = BytesStart::new(element.name.as_str());
    for (key, value) in &element.attrs {
        start.push_attribute((key.as_str(), value.as_str()));
    }

    if element.text.is_none() && element.children.is_empty() {
        return emit(writer, Event::Empty(start));
    }

    emit(writer, Event::Start(start))?;
    if let Some(text) = &element.text {
        emit(writer, Event::Text(BytesText::new(text)))?;
    }
    for child in &element.children {
        write_element(writer, child)?;
    }
    emit(writer, Event::End(BytesEnd::new(element.name.as_str())))
}

/// Replace the leading declaration of `document`, if any, with [`XML_DECLARATION`].
///
/// The body is trimmed and followed by a single newline.
pub fn with_declaration(document: &str, minify: bool) -> String {
    let body = document
        .trim_start()
        .strip_prefix("<?xml")
        .and_then(|rest| rest.split_once("?>"))
        .map_or(document, |(_, body)| body)
        .trim();
    let sep = if minify { "" } else { "\n" };
    format!("{XML_DECLARATION}{sep}{body}\n")
}

#[inline]
fn emit<W: io::Write>(writer: &mut Writer<W>, event: Event<'_>) -> io::Result<()> {
    writer.write_event(event).map_err(io::Error::other)
}

/// Write rendered XML to `path`, replacing any existing file.
///
/// Parent directories are not created.
pub fn write_xml(path: &Path, content: &str) -> io::Result<()> {
    fs::write(path, content)
}
