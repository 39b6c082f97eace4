//! Shared feed traversal.
//!
//! Both formats walk the store the same way; only element names and the
//! date grammar differ, and those live behind [`FeedFormatter`].

use super::{Entry, FeedError, FeedMeta, RenderSummary};
use crate::{
    dom::Element,
    log,
    utils::date::{DateTimeUtc, parse_feed_date},
};
use quick_xml::{
    Writer,
    events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event},
};
use url::Url;

/// Primary content container inside a merged page.
const CONTENT_TAG: &str = "article";
/// Heading inside the content container used as the entry title.
const TITLE_TAG: &str = "h1";

pub type XmlWriter = Writer<Vec<u8>>;

/// Feed-level fields handed to [`FeedFormatter::open`].
pub struct Channel<'a> {
    pub meta: &'a FeedMeta,
    /// Site address as configured.
    pub site_url: &'a str,
    /// Address of the feed document itself.
    pub self_url: String,
    /// Document timestamp, already in the format's date grammar.
    pub updated: String,
}

/// Per-entry fields handed to [`FeedFormatter::entry`].
pub struct EntryFields<'a> {
    pub url: String,
    pub title: String,
    /// Formatted date, or the raw date string if it did not parse.
    pub date: String,
    pub content: &'a Element,
}

/// Element naming and date formatting for one feed grammar.
pub trait FeedFormatter {
    fn format_date(&self, date: DateTimeUtc) -> String;

    fn open(&self, w: &mut XmlWriter, channel: &Channel<'_>) -> Result<(), FeedError>;

    fn entry(&self, w: &mut XmlWriter, entry: &EntryFields<'_>) -> Result<(), FeedError>;

    fn close(&self, w: &mut XmlWriter) -> Result<(), FeedError>;
}

/// Render `entries` in stored order into a complete document.
///
/// Fails on the first entry lacking `<article>` or its `<h1>`; nothing is
/// returned in that case. Unparseable dates are written verbatim.
pub fn render_entries<F: FeedFormatter>(
    formatter: &F,
    meta: &FeedMeta,
    entries: &[Entry],
) -> Result<(Vec<u8>, RenderSummary), FeedError> {
    let site = Url::parse(&meta.url).map_err(|source| FeedError::InvalidSiteUrl {
        url: meta.url.clone(),
        source,
    })?;
    let updated = meta.timestamp.unwrap_or_else(DateTimeUtc::now);

    let mut writer = Writer::new_with_indent(Vec::with_capacity(4096), b'\t', 1);
    writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;

    formatter.open(
        &mut writer,
        &Channel {
            meta,
            site_url: &meta.url,
            self_url: rebase(&site, &meta.path),
            updated: formatter.format_date(updated),
        },
    )?;

    let mut summary = RenderSummary::default();
    for entry in entries {
        let content = entry
            .content
            .find(CONTENT_TAG)
            .ok_or_else(|| FeedError::MissingContent {
                path: entry.path.clone(),
            })?;
        let heading = content
            .find(TITLE_TAG)
            .ok_or_else(|| FeedError::MissingTitle {
                path: entry.path.clone(),
            })?;

        let date = match parse_feed_date(&entry.date) {
            Some(date) => formatter.format_date(date),
            None => {
                log!("feed"; "error parsing date {:?} in {}", entry.date, entry.path);
                summary.unparsed_dates.push(entry.path.clone());
                entry.date.clone()
            }
        };

        formatter.entry(
            &mut writer,
            &EntryFields {
                url: rebase(&site, &entry.path),
                title: heading.text(),
                date,
                content,
            },
        )?;
        summary.entries += 1;
    }

    formatter.close(&mut writer)?;

    let mut bytes = writer.into_inner();
    bytes.push(b'\n');
    Ok((bytes, summary))
}

/// Replace the site address's path with `path`.
fn rebase(site: &Url, path: &str) -> String {
    let mut url = site.clone();
    url.set_path(path);
    url.to_string()
}

/// Write `<name>text</name>`.
pub fn write_text_element(w: &mut XmlWriter, name: &str, text: &str) -> Result<(), FeedError> {
    w.write_event(Event::Start(BytesStart::new(name)))?;
    w.write_event(Event::Text(BytesText::new(text)))?;
    w.write_event(Event::End(BytesEnd::new(name)))?;
    Ok(())
}

/// Write `<link href=".." rel=".."/>`.
pub fn write_link(w: &mut XmlWriter, href: &str, rel: &str) -> Result<(), FeedError> {
    let link = BytesStart::new("link").with_attributes([("href", href), ("rel", rel)]);
    w.write_event(Event::Empty(link))?;
    Ok(())
}

pub fn start(w: &mut XmlWriter, elem: BytesStart<'_>) -> Result<(), FeedError> {
    w.write_event(Event::Start(elem))?;
    Ok(())
}

pub fn end(w: &mut XmlWriter, name: &str) -> Result<(), FeedError> {
    w.write_event(Event::End(BytesEnd::new(name)))?;
    Ok(())
}
