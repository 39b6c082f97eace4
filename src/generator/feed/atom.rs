//! Atom 1.0 feed format.
//!
//! Entries carry the full `<article>` markup as `type="html"` content and
//! RFC 3339 timestamps.

use super::render::{
    Channel, EntryFields, FeedFormatter, XmlWriter, end, start, write_link, write_text_element,
};
use super::FeedError;
use crate::utils::date::DateTimeUtc;
use quick_xml::events::{BytesStart, BytesText, Event};

const ATOM_NS: &str = "http://www.w3.org/2005/Atom";

pub struct AtomFormatter;

impl FeedFormatter for AtomFormatter {
    fn format_date(&self, date: DateTimeUtc) -> String {
        date.to_rfc3339()
    }

    fn open(&self, w: &mut XmlWriter, channel: &Channel<'_>) -> Result<(), FeedError> {
        start(w, BytesStart::new("feed").with_attributes([("xmlns", ATOM_NS)]))?;

        let author = &channel.meta.author;
        if !author.is_empty() {
            start(w, BytesStart::new("author"))?;
            write_text_element(w, "name", author)?;
            end(w, "author")?;
        }

        write_text_element(w, "id", channel.site_url)?;
        write_link(w, channel.site_url, "alternate")?;
        write_link(w, &channel.self_url, "self")?;
        write_text_element(w, "title", &channel.meta.title)?;
        write_text_element(w, "updated", &channel.updated)
    }

    fn entry(&self, w: &mut XmlWriter, entry: &EntryFields<'_>) -> Result<(), FeedError> {
        start(w, BytesStart::new("entry"))?;
        write_text_element(w, "id", &entry.url)?;
        write_link(w, &entry.url, "alternate")?;
        write_text_element(w, "title", &entry.title)?;
        write_text_element(w, "updated", &entry.date)?;

        start(w, BytesStart::new("content").with_attributes([("type", "html")]))?;
        w.write_event(Event::Text(BytesText::new(&entry.content.to_html())))?;
        end(w, "content")?;

        end(w, "entry")
    }

    fn close(&self, w: &mut XmlWriter) -> Result<(), FeedError> {
        end(w, "feed")
    }
}
