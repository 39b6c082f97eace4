//! RSS 2.0 feed format.
//!
//! The channel title comes from the `<title>` of the site home page, not
//! from configuration. Items carry the flattened text of `<article>`.

use super::render::{Channel, EntryFields, FeedFormatter, XmlWriter, end, start, write_text_element};
use super::FeedError;
use crate::{dom::Document, utils::date::DateTimeUtc};
use quick_xml::events::BytesStart;

pub struct RssFormatter {
    channel_title: String,
}

impl RssFormatter {
    /// Take the channel title from the home page's `<title>`.
    pub fn from_home(home: Option<&Document>) -> Result<Self, FeedError> {
        let title = home
            .and_then(|doc| doc.find("title"))
            .ok_or(FeedError::MissingChannelTitle)?;

        Ok(Self {
            channel_title: title.text(),
        })
    }
}

impl FeedFormatter for RssFormatter {
    fn format_date(&self, date: DateTimeUtc) -> String {
        date.to_rfc1123()
    }

    fn open(&self, w: &mut XmlWriter, channel: &Channel<'_>) -> Result<(), FeedError> {
        start(w, BytesStart::new("rss").with_attributes([("version", "2.0")]))?;
        start(w, BytesStart::new("channel"))?;
        write_text_element(w, "title", &self.channel_title)?;
        write_text_element(w, "description", &channel.meta.description)?;
        write_text_element(w, "link", channel.site_url)?;
        write_text_element(w, "pubDate", &channel.updated)
    }

    fn entry(&self, w: &mut XmlWriter, entry: &EntryFields<'_>) -> Result<(), FeedError> {
        start(w, BytesStart::new("item"))?;
        write_text_element(w, "title", &entry.title)?;
        write_text_element(w, "description", &entry.content.text())?;
        write_text_element(w, "link", &entry.url)?;
        write_text_element(w, "pubDate", &entry.date)?;
        end(w, "item")
    }

    fn close(&self, w: &mut XmlWriter) -> Result<(), FeedError> {
        end(w, "channel")?;
        end(w, "rss")
    }
}

#[cfg(test)]
mod tests {
    use super::super::{Feed, FeedError, FeedMeta};
    use super::*;
    use crate::config::FeedFormat;

    fn page(date: &str, title: &str, body: &str) -> Document {
        Document::parse(&format!(
            r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8"/>
<title>{title} - Site name</title>
</head>
<body>
<header><h1>Site name</h1></header>
<article class="body">
<time datetime="{date}">{date}</time>
<h1>{title}</h1>
<p>{body}</p>
</article>
</body>
</html>
"#
        ))
        .unwrap()
    }

    fn home() -> Document {
        Document::parse("<html><head><title>Site name</title></head><body></body></html>")
            .unwrap()
    }

    fn feed() -> Feed {
        let feed = Feed::new(
            FeedMeta::new("http://example.com")
                .with_timestamp(DateTimeUtc::new(2025, 3, 1, 9, 0, 0)),
        )
        .with_home(home());
        feed.add(
            "2024-12-03 22:28:00".into(),
            "newest.html".into(),
            page("2024-12-03 22:28:00", "Newest article title", "Newest article body."),
        );
        feed.add(
            "1970-01-01 00:00:00".into(),
            "oldest.html".into(),
            page("1970-01-01 00:00:00", "Oldest article title", "Oldest article body."),
        );
        feed
    }

    #[test]
    fn test_rss_end_to_end() {
        let (bytes, summary) = feed().render_to_vec(FeedFormat::Rss).unwrap();
        let expected = "<?xml version=\"1.0\" encoding=\"UTF-8\"?>
<rss version=\"2.0\">
\t<channel>
\t\t<title>Site name</title>
\t\t<description></description>
\t\t<link>http://example.com</link>
\t\t<pubDate>Sat, 01 Mar 2025 09:00:00 UTC</pubDate>
\t\t<item>
\t\t\t<title>Newest article title</title>
\t\t\t<description>2024-12-03 22:28:00 Newest article title Newest article body.</description>
\t\t\t<link>http://example.com/newest.html</link>
\t\t\t<pubDate>Tue, 03 Dec 2024 22:28:00 UTC</pubDate>
\t\t</item>
\t\t<item>
\t\t\t<title>Oldest article title</title>
\t\t\t<description>1970-01-01 00:00:00 Oldest article title Oldest article body.</description>
\t\t\t<link>http://example.com/oldest.html</link>
\t\t\t<pubDate>Thu, 01 Jan 1970 00:00:00 UTC</pubDate>
\t\t</item>
\t</channel>
</rss>
";
        assert_eq!(String::from_utf8(bytes).unwrap(), expected);
        assert_eq!(summary.entries, 2);
        assert!(summary.unparsed_dates.is_empty());
    }

    #[test]
    fn test_rss_channel_description() {
        let feed = Feed::new(
            FeedMeta::new("http://example.com")
                .with_description("Notes & essays")
                .with_timestamp(DateTimeUtc::from_ymd(2025, 1, 1)),
        )
        .with_home(home());
        let (bytes, _) = feed.render_to_vec(FeedFormat::Rss).unwrap();
        let xml = String::from_utf8(bytes).unwrap();
        assert!(xml.contains("<description>Notes &amp; essays</description>"));
    }

    #[test]
    fn test_rss_requires_home_title() {
        let feed = Feed::new(FeedMeta::new("http://example.com"))
            .with_home(Document::parse("<html><body><h1>No title</h1></body></html>").unwrap());
        let err = feed.render_to_vec(FeedFormat::Rss).unwrap_err();
        assert!(matches!(err, FeedError::MissingChannelTitle));
    }

    #[test]
    fn test_rss_requires_home() {
        let feed = Feed::new(FeedMeta::new("http://example.com"));
        let err = feed.render_to_vec(FeedFormat::Rss).unwrap_err();
        assert!(matches!(err, FeedError::MissingChannelTitle));
    }
}
