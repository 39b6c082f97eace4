//! Feed generation (Atom, RSS).
//!
//! Pages are added concurrently as they finish parsing, then the whole
//! store is rendered once:
//!
//! - **Atom 1.0**: full `<article>` markup per entry (`index.atom.xml`)
//! - **RSS 2.0**: flattened article text per item
//!
//! Output is built in memory first, so a failed render never leaves a
//! partial document in the sink.

mod atom;
mod render;
mod rss;
mod store;

pub use store::{Entry, EntryStore};

use super::minify_xml;
use crate::{config::FeedFormat, dom::Document, utils::date::DateTimeUtc};
use atom::AtomFormatter;
use render::render_entries;
use rss::RssFormatter;
use std::io::Write;
use thiserror::Error;

/// Default feed location relative to the site root.
pub const DEFAULT_FEED_PATH: &str = "index.atom.xml";

/// Default location when the feed is RSS and no path is configured.
pub const DEFAULT_RSS_PATH: &str = "index.rss.xml";

/// Errors raised while rendering a feed.
#[derive(Debug, Error)]
pub enum FeedError {
    #[error("no <article> in {path}")]
    MissingContent { path: String },

    #[error("no <h1> inside <article> in {path}")]
    MissingTitle { path: String },

    #[error("no <title> in site home page")]
    MissingChannelTitle,

    #[error("invalid site url `{url}`")]
    InvalidSiteUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },

    #[error("failed to write feed")]
    Io(#[from] std::io::Error),

    #[error("failed to encode feed")]
    Xml(#[from] quick_xml::Error),
}

/// What a successful render produced.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct RenderSummary {
    /// Number of entries written.
    pub entries: usize,
    /// Paths whose dates were written verbatim because they did not parse.
    pub unparsed_dates: Vec<String>,
}

/// Feed-level metadata.
#[derive(Debug, Clone)]
pub struct FeedMeta {
    pub title: String,
    pub author: String,
    pub description: String,
    /// Site address, e.g. `https://example.com`.
    pub url: String,
    /// Feed location relative to the site root.
    pub path: String,
    /// Document timestamp; the current time when `None`.
    pub timestamp: Option<DateTimeUtc>,
}

impl FeedMeta {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            title: String::new(),
            author: String::new(),
            description: String::new(),
            url: url.into(),
            path: DEFAULT_FEED_PATH.to_string(),
            timestamp: None,
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    pub fn with_author(mut self, author: impl Into<String>) -> Self {
        self.author = author.into();
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_path(mut self, path: impl Into<String>) -> Self {
        self.path = path.into();
        self
    }

    pub fn with_timestamp(mut self, timestamp: DateTimeUtc) -> Self {
        self.timestamp = Some(timestamp);
        self
    }
}

/// A feed under construction.
///
/// `add` may be called from any number of threads; rendering reads a
/// consistent snapshot of the store.
#[derive(Debug)]
pub struct Feed {
    meta: FeedMeta,
    store: EntryStore,
    /// Site home page, source of the RSS channel title.
    home: Option<Document>,
    /// Drop indentation between tags.
    minify: bool,
}

impl Feed {
    pub fn new(meta: FeedMeta) -> Self {
        Self {
            meta,
            store: EntryStore::new(),
            home: None,
            minify: false,
        }
    }

    pub fn with_home(mut self, home: Document) -> Self {
        self.home = Some(home);
        self
    }

    pub fn with_minify(mut self, minify: bool) -> Self {
        self.minify = minify;
        self
    }

    /// Add a page published at `date`.
    ///
    /// See [`EntryStore::insert`] for ordering and duplicate handling.
    pub fn add(&self, date: String, path: String, content: Document) {
        self.store.insert(date, path, content);
    }

    pub fn store(&self) -> &EntryStore {
        &self.store
    }

    /// Render the feed into a fresh buffer, minified if requested.
    pub fn render_to_vec(&self, format: FeedFormat) -> Result<(Vec<u8>, RenderSummary), FeedError> {
        let (bytes, summary) = self.store.with_entries(|entries| match format {
            FeedFormat::Atom => render_entries(&AtomFormatter, &self.meta, entries),
            FeedFormat::Rss => {
                let formatter = RssFormatter::from_home(self.home.as_ref())?;
                render_entries(&formatter, &self.meta, entries)
            }
        })?;

        let bytes = if self.minify {
            minify_xml(&bytes, true).into_owned()
        } else {
            bytes
        };
        Ok((bytes, summary))
    }

    /// Render the feed and write it to `out`.
    ///
    /// Nothing is written unless rendering succeeds.
    pub fn render(&self, format: FeedFormat, mut out: impl Write) -> Result<RenderSummary, FeedError> {
        let (bytes, summary) = self.render_to_vec(format)?;
        out.write_all(&bytes)?;
        out.flush()?;
        Ok(summary)
    }
}
