//! Feed build pipeline.
//!
//! 1. Walk the input directory for merged `.html` pages
//! 2. Parse pages in parallel; each page with `<article>` and a
//!    `<time datetime>` inside it is added to the feed
//! 3. Render once all workers have joined, then write (unless pretending)

use crate::{
    cli::Cli,
    config::{ConfigError, FeedFormat, SiteConfig},
    debug,
    dom::Document,
    generator::feed::{Feed, FeedMeta, RenderSummary},
    log,
    logger::ProgressLine,
    utils::date::{DateTimeUtc, parse_feed_date},
};
use anyhow::{Context, Result};
use jwalk::WalkDir;
use rayon::prelude::*;
use std::{
    fs,
    path::{Component, Path, PathBuf},
};

const PAGE_EXTENSIONS: &[&str] = &["html", "htm"];

/// Outcome of one build.
#[derive(Debug)]
pub struct BuildReport {
    /// Pages found in the input directory.
    pub pages: usize,
    /// Render result; `None` when the feed is disabled.
    pub summary: Option<RenderSummary>,
    /// Feed destination, whether or not it was written.
    pub destination: PathBuf,
}

/// Build the feed for `cli.input` and write it under the output directory.
pub fn build_feed(cli: &Cli, config: &SiteConfig) -> Result<BuildReport> {
    let destination = cli.output_dir().join(config.feed.output_path());
    let pages = collect_pages(&cli.input, cli.layout.as_deref())?;

    if !config.feed.enable {
        log!("feed"; "disabled, nothing to do");
        return Ok(BuildReport {
            pages: pages.len(),
            summary: None,
            destination,
        });
    }

    let home = cli.layout.as_deref().map(load_page).transpose()?;
    let feed = Feed::new(feed_meta(cli, config, home.as_ref())?).with_minify(config.feed.minify);
    let feed = match home {
        Some(home) => feed.with_home(home),
        None => feed,
    };

    add_pages(&feed, &cli.input, &pages)?;
    if feed.store().is_empty() {
        log!("warning"; "no page in {} has a dated <article>", cli.input.display());
    } else {
        debug!("feed"; "{} of {} pages are dated", feed.store().len(), pages.len());
    }
    log_fragments(&feed);

    // Buffered so a failed render leaves the destination untouched
    let format = config.feed.format;
    let mut bytes = Vec::new();
    let summary = feed
        .render(format, &mut bytes)
        .with_context(|| format!("failed to render {}", destination.display()))?;

    if cli.pretend {
        debug!("feed"; "would write {} feed to {}", format_name(format), destination.display());
    } else {
        write_feed(&destination, &bytes)?;
        debug!("feed"; "wrote {} feed to {}", format_name(format), destination.display());
    }

    Ok(BuildReport {
        pages: pages.len(),
        summary: Some(summary),
        destination,
    })
}

/// Feed metadata from config, falling back to the layout's `<title>`.
fn feed_meta(cli: &Cli, config: &SiteConfig, home: Option<&Document>) -> Result<FeedMeta> {
    let title = if config.site.title.is_empty() {
        home.and_then(|doc| doc.find("title"))
            .map(|title| title.text())
            .unwrap_or_default()
    } else {
        config.site.title.clone()
    };

    let mut meta = FeedMeta::new(config.site_url())
        .with_title(title)
        .with_author(config.site.author.as_str())
        .with_description(config.site.description.as_str())
        .with_path(config.feed.output_path());

    if let Some(raw) = &cli.timestamp {
        meta = meta.with_timestamp(parse_timestamp(raw)?);
    }
    Ok(meta)
}

fn parse_timestamp(raw: &str) -> Result<DateTimeUtc, ConfigError> {
    parse_feed_date(raw).ok_or_else(|| ConfigError::Timestamp(raw.to_string()))
}

/// All page files under `input`, sorted, excluding the layout.
fn collect_pages(input: &Path, layout: Option<&Path>) -> Result<Vec<PathBuf>> {
    if !input.is_dir() {
        anyhow::bail!("input directory '{}' not found", input.display());
    }
    let layout = layout.and_then(|path| path.canonicalize().ok());

    let mut pages: Vec<PathBuf> = WalkDir::new(input)
        .into_iter()
        .filter_map(Result::ok)
        .filter(|e| e.file_type().is_file())
        .map(|e| e.path())
        .filter(|path| is_page(path))
        .filter(|path| layout.is_none() || path.canonicalize().ok() != layout)
        .collect();
    pages.sort();
    Ok(pages)
}

fn is_page(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| PAGE_EXTENSIONS.iter().any(|e| ext.eq_ignore_ascii_case(e)))
}

fn load_page(path: &Path) -> Result<Document> {
    let html =
        fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))?;
    Document::parse(&html).with_context(|| format!("failed to parse {}", path.display()))
}

/// Parse pages in parallel and add the dated ones to `feed`.
fn add_pages(feed: &Feed, input: &Path, pages: &[PathBuf]) -> Result<()> {
    let progress = ProgressLine::new("pages", &[("parsed", pages.len())]);

    let result = pages.par_iter().try_for_each(|path| -> Result<()> {
        let doc = load_page(path)?;
        let rel = relative_url_path(input, path);

        match page_date(&doc) {
            Some(date) => feed.add(date, rel, doc),
            None => debug!("skip"; "{} has no <article> with <time datetime>", rel),
        }
        progress.inc("parsed");
        Ok(())
    });

    // Drop clears the line when a worker failed
    if result.is_ok() {
        progress.finish();
    }
    result
}

/// `datetime` of the first `<time>` inside the first `<article>`.
fn page_date(doc: &Document) -> Option<String> {
    doc.find("article")?
        .find("time")?
        .attr("datetime")
        .map(str::to_string)
}

/// `path` relative to `root`, `/`-separated for use in URLs.
fn relative_url_path(root: &Path, path: &Path) -> String {
    path.strip_prefix(root)
        .unwrap_or(path)
        .components()
        .filter_map(|c| match c {
            Component::Normal(part) => Some(part.to_string_lossy()),
            _ => None,
        })
        .collect::<Vec<_>>()
        .join("/")
}

fn log_fragments(feed: &Feed) {
    if !crate::logger::is_verbose() {
        return;
    }
    feed.store().with_entries(|entries| {
        for entry in entries {
            debug!("frag"; "<h1> {} # {}", entry.path, entry.date);
            debug!("frag"; "<article> {} # {}", entry.path, entry.date);
        }
    });
}

fn write_feed(destination: &Path, bytes: &[u8]) -> Result<()> {
    if let Some(parent) = destination.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("failed to create directory '{}'", parent.display()))?;
    }
    fs::write(destination, bytes)
        .with_context(|| format!("failed to write {}", destination.display()))
}

const fn format_name(format: FeedFormat) -> &'static str {
    match format {
        FeedFormat::Atom => "Atom",
        FeedFormat::Rss => "RSS",
    }
}
