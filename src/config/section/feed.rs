//! `[feed]` configuration.

use crate::config::{ConfigDiagnostics, FieldPath};
use crate::generator::feed::{DEFAULT_FEED_PATH, DEFAULT_RSS_PATH};
use serde::{Deserialize, Serialize};

/// Feed output format.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum FeedFormat {
    /// Atom 1.0 (default).
    #[default]
    Atom,
    /// RSS 2.0.
    Rss,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FeedConfig {
    /// Write the feed at all.
    pub enable: bool,
    /// Output path relative to the output directory, also the feed's URL path.
    /// Unset means `index.atom.xml` or `index.rss.xml` by format.
    pub path: Option<String>,
    pub format: FeedFormat,
    /// Strip indentation between tags.
    pub minify: bool,
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            enable: true,
            path: None,
            format: FeedFormat::Atom,
            minify: false,
        }
    }
}

impl FeedConfig {
    pub const ENABLE: FieldPath = FieldPath::new("feed.enable");
    pub const PATH: FieldPath = FieldPath::new("feed.path");

    /// Where the feed goes, falling back to the format's default.
    pub fn output_path(&self) -> &str {
        self.path.as_deref().unwrap_or(self.default_path())
    }

    pub fn validate(&self, diag: &mut ConfigDiagnostics) {
        let Some(path) = &self.path else {
            return;
        };
        if path.trim().is_empty() {
            diag.error(Self::PATH, "feed path must not be empty");
        } else if path.starts_with('/') || path.split('/').any(|part| part == "..") {
            diag.error_with_hint(
                Self::PATH,
                format!("`{path}` must stay inside the output directory"),
                format!("use a relative path like \"{}\"", self.default_path()),
            );
        }
    }

    fn default_path(&self) -> &'static str {
        match self.format {
            FeedFormat::Atom => DEFAULT_FEED_PATH,
            FeedFormat::Rss => DEFAULT_RSS_PATH,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::test_parse_config;

    #[test]
    fn test_defaults() {
        let config = test_parse_config("");
        assert!(config.feed.enable);
        assert_eq!(config.feed.path, None);
        assert_eq!(config.feed.output_path(), "index.atom.xml");
        assert_eq!(config.feed.format, FeedFormat::Atom);
        assert!(!config.feed.minify);
    }

    #[test]
    fn test_custom_config() {
        let config = test_parse_config(
            "[feed]\nenable = false\npath = \"rss.xml\"\nformat = \"rss\"\nminify = true",
        );
        assert!(!config.feed.enable);
        assert_eq!(config.feed.output_path(), "rss.xml");
        assert_eq!(config.feed.format, FeedFormat::Rss);
        assert!(config.feed.minify);
    }

    #[test]
    fn test_path_must_be_relative() {
        for path in ["", "/feed.xml", "../feed.xml", "a/../../feed.xml"] {
            let feed = FeedConfig {
                path: Some(path.into()),
                ..FeedConfig::default()
            };
            let mut diag = ConfigDiagnostics::new();
            feed.validate(&mut diag);
            assert_eq!(diag.len(), 1, "{path:?} should be rejected");
        }

        let mut diag = ConfigDiagnostics::new();
        FeedConfig::default().validate(&mut diag);
        assert!(diag.is_empty());
    }

    #[test]
    fn test_default_path_follows_format() {
        let config = test_parse_config("[feed]\nformat = \"rss\"");
        assert_eq!(config.feed.output_path(), "index.rss.xml");

        let config = test_parse_config("[feed]\nformat = \"rss\"\npath = \"feed.xml\"");
        assert_eq!(config.feed.output_path(), "feed.xml");
    }
}
