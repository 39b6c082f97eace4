//! Configuration for `pagefeed.toml`.
//!
//! # Module Structure
//!
//! ```text
//! config/
//! ├── section/       # [site] and [feed]
//! ├── types/         # ConfigError, ConfigDiagnostics, FieldPath
//! ├── util.rs        # config file lookup
//! └── mod.rs         # SiteConfig (this file)
//! ```
//!
//! Values come from the file first; command-line options override them.
//! A missing default config file is not an error, every field has a default.

pub mod section;
pub mod types;
mod util;

use util::find_config_file;

pub use section::{FeedConfig, FeedFormat, SiteSection};
pub use types::{ConfigDiagnostics, ConfigError, FieldPath};

use crate::{cli::Cli, log};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
};

/// Config file looked up when `-C` is not given.
pub const DEFAULT_CONFIG: &str = "pagefeed.toml";

/// Root configuration structure representing pagefeed.toml
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SiteConfig {
    /// Where the configuration was read from, if anywhere
    #[serde(skip)]
    pub config_path: Option<PathBuf>,

    #[serde(default)]
    pub site: SiteSection,

    #[serde(default)]
    pub feed: FeedConfig,
}

impl SiteConfig {
    /// Load configuration for a run: file, then CLI overrides, then validation.
    pub fn load(cli: &Cli) -> Result<Self> {
        let mut config = match Self::resolve_config_path(cli)? {
            Some(path) => {
                let mut config = Self::from_path(&path)?;
                config.config_path = Some(path);
                config
            }
            None => Self::default(),
        };

        config.apply_cli_args(cli);
        config.validate()?;
        Ok(config)
    }

    /// An explicit `-C` must exist; the default file is optional.
    fn resolve_config_path(cli: &Cli) -> Result<Option<PathBuf>> {
        if let Some(path) = &cli.config {
            if !path.is_file() {
                return Err(ConfigError::NotFound(path.clone()).into());
            }
            return Ok(Some(path.clone()));
        }

        let cwd = std::env::current_dir().context("Failed to get current working directory")?;
        Ok(find_config_file(&cwd, Path::new(DEFAULT_CONFIG)))
    }

    /// Parse configuration from TOML string
    #[cfg(test)]
    pub fn from_str(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content)?;
        Ok(config)
    }

    /// Load configuration from file path, warning about unknown fields.
    fn from_path(path: &Path) -> Result<Self> {
        let content =
            fs::read_to_string(path).map_err(|err| ConfigError::Io(path.to_path_buf(), err))?;

        let (config, ignored) = Self::parse_with_ignored(&content)
            .with_context(|| format!("failed to parse {}", path.display()))?;

        if !ignored.is_empty() {
            let display_path = path
                .file_name()
                .map(|n| n.to_string_lossy())
                .unwrap_or_else(|| path.to_string_lossy());
            log!("warning"; "unknown fields in {}, ignoring: {}", display_path, ignored.join(", "));
        }

        Ok(config)
    }

    /// Parse TOML content, collecting any unknown fields.
    fn parse_with_ignored(content: &str) -> Result<(Self, Vec<String>), ConfigError> {
        let mut ignored = Vec::new();
        let deserializer = toml::Deserializer::new(content);
        let config = serde_ignored::deserialize(deserializer, |path: serde_ignored::Path| {
            ignored.push(path.to_string());
        })?;
        Ok((config, ignored))
    }

    // ========================================================================
    // cli configuration updates
    // ========================================================================

    /// Command-line values win over the file.
    pub fn apply_cli_args(&mut self, cli: &Cli) {
        Self::update_option(&mut self.site.author, cli.author.as_ref());
        if let Some(url) = &cli.url {
            self.site.url = Some(url.clone());
        }
        Self::update_option(&mut self.feed.format, cli.format.as_ref());
        Self::update_option(&mut self.feed.minify, cli.minify.as_ref());
    }

    /// Update config option if CLI value is provided.
    fn update_option<T: Clone>(config_option: &mut T, cli_option: Option<&T>) {
        if let Some(option) = cli_option {
            *config_option = option.clone();
        }
    }

    // ========================================================================
    // validation
    // ========================================================================

    /// Collect every problem and fail once with all of them.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let mut diag = ConfigDiagnostics::new();

        self.site.validate(&mut diag);
        self.feed.validate(&mut diag);

        if self.feed.enable {
            if self.site.url.is_none() {
                diag.error_with_hint(
                    SiteSection::URL,
                    format!(
                        "{} is set but {} is not configured",
                        FeedConfig::ENABLE,
                        SiteSection::URL
                    ),
                    format!("set {} or pass --url, e.g. \"https://example.com\"", SiteSection::URL),
                );
            }
            if self.feed.format == FeedFormat::Atom && self.site.author.trim().is_empty() {
                diag.error_with_hint(
                    SiteSection::AUTHOR,
                    "Atom feeds require an author",
                    format!("set {} or pass --author", SiteSection::AUTHOR),
                );
            }
        }

        diag.into_result().map_err(ConfigError::Diagnostics)
    }

    /// Site URL, empty when unset.
    pub fn site_url(&self) -> &str {
        self.site.url.as_deref().unwrap_or_default()
    }
}

// ============================================================================
// Test Helpers (available to all modules via `use crate::config::test_*`)
// ============================================================================

/// Parse config with a valid `[site]` section prepended.
/// Panics on unknown fields to catch typos in tests.
#[cfg(test)]
pub fn test_parse_config(extra: &str) -> SiteConfig {
    let config = format!(
        "[site]\ntitle = \"Test\"\nauthor = \"Tester\"\nurl = \"https://example.com\"\n{extra}"
    );
    let (parsed, ignored) = SiteConfig::parse_with_ignored(&config).unwrap();
    assert!(
        ignored.is_empty(),
        "test config has unknown fields: {:?}",
        ignored
    );
    parsed
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    fn cli(args: &[&str]) -> Cli {
        Cli::parse_from(std::iter::once("pagefeed").chain(args.iter().copied()))
    }

    #[test]
    fn test_from_str_invalid_toml() {
        let result = SiteConfig::from_str("[site\ntitle = \"My Blog\"");
        assert!(result.is_err());
    }

    #[test]
    fn test_default_config() {
        let config = SiteConfig::default();
        assert!(config.config_path.is_none());
        assert_eq!(config.site.title, "");
        assert!(config.site.url.is_none());
        assert!(config.feed.enable);
        assert_eq!(config.site_url(), "");
    }

    #[test]
    fn test_unknown_fields_detected() {
        let content = "[site]\ntitle = \"Test\"\n[unknown_section]\nfield = \"value\"";
        let (config, ignored) = SiteConfig::parse_with_ignored(content).unwrap();

        assert_eq!(config.site.title, "Test");
        assert!(ignored.iter().any(|f| f.contains("unknown_section")));
    }

    #[test]
    fn test_no_unknown_fields() {
        let content = "[site]\ntitle = \"Test\"\n[feed]\nformat = \"rss\"";
        let (_, ignored) = SiteConfig::parse_with_ignored(content).unwrap();
        assert!(ignored.is_empty());
    }

    #[test]
    fn test_valid_config_passes() {
        assert!(test_parse_config("").validate().is_ok());
    }

    #[test]
    fn test_feed_requires_url_and_author() {
        let config = SiteConfig::default();
        let Err(ConfigError::Diagnostics(diag)) = config.validate() else {
            panic!("expected diagnostics");
        };
        let fields: Vec<_> = diag.errors().iter().map(|d| d.field.as_str()).collect();
        assert_eq!(fields, ["site.url", "site.author"]);
    }

    #[test]
    fn test_rss_does_not_require_author() {
        let mut config = test_parse_config("[feed]\nformat = \"rss\"");
        config.site.author.clear();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_disabled_feed_skips_requirements() {
        let config = SiteConfig::from_str("[feed]\nenable = false").unwrap();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_cli_overrides_file() {
        let mut config = test_parse_config("[feed]\nformat = \"rss\"");
        config.apply_cli_args(&cli(&[
            "-i",
            "public",
            "-a",
            "Someone Else",
            "-u",
            "http://other.example",
            "-f",
            "atom",
        ]));

        assert_eq!(config.site.author, "Someone Else");
        assert_eq!(config.site_url(), "http://other.example");
        assert_eq!(config.feed.format, FeedFormat::Atom);
        // Not given on the command line
        assert_eq!(config.site.title, "Test");
        assert!(!config.feed.minify);
    }

    #[test]
    fn test_load_explicit_config() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("site.toml");
        fs::write(
            &path,
            "[site]\ntitle = \"Blog\"\nauthor = \"A\"\nurl = \"https://example.com\"\n",
        )
        .unwrap();

        let path_str = path.to_string_lossy().into_owned();
        let config = SiteConfig::load(&cli(&["-C", &path_str, "-i", "public"])).unwrap();
        assert_eq!(config.site.title, "Blog");
        assert_eq!(config.config_path.as_deref(), Some(path.as_path()));
    }

    #[test]
    fn test_load_missing_explicit_config() {
        let err = SiteConfig::load(&cli(&["-C", "/nonexistent/pagefeed.toml", "-i", "x"]))
            .unwrap_err();
        assert!(matches!(
            err.downcast_ref::<ConfigError>(),
            Some(ConfigError::NotFound(_))
        ));
    }
}
