//! Command-line interface definitions.

use crate::config::FeedFormat;
use clap::{ColorChoice, Parser};
use std::path::PathBuf;

/// Build an Atom or RSS feed from a directory of merged HTML pages
#[derive(Parser, Debug, Clone)]
#[command(version, about, long_about = None, arg_required_else_help = true)]
pub struct Cli {
    /// Control colored output (auto, always, never)
    #[arg(long, default_value = "auto")]
    pub color: ColorChoice,

    /// Config file path (default: pagefeed.toml, searched upward from cwd)
    #[arg(short = 'C', long, value_hint = clap::ValueHint::FilePath)]
    pub config: Option<PathBuf>,

    /// Directory containing merged HTML pages
    #[arg(short, long, value_hint = clap::ValueHint::DirPath)]
    pub input: PathBuf,

    /// Site layout HTML document (supplies the site title)
    #[arg(short, long, value_hint = clap::ValueHint::FilePath)]
    pub layout: Option<PathBuf>,

    /// Document root the feed is written to (default: input directory)
    #[arg(short, long, value_hint = clap::ValueHint::DirPath)]
    pub output: Option<PathBuf>,

    /// Author's name
    #[arg(short, long)]
    pub author: Option<String>,

    /// Site URL with scheme and domain
    #[arg(short, long, value_hint = clap::ValueHint::Url)]
    pub url: Option<String>,

    /// Feed format
    #[arg(short, long, value_enum)]
    pub format: Option<FeedFormat>,

    /// Minify the feed
    #[arg(short, long, action = clap::ArgAction::Set, num_args = 0..=1, default_missing_value = "true", require_equals = false)]
    pub minify: Option<bool>,

    /// Fixed feed timestamp ("YYYY-MM-DD HH:MM:SS"), for reproducible output
    #[arg(long)]
    pub timestamp: Option<String>,

    /// Process all pages but don't write the feed; implies --verbose
    #[arg(short, long)]
    pub pretend: bool,

    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,
}

impl Cli {
    pub const fn is_verbose(&self) -> bool {
        self.verbose || self.pretend
    }

    /// Where the feed is written.
    pub fn output_dir(&self) -> &PathBuf {
        self.output.as_ref().unwrap_or(&self.input)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Cli {
        Cli::parse_from(std::iter::once("pagefeed").chain(args.iter().copied()))
    }

    #[test]
    fn test_minimal_args() {
        let cli = parse(&["-i", "public"]);
        assert_eq!(cli.input, PathBuf::from("public"));
        assert_eq!(cli.output_dir(), &PathBuf::from("public"));
        assert!(cli.config.is_none());
        assert!(cli.format.is_none());
        assert!(!cli.is_verbose());
    }

    #[test]
    fn test_pretend_implies_verbose() {
        let cli = parse(&["-i", "public", "-p"]);
        assert!(cli.pretend);
        assert!(cli.is_verbose());
    }

    #[test]
    fn test_feed_options() {
        let cli = parse(&[
            "-i", "src", "-o", "out", "-l", "layout.html", "-a", "Jane", "-u",
            "https://example.com", "-f", "rss", "-m", "--timestamp", "2024-12-03 22:28:00",
        ]);
        assert_eq!(cli.output_dir(), &PathBuf::from("out"));
        assert_eq!(cli.layout, Some(PathBuf::from("layout.html")));
        assert_eq!(cli.author.as_deref(), Some("Jane"));
        assert_eq!(cli.format, Some(FeedFormat::Rss));
        assert_eq!(cli.minify, Some(true));
        assert_eq!(cli.timestamp.as_deref(), Some("2024-12-03 22:28:00"));
    }

    #[test]
    fn test_input_required() {
        assert!(Cli::try_parse_from(["pagefeed", "-a", "Jane"]).is_err());
    }
}
