//! pagefeed - Atom/RSS feeds from a directory of merged HTML pages.

mod cli;
mod config;
mod dom;
mod generator;
mod logger;
mod utils;

use anyhow::Result;
use clap::{ColorChoice, Parser};
use cli::{Cli, build::build_feed};
use config::SiteConfig;

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Set global color override based on CLI option
    match cli.color {
        ColorChoice::Always => owo_colors::set_override(true),
        ColorChoice::Never => owo_colors::set_override(false),
        ColorChoice::Auto => {} // owo-colors auto-detects TTY
    }
    logger::set_verbose(cli.is_verbose());

    let config = SiteConfig::load(&cli)?;
    if let Some(path) = &config.config_path {
        debug!("config"; "loaded {}", path.display());
    }

    let report = build_feed(&cli, &config)?;
    if let Some(summary) = &report.summary {
        log!(
            "feed";
            "{} entries from {} pages -> {}",
            summary.entries,
            report.pages,
            report.destination.display()
        );
        if !summary.unparsed_dates.is_empty() {
            log!("warning"; "dates kept verbatim in {}", summary.unparsed_dates.join(", "));
        }
    }
    Ok(())
}
