//! Configuration sections.
//!
//! | Section  | Purpose                                   |
//! |----------|-------------------------------------------|
//! | `[site]` | Site metadata (title, author, url, ...)   |
//! | `[feed]` | Feed output (enable, path, format, minify) |

mod feed;
mod site;

pub use feed::{FeedConfig, FeedFormat};
pub use site::SiteSection;
