//! Output generators.
//!
//! - **Feed**: Atom/RSS documents built from merged pages
//!
//! Generators render into memory; the caller decides where bytes go.

pub mod feed;

use std::borrow::Cow;

/// Minify XML content if enabled.
///
/// Only whitespace between one tag and the next is dropped. Line breaks
/// inside text (escaped article markup, for instance) are kept as is,
/// and so is a final newline.
pub fn minify_xml(content: &[u8], enabled: bool) -> Cow<'_, [u8]> {
    if !enabled {
        return Cow::Borrowed(content);
    }
    let Ok(xml) = std::str::from_utf8(content) else {
        return Cow::Borrowed(content);
    };

    let mut out = String::with_capacity(xml.len());
    for line in xml.lines() {
        let trimmed = line.trim_start();
        if out.is_empty() || (out.ends_with('>') && trimmed.starts_with('<')) {
            out.push_str(trimmed);
        } else {
            out.push('\n');
            out.push_str(line);
        }
    }
    if xml.ends_with('\n') {
        out.push('\n');
    }
    Cow::Owned(out.into_bytes())
}
