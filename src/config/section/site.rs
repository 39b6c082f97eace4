//! `[site]` configuration.

use crate::config::{ConfigDiagnostics, FieldPath};
use serde::{Deserialize, Serialize};

/// Site metadata written into the feed header.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteSection {
    /// Feed title. Falls back to the layout's `<title>` when empty.
    pub title: String,
    pub author: String,
    pub description: String,
    /// Site URL, e.g. `https://example.com`.
    pub url: Option<String>,
}

impl SiteSection {
    pub const AUTHOR: FieldPath = FieldPath::new("site.author");
    pub const URL: FieldPath = FieldPath::new("site.url");

    /// Check `url` is an absolute http(s) address with a host.
    pub fn validate(&self, diag: &mut ConfigDiagnostics) {
        let Some(url_str) = &self.url else {
            return;
        };

        match url::Url::parse(url_str) {
            Ok(parsed) => {
                if !matches!(parsed.scheme(), "http" | "https") {
                    diag.error_with_hint(
                        Self::URL,
                        format!(
                            "scheme '{}' not supported, must be http or https",
                            parsed.scheme()
                        ),
                        "use format like https://example.com",
                    );
                }
                if parsed.host_str().is_none_or(str::is_empty) {
                    diag.error_with_hint(
                        Self::URL,
                        "URL must have a valid host",
                        "use format like https://example.com",
                    );
                }
            }
            Err(e) => {
                diag.error_with_hint(
                    Self::URL,
                    format!("invalid URL: {e}"),
                    "use format like https://example.com",
                );
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn check(url: &str) -> usize {
        let site = SiteSection {
            url: Some(url.to_string()),
            ..SiteSection::default()
        };
        let mut diag = ConfigDiagnostics::new();
        site.validate(&mut diag);
        diag.len()
    }

    #[test]
    fn test_valid_urls() {
        assert_eq!(check("https://example.com"), 0);
        assert_eq!(check("http://example.com/blog/"), 0);
        assert_eq!(check("http://localhost:8080"), 0);
    }

    #[test]
    fn test_invalid_urls() {
        assert_eq!(check("example.com"), 1);
        assert_eq!(check("ftp://example.com"), 1);
        assert_eq!(check("not a url"), 1);
    }

    #[test]
    fn test_missing_url_is_not_checked_here() {
        let mut diag = ConfigDiagnostics::new();
        SiteSection::default().validate(&mut diag);
        assert!(diag.is_empty());
    }
}
