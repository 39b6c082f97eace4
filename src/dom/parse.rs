//! Conversion from `tl`'s borrowed DOM to the owned tree.

use super::escape::{is_raw_text_element, unescape};
use super::{Element, Node};
use thiserror::Error;

/// Errors raised while building a document tree.
#[derive(Debug, Error)]
pub enum DomError {
    #[error("failed to parse HTML: {0:?}")]
    Parse(tl::ParseError),
}

pub(super) fn parse(html: &str) -> Result<Vec<Node>, DomError> {
    let dom = tl::parse(html, tl::ParserOptions::default()).map_err(DomError::Parse)?;
    let parser = dom.parser();

    Ok(dom
        .children()
        .iter()
        .filter_map(|handle| convert(*handle, parser, false))
        .collect())
}

/// Convert a tl node handle to an owned node.
///
/// `raw` is set inside `<script>`/`<style>`, whose text is not decoded.
fn convert(handle: tl::NodeHandle, parser: &tl::Parser, raw: bool) -> Option<Node> {
    match handle.get(parser)? {
        tl::Node::Tag(tag) => {
            let name = tag.name().as_utf8_str().to_ascii_lowercase();
            // Doctype and other declarations carry nothing we query
            if name.starts_with('!') {
                return None;
            }

            let attrs = tag
                .attributes()
                .iter()
                .map(|(key, value)| {
                    let value = value.map(|v| unescape(&v).into_owned()).unwrap_or_default();
                    (key.to_ascii_lowercase(), value)
                })
                .collect();

            let child_raw = is_raw_text_element(&name);
            let children = tag
                .children()
                .top()
                .iter()
                .filter_map(|child| convert(*child, parser, child_raw))
                .collect();

            Some(Node::Element(Element {
                tag: name,
                attrs,
                children,
            }))
        }
        tl::Node::Raw(bytes) => {
            let text = bytes.as_utf8_str();
            let text = if raw {
                text.into_owned()
            } else {
                unescape(&text).into_owned()
            };
            Some(Node::Text(text))
        }
        tl::Node::Comment(_) => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_drops_comments() {
        let nodes = parse("<p>a<!-- hidden -->b</p>").unwrap();
        let Node::Element(p) = &nodes[0] else {
            panic!("expected element");
        };
        assert_eq!(p.text(), "ab");
    }

    #[test]
    fn test_parse_lowercases_tags() {
        let nodes = parse("<ARTICLE><H1>x</H1></ARTICLE>").unwrap();
        let Node::Element(article) = &nodes[0] else {
            panic!("expected element");
        };
        assert_eq!(article.tag, "article");
        assert!(article.find("h1").is_some());
    }

    #[test]
    fn test_parse_decodes_attributes() {
        let nodes = parse(r#"<a title="x &amp; y">z</a>"#).unwrap();
        let Node::Element(a) = &nodes[0] else {
            panic!("expected element");
        };
        assert_eq!(a.attr("title"), Some("x & y"));
    }
}
