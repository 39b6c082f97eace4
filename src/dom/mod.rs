//! Owned document tree for merged pages.
//!
//! Pages arrive as fully merged HTML. The feed only needs three queries
//! from them, so the tree is deliberately small:
//!
//! - [`Element::find`] - first descendant with a given tag
//! - [`Element::text`] - flattened, whitespace-collapsed text
//! - [`Element::to_html`] - full markup of an element
//!
//! ```ignore
//! let doc = Document::parse("<article><h1>Hi</h1><p>body</p></article>")?;
//! let article = doc.find("article").unwrap();
//! assert_eq!(article.find("h1").unwrap().text(), "Hi");
//! ```

mod escape;
mod parse;

pub use parse::DomError;

use escape::{escape_attr, escape_text, is_raw_text_element, is_void_element};
use std::fmt::Write;

/// A node in the document tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    Element(Element),
    Text(String),
}

/// An HTML element with owned attributes and children.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Element {
    /// Lowercased tag name.
    pub tag: String,
    /// Attributes in source order.
    pub attrs: Vec<(String, String)>,
    pub children: Vec<Node>,
}

impl Element {
    /// Get an attribute value by name.
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    /// Find the first descendant with the given tag (pre-order).
    ///
    /// The element itself is never a candidate.
    pub fn find(&self, tag: &str) -> Option<&Element> {
        self.children.iter().find_map(|child| match child {
            Node::Element(elem) if elem.tag == tag => Some(elem),
            Node::Element(elem) => elem.find(tag),
            Node::Text(_) => None,
        })
    }

    /// Flattened text of all descendants.
    ///
    /// Runs of whitespace collapse to a single space and the result is
    /// trimmed, so `<h1>\n  Title\n</h1>` yields `"Title"`.
    pub fn text(&self) -> String {
        let mut raw = String::new();
        self.collect_text(&mut raw);
        raw.split_whitespace().collect::<Vec<_>>().join(" ")
    }

    fn collect_text(&self, out: &mut String) {
        for child in &self.children {
            match child {
                Node::Text(text) => out.push_str(text),
                Node::Element(elem) => elem.collect_text(out),
            }
        }
    }

    /// Serialize this element, including its own tag, to HTML.
    pub fn to_html(&self) -> String {
        let mut out = String::with_capacity(256);
        self.write_html(&mut out);
        out
    }

    fn write_html(&self, out: &mut String) {
        out.push('<');
        out.push_str(&self.tag);
        for (name, value) in &self.attrs {
            // Writing into a String cannot fail
            let _ = write!(out, " {}=\"{}\"", name, escape_attr(value));
        }

        if is_void_element(&self.tag) {
            out.push_str("/>");
            return;
        }
        out.push('>');
        self.write_children(out);
        out.push_str("</");
        out.push_str(&self.tag);
        out.push('>');
    }

    fn write_children(&self, out: &mut String) {
        let raw = is_raw_text_element(&self.tag);
        for child in &self.children {
            match child {
                Node::Text(text) if raw => out.push_str(text),
                Node::Text(text) => out.push_str(&escape_text(text)),
                Node::Element(elem) => elem.write_html(out),
            }
        }
    }
}

// Builders for hand-made trees in tests
#[cfg(test)]
impl Element {
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            ..Self::default()
        }
    }

    pub fn with_attr(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attrs.push((name.into(), value.into()));
        self
    }

    pub fn with_child(mut self, child: Element) -> Self {
        self.children.push(Node::Element(child));
        self
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.children.push(Node::Text(text.into()));
        self
    }
}

/// A parsed page: an anonymous root holding the top-level nodes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Document {
    root: Element,
}

impl Document {
    /// Parse an HTML string into an owned tree.
    pub fn parse(html: &str) -> Result<Self, DomError> {
        parse::parse(html).map(|children| Self {
            root: Element {
                children,
                ..Element::default()
            },
        })
    }

    /// Find the first element with the given tag anywhere in the document.
    pub fn find(&self, tag: &str) -> Option<&Element> {
        self.root.find(tag)
    }

    /// Flattened text of the whole document.
    #[cfg(test)]
    pub fn text(&self) -> String {
        self.root.text()
    }
}
