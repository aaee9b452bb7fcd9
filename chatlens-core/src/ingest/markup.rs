//! Markup event stream
//!
//! Exports are parsed with `scraper`, whose html5ever tree builder repairs
//! unclosed tags, stray end tags and misnested elements the same way a
//! browser would. The repaired tree is then walked in document order and
//! flattened into the two event kinds the extractor cares about: element
//! start tags and text runs.
//!
//! Character references are already decoded in [`MarkupEvent::Text`].

use scraper::node::Node;
use scraper::Html;

/// A single event in document order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MarkupEvent<'a> {
    /// An element was opened.
    StartTag {
        /// Local tag name (`div`, `span`, ...)
        name: &'a str,
        /// Whitespace-separated tokens of the `class` attribute
        classes: Vec<&'a str>,
        /// Value of the `title` attribute, if present
        title: Option<&'a str>,
    },
    /// A run of character data.
    Text(&'a str),
}

/// A parsed export document.
pub struct MarkupDocument {
    html: Html,
}

impl MarkupDocument {
    /// Parse a full document. Never fails: malformed input is repaired.
    pub fn parse(source: &str) -> Self {
        Self {
            html: Html::parse_document(source),
        }
    }

    /// Iterate over start tags and text runs in document order.
    pub fn events(&self) -> impl Iterator<Item = MarkupEvent<'_>> + '_ {
        self.html
            .tree
            .root()
            .descendants()
            .filter_map(|node| match node.value() {
                Node::Element(element) => Some(MarkupEvent::StartTag {
                    name: element.name(),
                    classes: element.classes().collect(),
                    title: element.attr("title"),
                }),
                Node::Text(text) => Some(MarkupEvent::Text(&**text)),
                _ => None,
            })
    }

    /// Number of parse errors html5ever recovered from.
    pub fn recovered_errors(&self) -> usize {
        self.html.errors.len()
    }
}
