//! Locating the imported-by count inside a pkg.go.dev package page.
//!
//! The page does not label the number itself. It labels the header item that contains it:
//!
//! ```html
//! <span class="go-Main-headerDetailItem" data-test-id="UnitHeader-importedby">
//!   <a href="/runtime/debug?tab=importedby" aria-label="Go to Imported By">
//!     <span class="go-textSubtle">Imported by: </span>19,638
//!   </a>
//! </span>
//! ```
//!
//! which parses to
//!
//! ```text
//! SPAN
//!   TEXT
//!   A
//!     TEXT
//!     SPAN
//!     TEXT   <- "19,638"
//! ```
//!
//! The count is reached by a fixed walk from the labeled `span` ([`IMPORTED_BY_HOPS`]). Any change
//! to that markup breaks the walk; the extractor then reports nothing rather than a wrong number.

use ego_tree::NodeRef;
use scraper::{Html, Node};

const INDICATOR_TAG: &str = "span";
const INDICATOR_ATTRIBUTE: &str = "data-test-id";
const INDICATOR_VALUE: &str = "UnitHeader-importedby";

/// One step of a structural walk through a [`MarkupNode`] tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Hop {
    FirstChild,
    NextSibling,
}

/// Walk from the imported-by indicator to the text node holding the count.
pub const IMPORTED_BY_HOPS: [Hop; 5] = [Hop::FirstChild, Hop::NextSibling, Hop::FirstChild, Hop::NextSibling, Hop::NextSibling];

/// A parsed markup tree.
///
/// Whitespace-only text and comments are kept as nodes so sibling positions match the parsed DOM.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MarkupNode {
    Document(Vec<Self>),
    Element(Element),
    Text(String),
    Comment(String),
    Doctype(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    pub tag: String,
    pub attributes: Vec<(String, String)>,
    pub children: Vec<MarkupNode>,
}

impl Element {
    /// Value of the first attribute called `name`, if any.
    #[must_use]
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes.iter().find(|(key, _)| key == name).map(|(_, value)| value.as_str())
    }
}

impl MarkupNode {
    /// Parse an HTML document.
    ///
    /// Parsing is lenient and never fails; malformed input yields whatever tree the HTML parser recovers.
    #[must_use]
    pub fn parse_html(text: &str) -> Self {
        let html = Html::parse_document(text);
        convert(html.tree.root())
    }

    /// Convenience constructor for an element node.
    #[must_use]
    pub fn element(tag: &str, attributes: &[(&str, &str)], children: Vec<Self>) -> Self {
        Self::Element(Element {
            tag: tag.to_string(),
            attributes: attributes.iter().map(|(k, v)| ((*k).to_string(), (*v).to_string())).collect(),
            children,
        })
    }

    /// Convenience constructor for a text node.
    #[must_use]
    pub fn text(text: &str) -> Self {
        Self::Text(text.to_string())
    }

    #[must_use]
    pub fn children(&self) -> &[Self] {
        match self {
            Self::Document(children) => children,
            Self::Element(element) => &element.children,
            Self::Text(_) | Self::Comment(_) | Self::Doctype(_) => &[],
        }
    }

    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(text) => Some(text),
            _ => None,
        }
    }

    fn is_imported_by_indicator(&self) -> bool {
        matches!(self, Self::Element(element)
            if element.tag == INDICATOR_TAG && element.attribute(INDICATOR_ATTRIBUTE) == Some(INDICATOR_VALUE))
    }
}

fn convert(node: NodeRef<'_, Node>) -> MarkupNode {
    let children = || node.children().map(convert).collect();

    match node.value() {
        Node::Document | Node::Fragment => MarkupNode::Document(children()),
        Node::Element(element) => MarkupNode::Element(Element {
            tag: element.name().to_string(),
            attributes: element.attrs().map(|(k, v)| (k.to_string(), v.to_string())).collect(),
            children: children(),
        }),
        Node::Text(text) => MarkupNode::Text(String::from(&**text)),
        Node::Comment(comment) => MarkupNode::Comment(String::from(&**comment)),
        Node::ProcessingInstruction(instruction) => MarkupNode::Comment(String::from(&*instruction.data)),
        Node::Doctype(doctype) => MarkupNode::Doctype(doctype.name().to_string()),
    }
}

/// Position of a node among its siblings.
#[derive(Debug, Clone, Copy)]
struct Cursor<'a> {
    siblings: &'a [MarkupNode],
    index: usize,
}

impl<'a> Cursor<'a> {
    fn node(self) -> Option<&'a MarkupNode> {
        self.siblings.get(self.index)
    }

    fn step(self, hop: Hop) -> Option<Self> {
        match hop {
            Hop::FirstChild => {
                let children = self.node()?.children();
                (!children.is_empty()).then_some(Cursor { siblings: children, index: 0 })
            }
            Hop::NextSibling => {
                let index = self.index + 1;
                (index < self.siblings.len()).then_some(Cursor { siblings: self.siblings, index })
            }
        }
    }

    fn walk(self, hops: &[Hop]) -> Option<Self> {
        hops.iter().try_fold(self, |cursor, &hop| cursor.step(hop))
    }
}

/// Find the raw imported-by text, e.g. `"19,638"`, in a parsed package page.
///
/// Searches depth-first, in document order, for the labeled `span` and returns the text reached by
/// [`IMPORTED_BY_HOPS`]. Returns `None` if no indicator leads to a text node.
#[must_use]
pub fn find_imported_by(root: &MarkupNode) -> Option<&str> {
    search(core::slice::from_ref(root))
}

fn follow_imported_by_hops(siblings: &[MarkupNode], index: usize) -> Option<&str> {
    let start = Cursor { siblings, index };
    start.walk(&IMPORTED_BY_HOPS)?.node()?.as_text()
}

fn search(siblings: &[MarkupNode]) -> Option<&str> {
    for (index, node) in siblings.iter().enumerate() {
        if node.is_imported_by_indicator()
            && let Some(text) = follow_imported_by_hops(siblings, index)
        {
            return Some(text);
        }

        if let Some(text) = search(node.children()) {
            return Some(text);
        }
    }

    None
}
