//! Queryable document trees
//!
//! Extraction logic only talks to [`DocumentTree`]. [`HtmlDocument`] adapts a
//! `scraper::Html` to that interface, addressing elements by their arena id so
//! that subtrees can be detached in place.

use ego_tree::NodeId;
use scraper::{ElementRef, Html};
use std::fmt;
use thiserror::Error;

/// Errors raised while building or querying a document
#[derive(Debug, Error)]
pub enum DocumentError {
    #[error("document is not valid UTF-8: {0}")]
    Decode(#[from] std::str::Utf8Error),

    #[error("invalid query: {0}")]
    InvalidQuery(String),
}

/// Element predicate understood by every [`DocumentTree`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Query {
    /// Elements with this tag name
    Tag(String),

    /// Elements carrying this class
    Class(String),

    /// The element with this id
    Id(String),

    /// Elements with this tag name that carry this class
    TagWithClass { tag: String, class: String },

    /// Elements with this tag name whose attribute equals a value
    TagWithAttr {
        tag: String,
        name: String,
        value: String,
    },
}

impl Query {
    /// Rejects queries that cannot match anything meaningful
    fn check(&self) -> Result<(), DocumentError> {
        let names: Vec<&str> = match self {
            Self::Tag(tag) => vec![tag.as_str()],
            Self::Class(class) => vec![class.as_str()],
            Self::Id(id) => vec![id.as_str()],
            Self::TagWithClass { tag, class } => vec![tag.as_str(), class.as_str()],
            Self::TagWithAttr { tag, name, .. } => vec![tag.as_str(), name.as_str()],
        };

        if names.iter().any(|n| n.trim().is_empty()) {
            return Err(DocumentError::InvalidQuery(format!("{:?}", self)));
        }
        Ok(())
    }

    fn matches(&self, element: &scraper::node::Element) -> bool {
        match self {
            Self::Tag(tag) => element.name() == tag,
            Self::Class(class) => has_class(element, class),
            Self::Id(id) => element.id() == Some(id.as_str()),
            Self::TagWithClass { tag, class } => element.name() == tag && has_class(element, class),
            Self::TagWithAttr { tag, name, value } => {
                element.name() == tag && element.attr(name) == Some(value.as_str())
            }
        }
    }
}

/// A class name matches one entry of the class list; a name containing
/// whitespace matches the whole attribute verbatim.
fn has_class(element: &scraper::node::Element, class: &str) -> bool {
    if class.contains(char::is_whitespace) {
        return element.attr("class") == Some(class);
    }
    element.classes().any(|c| c == class)
}

/// Elements whose text never renders as page content
const NON_CONTENT_TAGS: &[&str] = &["script", "style", "template"];

/// Text nodes below `element`, skipping those inside [`NON_CONTENT_TAGS`]
fn visible_text<'a>(element: ElementRef<'a>) -> impl Iterator<Item = &'a str> + 'a {
    element.descendants().filter_map(|node| {
        let text = node.value().as_text()?;
        let hidden = node
            .ancestors()
            .filter_map(|ancestor| ancestor.value().as_element())
            .any(|el| NON_CONTENT_TAGS.contains(&el.name()));
        (!hidden).then_some(&**text)
    })
}

/// Narrow interface over a parsed document
pub trait DocumentTree {
    /// Opaque handle to an element of this tree
    type Node: Copy + fmt::Debug;

    /// All elements matching `query`, in document order
    fn find_all(&self, query: &Query) -> Result<Vec<Self::Node>, DocumentError>;

    /// The first element matching `query`
    fn find(&self, query: &Query) -> Result<Option<Self::Node>, DocumentError> {
        Ok(self.find_all(query)?.into_iter().next())
    }

    /// The first descendant of `scope` (excluding `scope`) matching `query`
    fn find_in(&self, scope: Self::Node, query: &Query)
        -> Result<Option<Self::Node>, DocumentError>;

    /// Text below `node`
    ///
    /// With `normalize`, every text fragment is trimmed, blank fragments are
    /// dropped, and the rest are joined by single spaces. Without it the
    /// fragments are concatenated as-is.
    fn text_content(&self, node: Self::Node, normalize: bool) -> String;

    /// Value of attribute `name` on `node`
    fn attribute(&self, node: Self::Node, name: &str) -> Option<String>;

    /// Detaches `node` and its subtree from the document
    fn remove(&mut self, node: Self::Node);
}

/// [`DocumentTree`] over an HTML document parsed by `scraper`
pub struct HtmlDocument {
    html: Html,
}

impl HtmlDocument {
    /// Parses raw page bytes, which must be UTF-8
    pub fn parse(bytes: &[u8]) -> Result<Self, DocumentError> {
        let text = std::str::from_utf8(bytes)?;
        Ok(Self::parse_str(text))
    }

    /// Parses an HTML string
    pub fn parse_str(html: &str) -> Self {
        Self {
            html: Html::parse_document(html),
        }
    }

    fn element(&self, node: NodeId) -> Option<ElementRef<'_>> {
        self.html.tree.get(node).and_then(ElementRef::wrap)
    }
}

impl fmt::Debug for HtmlDocument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HtmlDocument").finish_non_exhaustive()
    }
}

impl DocumentTree for HtmlDocument {
    type Node = NodeId;

    fn find_all(&self, query: &Query) -> Result<Vec<NodeId>, DocumentError> {
        query.check()?;

        Ok(self
            .html
            .root_element()
            .descendants()
            .filter_map(ElementRef::wrap)
            .filter(|el| query.matches(el.value()))
            .map(|el| el.id())
            .collect())
    }

    fn find_in(&self, scope: NodeId, query: &Query) -> Result<Option<NodeId>, DocumentError> {
        query.check()?;

        let Some(scope) = self.element(scope) else {
            return Ok(None);
        };

        Ok(scope
            .descendants()
            .skip(1)
            .filter_map(ElementRef::wrap)
            .find(|el| query.matches(el.value()))
            .map(|el| el.id()))
    }

    fn text_content(&self, node: NodeId, normalize: bool) -> String {
        let Some(element) = self.element(node) else {
            return String::new();
        };

        if normalize {
            visible_text(element)
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .collect::<Vec<_>>()
                .join(" ")
        } else {
            visible_text(element).collect()
        }
    }

    fn attribute(&self, node: NodeId, name: &str) -> Option<String> {
        self.element(node)
            .and_then(|el| el.value().attr(name))
            .map(str::to_string)
    }

    fn remove(&mut self, node: NodeId) {
        if let Some(mut node) = self.html.tree.get_mut(node) {
            node.detach();
        }
    }
}
