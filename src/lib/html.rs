//! HTML parsing and node classification.
//!
//! HTML is parsed with `html5ever` into an `RcDom`. The walker only needs to
//! know, for each node, whether it is an element (and its lowercase tag name),
//! a text node (and its content), or something to skip. [`classify`] gives it
//! exactly that view so the walk never matches on `NodeData` directly.

use crate::MdpError;
use html5ever::parse_document;
use html5ever::tendril::TendrilSink;
use markup5ever_rcdom::{Handle, NodeData, RcDom};

/// The three node kinds the tree walk distinguishes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeKind {
    /// An element with its lowercase local name.
    Element(String),
    /// Raw text content, untrimmed.
    Text(String),
    /// Documents, comments, doctypes, processing instructions.
    Other,
}

/// Parses an HTML string into a DOM tree.
///
/// html5ever recovers from malformed markup on its own, so the only failure
/// left is the reader itself.
pub fn parse(html: &str) -> Result<RcDom, MdpError> {
    parse_document(RcDom::default(), Default::default())
        .from_utf8()
        .read_from(&mut html.as_bytes())
        .map_err(|e| MdpError::ParseError {
            message: format!("could not read HTML: {}", e),
            position: None,
            suggestion: Some("Check that the input is valid UTF-8 text".to_string()),
        })
}

/// Classifies a node for the walker.
pub fn classify(handle: &Handle) -> NodeKind {
    match &handle.data {
        NodeData::Element { name, .. } => {
            NodeKind::Element(name.local.as_ref().to_ascii_lowercase())
        }
        NodeData::Text { contents } => NodeKind::Text((**contents.borrow()).to_owned()),
        _ => NodeKind::Other,
    }
}

/// Returns the lowercase tag name when the node is an element.
pub fn tag_name(handle: &Handle) -> Option<String> {
    match classify(handle) {
        NodeKind::Element(tag) => Some(tag),
        _ => None,
    }
}

/// Deepest element nesting under `root`, counted without recursion.
pub fn element_depth(root: &Handle) -> usize {
    let mut deepest = 0;
    let mut stack = vec![(root.clone(), 0usize)];
    while let Some((node, depth)) = stack.pop() {
        let depth = match node.data {
            NodeData::Element { .. } => depth + 1,
            _ => depth,
        };
        deepest = deepest.max(depth);
        for child in node.children.borrow().iter() {
            stack.push((child.clone(), depth));
        }
    }
    deepest
}
