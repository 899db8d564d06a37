//! Recursive translation of a parsed HTML tree into the document model.
//!
//! The walk is a single depth-first pass in document order. Text nodes append
//! runs to the open block, elements are dispatched through the per-tag policy
//! in [`elements`], and lists go through [`lists`]. All mutable state (open
//! block, style stack, block context stack, output) lives in one
//! [`FormattingState`] owned by the [`Walker`], so separate conversions share
//! nothing and may run on separate threads.
//!
//! The walk recurses once per element level, so trees nested deeper than
//! [`MAX_DEPTH`] are rejected with a parse error before walking.
//!
//! ```text
//! <body>
//!   <h1>Title</h1>           -> Block { heading_level: 1 }   ["Title"]
//!   <p>a <b>b <i>c</i></b></p> -> Block { }  ["a", "b"(bold), "c"(bold+italic)]
//!   <ul><li>x</li></ul>       -> Block { indent: 10 }        ["• ", "x"]
//! </body>
//! ```

pub mod elements;
pub mod lists;
pub mod state;

use crate::html::{self, NodeKind};
use crate::model::Document;
use crate::MdpError;
use log::debug;
use markup5ever_rcdom::{Handle, RcDom};
pub use state::FormattingState;

/// Deepest element nesting accepted by [`walk_document`].
pub const MAX_DEPTH: usize = 1024;

/// Tree walker holding the state of one conversion.
#[derive(Debug, Default)]
pub struct Walker {
    pub(crate) state: FormattingState,
}

impl Walker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Visits every child of `node` in document order.
    pub fn walk(&mut self, node: &Handle) {
        for child in node.children.borrow().iter() {
            match html::classify(child) {
                NodeKind::Text(text) => self.state.push_text(&text),
                NodeKind::Element(tag) => self.handle_element(&tag, child),
                NodeKind::Other => {}
            }
        }
    }

    pub fn finish(self) -> Document {
        self.state.finish()
    }
}

/// Walks a parsed DOM from its document root.
///
/// Fails when elements nest deeper than [`MAX_DEPTH`].
pub fn walk_document(dom: &RcDom) -> Result<Document, MdpError> {
    let depth = html::element_depth(&dom.document);
    if depth > MAX_DEPTH {
        return Err(MdpError::parse_error(format!(
            "elements are nested {} levels deep, the limit is {}",
            depth, MAX_DEPTH
        )));
    }

    let mut walker = Walker::new();
    walker.walk(&dom.document);
    let document = walker.finish();
    debug!("tree walk produced {} block(s)", document.len());
    Ok(document)
}

/// Parses `html` and walks it into a document.
pub fn html_to_document(html: &str) -> Result<Document, MdpError> {
    let dom = html::parse(html)?;
    walk_document(&dom)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Block, INDENT_STEP};

    fn convert(html: &str) -> Document {
        html_to_document(html).unwrap()
    }

    fn styles(block: &Block) -> Vec<(&str, bool, bool)> {
        block
            .runs
            .iter()
            .map(|r| (r.text.as_str(), r.bold, r.italic))
            .collect()
    }

    #[test]
    fn test_plain_text_is_one_block() {
        let doc = convert("   just some text \n");
        assert_eq!(doc.len(), 1);
        assert_eq!(styles(&doc.blocks()[0]), vec![("just some text", false, false)]);
        assert_eq!(doc.blocks()[0].heading_level, None);
        assert_eq!(doc.blocks()[0].indent, 0);
    }

    #[test]
    fn test_heading_block() {
        let doc = convert("<h2>Title</h2>after");
        assert_eq!(doc.len(), 2);
        let heading = &doc.blocks()[0];
        assert_eq!(heading.heading_level, Some(2));
        assert!(heading.bold);
        assert_eq!(heading.font_size(), Some(12));
        assert_eq!(styles(heading), vec![("Title", false, false)]);

        let next = &doc.blocks()[1];
        assert_eq!(next.heading_level, None);
        assert!(!next.bold);
        assert_eq!(styles(next), vec![("after", false, false)]);
    }

    #[test]
    fn test_nested_inline_style_restores() {
        let doc = convert("<strong>a<em>b</em>c</strong>");
        assert_eq!(doc.len(), 1);
        assert_eq!(
            styles(&doc.blocks()[0]),
            vec![("a", true, false), ("b", true, true), ("c", true, false)]
        );
    }

    #[test]
    fn test_style_does_not_leak_to_siblings() {
        let doc = convert("<p><em>x</em> y</p><p>z</p>");
        assert_eq!(styles(&doc.blocks()[0]), vec![("x", false, true), ("y", false, false)]);
        assert_eq!(styles(&doc.blocks()[1]), vec![("z", false, false)]);
    }

    #[test]
    fn test_italic_inside_bold_inside_italic() {
        let doc = convert("<i>a<b>b<i>c</i>d</b>e</i>");
        assert_eq!(
            styles(&doc.blocks()[0]),
            vec![
                ("a", false, true),
                ("b", true, true),
                ("c", true, true),
                ("d", true, true),
                ("e", false, true)
            ]
        );
    }

    #[test]
    fn test_whitespace_between_blocks_is_discarded() {
        let doc = convert("<h1>A</h1>\n\n<p>B</p>\n");
        assert_eq!(doc.len(), 2);
        assert_eq!(doc.blocks()[0].runs.len(), 1);
        assert_eq!(doc.blocks()[1].runs.len(), 1);
    }

    #[test]
    fn test_blockquote_baseline_italic() {
        let doc = convert("<blockquote>plain <b>bold</b> tail</blockquote>");
        assert_eq!(doc.len(), 1);
        let block = &doc.blocks()[0];
        assert_eq!(block.indent, INDENT_STEP);
        assert!(block.italic);
        assert_eq!(
            styles(block),
            vec![("plain", false, false), ("bold", true, false), ("tail", false, false)]
        );
    }

    #[test]
    fn test_blockquote_paragraphs_inherit_quote_layout() {
        let doc = convert("<blockquote>\n<p>one</p>\n<p>two</p>\n</blockquote><p>out</p>");
        assert_eq!(doc.len(), 3);
        for block in &doc.blocks()[..2] {
            assert_eq!(block.indent, INDENT_STEP);
            assert!(block.italic);
        }
        assert_eq!(doc.blocks()[2].indent, 0);
        assert!(!doc.blocks()[2].italic);
    }

    #[test]
    fn test_empty_input() {
        assert!(convert("").is_empty());
        assert!(convert("  \n\t ").is_empty());
    }

    #[test]
    fn test_lone_break_yields_nothing() {
        assert!(convert("<br>").is_empty());
    }

    #[test]
    fn test_break_stays_in_block() {
        let doc = convert("<p>one<br>two</p>");
        assert_eq!(doc.len(), 1);
        let block = &doc.blocks()[0];
        assert_eq!(block.runs.len(), 3);
        assert!(block.runs[1].line_break);
        assert_eq!(block.lines().len(), 2);
    }

    #[test]
    fn test_paragraph_closes_previous_inline_block() {
        let doc = convert("loose<p>para</p>more");
        let texts: Vec<String> = doc.iter().map(|b| b.plain_text()).collect();
        assert_eq!(texts, vec!["loose", "para", "more"]);
    }

    #[test]
    fn test_unknown_tags_pass_through() {
        let doc = convert("<div><span>in <b>span</b></span></div> <custom-tag>x</custom-tag>");
        assert_eq!(doc.len(), 1);
        assert_eq!(doc.blocks()[0].plain_text(), "in span x");
    }

    #[test]
    fn test_bad_heading_level_falls_back() {
        let doc = convert("<h7>not a heading</h7>");
        assert_eq!(doc.len(), 1);
        assert_eq!(doc.blocks()[0].heading_level, None);
    }

    #[test]
    fn test_comments_are_ignored() {
        let doc = convert("<p>a<!-- hidden -->b</p>");
        assert_eq!(doc.blocks()[0].plain_text(), "ab");
    }

    #[test]
    fn test_every_text_node_is_one_run() {
        let doc = convert("<p>a <b>b</b> <i>c</i> d</p><h3>e</h3>");
        let runs: usize = doc.iter().map(|b| b.runs.len()).sum();
        assert_eq!(runs, 5);
    }

    #[test]
    fn test_empty_heading_and_paragraph_are_dropped() {
        assert!(convert("<h1></h1>").is_empty());
        assert!(convert("<p><br></p>").is_empty());
        assert!(convert("<h2> </h2><p>\n</p>").is_empty());
        let doc = convert("<h1></h1><p>kept</p>");
        assert_eq!(doc.len(), 1);
        assert_eq!(doc.blocks()[0].heading_level, None);
    }

    #[test]
    fn test_deep_nesting_is_an_error() {
        let html = format!("{}deep", "<blockquote>".repeat(10_000));
        assert!(matches!(
            html_to_document(&html),
            Err(MdpError::ParseError { .. })
        ));
    }

    #[test]
    fn test_nesting_within_limit_is_walked() {
        let html = format!("{}deep", "<blockquote>".repeat(200));
        let doc = convert(&html);
        assert_eq!(doc.len(), 1);
        assert_eq!(doc.blocks()[0].plain_text(), "deep");
        assert_eq!(doc.blocks()[0].indent, INDENT_STEP);
        assert!(doc.blocks()[0].italic);
    }
}
