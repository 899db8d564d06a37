//! Per-tag policy for the tree walk.
//!
//! Each element either starts a block (headings, paragraphs, blockquotes),
//! toggles inline style for its subtree (`strong`/`b`, `em`/`i`), hands off to
//! the list renderer, inserts a line break, or is passed through untouched.

use super::lists::BULLET;
use super::state::{BlockContext, InlineStyle};
use super::Walker;
use crate::model::Block;
use markup5ever_rcdom::Handle;

/// Tags the walker gives meaning to. Everything else is [`Tag::Passthrough`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tag {
    Heading(u8),
    Paragraph,
    Strong,
    Emphasis,
    BlockQuote,
    List { ordered: bool },
    ListItem,
    LineBreak,
    Passthrough,
}

impl Tag {
    /// Maps a tag name (any case) to its policy. Total over all names.
    pub fn from_name(name: &str) -> Tag {
        let name = name.to_ascii_lowercase();
        match name.as_str() {
            "p" => Tag::Paragraph,
            "strong" | "b" => Tag::Strong,
            "em" | "i" => Tag::Emphasis,
            "blockquote" => Tag::BlockQuote,
            "ul" => Tag::List { ordered: false },
            "ol" => Tag::List { ordered: true },
            "li" => Tag::ListItem,
            "br" => Tag::LineBreak,
            other => heading_level(other).map_or(Tag::Passthrough, Tag::Heading),
        }
    }
}

/// `h1`..`h6` to 1..=6. Any other suffix is not a heading.
fn heading_level(name: &str) -> Option<u8> {
    let digits = name.strip_prefix('h')?;
    if digits.len() != 1 || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    let level: u8 = digits.parse().ok()?;
    (1..=6).contains(&level).then_some(level)
}

impl Walker {
    pub(crate) fn handle_element(&mut self, tag_name: &str, node: &Handle) {
        match Tag::from_name(tag_name) {
            Tag::Heading(level) => {
                let context = self.state.context();
                let block = Block::heading(level)
                    .with_indent(context.indent)
                    .with_italic(context.italic);
                self.state.open_block(block);
                self.walk(node);
                self.state.close_block();
            }
            Tag::Paragraph => {
                // A loose list item wraps its text in <p>; keep it on the marker line.
                if !self.state.marker_only() {
                    let block = self.state.context().block();
                    self.state.open_block(block);
                }
                self.walk(node);
                self.state.close_block();
            }
            Tag::Strong => {
                let style = self.state.style().with_bold();
                self.with_style(style, node);
            }
            Tag::Emphasis => {
                let style = self.state.style().with_italic();
                self.with_style(style, node);
            }
            Tag::BlockQuote => {
                let context = self.state.context().quoted();
                self.in_context(context, |walker| {
                    walker.state.open_block(context.block());
                    walker.walk(node);
                    walker.state.close_block();
                });
            }
            Tag::List { ordered } => self.render_list(node, ordered),
            Tag::ListItem => self.render_item(node, BULLET),
            Tag::LineBreak => self.state.push_break(),
            Tag::Passthrough => self.walk(node),
        }
    }

    fn with_style(&mut self, style: InlineStyle, node: &Handle) {
        self.state.ensure_block();
        self.state.push_style(style);
        self.walk(node);
        self.state.pop_style();
    }

    /// Runs `f` with `context` as the active block context.
    pub(crate) fn in_context(&mut self, context: BlockContext, f: impl FnOnce(&mut Walker)) {
        self.state.push_context(context);
        f(self);
        self.state.pop_context();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_heading_tags() {
        for level in 1..=6u8 {
            assert_eq!(Tag::from_name(&format!("h{}", level)), Tag::Heading(level));
        }
        assert_eq!(Tag::from_name("H3"), Tag::Heading(3));
    }

    #[test]
    fn test_bad_heading_suffix_is_passthrough() {
        for name in ["h0", "h7", "hx", "h", "h10", "h+1", "hr", "header", "head"] {
            assert_eq!(Tag::from_name(name), Tag::Passthrough, "{}", name);
        }
    }

    #[test]
    fn test_inline_aliases() {
        assert_eq!(Tag::from_name("b"), Tag::Strong);
        assert_eq!(Tag::from_name("STRONG"), Tag::Strong);
        assert_eq!(Tag::from_name("i"), Tag::Emphasis);
        assert_eq!(Tag::from_name("em"), Tag::Emphasis);
    }

    #[test]
    fn test_structural_tags() {
        assert_eq!(Tag::from_name("ul"), Tag::List { ordered: false });
        assert_eq!(Tag::from_name("ol"), Tag::List { ordered: true });
        assert_eq!(Tag::from_name("li"), Tag::ListItem);
        assert_eq!(Tag::from_name("br"), Tag::LineBreak);
        assert_eq!(Tag::from_name("blockquote"), Tag::BlockQuote);
        assert_eq!(Tag::from_name("div"), Tag::Passthrough);
        assert_eq!(Tag::from_name(""), Tag::Passthrough);
    }
}
