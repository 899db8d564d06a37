//! Markdown to HTML conversion.
//!
//! This is a thin wrapper around `pulldown-cmark` with CommonMark options only:
//! headings, emphasis, blockquotes, lists, paragraphs and line breaks. The
//! HTML it returns is fed to [`crate::html::parse`] and then walked into the
//! document model.

use pulldown_cmark::{html, Options, Parser};

/// Converts Markdown source into an HTML fragment.
///
/// # Example
/// ```rust
/// let html = mdpdf::markdown::to_html("# Title\n\nSome *text*.");
/// assert!(html.contains("<h1>Title</h1>"));
/// assert!(html.contains("<em>text</em>"));
/// ```
pub fn to_html(markdown: &str) -> String {
    let parser = Parser::new_ext(markdown, Options::empty());
    let mut out = String::with_capacity(markdown.len() + markdown.len() / 2);
    html::push_html(&mut out, parser);
    out
}
