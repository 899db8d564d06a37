// End-to-end checks from Markdown source to the document model.

use mdpdf::markdown_to_document;
use mdpdf::model::{Document, INDENT_STEP};

fn doc(markdown: &str) -> Document {
    markdown_to_document(markdown).unwrap()
}

fn texts(doc: &Document) -> Vec<String> {
    doc.iter().map(|b| b.plain_text()).collect()
}

#[test]
fn test_plain_paragraph() {
    let d = doc("just one paragraph");
    assert_eq!(d.len(), 1);
    let block = &d.blocks()[0];
    assert_eq!(block.runs.len(), 1);
    assert_eq!(block.runs[0].text, "just one paragraph");
    assert!(!block.runs[0].bold && !block.runs[0].italic);
}

#[test]
fn test_single_newline_stays_in_paragraph() {
    let d = doc("First line\nSecond line");
    assert_eq!(d.len(), 1);
    assert_eq!(d.blocks()[0].lines().len(), 1);
}

#[test]
fn test_double_newline_splits_paragraphs() {
    assert_eq!(texts(&doc("First paragraph\n\nSecond paragraph")).len(), 2);
}

#[test]
fn test_explicit_linebreak_with_two_spaces() {
    let d = doc("First line  \nSecond line");
    assert_eq!(d.len(), 1);
    let lines = d.blocks()[0].lines();
    assert_eq!(lines.len(), 2);
    assert_eq!(lines[1][0].text, "Second line");
}

#[test]
fn test_heading_levels_and_sizes() {
    let d = doc("# One\n## Two\n### Three\n###### Six\n");
    let levels: Vec<Option<u8>> = d.iter().map(|b| b.heading_level).collect();
    assert_eq!(levels, vec![Some(1), Some(2), Some(3), Some(6)]);
    let sizes: Vec<Option<u8>> = d.iter().map(|b| b.font_size()).collect();
    assert_eq!(sizes, vec![Some(14), Some(12), Some(10), Some(8)]);
    assert!(d.iter().all(|b| b.bold));
}

#[test]
fn test_nested_emphasis() {
    let d = doc("**a *b* c**");
    let runs: Vec<(&str, bool, bool)> = d.blocks()[0]
        .runs
        .iter()
        .map(|r| (r.text.as_str(), r.bold, r.italic))
        .collect();
    assert_eq!(runs, vec![("a", true, false), ("b", true, true), ("c", true, false)]);
    assert_eq!(d.blocks()[0].plain_text(), "a b c");
}

#[test]
fn test_ordered_list_numbering_restarts() {
    let d = doc("1. a\n2. b\n3. c\n\ntext\n\n1. d\n2. e\n");
    assert_eq!(texts(&d), vec!["1. a", "2. b", "3. c", "text", "1. d", "2. e"]);
}

#[test]
fn test_list_start_attribute_is_ignored() {
    let d = doc("7. seven\n8. eight\n");
    assert_eq!(texts(&d), vec!["1. seven", "2. eight"]);
}

#[test]
fn test_unordered_list_markers_and_indent() {
    let d = doc("- a\n- b\n- c\n");
    assert_eq!(d.len(), 3);
    for block in &d {
        assert_eq!(block.runs[0].text, "• ");
        assert_eq!(block.indent, INDENT_STEP);
    }
}

#[test]
fn test_loose_list_keeps_marker_with_text() {
    let d = doc("- first\n\n- second\n");
    assert_eq!(texts(&d), vec!["• first", "• second"]);
}

#[test]
fn test_list_inside_blockquote() {
    let d = doc("> intro\n>\n> - item\n");
    let summary: Vec<(String, u16)> = d.iter().map(|b| (b.plain_text(), b.indent)).collect();
    assert_eq!(
        summary,
        vec![
            ("intro".to_string(), INDENT_STEP),
            ("• item".to_string(), INDENT_STEP),
        ]
    );
    assert!(d.blocks()[1].italic);
}

#[test]
fn test_unsupported_markdown_keeps_text() {
    let d = doc("See [the site](https://example.com) and `code`.\n\n---\n\n```\nblock\n```\n");
    let all = d.plain_text();
    assert!(all.contains("the site"));
    assert!(all.contains("code"));
    assert!(all.contains("block"));
}

#[test]
fn test_raw_html_is_walked() {
    let d = doc("<div>\n<b>raw</b> html\n</div>\n");
    assert_eq!(d.len(), 1);
    assert!(d.blocks()[0].runs[0].bold);
}

#[test]
fn test_document_title() {
    assert_eq!(doc("intro\n\n## Real Title\n").title().as_deref(), Some("Real Title"));
    assert_eq!(doc("no headings").title(), None);
}

#[test]
fn test_conversions_are_independent_across_threads() {
    let handles: Vec<_> = (0..4)
        .map(|i| {
            std::thread::spawn(move || {
                let md = format!("# Doc {}\n\n1. a\n2. b\n", i);
                texts(&markdown_to_document(&md).unwrap())
            })
        })
        .collect();
    for (i, handle) in handles.into_iter().enumerate() {
        assert_eq!(
            handle.join().unwrap(),
            vec![format!("Doc {}", i), "1. a".to_string(), "2. b".to_string()]
        );
    }
}
