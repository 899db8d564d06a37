use lopdf::{Document, Object};
use mdpdf::config::ConfigSource;
use mdpdf::fonts::{load_font_family, FontConfig};
use tempfile::tempdir;

fn font_available() -> bool {
    let ok = load_font_family(&FontConfig::default(), None).is_ok();
    if !ok {
        eprintln!("no usable font on this host, skipping");
    }
    ok
}

fn page_count(bytes: &[u8]) -> usize {
    Document::load_mem(bytes)
        .expect("valid PDF")
        .get_pages()
        .len()
}

#[test]
fn test_rendered_pdf_loads() {
    if !font_available() {
        return;
    }
    let markdown = r#"
# Document Title

This is a paragraph with **bold** and *italic* text.

## Subheading

- List item 1
- List item 2
  1. Nested item

> A quoted paragraph
> spanning two lines.

Final paragraph.
"#
    .to_string();

    let bytes = mdpdf::parse_into_bytes(markdown, ConfigSource::Default, None).unwrap();
    assert!(bytes.starts_with(b"%PDF-"));
    assert_eq!(page_count(&bytes), 1);
}

#[test]
fn test_empty_input_still_renders() {
    if !font_available() {
        return;
    }
    let bytes = mdpdf::parse_into_bytes(String::new(), ConfigSource::Default, None).unwrap();
    assert!(page_count(&bytes) >= 1);
}

#[test]
fn test_long_document_paginates() {
    if !font_available() {
        return;
    }
    let markdown: String = (0..200)
        .map(|i| format!("Paragraph number {} with some filler text.\n\n", i))
        .collect();
    let bytes = mdpdf::parse_into_bytes(markdown, ConfigSource::Default, None).unwrap();
    assert!(page_count(&bytes) > 1);
}

#[test]
fn test_page_size_config_changes_media_box() {
    if !font_available() {
        return;
    }
    let media_width = |config: &str| -> f32 {
        let bytes =
            mdpdf::parse_into_bytes("Hello".to_string(), ConfigSource::Embedded(config), None)
                .unwrap();
        let doc = Document::load_mem(&bytes).unwrap();
        let (_, page_id) = doc.get_pages().into_iter().next().unwrap();
        let page = doc.get_dictionary(page_id).unwrap();
        let media_box = page.get(b"MediaBox").unwrap().as_array().unwrap();
        match &media_box[2] {
            Object::Integer(i) => *i as f32,
            Object::Real(f) => *f as f32,
            other => panic!("unexpected MediaBox entry {:?}", other),
        }
    };

    let a4 = media_width("[page]\nsize = \"a4\"\n");
    let letter = media_width("[page]\nsize = \"letter\"\n");
    assert!((a4 - 595.0).abs() < 2.0, "a4 width {}", a4);
    assert!((letter - 612.0).abs() < 2.0, "letter width {}", letter);
}

#[test]
fn test_parse_into_file_writes_pdf() {
    if !font_available() {
        return;
    }
    let dir = tempdir().unwrap();
    let path = dir.path().join("out.pdf");
    mdpdf::parse_into_file(
        "# Title\n\ntext".to_string(),
        path.to_str().unwrap(),
        ConfigSource::Default,
        None,
    )
    .unwrap();
    let bytes = std::fs::read(&path).unwrap();
    assert_eq!(page_count(&bytes), 1);
}
