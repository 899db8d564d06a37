//! Pre-flight checks run by the CLI before converting.
//!
//! Nothing here fails a conversion; every finding is a human readable warning.

use crate::fonts::FontConfig;
use crate::html::{self, NodeKind};
use crate::markdown;
use markup5ever_rcdom::Handle;
use std::collections::BTreeSet;
use std::path::Path;

/// Elements the tree walker has no layout for; their text is kept as plain text.
const PLAIN_TEXT_ELEMENTS: &[(&str, &str)] = &[
    ("a", "links"),
    ("code", "code"),
    ("hr", "horizontal rules"),
    ("img", "images"),
    ("pre", "preformatted blocks"),
    ("table", "tables"),
];

fn collect_tags(root: &Handle) -> BTreeSet<String> {
    let mut tags = BTreeSet::new();
    let mut stack = vec![root.clone()];
    while let Some(node) = stack.pop() {
        if let NodeKind::Element(name) = html::classify(&node) {
            tags.insert(name);
        }
        stack.extend(node.children.borrow().iter().cloned());
    }
    tags
}

/// Names of constructs in `markdown` that will be rendered as plain text.
pub fn plain_text_features(markdown: &str) -> Vec<&'static str> {
    let Ok(dom) = html::parse(&markdown::to_html(markdown)) else {
        return Vec::new();
    };
    let tags = collect_tags(&dom.document);
    PLAIN_TEXT_ELEMENTS
        .iter()
        .filter(|(tag, _)| tags.contains(*tag))
        .map(|(_, feature)| *feature)
        .collect()
}

/// Checks the inputs of a conversion and returns warnings for anything that
/// will fail or come out differently than the user may expect.
///
/// # Example
/// ```rust
/// use mdpdf::validation::validate_conversion;
///
/// let warnings = validate_conversion("", None, Some("out.txt"));
/// assert_eq!(warnings.len(), 2);
/// ```
pub fn validate_conversion(
    markdown: &str,
    font_config: Option<&FontConfig>,
    output_path: Option<&str>,
) -> Vec<String> {
    let mut warnings = Vec::new();

    if markdown.trim().is_empty() {
        warnings.push("Input is empty; the PDF will contain no text".to_string());
    }

    if let Some(path) = output_path {
        let path = Path::new(path);
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                warnings.push(format!(
                    "Output directory '{}' does not exist",
                    parent.display()
                ));
            }
        }
        let is_pdf = path
            .extension()
            .and_then(|e| e.to_str())
            .map_or(false, |e| e.eq_ignore_ascii_case("pdf"));
        if !is_pdf {
            warnings.push(format!(
                "Output file '{}' does not have a .pdf extension",
                path.display()
            ));
        }
    }

    if let Some(config) = font_config {
        for font_path in &config.custom_paths {
            if !font_path.exists() {
                warnings.push(format!(
                    "Font path '{}' does not exist",
                    font_path.display()
                ));
            }
        }
    }

    let features = plain_text_features(markdown);
    if !features.is_empty() {
        warnings.push(format!(
            "These elements are rendered as plain text: {}",
            features.join(", ")
        ));
    }

    warnings
}
