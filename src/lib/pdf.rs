//! PDF generation from the document model.
//!
//! Every [`Block`] becomes a small vertical layout: one paragraph per line
//! (lines are split at forced line breaks), padded on the left by the block
//! indent. Spacing, colors and base sizes come from the [`StyleMatch`];
//! heading sizes come from the block itself. Page breaks, kerning and font
//! embedding are left to `genpdfi_extended`.

use crate::fonts::{self, FontConfig};
use crate::model::{Block, Document, TextRun};
use crate::styling::{BasicTextStyle, PageSize, StyleMatch};
use crate::MdpError;
use genpdfi_extended::{
    elements::{Break, LinearLayout, Paragraph},
    fonts::{FontData, FontFamily},
    style::{Color, Style},
    Element, Margins, PaperSize,
};
use log::{debug, info};

/// Millimetres per typographic point.
const MM_PER_POINT: f32 = 0.3528;

/// Title used when the document has no heading.
const DEFAULT_TITLE: &str = "mdpdf";

/// Which configured style a block is drawn with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum BlockKind {
    Heading,
    Quote,
    ListItem,
    Text,
}

impl BlockKind {
    /// Quoted blocks carry an italic baseline; other indented blocks are list items.
    fn of(block: &Block) -> Self {
        if block.is_heading() {
            BlockKind::Heading
        } else if block.italic {
            BlockKind::Quote
        } else if block.indent > 0 {
            BlockKind::ListItem
        } else {
            BlockKind::Text
        }
    }
}

/// A piece of one rendered line: text plus its effective bold/italic flags.
#[derive(Debug, Clone, PartialEq)]
struct Segment {
    text: String,
    bold: bool,
    italic: bool,
}

/// Flattens a line of runs into segments, re-inserting the single space the
/// source had between runs and collapsing whitespace inside each run.
fn line_segments(block: &Block, line: &[TextRun]) -> Vec<Segment> {
    let mut segments = Vec::with_capacity(line.len());
    for run in line.iter().filter(|r| !r.line_break) {
        let mut text = run.text.split_whitespace().collect::<Vec<_>>().join(" ");
        if run.text.ends_with(' ') && !text.is_empty() {
            // list markers keep their trailing space
            text.push(' ');
        }
        if run.space_before && !segments.is_empty() {
            text.insert(0, ' ');
        }
        if text.is_empty() {
            continue;
        }
        segments.push(Segment {
            text,
            bold: run.bold || block.bold,
            italic: run.italic || block.italic,
        });
    }
    segments
}

fn paper_size(size: PageSize) -> PaperSize {
    match size {
        PageSize::A4 => PaperSize::A4,
        PageSize::Letter => PaperSize::Letter,
        PageSize::Legal => PaperSize::Legal,
    }
}

/// The document renderer. Holds the model, the styling and the loaded font.
pub struct Pdf {
    input: Document,
    style: StyleMatch,
    font_family: FontFamily<FontData>,
}

impl Pdf {
    pub fn new(input: Document, style: StyleMatch, font_family: FontFamily<FontData>) -> Self {
        Self {
            input,
            style,
            font_family,
        }
    }

    /// Builds a renderer, loading the text font from `font_config` and the
    /// style's font family.
    pub fn with_font_config(
        input: Document,
        style: StyleMatch,
        font_config: &FontConfig,
    ) -> Result<Self, MdpError> {
        let font_family = fonts::load_font_family(font_config, style.text.font_family.as_deref())?;
        Ok(Self::new(input, style, font_family))
    }

    /// Finalizes and outputs the processed document to a PDF file at the specified path.
    /// Returns the error message on failure.
    pub fn render(document: genpdfi_extended::Document, path: &str) -> Option<String> {
        match document.render_to_file(path) {
            Ok(_) => {
                info!("PDF written to {}", path);
                None
            }
            Err(err) => Some(err.to_string()),
        }
    }

    /// Renders the document into memory.
    ///
    /// # Example
    /// ```rust,no_run
    /// use mdpdf::{parse_into_bytes, config::ConfigSource};
    ///
    /// let pdf_bytes = parse_into_bytes("# Test\nSome content".to_string(), ConfigSource::Default, None).unwrap();
    /// assert!(pdf_bytes.starts_with(b"%PDF-"));
    /// ```
    pub fn render_to_bytes(document: genpdfi_extended::Document) -> Result<Vec<u8>, String> {
        let mut buffer = std::io::Cursor::new(Vec::new());
        match document.render(&mut buffer) {
            Ok(_) => Ok(buffer.into_inner()),
            Err(err) => Err(err.to_string()),
        }
    }

    /// Creates the `genpdfi_extended` document with page setup applied and
    /// every block of the model pushed in order.
    pub fn render_into_document(&self) -> genpdfi_extended::Document {
        let mut doc = genpdfi_extended::Document::new(self.font_family.clone());
        let mut decorator = genpdfi_extended::SimplePageDecorator::new();

        decorator.set_margins(Margins::trbl(
            self.style.margins.top,
            self.style.margins.right,
            self.style.margins.bottom,
            self.style.margins.left,
        ));

        doc.set_page_decorator(decorator);
        doc.set_paper_size(paper_size(self.style.page_size));
        doc.set_title(self.input.title().unwrap_or_else(|| DEFAULT_TITLE.to_string()));
        doc.set_font_size(self.style.text.size);

        for block in &self.input {
            self.render_block(&mut doc, block);
        }
        debug!("rendered {} block(s)", self.input.len());

        doc
    }

    fn block_style(&self, kind: BlockKind) -> &BasicTextStyle {
        match kind {
            BlockKind::Heading => &self.style.heading,
            BlockKind::Quote => &self.style.block_quote,
            BlockKind::ListItem => &self.style.list_item,
            BlockKind::Text => &self.style.text,
        }
    }

    fn render_block(&self, doc: &mut genpdfi_extended::Document, block: &Block) {
        let kind = BlockKind::of(block);
        let block_style = self.block_style(kind);
        let size = block.font_size().unwrap_or(block_style.size);
        let color = block_style.text_color.or(self.style.text.text_color);

        let mut base = Style::new().with_font_size(size);
        if let Some((r, g, b)) = color {
            base = base.with_color(Color::Rgb(r, g, b));
        }

        doc.push(Break::new(block_style.before_spacing));

        let mut layout = LinearLayout::vertical();
        for line in block.lines() {
            let mut para = Paragraph::default();
            let segments = line_segments(block, line);
            if segments.is_empty() {
                // keep the vertical space of an empty line
                para.push_styled(" ".to_string(), base.clone());
            }
            for segment in segments {
                let mut style = base.clone();
                if segment.bold {
                    style = style.bold();
                }
                if segment.italic {
                    style = style.italic();
                }
                para.push_styled(segment.text, style);
            }
            layout.push(para);
        }

        let indent_mm = f32::from(block.indent) * MM_PER_POINT;
        doc.push(layout.padded(Margins::trbl(0.0, 0.0, 0.0, indent_mm)));
        doc.push(Break::new(block_style.after_spacing));
    }
}
