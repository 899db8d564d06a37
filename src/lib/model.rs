//! The styled document model produced by the HTML tree walk.
//!
//! A [`Document`] is an ordered list of [`Block`]s, each holding the
//! [`TextRun`]s emitted while its element was open. The model carries only
//! style flags, indentation and heading levels. Fonts, page geometry and line
//! wrapping belong to the PDF renderer.
//!
//! ```text
//! <h2>Title</h2><p>Hello <em>world</em></p>
//!
//! Document
//! +-- Block { heading_level: 2, bold }     ["Title"]
//! +-- Block { }                            ["Hello", "world"(italic)]
//! ```

/// Left indent, in points, of every blockquote and list item block.
pub const INDENT_STEP: u16 = 10;

/// Smallest font size a heading may shrink to.
pub const MIN_HEADING_SIZE: u8 = 8;

/// A contiguous span of text sharing one inline style.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextRun {
    pub text: String,
    pub bold: bool,
    pub italic: bool,
    /// Whitespace separated this run from the previous content of its block.
    pub space_before: bool,
    /// Forced line break inside the block. Break runs carry no text.
    pub line_break: bool,
}

impl TextRun {
    pub fn new(text: impl Into<String>, bold: bool, italic: bool) -> Self {
        Self {
            text: text.into(),
            bold,
            italic,
            space_before: false,
            line_break: false,
        }
    }

    pub fn line_break() -> Self {
        Self {
            text: String::new(),
            bold: false,
            italic: false,
            space_before: false,
            line_break: true,
        }
    }

    pub fn with_space_before(mut self, space_before: bool) -> Self {
        self.space_before = space_before;
        self
    }
}

/// One paragraph-equivalent unit of the output.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Block {
    pub runs: Vec<TextRun>,
    /// Left indent in points. Zero means flush with the margin.
    pub indent: u16,
    /// Heading level 1..=6 when this block is a heading.
    pub heading_level: Option<u8>,
    /// Baseline weight for every run in the block.
    pub bold: bool,
    /// Baseline slant for every run in the block.
    pub italic: bool,
}

impl Block {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn heading(level: u8) -> Self {
        Self {
            heading_level: Some(level),
            bold: true,
            ..Self::default()
        }
    }

    pub fn with_indent(mut self, indent: u16) -> Self {
        self.indent = indent;
        self
    }

    pub fn with_italic(mut self, italic: bool) -> Self {
        self.italic = italic;
        self
    }

    /// Heading font size, `16 - 2 * level`, never below [`MIN_HEADING_SIZE`].
    /// Returns `None` for non-heading blocks, which use the body text size.
    pub fn font_size(&self) -> Option<u8> {
        self.heading_level
            .map(|level| 16u8.saturating_sub(level.saturating_mul(2)).max(MIN_HEADING_SIZE))
    }

    pub fn is_heading(&self) -> bool {
        self.heading_level.is_some()
    }

    pub fn push(&mut self, run: TextRun) {
        self.runs.push(run);
    }

    /// True when some run carries visible text. Line breaks alone do not
    /// count as content.
    pub fn has_text(&self) -> bool {
        self.runs.iter().any(|r| !r.line_break && !r.text.is_empty())
    }

    /// Text of the block with runs joined the way the renderer lays them out.
    pub fn plain_text(&self) -> String {
        let mut out = String::new();
        for run in &self.runs {
            if run.line_break {
                out.push('\n');
                continue;
            }
            if run.space_before && !out.is_empty() && !out.ends_with('\n') {
                out.push(' ');
            }
            out.push_str(&run.text);
        }
        out
    }

    /// Splits the runs into visual lines at forced line breaks.
    pub fn lines(&self) -> Vec<&[TextRun]> {
        self.runs.split(|r| r.line_break).collect()
    }
}

/// The ordered output of a conversion.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Document {
    blocks: Vec<Block>,
}

impl Document {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a closed block. Closed blocks are never handed back mutably.
    pub(crate) fn push(&mut self, block: Block) {
        self.blocks.push(block);
    }

    pub fn blocks(&self) -> &[Block] {
        &self.blocks
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Block> {
        self.blocks.iter()
    }

    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    /// Text of the first heading, used as the PDF title.
    pub fn title(&self) -> Option<String> {
        self.blocks
            .iter()
            .find(|b| b.is_heading())
            .map(Block::plain_text)
            .filter(|t| !t.is_empty())
    }

    /// All block text separated by newlines.
    pub fn plain_text(&self) -> String {
        self.blocks
            .iter()
            .map(Block::plain_text)
            .collect::<Vec<_>>()
            .join("\n")
    }
}

impl<'a> IntoIterator for &'a Document {
    type Item = &'a Block;
    type IntoIter = std::slice::Iter<'a, Block>;

    fn into_iter(self) -> Self::IntoIter {
        self.blocks.iter()
    }
}
