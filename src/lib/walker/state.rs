use crate::model::{Block, Document, TextRun, INDENT_STEP};

/// Inline style active at a point of the walk.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct InlineStyle {
    pub bold: bool,
    pub italic: bool,
}

impl InlineStyle {
    pub fn with_bold(self) -> Self {
        Self { bold: true, ..self }
    }

    pub fn with_italic(self) -> Self {
        Self {
            italic: true,
            ..self
        }
    }
}

/// Layout inherited by blocks opened inside a container (blockquote, list item).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BlockContext {
    pub indent: u16,
    pub italic: bool,
}

impl BlockContext {
    /// Item layout: indented one step, keeping the baseline slant.
    ///
    /// Container indent does not accumulate; a nested item sits at the
    /// same indent as its parent.
    pub fn nested(self) -> Self {
        Self {
            indent: INDENT_STEP,
            ..self
        }
    }

    /// Quote layout: indented one step with an italic baseline.
    pub fn quoted(self) -> Self {
        Self {
            indent: INDENT_STEP,
            italic: true,
        }
    }

    /// A fresh plain block laid out in this context.
    pub fn block(self) -> Block {
        Block::new().with_indent(self.indent).with_italic(self.italic)
    }
}

/// Mutable state threaded through the tree walk.
///
/// Inline style and block context are stacks with a permanent base entry.
/// Every push made before recursing into an element is matched by a pop on
/// return, so a toggle never outlives the element that set it.
#[derive(Debug)]
pub struct FormattingState {
    document: Document,
    current: Option<Block>,
    styles: Vec<InlineStyle>,
    contexts: Vec<BlockContext>,
    /// Whitespace was seen after the last run of the open block.
    pending_space: bool,
    /// The open block holds only a list marker so far.
    marker_only: bool,
}

impl Default for FormattingState {
    fn default() -> Self {
        Self::new()
    }
}

impl FormattingState {
    pub fn new() -> Self {
        Self {
            document: Document::new(),
            current: None,
            styles: vec![InlineStyle::default()],
            contexts: vec![BlockContext::default()],
            pending_space: false,
            marker_only: false,
        }
    }

    pub fn style(&self) -> InlineStyle {
        self.styles.last().copied().unwrap_or_default()
    }

    pub fn push_style(&mut self, style: InlineStyle) {
        self.styles.push(style);
    }

    pub fn pop_style(&mut self) {
        debug_assert!(self.styles.len() > 1, "unbalanced inline style pop");
        if self.styles.len() > 1 {
            self.styles.pop();
        }
    }

    pub fn context(&self) -> BlockContext {
        self.contexts.last().copied().unwrap_or_default()
    }

    pub fn push_context(&mut self, context: BlockContext) {
        self.contexts.push(context);
    }

    pub fn pop_context(&mut self) {
        debug_assert!(self.contexts.len() > 1, "unbalanced block context pop");
        if self.contexts.len() > 1 {
            self.contexts.pop();
        }
    }

    pub fn has_open_block(&self) -> bool {
        self.current.is_some()
    }

    pub fn marker_only(&self) -> bool {
        self.current.is_some() && self.marker_only
    }

    /// Closes the open block, if any, and makes `block` the open one.
    pub fn open_block(&mut self, block: Block) {
        self.close_block();
        self.current = Some(block);
    }

    /// Opens a context block when nothing is open.
    pub fn ensure_block(&mut self) {
        if self.current.is_none() {
            let block = self.context().block();
            self.open_block(block);
        }
    }

    /// Hands the open block to the document. Blocks without text are dropped.
    pub fn close_block(&mut self) {
        if let Some(block) = self.current.take() {
            if block.has_text() {
                self.document.push(block);
            }
        }
        self.pending_space = false;
        self.marker_only = false;
    }

    /// Applies the text-node rule: trim, skip if empty, otherwise append one
    /// run in the current inline style.
    pub fn push_text(&mut self, raw: &str) {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            if self.current.is_some() && !raw.is_empty() {
                self.pending_space = true;
            }
            return;
        }

        let leading = raw.starts_with(char::is_whitespace);
        let trailing = raw.ends_with(char::is_whitespace);
        self.ensure_block();

        let style = self.style();
        let separated = self.pending_space || leading;
        if let Some(block) = self.current.as_mut() {
            let follows_text = block
                .runs
                .last()
                .is_some_and(|r| !r.line_break && !r.text.ends_with(char::is_whitespace));
            block.push(
                TextRun::new(trimmed, style.bold, style.italic)
                    .with_space_before(separated && follows_text),
            );
        }
        self.pending_space = trailing;
        self.marker_only = false;
    }

    /// Appends a list marker as the first run of the open block.
    pub fn push_marker(&mut self, marker: &str) {
        self.ensure_block();
        if let Some(block) = self.current.as_mut() {
            debug_assert!(block.runs.is_empty(), "marker must lead its block");
            block.push(TextRun::new(marker, false, false));
            self.marker_only = true;
        }
    }

    /// Forced line break inside the open block. No-op when nothing is open.
    pub fn push_break(&mut self) {
        if let Some(block) = self.current.as_mut() {
            block.push(TextRun::line_break());
            self.pending_space = false;
        }
    }

    /// Closes whatever is still open and returns the finished document.
    pub fn finish(mut self) -> Document {
        self.close_block();
        debug_assert_eq!(self.styles.len(), 1);
        debug_assert_eq!(self.contexts.len(), 1);
        self.document
    }
}
