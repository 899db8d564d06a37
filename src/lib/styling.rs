//! Style values consumed by the PDF renderer.
//!
//! The document model only says *what* is bold, italic, a heading or indented.
//! Everything about how that looks on the page (margins, paper, base size,
//! colors, spacing) lives here and is filled from the TOML configuration.

/// Page margins in millimetres.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Margins {
    pub top: f32,
    pub right: f32,
    pub bottom: f32,
    pub left: f32,
}

impl Default for Margins {
    fn default() -> Self {
        Self {
            top: 8.0,
            right: 8.0,
            bottom: 8.0,
            left: 8.0,
        }
    }
}

/// Supported paper sizes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PageSize {
    #[default]
    A4,
    Letter,
    Legal,
}

impl PageSize {
    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "a4" => Some(PageSize::A4),
            "letter" => Some(PageSize::Letter),
            "legal" => Some(PageSize::Legal),
            _ => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            PageSize::A4 => "a4",
            PageSize::Letter => "letter",
            PageSize::Legal => "legal",
        }
    }
}

/// Visual settings for one kind of block.
#[derive(Debug, Clone, PartialEq)]
pub struct BasicTextStyle {
    pub size: u8,
    pub text_color: Option<(u8, u8, u8)>,
    pub before_spacing: f32,
    pub after_spacing: f32,
    pub font_family: Option<String>,
}

impl BasicTextStyle {
    pub fn new(size: u8, before_spacing: f32, after_spacing: f32) -> Self {
        Self {
            size,
            text_color: None,
            before_spacing,
            after_spacing,
            font_family: None,
        }
    }
}

impl Default for BasicTextStyle {
    fn default() -> Self {
        Self::new(12, 0.0, 0.0)
    }
}

/// Complete styling for a rendered document.
#[derive(Debug, Clone, PartialEq)]
pub struct StyleMatch {
    pub margins: Margins,
    pub page_size: PageSize,
    /// Body text. `size` is the base size for every non-heading block.
    pub text: BasicTextStyle,
    /// Heading color and spacing. Heading sizes come from the block level.
    pub heading: BasicTextStyle,
    pub block_quote: BasicTextStyle,
    pub list_item: BasicTextStyle,
}

impl Default for StyleMatch {
    fn default() -> Self {
        Self {
            margins: Margins::default(),
            page_size: PageSize::A4,
            text: BasicTextStyle {
                font_family: Some("SimSun".to_string()),
                ..BasicTextStyle::new(12, 0.5, 1.0)
            },
            heading: BasicTextStyle::new(12, 1.5, 1.0),
            block_quote: BasicTextStyle {
                text_color: Some((90, 90, 90)),
                ..BasicTextStyle::new(12, 0.5, 1.0)
            },
            list_item: BasicTextStyle::new(12, 0.2, 0.2),
        }
    }
}
