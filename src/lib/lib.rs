//! The mdpdf library converts Markdown into styled PDF documents.
//!
//! The pipeline has three stages. Markdown is turned into HTML by
//! `pulldown-cmark`, the HTML is parsed by `html5ever` and walked into a
//! document model of styled blocks, and the model is laid out into a PDF by
//! `genpdfi_extended`.
//!
//! Basic usage involves passing Markdown content as a string along with an output path:
//! ```rust,no_run
//! use mdpdf::config::ConfigSource;
//! use std::error::Error;
//!
//! fn example() -> Result<(), Box<dyn Error>> {
//!     let markdown = "# Hello World\nThis is a test.".to_string();
//!     mdpdf::parse_into_file(markdown, "output.pdf", ConfigSource::Default, None)?;
//!     Ok(())
//! }
//! ```
//!
//! The intermediate model can be inspected without rendering anything:
//! ```rust
//! let doc = mdpdf::markdown_to_document("# Title\n\n- **one**\n- two\n").unwrap();
//! assert_eq!(doc.len(), 3);
//! assert_eq!(doc.title().as_deref(), Some("Title"));
//! assert_eq!(doc.blocks()[1].plain_text(), "• one");
//! ```
//!
//! Styling is read from a TOML file (`mdpdfrc.toml`):
//! ```toml
//! [margin]
//! top = 15.0
//! bottom = 15.0
//!
//! [page]
//! size = "letter"
//!
//! [text]
//! size = 11
//! fontfamily = "Noto Sans CJK SC"
//!
//! [block_quote]
//! textcolor = { r = 90, g = 90, b = 90 }
//! ```
//!
//! ## Conversion Flow
//! ```text
//! +-------------+     +----------------+     +------------------+
//! |  Markdown   |     |  HTML tree     |     |  Document model  |
//! |  # Title    | --> |  <h1>Title</h1>| --> |  Block h1 "Title"|
//! |  * Item     |     |  <ul><li>..    |     |  Block "• Item"  |
//! +-------------+     +----------------+     +------------------+
//!                                                     |
//! +---------------+     +------------------+          v
//! | Styling       |     | Font Loading     |     +--------------+
//! | - Margins     | --> | - Font dirs      | --> | PDF document |
//! | - Colors      |     | - System fonts   |     +--------------+
//! +---------------+     +------------------+
//! ```

pub mod config;
mod debug;
pub mod fonts;
pub mod html;
pub mod markdown;
pub mod model;
pub mod pdf;
pub mod styling;
pub mod validation;
pub mod walker;

use fonts::FontConfig;
use log::debug;
use model::Document;
use pdf::Pdf;
use std::error::Error;
use std::fmt;

/// Represents errors that can occur during the markdown-to-pdf conversion process.
#[derive(Debug)]
pub enum MdpError {
    /// The HTML produced from the Markdown could not be read
    ParseError {
        message: String,
        position: Option<usize>,
        suggestion: Option<String>,
    },
    /// Indicates an error occurred during PDF file generation
    PdfError {
        message: String,
        path: Option<String>,
        suggestion: Option<String>,
    },
    /// Indicates a font loading error
    FontError {
        font_name: String,
        message: String,
        suggestion: String,
    },
    /// Indicates an invalid configuration
    ConfigError { message: String, suggestion: String },
    /// Indicates an I/O error
    IoError {
        message: String,
        path: String,
        suggestion: String,
    },
}

impl Error for MdpError {}
impl fmt::Display for MdpError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            MdpError::ParseError {
                message,
                position,
                suggestion,
            } => {
                write!(f, "❌ Parsing Error: {}", message)?;
                if let Some(pos) = position {
                    write!(f, " (at position {})", pos)?;
                }
                if let Some(hint) = suggestion {
                    write!(f, "\n💡 Suggestion: {}", hint)?;
                }
                Ok(())
            }
            MdpError::PdfError {
                message,
                path,
                suggestion,
            } => {
                write!(f, "❌ PDF Generation Error: {}", message)?;
                if let Some(p) = path {
                    write!(f, "\n📁 Path: {}", p)?;
                }
                if let Some(hint) = suggestion {
                    write!(f, "\n💡 Suggestion: {}", hint)?;
                }
                Ok(())
            }
            MdpError::FontError {
                font_name,
                message,
                suggestion,
            } => {
                write!(f, "❌ Font Error: Failed to load font '{}'", font_name)?;
                write!(f, "\n   Reason: {}", message)?;
                write!(f, "\n💡 Suggestion: {}", suggestion)?;
                Ok(())
            }
            MdpError::ConfigError {
                message,
                suggestion,
            } => {
                write!(f, "❌ Configuration Error: {}", message)?;
                write!(f, "\n💡 Suggestion: {}", suggestion)?;
                Ok(())
            }
            MdpError::IoError {
                message,
                path,
                suggestion,
            } => {
                write!(f, "❌ File Error: {}", message)?;
                write!(f, "\n📁 Path: {}", path)?;
                write!(f, "\n💡 Suggestion: {}", suggestion)?;
                Ok(())
            }
        }
    }
}

impl MdpError {
    /// Creates a simple parse error with just a message
    pub fn parse_error(message: impl Into<String>) -> Self {
        MdpError::ParseError {
            message: message.into(),
            position: None,
            suggestion: Some(
                "Check the input for badly encoded content or excessive nesting".to_string(),
            ),
        }
    }

    /// Creates a font error for `font_name`
    pub fn font_error(font_name: impl Into<String>, message: impl Into<String>) -> Self {
        MdpError::FontError {
            font_name: font_name.into(),
            message: message.into(),
            suggestion: "Install a TrueType font or point --font-path at a directory of .ttf files"
                .to_string(),
        }
    }
}

/// Converts Markdown into the styled document model without rendering it.
pub fn markdown_to_document(markdown: &str) -> Result<Document, MdpError> {
    let html = markdown::to_html(markdown);
    debug!("markdown produced {} bytes of HTML", html.len());
    walker::html_to_document(&html)
}

fn build_pdf(
    markdown: &str,
    config: config::ConfigSource,
    font_config: Option<&FontConfig>,
) -> Result<Pdf, MdpError> {
    let document = markdown_to_document(markdown)?;
    let style = config::load_config_from_source(config);
    let default_fonts = FontConfig::default();
    Pdf::with_font_config(document, style, font_config.unwrap_or(&default_fonts))
}

/// Transforms Markdown content into a styled PDF document and saves it to the specified path.
///
/// Styling comes from `config`; a missing or invalid configuration falls back
/// to the defaults. Fonts are looked up through `font_config` first.
///
/// # Example
/// ```rust,no_run
/// use std::error::Error;
/// use mdpdf::config::ConfigSource;
/// use mdpdf::fonts::FontConfig;
///
/// fn example() -> Result<(), Box<dyn Error>> {
///     let markdown = "# Hello World\nThis is a test.".to_string();
///
///     mdpdf::parse_into_file(markdown.clone(), "output1.pdf", ConfigSource::Default, None)?;
///     mdpdf::parse_into_file(markdown.clone(), "output2.pdf", ConfigSource::File("mdpdfrc.toml"), None)?;
///
///     let font_config = FontConfig {
///         custom_paths: vec!["./fonts".into()],
///         default_font: Some("Noto Sans".to_string()),
///     };
///     mdpdf::parse_into_file(markdown, "output3.pdf", ConfigSource::Default, Some(&font_config))?;
///     Ok(())
/// }
/// ```
pub fn parse_into_file(
    markdown: String,
    path: &str,
    config: config::ConfigSource,
    font_config: Option<&FontConfig>,
) -> Result<(), MdpError> {
    if let Some(parent) = std::path::Path::new(path).parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            return Err(MdpError::IoError {
                message: "Output directory does not exist".to_string(),
                path: parent.display().to_string(),
                suggestion: format!("Create the directory first: mkdir -p {}", parent.display()),
            });
        }
    }

    let pdf = build_pdf(&markdown, config, font_config)?;
    let document = pdf.render_into_document();

    if let Some(err) = Pdf::render(document, path) {
        return Err(MdpError::PdfError {
            message: err.clone(),
            path: Some(path.to_string()),
            suggestion: Some(if err.contains("Permission") || err.contains("denied") {
                "Check that you have write permissions for this location".to_string()
            } else if err.contains("No such file") {
                "Make sure the output directory exists".to_string()
            } else {
                "Try a different output path or check available disk space".to_string()
            }),
        });
    }

    Ok(())
}

/// Transforms Markdown content into a styled PDF document and returns the PDF data as bytes.
///
/// # Example
/// ```rust,no_run
/// use mdpdf::config::ConfigSource;
///
/// const EMBEDDED: &str = r#"
///     [text]
///     size = 11
/// "#;
/// let pdf_bytes = mdpdf::parse_into_bytes(
///     "# Hello World\nThis is a test.".to_string(),
///     ConfigSource::Embedded(EMBEDDED),
///     None,
/// ).unwrap();
/// std::fs::write("output.pdf", pdf_bytes).unwrap();
/// ```
pub fn parse_into_bytes(
    markdown: String,
    config: config::ConfigSource,
    font_config: Option<&FontConfig>,
) -> Result<Vec<u8>, MdpError> {
    let pdf = build_pdf(&markdown, config, font_config)?;
    let document = pdf.render_into_document();

    Pdf::render_to_bytes(document).map_err(|err| MdpError::PdfError {
        message: err,
        path: None,
        suggestion: Some("Check available memory and try with a smaller document".to_string()),
    })
}
