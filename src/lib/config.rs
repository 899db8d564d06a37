//! Configuration module for styling and formatting PDF output.
//!
//! Styling is read from TOML. Every section is optional; anything missing keeps
//! its default from [`StyleMatch::default`].
//!
//! # Configuration Structure
//!
//! - `margin` controls page margins in millimetres (top, right, bottom, left)
//! - `page` selects the paper size (`a4`, `letter`, `legal`)
//! - `text` sets the body font family, base size, color and paragraph spacing
//! - `heading` sets heading color and spacing (sizes follow the heading level)
//! - `block_quote` and `list_item` set color and spacing for those blocks
//!
//! # Style Properties
//!
//! - `size` - Font size in points (integer)
//! - `fontfamily` - Font family name (string, `text` only)
//! - `textcolor` - Text color as RGB: `{ r = 0, g = 0, b = 0 }`
//! - `beforespacing` - Space before the block in millimetres (float)
//! - `afterspacing` - Space after the block in millimetres (float)
//!
//! # Configuration Example
//!
//! ```toml
//! [margin]
//! top = 15.0
//! right = 15.0
//! bottom = 15.0
//! left = 15.0
//!
//! [page]
//! size = "letter"
//!
//! [text]
//! size = 11
//! fontfamily = "Noto Sans CJK SC"
//!
//! [block_quote]
//! textcolor = { r = 80, g = 80, b = 80 }
//! ```

use crate::styling::{BasicTextStyle, Margins, PageSize, StyleMatch};
use crate::MdpError;
use log::warn;
use std::fs;
use toml::Value;

/// Name of the configuration file the CLI picks up from the working directory.
pub const DEFAULT_CONFIG_FILE: &str = "mdpdfrc.toml";

/// Configuration source for styling configuration.
#[derive(Debug, Clone)]
pub enum ConfigSource<'a> {
    /// Use default built-in styling configuration
    Default,
    /// Load configuration from a file path
    File(&'a str),
    /// Use an in-memory TOML string
    Embedded(&'a str),
}

/// Parses an RGB color stored under `field`.
fn parse_color(value: Option<&Value>, field: &str) -> Option<(u8, u8, u8)> {
    value.and_then(|c| {
        let color = c.get(field)?;
        let r = color.get("r")?.as_integer()?;
        let g = color.get("g")?.as_integer()?;
        let b = color.get("b")?.as_integer()?;
        Some((
            r.clamp(0, 255) as u8,
            g.clamp(0, 255) as u8,
            b.clamp(0, 255) as u8,
        ))
    })
}

/// Reads a float that may have been written as an integer (`top = 10`).
fn as_number(value: &Value) -> Option<f32> {
    value
        .as_float()
        .map(|f| f as f32)
        .or_else(|| value.as_integer().map(|i| i as f32))
}

/// Overlays the properties found in `value` on top of `default`.
fn parse_style(value: Option<&Value>, default: BasicTextStyle) -> BasicTextStyle {
    let mut style = default;
    if let Some(style_config) = value {
        if let Some(size) = style_config.get("size").and_then(|v| v.as_integer()) {
            style.size = size.clamp(1, u8::MAX as i64) as u8;
        }

        if let Some(spacing) = style_config.get("beforespacing").and_then(as_number) {
            style.before_spacing = spacing;
        }

        if let Some(spacing) = style_config.get("afterspacing").and_then(as_number) {
            style.after_spacing = spacing;
        }

        if let Some(color) = parse_color(Some(style_config), "textcolor") {
            style.text_color = Some(color);
        }

        if let Some(font) = style_config.get("fontfamily").and_then(|v| v.as_str()) {
            style.font_family = Some(font.to_string());
        }
    }
    style
}

fn parse_margins(value: Option<&Value>, default: Margins) -> Margins {
    let Some(margins) = value else {
        return default;
    };
    let side = |name: &str, fallback: f32| margins.get(name).and_then(as_number).unwrap_or(fallback);
    Margins {
        top: side("top", default.top),
        right: side("right", default.right),
        bottom: side("bottom", default.bottom),
        left: side("left", default.left),
    }
}

fn style_from_value(config: &Value) -> StyleMatch {
    let default_style = StyleMatch::default();
    let page_size = config
        .get("page")
        .and_then(|p| p.get("size"))
        .and_then(|s| s.as_str())
        .and_then(PageSize::from_name)
        .unwrap_or(default_style.page_size);

    StyleMatch {
        margins: parse_margins(config.get("margin"), default_style.margins),
        page_size,
        text: parse_style(config.get("text"), default_style.text),
        heading: parse_style(config.get("heading"), default_style.heading),
        block_quote: parse_style(config.get("block_quote"), default_style.block_quote),
        list_item: parse_style(config.get("list_item"), default_style.list_item),
    }
}

/// Parses a TOML configuration string and returns a complete StyleMatch.
///
/// Invalid TOML yields the default style.
///
/// # Example
/// ```rust
/// use mdpdf::config::parse_config_string;
///
/// let style = parse_config_string(r#"
/// [text]
/// size = 11
/// fontfamily = "DejaVu Sans"
///
/// [page]
/// size = "letter"
/// "#);
/// assert_eq!(style.text.size, 11);
/// assert_eq!(style.text.font_family.as_deref(), Some("DejaVu Sans"));
/// ```
pub fn parse_config_string(config_str: &str) -> StyleMatch {
    match toml::from_str::<Value>(config_str) {
        Ok(config) => style_from_value(&config),
        Err(e) => {
            warn!("ignoring invalid style configuration: {}", e);
            StyleMatch::default()
        }
    }
}

/// Loads styling from `source`, falling back to defaults on any problem.
///
/// # Examples
/// ```rust
/// use mdpdf::config::{ConfigSource, load_config_from_source};
///
/// let style = load_config_from_source(ConfigSource::Default);
/// assert_eq!(style.text.size, 12);
///
/// // Missing files fall back to the defaults
/// let style = load_config_from_source(ConfigSource::File("missing.toml"));
/// assert_eq!(style.text.size, 12);
/// ```
pub fn load_config_from_source(source: ConfigSource) -> StyleMatch {
    match source {
        ConfigSource::Default => StyleMatch::default(),
        ConfigSource::File(path) => match fs::read_to_string(path) {
            Ok(s) => parse_config_string(&s),
            Err(e) => {
                warn!("could not read config file '{}': {}", path, e);
                StyleMatch::default()
            }
        },
        ConfigSource::Embedded(content) => parse_config_string(content),
    }
}

/// Strict variant of [`load_config_from_source`]: unreadable files and invalid
/// TOML are reported instead of replaced by defaults.
pub fn try_load_config(source: ConfigSource) -> Result<StyleMatch, MdpError> {
    let content = match source {
        ConfigSource::Default => return Ok(StyleMatch::default()),
        ConfigSource::File(path) => fs::read_to_string(path).map_err(|e| MdpError::IoError {
            message: format!("Could not read configuration: {}", e),
            path: path.to_string(),
            suggestion: "Check the --config path or remove it to use defaults".to_string(),
        })?,
        ConfigSource::Embedded(content) => content.to_string(),
    };

    let value: Value = toml::from_str(&content).map_err(|e| MdpError::ConfigError {
        message: e.to_string(),
        suggestion: "Run with --get-default-configuration to see a valid file".to_string(),
    })?;
    Ok(style_from_value(&value))
}

fn color_line(color: Option<(u8, u8, u8)>) -> String {
    match color {
        Some((r, g, b)) => format!("textcolor = {{ r = {}, g = {}, b = {} }}\n", r, g, b),
        None => String::new(),
    }
}

fn style_section(name: &str, style: &BasicTextStyle, with_size: bool) -> String {
    let mut out = format!("[{}]\n", name);
    if with_size {
        out.push_str(&format!("size = {}\n", style.size));
    }
    if let Some(font) = &style.font_family {
        out.push_str(&format!("fontfamily = \"{}\"\n", font));
    }
    out.push_str(&color_line(style.text_color));
    out.push_str(&format!("beforespacing = {:?}\n", style.before_spacing));
    out.push_str(&format!("afterspacing = {:?}\n", style.after_spacing));
    out
}

/// The default configuration rendered as TOML, for `--get-default-configuration`.
pub fn default_config_toml() -> String {
    let style = StyleMatch::default();
    let mut out = String::from("# mdpdf style configuration\n\n");
    out.push_str(&format!(
        "[margin]\ntop = {:?}\nright = {:?}\nbottom = {:?}\nleft = {:?}\n\n",
        style.margins.top, style.margins.right, style.margins.bottom, style.margins.left
    ));
    out.push_str(&format!("[page]\nsize = \"{}\"\n\n", style.page_size.name()));
    out.push_str(&style_section("text", &style.text, true));
    out.push('\n');
    out.push_str("# heading sizes follow the level: 16 - 2 * level\n");
    out.push_str(&style_section("heading", &style.heading, false));
    out.push('\n');
    out.push_str(&style_section("block_quote", &style.block_quote, true));
    out.push('\n');
    out.push_str(&style_section("list_item", &style.list_item, true));
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_parse_color() {
        let color_toml: Value = toml::from_str(
            r#"
            color = { r = 255, g = 128, b = 64 }
        "#,
        )
        .unwrap();
        assert_eq!(
            parse_color(Some(&color_toml), "color"),
            Some((255, 128, 64))
        );

        assert_eq!(parse_color(None, "color"), None);

        let invalid_color: Value = toml::from_str(
            r#"
            color = { r = 255, g = 128 }
        "#,
        )
        .unwrap();
        assert_eq!(parse_color(Some(&invalid_color), "color"), None);

        let out_of_range: Value = toml::from_str(
            r#"
            color = { r = 300, g = -4, b = 7 }
        "#,
        )
        .unwrap();
        assert_eq!(parse_color(Some(&out_of_range), "color"), Some((255, 0, 7)));
    }

    #[test]
    fn test_parse_style() {
        let style_toml: Value = toml::from_str(
            r#"
            [style]
            size = 14
            beforespacing = 1.5
            afterspacing = 2
            textcolor = { r = 0, g = 0, b = 0 }
            fontfamily = "DejaVu Serif"
            "#,
        )
        .unwrap();

        let parsed = parse_style(style_toml.get("style"), BasicTextStyle::default());
        assert_eq!(parsed.size, 14);
        assert_eq!(parsed.before_spacing, 1.5);
        assert_eq!(parsed.after_spacing, 2.0);
        assert_eq!(parsed.text_color, Some((0, 0, 0)));
        assert_eq!(parsed.font_family.as_deref(), Some("DejaVu Serif"));
    }

    #[test]
    fn test_parse_style_invalid_values() {
        let invalid_style: Value = toml::from_str(
            r#"
            [style]
            size = "invalid"
            beforespacing = true
            "#,
        )
        .unwrap();

        let default_style = BasicTextStyle::default();
        let parsed = parse_style(invalid_style.get("style"), default_style.clone());
        assert_eq!(parsed, default_style);
    }

    #[test]
    fn test_parse_config_string() {
        let style = parse_config_string(
            r#"
            [margin]
            top = 10.0
            right = 12
            left = 12.0

            [page]
            size = "legal"

            [text]
            size = 11

            [heading]
            textcolor = { r = 50, g = 50, b = 50 }
        "#,
        );

        assert_eq!(style.margins.top, 10.0);
        assert_eq!(style.margins.right, 12.0);
        assert_eq!(style.margins.bottom, Margins::default().bottom);
        assert_eq!(style.margins.left, 12.0);
        assert_eq!(style.page_size, PageSize::Legal);
        assert_eq!(style.text.size, 11);
        assert_eq!(style.text.font_family.as_deref(), Some("SimSun"));
        assert_eq!(style.heading.text_color, Some((50, 50, 50)));
    }

    #[test]
    fn test_invalid_toml_falls_back_to_default() {
        let style = parse_config_string("this is not valid toml {{{");
        assert_eq!(style, StyleMatch::default());
    }

    #[test]
    fn test_unknown_page_size_keeps_default() {
        let style = parse_config_string("[page]\nsize = \"tabloid\"\n");
        assert_eq!(style.page_size, PageSize::A4);
    }

    #[test]
    fn test_load_config_sources() {
        assert_eq!(load_config_from_source(ConfigSource::Default), StyleMatch::default());
        assert_eq!(
            load_config_from_source(ConfigSource::File("nonexistent.toml")),
            StyleMatch::default()
        );
        let style = load_config_from_source(ConfigSource::Embedded("[text]\nsize = 9\n"));
        assert_eq!(style.text.size, 9);
    }

    #[test]
    fn test_load_config_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[list_item]\nafterspacing = 3.5").unwrap();
        let path = file.path().to_str().unwrap().to_string();
        let style = load_config_from_source(ConfigSource::File(&path));
        assert_eq!(style.list_item.after_spacing, 3.5);
    }

    #[test]
    fn test_try_load_config_reports_errors() {
        assert!(matches!(
            try_load_config(ConfigSource::Embedded("[[[")),
            Err(MdpError::ConfigError { .. })
        ));
        assert!(matches!(
            try_load_config(ConfigSource::File("/nonexistent/mdpdfrc.toml")),
            Err(MdpError::IoError { .. })
        ));
        assert!(try_load_config(ConfigSource::Embedded("[text]\nsize = 10\n")).is_ok());
    }

    #[test]
    fn test_default_config_round_trips() {
        let toml = default_config_toml();
        assert_eq!(parse_config_string(&toml), StyleMatch::default());
        assert!(try_load_config(ConfigSource::Embedded(&toml)).is_ok());
    }
}
