//! Font discovery and loading.
//!
//! A font family is looked up by name through a chain of [`FontResolver`]s:
//! user supplied font directories first, then the fonts installed on the
//! system. If neither knows the family, a few common sans families are tried,
//! and as a last resort the PDF built-in Helvetica family is used with metrics
//! taken from any usable system font.

use std::fs;
use std::path::PathBuf;
use std::sync::Arc;

use fontdb::{Database, Family, Query, Source, Style, Weight};
use genpdfi_extended::error::{Error, ErrorKind};
use genpdfi_extended::fonts::{FontData, FontFamily};
use log::{debug, info, warn};
use printpdf::BuiltinFont;
use rusttype::Font;

use crate::MdpError;

/// Family used when neither the CLI nor the style configuration names one.
pub const DEFAULT_FONT_FAMILY: &str = "SimSun";

/// Families tried, in order, when the requested one cannot be found.
const FALLBACK_FAMILIES: &[&str] = &[
    "DejaVu Sans",
    "Liberation Sans",
    "Noto Sans",
    "Arial",
    "Helvetica",
];

/// Returns common aliases for a font name.
///
/// This allows users to specify "Arial" and have the system try
/// "Helvetica", "Liberation Sans", etc.
fn get_font_aliases(name: &str) -> Vec<&'static str> {
    match name.to_lowercase().as_str() {
        "arial" => vec!["Helvetica", "Liberation Sans", "FreeSans"],
        "helvetica" => vec!["Arial", "Liberation Sans", "FreeSans"],
        "times new roman" | "times" => {
            vec!["Times", "Times New Roman", "Liberation Serif", "FreeSerif"]
        }
        "courier new" | "courier" => vec!["Courier", "Courier New", "Liberation Mono", "FreeMono"],
        "verdana" => vec!["DejaVu Sans", "Bitstream Vera Sans"],
        "georgia" => vec!["Liberation Serif", "FreeSerif"],
        "simsun" | "宋体" => vec!["NSimSun", "Noto Serif CJK SC", "Noto Sans CJK SC", "WenQuanYi Micro Hei"],
        _ => vec![],
    }
}

/// Font style variant types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FontVariant {
    Regular,
    Bold,
    Italic,
    BoldItalic,
}

impl FontVariant {
    pub fn from_flags(bold: bool, italic: bool) -> Self {
        match (bold, italic) {
            (false, false) => FontVariant::Regular,
            (true, false) => FontVariant::Bold,
            (false, true) => FontVariant::Italic,
            (true, true) => FontVariant::BoldItalic,
        }
    }

    /// Returns common naming suffixes for this variant
    fn suffixes(&self) -> &[&str] {
        match self {
            FontVariant::Regular => &["Regular", ""],
            FontVariant::Bold => &["Bold", "Bd", "B"],
            FontVariant::Italic => &["Italic", "It", "I", "Oblique"],
            FontVariant::BoldItalic => &["BoldItalic", "Bold Italic", "BoldIt", "BdIt", "BI"],
        }
    }

    fn is_bold(&self) -> bool {
        matches!(self, FontVariant::Bold | FontVariant::BoldItalic)
    }

    fn is_italic(&self) -> bool {
        matches!(self, FontVariant::Italic | FontVariant::BoldItalic)
    }
}

/// Configuration for custom font loading.
/// Allows users to specify custom font paths and override default font selections.
#[derive(Debug, Clone, Default)]
pub struct FontConfig {
    /// Custom font directories or files to search
    pub custom_paths: Vec<PathBuf>,
    /// Override for the text font (if None, uses the style config)
    pub default_font: Option<String>,
}

/// Source of font bytes for a family name and style.
pub trait FontResolver {
    /// Short label used in log output.
    fn name(&self) -> &str;

    /// Returns the bytes of a usable TrueType/OpenType face, if one is known.
    fn resolve(&self, family: &str, bold: bool, italic: bool) -> Option<Vec<u8>>;
}

fn is_usable_font(bytes: &[u8]) -> bool {
    Font::try_from_bytes(bytes).is_some()
}

fn has_font_extension(path: &std::path::Path) -> bool {
    path.extension()
        .and_then(|s| s.to_str())
        .map_or(false, |ext| {
            ext.eq_ignore_ascii_case("ttf") || ext.eq_ignore_ascii_case("otf")
        })
}

/// Looks for font files in user supplied directories or explicit files.
///
/// File names are matched against the usual variant spellings:
/// `DejaVuSans-Bold.ttf`, `DejaVuSansBold.ttf`, `dejavu_sans_bold.ttf`, ...
#[derive(Debug, Clone, Default)]
pub struct DirectoryFontResolver {
    paths: Vec<PathBuf>,
}

impl DirectoryFontResolver {
    pub fn new(paths: Vec<PathBuf>) -> Self {
        Self { paths }
    }

    fn candidate_files(&self) -> Vec<PathBuf> {
        let mut files = Vec::new();
        for path in &self.paths {
            if path.is_file() {
                files.push(path.clone());
            } else if path.is_dir() {
                let Ok(entries) = fs::read_dir(path) else {
                    warn!("could not read font directory {:?}", path);
                    continue;
                };
                let mut found: Vec<PathBuf> = entries
                    .flatten()
                    .map(|e| e.path())
                    .filter(|p| has_font_extension(p))
                    .collect();
                found.sort();
                files.extend(found);
            }
        }
        files
    }
}

/// Whether `file_lower` looks like the `variant` face of one of `bases`.
fn matches_variant(file_lower: &str, bases: &[String], variant: FontVariant) -> bool {
    for suffix in variant.suffixes() {
        for base in bases {
            let patterns = if suffix.is_empty() {
                vec![format!("{}.ttf", base), format!("{}.otf", base)]
            } else {
                let suf = suffix.to_lowercase();
                vec![
                    format!("{}-{}.ttf", base, suf),
                    format!("{}{}.ttf", base, suf),
                    format!("{}_{}.ttf", base, suf),
                    format!("{} {}.ttf", base, suf),
                    format!("{}-{}.otf", base, suf),
                    format!("{}{}.otf", base, suf),
                ]
            };
            if patterns.iter().any(|p| file_lower.contains(p.as_str())) {
                return true;
            }
        }
    }
    false
}

impl FontResolver for DirectoryFontResolver {
    fn name(&self) -> &str {
        "font directories"
    }

    fn resolve(&self, family: &str, bold: bool, italic: bool) -> Option<Vec<u8>> {
        let variant = FontVariant::from_flags(bold, italic);
        let raw = family.to_lowercase();
        let bases = vec![
            raw.clone(),
            raw.replace(' ', ""),
            raw.replace(' ', "-"),
            raw.replace(' ', "_"),
        ];
        let files = self.candidate_files();

        let read_valid = |path: &PathBuf| -> Option<Vec<u8>> {
            let bytes = fs::read(path).ok()?;
            if is_usable_font(&bytes) {
                Some(bytes)
            } else {
                debug!("skipping unusable font file {:?}", path);
                None
            }
        };

        for path in &files {
            let Some(file_name) = path.file_name().and_then(|n| n.to_str()) else {
                continue;
            };
            if matches_variant(&file_name.to_lowercase(), &bases, variant) {
                if let Some(bytes) = read_valid(path) {
                    debug!("found {:?} face of '{}' at {:?}", variant, family, path);
                    return Some(bytes);
                }
            }
        }

        // A single file carrying the family name serves as the regular face.
        if variant == FontVariant::Regular {
            for path in &files {
                let Some(file_name) = path.file_name().and_then(|n| n.to_str()) else {
                    continue;
                };
                let file_lower = file_name.to_lowercase();
                if bases.iter().any(|b| file_lower.contains(b.as_str())) {
                    if let Some(bytes) = read_valid(path) {
                        return Some(bytes);
                    }
                }
            }
        }
        None
    }
}

/// Resolves fonts installed on the system through `fontdb`.
pub struct SystemFontResolver {
    db: Database,
}

impl SystemFontResolver {
    pub fn new() -> Self {
        let mut db = Database::new();
        db.load_system_fonts();
        debug!("loaded {} system font face(s)", db.len());
        Self { db }
    }
}

impl Default for SystemFontResolver {
    fn default() -> Self {
        Self::new()
    }
}

impl FontResolver for SystemFontResolver {
    fn name(&self) -> &str {
        "system fonts"
    }

    fn resolve(&self, family: &str, bold: bool, italic: bool) -> Option<Vec<u8>> {
        let families = [Family::Name(family)];
        let query = Query {
            families: &families,
            weight: if bold { Weight::BOLD } else { Weight::NORMAL },
            style: if italic { Style::Italic } else { Style::Normal },
            ..Query::default()
        };
        let id = self.db.query(&query)?;

        // rusttype only reads the first face of a collection
        if let Some(face) = self.db.face(id) {
            if let Source::File(path) = &face.source {
                let is_ttc = path
                    .extension()
                    .and_then(|s| s.to_str())
                    .map_or(false, |ext| ext.eq_ignore_ascii_case("ttc"));
                if is_ttc || face.index != 0 {
                    debug!("skipping collection face {:?} for '{}'", path, family);
                    return None;
                }
            }
        }

        let bytes = self.db.with_face_data(id, |data, _| data.to_vec())?;
        is_usable_font(&bytes).then_some(bytes)
    }
}

/// Builds a family out of whatever faces `resolver` knows for `name`.
///
/// The regular face is required. Missing bold or italic faces reuse the
/// regular one; a missing bold italic face reuses bold.
pub fn family_from_resolver(
    resolver: &dyn FontResolver,
    name: &str,
) -> Option<FontFamily<FontData>> {
    let regular_bytes = resolver.resolve(name, false, false)?;
    let regular = FontData::new(regular_bytes, None).ok()?;

    let load = |variant: FontVariant, fallback: &FontData| -> FontData {
        resolver
            .resolve(name, variant.is_bold(), variant.is_italic())
            .and_then(|bytes| FontData::new(bytes, None).ok())
            .unwrap_or_else(|| {
                debug!("no {:?} face for '{}', reusing a sibling face", variant, name);
                fallback.clone()
            })
    };

    let bold = load(FontVariant::Bold, &regular);
    let italic = load(FontVariant::Italic, &regular);
    let bold_italic = load(FontVariant::BoldItalic, &bold);

    Some(FontFamily {
        regular,
        bold,
        italic,
        bold_italic,
    })
}

/// Tries each resolver in turn for `name`.
pub fn load_with_resolvers(
    name: &str,
    resolvers: &[&dyn FontResolver],
) -> Option<FontFamily<FontData>> {
    resolvers.iter().find_map(|resolver| {
        let family = family_from_resolver(*resolver, name)?;
        info!("Using font '{}' from {}", name, resolver.name());
        Some(family)
    })
}

fn is_builtin_name(name: &str) -> bool {
    matches!(
        name.to_lowercase().as_str(),
        "helvetica"
            | "sans"
            | "sans-serif"
            | "times"
            | "timesnewroman"
            | "serif"
            | "courier"
            | "couriernew"
            | "monospace"
    )
}

/// Loads the text font family for a conversion.
///
/// The family is `config.default_font`, else `style_family`, else
/// [`DEFAULT_FONT_FAMILY`]. It is searched in `config.custom_paths` and then
/// among system fonts, together with its aliases and a few common sans
/// families. The PDF built-in Helvetica family is the last resort.
pub fn load_font_family(
    config: &FontConfig,
    style_family: Option<&str>,
) -> Result<FontFamily<FontData>, MdpError> {
    let name = config
        .default_font
        .as_deref()
        .or(style_family)
        .unwrap_or(DEFAULT_FONT_FAMILY);

    if is_builtin_name(name) {
        return load_builtin_font_family(name)
            .map_err(|e| MdpError::font_error(name, e.to_string()));
    }

    let directories = DirectoryFontResolver::new(config.custom_paths.clone());
    let system = SystemFontResolver::new();
    let mut resolvers: Vec<&dyn FontResolver> = Vec::new();
    if !config.custom_paths.is_empty() {
        resolvers.push(&directories);
    }
    resolvers.push(&system);

    let mut candidates = vec![name];
    candidates.extend(get_font_aliases(name));
    candidates.extend(FALLBACK_FAMILIES.iter().copied());

    for candidate in candidates {
        if let Some(family) = load_with_resolvers(candidate, &resolvers) {
            if !candidate.eq_ignore_ascii_case(name) {
                warn!("Font '{}' not found, using '{}' instead", name, candidate);
            }
            return Ok(family);
        }
    }

    warn!("Font '{}' not found, falling back to built-in Helvetica", name);
    load_builtin_font_family("helvetica").map_err(|e| MdpError::font_error(name, e.to_string()))
}

/// Loads a PDF built-in font family (Helvetica, Times or Courier).
///
/// Built-in fonts are not embedded; the layout engine still needs glyph
/// metrics, which are taken from a matching system font or, failing that,
/// from any usable system font.
pub fn load_builtin_font_family(name: &str) -> Result<FontFamily<FontData>, Error> {
    let builtin_variants = match name.to_lowercase().as_str() {
        "times" | "timesnewroman" | "times new roman" | "serif" => BuiltinVariants::Times,
        "courier" | "couriernew" | "courier new" | "monospace" => BuiltinVariants::Courier,
        _ => BuiltinVariants::Helvetica,
    };

    let candidates = match builtin_variants {
        BuiltinVariants::Times => &["Times New Roman", "Times", "Liberation Serif"],
        BuiltinVariants::Courier => &["Courier New", "Courier", "Liberation Mono"],
        BuiltinVariants::Helvetica => &["Helvetica", "Arial", "Liberation Sans"],
    };

    let font_bytes = Arc::new(load_system_font_bytes_fallback(candidates)?);

    let mk_data = |variant: FontVariant| -> Result<FontData, Error> {
        let builtin = builtin_variants.variant(variant);
        FontData::new_shared(font_bytes.clone(), Some(builtin))
    };

    Ok(FontFamily {
        regular: mk_data(FontVariant::Regular)?,
        bold: mk_data(FontVariant::Bold)?,
        italic: mk_data(FontVariant::Italic)?,
        bold_italic: mk_data(FontVariant::BoldItalic)?,
    })
}

enum BuiltinVariants {
    Helvetica,
    Times,
    Courier,
}

impl BuiltinVariants {
    fn variant(&self, style: FontVariant) -> BuiltinFont {
        match self {
            BuiltinVariants::Helvetica => match style {
                FontVariant::Regular => BuiltinFont::Helvetica,
                FontVariant::Bold => BuiltinFont::HelveticaBold,
                FontVariant::Italic => BuiltinFont::HelveticaOblique,
                FontVariant::BoldItalic => BuiltinFont::HelveticaBoldOblique,
            },
            BuiltinVariants::Times => match style {
                FontVariant::Regular => BuiltinFont::TimesRoman,
                FontVariant::Bold => BuiltinFont::TimesBold,
                FontVariant::Italic => BuiltinFont::TimesItalic,
                FontVariant::BoldItalic => BuiltinFont::TimesBoldItalic,
            },
            BuiltinVariants::Courier => match style {
                FontVariant::Regular => BuiltinFont::Courier,
                FontVariant::Bold => BuiltinFont::CourierBold,
                FontVariant::Italic => BuiltinFont::CourierOblique,
                FontVariant::BoldItalic => BuiltinFont::CourierBoldOblique,
            },
        }
    }
}

/// Finds a system font for built-in font metrics, preferring `candidates`.
fn load_system_font_bytes_fallback(candidates: &[&str]) -> Result<Vec<u8>, Error> {
    let mut db = Database::new();
    db.load_system_fonts();

    let font_files: Vec<PathBuf> = db
        .faces()
        .filter_map(|face| match &face.source {
            Source::File(p) if has_font_extension(p) => Some(p.clone()),
            _ => None,
        })
        .collect();

    let preferred = font_files.iter().filter(|path| {
        let file_name = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("")
            .to_lowercase()
            .replace(' ', "");
        candidates
            .iter()
            .any(|cand| file_name.contains(&cand.to_lowercase().replace(' ', "")))
    });

    for path in preferred.chain(font_files.iter()) {
        if let Ok(bytes) = fs::read(path) {
            if is_usable_font(&bytes) {
                debug!("using {:?} for built-in font metrics", path);
                return Ok(bytes);
            }
        }
    }

    Err(Error::new(
        "No usable system font found for built-in font metrics".to_string(),
        ErrorKind::InvalidFont,
    ))
}
