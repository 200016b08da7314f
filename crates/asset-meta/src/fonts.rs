//! Font family grouping
//!
//! Font files are grouped into families by file-name convention:
//! `<family><sep><style>` where `<sep>` is `_`, `-` or a space and `<style>`
//! is a weight name optionally followed by `italic` (`lato_bold`,
//! `Lato-BoldItalic`, `lato_semi_bold`). A stem without a recognised style
//! suffix is the regular style of a family named after the whole stem.
//!
//! Classification is pure so the heuristic can be replaced without touching
//! any of the linkers.

use std::collections::BTreeMap;
use std::fmt;

use crate::asset::{AssetRecord, sanitize_resource_name};

const SEPARATORS: [char; 3] = ['_', '-', ' '];

/// Weight and slant of one font file within its family.
///
/// Ordered by weight, upright before italic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FontStyle {
    pub weight: u16,
    pub italic: bool,
}

impl FontStyle {
    pub const REGULAR: FontStyle = FontStyle::new(400, false);
    pub const BOLD: FontStyle = FontStyle::new(700, false);
    pub const ITALIC: FontStyle = FontStyle::new(400, true);
    pub const BOLD_ITALIC: FontStyle = FontStyle::new(700, true);

    pub const fn new(weight: u16, italic: bool) -> Self {
        Self { weight, italic }
    }

    /// Value for Android's `app:fontStyle` attribute.
    pub fn android_font_style(&self) -> &'static str {
        if self.italic { "italic" } else { "normal" }
    }

    fn weight_name(&self) -> &'static str {
        match self.weight {
            100 => "thin",
            200 => "extraLight",
            300 => "light",
            400 => "regular",
            500 => "medium",
            600 => "semiBold",
            700 => "bold",
            800 => "extraBold",
            900 => "black",
            _ => "custom",
        }
    }
}

impl fmt::Display for FontStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.weight, self.italic) {
            (400, true) => f.write_str("italic"),
            (_, true) => write!(f, "{}Italic", self.weight_name()),
            (_, false) => f.write_str(self.weight_name()),
        }
    }
}

/// Family and style decoded from a font file stem.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedFontName {
    pub family: String,
    pub style: FontStyle,
}

/// Decides which family and style a font file belongs to.
pub trait FontClassifier: Send + Sync + fmt::Debug {
    fn classify(&self, file_stem: &str) -> ParsedFontName;
}

/// The default suffix-based classifier described in the module docs.
#[derive(Debug, Default, Clone, Copy)]
pub struct SuffixClassifier;

impl FontClassifier for SuffixClassifier {
    fn classify(&self, file_stem: &str) -> ParsedFontName {
        let separators: Vec<usize> = file_stem
            .char_indices()
            .filter(|(_, c)| SEPARATORS.contains(c))
            .map(|(i, _)| i)
            .collect();

        // Two-token suffixes first so `bold_italic` is not read as `italic`
        let candidates = separators.iter().rev().take(2).rev();
        for &split in candidates {
            let suffix: String = file_stem[split + 1..]
                .chars()
                .filter(|c| !SEPARATORS.contains(c))
                .collect::<String>()
                .to_ascii_lowercase();
            let family = file_stem[..split].trim_end_matches(SEPARATORS);

            if family.is_empty() {
                continue;
            }
            if let Some(style) = parse_style(&suffix) {
                return ParsedFontName {
                    family: family.to_string(),
                    style,
                };
            }
        }

        ParsedFontName {
            family: file_stem.to_string(),
            style: FontStyle::REGULAR,
        }
    }
}

fn parse_style(token: &str) -> Option<FontStyle> {
    let (base, italic) = match token
        .strip_suffix("italic")
        .or_else(|| token.strip_suffix("oblique"))
    {
        Some(rest) => (rest, true),
        None => (token, false),
    };

    let weight = match base {
        "" if italic => 400,
        "thin" | "hairline" => 100,
        "extralight" | "ultralight" => 200,
        "light" => 300,
        "regular" | "normal" | "book" => 400,
        "medium" => 500,
        "semibold" | "demibold" => 600,
        "bold" => 700,
        "extrabold" | "ultrabold" => 800,
        "black" | "heavy" => 900,
        _ => return None,
    };
    Some(FontStyle::new(weight, italic))
}

/// One logical font: every style variant sharing a family name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FontGroup {
    /// Display name as written in the first file of the family
    pub family: String,
    /// Sanitized name used for the Android `res/font/<name>.xml` descriptor
    pub resource_name: String,
    pub styles: BTreeMap<FontStyle, AssetRecord>,
}

impl FontGroup {
    fn new(family: &str) -> Self {
        Self {
            family: family.to_string(),
            resource_name: sanitize_resource_name(family),
            styles: BTreeMap::new(),
        }
    }
}

/// Group font records into families.
///
/// Non-font records are ignored. Records are visited in path order so the
/// result is deterministic; groups are returned sorted by resource name.
/// When two files claim the same family and style, the second becomes a
/// standalone family named after its own stem.
pub fn group_fonts(classifier: &dyn FontClassifier, records: &[AssetRecord]) -> Vec<FontGroup> {
    let mut fonts: Vec<&AssetRecord> = records.iter().filter(|r| r.is_font()).collect();
    fonts.sort();

    let mut groups: BTreeMap<String, FontGroup> = BTreeMap::new();

    for record in fonts {
        let parsed = classifier.classify(record.file_stem());
        let key = sanitize_resource_name(&parsed.family);
        let group = groups
            .entry(key)
            .or_insert_with(|| FontGroup::new(&parsed.family));

        if !group.styles.contains_key(&parsed.style) {
            group.styles.insert(parsed.style, record.clone());
            continue;
        }

        tracing::warn!(
            file = %record.relative_path,
            family = %parsed.family,
            style = %parsed.style,
            "font style already taken in family, linking as its own family"
        );
        let stem = record.file_stem();
        let standalone = groups
            .entry(sanitize_resource_name(stem))
            .or_insert_with(|| FontGroup::new(stem));
        standalone
            .styles
            .entry(FontStyle::REGULAR)
            .or_insert_with(|| record.clone());
    }

    groups.into_values().collect()
}
