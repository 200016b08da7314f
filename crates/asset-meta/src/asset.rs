//! Discovered asset records

use std::cmp::Ordering;

use asset_fs::NormalizedPath;
use serde::{Deserialize, Serialize};

/// Broad category of an asset, decided by file extension alone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AssetKind {
    Font,
    Image,
    Audio,
    Document,
    Other,
}

impl AssetKind {
    /// Classify an extension (without the leading dot, any case).
    pub fn from_extension(extension: &str) -> Self {
        match extension.to_ascii_lowercase().as_str() {
            "ttf" | "otf" => Self::Font,
            "png" | "jpg" | "jpeg" | "gif" | "webp" | "bmp" => Self::Image,
            "mp3" | "wav" | "ogg" | "m4a" | "aac" | "flac" | "aif" | "aiff" | "caf" | "mid" => {
                Self::Audio
            }
            "pdf" | "txt" | "json" | "html" | "htm" | "md" | "csv" | "xml" | "svg" | "doc"
            | "docx" => Self::Document,
            _ => Self::Other,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Font => "font",
            Self::Image => "image",
            Self::Audio => "audio",
            Self::Document => "document",
            Self::Other => "other",
        }
    }
}

/// Words that cannot be used as a resource name because the generated `R`
/// class would not compile.
const RESERVED_WORDS: &[&str] = &[
    "abstract", "as", "assert", "boolean", "break", "byte", "case", "catch", "char", "class",
    "const", "continue", "default", "do", "double", "else", "enum", "extends", "false", "final",
    "finally", "float", "for", "fun", "goto", "if", "implements", "import", "in", "instanceof",
    "int", "interface", "is", "long", "native", "new", "null", "object", "package", "private",
    "protected", "public", "return", "short", "static", "strictfp", "super", "switch",
    "synchronized", "this", "throw", "throws", "transient", "true", "try", "typealias",
    "typeof", "val", "var", "void", "volatile", "when", "while",
];

/// Turn a file stem into a valid Android resource name.
///
/// Lower-cases ASCII letters and replaces every other character that is not
/// a letter, digit or underscore with `_`. Names that would not start with a
/// letter, and Java or Kotlin keywords, get an `asset_` prefix.
pub fn sanitize_resource_name(name: &str) -> String {
    let sanitized: String = name
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() {
                c.to_ascii_lowercase()
            } else {
                '_'
            }
        })
        .collect();

    match sanitized.chars().next() {
        Some(c) if c.is_ascii_alphabetic() && !RESERVED_WORDS.contains(&sanitized.as_str()) => {
            sanitized
        }
        _ => format!("asset_{}", sanitized),
    }
}

/// A single asset file found under one of the configured roots.
///
/// Identity is `relative_path`: two records with the same relative path are
/// the same asset regardless of which root produced them.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct AssetRecord {
    /// Absolute location of the source file
    pub absolute_path: NormalizedPath,
    /// Path relative to the project root (absolute if the asset lives outside it)
    pub relative_path: String,
    /// Path relative to the asset root the file was found under
    pub subpath: String,
    /// Lower-cased extension without the dot; empty if the file has none
    pub extension: String,
    pub kind: AssetKind,
}

impl AssetRecord {
    /// Build a record for a file found under `root`.
    pub fn new(
        project_root: &NormalizedPath,
        root: &NormalizedPath,
        absolute_path: NormalizedPath,
    ) -> Self {
        let relative_path = absolute_path
            .relative_to(project_root)
            .unwrap_or_else(|| absolute_path.as_str().to_string());
        let subpath = absolute_path
            .relative_to(root)
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| absolute_path.file_name().unwrap_or_default().to_string());

        Self::with_paths(absolute_path, relative_path, subpath)
    }

    /// Rebuild a record from a path stored in a manifest.
    ///
    /// The file may no longer exist. The sub-path is recovered by stripping
    /// the longest configured root that contains the asset, falling back to
    /// the bare file name.
    pub fn from_linked_path(
        project_root: &NormalizedPath,
        relative_path: &str,
        roots: &[NormalizedPath],
    ) -> Self {
        let absolute_path = project_root.join(relative_path);
        let subpath = roots
            .iter()
            .filter_map(|root| absolute_path.relative_to(root))
            .filter(|s| !s.is_empty())
            .min_by_key(|s| s.len())
            .unwrap_or_else(|| absolute_path.file_name().unwrap_or_default().to_string());

        Self::with_paths(
            absolute_path,
            NormalizedPath::new(relative_path).as_str().to_string(),
            subpath,
        )
    }

    fn with_paths(absolute_path: NormalizedPath, relative_path: String, subpath: String) -> Self {
        let extension = absolute_path
            .extension()
            .unwrap_or_default()
            .to_ascii_lowercase();
        let kind = AssetKind::from_extension(&extension);
        Self {
            absolute_path,
            relative_path,
            subpath,
            extension,
            kind,
        }
    }

    /// File name including extension, with original casing.
    pub fn file_name(&self) -> &str {
        self.absolute_path.file_name().unwrap_or_default()
    }

    /// File name without extension, with original casing.
    pub fn file_stem(&self) -> &str {
        self.absolute_path.file_stem().unwrap_or_default()
    }

    pub fn is_font(&self) -> bool {
        self.kind == AssetKind::Font
    }
}

impl Ord for AssetRecord {
    fn cmp(&self, other: &Self) -> Ordering {
        self.relative_path
            .cmp(&other.relative_path)
            .then_with(|| self.absolute_path.cmp(&other.absolute_path))
    }
}

impl PartialOrd for AssetRecord {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}
