//! Font registration in `MainApplication`
//!
//! Each linked font family gets one line right after `super.onCreate()`:
//!
//! ```text
//! ReactFontManager.getInstance().addCustomFont(this, "Lato", R.font.lato)
//! ```
//!
//! The patch is textual. A family is considered registered when the file
//! already contains `R.font.<resource>)`.

use std::sync::LazyLock;

use asset_fs::NormalizedPath;
use regex::Regex;
use walkdir::WalkDir;

const IMPORT_PATH: &str = "com.facebook.react.common.assets.ReactFontManager";
const CALL_PREFIX: &str = "ReactFontManager.getInstance().addCustomFont(";

static ON_CREATE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?m)^([ \t]*)super\.onCreate\(\)[ \t]*;?[ \t]*\r?$")
        .expect("Invalid onCreate anchor regex")
});

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceLanguage {
    Kotlin,
    Java,
}

impl SourceLanguage {
    fn terminator(&self) -> &'static str {
        match self {
            Self::Kotlin => "",
            Self::Java => ";",
        }
    }
}

/// The application's `MainApplication` source file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryPoint {
    pub path: NormalizedPath,
    pub language: SourceLanguage,
}

/// Locate `MainApplication.kt` (preferred) or `MainApplication.java` under
/// `<app_dir>/java`.
pub fn find_entry_point(app_dir: &NormalizedPath) -> Option<EntryPoint> {
    let java_dir = app_dir.join("java");
    let mut kotlin = Vec::new();
    let mut java = Vec::new();

    for entry in WalkDir::new(java_dir.to_native())
        .sort_by_file_name()
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
    {
        match entry.file_name().to_str() {
            Some("MainApplication.kt") => kotlin.push(NormalizedPath::new(entry.path())),
            Some("MainApplication.java") => java.push(NormalizedPath::new(entry.path())),
            _ => {}
        }
    }

    kotlin
        .into_iter()
        .next()
        .map(|path| EntryPoint {
            path,
            language: SourceLanguage::Kotlin,
        })
        .or_else(|| {
            java.into_iter().next().map(|path| EntryPoint {
                path,
                language: SourceLanguage::Java,
            })
        })
}

/// A font family to register.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FontRegistration {
    /// Family name passed to `addCustomFont`
    pub family: String,
    /// Resource name of the family XML
    pub resource: String,
}

fn marker(resource: &str) -> String {
    format!("R.font.{})", resource)
}

/// Insert registrations that are not present yet.
///
/// Returns `None` when the source has no `super.onCreate()` anchor.
pub fn add_registrations(
    source: &str,
    language: SourceLanguage,
    registrations: &[FontRegistration],
) -> Option<String> {
    let missing: Vec<&FontRegistration> = registrations
        .iter()
        .filter(|r| !source.contains(&marker(&r.resource)))
        .collect();
    if missing.is_empty() {
        return Some(source.to_string());
    }

    let anchor = ON_CREATE.captures(source)?;
    let indent = anchor.get(1).map_or("", |m| m.as_str());
    let anchor_end = anchor.get(0).map_or(0, |m| m.end());

    // Append after any registrations already following the anchor.
    let mut insert_at = line_end(source, anchor_end);
    while insert_at < source.len() {
        let next = line_end(source, insert_at);
        if !source[insert_at..next].contains(CALL_PREFIX) {
            break;
        }
        insert_at = next;
    }

    let mut lines = String::new();
    if insert_at == source.len() && !source.ends_with('\n') {
        lines.push('\n');
    }
    for registration in missing {
        lines.push_str(&format!(
            "{}{}this, \"{}\", R.font.{}){}\n",
            indent,
            CALL_PREFIX,
            registration.family,
            registration.resource,
            language.terminator()
        ));
    }

    let mut patched = String::with_capacity(source.len() + lines.len());
    patched.push_str(&source[..insert_at]);
    patched.push_str(&lines);
    patched.push_str(&source[insert_at..]);

    Some(ensure_import(&patched, language))
}

/// Remove registrations for the given family resources, and the import once
/// no registration is left.
pub fn remove_registrations(source: &str, resources: &[String]) -> String {
    let markers: Vec<String> = resources.iter().map(|r| marker(r)).collect();
    let kept: String = source
        .split_inclusive('\n')
        .filter(|line| !(line.contains(CALL_PREFIX) && markers.iter().any(|m| line.contains(m))))
        .collect();

    if kept.contains(CALL_PREFIX) {
        return kept;
    }
    kept.split_inclusive('\n')
        .filter(|line| !is_import_line(line))
        .collect()
}

/// Offset just past the newline ending the line that contains `offset`.
fn line_end(source: &str, offset: usize) -> usize {
    match source[offset..].find('\n') {
        Some(i) => offset + i + 1,
        None => source.len(),
    }
}

fn is_import_line(line: &str) -> bool {
    let trimmed = line.trim().trim_end_matches(';');
    trimmed == format!("import {}", IMPORT_PATH)
}

/// Add the `ReactFontManager` import in sorted position among the imports.
fn ensure_import(source: &str, language: SourceLanguage) -> String {
    if source.split_inclusive('\n').any(is_import_line) {
        return source.to_string();
    }
    let import = format!("import {}{}\n", IMPORT_PATH, language.terminator());

    let mut offset = 0;
    let mut last_import_end = None;
    let mut package_end = None;
    for line in source.split_inclusive('\n') {
        let end = offset + line.len();
        let trimmed = line.trim_start();
        if trimmed.starts_with("import ") {
            if trimmed.trim_end() > import.trim_end() {
                return format!("{}{}{}", &source[..offset], import, &source[offset..]);
            }
            last_import_end = Some(end);
        } else if trimmed.starts_with("package ") {
            package_end = Some(end);
        }
        offset = end;
    }

    match (last_import_end, package_end) {
        (Some(at), _) => format!("{}{}{}", &source[..at], import, &source[at..]),
        (None, Some(at)) => format!("{}\n{}{}", &source[..at], import, &source[at..]),
        (None, None) => format!("{}{}", import, source),
    }
}
