//! Android font family descriptors (`res/font/<family>.xml`)

use asset_fs::{NormalizedPath, io};
use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};

use crate::error::line_at;
use crate::{Error, Result};

const FORMAT: &str = "font-family XML";

/// One `<font>` element.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FontEntry {
    /// Font resource name without the `@font/` prefix
    pub font: String,
    pub weight: u16,
    pub italic: bool,
}

impl FontEntry {
    pub fn new(font: impl Into<String>, weight: u16, italic: bool) -> Self {
        Self {
            font: font.into(),
            weight,
            italic,
        }
    }

    fn sort_key(&self) -> (u16, bool, &str) {
        (self.weight, self.italic, &self.font)
    }
}

/// A `<font-family>` document. Entries are kept sorted by weight, then
/// upright before italic.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FontFamilyXml {
    entries: Vec<FontEntry>,
}

impl FontFamilyXml {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn parse(source: &str) -> Result<Self> {
        let mut reader = Reader::from_str(source);
        let mut family = Self::new();
        let mut saw_root = false;

        loop {
            let offset = reader.buffer_position() as usize;
            let event = reader
                .read_event()
                .map_err(|e| Error::parse(FORMAT, line_at(source, offset), e.to_string()))?;

            match event {
                Event::Start(e) | Event::Empty(e) => match e.local_name().as_ref() {
                    b"font-family" => saw_root = true,
                    b"font" if saw_root => {
                        let entry = parse_font_element(&e)
                            .map_err(|message| Error::parse(FORMAT, line_at(source, offset), message))?;
                        family.entries.push(entry);
                    }
                    _ => {}
                },
                Event::Eof => break,
                _ => {}
            }
        }

        if !saw_root {
            return Err(Error::structure(FORMAT, "missing <font-family> root"));
        }
        family.sort();
        Ok(family)
    }

    pub fn load(path: &NormalizedPath) -> Result<Self> {
        let content = io::read_text(path)?;
        Self::parse(&content)
    }

    /// Load an existing descriptor, or start an empty one if the file does
    /// not exist yet.
    pub fn load_or_default(path: &NormalizedPath) -> Result<Self> {
        match io::read_optional_text(path)? {
            Some(content) => Self::parse(&content),
            None => Ok(Self::new()),
        }
    }

    pub fn save(&self, path: &NormalizedPath) -> Result<bool> {
        let written = io::write_text_if_changed(path, &self.to_xml())?;
        if written {
            tracing::debug!(path = %path, "saved font family descriptor");
        } else {
            tracing::trace!(path = %path, "font family descriptor unchanged");
        }
        Ok(written)
    }

    pub fn entries(&self) -> &[FontEntry] {
        &self.entries
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn contains_font(&self, font: &str) -> bool {
        self.entries.iter().any(|e| e.font == font)
    }

    /// Insert an entry, replacing any entry for the same font or the same
    /// weight and slant. Returns whether the document changed.
    pub fn upsert(&mut self, entry: FontEntry) -> bool {
        if self.entries.contains(&entry) {
            return false;
        }
        self.entries.retain(|e| {
            e.font != entry.font && (e.weight, e.italic) != (entry.weight, entry.italic)
        });
        self.entries.push(entry);
        self.sort();
        true
    }

    /// Remove the entry pointing at `font`. Returns whether it existed.
    pub fn remove_font(&mut self, font: &str) -> bool {
        let before = self.entries.len();
        self.entries.retain(|e| e.font != font);
        self.entries.len() != before
    }

    fn sort(&mut self) {
        self.entries.sort_by(|a, b| a.sort_key().cmp(&b.sort_key()));
    }

    pub fn to_xml(&self) -> String {
        let mut out = String::from(
            "<?xml version=\"1.0\" encoding=\"utf-8\"?>\n\
             <font-family xmlns:app=\"http://schemas.android.com/apk/res-auto\">\n",
        );
        for entry in &self.entries {
            out.push_str(&format!(
                "    <font app:fontStyle=\"{}\" app:fontWeight=\"{}\" app:font=\"@font/{}\" />\n",
                if entry.italic { "italic" } else { "normal" },
                entry.weight,
                entry.font,
            ));
        }
        out.push_str("</font-family>\n");
        out
    }
}

/// Read `fontStyle`, `fontWeight` and `font` from either the `app:` or the
/// `android:` namespace.
fn parse_font_element(element: &BytesStart<'_>) -> std::result::Result<FontEntry, String> {
    let mut font = None;
    let mut weight = 400;
    let mut italic = false;

    for attr in element.attributes() {
        let attr = attr.map_err(|e| e.to_string())?;
        let value = std::str::from_utf8(&attr.value).map_err(|e| e.to_string())?;
        match attr.key.local_name().as_ref() {
            b"font" => {
                let name = value.strip_prefix("@font/").unwrap_or(value);
                font = Some(name.to_string());
            }
            b"fontWeight" => {
                weight = value
                    .parse()
                    .map_err(|_| format!("invalid fontWeight `{}`", value))?;
            }
            b"fontStyle" => italic = value == "italic",
            _ => {}
        }
    }

    font.map(|font| FontEntry::new(font, weight, italic))
        .ok_or_else(|| "<font> without a font attribute".to_string())
}
