//! XML property lists
//!
//! Only the XML flavour is supported; binary plists are rejected as parse
//! errors. Values are kept in document order and written back with the
//! indentation Xcode uses.

use asset_fs::{NormalizedPath, io};
use indexmap::IndexMap;
use quick_xml::Reader;
use quick_xml::escape::{partial_escape, unescape};
use quick_xml::events::Event;

use crate::error::line_at;
use crate::{Error, Result};

const FORMAT: &str = "plist";

const XML_HEADER: &str = "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n\
<!DOCTYPE plist PUBLIC \"-//Apple//DTD PLIST 1.0//EN\" \"http://www.apple.com/DTDs/PropertyList-1.0.dtd\">\n\
<plist version=\"1.0\">\n";

/// A property list value. Numbers and dates keep their textual form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlistValue {
    String(String),
    Integer(String),
    Real(String),
    Boolean(bool),
    Date(String),
    Data(String),
    Array(Vec<PlistValue>),
    Dict(IndexMap<String, PlistValue>),
}

impl PlistValue {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&Vec<PlistValue>> {
        match self {
            Self::Array(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_dict(&self) -> Option<&IndexMap<String, PlistValue>> {
        match self {
            Self::Dict(dict) => Some(dict),
            _ => None,
        }
    }
}

/// A parsed `.plist` file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlistDocument {
    pub root: PlistValue,
}

impl PlistDocument {
    pub fn new_dict() -> Self {
        Self {
            root: PlistValue::Dict(IndexMap::new()),
        }
    }

    pub fn parse(source: &str) -> Result<Self> {
        let tokens = tokenize(source)?;
        let mut cursor = Cursor {
            source,
            tokens: &tokens,
            pos: 0,
        };

        match cursor.next_significant() {
            Some(Token::Open { name, .. }) if name == "plist" => {}
            Some(token) => return Err(cursor.error_at(token.offset(), "expected <plist>")),
            None => return Err(cursor.error_at(source.len(), "empty property list")),
        }
        let root = cursor.parse_value()?;
        match cursor.next_significant() {
            Some(Token::Close { name, .. }) if name == "plist" => {}
            Some(token) => return Err(cursor.error_at(token.offset(), "expected </plist>")),
            None => return Err(cursor.error_at(source.len(), "missing </plist>")),
        }

        Ok(Self { root })
    }

    pub fn load(path: &NormalizedPath) -> Result<Self> {
        let content = io::read_text(path)?;
        Self::parse(&content)
    }

    /// Write the document, returning whether the file changed.
    pub fn save(&self, path: &NormalizedPath) -> Result<bool> {
        let written = io::write_text_if_changed(path, &self.to_xml())?;
        if written {
            tracing::debug!(path = %path, "saved property list");
        } else {
            tracing::trace!(path = %path, "property list unchanged");
        }
        Ok(written)
    }

    pub fn to_xml(&self) -> String {
        let mut out = String::from(XML_HEADER);
        write_value(&mut out, &self.root, 0);
        out.push_str("</plist>\n");
        out
    }

    pub fn root_dict(&self) -> Option<&IndexMap<String, PlistValue>> {
        self.root.as_dict()
    }

    pub fn root_dict_mut(&mut self) -> Option<&mut IndexMap<String, PlistValue>> {
        match &mut self.root {
            PlistValue::Dict(dict) => Some(dict),
            _ => None,
        }
    }

    /// String items of a top-level array; empty when the key is absent.
    pub fn string_array(&self, key: &str) -> Vec<String> {
        self.root_dict()
            .and_then(|dict| dict.get(key))
            .and_then(PlistValue::as_array)
            .map(|items| {
                items
                    .iter()
                    .filter_map(PlistValue::as_str)
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Append strings to a top-level array, creating it if needed and skipping
    /// values already present. Returns whether anything was added.
    pub fn add_to_string_array(&mut self, key: &str, values: &[String]) -> Result<bool> {
        if values.is_empty() {
            return Ok(false);
        }
        let dict = self
            .root_dict_mut()
            .ok_or_else(|| Error::structure(FORMAT, "root is not a dictionary"))?;
        let entry = dict
            .entry(key.to_string())
            .or_insert_with(|| PlistValue::Array(Vec::new()));
        let PlistValue::Array(items) = entry else {
            return Err(Error::structure(
                FORMAT,
                format!("`{}` is not an array", key),
            ));
        };

        let mut changed = false;
        for value in values {
            if !items.iter().any(|item| item.as_str() == Some(value.as_str())) {
                items.push(PlistValue::String(value.clone()));
                changed = true;
            }
        }
        Ok(changed)
    }

    /// Remove strings from a top-level array, dropping the key once the array
    /// is empty. Returns whether anything was removed.
    pub fn remove_from_string_array(&mut self, key: &str, values: &[String]) -> bool {
        let Some(dict) = self.root_dict_mut() else {
            return false;
        };
        let Some(PlistValue::Array(items)) = dict.get_mut(key) else {
            return false;
        };

        let before = items.len();
        items.retain(|item| !item.as_str().is_some_and(|s| values.iter().any(|v| v == s)));
        let changed = items.len() != before;

        if items.is_empty() {
            dict.shift_remove(key);
        }
        changed
    }
}

#[derive(Debug)]
enum Token {
    Open { name: String, offset: usize },
    Close { name: String, offset: usize },
    Empty { name: String, offset: usize },
    Text { text: String, offset: usize },
}

impl Token {
    fn offset(&self) -> usize {
        match self {
            Self::Open { offset, .. }
            | Self::Close { offset, .. }
            | Self::Empty { offset, .. }
            | Self::Text { offset, .. } => *offset,
        }
    }
}

fn xml_error(source: &str, offset: usize, message: impl Into<String>) -> Error {
    Error::parse(FORMAT, line_at(source, offset), message)
}

fn utf8<'a>(source: &str, offset: usize, bytes: &'a [u8]) -> Result<&'a str> {
    std::str::from_utf8(bytes).map_err(|e| xml_error(source, offset, e.to_string()))
}

fn resolve_entity(name: &str) -> Option<char> {
    match name {
        "amp" => Some('&'),
        "lt" => Some('<'),
        "gt" => Some('>'),
        "quot" => Some('"'),
        "apos" => Some('\''),
        _ => {
            let code = name.strip_prefix('#')?;
            let number = match code.strip_prefix('x').or_else(|| code.strip_prefix('X')) {
                Some(hex) => u32::from_str_radix(hex, 16).ok()?,
                None => code.parse().ok()?,
            };
            char::from_u32(number)
        }
    }
}

/// Flatten the XML into element and text tokens, merging adjacent text.
fn tokenize(source: &str) -> Result<Vec<Token>> {
    let mut reader = Reader::from_str(source);
    let mut tokens = Vec::new();

    loop {
        let offset = reader.buffer_position() as usize;
        let event = reader
            .read_event()
            .map_err(|e| xml_error(source, offset, e.to_string()))?;

        let text = match event {
            Event::Start(e) => {
                let name = utf8(source, offset, e.name().as_ref())?.to_string();
                tokens.push(Token::Open { name, offset });
                continue;
            }
            Event::End(e) => {
                let name = utf8(source, offset, e.name().as_ref())?.to_string();
                tokens.push(Token::Close { name, offset });
                continue;
            }
            Event::Empty(e) => {
                let name = utf8(source, offset, e.name().as_ref())?.to_string();
                tokens.push(Token::Empty { name, offset });
                continue;
            }
            Event::Text(e) => {
                let raw = utf8(source, offset, &e)?;
                unescape(raw)
                    .map_err(|err| xml_error(source, offset, err.to_string()))?
                    .into_owned()
            }
            Event::CData(e) => utf8(source, offset, &e)?.to_string(),
            Event::GeneralRef(e) => {
                let name = utf8(source, offset, &e)?;
                resolve_entity(name)
                    .ok_or_else(|| {
                        xml_error(source, offset, format!("unknown entity `&{};`", name))
                    })?
                    .to_string()
            }
            Event::Eof => break,
            _ => continue,
        };

        match tokens.last_mut() {
            Some(Token::Text { text: existing, .. }) => existing.push_str(&text),
            _ => tokens.push(Token::Text { text, offset }),
        }
    }

    Ok(tokens)
}

struct Cursor<'a> {
    source: &'a str,
    tokens: &'a [Token],
    pos: usize,
}

impl<'a> Cursor<'a> {
    fn error_at(&self, offset: usize, message: impl Into<String>) -> Error {
        xml_error(self.source, offset, message)
    }

    fn end_offset(&self) -> usize {
        self.source.len()
    }

    /// Next token that is not whitespace-only text.
    fn next_significant(&mut self) -> Option<&'a Token> {
        while let Some(token) = self.tokens.get(self.pos) {
            self.pos += 1;
            match token {
                Token::Text { text, .. } if text.trim().is_empty() => continue,
                other => return Some(other),
            }
        }
        None
    }

    fn peek_significant(&mut self) -> Option<&'a Token> {
        let saved = self.pos;
        let token = self.next_significant();
        self.pos = saved;
        token
    }

    /// Text content up to the closing tag of `element`.
    fn text_until_close(&mut self, element: &str) -> Result<String> {
        let mut text = String::new();
        loop {
            match self.tokens.get(self.pos) {
                Some(Token::Text { text: t, .. }) => {
                    text.push_str(t);
                    self.pos += 1;
                }
                Some(Token::Close { name, .. }) if name == element => {
                    self.pos += 1;
                    return Ok(text);
                }
                Some(token) => {
                    return Err(
                        self.error_at(token.offset(), format!("expected </{}>", element))
                    );
                }
                None => {
                    return Err(self.error_at(self.end_offset(), format!("missing </{}>", element)));
                }
            }
        }
    }

    fn parse_value(&mut self) -> Result<PlistValue> {
        let Some(token) = self.next_significant() else {
            return Err(self.error_at(self.end_offset(), "expected a value"));
        };

        match token {
            Token::Empty { name, offset } => match name.as_str() {
                "true" => Ok(PlistValue::Boolean(true)),
                "false" => Ok(PlistValue::Boolean(false)),
                "string" => Ok(PlistValue::String(String::new())),
                "data" => Ok(PlistValue::Data(String::new())),
                "array" => Ok(PlistValue::Array(Vec::new())),
                "dict" => Ok(PlistValue::Dict(IndexMap::new())),
                other => Err(self.error_at(*offset, format!("unexpected <{}/>", other))),
            },
            Token::Open { name, offset } => match name.as_str() {
                "string" => Ok(PlistValue::String(self.text_until_close("string")?)),
                "integer" => Ok(PlistValue::Integer(
                    self.text_until_close("integer")?.trim().to_string(),
                )),
                "real" => Ok(PlistValue::Real(
                    self.text_until_close("real")?.trim().to_string(),
                )),
                "date" => Ok(PlistValue::Date(
                    self.text_until_close("date")?.trim().to_string(),
                )),
                "data" => Ok(PlistValue::Data(
                    self.text_until_close("data")?.trim().to_string(),
                )),
                "true" => {
                    self.text_until_close("true")?;
                    Ok(PlistValue::Boolean(true))
                }
                "false" => {
                    self.text_until_close("false")?;
                    Ok(PlistValue::Boolean(false))
                }
                "array" => self.parse_array(),
                "dict" => self.parse_dict(),
                other => Err(self.error_at(*offset, format!("unexpected <{}>", other))),
            },
            other => Err(self.error_at(other.offset(), "expected a value element")),
        }
    }

    fn parse_array(&mut self) -> Result<PlistValue> {
        let mut items = Vec::new();
        loop {
            match self.peek_significant() {
                Some(Token::Close { name, .. }) if name == "array" => {
                    self.next_significant();
                    return Ok(PlistValue::Array(items));
                }
                Some(_) => items.push(self.parse_value()?),
                None => return Err(self.error_at(self.end_offset(), "missing </array>")),
            }
        }
    }

    fn parse_dict(&mut self) -> Result<PlistValue> {
        let mut dict = IndexMap::new();
        loop {
            match self.next_significant() {
                Some(Token::Close { name, .. }) if name == "dict" => {
                    return Ok(PlistValue::Dict(dict));
                }
                Some(Token::Open { name, .. }) if name == "key" => {
                    let key = self.text_until_close("key")?;
                    let value = self.parse_value()?;
                    dict.insert(key, value);
                }
                Some(token) => return Err(self.error_at(token.offset(), "expected <key>")),
                None => return Err(self.error_at(self.end_offset(), "missing </dict>")),
            }
        }
    }
}

fn indent(out: &mut String, depth: usize) {
    for _ in 0..depth {
        out.push('\t');
    }
}

fn write_text_element(out: &mut String, tag: &str, text: &str) {
    out.push('<');
    out.push_str(tag);
    out.push('>');
    out.push_str(&partial_escape(text));
    out.push_str("</");
    out.push_str(tag);
    out.push_str(">\n");
}

fn write_value(out: &mut String, value: &PlistValue, depth: usize) {
    indent(out, depth);
    match value {
        PlistValue::String(s) => write_text_element(out, "string", s),
        PlistValue::Integer(s) => write_text_element(out, "integer", s),
        PlistValue::Real(s) => write_text_element(out, "real", s),
        PlistValue::Date(s) => write_text_element(out, "date", s),
        PlistValue::Data(s) => write_text_element(out, "data", s),
        PlistValue::Boolean(true) => out.push_str("<true/>\n"),
        PlistValue::Boolean(false) => out.push_str("<false/>\n"),
        PlistValue::Array(items) if items.is_empty() => out.push_str("<array/>\n"),
        PlistValue::Array(items) => {
            out.push_str("<array>\n");
            for item in items {
                write_value(out, item, depth + 1);
            }
            indent(out, depth);
            out.push_str("</array>\n");
        }
        PlistValue::Dict(dict) if dict.is_empty() => out.push_str("<dict/>\n"),
        PlistValue::Dict(dict) => {
            out.push_str("<dict>\n");
            for (key, item) in dict {
                indent(out, depth + 1);
                write_text_element(out, "key", key);
                write_value(out, item, depth + 1);
            }
            indent(out, depth);
            out.push_str("</dict>\n");
        }
    }
}
