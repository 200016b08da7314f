//! Value tree of an OpenStep-style property list
//!
//! Strings keep their original quoting and escapes, and every key, array
//! element and value keeps its trailing `/* comment */`, so an untouched
//! document serializes back to the same bytes.

use std::borrow::Cow;

use indexmap::IndexMap;

/// A scalar string exactly as it appears in the file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PbxString {
    /// Text between the quotes (escapes not resolved) or the bare token
    raw: String,
    quoted: bool,
}

impl PbxString {
    /// Build a string from a plain value, quoting and escaping as Xcode does.
    pub fn new(value: &str) -> Self {
        if needs_quotes(value) {
            let mut raw = String::with_capacity(value.len());
            for c in value.chars() {
                match c {
                    '"' => raw.push_str("\\\""),
                    '\\' => raw.push_str("\\\\"),
                    '\n' => raw.push_str("\\n"),
                    '\t' => raw.push_str("\\t"),
                    other => raw.push(other),
                }
            }
            Self { raw, quoted: true }
        } else {
            Self {
                raw: value.to_string(),
                quoted: false,
            }
        }
    }

    pub(crate) fn from_raw(raw: &str, quoted: bool) -> Self {
        Self {
            raw: raw.to_string(),
            quoted,
        }
    }

    pub fn raw(&self) -> &str {
        &self.raw
    }

    pub fn is_quoted(&self) -> bool {
        self.quoted
    }

    /// The logical value with escapes resolved.
    pub fn value(&self) -> Cow<'_, str> {
        if !self.quoted || !self.raw.contains('\\') {
            return Cow::Borrowed(&self.raw);
        }
        let mut out = String::with_capacity(self.raw.len());
        let mut chars = self.raw.chars();
        while let Some(c) = chars.next() {
            if c != '\\' {
                out.push(c);
                continue;
            }
            match chars.next() {
                Some('n') => out.push('\n'),
                Some('t') => out.push('\t'),
                Some(other) => out.push(other),
                None => out.push('\\'),
            }
        }
        Cow::Owned(out)
    }

    pub(crate) fn write_to(&self, out: &mut String) {
        if self.quoted {
            out.push('"');
            out.push_str(&self.raw);
            out.push('"');
        } else {
            out.push_str(&self.raw);
        }
    }
}

fn needs_quotes(value: &str) -> bool {
    value.is_empty()
        || !value
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '$' | '/' | ':' | '.'))
}

/// Any value in the document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Value {
    String(PbxString),
    Array(Vec<Element>),
    Object(PbxObject),
}

impl Value {
    pub fn string(value: &str) -> Self {
        Self::String(PbxString::new(value))
    }

    pub fn as_str(&self) -> Option<Cow<'_, str>> {
        match self {
            Self::String(s) => Some(s.value()),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&Vec<Element>> {
        match self {
            Self::Array(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_array_mut(&mut self) -> Option<&mut Vec<Element>> {
        match self {
            Self::Array(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_object(&self) -> Option<&PbxObject> {
        match self {
            Self::Object(object) => Some(object),
            _ => None,
        }
    }

    pub fn as_object_mut(&mut self) -> Option<&mut PbxObject> {
        match self {
            Self::Object(object) => Some(object),
            _ => None,
        }
    }
}

/// An array item with its optional trailing comment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    pub value: Value,
    pub comment: Option<String>,
}

impl Element {
    pub fn new(value: Value) -> Self {
        Self {
            value,
            comment: None,
        }
    }

    /// An object reference such as `13B07F96 /* Lato.ttf */`.
    pub fn reference(id: &str, comment: &str) -> Self {
        Self {
            value: Value::string(id),
            comment: Some(comment.to_string()),
        }
    }

    pub fn as_str(&self) -> Option<Cow<'_, str>> {
        self.value.as_str()
    }
}

/// A `key = value;` pair with comments after the key and after the value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    pub key: PbxString,
    pub key_comment: Option<String>,
    pub value: Value,
    pub value_comment: Option<String>,
}

/// An ordered dictionary. Keys are looked up by their unescaped value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PbxObject {
    entries: IndexMap<String, Entry>,
}

impl PbxObject {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert of a plain value.
    pub fn with(mut self, key: &str, value: Value) -> Self {
        self.insert(key, value, None);
        self
    }

    /// Builder-style insert of an object reference with its comment.
    pub fn with_reference(mut self, key: &str, id: &str, comment: &str) -> Self {
        self.insert(key, Value::string(id), Some(comment));
        self
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Entry)> {
        self.entries.iter().map(|(k, e)| (k.as_str(), e))
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    pub fn entry(&self, key: &str) -> Option<&Entry> {
        self.entries.get(key)
    }

    pub fn entry_mut(&mut self, key: &str) -> Option<&mut Entry> {
        self.entries.get_mut(key)
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.entries.get(key).map(|e| &e.value)
    }

    pub fn get_mut(&mut self, key: &str) -> Option<&mut Value> {
        self.entries.get_mut(key).map(|e| &mut e.value)
    }

    pub fn get_str(&self, key: &str) -> Option<Cow<'_, str>> {
        self.get(key).and_then(Value::as_str)
    }

    pub fn get_array(&self, key: &str) -> Option<&Vec<Element>> {
        self.get(key).and_then(Value::as_array)
    }

    pub fn get_array_mut(&mut self, key: &str) -> Option<&mut Vec<Element>> {
        self.get_mut(key).and_then(Value::as_array_mut)
    }

    pub fn get_object(&self, key: &str) -> Option<&PbxObject> {
        self.get(key).and_then(Value::as_object)
    }

    pub fn get_object_mut(&mut self, key: &str) -> Option<&mut PbxObject> {
        self.get_mut(key).and_then(Value::as_object_mut)
    }

    /// The `isa` class name of an object in the `objects` table.
    pub fn isa(&self) -> Option<Cow<'_, str>> {
        self.get_str("isa")
    }

    /// Insert or replace a value.
    ///
    /// Replacing keeps the key's position, spelling and comment.
    pub fn insert(&mut self, key: &str, value: Value, value_comment: Option<&str>) {
        let value_comment = value_comment.map(str::to_string);
        if let Some(entry) = self.entries.get_mut(key) {
            entry.value = value;
            entry.value_comment = value_comment;
            return;
        }
        self.entries.insert(
            key.to_string(),
            Entry {
                key: PbxString::new(key),
                key_comment: None,
                value,
                value_comment,
            },
        );
    }

    /// Insert a fully-formed entry, used for object table rows that carry a
    /// comment after the key.
    pub fn insert_entry(&mut self, entry: Entry) {
        self.entries.insert(entry.key.value().into_owned(), entry);
    }

    /// Remove a key, keeping the order of the remaining entries.
    pub fn remove(&mut self, key: &str) -> Option<Entry> {
        self.entries.shift_remove(key)
    }
}
