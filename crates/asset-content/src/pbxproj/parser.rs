//! Parser for the OpenStep property list dialect used by `project.pbxproj`

use crate::error::{Error, Result, line_at};

use super::value::{Element, Entry, PbxObject, PbxString, Value};

const FORMAT: &str = "pbxproj";

/// Text before the root dictionary, the root itself, and text after it.
pub(crate) struct ParsedDocument {
    pub header: String,
    pub root: PbxObject,
    pub trailer: String,
}

pub(crate) fn parse_document(source: &str) -> Result<ParsedDocument> {
    let mut parser = Parser::new(source);

    parser.skip_trivia()?;
    let header = source[..parser.pos].to_string();
    if parser.peek() != Some(b'{') {
        return Err(parser.error("expected `{` opening the root dictionary"));
    }
    let root = parser.parse_object()?;

    let trailer_start = parser.pos;
    parser.skip_trivia()?;
    if parser.peek().is_some() {
        return Err(parser.error("unexpected content after the root dictionary"));
    }

    Ok(ParsedDocument {
        header,
        root,
        trailer: source[trailer_start..].to_string(),
    })
}

struct Parser<'a> {
    source: &'a str,
    bytes: &'a [u8],
    pos: usize,
}

impl<'a> Parser<'a> {
    fn new(source: &'a str) -> Self {
        Self {
            source,
            bytes: source.as_bytes(),
            pos: 0,
        }
    }

    fn error(&self, message: impl Into<String>) -> Error {
        Error::parse(FORMAT, line_at(self.source, self.pos), message)
    }

    fn peek(&self) -> Option<u8> {
        self.bytes.get(self.pos).copied()
    }

    fn starts_with(&self, pattern: &str) -> bool {
        self.bytes[self.pos..].starts_with(pattern.as_bytes())
    }

    fn expect(&mut self, byte: u8) -> Result<()> {
        if self.peek() == Some(byte) {
            self.pos += 1;
            Ok(())
        } else {
            Err(self.error(format!("expected `{}`", byte as char)))
        }
    }

    fn skip_whitespace(&mut self) {
        while matches!(self.peek(), Some(b) if b.is_ascii_whitespace()) {
            self.pos += 1;
        }
    }

    /// Skip whitespace and any comments.
    fn skip_trivia(&mut self) -> Result<()> {
        loop {
            self.skip_whitespace();
            if self.starts_with("//") {
                match self.source[self.pos..].find('\n') {
                    Some(offset) => self.pos += offset + 1,
                    None => self.pos = self.bytes.len(),
                }
            } else if self.starts_with("/*") {
                self.block_comment()?;
            } else {
                return Ok(());
            }
        }
    }

    /// Read a `/* ... */` comment and return its trimmed text.
    fn block_comment(&mut self) -> Result<String> {
        let body_start = self.pos + 2;
        let Some(offset) = self.source[body_start..].find("*/") else {
            return Err(self.error("unterminated comment"));
        };
        let text = self.source[body_start..body_start + offset].trim().to_string();
        self.pos = body_start + offset + 2;
        Ok(text)
    }

    /// A comment that directly follows a key or value on the same token run.
    fn trailing_comment(&mut self) -> Result<Option<String>> {
        self.skip_whitespace();
        if self.starts_with("/*") {
            Ok(Some(self.block_comment()?))
        } else {
            Ok(None)
        }
    }

    fn parse_value(&mut self) -> Result<Value> {
        match self.peek() {
            Some(b'{') => Ok(Value::Object(self.parse_object()?)),
            Some(b'(') => Ok(Value::Array(self.parse_array()?)),
            Some(_) => Ok(Value::String(self.parse_string()?)),
            None => Err(self.error("unexpected end of input, expected a value")),
        }
    }

    fn parse_object(&mut self) -> Result<PbxObject> {
        self.expect(b'{')?;
        let mut object = PbxObject::new();

        loop {
            self.skip_trivia()?;
            if self.peek() == Some(b'}') {
                self.pos += 1;
                return Ok(object);
            }

            let key = self.parse_string()?;
            let key_comment = self.trailing_comment()?;
            self.skip_trivia()?;
            self.expect(b'=')?;
            self.skip_trivia()?;
            let value = self.parse_value()?;
            let value_comment = self.trailing_comment()?;
            self.skip_trivia()?;
            self.expect(b';')?;

            object.insert_entry(Entry {
                key,
                key_comment,
                value,
                value_comment,
            });
        }
    }

    fn parse_array(&mut self) -> Result<Vec<Element>> {
        self.expect(b'(')?;
        let mut items = Vec::new();

        loop {
            self.skip_trivia()?;
            if self.peek() == Some(b')') {
                self.pos += 1;
                return Ok(items);
            }

            let value = self.parse_value()?;
            let comment = self.trailing_comment()?;
            items.push(Element { value, comment });

            self.skip_trivia()?;
            match self.peek() {
                Some(b',') => self.pos += 1,
                Some(b')') => {}
                _ => return Err(self.error("expected `,` or `)` in array")),
            }
        }
    }

    fn parse_string(&mut self) -> Result<PbxString> {
        if self.peek() == Some(b'"') {
            return self.parse_quoted();
        }

        let start = self.pos;
        while let Some(b) = self.peek() {
            if b.is_ascii_whitespace() || b"{}();,=\"".contains(&b) {
                break;
            }
            self.pos += 1;
        }
        if self.pos == start {
            return Err(self.error("expected a string"));
        }
        Ok(PbxString::from_raw(&self.source[start..self.pos], false))
    }

    fn parse_quoted(&mut self) -> Result<PbxString> {
        self.expect(b'"')?;
        let start = self.pos;
        loop {
            match self.peek() {
                Some(b'\\') => self.pos += 2,
                Some(b'"') => break,
                Some(_) => self.pos += 1,
                None => return Err(self.error("unterminated quoted string")),
            }
        }
        let raw = &self.source[start..self.pos];
        self.pos += 1;
        Ok(PbxString::from_raw(raw, true))
    }
}
