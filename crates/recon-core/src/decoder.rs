//! RECON parser — reads text back into a [`Value`] tree.
//!
//! A single-pass recursive-descent reader. Each parsing function corresponds
//! to one parser state:
//!
//! - `expect_value` (**ExpectValue**) dispatches on the next token's shape
//! - `in_record` (**InRecord**) reads `name: value` entries until `}`
//! - `in_list` (**InList**) reads elements until `]`
//! - `reading_string` (**ReadingString**) consumes a quoted string
//! - `document` (**Done**) accepts only trailing whitespace after the top value
//!
//! # Key design decisions
//!
//! - **Bare runs span inline whitespace**: `Dominance from movement` is one
//!   string. A run ends at a newline, `,`, a bracket/brace, or `:`. Inside a
//!   record it also ends before a quoted field name (`{ a: x "b": 2 }`).
//! - **Colon hand-back**: when a bare value inside a record is ended by `:`,
//!   its last word is the next field name, so `{ a: 1 b: 2 }` reads as two
//!   fields on one line.
//! - **Commas are optional separators** between fields and list elements.
//! - **Positions are computed lazily**: the parser tracks a byte offset and
//!   only converts it to line/column when building an error.

use crate::error::{ReconError, Result};
use crate::value::{Kind, Record, Value};

/// Containers nested deeper than this are rejected rather than risking the stack.
pub(crate) const MAX_DEPTH: usize = 256;

/// Parse a RECON document.
///
/// Errors carry the 1-based line and column where the problem was detected;
/// nothing is recovered from a malformed document.
pub fn parse(text: &str) -> Result<Value> {
    let mut parser = Parser {
        src: text,
        pos: 0,
        depth: 0,
    };
    let value = parser.document()?;
    tracing::debug!(bytes = text.len(), kind = %value.kind(), "parsed document");
    Ok(value)
}

/// Classify a bare run as a number literal, if it is one.
///
/// Grammar: `-? digits ( . digits )? ( [eE] [+-]? digits )?`. Runs with a
/// fraction or exponent are floats, the rest integers. Shared with the
/// serializer so that any string this accepts is written quoted.
pub(crate) fn number_literal(s: &str) -> Option<Kind> {
    let bytes = s.as_bytes();
    let mut i = 0;
    if bytes.first() == Some(&b'-') {
        i = 1;
    }
    let int_start = i;
    while i < bytes.len() && bytes[i].is_ascii_digit() {
        i += 1;
    }
    if i == int_start {
        return None;
    }
    let mut is_float = false;
    if i < bytes.len() && bytes[i] == b'.' {
        i += 1;
        let frac_start = i;
        while i < bytes.len() && bytes[i].is_ascii_digit() {
            i += 1;
        }
        if i == frac_start {
            return None;
        }
        is_float = true;
    }
    if i < bytes.len() && (bytes[i] == b'e' || bytes[i] == b'E') {
        i += 1;
        if i < bytes.len() && (bytes[i] == b'+' || bytes[i] == b'-') {
            i += 1;
        }
        let exp_start = i;
        while i < bytes.len() && bytes[i].is_ascii_digit() {
            i += 1;
        }
        if i == exp_start {
            return None;
        }
        is_float = true;
    }
    if i != bytes.len() {
        return None;
    }
    Some(if is_float { Kind::Float } else { Kind::Integer })
}

/// Where a value is being read; decides what a `:` after a bare run means.
#[derive(Clone, Copy, PartialEq)]
enum Context {
    Top,
    List,
    Field,
}

/// A field name split off the end of a bare value by the colon hand-back.
struct PendingKey {
    name: String,
    at: usize,
}

struct Parser<'a> {
    src: &'a str,
    /// Byte offset of the next unread character.
    pos: usize,
    depth: usize,
}

impl<'a> Parser<'a> {
    fn document(&mut self) -> Result<Value> {
        let (value, _) = self.expect_value(Context::Top)?;
        self.skip_whitespace();
        match self.peek() {
            None => Ok(value),
            Some(c @ ('}' | ']')) => Err(self.error(self.pos, format!("unmatched `{c}`"))),
            Some(_) => Err(self.error(self.pos, "unexpected content after the document")),
        }
    }

    fn expect_value(&mut self, ctx: Context) -> Result<(Value, Option<PendingKey>)> {
        self.skip_whitespace();
        match self.peek() {
            None => Err(self.error(self.pos, "unexpected end of input, expected a value")),
            Some('{') => Ok((Value::Record(self.in_record()?), None)),
            Some('[') => Ok((Value::List(self.in_list()?), None)),
            Some('"') => Ok((Value::String(self.reading_string()?), None)),
            Some(c @ ('}' | ']' | ':' | ',')) => {
                Err(self.error(self.pos, format!("expected a value, found `{c}`")))
            }
            Some(_) => self.bare_value(ctx),
        }
    }

    fn in_record(&mut self) -> Result<Record> {
        let open = self.pos;
        self.bump();
        self.enter(open)?;
        tracing::trace!(depth = self.depth, "record");

        let mut record = Record::new();
        let mut pending: Option<PendingKey> = None;
        loop {
            let (name, at) = match pending.take() {
                Some(key) => (key.name, key.at),
                None => {
                    self.skip_separators();
                    match self.peek() {
                        None => {
                            return Err(self.unterminated(open, "record"));
                        }
                        Some('}') => {
                            self.bump();
                            break;
                        }
                        Some(']') => {
                            return Err(self.mismatched(']', '}', open, "record"));
                        }
                        Some('"') => {
                            let at = self.pos;
                            (self.reading_string()?, at)
                        }
                        Some(c @ ('{' | '[' | ':')) => {
                            return Err(
                                self.error(self.pos, format!("expected a field name, found `{c}`"))
                            );
                        }
                        Some(_) => {
                            let at = self.pos;
                            (self.bare_word().to_string(), at)
                        }
                    }
                }
            };

            self.skip_whitespace();
            if self.peek() != Some(':') {
                return Err(self.error(
                    self.pos,
                    format!("expected `:` after field name `{name}`"),
                ));
            }
            self.bump();

            if record.contains(&name) {
                let (line, column) = line_col(self.src, at);
                return Err(ReconError::DuplicateField {
                    line,
                    column,
                    field: name,
                });
            }
            let (value, next) = self.expect_value(Context::Field)?;
            record.insert(name, value);
            pending = next;
        }

        self.depth -= 1;
        Ok(record)
    }

    fn in_list(&mut self) -> Result<Vec<Value>> {
        let open = self.pos;
        self.bump();
        self.enter(open)?;
        tracing::trace!(depth = self.depth, "list");

        let mut items = Vec::new();
        loop {
            self.skip_separators();
            match self.peek() {
                None => return Err(self.unterminated(open, "list")),
                Some(']') => {
                    self.bump();
                    break;
                }
                Some('}') => return Err(self.mismatched('}', ']', open, "list")),
                Some(_) => {
                    let (value, _) = self.expect_value(Context::List)?;
                    items.push(value);
                }
            }
        }

        self.depth -= 1;
        Ok(items)
    }

    fn reading_string(&mut self) -> Result<String> {
        let open = self.pos;
        self.bump();
        let mut out = String::new();
        loop {
            let Some(c) = self.peek() else {
                return Err(self.error(open, "unterminated string"));
            };
            let at = self.pos;
            self.bump();
            match c {
                '"' => return Ok(out),
                '\\' => out.push(self.escape(at)?),
                c => out.push(c),
            }
        }
    }

    /// Decode the escape whose backslash sits at `at`; the backslash is consumed.
    fn escape(&mut self, at: usize) -> Result<char> {
        let Some(c) = self.peek() else {
            return Err(self.error(at, "unterminated string"));
        };
        self.bump();
        let decoded = match c {
            '"' => '"',
            '\\' => '\\',
            '/' => '/',
            'n' => '\n',
            'r' => '\r',
            't' => '\t',
            'b' => '\u{08}',
            'f' => '\u{0C}',
            'u' => return self.unicode_escape(at),
            other => return Err(self.error(at, format!("invalid escape `\\{other}`"))),
        };
        Ok(decoded)
    }

    /// `\uXXXX`, combining a surrogate pair written as two escapes.
    fn unicode_escape(&mut self, at: usize) -> Result<char> {
        let high = self.hex4(at)?;
        let code = if (0xD800..0xDC00).contains(&high) {
            if !self.src[self.pos..].starts_with("\\u") {
                return Err(self.error(at, "unpaired surrogate in `\\u` escape"));
            }
            self.pos += 2;
            let low = self.hex4(at)?;
            if !(0xDC00..0xE000).contains(&low) {
                return Err(self.error(at, "unpaired surrogate in `\\u` escape"));
            }
            0x10000 + ((high - 0xD800) << 10) + (low - 0xDC00)
        } else {
            high
        };
        char::from_u32(code).ok_or_else(|| self.error(at, "invalid `\\u` escape"))
    }

    fn hex4(&mut self, at: usize) -> Result<u32> {
        let digits = self
            .src
            .get(self.pos..self.pos + 4)
            .filter(|d| d.bytes().all(|b| b.is_ascii_hexdigit()))
            .ok_or_else(|| self.error(at, "`\\u` escape needs four hex digits"))?;
        let code = u32::from_str_radix(digits, 16)
            .map_err(|_| self.error(at, "`\\u` escape needs four hex digits"))?;
        self.pos += 4;
        Ok(code)
    }

    /// Read an unquoted scalar. Inside a record, a run ended by `:` hands its
    /// last word back as the next field name, and a run ended by a quoted
    /// field name leaves that name for `in_record` to read.
    fn bare_value(&mut self, ctx: Context) -> Result<(Value, Option<PendingKey>)> {
        let start = self.pos;
        let raw = self.bare_run(ctx);

        if self.peek() != Some(':') {
            return Ok((self.scalar(raw, start)?, None));
        }
        if ctx != Context::Field {
            return Err(self.error(self.pos, "unexpected `:`"));
        }
        let Some(split) = raw.rfind([' ', '\t']) else {
            return Err(self.error(start, format!("expected a value before field `{raw}`")));
        };
        let key = PendingKey {
            name: raw[split + 1..].to_string(),
            at: start + split + 1,
        };
        let value_text = raw[..split].trim_end_matches([' ', '\t']);
        Ok((self.scalar(value_text, start)?, Some(key)))
    }

    /// Consume up to the next terminator and return the run without trailing
    /// inline whitespace. Inside a record, a `"` after whitespace that opens a
    /// quoted field name (`"b": ...`) also ends the run.
    fn bare_run(&mut self, ctx: Context) -> &'a str {
        let start = self.pos;
        let mut prev = None;
        while let Some(c) = self.peek() {
            if matches!(c, '\n' | ',' | '{' | '}' | '[' | ']' | ':') {
                break;
            }
            if c == '"'
                && ctx == Context::Field
                && matches!(prev, Some(' ' | '\t'))
                && self.quoted_key_ahead()
            {
                break;
            }
            prev = Some(c);
            self.bump();
        }
        self.src[start..self.pos].trim_end_matches([' ', '\t', '\r'])
    }

    /// Whether the quoted string starting at `pos` is followed by `:`.
    fn quoted_key_ahead(&self) -> bool {
        let bytes = self.src.as_bytes();
        let mut i = self.pos + 1;
        while i < bytes.len() {
            match bytes[i] {
                b'\\' => i += 2,
                b'"' => break,
                _ => i += 1,
            }
        }
        if i >= bytes.len() {
            return false;
        }
        i += 1;
        while i < bytes.len() && matches!(bytes[i], b' ' | b'\t') {
            i += 1;
        }
        bytes.get(i) == Some(&b':')
    }

    /// A single word used as a field name.
    fn bare_word(&mut self) -> &'a str {
        let start = self.pos;
        while let Some(c) = self.peek() {
            if c.is_ascii_whitespace() || matches!(c, ',' | '{' | '}' | '[' | ']' | ':' | '"') {
                break;
            }
            self.bump();
        }
        &self.src[start..self.pos]
    }

    fn scalar(&self, raw: &str, at: usize) -> Result<Value> {
        match number_literal(raw) {
            Some(Kind::Integer) => raw
                .parse::<i64>()
                .map(Value::Integer)
                .map_err(|_| self.error(at, format!("integer literal `{raw}` is out of range"))),
            Some(_) => match raw.parse::<f64>() {
                Ok(f) if f.is_finite() => Ok(Value::Float(f)),
                _ => Err(self.error(at, format!("float literal `{raw}` is out of range"))),
            },
            None => Ok(Value::String(raw.to_string())),
        }
    }

    fn enter(&mut self, open: usize) -> Result<()> {
        self.depth += 1;
        if self.depth > MAX_DEPTH {
            return Err(self.error(open, format!("nesting deeper than {MAX_DEPTH} levels")));
        }
        Ok(())
    }

    fn peek(&self) -> Option<char> {
        self.src[self.pos..].chars().next()
    }

    fn bump(&mut self) {
        if let Some(c) = self.peek() {
            self.pos += c.len_utf8();
        }
    }

    fn skip_whitespace(&mut self) {
        while let Some(c) = self.peek() {
            if !c.is_ascii_whitespace() {
                break;
            }
            self.bump();
        }
    }

    /// Whitespace and commas between fields or elements.
    fn skip_separators(&mut self) {
        while let Some(c) = self.peek() {
            if !c.is_ascii_whitespace() && c != ',' {
                break;
            }
            self.bump();
        }
    }

    fn unterminated(&self, open: usize, what: &str) -> ReconError {
        let (line, column) = line_col(self.src, open);
        self.error(
            self.pos,
            format!("unexpected end of input in {what} opened at line {line}, column {column}"),
        )
    }

    fn mismatched(&self, found: char, expected: char, open: usize, what: &str) -> ReconError {
        let (line, column) = line_col(self.src, open);
        self.error(
            self.pos,
            format!(
                "found `{found}` where `{expected}` was expected to close {what} \
                 opened at line {line}, column {column}"
            ),
        )
    }

    fn error(&self, at: usize, message: impl Into<String>) -> ReconError {
        let (line, column) = line_col(self.src, at);
        ReconError::Syntax {
            line,
            column,
            message: message.into(),
        }
    }
}

/// 1-based line and character column of byte offset `at`.
fn line_col(src: &str, at: usize) -> (usize, usize) {
    let before = &src[..at];
    let line = before.matches('\n').count() + 1;
    let column = before
        .rsplit('\n')
        .next()
        .map_or(0, |tail| tail.chars().count())
        + 1;
    (line, column)
}
