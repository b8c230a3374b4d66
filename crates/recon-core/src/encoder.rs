//! RECON serializer — renders a [`Value`] tree as text.
//!
//! Two layouts are produced from the same walk:
//!
//! - **Pretty** (default): one field or element per line, one TAB per depth
//!   level, `{}` / `[]` for empty containers.
//! - **Compact**: the whole document on one line, fields and elements
//!   separated by commas.
//!
//! Strings are written bare whenever the parser would read the bare form back
//! as the same string, and quoted otherwise. Output is a pure function of the
//! input tree: the same tree always produces the same bytes.
//!
//! # Example
//! ```
//! use recon_core::{serialize, Record, Value};
//! let record = Record::with_class("squidpony.DataDemo$Adventurer")
//!     .field("name", "Abjurer")
//!     .field("meleeRes", 1);
//! let text = serialize(&Value::Record(record)).unwrap();
//! assert_eq!(
//!     text,
//!     "{\n\tclass: squidpony.DataDemo$Adventurer\n\tname: Abjurer\n\tmeleeRes: 1\n}"
//! );
//! ```

use crate::decoder::{number_literal, MAX_DEPTH};
use crate::error::{ReconError, Result};
use crate::value::{Record, Value};

/// Output layout.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Style {
    /// Multi-line, tab-indented.
    #[default]
    Pretty,
    /// Single line, comma-separated.
    Compact,
}

/// Serialize a value tree in the pretty layout.
///
/// Fails only for values RECON cannot read back: non-finite floats, and
/// containers nested deeper than the parser accepts.
pub fn serialize(value: &Value) -> Result<String> {
    serialize_with(value, Style::Pretty)
}

/// Serialize a value tree on a single line.
pub fn serialize_compact(value: &Value) -> Result<String> {
    serialize_with(value, Style::Compact)
}

/// Serialize a value tree in the given layout.
pub fn serialize_with(value: &Value, style: Style) -> Result<String> {
    let mut writer = Writer {
        style,
        lossy: false,
        out: String::new(),
    };
    writer.value(value, 0)?;
    tracing::debug!(?style, bytes = writer.out.len(), "serialized document");
    Ok(writer.out)
}

/// Pretty rendering that never fails; backs `Display for Value`.
pub(crate) fn render_lossy(value: &Value) -> String {
    let mut writer = Writer {
        style: Style::Pretty,
        lossy: true,
        out: String::new(),
    };
    // Lossy mode has no error paths.
    let _ = writer.value(value, 0);
    writer.out
}

struct Writer {
    style: Style,
    /// Write non-finite floats verbatim instead of failing.
    lossy: bool,
    out: String,
}

impl Writer {
    fn value(&mut self, value: &Value, depth: usize) -> Result<()> {
        match value {
            Value::String(s) => write_string(s, &mut self.out),
            Value::Integer(n) => self.out.push_str(&n.to_string()),
            Value::Float(f) => self.float(*f)?,
            Value::List(items) => self.list(items, depth)?,
            Value::Record(record) => self.record(record, depth)?,
        }
        Ok(())
    }

    fn record(&mut self, record: &Record, depth: usize) -> Result<()> {
        self.enter(depth)?;
        if record.is_empty() {
            self.out.push_str("{}");
            return Ok(());
        }
        self.out.push('{');
        for (i, (name, value)) in record.iter().enumerate() {
            self.separator(i, depth + 1);
            write_key(name, &mut self.out);
            self.out.push(':');
            if self.style == Style::Pretty {
                self.out.push(' ');
            }
            self.value(value, depth + 1)?;
        }
        self.close(depth);
        self.out.push('}');
        Ok(())
    }

    fn list(&mut self, items: &[Value], depth: usize) -> Result<()> {
        self.enter(depth)?;
        if items.is_empty() {
            self.out.push_str("[]");
            return Ok(());
        }
        self.out.push('[');
        for (i, item) in items.iter().enumerate() {
            self.separator(i, depth + 1);
            self.value(item, depth + 1)?;
        }
        self.close(depth);
        self.out.push(']');
        Ok(())
    }

    /// A container at `depth` is the parser's `depth + 1`-th nesting level.
    fn enter(&self, depth: usize) -> Result<()> {
        if !self.lossy && depth >= MAX_DEPTH {
            return Err(ReconError::UnsupportedValue(format!(
                "nesting deeper than {MAX_DEPTH} levels cannot be parsed back"
            )));
        }
        Ok(())
    }

    /// Emit whatever precedes the `index`-th child of a container.
    fn separator(&mut self, index: usize, child_depth: usize) {
        match self.style {
            Style::Pretty => {
                self.out.push('\n');
                push_indent(child_depth, &mut self.out);
            }
            Style::Compact => {
                if index > 0 {
                    self.out.push(',');
                }
            }
        }
    }

    /// Emit whatever precedes a container's closing delimiter.
    fn close(&mut self, depth: usize) {
        if self.style == Style::Pretty {
            self.out.push('\n');
            push_indent(depth, &mut self.out);
        }
    }

    fn float(&mut self, f: f64) -> Result<()> {
        if !f.is_finite() {
            if self.lossy {
                self.out.push_str(&f.to_string());
                return Ok(());
            }
            return Err(ReconError::UnsupportedValue(format!(
                "non-finite float {f} has no RECON representation"
            )));
        }
        self.out.push_str(&format_float(f));
        Ok(())
    }
}

/// Shortest text that parses back to the same `f64`, always spelled so the
/// parser reads it as a float (`1.0`, not `1`). Negative zero becomes `0.0`.
fn format_float(f: f64) -> String {
    let f = if f == 0.0 { 0.0 } else { f };
    // Debug formatting is shortest-roundtrip and keeps a `.0` or exponent.
    format!("{f:?}")
}

fn push_indent(depth: usize, out: &mut String) {
    for _ in 0..depth {
        out.push('\t');
    }
}

/// Characters that end a bare run or start another token.
fn is_reserved(c: char) -> bool {
    matches!(c, '{' | '}' | '[' | ']' | ':' | '#' | ',' | '"' | '\\')
}

/// Whether `s` must be quoted for the parser to read it back unchanged.
///
/// A string is written bare only if it:
/// - is non-empty with no leading/trailing whitespace
/// - contains no reserved character (`{ } [ ] : # , "` or backslash)
/// - contains no control character
/// - does not read as a number literal
fn needs_quoting(s: &str) -> bool {
    if s.is_empty() || s != s.trim() {
        return true;
    }
    if s.chars().any(|c| is_reserved(c) || c.is_control()) {
        return true;
    }
    number_literal(s).is_some()
}

/// Field names are bare only when they form a single word.
fn key_needs_quoting(key: &str) -> bool {
    key.is_empty()
        || key
            .chars()
            .any(|c| c.is_whitespace() || c.is_control() || is_reserved(c))
}

fn write_string(s: &str, out: &mut String) {
    if needs_quoting(s) {
        write_quoted(s, out);
    } else {
        out.push_str(s);
    }
}

fn write_key(key: &str, out: &mut String) {
    if key_needs_quoting(key) {
        write_quoted(key, out);
    } else {
        out.push_str(key);
    }
}

fn write_quoted(s: &str, out: &mut String) {
    out.push('"');
    for ch in s.chars() {
        match ch {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            '\u{08}' => out.push_str("\\b"),
            '\u{0C}' => out.push_str("\\f"),
            c if c.is_control() => out.push_str(&format!("\\u{:04x}", c as u32)),
            c => out.push(c),
        }
    }
    out.push('"');
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bare_words_with_spaces_stay_unquoted() {
        assert!(!needs_quoting("Dominance from movement"));
        assert!(!needs_quoting("squidpony.DataDemo$Adventurer"));
        assert!(!needs_quoting("-hello"));
    }

    #[test]
    fn reserved_and_ambiguous_strings_are_quoted() {
        for s in [
            "",
            " padded",
            "padded ",
            "Ward field, better spread",
            "a:b",
            "#St",
            "{",
            "]",
            "say \"hi\"",
            "back\\slash",
            "line\nbreak",
            "tab\there",
            "42",
            "-7",
            "0.8",
            "1e5",
            "99999999999999999999999",
        ] {
            assert!(needs_quoting(s), "{s:?} should be quoted");
        }
    }

    #[test]
    fn numeric_lookalikes_outside_the_grammar_stay_bare() {
        for s in ["+5", "5.", ".5", "inf", "NaN", "1e", "0x10"] {
            assert!(!needs_quoting(s), "{s:?} should be bare");
        }
    }

    #[test]
    fn keys_with_whitespace_are_quoted() {
        assert!(key_needs_quoting("two words"));
        assert!(key_needs_quoting(""));
        assert!(key_needs_quoting("a:b"));
        assert!(!key_needs_quoting("meleeRes"));
        assert!(!key_needs_quoting("42"));
    }

    #[test]
    fn floats_always_carry_a_fraction_or_exponent() {
        assert_eq!(format_float(0.8), "0.8");
        assert_eq!(format_float(1.0), "1.0");
        assert_eq!(format_float(-0.0), "0.0");
        assert_eq!(format_float(1e300), "1e300");
        assert_eq!(format_float(-2.5), "-2.5");
    }

    #[test]
    fn control_characters_use_unicode_escapes() {
        let mut out = String::new();
        write_quoted("a\u{1}b", &mut out);
        assert_eq!(out, "\"a\\u0001b\"");
    }

    #[test]
    fn lossy_render_tolerates_nan() {
        assert_eq!(render_lossy(&Value::Float(f64::NAN)), "NaN");
        assert_eq!(render_lossy(&Value::Float(f64::NEG_INFINITY)), "-inf");
    }
}
