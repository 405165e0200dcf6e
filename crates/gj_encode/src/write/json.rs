use alloc::string::String;
use alloc::vec::Vec;
use core::mem;
use std::io::{self, Write as _};

use serde::Serialize;
use serde_json::Value;
use serde_json::ser::{CompactFormatter, Formatter, Serializer};

use super::Sink;

// -----------------------------------------------------------------------------
// JsonFormatter

/// Compact formatting with the encoder's string escaping.
///
/// `U+2028` and `U+2029` are always escaped, `<`, `>` and `&` only with
/// HTML escaping on. Everything else is left to [`CompactFormatter`].
#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct JsonFormatter {
    escape_html: bool,
}

impl JsonFormatter {
    #[inline]
    pub const fn new(escape_html: bool) -> Self {
        Self { escape_html }
    }

    #[inline]
    fn escapes(self, ch: char) -> bool {
        match ch {
            '\u{2028}' | '\u{2029}' => true,
            '<' | '>' | '&' => self.escape_html,
            _ => false,
        }
    }
}

impl Formatter for JsonFormatter {
    fn write_string_fragment<W>(&mut self, writer: &mut W, fragment: &str) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        let mut start = 0;
        for (index, ch) in fragment.char_indices() {
            if !self.escapes(ch) {
                continue;
            }
            if start < index {
                CompactFormatter.write_string_fragment(writer, &fragment[start..index])?;
            }
            write!(writer, "\\u{:04x}", u32::from(ch))?;
            start = index + ch.len_utf8();
        }
        if start < fragment.len() {
            CompactFormatter.write_string_fragment(writer, &fragment[start..])?;
        }
        Ok(())
    }
}

// -----------------------------------------------------------------------------
// JsonWriter

#[derive(Clone, Copy)]
struct Level {
    array: bool,
    first: bool,
}

/// Writes minified JSON text into a byte buffer.
///
/// Structure goes straight to the [`JsonFormatter`]; strings, numbers and
/// whole trees go through a [`Serializer`] over the same buffer. The first
/// write error is kept and reported when the writer is taken apart.
pub(crate) struct JsonWriter {
    out: Vec<u8>,
    formatter: JsonFormatter,
    levels: Vec<Level>,
    error: Option<io::Error>,
}

impl JsonWriter {
    pub fn new(out: Vec<u8>, escape_html: bool) -> Self {
        Self {
            out,
            formatter: JsonFormatter::new(escape_html),
            levels: Vec::new(),
            error: None,
        }
    }

    /// Returns the buffer, whatever was written, with the first write error.
    pub fn into_parts(self) -> (Vec<u8>, io::Result<()>) {
        let written = match self.error {
            Some(err) => Err(err),
            None => Ok(()),
        };
        (self.out, written)
    }

    pub fn into_inner(self) -> io::Result<Vec<u8>> {
        let (out, written) = self.into_parts();
        written.map(|()| out)
    }

    pub fn into_string(self) -> io::Result<String> {
        String::from_utf8(self.into_inner()?)
            .map_err(|err| io::Error::new(io::ErrorKind::InvalidData, err))
    }

    #[inline]
    fn record(&mut self, result: io::Result<()>) {
        if let Err(err) = result
            && self.error.is_none()
        {
            self.error = Some(err);
        }
    }

    /// Writes the separator owed before a value at the current level.
    fn begin_value(&mut self) {
        if let Some(level) = self.levels.last_mut()
            && level.array
        {
            let first = mem::replace(&mut level.first, false);
            let result = self.formatter.begin_array_value(&mut self.out, first);
            self.record(result);
        }
    }

    fn end_value(&mut self) {
        let result = match self.levels.last() {
            Some(level) if level.array => self.formatter.end_array_value(&mut self.out),
            Some(_) => self.formatter.end_object_value(&mut self.out),
            None => Ok(()),
        };
        self.record(result);
    }

    fn emit(&mut self, write: impl FnOnce(&mut JsonFormatter, &mut Vec<u8>) -> io::Result<()>) {
        self.begin_value();
        let result = write(&mut self.formatter, &mut self.out);
        self.record(result);
        self.end_value();
    }

    fn serialize<T: ?Sized + Serialize>(&mut self, value: &T) {
        self.emit(|formatter, out| {
            let mut ser = Serializer::with_formatter(out, *formatter);
            value.serialize(&mut ser).map_err(io::Error::from)
        });
    }

    fn open(&mut self, array: bool) {
        self.begin_value();
        let result = if array {
            self.formatter.begin_array(&mut self.out)
        } else {
            self.formatter.begin_object(&mut self.out)
        };
        self.record(result);
        self.levels.push(Level { array, first: true });
    }

    fn close(&mut self) {
        let result = match self.levels.pop() {
            Some(level) if level.array => self.formatter.end_array(&mut self.out),
            Some(_) => self.formatter.end_object(&mut self.out),
            None => Ok(()),
        };
        self.record(result);
        self.end_value();
    }
}

impl Sink for JsonWriter {
    fn null(&mut self) {
        self.emit(|formatter, out| formatter.write_null(out));
    }

    fn bool(&mut self, value: bool) {
        self.emit(|formatter, out| formatter.write_bool(out, value));
    }

    fn int(&mut self, value: i64) {
        self.emit(|formatter, out| formatter.write_i64(out, value));
    }

    fn uint(&mut self, value: u64) {
        self.emit(|formatter, out| formatter.write_u64(out, value));
    }

    fn f32(&mut self, value: f32) {
        self.emit(|formatter, out| formatter.write_f32(out, value));
    }

    fn f64(&mut self, value: f64) {
        self.emit(|formatter, out| formatter.write_f64(out, value));
    }

    fn str(&mut self, value: &str) {
        self.serialize(value);
    }

    fn begin_object(&mut self) {
        self.open(false);
    }

    fn key(&mut self, key: &str) {
        let first = match self.levels.last_mut() {
            Some(level) => mem::replace(&mut level.first, false),
            None => true,
        };
        let result = write_key(&mut self.formatter, &mut self.out, key, first);
        self.record(result);
    }

    fn end_object(&mut self) {
        self.close();
    }

    fn begin_array(&mut self) {
        self.open(true);
    }

    fn end_array(&mut self) {
        self.close();
    }

    /// Number text in the tree is written as is.
    fn value(&mut self, value: &Value) {
        self.serialize(value);
    }
}

fn write_key(
    formatter: &mut JsonFormatter,
    out: &mut Vec<u8>,
    key: &str,
    first: bool,
) -> io::Result<()> {
    formatter.begin_object_key(out, first)?;
    key.serialize(&mut Serializer::with_formatter(&mut *out, *formatter))?;
    formatter.end_object_key(out)?;
    formatter.begin_object_value(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text(writer: JsonWriter) -> String {
        writer.into_string().unwrap()
    }

    fn escaped(value: &str, html: bool) -> String {
        let mut w = JsonWriter::new(Vec::new(), html);
        w.str(value);
        text(w)
    }

    #[test]
    fn commas_and_nesting() {
        let mut w = JsonWriter::new(Vec::new(), false);
        w.begin_object();
        w.key("a");
        w.begin_array();
        w.int(-1);
        w.uint(2);
        w.begin_object();
        w.end_object();
        w.begin_array();
        w.end_array();
        w.end_array();
        w.key("b");
        w.f64(0.5);
        w.key("c");
        w.null();
        w.end_object();

        assert_eq!(text(w), r#"{"a":[-1,2,{},[]],"b":0.5,"c":null}"#);
    }

    #[test]
    fn reuses_buffer_tail() {
        let mut w = JsonWriter::new(b"x".to_vec(), false);
        w.bool(true);
        assert_eq!(text(w), "xtrue");
    }

    #[test]
    fn short_and_control_escapes() {
        assert_eq!(escaped("a\"b\\c\n\r\t", false), r#""a\"b\\c\n\r\t""#);
        assert_eq!(escaped("\u{1}\u{1f}", false), r#""\u0001\u001f""#);
        assert_eq!(escaped("\u{7f}é😀", false), "\"\u{7f}é😀\"");
    }

    #[test]
    fn line_separators_are_always_escaped() {
        assert_eq!(escaped("x\u{2028}y\u{2029}", false), r#""x\u2028y\u2029""#);
        assert_eq!(escaped("\u{2028}", true), r#""\u2028""#);
    }

    #[test]
    fn html() {
        assert_eq!(escaped("<a&b>", false), r#""<a&b>""#);
        assert_eq!(escaped("<a&b>", true), r#""\u003ca\u0026b\u003e""#);

        let mut w = JsonWriter::new(Vec::new(), true);
        w.begin_object();
        w.key("<k>");
        w.str("v");
        w.end_object();
        assert_eq!(text(w), r#"{"\u003ck\u003e":"v"}"#);
    }

    #[test]
    fn tree_numbers_keep_their_text() {
        let tree: Value =
            serde_json::from_str(r#"{ "a" : [12.50, -0.0, 123456789012345678901234567890] }"#)
                .unwrap();
        let mut w = JsonWriter::new(Vec::new(), false);
        w.value(&tree);
        assert_eq!(text(w), r#"{"a":[12.50,-0.0,123456789012345678901234567890]}"#);
    }

    #[test]
    fn agrees_with_serde_json_without_html() {
        for value in ["plain", "q\"uote", "tab\there", "\u{0}\u{7}", "ünïcode"] {
            assert_eq!(escaped(value, false), serde_json::to_string(value).unwrap());
        }
    }
}
