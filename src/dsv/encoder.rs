//! DSV encoding with RFC 4180-like behavior

use super::options::DsvOptions;
use crate::types::DsvValue;

/// DSV encoder for writing properly escaped fields and rows
///
/// Output is appended to a caller-supplied buffer so one buffer can be
/// reused across rows.
#[derive(Debug, Clone, Copy)]
pub struct DsvEncoder {
    delimiter: char,
    enclosing: char,
}

impl DsvEncoder {
    /// Create a new encoder for the given options
    pub fn new(options: &DsvOptions) -> Self {
        Self {
            delimiter: options.delimiter(),
            enclosing: options.enclosing(),
        }
    }

    /// Encode a row of typed values into buffer
    pub fn encode_row(&self, values: &[DsvValue], buffer: &mut String) {
        for (i, value) in values.iter().enumerate() {
            if i > 0 {
                buffer.push(self.delimiter);
            }
            self.encode_value(value, buffer);
        }
    }

    /// Encode a row of already-textual fields into buffer
    pub fn encode_str_row<I, S>(&self, fields: I, buffer: &mut String)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for (i, field) in fields.into_iter().enumerate() {
            if i > 0 {
                buffer.push(self.delimiter);
            }
            self.encode_field(field.as_ref(), buffer);
        }
    }

    /// Canonicalize and encode a single value
    pub fn encode_value(&self, value: &DsvValue, buffer: &mut String) {
        self.encode_field(&value.to_canonical(), buffer);
    }

    /// Encode single field with proper quoting/escaping
    pub fn encode_field(&self, field: &str, buffer: &mut String) {
        if self.needs_quoting(field) {
            buffer.reserve(field.len() + 2);
            buffer.push(self.enclosing);
            for ch in field.chars() {
                if ch == self.enclosing {
                    // Escape by doubling: " -> ""
                    buffer.push(self.enclosing);
                }
                buffer.push(ch);
            }
            buffer.push(self.enclosing);
        } else {
            buffer.push_str(field);
        }
    }

    /// Check if field requires quoting
    pub fn needs_quoting(&self, field: &str) -> bool {
        field
            .chars()
            .any(|c| c == self.delimiter || c == self.enclosing || c == '\n' || c == '\r')
    }
}

/// Format one value as an escaped DSV field
///
/// # Examples
///
/// ```
/// use dsvstream::{format_value, DsvOptions, DsvValue};
///
/// let options = DsvOptions::default();
/// assert_eq!(format_value(&DsvValue::from("a\"b"), &options), "\"a\"\"b\"");
/// assert_eq!(format_value(&DsvValue::Null, &options), "");
/// assert_eq!(format_value(&DsvValue::from(2.5), &options), "2.5");
/// ```
pub fn format_value(value: &DsvValue, options: &DsvOptions) -> String {
    let mut buffer = String::new();
    DsvEncoder::new(options).encode_value(value, &mut buffer);
    buffer
}

/// Format one row, joining its fields with the delimiter
///
/// An empty row formats as an empty string. No line terminator is appended.
pub fn format_row(row: &[DsvValue], options: &DsvOptions) -> String {
    let mut buffer = String::new();
    DsvEncoder::new(options).encode_row(row, &mut buffer);
    buffer
}
