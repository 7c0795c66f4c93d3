//! Value and record types

use base64::prelude::*;
use chrono::{DateTime, FixedOffset, NaiveDate, SecondsFormat, Utc};
use indexmap::IndexMap;
use std::borrow::Cow;
use std::fmt;

/// A single value to be formatted as a DSV field
///
/// The set of kinds is closed; every kind has one canonical text form,
/// see [`DsvValue::to_canonical`].
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize), serde(untagged))]
pub enum DsvValue {
    /// Absent value, formatted as an empty field
    Null,
    /// Boolean value
    Bool(bool),
    /// Integer value
    Int(i64),
    /// Float value
    Float(f64),
    /// String value
    String(String),
    /// Point in time
    Date(DateTime<Utc>),
    /// Raw bytes, formatted as standard base64
    Binary(Vec<u8>),
}

impl DsvValue {
    /// Canonical text of the value, before any escaping
    ///
    /// - `Null` → empty string
    /// - `Bool` → `true` / `false`
    /// - `Int` → decimal digits
    /// - `Float` → shortest round-trip decimal, `NaN`, `Infinity`, `-Infinity`
    /// - `Date` → ISO-8601 in UTC with milliseconds, e.g. `2024-01-02T03:04:05.000Z`
    /// - `Binary` → standard base64 with padding
    /// - `String` → unchanged
    pub fn to_canonical(&self) -> Cow<'_, str> {
        match self {
            DsvValue::Null => Cow::Borrowed(""),
            DsvValue::Bool(true) => Cow::Borrowed("true"),
            DsvValue::Bool(false) => Cow::Borrowed("false"),
            DsvValue::Int(i) => Cow::Owned(itoa::Buffer::new().format(*i).to_owned()),
            DsvValue::Float(f) => float_text(*f),
            DsvValue::String(s) => Cow::Borrowed(s.as_str()),
            DsvValue::Date(d) => Cow::Owned(d.to_rfc3339_opts(SecondsFormat::Millis, true)),
            DsvValue::Binary(bytes) => Cow::Owned(BASE64_STANDARD.encode(bytes)),
        }
    }

    /// Check if value is null
    pub fn is_null(&self) -> bool {
        matches!(self, DsvValue::Null)
    }
}

fn float_text(f: f64) -> Cow<'static, str> {
    if f.is_nan() {
        Cow::Borrowed("NaN")
    } else if f.is_infinite() {
        Cow::Borrowed(if f > 0.0 { "Infinity" } else { "-Infinity" })
    } else if f == 0.0 {
        // Also covers -0.0
        Cow::Borrowed("0")
    } else {
        Cow::Owned(f.to_string())
    }
}

impl fmt::Display for DsvValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_canonical())
    }
}

impl From<&str> for DsvValue {
    fn from(s: &str) -> Self {
        DsvValue::String(s.to_string())
    }
}

impl From<String> for DsvValue {
    fn from(s: String) -> Self {
        DsvValue::String(s)
    }
}

impl From<i64> for DsvValue {
    fn from(i: i64) -> Self {
        DsvValue::Int(i)
    }
}

impl From<i8> for DsvValue {
    fn from(i: i8) -> Self {
        DsvValue::Int(i64::from(i))
    }
}

impl From<i16> for DsvValue {
    fn from(i: i16) -> Self {
        DsvValue::Int(i64::from(i))
    }
}

impl From<i32> for DsvValue {
    fn from(i: i32) -> Self {
        DsvValue::Int(i64::from(i))
    }
}

impl From<u8> for DsvValue {
    fn from(i: u8) -> Self {
        DsvValue::Int(i64::from(i))
    }
}

impl From<u16> for DsvValue {
    fn from(i: u16) -> Self {
        DsvValue::Int(i64::from(i))
    }
}

impl From<u32> for DsvValue {
    fn from(i: u32) -> Self {
        DsvValue::Int(i64::from(i))
    }
}

impl From<f64> for DsvValue {
    fn from(f: f64) -> Self {
        DsvValue::Float(f)
    }
}

impl From<f32> for DsvValue {
    fn from(f: f32) -> Self {
        DsvValue::Float(f64::from(f))
    }
}

impl From<bool> for DsvValue {
    fn from(b: bool) -> Self {
        DsvValue::Bool(b)
    }
}

impl From<DateTime<Utc>> for DsvValue {
    fn from(d: DateTime<Utc>) -> Self {
        DsvValue::Date(d)
    }
}

impl From<DateTime<FixedOffset>> for DsvValue {
    fn from(d: DateTime<FixedOffset>) -> Self {
        DsvValue::Date(d.with_timezone(&Utc))
    }
}

impl From<NaiveDate> for DsvValue {
    /// Midnight UTC of the given day
    fn from(d: NaiveDate) -> Self {
        DsvValue::Date(d.and_time(chrono::NaiveTime::MIN).and_utc())
    }
}

impl From<Vec<u8>> for DsvValue {
    fn from(bytes: Vec<u8>) -> Self {
        DsvValue::Binary(bytes)
    }
}

impl From<&[u8]> for DsvValue {
    fn from(bytes: &[u8]) -> Self {
        DsvValue::Binary(bytes.to_vec())
    }
}

impl<T: Into<DsvValue>> From<Option<T>> for DsvValue {
    fn from(value: Option<T>) -> Self {
        value.map_or(DsvValue::Null, Into::into)
    }
}

/// One data row keyed by header name
///
/// Keys keep header column order. Produced by
/// [`RowToObjectMapper`](crate::mapper::RowToObjectMapper).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize), serde(transparent))]
pub struct Record {
    fields: IndexMap<String, String>,
}

impl Record {
    /// Create an empty record
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty record with room for `capacity` fields
    pub fn with_capacity(capacity: usize) -> Self {
        Record {
            fields: IndexMap::with_capacity(capacity),
        }
    }

    /// Set a field, returning the previous value
    ///
    /// An existing name keeps its position.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) -> Option<String> {
        self.fields.insert(name.into(), value.into())
    }

    /// Get field value by name
    pub fn get(&self, name: &str) -> Option<&str> {
        self.fields.get(name).map(String::as_str)
    }

    /// Get field name and value at position
    pub fn get_index(&self, index: usize) -> Option<(&str, &str)> {
        self.fields
            .get_index(index)
            .map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Check if a field is present
    pub fn contains_key(&self, name: &str) -> bool {
        self.fields.contains_key(name)
    }

    /// Get number of fields
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Check if record has no fields
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Iterate over `(name, value)` pairs in column order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Iterate over field names in column order
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(String::as_str)
    }

    /// Convert into the underlying ordered map
    pub fn into_map(self) -> IndexMap<String, String> {
        self.fields
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Record {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut record = Record::new();
        for (k, v) in iter {
            record.insert(k, v);
        }
        record
    }
}

impl IntoIterator for Record {
    type Item = (String, String);
    type IntoIter = indexmap::map::IntoIter<String, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.fields.into_iter()
    }
}
