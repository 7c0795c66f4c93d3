//! Delimiter and enclosing character configuration

use crate::error::{DsvError, Result};

/// Default field delimiter
pub const DEFAULT_DELIMITER: char = ',';

/// Default enclosing (quote) character
pub const DEFAULT_ENCLOSING: char = '"';

/// Configuration shared by the parser and the formatter
///
/// A `DsvOptions` value always holds two distinct characters; every
/// constructor validates that before returning.
///
/// Any other pair is accepted, including `\n` and `\r`. Those characters
/// also end rows, so options that use one of them as the delimiter or
/// enclosing character produce output that does not parse back into the same
/// rows: with a `\n` delimiter, row terminators read back as delimiters and
/// the whole document becomes one row.
///
/// # Examples
///
/// ```
/// use dsvstream::DsvOptions;
///
/// let tsv = DsvOptions::new('\t', '"').unwrap();
/// assert_eq!(tsv.delimiter(), '\t');
///
/// assert!(DsvOptions::new('"', '"').is_err());
/// assert!(DsvOptions::from_strs(";;", "'").is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(try_from = "RawOptions", into = "RawOptions")
)]
pub struct DsvOptions {
    delimiter: char,
    enclosing: char,
}

/// Options used by [`DsvParser`](crate::dsv::DsvParser)
pub type ParseOptions = DsvOptions;

/// Options used by the formatting functions
pub type FormatOptions = DsvOptions;

impl Default for DsvOptions {
    fn default() -> Self {
        DsvOptions {
            delimiter: DEFAULT_DELIMITER,
            enclosing: DEFAULT_ENCLOSING,
        }
    }
}

impl DsvOptions {
    /// Create options with a custom delimiter and enclosing character
    pub fn new(delimiter: char, enclosing: char) -> Result<Self> {
        if delimiter == enclosing {
            return Err(DsvError::ConflictingCharacters(delimiter));
        }
        Ok(DsvOptions {
            delimiter,
            enclosing,
        })
    }

    /// Create options from strings, each of which must hold exactly one character
    ///
    /// Useful when the characters come from user input or configuration files.
    pub fn from_strs(delimiter: &str, enclosing: &str) -> Result<Self> {
        let delimiter = single_char("delimiter", delimiter)?;
        let enclosing = single_char("enclosing", enclosing)?;
        Self::new(delimiter, enclosing)
    }

    /// Replace the delimiter (builder pattern)
    pub fn with_delimiter(self, delimiter: char) -> Result<Self> {
        Self::new(delimiter, self.enclosing)
    }

    /// Replace the enclosing character (builder pattern)
    pub fn with_enclosing(self, enclosing: char) -> Result<Self> {
        Self::new(self.delimiter, enclosing)
    }

    /// Field delimiter
    pub fn delimiter(&self) -> char {
        self.delimiter
    }

    /// Enclosing (quote) character
    pub fn enclosing(&self) -> char {
        self.enclosing
    }
}

fn single_char(option: &'static str, value: &str) -> Result<char> {
    let mut chars = value.chars();
    match (chars.next(), chars.next()) {
        (Some(ch), None) => Ok(ch),
        _ => Err(DsvError::InvalidCharacter {
            option,
            value: value.to_string(),
        }),
    }
}

/// Serialized form: both fields optional, validated on conversion
#[cfg(feature = "serde")]
#[derive(serde::Serialize, serde::Deserialize)]
#[serde(default)]
struct RawOptions {
    delimiter: String,
    enclosing: String,
}

#[cfg(feature = "serde")]
impl Default for RawOptions {
    fn default() -> Self {
        RawOptions {
            delimiter: DEFAULT_DELIMITER.to_string(),
            enclosing: DEFAULT_ENCLOSING.to_string(),
        }
    }
}

#[cfg(feature = "serde")]
impl TryFrom<RawOptions> for DsvOptions {
    type Error = DsvError;

    fn try_from(raw: RawOptions) -> Result<Self> {
        DsvOptions::from_strs(&raw.delimiter, &raw.enclosing)
    }
}

#[cfg(feature = "serde")]
impl From<DsvOptions> for RawOptions {
    fn from(options: DsvOptions) -> Self {
        RawOptions {
            delimiter: options.delimiter.to_string(),
            enclosing: options.enclosing.to_string(),
        }
    }
}
