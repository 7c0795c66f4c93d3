//! Error types for dsvstream

use thiserror::Error;

/// Result type alias for dsvstream operations
pub type Result<T> = std::result::Result<T, DsvError>;

/// Errors raised by the DSV engine
///
/// Parsing and formatting are total: the default engine only fails on bad
/// configuration. The structural variants are produced by the opt-in strict
/// validation of [`DsvParser::finish_strict`](crate::dsv::DsvParser::finish_strict).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DsvError {
    /// Delimiter or enclosing character is not exactly one character
    #[error("invalid {option}: expected exactly one character, got {value:?}")]
    InvalidCharacter {
        /// Name of the offending option (`delimiter` or `enclosing`)
        option: &'static str,
        /// Value that was supplied
        value: String,
    },

    /// Delimiter and enclosing character are the same
    #[error("delimiter and enclosing character must differ, both are {0:?}")]
    ConflictingCharacters(char),

    /// Input ended inside a quoted field
    #[error("unterminated quoted field in row {row}, field {field}")]
    UnterminatedQuote {
        /// 1-based row number within the document
        row: u64,
        /// 1-based position of the quoted field in its row
        field: usize,
    },

    /// Enclosing character found inside an unquoted field
    #[error("enclosing character inside unquoted field in row {row}, field {field}")]
    StrayEnclosing {
        /// 1-based row number within the document
        row: u64,
        /// 1-based position of the field in its row
        field: usize,
    },

    /// Unexpected character directly after a closing enclosing character
    #[error("unexpected {ch:?} after closing enclosing character in row {row}, field {field}")]
    TrailingAfterQuote {
        /// 1-based row number within the document
        row: u64,
        /// 1-based position of the field in its row
        field: usize,
        /// Character found after the closing enclosing character
        ch: char,
    },
}

impl DsvError {
    /// Check if this is a configuration error
    pub fn is_config(&self) -> bool {
        matches!(
            self,
            DsvError::InvalidCharacter { .. } | DsvError::ConflictingCharacters(_)
        )
    }
}
