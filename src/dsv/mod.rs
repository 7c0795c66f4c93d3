//! DSV utilities for encoding and parsing

mod encoder;
mod options;
mod parser;

pub use encoder::{format_row, format_value, DsvEncoder};
pub use options::{DsvOptions, FormatOptions, ParseOptions, DEFAULT_DELIMITER, DEFAULT_ENCLOSING};
pub use parser::{parse, parse_rows, DsvParser};
