//! # dsvstream
//!
//! Streaming delimiter-separated values (CSV, TSV, any single-character
//! delimiter) for Rust.
//!
//! - **Parser**: a character-level state machine fed in chunks of any size,
//!   emitting each row through a callback as soon as it is complete.
//! - **Formatter**: typed values ([`DsvValue`]) to correctly escaped DSV text.
//! - **Mapper**: header row plus data rows to ordered [`Record`]s.
//!
//! Parsing is lenient and never fails; the only error of the default engine is
//! an invalid [`DsvOptions`]. Strict validation of quoting is available through
//! [`DsvParser::finish_strict`].
//!
//! ## Quick Start
//!
//! ```
//! use dsvstream::{format_rows, parse_rows, DsvOptions, DsvValue};
//!
//! let options = DsvOptions::default();
//! let text = format_rows(
//!     &[
//!         vec![DsvValue::from("name"), DsvValue::from("quote")],
//!         vec![DsvValue::from("Alice"), DsvValue::from("Say \"hi\", then leave")],
//!     ],
//!     &options,
//! );
//! assert_eq!(text, "name,quote\nAlice,\"Say \"\"hi\"\", then leave\"\n");
//!
//! let rows = parse_rows(&text, &options);
//! assert_eq!(rows[1], vec!["Alice", "Say \"hi\", then leave"]);
//! ```
//!
//! ## Streaming
//!
//! ```
//! use dsvstream::{create_row_to_object_mapper, DsvOptions, DsvParser};
//!
//! let mut records = Vec::new();
//! let mut on_row = create_row_to_object_mapper(|record| records.push(record));
//!
//! let mut parser = DsvParser::new(DsvOptions::new(';', '"').unwrap());
//! for chunk in ["city;pop", "ulation\nOslo;70", "9037\n"] {
//!     parser.feed(chunk, &mut on_row);
//! }
//! parser.finish(&mut on_row);
//! drop(on_row);
//!
//! assert_eq!(records[0].get("population"), Some("709037"));
//! ```

pub mod dsv;
pub mod dsv_reader;
pub mod dsv_writer;
pub mod error;
pub mod mapper;
pub mod types;

pub use dsv::{
    format_row, format_value, parse, parse_rows, DsvEncoder, DsvOptions, DsvParser,
    FormatOptions, ParseOptions,
};
pub use dsv_reader::{DsvReader, DsvRecordIterator, DsvRowIterator};
pub use dsv_writer::{format_rows, DsvWriter};
pub use error::{DsvError, Result};
pub use mapper::{create_row_to_object_mapper, MapperState, RowToObjectMapper};
pub use types::{DsvValue, Record};
