//! Incremental DSV document building

use crate::dsv::{DsvEncoder, DsvOptions};
use crate::types::DsvValue;

const LINE_ENDING: char = '\n';

/// DSV document writer
///
/// Appends one escaped line per row to an in-memory buffer. Every row ends
/// with `\n`; a document with no rows at all finishes as a single `\n`.
///
/// # Examples
///
/// ```
/// use dsvstream::{DsvOptions, DsvValue, DsvWriter};
///
/// let mut writer = DsvWriter::new(DsvOptions::default());
/// writer.write_row(["Name", "Age", "City"]);
/// writer.write_row_typed(&[
///     DsvValue::from("Alice"),
///     DsvValue::from(30),
///     DsvValue::from("New York, NY"),
/// ]);
/// assert_eq!(writer.finish(), "Name,Age,City\nAlice,30,\"New York, NY\"\n");
/// ```
#[derive(Debug, Clone)]
pub struct DsvWriter {
    encoder: DsvEncoder,
    buffer: String,
    row_count: u64,
}

impl DsvWriter {
    /// Create a new writer
    pub fn new(options: DsvOptions) -> Self {
        Self::with_capacity(options, 4096)
    }

    /// Create a writer with `capacity` bytes preallocated
    pub fn with_capacity(options: DsvOptions, capacity: usize) -> Self {
        DsvWriter {
            encoder: DsvEncoder::new(&options),
            buffer: String::with_capacity(capacity),
            row_count: 0,
        }
    }

    /// Write a row of strings
    pub fn write_row<I, S>(&mut self, data: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.encoder.encode_str_row(data, &mut self.buffer);
        self.buffer.push(LINE_ENDING);
        self.row_count += 1;
    }

    /// Write a row of typed values
    pub fn write_row_typed(&mut self, values: &[DsvValue]) {
        self.encoder.encode_row(values, &mut self.buffer);
        self.buffer.push(LINE_ENDING);
        self.row_count += 1;
    }

    /// Write multiple rows of strings at once
    pub fn write_rows_batch<I, R, S>(&mut self, rows: I)
    where
        I: IntoIterator<Item = R>,
        R: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for row_data in rows {
            self.write_row(row_data);
        }
    }

    /// Get the number of rows written
    pub fn row_count(&self) -> u64 {
        self.row_count
    }

    /// Text written so far
    pub fn as_str(&self) -> &str {
        &self.buffer
    }

    /// Finalize the document
    pub fn finish(mut self) -> String {
        if self.row_count == 0 {
            self.buffer.push(LINE_ENDING);
        }
        self.buffer
    }
}

/// Format rows as a complete document
///
/// Rows are joined with `\n` and the result always ends with exactly one
/// `\n`. An empty slice gives `"\n"`, which parses back as one row holding a
/// single empty field rather than as zero rows.
///
/// # Examples
///
/// ```
/// use dsvstream::{format_rows, DsvOptions, DsvValue};
///
/// let rows = vec![
///     vec![DsvValue::from("a"), DsvValue::from("b"), DsvValue::from("c")],
///     vec![DsvValue::from(1), DsvValue::from(2), DsvValue::from(3)],
/// ];
/// assert_eq!(format_rows(&rows, &DsvOptions::default()), "a,b,c\n1,2,3\n");
/// ```
pub fn format_rows<R>(rows: &[R], options: &DsvOptions) -> String
where
    R: AsRef<[DsvValue]>,
{
    let mut writer = DsvWriter::new(*options);
    for row in rows {
        writer.write_row_typed(row.as_ref());
    }
    writer.finish()
}
