//! Pull-style DSV reading over a sequence of text chunks

use crate::dsv::{DsvOptions, DsvParser};
use crate::error::DsvError;
use crate::mapper::MapperState;
use crate::types::Record;
use std::collections::VecDeque;

/// DSV reader yielding rows from a sequence of chunks
///
/// Wraps any iterator of text chunks (lines from a socket, blocks read from a
/// file, a single in-memory string) and hands out parsed rows one at a time.
/// A chunk is pulled only when no parsed row is buffered. The reader does no
/// I/O of its own.
///
/// # Examples
///
/// ```
/// use dsvstream::{DsvOptions, DsvReader};
///
/// let chunks = vec!["id,na", "me\n1,Al", "ice\n2,Bob"];
/// let mut reader = DsvReader::new(chunks, DsvOptions::default());
///
/// let rows: Vec<Vec<String>> = reader.rows().collect();
/// assert_eq!(rows.len(), 3);
/// assert_eq!(rows[1], vec!["1", "Alice"]);
/// ```
///
/// # With Headers
///
/// ```
/// use dsvstream::{DsvOptions, DsvReader};
///
/// let mut reader = DsvReader::from_text("id,name\n1,Alice\n", DsvOptions::default())
///     .has_header(true);
///
/// let rows: Vec<Vec<String>> = reader.rows().collect();
/// assert_eq!(rows, vec![vec!["1", "Alice"]]);
/// assert_eq!(reader.headers(), Some(&["id".to_string(), "name".to_string()][..]));
/// ```
pub struct DsvReader<I> {
    chunks: I,
    parser: DsvParser,
    pending: VecDeque<Vec<String>>,
    finished: bool,
    row_count: u64,
    has_header: bool,
    headers: Vec<String>,
}

impl<'a> DsvReader<std::iter::Once<&'a str>> {
    /// Read from a single in-memory string
    pub fn from_text(input: &'a str, options: DsvOptions) -> Self {
        DsvReader::new(std::iter::once(input), options)
    }
}

impl<I, S> DsvReader<I>
where
    I: Iterator<Item = S>,
    S: AsRef<str>,
{
    /// Create a reader over a sequence of chunks
    pub fn new<C>(chunks: C, options: DsvOptions) -> Self
    where
        C: IntoIterator<IntoIter = I>,
    {
        DsvReader {
            chunks: chunks.into_iter(),
            parser: DsvParser::new(options),
            pending: VecDeque::new(),
            finished: false,
            row_count: 0,
            has_header: false,
            headers: Vec::new(),
        }
    }

    /// Indicate that the first row contains headers (builder pattern)
    ///
    /// When set to `true`, the first row is stored and accessible via
    /// `headers()`, and the `rows()` iterator skips it.
    pub fn has_header(mut self, has: bool) -> Self {
        self.has_header = has;
        self
    }

    /// Get header row if available
    ///
    /// Returns `None` until the header row has been read.
    pub fn headers(&self) -> Option<&[String]> {
        if self.headers.is_empty() {
            None
        } else {
            Some(&self.headers)
        }
    }

    /// Read a single row, header included
    ///
    /// Returns `None` once all chunks are consumed and the last row flushed.
    pub fn read_row(&mut self) -> Option<Vec<String>> {
        loop {
            if let Some(row) = self.pending.pop_front() {
                if self.has_header && self.row_count == 0 {
                    self.headers = row.clone();
                }
                self.row_count += 1;
                return Some(row);
            }

            if self.finished {
                return None;
            }

            let pending = &mut self.pending;
            match self.chunks.next() {
                Some(chunk) => self.parser.feed(chunk.as_ref(), |row| pending.push_back(row)),
                None => {
                    self.parser.finish(|row| pending.push_back(row));
                    self.finished = true;
                }
            }
        }
    }

    /// Get iterator over rows
    pub fn rows(&mut self) -> DsvRowIterator<'_, I> {
        DsvRowIterator { reader: self }
    }

    /// Get iterator over records keyed by the header row
    ///
    /// The first row not yet read becomes the field-name template, unless a
    /// header row was already captured through `has_header(true)`.
    pub fn records(&mut self) -> DsvRecordIterator<'_, I> {
        let state = match self.headers() {
            Some(headers) => MapperState::MappingRows {
                template: headers.to_vec(),
            },
            None => MapperState::AwaitingTemplate,
        };
        DsvRecordIterator {
            reader: self,
            state,
        }
    }

    /// Get the number of rows read so far, header included
    pub fn row_count(&self) -> u64 {
        self.row_count
    }

    /// First malformed-quoting case the parser resolved leniently
    pub fn first_issue(&self) -> Option<&DsvError> {
        self.parser.first_issue()
    }
}

/// Iterator over DSV rows
pub struct DsvRowIterator<'a, I> {
    reader: &'a mut DsvReader<I>,
}

impl<I, S> Iterator for DsvRowIterator<'_, I>
where
    I: Iterator<Item = S>,
    S: AsRef<str>,
{
    type Item = Vec<String>;

    fn next(&mut self) -> Option<Self::Item> {
        let row = self.reader.read_row()?;
        // Skip header if has_header is true and this is the first row
        if self.reader.has_header && self.reader.row_count == 1 {
            self.reader.read_row()
        } else {
            Some(row)
        }
    }
}

/// Iterator over records
pub struct DsvRecordIterator<'a, I> {
    reader: &'a mut DsvReader<I>,
    state: MapperState,
}

impl<I, S> Iterator for DsvRecordIterator<'_, I>
where
    I: Iterator<Item = S>,
    S: AsRef<str>,
{
    type Item = Record;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let row = self.reader.read_row()?;
            if let Some(record) = self.state.accept(row) {
                return Some(record);
            }
        }
    }
}
