//! Streaming DSV parsing with RFC 4180-like behavior
//!
//! The parser is a character-level state machine. Every piece of state that
//! must survive a chunk boundary (an open quoted field, a quote that may be the
//! first half of an escaped pair, a `\r` that may be followed by `\n`, a UTF-8
//! sequence split across byte chunks) lives in [`DsvParser`], so a document
//! can be fed in chunks of any size and produces the same rows as a single call.

use super::options::DsvOptions;
use crate::error::{DsvError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    /// About to read the first character of a field
    FieldStart,
    /// Inside a field that began with the enclosing character
    InQuotedField,
    /// Saw an enclosing character inside a quoted field
    QuoteInQuotedField,
    /// Inside a field that did not begin with the enclosing character
    InUnquotedField,
    /// A `\r` ended the previous row; a following `\n` belongs to it
    AfterCarriageReturn,
}

/// Streaming DSV parser
///
/// Holds the state of one parse session. Feed it chunks with [`feed`] (or
/// [`feed_bytes`]) and call [`finish`] once the input is exhausted; the row
/// callback fires once per completed row, in document order.
///
/// Malformed quoting never fails: an unterminated quoted field is closed by the
/// end of input and stray enclosing characters are kept as data. Use
/// [`finish_strict`] to have the first such irregularity reported as an error.
///
/// [`feed`]: DsvParser::feed
/// [`feed_bytes`]: DsvParser::feed_bytes
/// [`finish`]: DsvParser::finish
/// [`finish_strict`]: DsvParser::finish_strict
///
/// # Examples
///
/// ```
/// use dsvstream::{DsvOptions, DsvParser};
///
/// let mut parser = DsvParser::new(DsvOptions::default());
/// let mut rows = Vec::new();
///
/// parser.feed("name,note\nAlice,\"multi", |row| rows.push(row));
/// parser.feed("\nline\"\nBob,", |row| rows.push(row));
/// parser.finish(|row| rows.push(row));
///
/// assert_eq!(rows, vec![
///     vec!["name", "note"],
///     vec!["Alice", "multi\nline"],
///     vec!["Bob", ""],
/// ]);
/// ```
#[derive(Debug, Clone)]
pub struct DsvParser {
    options: DsvOptions,
    state: State,
    row: Option<Vec<String>>,
    field: String,
    pending_bytes: Vec<u8>,
    row_count: u64,
    /// `row_count` when the current document started
    document_start: u64,
    /// `finish` ran and no input has arrived since
    finished: bool,
    first_issue: Option<DsvError>,
}

impl DsvParser {
    /// Create a parser for one document
    pub fn new(options: DsvOptions) -> Self {
        Self {
            options,
            state: State::FieldStart,
            row: None,
            field: String::new(),
            pending_bytes: Vec::new(),
            row_count: 0,
            document_start: 0,
            finished: false,
            first_issue: None,
        }
    }

    /// Options this parser was created with
    pub fn options(&self) -> DsvOptions {
        self.options
    }

    /// Parse the next chunk of text
    ///
    /// Rows completed by this chunk are passed to `on_row`. A row still in
    /// progress at the end of the chunk is kept until a later call completes it.
    pub fn feed<F>(&mut self, chunk: &str, mut on_row: F)
    where
        F: FnMut(Vec<String>),
    {
        self.begin_document();
        self.flush_pending_bytes(&mut on_row);
        self.feed_chars(chunk, &mut on_row);
    }

    /// Parse the next chunk of UTF-8 bytes
    ///
    /// A multi-byte character split across two chunks is held back until the
    /// next chunk completes it. Invalid sequences are replaced with U+FFFD.
    pub fn feed_bytes<F>(&mut self, chunk: &[u8], mut on_row: F)
    where
        F: FnMut(Vec<String>),
    {
        self.begin_document();

        // Complete a held-back sequence one byte at a time
        let mut rest = chunk;
        while !self.pending_bytes.is_empty() {
            let Some((&byte, tail)) = rest.split_first() else {
                return;
            };
            self.pending_bytes.push(byte);
            rest = tail;
            match std::str::from_utf8(&self.pending_bytes) {
                Err(err) if err.error_len().is_none() => {}
                _ => {
                    let held = std::mem::take(&mut self.pending_bytes);
                    self.decode(&held, &mut on_row);
                }
            }
        }

        self.decode(rest, &mut on_row);
    }

    /// Signal end of input and flush the last row
    ///
    /// A document without a trailing line terminator still yields its last
    /// row here. An open quoted field is closed implicitly.
    ///
    /// The parser is left ready for another document. [`first_issue`] stays
    /// readable until the next `feed` or `feed_bytes` call starts that document;
    /// issue tracking and the row numbers in issues then restart, while
    /// [`row_count`] keeps accumulating.
    ///
    /// [`first_issue`]: DsvParser::first_issue
    /// [`row_count`]: DsvParser::row_count
    pub fn finish<F>(&mut self, mut on_row: F)
    where
        F: FnMut(Vec<String>),
    {
        self.flush_pending_bytes(&mut on_row);

        match self.state {
            State::FieldStart => {
                // A row that ended in a delimiter still has one empty field to go
                if self.row.is_some() {
                    self.end_row(&mut on_row);
                }
            }
            State::AfterCarriageReturn => self.state = State::FieldStart,
            State::InQuotedField => {
                self.note_issue(|row, field| DsvError::UnterminatedQuote { row, field });
                self.end_row(&mut on_row);
            }
            State::InUnquotedField | State::QuoteInQuotedField => self.end_row(&mut on_row),
        }

        self.finished = true;
        tracing::debug!(
            rows = self.row_count - self.document_start,
            total = self.row_count,
            "dsv parse finished"
        );
    }

    /// Like [`finish`](DsvParser::finish), then report malformed quoting
    ///
    /// Rows are delivered exactly as `finish` would deliver them. Afterwards
    /// the first irregularity seen in this document, if any, is returned.
    pub fn finish_strict<F>(&mut self, on_row: F) -> Result<()>
    where
        F: FnMut(Vec<String>),
    {
        self.finish(on_row);
        match self.first_issue.take() {
            Some(err) => {
                tracing::debug!(error = %err, "strict dsv validation failed");
                Err(err)
            }
            None => Ok(()),
        }
    }

    /// First malformed-quoting case resolved leniently in the current document
    pub fn first_issue(&self) -> Option<&DsvError> {
        self.first_issue.as_ref()
    }

    /// Number of rows emitted so far
    pub fn row_count(&self) -> u64 {
        self.row_count
    }

    /// Check if no row is in progress
    pub fn is_idle(&self) -> bool {
        self.row.is_none()
            && self.pending_bytes.is_empty()
            && matches!(self.state, State::FieldStart | State::AfterCarriageReturn)
    }

    /// Discard all session state
    pub fn reset(&mut self) {
        *self = DsvParser::new(self.options);
    }

    fn begin_document(&mut self) {
        if self.finished {
            self.finished = false;
            self.first_issue = None;
            self.document_start = self.row_count;
        }
    }

    /// 1-based number of the row in progress, counted within the document
    fn current_row(&self) -> u64 {
        self.row_count - self.document_start + 1
    }

    fn decode<F>(&mut self, mut bytes: &[u8], on_row: &mut F)
    where
        F: FnMut(Vec<String>),
    {
        loop {
            match std::str::from_utf8(bytes) {
                Ok(text) => {
                    self.feed_chars(text, on_row);
                    return;
                }
                Err(err) => {
                    let (valid, rest) = bytes.split_at(err.valid_up_to());
                    if let Ok(text) = std::str::from_utf8(valid) {
                        self.feed_chars(text, on_row);
                    }
                    match err.error_len() {
                        Some(len) => {
                            tracing::warn!(
                                row = self.current_row(),
                                "invalid UTF-8 sequence replaced"
                            );
                            self.step(char::REPLACEMENT_CHARACTER, on_row);
                            bytes = &rest[len..];
                        }
                        None => {
                            // Incomplete sequence at the end of the chunk
                            self.pending_bytes.extend_from_slice(rest);
                            return;
                        }
                    }
                }
            }
        }
    }

    fn flush_pending_bytes<F>(&mut self, on_row: &mut F)
    where
        F: FnMut(Vec<String>),
    {
        if !self.pending_bytes.is_empty() {
            self.pending_bytes.clear();
            tracing::warn!(
                row = self.current_row(),
                "truncated UTF-8 sequence replaced"
            );
            self.step(char::REPLACEMENT_CHARACTER, on_row);
        }
    }

    fn feed_chars<F>(&mut self, text: &str, on_row: &mut F)
    where
        F: FnMut(Vec<String>),
    {
        for ch in text.chars() {
            self.step(ch, on_row);
        }
    }

    fn step<F>(&mut self, ch: char, on_row: &mut F)
    where
        F: FnMut(Vec<String>),
    {
        let delimiter = self.options.delimiter();
        let enclosing = self.options.enclosing();

        match self.state {
            State::AfterCarriageReturn => {
                self.state = State::FieldStart;
                if ch != '\n' {
                    self.step(ch, on_row);
                }
            }
            State::FieldStart => {
                self.row.get_or_insert_with(Vec::new);
                if ch == enclosing {
                    self.state = State::InQuotedField;
                } else {
                    self.unquoted(ch, on_row);
                }
            }
            State::InUnquotedField => {
                if ch == enclosing {
                    self.note_issue(|row, field| DsvError::StrayEnclosing { row, field });
                }
                self.unquoted(ch, on_row);
            }
            State::InQuotedField => {
                if ch == enclosing {
                    self.state = State::QuoteInQuotedField;
                } else {
                    self.field.push(ch);
                }
            }
            State::QuoteInQuotedField => {
                if ch == enclosing {
                    // Escaped enclosing character ("")
                    self.field.push(ch);
                    self.state = State::InQuotedField;
                } else if ch == delimiter || ch == '\n' || ch == '\r' {
                    self.unquoted(ch, on_row);
                } else {
                    self.note_issue(|row, field| DsvError::TrailingAfterQuote { row, field, ch });
                    self.unquoted(ch, on_row);
                }
            }
        }
    }

    /// Handle a character outside of quotes
    fn unquoted<F>(&mut self, ch: char, on_row: &mut F)
    where
        F: FnMut(Vec<String>),
    {
        if ch == self.options.delimiter() {
            self.end_field();
        } else if ch == '\n' {
            self.end_row(on_row);
        } else if ch == '\r' {
            self.end_row(on_row);
            self.state = State::AfterCarriageReturn;
        } else {
            self.field.push(ch);
            self.state = State::InUnquotedField;
        }
    }

    fn end_field(&mut self) {
        let field = std::mem::take(&mut self.field);
        self.row.get_or_insert_with(Vec::new).push(field);
        self.state = State::FieldStart;
    }

    fn end_row<F>(&mut self, on_row: &mut F)
    where
        F: FnMut(Vec<String>),
    {
        self.end_field();
        if let Some(row) = self.row.take() {
            self.row_count += 1;
            tracing::trace!(row = self.row_count, fields = row.len(), "dsv row parsed");
            on_row(row);
        }
    }

    fn note_issue(&mut self, make: impl FnOnce(u64, usize) -> DsvError) {
        if self.first_issue.is_none() {
            let field = self.row.as_ref().map_or(0, Vec::len) + 1;
            self.first_issue = Some(make(self.current_row(), field));
        }
    }
}

/// Parse a complete document, calling `on_row` once per row
///
/// # Examples
///
/// ```
/// use dsvstream::{parse, DsvOptions};
///
/// let mut count = 0;
/// parse("a,b\nc,d", &DsvOptions::default(), |_row| count += 1);
/// assert_eq!(count, 2);
/// ```
pub fn parse<F>(input: &str, options: &DsvOptions, mut on_row: F)
where
    F: FnMut(Vec<String>),
{
    let mut parser = DsvParser::new(*options);
    parser.feed(input, &mut on_row);
    parser.finish(&mut on_row);
}

/// Parse a complete document into a vector of rows
pub fn parse_rows(input: &str, options: &DsvOptions) -> Vec<Vec<String>> {
    let mut rows = Vec::new();
    parse(input, options, |row| rows.push(row));
    rows
}
