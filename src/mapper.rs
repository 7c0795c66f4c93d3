//! Header-driven conversion of parsed rows into records

use crate::types::Record;

/// Session state of a [`RowToObjectMapper`]
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum MapperState {
    /// No row seen yet; the next row becomes the template
    #[default]
    AwaitingTemplate,
    /// Template captured; every row becomes a record
    MappingRows {
        /// Field names taken from the first row
        template: Vec<String>,
    },
}

impl MapperState {
    /// Advance the session by one row
    ///
    /// Returns `None` for the row captured as the template, and the mapped
    /// record for every row after it.
    pub fn accept(&mut self, row: Vec<String>) -> Option<Record> {
        if let MapperState::MappingRows { template } = self {
            let mut record = Record::with_capacity(template.len());
            for (name, value) in template.iter().zip(row) {
                record.insert(name.as_str(), value);
            }
            return Some(record);
        }

        tracing::debug!(columns = row.len(), "dsv row template captured");
        *self = MapperState::MappingRows { template: row };
        None
    }
}

/// Turns a header row plus data rows into [`Record`]s
///
/// The first row passed to [`map_row`](RowToObjectMapper::map_row) is kept as
/// the field-name template and never emitted. Every later row is paired with
/// the template by position: missing trailing values leave their fields out
/// of the record, extra values are dropped.
///
/// # Examples
///
/// ```
/// use dsvstream::{parse, DsvOptions, RowToObjectMapper};
///
/// let mut records = Vec::new();
/// let mut mapper = RowToObjectMapper::new(|record| records.push(record));
/// parse("id,name\n1,Alice\n2,Bob\n", &DsvOptions::default(), |row| mapper.map_row(row));
/// drop(mapper);
///
/// assert_eq!(records.len(), 2);
/// assert_eq!(records[1].get("name"), Some("Bob"));
/// ```
pub struct RowToObjectMapper<F>
where
    F: FnMut(Record),
{
    state: MapperState,
    on_record: F,
    record_count: u64,
}

impl<F> RowToObjectMapper<F>
where
    F: FnMut(Record),
{
    /// Start a new mapping session
    pub fn new(on_record: F) -> Self {
        Self {
            state: MapperState::AwaitingTemplate,
            on_record,
            record_count: 0,
        }
    }

    /// Feed one parsed row
    pub fn map_row(&mut self, row: Vec<String>) {
        if let Some(record) = self.state.accept(row) {
            self.record_count += 1;
            (self.on_record)(record);
        }
    }

    /// Current session state
    pub fn state(&self) -> &MapperState {
        &self.state
    }

    /// Field names, once the first row has been seen
    pub fn template(&self) -> Option<&[String]> {
        match &self.state {
            MapperState::AwaitingTemplate => None,
            MapperState::MappingRows { template } => Some(template),
        }
    }

    /// Number of records emitted so far
    pub fn record_count(&self) -> u64 {
        self.record_count
    }
}

/// Create a row callback that maps rows to records
///
/// The returned closure owns a fresh [`RowToObjectMapper`] and can be passed
/// straight to [`parse`](crate::dsv::parse) or
/// [`DsvParser::feed`](crate::dsv::DsvParser::feed).
pub fn create_row_to_object_mapper<F>(on_record: F) -> impl FnMut(Vec<String>)
where
    F: FnMut(Record),
{
    let mut mapper = RowToObjectMapper::new(on_record);
    move |row| mapper.map_row(row)
}
