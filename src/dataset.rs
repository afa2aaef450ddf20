//! Tabular parsing into an immutable [`Dataset`].
//!
//! The first non-empty line is the header. Blank lines are skipped, short rows
//! are padded with empty cells, and long rows lose their excess fields, so
//! hand-edited files load without complaint. Cells are never coerced; every
//! value stays a string until a consumer reads it as a number.

use std::{collections::HashSet, sync::Arc};

use log::debug;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ParseError {
    #[error("empty: no data rows found after the header")]
    Empty,
    #[error("missing header row")]
    MissingHeader,
    #[error("malformed CSV input: {0}")]
    Csv(#[from] csv::Error),
}

/// Parser settings for a single load.
#[derive(Debug, Clone, Copy)]
pub struct ParseOptions {
    pub delimiter: u8,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self { delimiter: b',' }
    }
}

/// One row, addressable by column name.
///
/// The header is shared with every other record of the same dataset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    headers: Arc<[String]>,
    values: Vec<String>,
}

impl Record {
    pub fn get(&self, column: &str) -> Option<&str> {
        self.headers
            .iter()
            .position(|header| header == column)
            .and_then(|idx| self.values.get(idx))
            .map(String::as_str)
    }

    /// Cell for `column`, or `""` when the column does not exist.
    pub fn value(&self, column: &str) -> &str {
        self.get(column).unwrap_or("")
    }

    /// Cells in header order.
    pub fn values(&self) -> &[String] {
        &self.values
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dataset {
    headers: Arc<[String]>,
    records: Vec<Record>,
}

impl Dataset {
    /// Builds a dataset from a header and raw rows, applying the same
    /// pad/truncate rule as [`parse`].
    pub fn from_rows<I, R, S>(headers: &[String], rows: I) -> Result<Self, ParseError>
    where
        I: IntoIterator<Item = R>,
        R: IntoIterator<Item = S>,
        S: Into<String>,
    {
        if headers.is_empty() {
            return Err(ParseError::MissingHeader);
        }
        let headers: Arc<[String]> = dedupe_headers(headers).into();
        let records = rows
            .into_iter()
            .map(|row| Record {
                headers: Arc::clone(&headers),
                values: fit_to_width(row.into_iter().map(Into::into), headers.len()),
            })
            .collect::<Vec<_>>();
        if records.is_empty() {
            return Err(ParseError::Empty);
        }
        Ok(Self { headers, records })
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|header| header == name)
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.column_index(name).is_some()
    }
}

/// Parses delimited text into a [`Dataset`].
pub fn parse(text: &str, options: ParseOptions) -> Result<Dataset, ParseError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .delimiter(options.delimiter)
        .double_quote(true)
        .flexible(true)
        .from_reader(text.as_bytes());

    let headers = reader
        .headers()?
        .iter()
        .map(str::to_string)
        .collect::<Vec<_>>();
    if headers.is_empty() {
        return Err(ParseError::MissingHeader);
    }

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record?;
        if is_blank_line(&record) {
            continue;
        }
        rows.push(record.iter().map(str::to_string).collect::<Vec<_>>());
    }
    debug!(
        "Parsed {} row(s) across {} column(s)",
        rows.len(),
        headers.len()
    );
    Dataset::from_rows(&headers, rows)
}

// The csv reader already drops empty lines; a lone empty field covers a line
// holding nothing but `\r` or a stray quote pair.
fn is_blank_line(record: &csv::StringRecord) -> bool {
    record.len() == 1 && record.get(0).is_some_and(str::is_empty)
}

fn fit_to_width<I>(values: I, width: usize) -> Vec<String>
where
    I: Iterator<Item = String>,
{
    let mut fitted = values.take(width).collect::<Vec<_>>();
    fitted.resize(width, String::new());
    fitted
}

fn dedupe_headers(headers: &[String]) -> Vec<String> {
    let mut seen = HashSet::with_capacity(headers.len());
    let mut unique = Vec::with_capacity(headers.len());
    for header in headers {
        let mut candidate = header.clone();
        let mut suffix = 0usize;
        while !seen.insert(candidate.clone()) {
            suffix += 1;
            candidate = format!("{header}_{suffix}");
        }
        unique.push(candidate);
    }
    unique
}
