//! Pipe-delimited row codec for the protocol file.
//!
//! # Responsibility
//! - Define the column layout once and encode/decode rows against it.
//! - Escape delimiter and line-break characters inside field values.
//!
//! # Invariants
//! - Every encoded row has exactly `COLUMNS.len()` fields.
//! - Columns of other variants are written as empty fields.
//! - Values without special characters are written verbatim.
//! - Reading never rejects a backslash: unknown or dangling escapes are kept
//!   as literal text, so hand-written rows such as `C:\docs` still load.

use crate::model::record::{Record, RecordKind, RecordPayload, RecordValidationError};
use std::collections::HashMap;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub const DELIMITER: char = '|';
const ESCAPE: char = '\\';

pub const COL_CREATION_DATE: &str = "creation_date";
pub const COL_CREATION_TIME: &str = "creation_time";
pub const COL_KIND: &str = "kind";
pub const COL_TITLE: &str = "title";
pub const COL_DESC: &str = "desc";
pub const COL_GIVEN_BY: &str = "given_by";
pub const COL_RESULT: &str = "result";
pub const COL_OWNER: &str = "owner";
pub const COL_PRIORITY: &str = "priority";
pub const COL_DUE: &str = "due";

/// Fixed column order of the header and every data row.
pub const COLUMNS: [&str; 10] = [
    COL_CREATION_DATE,
    COL_CREATION_TIME,
    COL_KIND,
    COL_TITLE,
    COL_DESC,
    COL_GIVEN_BY,
    COL_RESULT,
    COL_OWNER,
    COL_PRIORITY,
    COL_DUE,
];

/// Reason a data row could not be turned into a record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RowError {
    ColumnCount { expected: usize, found: usize },
    MissingColumn(&'static str),
    UnknownKind(String),
    Encoding { valid_up_to: usize },
    Invalid(RecordValidationError),
}

impl Display for RowError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::ColumnCount { expected, found } => {
                write!(f, "expected {expected} columns, found {found}")
            }
            Self::MissingColumn(name) => write!(f, "header has no `{name}` column"),
            Self::UnknownKind(kind) => write!(f, "unknown record kind `{kind}`"),
            Self::Encoding { valid_up_to } => {
                write!(f, "invalid UTF-8 after byte {valid_up_to}")
            }
            Self::Invalid(err) => write!(f, "{err}"),
        }
    }
}

impl Error for RowError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Invalid(err) => Some(err),
            _ => None,
        }
    }
}

impl From<RecordValidationError> for RowError {
    fn from(value: RecordValidationError) -> Self {
        Self::Invalid(value)
    }
}

/// Column-name-to-position mapping read from the first line of the file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Header {
    positions: HashMap<String, usize>,
    width: usize,
}

impl Header {
    /// Parses a header line. Names are trimmed; the first occurrence wins.
    pub fn parse(line: &str) -> Self {
        let mut positions = HashMap::new();
        let mut width = 0;
        for (index, name) in line.split(DELIMITER).enumerate() {
            positions.entry(name.trim().to_string()).or_insert(index);
            width = index + 1;
        }
        Self { positions, width }
    }

    /// Number of columns every data row must have.
    pub fn width(&self) -> usize {
        self.width
    }

    pub fn position(&self, column: &str) -> Option<usize> {
        self.positions.get(column).copied()
    }
}

impl Default for Header {
    fn default() -> Self {
        Self::parse(&encode_header())
    }
}

pub fn encode_header() -> String {
    COLUMNS.join(DELIMITER.to_string().as_str())
}

/// Encodes one record as a data row in `COLUMNS` order.
pub fn encode_record(record: &Record) -> String {
    let mut fields: [&str; COLUMNS.len()] = [""; COLUMNS.len()];
    fields[0] = record.creation_date.as_str();
    fields[1] = record.creation_time.as_str();
    fields[2] = record.kind().as_str();
    fields[3] = record.title.as_str();
    fields[4] = record.description.as_str();
    match &record.payload {
        RecordPayload::Information { given_by } => fields[5] = given_by.as_str(),
        RecordPayload::Decision { result } => fields[6] = result.as_str(),
        RecordPayload::Task {
            owner,
            priority,
            due,
        } => {
            fields[7] = owner.as_str();
            fields[8] = priority.as_str();
            fields[9] = due.as_str();
        }
    }

    let mut line = String::new();
    for (index, field) in fields.iter().enumerate() {
        if index > 0 {
            line.push(DELIMITER);
        }
        escape_into(field, &mut line);
    }
    line
}

/// Decodes one data row using the column positions from `header`.
///
/// Only the columns belonging to the row's own kind are read.
pub fn decode_row(header: &Header, line: &str) -> Result<Record, RowError> {
    let fields = split_fields(line);
    if fields.len() != header.width() {
        return Err(RowError::ColumnCount {
            expected: header.width(),
            found: fields.len(),
        });
    }

    let column = |name: &'static str| -> Result<String, RowError> {
        header
            .position(name)
            .map(|index| fields[index].clone())
            .ok_or(RowError::MissingColumn(name))
    };

    let kind_text = column(COL_KIND)?;
    let kind = RecordKind::parse(&kind_text).ok_or(RowError::UnknownKind(kind_text))?;
    let payload = match kind {
        RecordKind::Information => RecordPayload::Information {
            given_by: column(COL_GIVEN_BY)?,
        },
        RecordKind::Decision => RecordPayload::Decision {
            result: column(COL_RESULT)?,
        },
        RecordKind::Task => RecordPayload::Task {
            owner: column(COL_OWNER)?,
            priority: column(COL_PRIORITY)?,
            due: column(COL_DUE)?,
        },
    };

    let record = Record::restore(
        column(COL_CREATION_DATE)?,
        column(COL_CREATION_TIME)?,
        column(COL_TITLE)?,
        column(COL_DESC)?,
        payload,
    )?;
    Ok(record)
}

fn escape_into(value: &str, out: &mut String) {
    for ch in value.chars() {
        match ch {
            ESCAPE => out.push_str("\\\\"),
            DELIMITER => out.push_str("\\|"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            other => out.push(other),
        }
    }
}

/// Splits a row on unescaped delimiters and unescapes each field.
///
/// A backslash not followed by a known escape stays a literal backslash.
fn split_fields(line: &str) -> Vec<String> {
    let mut fields = Vec::new();
    let mut current = String::new();
    let mut chars = line.chars();

    while let Some(ch) = chars.next() {
        match ch {
            ESCAPE => match chars.next() {
                Some(ESCAPE) => current.push(ESCAPE),
                Some(DELIMITER) => current.push(DELIMITER),
                Some('n') => current.push('\n'),
                Some('r') => current.push('\r'),
                Some(other) => {
                    current.push(ESCAPE);
                    current.push(other);
                }
                None => current.push(ESCAPE),
            },
            DELIMITER => fields.push(std::mem::take(&mut current)),
            other => current.push(other),
        }
    }
    fields.push(current);

    fields
}
