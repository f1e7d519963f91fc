//! Interactive field collection for new records.
//!
//! # Responsibility
//! - Define the seam to whatever supplies field values (terminal, script).
//! - Ask for the remaining fields of a record kind in a fixed order.
//!
//! # Invariants
//! - The title is validated before any prompt is shown.
//! - Only fields of the requested kind are asked for.

use crate::model::clock::Clock;
use crate::model::record::{Record, RecordKind, RecordPayload, RecordValidationError};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::io;

/// Supplies already-entered field values, one prompt at a time.
pub trait FieldSource {
    fn ask(&mut self, prompt: &str) -> io::Result<String>;
}

#[derive(Debug)]
pub enum InputError {
    Io(io::Error),
    Validation(RecordValidationError),
}

impl Display for InputError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io(err) => write!(f, "failed to read field value: {err}"),
            Self::Validation(err) => write!(f, "{err}"),
        }
    }
}

impl Error for InputError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io(err) => Some(err),
            Self::Validation(err) => Some(err),
        }
    }
}

impl From<io::Error> for InputError {
    fn from(value: io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<RecordValidationError> for InputError {
    fn from(value: RecordValidationError) -> Self {
        Self::Validation(value)
    }
}

pub const PROMPT_DESCRIPTION: &str = "Description";

/// Prompts for the variant-specific fields of `kind`, in ask order.
pub fn variant_prompts(kind: RecordKind) -> &'static [&'static str] {
    match kind {
        RecordKind::Information => &["Given by"],
        RecordKind::Decision => &["Result"],
        RecordKind::Task => &["Owner", "Priority", "Due"],
    }
}

/// Builds a new record of `kind`, asking `source` for the missing fields.
///
/// `description` is asked for only when `None`.
pub fn build_record(
    kind: RecordKind,
    title: &str,
    description: Option<String>,
    source: &mut dyn FieldSource,
    clock: &dyn Clock,
) -> Result<Record, InputError> {
    if title.trim().is_empty() {
        return Err(RecordValidationError::EmptyTitle.into());
    }

    let description = match description {
        Some(description) => description,
        None => source.ask(PROMPT_DESCRIPTION)?,
    };

    let mut answers = Vec::with_capacity(3);
    for prompt in variant_prompts(kind) {
        answers.push(source.ask(prompt)?);
    }
    let mut answers = answers.into_iter();
    let mut next = || answers.next().unwrap_or_default();

    let payload = match kind {
        RecordKind::Information => RecordPayload::Information { given_by: next() },
        RecordKind::Decision => RecordPayload::Decision { result: next() },
        RecordKind::Task => RecordPayload::Task {
            owner: next(),
            priority: next(),
            due: next(),
        },
    };

    Ok(Record::new(title, description, payload, clock)?)
}
