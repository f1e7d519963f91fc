//! Protocol record domain model.
//!
//! # Responsibility
//! - Define the canonical item recorded in a meeting protocol.
//! - Keep variant-specific fields inside a single tagged payload.
//!
//! # Invariants
//! - `kind()` is derived from `payload`, never stored separately.
//! - `title` is non-empty after trimming.
//! - `creation_date`/`creation_time` come from a `Clock` on construction, or
//!   verbatim from storage through `Record::restore`.

use super::clock::{stamp, Clock};
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Variant tag of a protocol record.
///
/// Tags are capitalized and matched case-sensitively.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RecordKind {
    /// Information note, attributed to whoever supplied it.
    Information,
    /// Decision with its outcome.
    Decision,
    /// Task with owner, priority and due date.
    Task,
}

impl RecordKind {
    pub const ALL: [RecordKind; 3] = [Self::Information, Self::Decision, Self::Task];

    /// Canonical tag written to the `kind` column.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Information => "Information",
            Self::Decision => "Decision",
            Self::Task => "Task",
        }
    }

    /// Parses a canonical tag. No case folding.
    pub fn parse(value: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.as_str() == value)
    }
}

impl Display for RecordKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Variant-specific part of a record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind")]
pub enum RecordPayload {
    Information {
        given_by: String,
    },
    Decision {
        result: String,
    },
    Task {
        owner: String,
        priority: String,
        due: String,
    },
}

impl RecordPayload {
    pub fn kind(&self) -> RecordKind {
        match self {
            Self::Information { .. } => RecordKind::Information,
            Self::Decision { .. } => RecordKind::Decision,
            Self::Task { .. } => RecordKind::Task,
        }
    }
}

/// Validation failures for record construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordValidationError {
    EmptyTitle,
}

impl Display for RecordValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyTitle => write!(f, "record title must not be empty"),
        }
    }
}

impl Error for RecordValidationError {}

/// One item of a meeting protocol.
///
/// Deserialization goes through `Record::restore`, so decoded records are
/// validated like constructed ones.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RecordFields")]
pub struct Record {
    /// `dd/mm/yyyy`, kept as text so stored values round-trip verbatim.
    pub creation_date: String,
    /// `HH:MM:SS`, same lifecycle as `creation_date`.
    pub creation_time: String,
    pub title: String,
    pub description: String,
    #[serde(flatten)]
    pub payload: RecordPayload,
}

/// Unvalidated wire shape of `Record`.
#[derive(Deserialize)]
struct RecordFields {
    creation_date: String,
    creation_time: String,
    title: String,
    description: String,
    #[serde(flatten)]
    payload: RecordPayload,
}

impl TryFrom<RecordFields> for Record {
    type Error = RecordValidationError;

    fn try_from(fields: RecordFields) -> Result<Self, Self::Error> {
        Self::restore(
            fields.creation_date,
            fields.creation_time,
            fields.title,
            fields.description,
            fields.payload,
        )
    }
}

impl Record {
    /// Creates a record stamped with the clock's current time.
    ///
    /// # Errors
    /// - `EmptyTitle` when `title` is blank.
    pub fn new(
        title: impl Into<String>,
        description: impl Into<String>,
        payload: RecordPayload,
        clock: &dyn Clock,
    ) -> Result<Self, RecordValidationError> {
        let (creation_date, creation_time) = stamp(clock.now());
        Self::restore(creation_date, creation_time, title, description, payload)
    }

    /// Rebuilds a record with stamps read back from storage.
    ///
    /// Stamps are taken verbatim and not re-parsed.
    pub fn restore(
        creation_date: impl Into<String>,
        creation_time: impl Into<String>,
        title: impl Into<String>,
        description: impl Into<String>,
        payload: RecordPayload,
    ) -> Result<Self, RecordValidationError> {
        let record = Self {
            creation_date: creation_date.into(),
            creation_time: creation_time.into(),
            title: title.into(),
            description: description.into(),
            payload,
        };
        record.validate()?;
        Ok(record)
    }

    pub fn information(
        title: impl Into<String>,
        description: impl Into<String>,
        given_by: impl Into<String>,
        clock: &dyn Clock,
    ) -> Result<Self, RecordValidationError> {
        let payload = RecordPayload::Information {
            given_by: given_by.into(),
        };
        Self::new(title, description, payload, clock)
    }

    pub fn decision(
        title: impl Into<String>,
        description: impl Into<String>,
        result: impl Into<String>,
        clock: &dyn Clock,
    ) -> Result<Self, RecordValidationError> {
        let payload = RecordPayload::Decision {
            result: result.into(),
        };
        Self::new(title, description, payload, clock)
    }

    pub fn task(
        title: impl Into<String>,
        description: impl Into<String>,
        owner: impl Into<String>,
        priority: impl Into<String>,
        due: impl Into<String>,
        clock: &dyn Clock,
    ) -> Result<Self, RecordValidationError> {
        let payload = RecordPayload::Task {
            owner: owner.into(),
            priority: priority.into(),
            due: due.into(),
        };
        Self::new(title, description, payload, clock)
    }

    pub fn kind(&self) -> RecordKind {
        self.payload.kind()
    }

    /// Checks record-level invariants.
    pub fn validate(&self) -> Result<(), RecordValidationError> {
        if self.title.trim().is_empty() {
            return Err(RecordValidationError::EmptyTitle);
        }
        Ok(())
    }
}
