//! One-shot protocol commands.
//!
//! # Responsibility
//! - Run each command as load, at most one mutation, then save.
//! - Keep CLI glue free of store and file details.
//!
//! # Invariants
//! - Every call starts from a fresh `load`; no store outlives a call.
//! - Read-only commands never write, except the empty file `load` creates.
//! - A failed mutation is not saved.
//! - Rows skipped by `load` are returned with every result. A mutating
//!   command rewrites the file without them, so callers must surface them.

use crate::input::{build_record, FieldSource, InputError};
use crate::model::clock::Clock;
use crate::model::record::{Record, RecordKind};
use crate::store::protocol_store::{ProtocolStore, SkippedRow, StoreError};
use log::info;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};

pub type ServiceResult<T> = Result<T, ServiceError>;

#[derive(Debug)]
pub enum ServiceError {
    Store(StoreError),
    Input(InputError),
}

impl Display for ServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Store(err) => write!(f, "{err}"),
            Self::Input(err) => write!(f, "{err}"),
        }
    }
}

impl Error for ServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Store(err) => Some(err),
            Self::Input(err) => Some(err),
        }
    }
}

impl From<StoreError> for ServiceError {
    fn from(value: StoreError) -> Self {
        Self::Store(value)
    }
}

impl From<InputError> for ServiceError {
    fn from(value: InputError) -> Self {
        Self::Input(value)
    }
}

/// Result of a command plus the rows its `load` had to skip.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Outcome<T> {
    pub value: T,
    pub skipped: Vec<SkippedRow>,
}

/// Command entry points over one protocol file.
pub struct ProtocolService<C: Clock> {
    path: PathBuf,
    clock: C,
}

impl<C: Clock> ProtocolService<C> {
    pub fn new(path: impl Into<PathBuf>, clock: C) -> Self {
        Self {
            path: path.into(),
            clock,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Lists titles, optionally restricted to one kind.
    pub fn show(&self, filter: Option<RecordKind>) -> ServiceResult<Outcome<Vec<String>>> {
        let (store, report) = ProtocolStore::open(&self.path)?;
        let titles = match filter {
            Some(kind) => store.list_items_by_type(kind.as_str()),
            None => store.list_items(),
        };
        Ok(Outcome {
            value: titles.into_iter().map(str::to_string).collect(),
            skipped: report.skipped,
        })
    }

    /// Returns full records, optionally restricted to one kind.
    pub fn records(&self, filter: Option<RecordKind>) -> ServiceResult<Outcome<Vec<Record>>> {
        let (store, report) = ProtocolStore::open(&self.path)?;
        let records = store
            .records()
            .iter()
            .filter(|record| filter.map_or(true, |kind| record.kind() == kind))
            .cloned()
            .collect();
        Ok(Outcome {
            value: records,
            skipped: report.skipped,
        })
    }

    /// Appends `record` and saves. Returns its position.
    pub fn add(&self, record: Record) -> ServiceResult<Outcome<usize>> {
        let (mut store, report) = ProtocolStore::open(&self.path)?;
        let kind = record.kind();
        store.add_item(record);
        store.save()?;

        let index = store.len() - 1;
        info!(
            "event=item_add module=service status=ok kind={} index={}",
            kind, index
        );
        Ok(Outcome {
            value: index,
            skipped: report.skipped,
        })
    }

    /// Builds a record of `kind` from prompted fields, then appends and saves.
    ///
    /// Prompting happens before the file is read.
    pub fn add_prompted(
        &self,
        kind: RecordKind,
        title: &str,
        description: Option<String>,
        source: &mut dyn FieldSource,
    ) -> ServiceResult<Outcome<usize>> {
        let record = build_record(kind, title, description, source, &self.clock)?;
        self.add(record)
    }

    /// Removes the item at `index` and saves.
    ///
    /// # Errors
    /// - `StoreError::OutOfRange` without touching the file.
    pub fn remove(&self, index: usize) -> ServiceResult<Outcome<Record>> {
        let (mut store, report) = ProtocolStore::open(&self.path)?;
        let removed = store.remove_item(index)?;
        store.save()?;

        info!(
            "event=item_remove module=service status=ok kind={} index={}",
            removed.kind(),
            index
        );
        Ok(Outcome {
            value: removed,
            skipped: report.skipped,
        })
    }

    /// Removes every item and saves a header-only file. Returns the count.
    pub fn delete_all(&self) -> ServiceResult<Outcome<usize>> {
        let (mut store, report) = ProtocolStore::open(&self.path)?;
        let removed = store.len();
        store.clear();
        store.save()?;

        info!(
            "event=protocol_clear module=service status=ok removed={}",
            removed
        );
        Ok(Outcome {
            value: removed,
            skipped: report.skipped,
        })
    }
}
