//! Protocol store backed by a single pipe-delimited file.
//!
//! # Responsibility
//! - Hold the ordered record list for one process lifetime.
//! - Load the whole file into memory and rewrite the whole file on save.
//!
//! # Invariants
//! - In-memory order is insertion order and on-disk row order.
//! - `save` never appends; it writes a temp file and renames it over the
//!   target, so a failed save leaves the previous file intact.
//! - `load` replaces the in-memory list; it never merges.
//! - Malformed rows are skipped, logged and reported; the rest still load.
//!
//! # See also
//! - `store::format` for the column layout.

use super::format::{decode_row, encode_header, encode_record, Header, RowError};
use crate::model::record::Record;
use log::{error, info, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::Instant;

pub type StoreResult<T> = Result<T, StoreError>;

/// Errors raised by protocol store operations.
#[derive(Debug)]
pub enum StoreError {
    Io { path: PathBuf, source: io::Error },
    OutOfRange { index: usize, len: usize },
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io { path, source } => write!(f, "{}: {source}", path.display()),
            Self::OutOfRange { index, len } => {
                write!(f, "item index {index} out of range (protocol has {len} items)")
            }
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::OutOfRange { .. } => None,
        }
    }
}

/// A data row that `load` could not turn into a record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedRow {
    /// 1-based line number in the file (the header is line 1).
    pub line: usize,
    pub reason: RowError,
}

/// Outcome of a `load` call.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoadReport {
    pub loaded: usize,
    pub skipped: Vec<SkippedRow>,
    /// Set when the file did not exist and an empty one was written.
    pub created: bool,
}

/// In-memory protocol plus its backing file.
#[derive(Debug, Clone)]
pub struct ProtocolStore {
    path: PathBuf,
    records: Vec<Record>,
}

impl ProtocolStore {
    /// Creates an empty store. Nothing is read until `load`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            records: Vec::new(),
        }
    }

    /// Creates a store and loads it from `path`.
    pub fn open(path: impl Into<PathBuf>) -> StoreResult<(Self, LoadReport)> {
        let mut store = Self::new(path);
        let report = store.load()?;
        Ok((store, report))
    }

    pub fn path(&self) -> &Path {
        &self.path
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

    /// Titles of all records in insertion order.
    pub fn list_items(&self) -> Vec<&str> {
        self.records
            .iter()
            .map(|record| record.title.as_str())
            .collect()
    }

    /// Titles of records whose kind tag equals `kind` exactly.
    ///
    /// Unknown tags yield an empty list.
    pub fn list_items_by_type(&self, kind: &str) -> Vec<&str> {
        self.records
            .iter()
            .filter(|record| record.kind().as_str() == kind)
            .map(|record| record.title.as_str())
            .collect()
    }

    /// Appends a record at the end.
    pub fn add_item(&mut self, record: Record) {
        self.records.push(record);
    }

    /// Removes and returns the record at `index`, shifting later records down.
    ///
    /// # Errors
    /// - `OutOfRange` when `index >= len()`; the store is left unchanged.
    pub fn remove_item(&mut self, index: usize) -> StoreResult<Record> {
        if index >= self.records.len() {
            return Err(StoreError::OutOfRange {
                index,
                len: self.records.len(),
            });
        }
        Ok(self.records.remove(index))
    }

    pub fn clear(&mut self) {
        self.records.clear();
    }

    /// Rewrites the backing file with the full current contents.
    ///
    /// An empty store produces a header-only file.
    pub fn save(&self) -> StoreResult<()> {
        let started_at = Instant::now();
        match self.write_file() {
            Ok(()) => {
                info!(
                    "event=protocol_save module=store status=ok records={} duration_ms={}",
                    self.records.len(),
                    started_at.elapsed().as_millis()
                );
                Ok(())
            }
            Err(err) => {
                error!(
                    "event=protocol_save module=store status=error duration_ms={} error={}",
                    started_at.elapsed().as_millis(),
                    err
                );
                Err(err)
            }
        }
    }

    /// Replaces the in-memory list with the contents of the backing file.
    ///
    /// # Side effects
    /// - Writes a header-only file when the backing file does not exist.
    ///
    /// # Errors
    /// - `Io` for any read failure other than "not found", or when the
    ///   empty file cannot be created.
    pub fn load(&mut self) -> StoreResult<LoadReport> {
        let started_at = Instant::now();

        let content = match fs::read(&self.path) {
            Ok(content) => content,
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                self.records.clear();
                self.write_file()?;
                info!(
                    "event=protocol_load module=store status=ok mode=created duration_ms={}",
                    started_at.elapsed().as_millis()
                );
                return Ok(LoadReport {
                    created: true,
                    ..LoadReport::default()
                });
            }
            Err(err) => {
                error!(
                    "event=protocol_load module=store status=error duration_ms={} error={}",
                    started_at.elapsed().as_millis(),
                    err
                );
                return Err(self.io_error(err));
            }
        };

        let (records, skipped) = parse_protocol(&content);
        for row in &skipped {
            warn!(
                "event=protocol_row_skipped module=store line={} reason={}",
                row.line, row.reason
            );
        }

        self.records = records;
        info!(
            "event=protocol_load module=store status=ok mode=read records={} skipped={} duration_ms={}",
            self.records.len(),
            skipped.len(),
            started_at.elapsed().as_millis()
        );

        Ok(LoadReport {
            loaded: self.records.len(),
            skipped,
            created: false,
        })
    }

    fn write_file(&self) -> StoreResult<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).map_err(|err| self.io_error(err))?;
            }
        }

        let mut content = encode_header();
        content.push('\n');
        for record in &self.records {
            content.push_str(&encode_record(record));
            content.push('\n');
        }

        let temp_path = temp_path_for(&self.path);
        fs::write(&temp_path, content).map_err(|source| StoreError::Io {
            path: temp_path.clone(),
            source,
        })?;
        fs::rename(&temp_path, &self.path).map_err(|err| {
            let _ = fs::remove_file(&temp_path);
            self.io_error(err)
        })
    }

    fn io_error(&self, source: io::Error) -> StoreError {
        StoreError::Io {
            path: self.path.clone(),
            source,
        }
    }
}

/// Splits raw file bytes into decoded records and skipped rows.
///
/// The first line is the header; blank lines are ignored. Each line is
/// decoded as UTF-8 on its own, so one badly encoded row does not hide the
/// others.
fn parse_protocol(content: &[u8]) -> (Vec<Record>, Vec<SkippedRow>) {
    let mut lines = content
        .split(|byte| *byte == b'\n')
        .map(|line| line.strip_suffix(b"\r").unwrap_or(line))
        .enumerate();
    let header = match lines.next() {
        Some((_, line)) => Header::parse(&String::from_utf8_lossy(line)),
        None => return (Vec::new(), Vec::new()),
    };

    let mut records = Vec::new();
    let mut skipped = Vec::new();
    for (index, bytes) in lines {
        let decoded = std::str::from_utf8(bytes)
            .map_err(|err| RowError::Encoding {
                valid_up_to: err.valid_up_to(),
            })
            .and_then(|line| {
                if line.trim().is_empty() {
                    Ok(None)
                } else {
                    decode_row(&header, line).map(Some)
                }
            });
        match decoded {
            Ok(Some(record)) => records.push(record),
            Ok(None) => {}
            Err(reason) => skipped.push(SkippedRow {
                line: index + 1,
                reason,
            }),
        }
    }
    (records, skipped)
}

fn temp_path_for(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(|name| name.to_os_string())
        .unwrap_or_default();
    name.push(".tmp");
    path.with_file_name(name)
}
