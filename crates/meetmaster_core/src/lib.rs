//! Core domain logic for MeetMaster meeting protocols.
//! This crate owns the record model, the flat-file store and its invariants.

pub mod input;
pub mod logging;
pub mod model;
pub mod service;
pub mod store;

pub use input::{build_record, FieldSource, InputError};
pub use logging::{default_log_level, init_logging, logging_status, LoggingError};
pub use model::clock::{Clock, FixedClock, SystemClock};
pub use model::record::{Record, RecordKind, RecordPayload, RecordValidationError};
pub use service::protocol_service::{Outcome, ProtocolService, ServiceError, ServiceResult};
pub use store::format::RowError;
pub use store::protocol_store::{LoadReport, ProtocolStore, SkippedRow, StoreError, StoreResult};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
