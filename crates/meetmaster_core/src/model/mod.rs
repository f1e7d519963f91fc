//! Meeting protocol record model.
//!
//! # Responsibility
//! - Define the item variants recorded during a meeting.
//! - Provide the clock seam used to stamp new records.
//!
//! # Invariants
//! - A record carries exactly one variant payload; `kind` is derived from it.
//! - Creation stamps are set once, either from a clock or from storage.

pub mod clock;
pub mod record;
