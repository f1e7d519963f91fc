//! Flat-file persistence for meeting protocols.
//!
//! # Responsibility
//! - Own the in-memory record list and all of its mutations.
//! - Serialize the whole list to one pipe-delimited file and read it back.
//!
//! # Invariants
//! - Every save rewrites the entire file; rows are never appended.
//! - Record identity is positional and only valid within one process.

pub mod format;
pub mod protocol_store;
