//! Command-level services.
//!
//! # Responsibility
//! - Turn single CLI commands into load/mutate/save transactions.
//! - Keep the CLI layer decoupled from file and row details.

pub mod protocol_service;
