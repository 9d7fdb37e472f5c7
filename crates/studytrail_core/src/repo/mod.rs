//! Repository layer abstractions and persistence implementations.
//!
//! # Responsibility
//! - Define the record store contract consumed by services.
//! - Isolate SQLite query details from validation and derivation logic.
//! - Read and write the line-delimited JSON interchange format.
//!
//! # Invariants
//! - Repository writes enforce `DailyRecord::validate()` before persistence.
//! - Imports never bypass record validation.

pub mod jsonl;
pub mod record_repo;
