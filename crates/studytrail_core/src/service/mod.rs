//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate record store calls, validation and derivations into
//!   use-case level APIs.
//! - Keep CLI and other front ends decoupled from storage details.

pub mod progress_service;
