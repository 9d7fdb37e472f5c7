//! Read-side derivations over the full history.
//!
//! # Responsibility
//! - Derive chapter completions and count milestones.
//! - Aggregate per-period totals, streaks and missing dates.
//!
//! # Invariants
//! - Every function here is pure and sorts its input by date first.
//! - Nothing derived here is persisted.

pub mod achievements;
pub mod stats;
