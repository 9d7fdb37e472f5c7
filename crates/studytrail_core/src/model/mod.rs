//! Domain model for textbook progress tracking.
//!
//! # Responsibility
//! - Define item locators, daily records and derived achievements.
//! - Keep closed sets of variants as enums rather than string tags.
//!
//! # Invariants
//! - `ItemLocator` values only come from the label parser.
//! - `DailyRecord` is keyed by calendar date.

pub mod achievement;
pub mod item;
pub mod record;
