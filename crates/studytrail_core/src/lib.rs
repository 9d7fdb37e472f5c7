//! Core domain logic for studytrail.
//! This crate is the single source of truth for progress invariants:
//! item parsing, continuity validation and achievement derivation.

pub mod db;
pub mod logging;
pub mod model;
pub mod progress;
pub mod repo;
pub mod service;
pub mod validation;

pub use logging::{default_log_level, init_logging, logging_status, LoggingError};
pub use model::achievement::{Achievement, AchievementKind};
pub use model::item::{ItemKind, ItemLocator, ItemParseError};
pub use model::record::{DailyRecord, RecordValidationError, DEFAULT_BOOK};
pub use progress::achievements::{derive_achievements, MILESTONE_STEP};
pub use progress::stats::{
    PeriodTotals, ProgressSummary, StreakSummary, DEFAULT_GAP_WINDOW_DAYS,
};
pub use repo::jsonl::{read_jsonl, write_jsonl, InterchangeError};
pub use repo::record_repo::{RecordStore, RepoError, RepoResult, SqliteRecordRepository};
pub use service::progress_service::{DayEntry, ProgressService, ProgressServiceError};
pub use validation::{
    is_consecutive, validate_batch, validate_continuity, ContinuityScope, ItemBatch,
    ValidationError,
};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
