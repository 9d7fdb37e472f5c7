//! Progress use-case service.
//!
//! # Responsibility
//! - Accept one day's raw input, validate it against the previous record and
//!   persist it wholesale.
//! - Expose read-side derivations (achievements, statistics) over history.
//!
//! # Invariants
//! - A rejected submission never reaches the record store.
//! - The previous record is the latest one strictly before the edited date;
//!   missing calendar days in between are bridged.
//! - Reading previous state and writing the new record are separate store
//!   calls, so concurrent edits of neighbouring dates can race.

use crate::model::achievement::Achievement;
use crate::model::record::{DailyRecord, DEFAULT_BOOK};
use crate::progress::achievements::derive_achievements;
use crate::progress::stats::{self, PeriodTotals, ProgressSummary};
use crate::repo::record_repo::{RecordStore, RepoError};
use crate::validation::{validate_batch, validate_continuity, ItemBatch, ValidationError};
use chrono::NaiveDate;
use log::{info, warn};
use std::time::Instant;

/// Service error for progress use-cases.
#[derive(Debug, thiserror::Error)]
pub enum ProgressServiceError {
    /// Input was rejected; history is unchanged.
    #[error(transparent)]
    Validation(#[from] ValidationError),
    /// Persistence-layer failure, surfaced as-is.
    #[error(transparent)]
    Repo(#[from] RepoError),
    /// Internal consistency mismatch between write and read-back.
    #[error("inconsistent progress state: {0}")]
    InconsistentState(&'static str),
}

/// One day's submission as typed by the learner.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DayEntry {
    pub date: NaiveDate,
    /// Comma-separated item labels, problems and exercises mixed.
    pub items: String,
    /// Already-extracted auxiliary practice entries.
    pub auxiliary: Vec<String>,
    pub notes: String,
    pub book: String,
}

impl DayEntry {
    pub fn new(date: NaiveDate, items: impl Into<String>) -> Self {
        Self {
            date,
            items: items.into(),
            auxiliary: Vec::new(),
            notes: String::new(),
            book: DEFAULT_BOOK.to_string(),
        }
    }
}

/// Progress service facade over a record store.
pub struct ProgressService<R: RecordStore> {
    repo: R,
}

impl<R: RecordStore> ProgressService<R> {
    /// Creates a service using the provided record store.
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Validates an entry against stored history without writing it.
    pub fn check_day(&self, entry: &DayEntry) -> Result<ItemBatch, ProgressServiceError> {
        let batch =
            validate_batch(&entry.items).inspect_err(|err| log_rejection(entry, err))?;
        let previous = self
            .repo
            .get_latest_before(entry.date)?
            .map(|record| ItemBatch::new(record.problems, record.exercises))
            .unwrap_or_default();
        validate_continuity(&batch, &previous).inspect_err(|err| log_rejection(entry, err))?;
        Ok(batch)
    }

    /// Validates and stores one day, replacing any record for that date.
    ///
    /// Returns the stored record as read back from the store.
    pub fn submit_day(&mut self, entry: &DayEntry) -> Result<DailyRecord, ProgressServiceError> {
        let started_at = Instant::now();
        let batch = self.check_day(entry)?;

        let record = DailyRecord {
            date: entry.date,
            problems: batch.problems,
            exercises: batch.exercises,
            auxiliary: entry
                .auxiliary
                .iter()
                .map(|value| value.trim())
                .filter(|value| !value.is_empty())
                .map(str::to_string)
                .collect(),
            notes: entry.notes.clone(),
            book: entry.book.clone(),
        };
        self.repo.upsert(&record)?;

        let stored = self
            .repo
            .get(entry.date)?
            .ok_or(ProgressServiceError::InconsistentState(
                "submitted record not found in read-back",
            ))?;
        info!(
            "event=day_submit module=service status=ok date={} problems={} exercises={} auxiliary={} duration_ms={}",
            stored.date,
            stored.problems.len(),
            stored.exercises.len(),
            stored.auxiliary.len(),
            started_at.elapsed().as_millis()
        );
        Ok(stored)
    }

    /// Restores records verbatim, bypassing continuity checks.
    pub fn import_records(
        &mut self,
        records: &[DailyRecord],
    ) -> Result<usize, ProgressServiceError> {
        let written = self.repo.upsert_many(records)?;
        info!("event=records_import module=service status=ok count={written}");
        Ok(written)
    }

    pub fn record_for(
        &self,
        date: NaiveDate,
    ) -> Result<Option<DailyRecord>, ProgressServiceError> {
        Ok(self.repo.get(date)?)
    }

    /// Full history, ascending by date.
    pub fn history(&self) -> Result<Vec<DailyRecord>, ProgressServiceError> {
        Ok(self.repo.load_all()?)
    }

    /// Achievements recomputed from the full history, newest first.
    pub fn achievements(&self) -> Result<Vec<Achievement>, ProgressServiceError> {
        Ok(derive_achievements(&self.repo.load_all()?))
    }

    pub fn summary(&self, today: NaiveDate) -> Result<ProgressSummary, ProgressServiceError> {
        Ok(stats::summarize(&self.repo.load_all()?, today))
    }

    pub fn missing_dates(
        &self,
        today: NaiveDate,
        window_days: u32,
    ) -> Result<Vec<NaiveDate>, ProgressServiceError> {
        Ok(stats::missing_dates(&self.repo.load_all()?, today, window_days))
    }

    pub fn daily_totals(&self) -> Result<Vec<PeriodTotals>, ProgressServiceError> {
        Ok(stats::daily_totals(&self.repo.load_all()?))
    }

    pub fn weekly_totals(&self) -> Result<Vec<PeriodTotals>, ProgressServiceError> {
        Ok(stats::weekly_totals(&self.repo.load_all()?))
    }

    pub fn monthly_totals(&self) -> Result<Vec<PeriodTotals>, ProgressServiceError> {
        Ok(stats::monthly_totals(&self.repo.load_all()?))
    }
}

fn log_rejection(entry: &DayEntry, err: &ValidationError) {
    let reason = match err {
        ValidationError::Format { .. } => "format",
        ValidationError::Continuity { .. } => "continuity",
    };
    warn!(
        "event=day_submit module=service status=rejected date={} reason={}",
        entry.date, reason
    );
}
