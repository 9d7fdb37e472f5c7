//! Daily progress record.
//!
//! # Responsibility
//! - Define the per-date unit of history persisted by the record store.
//! - Enforce the label/category invariant before persistence.
//!
//! # Invariants
//! - `date` is the unique key; at most one record exists per date.
//! - Every `problems` label parses to a Problem locator.
//! - Every `exercises` label parses to an Exercise locator.
//! - Records are replaced wholesale, never partially mutated.

use crate::model::item::{ItemKind, ItemLocator};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Book label used when the caller does not provide one.
pub const DEFAULT_BOOK: &str = "Introduction to Algebra";

/// Validation error for record-level invariants.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RecordValidationError {
    /// A label in a category list does not parse at all.
    #[error("{date}: unparseable {expected} label `{label}`")]
    UnparseableLabel {
        date: NaiveDate,
        expected: ItemKind,
        label: String,
    },
    /// A label parses, but to the other category.
    #[error("{date}: label `{label}` is a {actual}, listed under {expected}s")]
    WrongCategory {
        date: NaiveDate,
        expected: ItemKind,
        actual: ItemKind,
        label: String,
    },
}

/// One day of recorded progress.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailyRecord {
    pub date: NaiveDate,
    #[serde(default)]
    pub problems: Vec<String>,
    #[serde(default)]
    pub exercises: Vec<String>,
    /// Pre-extracted online practice entries. Serialized as `alcumus` to
    /// stay compatible with existing JSONL exports.
    #[serde(default, rename = "alcumus")]
    pub auxiliary: Vec<String>,
    #[serde(default)]
    pub notes: String,
    #[serde(default = "default_book")]
    pub book: String,
}

fn default_book() -> String {
    DEFAULT_BOOK.to_string()
}

impl DailyRecord {
    /// Creates an empty record for `date` with the default book.
    pub fn empty(date: NaiveDate) -> Self {
        Self {
            date,
            problems: Vec::new(),
            exercises: Vec::new(),
            auxiliary: Vec::new(),
            notes: String::new(),
            book: default_book(),
        }
    }

    /// Checks that every label sits in the list matching its kind.
    pub fn validate(&self) -> Result<(), RecordValidationError> {
        self.validate_list(&self.problems, ItemKind::Problem)?;
        self.validate_list(&self.exercises, ItemKind::Exercise)
    }

    fn validate_list(
        &self,
        labels: &[String],
        expected: ItemKind,
    ) -> Result<(), RecordValidationError> {
        for label in labels {
            let locator =
                ItemLocator::parse(label).ok_or_else(|| RecordValidationError::UnparseableLabel {
                    date: self.date,
                    expected,
                    label: label.clone(),
                })?;
            if locator.kind() != expected {
                return Err(RecordValidationError::WrongCategory {
                    date: self.date,
                    expected,
                    actual: locator.kind(),
                    label: label.clone(),
                });
            }
        }
        Ok(())
    }

    /// Problems, exercises and auxiliary entries, in that order.
    pub fn all_items(&self) -> impl Iterator<Item = &str> {
        self.problems
            .iter()
            .chain(&self.exercises)
            .chain(&self.auxiliary)
            .map(String::as_str)
    }

    pub fn total_items(&self) -> usize {
        self.problems.len() + self.exercises.len() + self.auxiliary.len()
    }
}
