//! Derived achievement model.
//!
//! Achievements are never persisted; they are recomputed from history on
//! every query by `progress::achievements`.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Achievement category.
///
/// Variant order is the same-date tie-break used for output sorting:
/// `Milestone` sorts before `ChapterCompletion` on equal dates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AchievementKind {
    /// A cumulative item count crossed a multiple of 100.
    Milestone,
    /// Chapter `value` was followed by chapter `value + 1`.
    ChapterCompletion,
}

/// One derived achievement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Achievement {
    pub kind: AchievementKind,
    pub description: String,
    pub date: NaiveDate,
    /// Chapter number for completions, item count for milestones.
    pub value: u32,
}

impl Achievement {
    pub fn chapter_completion(chapter: u32, date: NaiveDate) -> Self {
        Self {
            kind: AchievementKind::ChapterCompletion,
            description: format!("Chapter {chapter} complete"),
            date,
            value: chapter,
        }
    }

    pub fn milestone(count: u32, date: NaiveDate) -> Self {
        Self {
            kind: AchievementKind::Milestone,
            description: format!("{count} items completed"),
            date,
            value: count,
        }
    }
}
