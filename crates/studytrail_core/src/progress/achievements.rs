//! Chapter-completion and milestone detection.
//!
//! # Invariants
//! - Completion is a global adjacency scan over the set of chapters ever
//!   seen: chapter `n` completes iff chapter `n + 1` was seen at any time.
//! - Milestones are evaluated once per record date on the cumulative total
//!   reached that day; each boundary is awarded at most once.
//! - Output is sorted by date descending, milestones before chapter
//!   completions on equal dates, ascending value within a kind.

use crate::model::achievement::Achievement;
use crate::model::item::ItemLocator;
use crate::model::record::DailyRecord;
use chrono::NaiveDate;
use std::collections::{BTreeMap, BTreeSet};

/// Cumulative item count between two milestone boundaries.
pub const MILESTONE_STEP: u64 = 100;

/// Derives all achievements from `history`, in any input order.
pub fn derive_achievements(history: &[DailyRecord]) -> Vec<Achievement> {
    let mut ordered: Vec<&DailyRecord> = history.iter().collect();
    ordered.sort_by_key(|record| record.date);

    let mut chapter_last_seen: BTreeMap<u32, NaiveDate> = BTreeMap::new();
    let mut cumulative_by_date: Vec<(NaiveDate, u64)> = Vec::with_capacity(ordered.len());
    let mut cumulative: u64 = 0;

    for record in ordered {
        cumulative += record.total_items() as u64;
        match cumulative_by_date.last_mut() {
            Some((date, total)) if *date == record.date => *total = cumulative,
            _ => cumulative_by_date.push((record.date, cumulative)),
        }

        for locator in record.all_items().filter_map(ItemLocator::parse) {
            chapter_last_seen.insert(locator.chapter(), record.date);
        }
    }

    let mut achievements = chapter_completions(&chapter_last_seen);
    achievements.extend(milestones(&cumulative_by_date));
    achievements.sort_by(|a, b| b.date.cmp(&a.date).then(a.kind.cmp(&b.kind)));
    achievements
}

fn chapter_completions(chapter_last_seen: &BTreeMap<u32, NaiveDate>) -> Vec<Achievement> {
    chapter_last_seen
        .iter()
        .zip(chapter_last_seen.keys().skip(1))
        .filter(|((chapter, _), next)| chapter.checked_add(1) == Some(**next))
        .map(|((chapter, date), _)| Achievement::chapter_completion(*chapter, *date))
        .collect()
}

fn milestones(cumulative_by_date: &[(NaiveDate, u64)]) -> Vec<Achievement> {
    let mut awarded = BTreeSet::new();
    let mut out = Vec::new();
    for &(date, total) in cumulative_by_date {
        let boundary = total / MILESTONE_STEP * MILESTONE_STEP;
        if boundary >= MILESTONE_STEP && awarded.insert(boundary) {
            out.push(Achievement::milestone(
                u32::try_from(boundary).unwrap_or(u32::MAX),
                date,
            ));
        }
    }
    out
}
