//! Summary statistics, period aggregates, streaks and gap detection.
//!
//! # Invariants
//! - Weeks end on Sunday; a weekly bucket is keyed by its Sunday.
//! - Monthly buckets are keyed by the first day of the month.
//! - A streak is a run of calendar-consecutive recorded dates, regardless of
//!   how many items each record holds.

use crate::model::record::DailyRecord;
use chrono::{Datelike, Days, NaiveDate};
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};

/// Window used by `missing_dates` callers that have no preference.
pub const DEFAULT_GAP_WINDOW_DAYS: u32 = 14;

/// Item counts accumulated over one period.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PeriodTotals {
    /// Day, week-ending Sunday, or first of month, depending on grouping.
    pub period: NaiveDate,
    pub problems: usize,
    pub exercises: usize,
    pub auxiliary: usize,
    pub total: usize,
}

impl PeriodTotals {
    fn new(period: NaiveDate) -> Self {
        Self {
            period,
            problems: 0,
            exercises: 0,
            auxiliary: 0,
            total: 0,
        }
    }

    fn add(&mut self, record: &DailyRecord) {
        self.problems += record.problems.len();
        self.exercises += record.exercises.len();
        self.auxiliary += record.auxiliary.len();
        self.total += record.total_items();
    }
}

/// Current and best run of consecutive recorded days.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct StreakSummary {
    pub current: u32,
    pub longest: u32,
}

/// Overview of the whole history as of `today`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProgressSummary {
    pub days_recorded: usize,
    pub total_problems: usize,
    pub total_exercises: usize,
    pub total_auxiliary: usize,
    pub total_items: usize,
    pub first_date: Option<NaiveDate>,
    pub last_date: Option<NaiveDate>,
    pub latest_problem: Option<String>,
    pub latest_exercise: Option<String>,
    /// Monday through `today`. Auxiliary entries count toward `total`, and
    /// records dated after `today` are excluded; the legacy dashboard's
    /// weekly figure counted only problems and exercises with no upper bound.
    pub this_week: PeriodTotals,
    pub streaks: StreakSummary,
}

fn sorted(history: &[DailyRecord]) -> Vec<&DailyRecord> {
    let mut ordered: Vec<&DailyRecord> = history.iter().collect();
    ordered.sort_by_key(|record| record.date);
    ordered
}

fn group_by(
    history: &[DailyRecord],
    key: impl Fn(NaiveDate) -> NaiveDate,
) -> Vec<PeriodTotals> {
    let mut buckets: BTreeMap<NaiveDate, PeriodTotals> = BTreeMap::new();
    for record in history {
        let period = key(record.date);
        buckets
            .entry(period)
            .or_insert_with(|| PeriodTotals::new(period))
            .add(record);
    }
    buckets.into_values().collect()
}

/// One bucket per recorded date, ascending.
pub fn daily_totals(history: &[DailyRecord]) -> Vec<PeriodTotals> {
    group_by(history, |date| date)
}

/// Buckets keyed by the Sunday closing each week, ascending.
pub fn weekly_totals(history: &[DailyRecord]) -> Vec<PeriodTotals> {
    group_by(history, week_ending)
}

/// Buckets keyed by the first day of each month, ascending.
pub fn monthly_totals(history: &[DailyRecord]) -> Vec<PeriodTotals> {
    group_by(history, |date| {
        NaiveDate::from_ymd_opt(date.year(), date.month(), 1).unwrap_or(date)
    })
}

fn week_ending(date: NaiveDate) -> NaiveDate {
    let to_sunday = 6 - u64::from(date.weekday().num_days_from_monday());
    date.checked_add_days(Days::new(to_sunday)).unwrap_or(date)
}

fn week_start(date: NaiveDate) -> NaiveDate {
    let from_monday = u64::from(date.weekday().num_days_from_monday());
    date.checked_sub_days(Days::new(from_monday)).unwrap_or(date)
}

/// Totals from Monday of `today`'s week through `today`.
///
/// The returned `period` is that Monday.
pub fn week_summary(history: &[DailyRecord], today: NaiveDate) -> PeriodTotals {
    let monday = week_start(today);
    let mut totals = PeriodTotals::new(monday);
    for record in history
        .iter()
        .filter(|record| record.date >= monday && record.date <= today)
    {
        totals.add(record);
    }
    totals
}

/// Dates in the last `window_days` days (ending at `today`) with no record.
pub fn missing_dates(
    history: &[DailyRecord],
    today: NaiveDate,
    window_days: u32,
) -> Vec<NaiveDate> {
    if window_days == 0 {
        return Vec::new();
    }
    let recorded: BTreeSet<NaiveDate> = history.iter().map(|record| record.date).collect();
    let start = today
        .checked_sub_days(Days::new(u64::from(window_days - 1)))
        .unwrap_or(NaiveDate::MIN);

    start
        .iter_days()
        .take_while(|date| *date <= today)
        .filter(|date| !recorded.contains(date))
        .collect()
}

/// Current and longest runs of consecutive recorded dates.
///
/// The current streak counts back from `today`, or from yesterday when
/// today has no record yet. Records dated after `today` are ignored.
pub fn streaks(history: &[DailyRecord], today: NaiveDate) -> StreakSummary {
    let dates: BTreeSet<NaiveDate> = history
        .iter()
        .map(|record| record.date)
        .filter(|date| *date <= today)
        .collect();

    let mut longest = 0;
    let mut run = 0;
    let mut previous: Option<NaiveDate> = None;
    for &date in &dates {
        run = match previous.and_then(|prev| prev.succ_opt()) {
            Some(expected) if expected == date => run + 1,
            _ => 1,
        };
        longest = longest.max(run);
        previous = Some(date);
    }

    let anchor = if dates.contains(&today) {
        Some(today)
    } else {
        today.pred_opt().filter(|yesterday| dates.contains(yesterday))
    };
    let mut current = 0;
    let mut cursor = anchor;
    while let Some(date) = cursor.filter(|date| dates.contains(date)) {
        current += 1;
        cursor = date.pred_opt();
    }

    StreakSummary { current, longest }
}

/// Builds the overview shown by dashboards and the `stats` command.
pub fn summarize(history: &[DailyRecord], today: NaiveDate) -> ProgressSummary {
    let ordered = sorted(history);
    let mut summary = ProgressSummary {
        days_recorded: ordered.len(),
        total_problems: 0,
        total_exercises: 0,
        total_auxiliary: 0,
        total_items: 0,
        first_date: ordered.first().map(|record| record.date),
        last_date: ordered.last().map(|record| record.date),
        latest_problem: None,
        latest_exercise: None,
        this_week: week_summary(history, today),
        streaks: streaks(history, today),
    };

    for record in &ordered {
        summary.total_problems += record.problems.len();
        summary.total_exercises += record.exercises.len();
        summary.total_auxiliary += record.auxiliary.len();
        summary.total_items += record.total_items();
        if let Some(label) = record.problems.last() {
            summary.latest_problem = Some(label.clone());
        }
        if let Some(label) = record.exercises.last() {
            summary.latest_exercise = Some(label.clone());
        }
    }

    summary
}

#[cfg(test)]
mod tests {
    use super::{week_ending, week_start};
    use chrono::NaiveDate;

    #[test]
    fn week_bounds_use_monday_start_and_sunday_end() {
        // 2025-09-03 is a Wednesday.
        let monday = NaiveDate::from_ymd_opt(2025, 9, 1).unwrap();
        let wednesday = NaiveDate::from_ymd_opt(2025, 9, 3).unwrap();
        let sunday = NaiveDate::from_ymd_opt(2025, 9, 7).unwrap();

        assert_eq!(week_start(wednesday), monday);
        assert_eq!(week_ending(wednesday), sunday);
        assert_eq!(week_ending(sunday), sunday);
        assert_eq!(week_start(sunday), monday);
    }
}
