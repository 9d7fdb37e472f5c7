use chrono::NaiveDate;
use studytrail_core::progress::stats::{
    daily_totals, missing_dates, monthly_totals, streaks, summarize, week_summary, weekly_totals,
};
use studytrail_core::{DailyRecord, StreakSummary};

fn ymd(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap()
}

fn record(
    date: NaiveDate,
    problems: &[&str],
    exercises: &[&str],
    auxiliary: usize,
) -> DailyRecord {
    let mut record = DailyRecord::empty(date);
    record.problems = problems.iter().map(|item| item.to_string()).collect();
    record.exercises = exercises.iter().map(|item| item.to_string()).collect();
    record.auxiliary = (0..auxiliary)
        .map(|idx| format!("2025-09-01 10:00:{idx:02}"))
        .collect();
    record
}

fn sample_history() -> Vec<DailyRecord> {
    vec![
        // Sunday 2025-08-31 closes the first week.
        record(ymd(2025, 8, 30), &["1.1"], &[], 0),
        record(ymd(2025, 8, 31), &["1.2", "1.3"], &["1.1.1"], 1),
        record(ymd(2025, 9, 1), &["1.4"], &[], 2),
        record(ymd(2025, 9, 3), &[], &["1.1.2", "1.1.3"], 0),
        record(ymd(2025, 9, 4), &["1.5"], &[], 0),
    ]
}

#[test]
fn daily_totals_count_each_category() {
    let totals = daily_totals(&sample_history());
    assert_eq!(totals.len(), 5);
    assert_eq!(totals[1].period, ymd(2025, 8, 31));
    assert_eq!(
        (totals[1].problems, totals[1].exercises, totals[1].auxiliary, totals[1].total),
        (2, 1, 1, 4)
    );
}

#[test]
fn weekly_totals_group_by_week_ending_sunday() {
    let totals = weekly_totals(&sample_history());
    assert_eq!(totals.len(), 2);
    assert_eq!(totals[0].period, ymd(2025, 8, 31));
    assert_eq!(totals[0].total, 5);
    assert_eq!(totals[1].period, ymd(2025, 9, 7));
    assert_eq!(totals[1].total, 6);
}

#[test]
fn monthly_totals_group_by_first_of_month() {
    let totals = monthly_totals(&sample_history());
    assert_eq!(totals.len(), 2);
    assert_eq!(totals[0].period, ymd(2025, 8, 1));
    assert_eq!(totals[0].problems, 3);
    assert_eq!(totals[1].period, ymd(2025, 9, 1));
    assert_eq!(totals[1].exercises, 2);
}

#[test]
fn week_summary_starts_on_monday_and_stops_at_today() {
    let totals = week_summary(&sample_history(), ymd(2025, 9, 3));
    assert_eq!(totals.period, ymd(2025, 9, 1));
    // 09-01 and 09-03 only; 09-04 is after `today`.
    assert_eq!((totals.problems, totals.exercises, totals.auxiliary), (1, 2, 2));
    assert_eq!(totals.total, 5);
}

#[test]
fn missing_dates_cover_inclusive_window() {
    let missing = missing_dates(&sample_history(), ymd(2025, 9, 5), 7);
    assert_eq!(missing, vec![ymd(2025, 9, 2), ymd(2025, 9, 5)]);
    assert!(missing_dates(&sample_history(), ymd(2025, 9, 5), 0).is_empty());
}

#[test]
fn streaks_track_current_and_longest_runs() {
    let history = sample_history();

    assert_eq!(
        streaks(&history, ymd(2025, 9, 4)),
        StreakSummary {
            current: 2,
            longest: 3
        }
    );
    // Today not yet recorded: the run ending yesterday still counts.
    assert_eq!(streaks(&history, ymd(2025, 9, 5)).current, 2);
    assert_eq!(streaks(&history, ymd(2025, 9, 6)).current, 0);
    // Future records are ignored.
    assert_eq!(
        streaks(&history, ymd(2025, 8, 31)),
        StreakSummary {
            current: 2,
            longest: 2
        }
    );
    assert_eq!(streaks(&[], ymd(2025, 9, 1)), StreakSummary::default());
}

#[test]
fn summary_reports_totals_and_latest_labels() {
    let summary = summarize(&sample_history(), ymd(2025, 9, 4));
    assert_eq!(summary.days_recorded, 5);
    assert_eq!(summary.total_problems, 5);
    assert_eq!(summary.total_exercises, 3);
    assert_eq!(summary.total_auxiliary, 3);
    assert_eq!(summary.total_items, 11);
    assert_eq!(summary.first_date, Some(ymd(2025, 8, 30)));
    assert_eq!(summary.last_date, Some(ymd(2025, 9, 4)));
    assert_eq!(summary.latest_problem.as_deref(), Some("1.5"));
    assert_eq!(summary.latest_exercise.as_deref(), Some("1.1.3"));
    assert_eq!(summary.this_week.total, 6);
    assert_eq!(summary.streaks.longest, 3);
}
