//! Subcommand handlers. Each prints either text or JSON to stdout.

use anyhow::{Context, Result};
use chrono::NaiveDate;
use serde::Serialize;
use std::fs::File;
use std::io::{self, BufReader, BufWriter, Write};
use std::path::Path;
use studytrail_core::{
    read_jsonl, write_jsonl, DailyRecord, DayEntry, PeriodTotals, ProgressService,
    ProgressServiceError, RecordStore,
};

/// Parsed `record` arguments.
pub struct DayInput {
    pub date: NaiveDate,
    pub items: String,
    pub auxiliary: Vec<String>,
    pub notes: String,
    pub book: String,
}

pub fn record<R: RecordStore>(
    service: &mut ProgressService<R>,
    input: DayInput,
    dry_run: bool,
    json: bool,
) -> Result<()> {
    let mut entry = DayEntry::new(input.date, input.items);
    entry.auxiliary = input.auxiliary;
    entry.notes = input.notes;
    entry.book = input.book;

    if dry_run {
        let batch = service.check_day(&entry).map_err(rejection)?;
        if json {
            return print_json(&serde_json::json!({
                "date": entry.date,
                "problems": batch.problems,
                "exercises": batch.exercises,
                "valid": true,
            }));
        }
        println!(
            "{}: {} problem(s), {} exercise(s) would be recorded",
            entry.date,
            batch.problems.len(),
            batch.exercises.len()
        );
        return Ok(());
    }

    let stored = service.submit_day(&entry).map_err(rejection)?;
    if json {
        return print_json(&stored);
    }
    println!("recorded {}", stored.date);
    print_record(&stored);
    Ok(())
}

pub fn show<R: RecordStore>(
    service: &ProgressService<R>,
    date: NaiveDate,
    json: bool,
) -> Result<()> {
    let record = service.record_for(date)?;
    if json {
        return print_json(&record);
    }
    match record {
        Some(record) => print_record(&record),
        None => println!("{date}: no record"),
    }
    Ok(())
}

pub fn history<R: RecordStore>(service: &ProgressService<R>, json: bool) -> Result<()> {
    let records = service.history()?;
    if json {
        return print_json(&records);
    }
    if records.is_empty() {
        println!("no records yet");
    }
    for record in &records {
        println!(
            "{}  problems={:<3} exercises={:<3} auxiliary={:<3} {}",
            record.date,
            record.problems.len(),
            record.exercises.len(),
            record.auxiliary.len(),
            record.book
        );
    }
    Ok(())
}

pub fn achievements<R: RecordStore>(service: &ProgressService<R>, json: bool) -> Result<()> {
    let achievements = service.achievements()?;
    if json {
        return print_json(&achievements);
    }
    if achievements.is_empty() {
        println!("no achievements yet");
    }
    for achievement in &achievements {
        println!("{}  {}", achievement.date, achievement.description);
    }
    Ok(())
}

#[derive(Serialize)]
struct StatsReport {
    #[serde(flatten)]
    summary: studytrail_core::ProgressSummary,
    weekly: Vec<PeriodTotals>,
    monthly: Vec<PeriodTotals>,
}

pub fn stats<R: RecordStore>(
    service: &ProgressService<R>,
    today: NaiveDate,
    json: bool,
) -> Result<()> {
    let report = StatsReport {
        summary: service.summary(today)?,
        weekly: service.weekly_totals()?,
        monthly: service.monthly_totals()?,
    };
    if json {
        return print_json(&report);
    }

    let summary = &report.summary;
    println!("days recorded:   {}", summary.days_recorded);
    println!(
        "items:           {} ({} problems, {} exercises, {} auxiliary)",
        summary.total_items, summary.total_problems, summary.total_exercises, summary.total_auxiliary
    );
    if let (Some(first), Some(last)) = (summary.first_date, summary.last_date) {
        println!("span:            {first} .. {last}");
    }
    println!(
        "latest:          problem {} / exercise {}",
        summary.latest_problem.as_deref().unwrap_or("-"),
        summary.latest_exercise.as_deref().unwrap_or("-")
    );
    println!(
        "this week:       {} item(s) since {}",
        summary.this_week.total, summary.this_week.period
    );
    println!(
        "streak:          {} day(s), longest {}",
        summary.streaks.current, summary.streaks.longest
    );
    println!();
    print_totals("week ending", &report.weekly);
    print_totals("month", &report.monthly);
    Ok(())
}

pub fn gaps<R: RecordStore>(
    service: &ProgressService<R>,
    today: NaiveDate,
    days: u32,
    json: bool,
) -> Result<()> {
    let missing = service.missing_dates(today, days)?;
    if json {
        return print_json(&missing);
    }
    if missing.is_empty() {
        println!("no gaps in the last {days} day(s)");
    }
    for date in &missing {
        println!("{date}");
    }
    Ok(())
}

pub fn import<R: RecordStore>(service: &mut ProgressService<R>, path: &Path) -> Result<()> {
    let file =
        File::open(path).with_context(|| format!("failed to open {}", path.display()))?;
    let records = read_jsonl(BufReader::new(file))
        .with_context(|| format!("failed to read {}", path.display()))?;
    let written = service.import_records(&records)?;
    println!("imported {written} record(s)");
    Ok(())
}

pub fn export<R: RecordStore>(service: &ProgressService<R>, path: Option<&Path>) -> Result<()> {
    let records = service.history()?;
    match path {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("failed to create {}", path.display()))?;
            write_jsonl(BufWriter::new(file), &records)?;
            eprintln!("exported {} record(s) to {}", records.len(), path.display());
        }
        None => write_jsonl(io::stdout().lock(), &records)?,
    }
    Ok(())
}

pub fn version() -> Result<()> {
    println!("studytrail {}", env!("CARGO_PKG_VERSION"));
    println!("studytrail_core {}", studytrail_core::core_version());
    Ok(())
}

fn rejection(err: ProgressServiceError) -> anyhow::Error {
    match err {
        ProgressServiceError::Validation(reason) => {
            anyhow::anyhow!("rejected, nothing was saved: {reason}")
        }
        other => other.into(),
    }
}

fn print_record(record: &DailyRecord) {
    println!("date:      {}", record.date);
    println!("book:      {}", record.book);
    println!("problems:  {}", record.problems.join(", "));
    println!("exercises: {}", record.exercises.join(", "));
    if !record.auxiliary.is_empty() {
        println!("auxiliary: {}", record.auxiliary.join(", "));
    }
    if !record.notes.is_empty() {
        println!("notes:     {}", record.notes);
    }
}

fn print_totals(label: &str, totals: &[PeriodTotals]) {
    for bucket in totals {
        println!(
            "{label} {}: {} problems, {} exercises, {} auxiliary",
            bucket.period, bucket.problems, bucket.exercises, bucket.auxiliary
        );
    }
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    let mut stdout = io::stdout().lock();
    serde_json::to_writer_pretty(&mut stdout, value)?;
    writeln!(stdout)?;
    Ok(())
}
