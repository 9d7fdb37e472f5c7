//! studytrail command-line entry point.
//!
//! # Responsibility
//! - Parse arguments and environment into core calls.
//! - Own process-level concerns: logging bootstrap and database location.

mod commands;

use anyhow::{Context, Result};
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use log::{info, warn};
use std::path::{Path, PathBuf};
use std::time::Instant;
use studytrail_core::db::open_db;
use studytrail_core::{
    default_log_level, init_logging, ProgressService, SqliteRecordRepository,
    DEFAULT_BOOK, DEFAULT_GAP_WINDOW_DAYS,
};

#[derive(Parser)]
#[command(name = "studytrail")]
#[command(about = "Track daily textbook progress", long_about = None)]
#[command(version)]
struct Cli {
    /// SQLite database file
    #[arg(long, global = true, env = "STUDYTRAIL_DB", default_value = "data/studytrail.sqlite3")]
    db: PathBuf,

    /// Directory for rolling log files; logging is off when unset
    #[arg(long, global = true, env = "STUDYTRAIL_LOG_DIR")]
    log_dir: Option<PathBuf>,

    /// trace|debug|info|warn|error
    #[arg(long, global = true, env = "STUDYTRAIL_LOG_LEVEL")]
    log_level: Option<String>,

    /// Print machine-readable JSON instead of text
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Record one day's items, replacing any existing record for that date
    Record {
        /// Comma-separated labels, e.g. "15.1, 15.2, 15.1.1"
        #[arg(default_value = "")]
        items: String,

        /// Date to record (YYYY-MM-DD); defaults to today
        #[arg(long)]
        date: Option<NaiveDate>,

        /// Online practice entry; repeatable
        #[arg(long = "auxiliary")]
        auxiliary: Vec<String>,

        #[arg(long, default_value = "")]
        notes: String,

        #[arg(long, env = "STUDYTRAIL_BOOK", default_value = DEFAULT_BOOK)]
        book: String,

        /// Validate only; nothing is written
        #[arg(long)]
        dry_run: bool,
    },

    /// Show the record stored for one date
    Show {
        /// Defaults to today
        #[arg(long)]
        date: Option<NaiveDate>,
    },

    /// List every recorded day
    History,

    /// List achievements, newest first
    Achievements,

    /// Summary, streaks and period totals
    Stats {
        /// Reference date for streaks and the weekly summary
        #[arg(long)]
        today: Option<NaiveDate>,
    },

    /// List unrecorded dates in a recent window
    Gaps {
        #[arg(long, default_value_t = DEFAULT_GAP_WINDOW_DAYS)]
        days: u32,

        #[arg(long)]
        today: Option<NaiveDate>,
    },

    /// Restore records from a JSONL file
    Import { path: PathBuf },

    /// Write all records as JSONL to a file or stdout
    Export { path: Option<PathBuf> },

    /// Print binary and core versions
    Version,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    if let Some(log_dir) = &cli.log_dir {
        let level = cli.log_level.as_deref().unwrap_or(default_log_level());
        init_logging(level, &absolute(log_dir)?).context("failed to initialize logging")?;
    }

    let command = cli.command.name();
    let started_at = Instant::now();
    let outcome = run(cli);
    match &outcome {
        Ok(()) => info!(
            "event=cli_command module=cli status=ok command={command} duration_ms={}",
            started_at.elapsed().as_millis()
        ),
        // Error text can echo item labels, so only the outcome is logged.
        Err(_) => warn!(
            "event=cli_command module=cli status=error command={command} duration_ms={}",
            started_at.elapsed().as_millis()
        ),
    }
    outcome
}

fn run(cli: Cli) -> Result<()> {
    if let Commands::Version = cli.command {
        return commands::version();
    }

    let mut conn = open_db(&cli.db)
        .with_context(|| format!("failed to open database {}", cli.db.display()))?;
    let repo = SqliteRecordRepository::try_new(&mut conn).context("database is not ready")?;
    let mut service = ProgressService::new(repo);
    let json = cli.json;

    match cli.command {
        Commands::Record {
            items,
            date,
            auxiliary,
            notes,
            book,
            dry_run,
        } => {
            let entry = commands::DayInput {
                date: date.unwrap_or_else(today),
                items,
                auxiliary,
                notes,
                book,
            };
            commands::record(&mut service, entry, dry_run, json)
        }
        Commands::Show { date } => commands::show(&service, date.unwrap_or_else(today), json),
        Commands::History => commands::history(&service, json),
        Commands::Achievements => commands::achievements(&service, json),
        Commands::Stats { today: at } => commands::stats(&service, at.unwrap_or_else(today), json),
        Commands::Gaps { days, today: at } => {
            commands::gaps(&service, at.unwrap_or_else(today), days, json)
        }
        Commands::Import { path } => commands::import(&mut service, &path),
        Commands::Export { path } => commands::export(&service, path.as_deref()),
        Commands::Version => commands::version(),
    }
}

impl Commands {
    /// Stable subcommand name used in log events.
    fn name(&self) -> &'static str {
        match self {
            Self::Record { .. } => "record",
            Self::Show { .. } => "show",
            Self::History => "history",
            Self::Achievements => "achievements",
            Self::Stats { .. } => "stats",
            Self::Gaps { .. } => "gaps",
            Self::Import { .. } => "import",
            Self::Export { .. } => "export",
            Self::Version => "version",
        }
    }
}

fn today() -> NaiveDate {
    chrono::Local::now().date_naive()
}

fn absolute(path: &Path) -> Result<PathBuf> {
    if path.is_absolute() {
        return Ok(path.to_path_buf());
    }
    let cwd = std::env::current_dir().context("failed to resolve current directory")?;
    Ok(cwd.join(path))
}

#[cfg(test)]
mod tests {
    use super::{Cli, Commands};
    use chrono::NaiveDate;
    use clap::Parser;

    #[test]
    fn record_arguments_parse_into_subcommand() {
        let cli = Cli::try_parse_from([
            "studytrail",
            "--json",
            "record",
            "15.1, 15.2",
            "--date",
            "2025-09-01",
            "--auxiliary",
            "2025-09-01 12:45:52",
            "--dry-run",
        ])
        .unwrap();

        assert!(cli.json);
        assert_eq!(cli.command.name(), "record");
        match cli.command {
            Commands::Record {
                items,
                date,
                auxiliary,
                dry_run,
                ..
            } => {
                assert_eq!(items, "15.1, 15.2");
                assert_eq!(date, NaiveDate::from_ymd_opt(2025, 9, 1));
                assert_eq!(auxiliary, vec!["2025-09-01 12:45:52"]);
                assert!(dry_run);
            }
            _ => panic!("expected record subcommand"),
        }
    }

    #[test]
    fn command_names_are_stable_for_log_events() {
        let gaps = Cli::try_parse_from(["studytrail", "gaps", "--days", "7"]).unwrap();
        assert_eq!(gaps.command.name(), "gaps");
        match gaps.command {
            Commands::Gaps { days, today } => {
                assert_eq!(days, 7);
                assert!(today.is_none());
            }
            _ => panic!("expected gaps subcommand"),
        }

        let version = Cli::try_parse_from(["studytrail", "version"]).unwrap();
        assert_eq!(version.command.name(), "version");
    }

    #[test]
    fn malformed_date_is_rejected_by_parser() {
        assert!(Cli::try_parse_from(["studytrail", "show", "--date", "2025-13-01"]).is_err());
    }
}
