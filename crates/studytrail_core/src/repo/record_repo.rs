//! Daily record repository contract and SQLite implementation.
//!
//! # Responsibility
//! - Provide the record store boundary consumed by the progress service.
//! - Own wholesale record replacement (`upsert`) with atomic semantics.
//!
//! # Invariants
//! - Write paths call `DailyRecord::validate()` before SQL mutations.
//! - Read paths reject invalid persisted state instead of masking it.
//! - `upsert` replaces the record and all of its items in one transaction.
//! - Item order inside each category is preserved via `position`.

use crate::db::migrations::{current_user_version, latest_version};
use crate::db::DbError;
use crate::model::record::{DailyRecord, RecordValidationError};
use chrono::NaiveDate;
use rusqlite::{params, Connection, Row, Transaction, TransactionBehavior};

const DATE_FORMAT: &str = "%Y-%m-%d";

const RECORD_SELECT_SQL: &str = "SELECT date, notes, book FROM daily_records";

pub type RepoResult<T> = Result<T, RepoError>;

/// Repository error for record persistence and query operations.
#[derive(Debug, thiserror::Error)]
pub enum RepoError {
    #[error(transparent)]
    Validation(#[from] RecordValidationError),
    #[error(transparent)]
    Db(#[from] DbError),
    #[error("connection schema version {actual_version} does not match expected {expected_version}")]
    UninitializedConnection {
        expected_version: u32,
        actual_version: u32,
    },
    #[error("required table `{0}` is missing")]
    MissingRequiredTable(&'static str),
    #[error("required column `{table}.{column}` is missing")]
    MissingRequiredColumn {
        table: &'static str,
        column: &'static str,
    },
    #[error("invalid persisted record data: {0}")]
    InvalidData(String),
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Record store boundary used by the progress service.
pub trait RecordStore {
    /// Returns every record ordered by date ascending.
    fn load_all(&self) -> RepoResult<Vec<DailyRecord>>;
    /// Returns the record stored for `date`, if any.
    fn get(&self, date: NaiveDate) -> RepoResult<Option<DailyRecord>>;
    /// Returns the latest record with a date strictly before `date`.
    fn get_latest_before(&self, date: NaiveDate) -> RepoResult<Option<DailyRecord>>;
    /// Creates or wholesale-replaces the record for `record.date`.
    fn upsert(&mut self, record: &DailyRecord) -> RepoResult<()>;
    /// Upserts all records in one transaction; returns how many were written.
    fn upsert_many(&mut self, records: &[DailyRecord]) -> RepoResult<usize>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ItemCategory {
    Problem,
    Exercise,
    Auxiliary,
}

impl ItemCategory {
    const ALL: [Self; 3] = [Self::Problem, Self::Exercise, Self::Auxiliary];

    fn to_db(self) -> &'static str {
        match self {
            Self::Problem => "problem",
            Self::Exercise => "exercise",
            Self::Auxiliary => "auxiliary",
        }
    }

    fn from_db(value: &str) -> Option<Self> {
        match value {
            "problem" => Some(Self::Problem),
            "exercise" => Some(Self::Exercise),
            "auxiliary" => Some(Self::Auxiliary),
            _ => None,
        }
    }

    fn labels(self, record: &DailyRecord) -> &[String] {
        match self {
            Self::Problem => &record.problems,
            Self::Exercise => &record.exercises,
            Self::Auxiliary => &record.auxiliary,
        }
    }
}

/// SQLite-backed record repository.
pub struct SqliteRecordRepository<'conn> {
    conn: &'conn mut Connection,
}

impl<'conn> SqliteRecordRepository<'conn> {
    /// Constructs a repository from a migrated/ready connection.
    ///
    /// Rejects connections whose schema version or tables do not match
    /// what this binary expects.
    pub fn try_new(conn: &'conn mut Connection) -> RepoResult<Self> {
        ensure_connection_ready(conn)?;
        Ok(Self { conn })
    }
}

impl RecordStore for SqliteRecordRepository<'_> {
    fn load_all(&self) -> RepoResult<Vec<DailyRecord>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{RECORD_SELECT_SQL} ORDER BY date ASC;"))?;
        let mut rows = stmt.query([])?;
        let mut records = Vec::new();
        while let Some(row) = rows.next()? {
            records.push(parse_record_row(self.conn, row)?);
        }
        Ok(records)
    }

    fn get(&self, date: NaiveDate) -> RepoResult<Option<DailyRecord>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{RECORD_SELECT_SQL} WHERE date = ?1;"))?;
        let mut rows = stmt.query([date_to_db(date)])?;
        match rows.next()? {
            Some(row) => Ok(Some(parse_record_row(self.conn, row)?)),
            None => Ok(None),
        }
    }

    fn get_latest_before(&self, date: NaiveDate) -> RepoResult<Option<DailyRecord>> {
        let mut stmt = self.conn.prepare(&format!(
            "{RECORD_SELECT_SQL} WHERE date < ?1 ORDER BY date DESC LIMIT 1;"
        ))?;
        let mut rows = stmt.query([date_to_db(date)])?;
        match rows.next()? {
            Some(row) => Ok(Some(parse_record_row(self.conn, row)?)),
            None => Ok(None),
        }
    }

    fn upsert(&mut self, record: &DailyRecord) -> RepoResult<()> {
        record.validate()?;

        let tx = self
            .conn
            .transaction_with_behavior(TransactionBehavior::Immediate)?;
        write_record(&tx, record)?;
        tx.commit()?;
        Ok(())
    }

    fn upsert_many(&mut self, records: &[DailyRecord]) -> RepoResult<usize> {
        for record in records {
            record.validate()?;
        }

        let tx = self
            .conn
            .transaction_with_behavior(TransactionBehavior::Immediate)?;
        for record in records {
            write_record(&tx, record)?;
        }
        tx.commit()?;
        Ok(records.len())
    }
}

fn write_record(tx: &Transaction<'_>, record: &DailyRecord) -> RepoResult<()> {
    let date = date_to_db(record.date);
    tx.execute(
        "INSERT INTO daily_records (date, notes, book)
         VALUES (?1, ?2, ?3)
         ON CONFLICT(date) DO UPDATE SET
            notes = excluded.notes,
            book = excluded.book,
            updated_at = (strftime('%s', 'now') * 1000);",
        params![date, record.notes, record.book],
    )?;
    tx.execute(
        "DELETE FROM record_items WHERE record_date = ?1;",
        [date.as_str()],
    )?;

    let mut insert = tx.prepare(
        "INSERT INTO record_items (record_date, category, position, label)
         VALUES (?1, ?2, ?3, ?4);",
    )?;
    for category in ItemCategory::ALL {
        for (position, label) in category.labels(record).iter().enumerate() {
            insert.execute(params![
                date,
                category.to_db(),
                position as i64,
                label
            ])?;
        }
    }
    Ok(())
}

fn parse_record_row(conn: &Connection, row: &Row<'_>) -> RepoResult<DailyRecord> {
    let date_text: String = row.get("date")?;
    let date = parse_date(&date_text)?;

    let mut record = DailyRecord {
        date,
        problems: Vec::new(),
        exercises: Vec::new(),
        auxiliary: Vec::new(),
        notes: row.get("notes")?,
        book: row.get("book")?,
    };

    let mut stmt = conn.prepare(
        "SELECT category, label
         FROM record_items
         WHERE record_date = ?1
         ORDER BY category ASC, position ASC;",
    )?;
    let mut rows = stmt.query([date_text.as_str()])?;
    while let Some(item) = rows.next()? {
        let category_text: String = item.get("category")?;
        let label: String = item.get("label")?;
        match ItemCategory::from_db(&category_text) {
            Some(ItemCategory::Problem) => record.problems.push(label),
            Some(ItemCategory::Exercise) => record.exercises.push(label),
            Some(ItemCategory::Auxiliary) => record.auxiliary.push(label),
            None => {
                return Err(RepoError::InvalidData(format!(
                    "invalid category `{category_text}` in record_items.category"
                )));
            }
        }
    }

    record.validate()?;
    Ok(record)
}

fn date_to_db(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

fn parse_date(value: &str) -> RepoResult<NaiveDate> {
    NaiveDate::parse_from_str(value, DATE_FORMAT).map_err(|_| {
        RepoError::InvalidData(format!("invalid date `{value}` in daily_records.date"))
    })
}

fn ensure_connection_ready(conn: &Connection) -> RepoResult<()> {
    let actual_version = current_user_version(conn)?;
    let expected_version = latest_version();
    if actual_version != expected_version {
        return Err(RepoError::UninitializedConnection {
            expected_version,
            actual_version,
        });
    }

    let required: [(&'static str, &[&'static str]); 2] = [
        ("daily_records", &["date", "notes", "book", "updated_at"]),
        (
            "record_items",
            &["record_date", "category", "position", "label"],
        ),
    ];
    for (table, columns) in required {
        if !table_exists(conn, table)? {
            return Err(RepoError::MissingRequiredTable(table));
        }
        for &column in columns {
            if !table_has_column(conn, table, column)? {
                return Err(RepoError::MissingRequiredColumn { table, column });
            }
        }
    }

    Ok(())
}

fn table_exists(conn: &Connection, table: &str) -> RepoResult<bool> {
    let exists: i64 = conn.query_row(
        "SELECT EXISTS(
            SELECT 1
            FROM sqlite_master
            WHERE type = 'table' AND name = ?1
        );",
        [table],
        |row| row.get(0),
    )?;
    Ok(exists == 1)
}

fn table_has_column(conn: &Connection, table: &str, column: &str) -> RepoResult<bool> {
    let mut stmt = conn.prepare(&format!("PRAGMA table_info({table});"))?;
    let mut rows = stmt.query([])?;
    while let Some(row) = rows.next()? {
        let current: String = row.get(1)?;
        if current == column {
            return Ok(true);
        }
    }
    Ok(false)
}
