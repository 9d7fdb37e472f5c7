//! Line-delimited JSON import/export.
//!
//! One `DailyRecord` per line, using the legacy field names
//! (`date`, `problems`, `exercises`, `alcumus`, `notes`, `book`).
//! Blank lines are skipped on read.

use crate::model::record::{DailyRecord, RecordValidationError};
use chrono::NaiveDate;
use std::collections::BTreeSet;
use std::io::{BufRead, Write};

#[derive(Debug, thiserror::Error)]
pub enum InterchangeError {
    #[error("record stream I/O failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("line {line}: malformed record: {source}")]
    Json {
        line: usize,
        #[source]
        source: serde_json::Error,
    },
    #[error("line {line}: {source}")]
    Invalid {
        line: usize,
        #[source]
        source: RecordValidationError,
    },
    #[error("line {line}: duplicate record for {date}")]
    DuplicateDate { line: usize, date: NaiveDate },
}

/// Reads and validates every record; fails on the first bad line.
///
/// Returned records are sorted by date ascending.
pub fn read_jsonl(reader: impl BufRead) -> Result<Vec<DailyRecord>, InterchangeError> {
    let mut records = Vec::new();
    let mut seen = BTreeSet::new();

    for (index, line) in reader.lines().enumerate() {
        let line_no = index + 1;
        let line = line?;
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }

        let record: DailyRecord =
            serde_json::from_str(trimmed).map_err(|source| InterchangeError::Json {
                line: line_no,
                source,
            })?;
        record.validate().map_err(|source| InterchangeError::Invalid {
            line: line_no,
            source,
        })?;
        if !seen.insert(record.date) {
            return Err(InterchangeError::DuplicateDate {
                line: line_no,
                date: record.date,
            });
        }
        records.push(record);
    }

    records.sort_by_key(|record| record.date);
    Ok(records)
}

/// Writes one JSON object per line, in the given order.
pub fn write_jsonl(
    mut writer: impl Write,
    records: &[DailyRecord],
) -> Result<(), InterchangeError> {
    for (index, record) in records.iter().enumerate() {
        serde_json::to_writer(&mut writer, record).map_err(|source| InterchangeError::Json {
            line: index + 1,
            source,
        })?;
        writer.write_all(b"\n")?;
    }
    writer.flush()?;
    Ok(())
}
