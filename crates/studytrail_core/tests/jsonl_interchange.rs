use chrono::NaiveDate;
use std::fs::File;
use std::io::{BufReader, Cursor};
use studytrail_core::db::open_db_in_memory;
use studytrail_core::{
    read_jsonl, write_jsonl, DailyRecord, InterchangeError, ProgressService,
    SqliteRecordRepository, DEFAULT_BOOK,
};

fn date(day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 9, day).unwrap()
}

#[test]
fn legacy_lines_are_read_with_defaults() {
    let input = r#"{"date":"2025-09-02","problems":["1.2"],"exercises":[],"alcumus":["2025-09-02 08:00:00"]}

{"date":"2025-09-01","problems":["1.1"]}
"#;
    let records = read_jsonl(Cursor::new(input)).unwrap();

    assert_eq!(records.len(), 2);
    assert_eq!(records[0].date, date(1));
    assert_eq!(records[0].book, DEFAULT_BOOK);
    assert!(records[0].notes.is_empty());
    assert_eq!(records[1].auxiliary, vec!["2025-09-02 08:00:00"]);
}

#[test]
fn malformed_and_invalid_lines_report_line_numbers() {
    let malformed = "{\"date\":\"2025-09-01\"}\nnot json\n";
    assert!(matches!(
        read_jsonl(Cursor::new(malformed)),
        Err(InterchangeError::Json { line: 2, .. })
    ));

    let invalid = "{\"date\":\"2025-09-01\",\"problems\":[\"1.1.1\"]}\n";
    assert!(matches!(
        read_jsonl(Cursor::new(invalid)),
        Err(InterchangeError::Invalid { line: 1, .. })
    ));
}

#[test]
fn export_then_import_into_fresh_store_preserves_history() {
    let mut source_conn = open_db_in_memory().unwrap();
    let repo = SqliteRecordRepository::try_new(&mut source_conn).unwrap();
    let mut source = ProgressService::new(repo);

    let mut first = DailyRecord::empty(date(1));
    first.problems = vec!["5.1".into(), "5.2".into()];
    first.exercises = vec!["5.1.1".into()];
    first.notes = "notes with \"quotes\"".into();
    let mut second = DailyRecord::empty(date(3));
    second.auxiliary = vec!["2025-09-03 21:10:00".into()];
    source.import_records(&[first, second]).unwrap();

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("export.jsonl");
    let exported = source.history().unwrap();
    write_jsonl(File::create(&path).unwrap(), &exported).unwrap();

    let restored = read_jsonl(BufReader::new(File::open(&path).unwrap())).unwrap();
    let mut target_conn = open_db_in_memory().unwrap();
    let repo = SqliteRecordRepository::try_new(&mut target_conn).unwrap();
    let mut target = ProgressService::new(repo);
    target.import_records(&restored).unwrap();

    assert_eq!(target.history().unwrap(), exported);
}
