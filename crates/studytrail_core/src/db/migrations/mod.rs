//! Schema versioning for the record store.
//!
//! # Responsibility
//! - Hold the embedded schema scripts, keyed by `PRAGMA user_version`.
//! - Bring a connection up to the newest schema in one transaction.
//!
//! # Invariants
//! - Versions start at 1 and increase by exactly one per script.
//! - A database stamped with a newer version than this binary knows is
//!   refused, never downgraded.

use crate::db::{DbError, DbResult};
use log::{debug, info};
use rusqlite::Connection;

/// Embedded scripts; index `i` upgrades a database to version `i + 1`.
const SCHEMA_SCRIPTS: &[&str] = &[include_str!("0001_init.sql")];

/// Returns the schema version this binary writes and expects.
pub fn latest_version() -> u32 {
    u32::try_from(SCHEMA_SCRIPTS.len()).unwrap_or(u32::MAX)
}

/// Upgrades `conn` to [`latest_version`], applying only missing scripts.
pub fn apply_migrations(conn: &mut Connection) -> DbResult<()> {
    let from_version = current_user_version(conn)?;
    let to_version = latest_version();

    if from_version > to_version {
        return Err(DbError::UnsupportedSchemaVersion {
            db_version: from_version,
            latest_supported: to_version,
        });
    }
    if from_version == to_version {
        return Ok(());
    }

    let tx = conn.transaction()?;
    for (version, script) in (1..).zip(SCHEMA_SCRIPTS).skip(from_version as usize) {
        tx.execute_batch(script)?;
        tx.pragma_update(None, "user_version", version)?;
        debug!("event=db_migrate_step module=db status=ok version={version}");
    }
    tx.commit()?;

    info!(
        "event=db_migrate module=db status=ok from_version={from_version} to_version={to_version}"
    );
    Ok(())
}

/// Reads the schema version stored in `PRAGMA user_version`.
pub fn current_user_version(conn: &Connection) -> DbResult<u32> {
    let version = conn.query_row("PRAGMA user_version;", [], |row| row.get::<_, u32>(0))?;
    Ok(version)
}
