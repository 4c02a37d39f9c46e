//! Embedded schema scripts and the logic that brings a database up to date.
//!
//! # Responsibility
//! - Bundle every schema script shipped with this build.
//! - Keep `PRAGMA user_version` in step with the applied scripts.
//!
//! # Invariants
//! - The script at index `n` of the registry produces schema version `n + 1`.
//! - A database newer than this build is rejected, never downgraded.

use crate::db::{DbError, DbResult};
use rusqlite::Connection;

const MIGRATION_SCRIPTS: &[&str] = &[include_str!("0001_init.sql")];

/// Returns the schema version this build writes and expects.
pub fn latest_version() -> u32 {
    MIGRATION_SCRIPTS.len() as u32
}

/// Runs every script the database has not seen yet, inside one transaction.
///
/// A database already at the latest version is left untouched. A database
/// reporting a version newer than this build fails with
/// [`DbError::UnsupportedSchemaVersion`] before any write happens.
pub fn apply_migrations(conn: &mut Connection) -> DbResult<()> {
    let db_version = schema_version(conn)?;
    let latest_supported = latest_version();

    if db_version > latest_supported {
        return Err(DbError::UnsupportedSchemaVersion {
            db_version,
            latest_supported,
        });
    }

    let pending = &MIGRATION_SCRIPTS[db_version as usize..];
    if pending.is_empty() {
        return Ok(());
    }

    let tx = conn.transaction()?;
    for (offset, script) in pending.iter().enumerate() {
        let version = db_version + offset as u32 + 1;
        tx.execute_batch(script)?;
        tx.execute_batch(&format!("PRAGMA user_version = {version};"))?;
    }
    tx.commit()?;

    Ok(())
}

fn schema_version(conn: &Connection) -> DbResult<u32> {
    let version = conn.query_row("PRAGMA user_version;", [], |row| row.get::<_, u32>(0))?;
    Ok(version)
}
