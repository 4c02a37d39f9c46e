//! Opening SQLite connections that are ready for snapshot traffic.
//!
//! # Responsibility
//! - Open file and in-memory databases.
//! - Run pending schema migrations before handing the connection out.
//!
//! # Invariants
//! - A returned connection is always at the latest schema version.
//! - Success and failure both surface as a `db_open` log event carrying
//!   the elapsed duration.

use super::migrations::apply_migrations;
use super::{DbError, DbResult};
use log::{error, info};
use rusqlite::Connection;
use std::path::Path;
use std::time::{Duration, Instant};

const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// Opens the database file at `path`, creating it when missing, and brings
/// its schema up to date.
pub fn open_db(path: impl AsRef<Path>) -> DbResult<Connection> {
    open_with(Connection::open(path), "file")
}

/// Opens a fresh in-memory database with the full schema applied.
///
/// Used by tests and development shells; behavior matches [`open_db`]
/// apart from durability.
pub fn open_db_in_memory() -> DbResult<Connection> {
    open_with(Connection::open_in_memory(), "memory")
}

fn open_with(opened: rusqlite::Result<Connection>, mode: &str) -> DbResult<Connection> {
    let started_at = Instant::now();
    info!("event=db_open module=db status=start mode={mode}");

    let outcome = opened
        .map_err(|err| (DbError::from(err), "db_open_failed"))
        .and_then(|mut conn| {
            bootstrap_connection(&mut conn)
                .map(|()| conn)
                .map_err(|err| (err, "db_bootstrap_failed"))
        });

    match outcome {
        Ok(conn) => {
            info!(
                "event=db_open module=db status=ok mode={mode} duration_ms={}",
                started_at.elapsed().as_millis()
            );
            Ok(conn)
        }
        Err((err, error_code)) => {
            error!(
                "event=db_open module=db status=error mode={mode} duration_ms={} error_code={error_code} error={}",
                started_at.elapsed().as_millis(),
                err
            );
            Err(err)
        }
    }
}

fn bootstrap_connection(conn: &mut Connection) -> DbResult<()> {
    conn.busy_timeout(BUSY_TIMEOUT)?;
    apply_migrations(conn)?;
    Ok(())
}
