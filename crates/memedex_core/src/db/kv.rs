//! Key-value adapter contract and SQLite implementation.
//!
//! # Responsibility
//! - Define the synchronous read/write boundary every collection persists
//!   through.
//! - Keep SQL details of the `kv_entries` table inside this module.
//!
//! # Invariants
//! - `write` replaces the whole value for a key in one statement.
//! - Implementations must refuse to operate on unmigrated connections.

use crate::db::migrations::latest_version;
use crate::db::{DbError, DbResult};
use rusqlite::{params, Connection, OptionalExtension};

/// Synchronous key-value storage boundary.
///
/// Values are opaque text blobs; the snapshot codec above this trait
/// decides their shape. An absent key reads as `None`, never as an error.
pub trait KvStore {
    fn read(&self, key: &str) -> DbResult<Option<String>>;
    fn write(&self, key: &str, value: &str) -> DbResult<()>;
}

/// SQLite-backed key-value store over the `kv_entries` table.
#[derive(Debug, Clone, Copy)]
pub struct SqliteKvStore<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteKvStore<'conn> {
    /// Constructs an adapter from a migrated/ready connection.
    pub fn try_new(conn: &'conn Connection) -> DbResult<Self> {
        ensure_connection_ready(conn)?;
        Ok(Self { conn })
    }
}

impl KvStore for SqliteKvStore<'_> {
    fn read(&self, key: &str) -> DbResult<Option<String>> {
        let value = self
            .conn
            .query_row(
                "SELECT value FROM kv_entries WHERE key = ?1;",
                [key],
                |row| row.get(0),
            )
            .optional()?;
        Ok(value)
    }

    fn write(&self, key: &str, value: &str) -> DbResult<()> {
        self.conn.execute(
            "INSERT INTO kv_entries (key, value, updated_at)
             VALUES (?1, ?2, strftime('%s', 'now') * 1000)
             ON CONFLICT(key) DO UPDATE SET
                value = excluded.value,
                updated_at = excluded.updated_at;",
            params![key, value],
        )?;
        Ok(())
    }
}

const REQUIRED_COLUMNS: [&str; 3] = ["key", "value", "updated_at"];

fn ensure_connection_ready(conn: &Connection) -> DbResult<()> {
    let expected_version = latest_version();
    let actual_version: u32 = conn.query_row("PRAGMA user_version;", [], |row| row.get(0))?;
    if actual_version != expected_version {
        return Err(DbError::UninitializedConnection {
            expected_version,
            actual_version,
        });
    }

    // table_info reports no rows for a table that does not exist.
    let columns = table_columns(conn, "kv_entries")?;
    if columns.is_empty() {
        return Err(DbError::MissingRequiredTable("kv_entries"));
    }
    for required in REQUIRED_COLUMNS {
        if !columns.iter().any(|name| name == required) {
            return Err(DbError::MissingRequiredColumn {
                table: "kv_entries",
                column: required,
            });
        }
    }

    Ok(())
}

fn table_columns(conn: &Connection, table: &str) -> DbResult<Vec<String>> {
    let mut stmt = conn.prepare(&format!("PRAGMA table_info({table});"))?;
    let names = stmt
        .query_map([], |row| row.get::<_, String>(1))?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(names)
}
