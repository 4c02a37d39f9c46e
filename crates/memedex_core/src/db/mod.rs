//! SQLite-backed key-value storage bootstrap and adapter.
//!
//! # Responsibility
//! - Open and configure SQLite connections for the dictionary core.
//! - Apply schema migrations in deterministic order.
//! - Expose the synchronous key-value boundary the collections persist
//!   through, plus the JSON snapshot codec layered on it.
//!
//! # Invariants
//! - Migration version is tracked via `PRAGMA user_version`.
//! - Core code must not read/write application data before migrations
//!   succeed; the adapter guards reject unmigrated connections.
//! - Writes are independent per storage key; there is no cross-key
//!   transaction.

use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod keys;
pub mod kv;
pub mod migrations;
mod open;
pub mod snapshot;

pub use open::{open_db, open_db_in_memory};

pub type DbResult<T> = Result<T, DbError>;

/// Storage-layer error for bootstrap, migration and adapter access.
#[derive(Debug)]
pub enum DbError {
    Sqlite(rusqlite::Error),
    UnsupportedSchemaVersion {
        db_version: u32,
        latest_supported: u32,
    },
    /// Connection schema is not at the expected migrated version.
    UninitializedConnection {
        expected_version: u32,
        actual_version: u32,
    },
    /// Required table is missing.
    MissingRequiredTable(&'static str),
    /// Required column is missing from expected table.
    MissingRequiredColumn {
        table: &'static str,
        column: &'static str,
    },
}

impl Display for DbError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Sqlite(err) => write!(f, "{err}"),
            Self::UnsupportedSchemaVersion {
                db_version,
                latest_supported,
            } => write!(
                f,
                "database reports schema version {db_version}, newest supported is {latest_supported}"
            ),
            Self::UninitializedConnection {
                expected_version,
                actual_version,
            } => write!(
                f,
                "key-value store requires schema version {expected_version}, got {actual_version}"
            ),
            Self::MissingRequiredTable(table) => {
                write!(f, "key-value store requires table `{table}`")
            }
            Self::MissingRequiredColumn { table, column } => write!(
                f,
                "key-value store requires column `{column}` in table `{table}`"
            ),
        }
    }
}

impl Error for DbError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Sqlite(err) => Some(err),
            _ => None,
        }
    }
}

impl From<rusqlite::Error> for DbError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Sqlite(value)
    }
}
