//! JSON snapshot codec over the key-value boundary.
//!
//! # Responsibility
//! - Encode whole collections to JSON text and decode them back.
//! - Attach the storage key to codec failures so callers can report which
//!   persisted blob is bad.
//!
//! # Invariants
//! - An absent key decodes to `None`; only present-but-malformed text is an
//!   error.
//! - `save` writes the full serialized value, never a partial update.

use serde::de::DeserializeOwned;
use serde::Serialize;
use std::error::Error;
use std::fmt::{Display, Formatter};

use crate::db::kv::KvStore;
use crate::db::DbError;

pub type SnapshotResult<T> = Result<T, SnapshotError>;

/// Errors raised while loading or persisting a snapshot.
#[derive(Debug)]
pub enum SnapshotError {
    /// The underlying key-value store failed.
    Db(DbError),
    /// Stored text under `key` is not valid JSON for the expected type.
    Decode {
        key: String,
        source: serde_json::Error,
    },
    /// The in-memory value could not be serialized for `key`.
    Encode {
        key: String,
        source: serde_json::Error,
    },
}

impl Display for SnapshotError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "snapshot storage error: {err}"),
            Self::Decode { key, source } => {
                write!(f, "failed to decode snapshot '{key}': {source}")
            }
            Self::Encode { key, source } => {
                write!(f, "failed to encode snapshot '{key}': {source}")
            }
        }
    }
}

impl Error for SnapshotError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            Self::Decode { source, .. } => Some(source),
            Self::Encode { source, .. } => Some(source),
        }
    }
}

impl From<DbError> for SnapshotError {
    fn from(err: DbError) -> Self {
        Self::Db(err)
    }
}

/// Reads and decodes the snapshot stored under `key`.
pub fn load<T: DeserializeOwned>(storage: &impl KvStore, key: &str) -> SnapshotResult<Option<T>> {
    let Some(text) = storage.read(key)? else {
        return Ok(None);
    };
    let value = serde_json::from_str(&text).map_err(|source| SnapshotError::Decode {
        key: key.to_string(),
        source,
    })?;
    Ok(Some(value))
}

/// Encodes `value` and persists it under `key`, replacing any prior snapshot.
pub fn save<T: Serialize>(storage: &impl KvStore, key: &str, value: &T) -> SnapshotResult<()> {
    let text = serde_json::to_string(value).map_err(|source| SnapshotError::Encode {
        key: key.to_string(),
        source,
    })?;
    storage.write(key, &text)?;
    Ok(())
}
