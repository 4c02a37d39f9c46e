//! Meme record table over the key-value snapshot store.
//!
//! # Responsibility
//! - Own the persisted meme collection: lazy load, seed, id assignment,
//!   add/remove with synchronous write-back.
//! - Enforce `NewMeme` validation and snapshot integrity checks.
//!
//! # Invariants
//! - Ids are unique and nonzero within a loaded table.
//! - New records get `max(id) + 1` (or 1 for an empty table) and always
//!   start with `is_hot = false`.
//! - Every mutation persists the full table before returning. A failed
//!   write drops the cache, so the next access re-reads the stored
//!   snapshot instead of serving unpersisted records.

use log::info;
use std::collections::BTreeSet;
use std::error::Error;
use std::fmt::{Display, Formatter};

use crate::dataset;
use crate::db::keys;
use crate::db::kv::KvStore;
use crate::db::snapshot::{self, SnapshotError};
use crate::model::meme::{Meme, MemeId, MemeValidationError, NewMeme};

pub type RepoResult<T> = Result<T, RepoError>;

/// Errors surfaced by the record table.
#[derive(Debug)]
pub enum RepoError {
    /// A submitted record failed validation.
    Validation(MemeValidationError),
    /// Snapshot storage or codec failure.
    Snapshot(SnapshotError),
    /// The bundled default dataset failed to decode.
    DefaultDataset(serde_json::Error),
    /// A loaded snapshot violates table invariants (duplicate or zero ids).
    Corrupt(String),
    /// The table already holds the maximum representable id.
    IdSpaceExhausted,
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "invalid meme: {err}"),
            Self::Snapshot(err) => write!(f, "meme table storage error: {err}"),
            Self::DefaultDataset(err) => {
                write!(f, "bundled default dataset is not decodable: {err}")
            }
            Self::Corrupt(detail) => write!(f, "meme table snapshot is corrupt: {detail}"),
            Self::IdSpaceExhausted => write!(f, "meme id space is exhausted"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Snapshot(err) => Some(err),
            Self::DefaultDataset(err) => Some(err),
            _ => None,
        }
    }
}

impl From<MemeValidationError> for RepoError {
    fn from(err: MemeValidationError) -> Self {
        Self::Validation(err)
    }
}

impl From<SnapshotError> for RepoError {
    fn from(err: SnapshotError) -> Self {
        Self::Snapshot(err)
    }
}

/// The id-indexed meme collection, persisted as one snapshot.
///
/// Construction does no I/O. The first accessor call loads the snapshot
/// under [`keys::MEME_TABLE`]; when none exists the bundled default dataset
/// is seeded and persisted immediately so later loads see a stable table.
#[derive(Debug)]
pub struct MemeTable<S: KvStore> {
    storage: S,
    cache: Option<Vec<Meme>>,
}

impl<S: KvStore> MemeTable<S> {
    pub fn new(storage: S) -> Self {
        Self {
            storage,
            cache: None,
        }
    }

    /// Returns every record currently in the table.
    pub fn list_all(&mut self) -> RepoResult<Vec<Meme>> {
        Ok(self.loaded()?.to_vec())
    }

    /// Looks up one record by exact id. An absent id is `Ok(None)`.
    pub fn get_by_id(&mut self, id: MemeId) -> RepoResult<Option<Meme>> {
        Ok(self.loaded()?.iter().find(|meme| meme.id == id).cloned())
    }

    /// Number of records currently in the table.
    pub fn count(&mut self) -> RepoResult<usize> {
        Ok(self.loaded()?.len())
    }

    /// Validates `new`, assigns the next id, appends, and persists.
    ///
    /// The created record always starts not-hot; any popularity value in the
    /// submitted payload is ignored. Fails with [`RepoError::IdSpaceExhausted`]
    /// when the table already holds the maximum id.
    pub fn add(&mut self, new: &NewMeme) -> RepoResult<Meme> {
        new.validate()?;

        let memes = self.loaded_mut()?;
        let id = next_id(memes).ok_or(RepoError::IdSpaceExhausted)?;
        let meme = Meme::from_new(id, new);
        memes.push(meme.clone());
        self.persist()?;
        Ok(meme)
    }

    /// Removes the record with the given id and persists.
    ///
    /// Removing an id that is not present leaves the table unchanged and is
    /// not an error.
    pub fn remove(&mut self, id: MemeId) -> RepoResult<()> {
        let memes = self.loaded_mut()?;
        memes.retain(|meme| meme.id != id);
        self.persist()?;
        Ok(())
    }

    fn loaded(&mut self) -> RepoResult<&[Meme]> {
        self.ensure_loaded()?;
        Ok(self.cache.as_deref().unwrap_or_default())
    }

    fn loaded_mut(&mut self) -> RepoResult<&mut Vec<Meme>> {
        self.ensure_loaded()?;
        Ok(self.cache.get_or_insert_with(Vec::new))
    }

    fn ensure_loaded(&mut self) -> RepoResult<()> {
        if self.cache.is_some() {
            return Ok(());
        }

        let memes = match snapshot::load::<Vec<Meme>>(&self.storage, keys::MEME_TABLE)? {
            Some(memes) => {
                check_table_integrity(&memes)?;
                memes
            }
            None => {
                let seeded = dataset::bundled::default_memes()
                    .map_err(RepoError::DefaultDataset)?;
                snapshot::save(&self.storage, keys::MEME_TABLE, &seeded)?;
                info!(
                    "event=table_seed module=repo status=ok key={} count={}",
                    keys::MEME_TABLE,
                    seeded.len()
                );
                seeded
            }
        };

        self.cache = Some(memes);
        Ok(())
    }

    /// Writes the cached table back to storage.
    ///
    /// On a failed write the cache is dropped before the error is returned;
    /// the table then reloads the last persisted snapshot on the next access.
    fn persist(&mut self) -> RepoResult<()> {
        let Some(memes) = self.cache.as_ref() else {
            return Ok(());
        };
        if let Err(err) = snapshot::save(&self.storage, keys::MEME_TABLE, memes) {
            self.cache = None;
            return Err(err.into());
        }
        Ok(())
    }
}

/// Next id for an append: one past the current maximum, or 1 when empty.
///
/// After removing the record with the highest id, that id is handed out
/// again by the next add. Overlay entries never pin ids, so reuse is
/// accepted table behavior rather than a defect. Returns `None` once the
/// maximum id is taken and no further id can be minted.
fn next_id(memes: &[Meme]) -> Option<MemeId> {
    memes
        .iter()
        .map(|meme| meme.id)
        .max()
        .map_or(Some(1), |max| max.checked_add(1))
}

fn check_table_integrity(memes: &[Meme]) -> RepoResult<()> {
    let mut seen = BTreeSet::new();
    for meme in memes {
        if meme.id == 0 {
            return Err(RepoError::Corrupt(format!(
                "record '{}' has reserved id 0",
                meme.term
            )));
        }
        if !seen.insert(meme.id) {
            return Err(RepoError::Corrupt(format!("duplicate id {}", meme.id)));
        }
    }
    Ok(())
}
