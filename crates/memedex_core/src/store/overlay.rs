//! Persisted membership set over record ids.

use log::{debug, warn};
use std::collections::BTreeSet;

use crate::db::kv::KvStore;
use crate::db::snapshot::{self, SnapshotResult};
use crate::model::meme::MemeId;
use crate::store::cell::SnapshotCell;

/// An ordered set of record ids persisted as one JSON array snapshot.
///
/// Each overlay owns a fixed storage key and knows nothing about the
/// records it tags; membership of an id that no longer exists in the
/// record table is tolerated and simply never surfaces in joined views.
/// Insertion order is preserved so listings can show oldest marks first.
#[derive(Debug)]
pub struct TagOverlay<S: KvStore> {
    cell: SnapshotCell<Vec<MemeId>, S>,
}

impl<S: KvStore> TagOverlay<S> {
    /// Loads the overlay stored under `key`, starting empty when no
    /// snapshot exists yet.
    ///
    /// Loading never writes. A duplicated id in the stored snapshot keeps
    /// its first position and loses the later copies; the repaired set
    /// reaches storage with the next mutation.
    pub fn open(storage: S, key: &'static str) -> SnapshotResult<Self> {
        let mut members: Vec<MemeId> = snapshot::load(&storage, key)?.unwrap_or_default();
        let loaded = members.len();
        let mut seen = BTreeSet::new();
        members.retain(|id| seen.insert(*id));
        if members.len() < loaded {
            warn!(
                "event=overlay_load module=store status=repaired key={} dropped={}",
                key,
                loaded - members.len()
            );
        }
        debug!(
            "event=overlay_load module=store key={} count={}",
            key,
            members.len()
        );
        Ok(Self {
            cell: SnapshotCell::new(storage, key, members),
        })
    }

    /// Storage key this overlay persists under.
    pub fn key(&self) -> &'static str {
        self.cell.key()
    }

    pub fn contains(&self, id: MemeId) -> bool {
        self.cell.get().contains(&id)
    }

    /// Flips membership of `id` and persists the updated set.
    pub fn toggle(&mut self, id: MemeId) -> SnapshotResult<()> {
        self.cell.mutate(|members| {
            match members.iter().position(|member| *member == id) {
                Some(index) => {
                    members.remove(index);
                }
                None => members.push(id),
            }
        })
    }

    /// Adds `id` to the set. Already-present ids are left untouched and
    /// nothing is written.
    pub fn insert(&mut self, id: MemeId) -> SnapshotResult<()> {
        if self.contains(id) {
            return Ok(());
        }
        self.cell.mutate(|members| members.push(id))
    }

    /// Removes `id` from the set. Absent ids are a no-op and nothing is
    /// written.
    pub fn remove(&mut self, id: MemeId) -> SnapshotResult<()> {
        let Some(index) = self.cell.get().iter().position(|member| *member == id) else {
            return Ok(());
        };
        self.cell.mutate(|members| {
            members.remove(index);
        })
    }

    /// Member ids in insertion order.
    pub fn ids(&self) -> &[MemeId] {
        self.cell.get()
    }

    pub fn len(&self) -> usize {
        self.cell.get().len()
    }

    pub fn is_empty(&self) -> bool {
        self.cell.get().is_empty()
    }
}
