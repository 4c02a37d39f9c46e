//! Write-through cell pairing an in-memory value with a storage key.

use serde::Serialize;

use crate::db::kv::KvStore;
use crate::db::snapshot::{self, SnapshotResult};

/// A value that re-persists its full snapshot after every mutation.
///
/// Reads are served from memory. All writes go through [`SnapshotCell::mutate`],
/// which serializes the updated value and stores it under the cell's key
/// before returning. There is no deferred or batched flush; once `mutate`
/// returns `Ok`, the stored snapshot matches the in-memory state.
#[derive(Debug)]
pub struct SnapshotCell<T, S: KvStore> {
    key: &'static str,
    storage: S,
    value: T,
}

impl<T, S> SnapshotCell<T, S>
where
    T: Serialize + Clone,
    S: KvStore,
{
    /// Wraps an already-decoded value. The cell takes over `key` and
    /// persists every later mutation under it; construction writes nothing.
    pub fn new(storage: S, key: &'static str, value: T) -> Self {
        Self {
            key,
            storage,
            value,
        }
    }

    /// Storage key this cell persists under.
    pub fn key(&self) -> &'static str {
        self.key
    }

    /// Current in-memory value.
    pub fn get(&self) -> &T {
        &self.value
    }

    /// Applies `f` to the value and persists the result.
    ///
    /// The snapshot is written even when `f` leaves the value unchanged;
    /// callers that can detect a no-op should skip calling `mutate` instead.
    /// When the write fails, the value is rolled back to the state before
    /// `f` ran and the error is returned.
    pub fn mutate<R>(&mut self, f: impl FnOnce(&mut T) -> R) -> SnapshotResult<R> {
        let rollback = self.value.clone();
        let out = f(&mut self.value);
        if let Err(err) = snapshot::save(&self.storage, self.key, &self.value) {
            self.value = rollback;
            return Err(err);
        }
        Ok(out)
    }
}
