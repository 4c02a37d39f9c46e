use memedex_core::db::keys;
use memedex_core::db::open_db_in_memory;
use memedex_core::db::snapshot::SnapshotError;
use memedex_core::{DbError, DbResult, KvStore, SqliteKvStore, TagOverlay};
use std::cell::Cell;

#[test]
fn toggle_adds_then_removes_and_persists_each_step() {
    let conn = open_db_in_memory().unwrap();
    let storage = SqliteKvStore::try_new(&conn).unwrap();
    let mut favorites = TagOverlay::open(storage, keys::FAVORITES).unwrap();

    assert!(!favorites.contains(5));

    favorites.toggle(5).unwrap();
    assert!(favorites.contains(5));
    assert_eq!(
        storage.read(keys::FAVORITES).unwrap(),
        Some("[5]".to_string())
    );

    favorites.toggle(5).unwrap();
    assert!(!favorites.contains(5));
    assert_eq!(
        storage.read(keys::FAVORITES).unwrap(),
        Some("[]".to_string())
    );
}

#[test]
fn toggle_is_its_own_inverse_for_any_starting_state() {
    let conn = open_db_in_memory().unwrap();
    let storage = SqliteKvStore::try_new(&conn).unwrap();
    let mut likes = TagOverlay::open(storage, keys::LIKES).unwrap();

    likes.toggle(1).unwrap();
    likes.toggle(2).unwrap();
    let before: Vec<u32> = likes.ids().to_vec();

    likes.toggle(7).unwrap();
    likes.toggle(7).unwrap();

    assert_eq!(likes.ids(), before.as_slice());
}

#[test]
fn insert_is_idempotent() {
    let conn = open_db_in_memory().unwrap();
    let storage = SqliteKvStore::try_new(&conn).unwrap();
    let mut blacklist = TagOverlay::open(storage, keys::BLACKLIST).unwrap();

    blacklist.insert(9).unwrap();
    blacklist.insert(9).unwrap();

    assert_eq!(blacklist.ids(), &[9]);
    assert_eq!(
        storage.read(keys::BLACKLIST).unwrap(),
        Some("[9]".to_string())
    );
}

#[test]
fn no_op_remove_skips_the_storage_write() {
    let conn = open_db_in_memory().unwrap();
    let storage = SqliteKvStore::try_new(&conn).unwrap();
    let mut hidden = TagOverlay::open(storage, keys::NOT_INTERESTED).unwrap();

    hidden.remove(4).unwrap();

    assert_eq!(storage.read(keys::NOT_INTERESTED).unwrap(), None);
}

#[test]
fn no_op_insert_skips_the_storage_write() {
    let conn = open_db_in_memory().unwrap();
    let storage = SqliteKvStore::try_new(&conn).unwrap();
    let mut hidden = TagOverlay::open(storage, keys::NOT_INTERESTED).unwrap();

    hidden.insert(4).unwrap();
    storage.write(keys::NOT_INTERESTED, "sentinel").unwrap();

    hidden.insert(4).unwrap();

    assert_eq!(
        storage.read(keys::NOT_INTERESTED).unwrap(),
        Some("sentinel".to_string())
    );
}

#[test]
fn overlays_are_independent() {
    let conn = open_db_in_memory().unwrap();
    let storage = SqliteKvStore::try_new(&conn).unwrap();
    let mut favorites = TagOverlay::open(storage, keys::FAVORITES).unwrap();
    let mut likes = TagOverlay::open(storage, keys::LIKES).unwrap();

    favorites.toggle(5).unwrap();

    assert!(favorites.contains(5));
    assert!(!likes.contains(5));
    assert_eq!(storage.read(keys::LIKES).unwrap(), None);

    likes.toggle(6).unwrap();
    assert!(!favorites.contains(6));
}

#[test]
fn membership_keeps_insertion_order() {
    let conn = open_db_in_memory().unwrap();
    let storage = SqliteKvStore::try_new(&conn).unwrap();
    let mut favorites = TagOverlay::open(storage, keys::FAVORITES).unwrap();

    favorites.toggle(3).unwrap();
    favorites.toggle(1).unwrap();
    favorites.toggle(2).unwrap();

    assert_eq!(favorites.ids(), &[3, 1, 2]);
    assert_eq!(
        storage.read(keys::FAVORITES).unwrap(),
        Some("[3,1,2]".to_string())
    );
}

#[test]
fn persisted_members_survive_a_reload() {
    let conn = open_db_in_memory().unwrap();
    let storage = SqliteKvStore::try_new(&conn).unwrap();

    {
        let mut favorites = TagOverlay::open(storage, keys::FAVORITES).unwrap();
        favorites.toggle(11).unwrap();
        favorites.toggle(12).unwrap();
    }

    let reloaded = TagOverlay::open(storage, keys::FAVORITES).unwrap();
    assert_eq!(reloaded.ids(), &[11, 12]);
    assert_eq!(reloaded.len(), 2);
    assert!(!reloaded.is_empty());
}

#[test]
fn malformed_overlay_snapshot_fails_to_open() {
    let conn = open_db_in_memory().unwrap();
    let storage = SqliteKvStore::try_new(&conn).unwrap();
    storage.write(keys::FAVORITES, "{\"nope\":true}").unwrap();

    let err = TagOverlay::open(storage, keys::FAVORITES).unwrap_err();
    match err {
        SnapshotError::Decode { key, .. } => assert_eq!(key, keys::FAVORITES),
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn fresh_overlay_does_not_write_until_first_mutation() {
    let conn = open_db_in_memory().unwrap();
    let storage = SqliteKvStore::try_new(&conn).unwrap();

    let overlay = TagOverlay::open(storage, keys::BLACKLIST).unwrap();
    assert!(overlay.is_empty());
    assert_eq!(storage.read(keys::BLACKLIST).unwrap(), None);
}

#[test]
fn duplicated_ids_in_a_snapshot_collapse_on_load() {
    let conn = open_db_in_memory().unwrap();
    let storage = SqliteKvStore::try_new(&conn).unwrap();
    storage.write(keys::FAVORITES, "[5,5,3,5]").unwrap();

    let mut favorites = TagOverlay::open(storage, keys::FAVORITES).unwrap();
    assert_eq!(favorites.ids(), &[5, 3]);
    assert_eq!(
        storage.read(keys::FAVORITES).unwrap(),
        Some("[5,5,3,5]".to_string())
    );

    favorites.toggle(5).unwrap();
    assert!(!favorites.contains(5));
    assert_eq!(
        storage.read(keys::FAVORITES).unwrap(),
        Some("[3]".to_string())
    );
}

#[test]
fn failed_write_rolls_back_the_membership_change() {
    let conn = open_db_in_memory().unwrap();
    let storage = SqliteKvStore::try_new(&conn).unwrap();
    storage.write(keys::LIKES, "[4]").unwrap();

    let fail_writes = Cell::new(false);
    let mut likes = TagOverlay::open(
        FailingWrites {
            inner: storage,
            fail_writes: &fail_writes,
        },
        keys::LIKES,
    )
    .unwrap();

    fail_writes.set(true);
    let err = likes.toggle(9).unwrap_err();
    assert!(matches!(err, SnapshotError::Db(_)));
    assert!(!likes.contains(9));
    assert_eq!(likes.ids(), &[4]);
    assert_eq!(storage.read(keys::LIKES).unwrap(), Some("[4]".to_string()));

    fail_writes.set(false);
    likes.toggle(9).unwrap();
    assert_eq!(storage.read(keys::LIKES).unwrap(), Some("[4,9]".to_string()));
}

/// Store wrapper whose writes fail while the flag is set.
struct FailingWrites<'a> {
    inner: SqliteKvStore<'a>,
    fail_writes: &'a Cell<bool>,
}

impl KvStore for FailingWrites<'_> {
    fn read(&self, key: &str) -> DbResult<Option<String>> {
        self.inner.read(key)
    }

    fn write(&self, key: &str, value: &str) -> DbResult<()> {
        if self.fail_writes.get() {
            return Err(DbError::Sqlite(rusqlite::Error::InvalidQuery));
        }
        self.inner.write(key, value)
    }
}
