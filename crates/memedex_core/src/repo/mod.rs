//! Repository layer for the record table.
//!
//! # Responsibility
//! - Define use-case oriented access to the persisted meme collection.
//! - Isolate snapshot/key details from service orchestration.
//!
//! # Invariants
//! - Repository writes must enforce `NewMeme::validate()` before persistence.
//! - Loaded snapshots are integrity-checked (unique, nonzero ids) before the
//!   cache is populated.

pub mod meme_repo;

pub use meme_repo::{MemeTable, RepoError, RepoResult};
