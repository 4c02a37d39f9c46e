//! Core domain logic for Memedex.
//! This crate is the single source of truth for dictionary invariants.

pub mod dataset;
pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;
pub mod store;

pub use db::kv::{KvStore, SqliteKvStore};
pub use db::{open_db, open_db_in_memory, DbError, DbResult};
pub use logging::{default_log_level, init_logging, logging_status};
pub use model::meme::{parse_meme_id, Meme, MemeId, MemeValidationError, NewMeme};
pub use repo::meme_repo::{MemeTable, RepoError, RepoResult};
pub use service::dictionary_service::{
    DictionaryService, MemeCard, MemeListQuery, ServiceError, ServiceResult,
};
pub use store::overlay::TagOverlay;

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
