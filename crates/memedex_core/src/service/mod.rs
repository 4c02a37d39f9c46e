//! Use-case services orchestrating table and overlay state.
//!
//! # Responsibility
//! - Compose the record table and the four tag overlays into the dictionary
//!   facade consumed by presentation code.
//!
//! # Invariants
//! - Services never bypass repository validation or overlay persistence.
//! - Overlay vocabulary is fixed here: favorites/likes toggle, blacklist and
//!   not-interested use explicit mark/unmark pairs.

pub mod dictionary_service;

pub use dictionary_service::{
    DictionaryService, MemeCard, MemeListQuery, ServiceError, ServiceResult,
};
