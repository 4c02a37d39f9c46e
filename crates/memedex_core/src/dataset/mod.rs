//! Bundled dictionary data and curation tooling.
//!
//! # Responsibility
//! - Embed the factory dataset the record table seeds from.
//! - Offer offline audit helpers for dataset curation (duplicate detection,
//!   id renumbering).
//!
//! # Invariants
//! - The bundled dataset decodes through the same tolerant `Meme`
//!   deserializer as persisted snapshots.
//! - Audit helpers never touch persisted state; they operate on in-memory
//!   slices only.

pub mod audit;
pub mod bundled;
