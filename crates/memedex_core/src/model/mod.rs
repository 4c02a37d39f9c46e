//! Canonical domain model for dictionary entries.
//!
//! # Responsibility
//! - Define the record shape shared by persistence, overlays and services.
//! - Keep snapshot-format tolerance (legacy field shapes) inside the model.
//!
//! # Invariants
//! - Every record is identified by a positive integer `MemeId`.
//! - Free-form descriptive fields survive encode/decode unchanged.

pub mod meme;
