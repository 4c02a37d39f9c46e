//! Reactive state containers bound to persisted snapshots.
//!
//! # Responsibility
//! - Pair an in-memory value with its storage key and re-persist it after
//!   every mutation.
//! - Provide the tag overlay built on that write-through behavior.
//!
//! # Invariants
//! - After any successful mutation the stored snapshot equals the
//!   serialized in-memory value.

pub mod cell;
pub mod overlay;

pub use cell::SnapshotCell;
pub use overlay::TagOverlay;
