//! Storage keys for every persisted snapshot.
//!
//! One key per collection. Renaming a key orphans whatever users already
//! have persisted under it, so these strings are part of the on-device
//! contract; the table and favorites keys predate this crate and must stay
//! as-is for old snapshots to remain readable.

/// Canonical record table.
pub const MEME_TABLE: &str = "my_offline_memes_v2";

/// Favorites overlay.
pub const FAVORITES: &str = "my_favorite_memes";

/// Likes overlay.
pub const LIKES: &str = "my_liked_memes";

/// Blacklist overlay.
pub const BLACKLIST: &str = "my_blacklist_memes";

/// "Not interested" overlay.
pub const NOT_INTERESTED: &str = "my_not_interested_memes";
