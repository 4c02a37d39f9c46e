//! Factory dataset embedded in the binary.

use crate::model::meme::Meme;

const DEFAULT_MEMES_JSON: &str = include_str!("default_memes.json");

/// Decodes the bundled factory dataset.
///
/// The embedded JSON goes through the same tolerant deserializer as
/// persisted snapshots; a malformed bundle is reported as an error.
pub fn default_memes() -> Result<Vec<Meme>, serde_json::Error> {
    serde_json::from_str(DEFAULT_MEMES_JSON)
}
