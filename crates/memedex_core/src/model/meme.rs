//! Meme record model.
//!
//! # Responsibility
//! - Define the canonical record stored in the dictionary table.
//! - Decode legacy snapshot shapes (single-string `category`) into the
//!   current shape without touching anything else in the entry.
//! - Provide the validated request model for adding new records.
//!
//! # Invariants
//! - `id` is positive and unique within one table; the table assigns it.
//! - `is_hot` on a freshly added record is always `false`, no matter what
//!   the caller supplied.
//! - Fields outside the typed ones round-trip verbatim through `extra`.

use serde::de::{Deserializer, Error as _};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Stable identifier for one dictionary record.
///
/// Kept as a type alias to make semantic intent explicit in signatures.
pub type MemeId = u32;

/// Typed field names that callers must not smuggle in through `extra`.
const RESERVED_FIELDS: [&str; 4] = ["id", "term", "category", "isHot"];

/// Canonical dictionary record.
///
/// Only the fields the core reasons about are typed; everything else an
/// entry carries (definition text, usage examples, emoji, ...) lives in
/// `extra` and is copied through encode/decode verbatim.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Meme {
    /// Positive integer id assigned by the record table.
    pub id: MemeId,
    /// Display term. Expected unique across the table but not enforced;
    /// see `dataset::audit::duplicate_terms` for the report.
    pub term: String,
    /// Category labels. Legacy snapshots stored a single string here; the
    /// deserializer migrates that shape to a one-element list on load.
    #[serde(default, deserialize_with = "category_from_string_or_seq")]
    pub category: Vec<String>,
    /// Popularity flag. Serialized under its legacy snapshot name.
    #[serde(rename = "isHot", default)]
    pub is_hot: bool,
    /// Opaque descriptive payload, preserved exactly.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Meme {
    /// Builds a record from a validated add-request.
    ///
    /// # Contract
    /// - `id` comes from the table's max+1 rule; this constructor trusts it.
    /// - `is_hot` starts as `false` regardless of request payload.
    /// - The term is trimmed; categories are trimmed, blanks dropped and
    ///   duplicates removed keeping first occurrence.
    /// - Reserved keys in `extra` are discarded so the typed fields stay
    ///   the only source of truth for them.
    pub fn from_new(id: MemeId, new: &NewMeme) -> Self {
        let extra = new
            .extra
            .iter()
            .filter(|(key, _)| !RESERVED_FIELDS.contains(&key.as_str()))
            .map(|(key, value)| (key.clone(), value.clone()))
            .collect();

        Self {
            id,
            term: new.term.trim().to_string(),
            category: normalize_categories(&new.category),
            is_hot: false,
            extra,
        }
    }
}

/// Validation error for add-request input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MemeValidationError {
    /// Term is empty or whitespace-only.
    BlankTerm,
}

impl Display for MemeValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::BlankTerm => write!(f, "meme term must not be blank"),
        }
    }
}

impl Error for MemeValidationError {}

/// Request model for adding one record.
///
/// Deliberately carries no `id` and no popularity flag: the table assigns
/// the id and new records always start cold. Unknown payload fields are
/// accepted and stored as-is (minus the reserved names).
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct NewMeme {
    /// Display term; must not be blank.
    pub term: String,
    /// Category labels; tolerant of the legacy single-string shape.
    #[serde(default, deserialize_with = "category_from_string_or_seq")]
    pub category: Vec<String>,
    /// Free-form descriptive payload.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl NewMeme {
    /// Creates a request with an empty descriptive payload.
    pub fn new(term: impl Into<String>, category: Vec<String>) -> Self {
        Self {
            term: term.into(),
            category,
            extra: Map::new(),
        }
    }

    /// Checks request invariants before any table mutation.
    pub fn validate(&self) -> Result<(), MemeValidationError> {
        if self.term.trim().is_empty() {
            return Err(MemeValidationError::BlankTerm);
        }
        Ok(())
    }
}

/// Coerces a route/query parameter into a record id.
///
/// Ids cross the presentation boundary as strings. Returns `None` for
/// anything that is not a positive integer; callers treat that the same as
/// a lookup miss.
pub fn parse_meme_id(raw: &str) -> Option<MemeId> {
    match raw.trim().parse::<MemeId>() {
        Ok(0) => None,
        Ok(id) => Some(id),
        Err(_) => None,
    }
}

/// Normalizes category labels for the write path.
///
/// Load paths never call this: migrated legacy entries must stay unchanged
/// apart from the string-to-list shape conversion.
pub fn normalize_categories(categories: &[String]) -> Vec<String> {
    let mut normalized: Vec<String> = Vec::new();
    for label in categories {
        let trimmed = label.trim();
        if trimmed.is_empty() {
            continue;
        }
        if normalized.iter().any(|existing| existing == trimmed) {
            continue;
        }
        normalized.push(trimmed.to_string());
    }
    normalized
}

fn category_from_string_or_seq<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum CategoryField {
        Single(String),
        Many(Vec<String>),
    }

    match CategoryField::deserialize(deserializer) {
        Ok(CategoryField::Single(label)) => Ok(vec![label]),
        Ok(CategoryField::Many(labels)) => Ok(labels),
        Err(_) => Err(D::Error::custom(
            "category must be a string or an array of strings",
        )),
    }
}
