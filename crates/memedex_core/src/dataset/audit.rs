//! Offline curation checks for dictionary datasets.

use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashMap;

use crate::model::meme::{Meme, MemeId};

static NON_ALNUM_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[^\p{L}\p{N}]+").expect("valid alphanumeric filter regex"));

/// Entries whose terms collide after normalization.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DuplicateTermGroup {
    /// Normalized form shared by every member.
    pub normalized: String,
    /// `(id, original term)` pairs in table order.
    pub members: Vec<(MemeId, String)>,
}

/// Normalizes a term for duplicate comparison.
///
/// Lowercases the input and collapses every run of non-alphanumeric
/// characters (any script) to a single space, trimming the ends.
pub fn normalize_term(term: &str) -> String {
    let lowered = term.to_lowercase();
    NON_ALNUM_RE.replace_all(&lowered, " ").trim().to_string()
}

/// Reports groups of entries whose normalized terms collide.
///
/// Groups are ordered by first colliding entry and members keep table
/// order. Terms that normalize to the empty string are skipped.
pub fn duplicate_terms(memes: &[Meme]) -> Vec<DuplicateTermGroup> {
    let mut first_seen: Vec<String> = Vec::new();
    let mut by_normalized: HashMap<String, Vec<(MemeId, String)>> = HashMap::new();

    for meme in memes {
        let normalized = normalize_term(&meme.term);
        if normalized.is_empty() {
            continue;
        }
        let members = by_normalized.entry(normalized.clone()).or_default();
        if members.is_empty() {
            first_seen.push(normalized);
        }
        members.push((meme.id, meme.term.clone()));
    }

    first_seen
        .into_iter()
        .filter_map(|normalized| {
            let members = by_normalized.remove(&normalized)?;
            (members.len() > 1).then_some(DuplicateTermGroup {
                normalized,
                members,
            })
        })
        .collect()
}

/// Renumbers ids sequentially from 1 in current slice order.
///
/// Returns whether any id changed. This is a dataset-curation tool and
/// never touches persisted state: renumbering a live table would orphan
/// overlay references.
pub fn reassign_sequential_ids(memes: &mut [Meme]) -> bool {
    let mut changed = false;
    for (index, meme) in memes.iter_mut().enumerate() {
        let sequential = (index + 1) as MemeId;
        if meme.id != sequential {
            meme.id = sequential;
            changed = true;
        }
    }
    changed
}
