//! Dictionary use-case facade.
//!
//! # Responsibility
//! - Join the record table with the four tag overlays into decorated cards.
//! - Apply listing filters (category, popularity, text search, visibility).
//! - Expose the per-overlay mutate operations with their fixed vocabulary.
//!
//! # Invariants
//! - Blacklisted and not-interested records are excluded from listings
//!   unless the query opts in.
//! - Removing a record never edits overlays; dangling overlay ids are
//!   skipped during joins.
//! - Hide/restore and block/unblock are idempotent and skip storage writes
//!   when membership is already in the requested state.

use std::error::Error;
use std::fmt::{Display, Formatter};

use crate::db::keys;
use crate::db::kv::KvStore;
use crate::db::snapshot::SnapshotError;
use crate::model::meme::{Meme, MemeId, NewMeme};
use crate::repo::meme_repo::{MemeTable, RepoError};
use crate::store::overlay::TagOverlay;

pub type ServiceResult<T> = Result<T, ServiceError>;

/// Service error for dictionary use-cases.
#[derive(Debug)]
pub enum ServiceError {
    /// Record-table failure (validation, storage, corrupt snapshot).
    Repo(RepoError),
    /// Overlay snapshot failure.
    Snapshot(SnapshotError),
}

impl Display for ServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Repo(err) => write!(f, "{err}"),
            Self::Snapshot(err) => write!(f, "{err}"),
        }
    }
}

impl Error for ServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Repo(err) => Some(err),
            Self::Snapshot(err) => Some(err),
        }
    }
}

impl From<RepoError> for ServiceError {
    fn from(value: RepoError) -> Self {
        Self::Repo(value)
    }
}

impl From<SnapshotError> for ServiceError {
    fn from(value: SnapshotError) -> Self {
        Self::Snapshot(value)
    }
}

/// A record decorated with its overlay membership flags.
#[derive(Debug, Clone, PartialEq)]
pub struct MemeCard {
    pub meme: Meme,
    pub favorite: bool,
    pub liked: bool,
    /// Member of the not-interested overlay.
    pub hidden: bool,
    /// Member of the blacklist overlay.
    pub blocked: bool,
}

/// Query options for dictionary listings.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MemeListQuery {
    /// Optional single-category exact match (case-insensitive).
    pub category: Option<String>,
    /// Only records flagged as hot.
    pub hot_only: bool,
    /// Case-insensitive substring match on the term.
    pub text: Option<String>,
    /// Include blacklisted and not-interested records in the result.
    pub include_hidden: bool,
}

/// Dictionary facade over the record table and the four overlays.
pub struct DictionaryService<S: KvStore + Clone> {
    table: MemeTable<S>,
    favorites: TagOverlay<S>,
    likes: TagOverlay<S>,
    blacklist: TagOverlay<S>,
    not_interested: TagOverlay<S>,
}

impl<S: KvStore + Clone> DictionaryService<S> {
    /// Opens the service: overlays load eagerly, the table lazily.
    pub fn open(storage: S) -> ServiceResult<Self> {
        let favorites = TagOverlay::open(storage.clone(), keys::FAVORITES)?;
        let likes = TagOverlay::open(storage.clone(), keys::LIKES)?;
        let blacklist = TagOverlay::open(storage.clone(), keys::BLACKLIST)?;
        let not_interested = TagOverlay::open(storage.clone(), keys::NOT_INTERESTED)?;
        Ok(Self {
            table: MemeTable::new(storage),
            favorites,
            likes,
            blacklist,
            not_interested,
        })
    }

    /// Lists decorated records matching `query`, in table order.
    pub fn list_cards(&mut self, query: &MemeListQuery) -> ServiceResult<Vec<MemeCard>> {
        let memes = self.table.list_all()?;
        let category = query.category.as_ref().map(|value| value.to_lowercase());
        let text = query.text.as_ref().map(|value| value.to_lowercase());

        let mut cards = Vec::new();
        for meme in memes {
            if !query.include_hidden
                && (self.blacklist.contains(meme.id) || self.not_interested.contains(meme.id))
            {
                continue;
            }
            if query.hot_only && !meme.is_hot {
                continue;
            }
            if let Some(category) = category.as_deref() {
                let matches = meme
                    .category
                    .iter()
                    .any(|label| label.to_lowercase() == category);
                if !matches {
                    continue;
                }
            }
            if let Some(text) = text.as_deref() {
                if !meme.term.to_lowercase().contains(text) {
                    continue;
                }
            }
            cards.push(self.decorate(meme));
        }
        Ok(cards)
    }

    /// Looks up one decorated record. Unknown ids resolve to `Ok(None)`.
    pub fn card(&mut self, id: MemeId) -> ServiceResult<Option<MemeCard>> {
        let meme = self.table.get_by_id(id)?;
        Ok(meme.map(|meme| self.decorate(meme)))
    }

    /// Adds a record through table validation and returns the stored form.
    pub fn add_meme(&mut self, new: &NewMeme) -> ServiceResult<Meme> {
        Ok(self.table.add(new)?)
    }

    /// Removes a record. Overlay entries referencing the id are left in
    /// place and simply stop resolving.
    pub fn remove_meme(&mut self, id: MemeId) -> ServiceResult<()> {
        Ok(self.table.remove(id)?)
    }

    /// Flips favorite membership for `id`.
    pub fn toggle_favorite(&mut self, id: MemeId) -> ServiceResult<()> {
        Ok(self.favorites.toggle(id)?)
    }

    /// Flips like membership for `id`.
    pub fn toggle_like(&mut self, id: MemeId) -> ServiceResult<()> {
        Ok(self.likes.toggle(id)?)
    }

    /// Marks `id` as not interested. Already-hidden ids are a no-op.
    pub fn hide(&mut self, id: MemeId) -> ServiceResult<()> {
        Ok(self.not_interested.insert(id)?)
    }

    /// Clears the not-interested mark for `id`. Absent ids are a no-op.
    pub fn restore(&mut self, id: MemeId) -> ServiceResult<()> {
        Ok(self.not_interested.remove(id)?)
    }

    /// Adds `id` to the blacklist. Already-blocked ids are a no-op.
    pub fn block(&mut self, id: MemeId) -> ServiceResult<()> {
        Ok(self.blacklist.insert(id)?)
    }

    /// Removes `id` from the blacklist. Absent ids are a no-op.
    pub fn unblock(&mut self, id: MemeId) -> ServiceResult<()> {
        Ok(self.blacklist.remove(id)?)
    }

    /// Favorited records in overlay insertion order.
    ///
    /// Ids without a matching record are skipped.
    pub fn list_favorites(&mut self) -> ServiceResult<Vec<MemeCard>> {
        let ids: Vec<MemeId> = self.favorites.ids().to_vec();
        let mut cards = Vec::new();
        for id in ids {
            if let Some(meme) = self.table.get_by_id(id)? {
                cards.push(self.decorate(meme));
            }
        }
        Ok(cards)
    }

    /// Distinct category labels across the table, sorted.
    pub fn categories(&mut self) -> ServiceResult<Vec<String>> {
        let memes = self.table.list_all()?;
        let mut labels: Vec<String> = memes
            .into_iter()
            .flat_map(|meme| meme.category)
            .collect();
        labels.sort();
        labels.dedup();
        Ok(labels)
    }

    pub fn favorites(&self) -> &TagOverlay<S> {
        &self.favorites
    }

    pub fn likes(&self) -> &TagOverlay<S> {
        &self.likes
    }

    pub fn blacklist(&self) -> &TagOverlay<S> {
        &self.blacklist
    }

    pub fn not_interested(&self) -> &TagOverlay<S> {
        &self.not_interested
    }

    fn decorate(&self, meme: Meme) -> MemeCard {
        let id = meme.id;
        MemeCard {
            favorite: self.favorites.contains(id),
            liked: self.likes.contains(id),
            hidden: self.not_interested.contains(id),
            blocked: self.blacklist.contains(id),
            meme,
        }
    }
}
