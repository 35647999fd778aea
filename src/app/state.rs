//! Catalog state container and its transitions.
//!
//! This module defines [`CatalogState`], the single source of truth for search
//! results, favorites, layout and the last-visited marker. Every transition is a
//! synchronous method; the event handler calls them and turns their outcome into
//! side-effect actions.
//!
//! # Favorites
//!
//! Favorites are kept twice: as ids (membership and display order) and as cached
//! full entries, so a favorite stays viewable after the search results move on.
//! Both sequences are private and only modified together, which keeps them in
//! one-to-one correspondence.
//!
//! # Example
//!
//! ```rust
//! use catalog_browser::{CatalogEntry, CatalogState};
//!
//! let mut state = CatalogState::default();
//! let generation = state.begin_search();
//! state.finish_search(generation, Ok(vec![CatalogEntry::new(1, "App A")]), false);
//!
//! state.toggle_favorite(1);
//! assert!(state.is_favorite(1));
//! assert_eq!(state.favorite_entries()[0].name, "App A");
//! ```

use super::modes::{LoadStatus, ViewMode};
use super::viewmodel::{CatalogViewModel, EntryRow, FavoriteChip, StatusLine};
use crate::domain::{time_ago, CatalogEntry};
use chrono::{DateTime, Utc};
use std::collections::{HashMap, HashSet};

/// Message recorded when a search fails without a description of its own.
pub const FALLBACK_SEARCH_ERROR: &str = "Failed to fetch catalog";

/// Outcome of [`CatalogState::toggle_favorite`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FavoriteChange {
    /// The entry was found in the results and favorited.
    Added,
    /// The favorite was removed.
    Removed,
    /// The id was neither favorited nor present in the results.
    Unchanged,
}

impl FavoriteChange {
    #[must_use]
    pub const fn is_change(self) -> bool {
        !matches!(self, Self::Unchanged)
    }
}

/// Outcome of [`CatalogState::finish_search`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchApplied {
    /// The results were replaced.
    Results,
    /// The failure was recorded in `last_error`.
    Failure,
    /// A newer search had already been applied; only loading bookkeeping ran.
    Stale,
}

/// Central catalog state container.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogState {
    /// Current search results, replaced wholesale on each successful fetch.
    ///
    /// Each entry's `is_favorite` was computed when the results arrived and is
    /// not updated by later toggles.
    pub results: Vec<CatalogEntry>,

    favorite_ids: Vec<i64>,
    favorite_entries: Vec<CatalogEntry>,

    /// Current layout. Not persisted.
    pub view_mode: ViewMode,

    /// Last time the app was opened.
    pub last_visited_at: DateTime<Utc>,

    /// True while at least one search is outstanding.
    pub is_loading: bool,

    /// Message of the last failed search, cleared when a new search starts.
    pub last_error: Option<String>,

    /// Number of searches issued but not yet completed.
    pub pending_searches: usize,

    /// Generation handed to the most recently issued search.
    pub search_generation: u64,

    /// Generation of the search whose results are currently shown (0 = none).
    pub applied_generation: u64,

    /// Newest generation whose completion was applied, success or failure.
    pub completed_generation: u64,

    /// Set once persisted values have been applied.
    pub hydrated: bool,
}

impl Default for CatalogState {
    fn default() -> Self {
        Self::new(Utc::now())
    }
}

impl CatalogState {
    /// Creates an empty, idle state with `last_visited_at` set to `now`.
    #[must_use]
    pub fn new(now: DateTime<Utc>) -> Self {
        Self {
            results: Vec::new(),
            favorite_ids: Vec::new(),
            favorite_entries: Vec::new(),
            view_mode: ViewMode::default(),
            last_visited_at: now,
            is_loading: false,
            last_error: None,
            pending_searches: 0,
            search_generation: 0,
            applied_generation: 0,
            completed_generation: 0,
            hydrated: false,
        }
    }

    /// Favorited ids in display order.
    #[must_use]
    pub fn favorite_ids(&self) -> &[i64] {
        &self.favorite_ids
    }

    /// Cached favorite entries, parallel to [`favorite_ids`](Self::favorite_ids).
    #[must_use]
    pub fn favorite_entries(&self) -> &[CatalogEntry] {
        &self.favorite_entries
    }

    /// Live favorite status of `id`.
    #[must_use]
    pub fn is_favorite(&self, id: i64) -> bool {
        self.favorite_ids.contains(&id)
    }

    /// Looks up an entry by id, preferring current results over cached favorites.
    #[must_use]
    pub fn entry(&self, id: i64) -> Option<&CatalogEntry> {
        self.results
            .iter()
            .find(|e| e.id == id)
            .or_else(|| self.favorite_entries.iter().find(|e| e.id == id))
    }

    /// Derived search lifecycle.
    #[must_use]
    pub fn load_status(&self) -> LoadStatus {
        if self.is_loading {
            LoadStatus::Loading
        } else if let Some(message) = &self.last_error {
            LoadStatus::Error(message.clone())
        } else {
            LoadStatus::Idle
        }
    }

    /// Returns true when ids and cached entries correspond one-to-one.
    #[must_use]
    pub fn favorites_consistent(&self) -> bool {
        let ids: HashSet<i64> = self.favorite_ids.iter().copied().collect();
        let entry_ids: HashSet<i64> = self.favorite_entries.iter().map(|e| e.id).collect();
        ids.len() == self.favorite_ids.len()
            && entry_ids.len() == self.favorite_entries.len()
            && ids == entry_ids
    }

    /// Marks a search as started and returns its generation.
    ///
    /// Sets loading and clears the previous error. Must run before the fetch is
    /// spawned so that pending state is observable before any completion.
    pub fn begin_search(&mut self) -> u64 {
        self.search_generation += 1;
        self.pending_searches += 1;
        self.is_loading = true;
        self.last_error = None;
        self.search_generation
    }

    /// Applies the completion of the search started with `generation`.
    ///
    /// On success the results are replaced, each entry annotated against the
    /// favorites as they are now. On failure `last_error` is set and the results
    /// are left alone. With `discard_stale` set, a completion older than one
    /// already applied (success or failure) is dropped together with its error;
    /// otherwise the last completion wins.
    pub fn finish_search(
        &mut self,
        generation: u64,
        outcome: Result<Vec<CatalogEntry>, String>,
        discard_stale: bool,
    ) -> SearchApplied {
        self.pending_searches = self.pending_searches.saturating_sub(1);
        self.is_loading = self.pending_searches > 0;

        if discard_stale && generation < self.completed_generation {
            tracing::debug!(
                generation = generation,
                completed_generation = self.completed_generation,
                "dropping stale search completion"
            );
            return SearchApplied::Stale;
        }
        self.completed_generation = self.completed_generation.max(generation);

        match outcome {
            Ok(entries) => {
                self.results = entries
                    .into_iter()
                    .map(|entry| {
                        let is_favorite = self.is_favorite(entry.id);
                        entry.with_favorite(is_favorite)
                    })
                    .collect();
                self.applied_generation = generation;
                SearchApplied::Results
            }
            Err(message) => {
                self.last_error = Some(if message.trim().is_empty() {
                    FALLBACK_SEARCH_ERROR.to_string()
                } else {
                    message
                });
                SearchApplied::Failure
            }
        }
    }

    /// Adds or removes `id` from the favorites.
    ///
    /// Adding requires the entry to be present in the current results; an id that
    /// is neither favorited nor in the results leaves the state untouched.
    pub fn toggle_favorite(&mut self, id: i64) -> FavoriteChange {
        if let Some(index) = self.favorite_ids.iter().position(|&f| f == id) {
            self.favorite_ids.remove(index);
            self.favorite_entries.retain(|e| e.id != id);
            return FavoriteChange::Removed;
        }

        let Some(entry) = self.results.iter().find(|e| e.id == id) else {
            tracing::debug!(id = id, "favorite target not in results, skipping");
            return FavoriteChange::Unchanged;
        };

        let entry = entry.clone();
        self.favorite_ids.push(id);
        self.favorite_entries.push(entry);
        FavoriteChange::Added
    }

    /// Flips between list and grid layout.
    pub fn toggle_view_mode(&mut self) {
        self.view_mode = self.view_mode.toggled();
    }

    /// Records `now` as the last visit.
    pub fn touch_last_visited(&mut self, now: DateTime<Utc>) {
        self.last_visited_at = now;
    }

    /// Replaces favorites and the last-visited marker with persisted values.
    ///
    /// Absent values default to empty favorites and `now`. The favorite set
    /// becomes the persisted ids that have a cached entry, in id order; anything
    /// unmatched on either side is dropped so ids and entries stay paired.
    /// Favorites toggled before this runs are replaced, not merged.
    pub fn apply_hydration(
        &mut self,
        favorite_ids: Option<Vec<i64>>,
        favorite_entries: Option<Vec<CatalogEntry>>,
        last_visited_at: Option<DateTime<Utc>>,
        now: DateTime<Utc>,
    ) {
        let ids = favorite_ids.unwrap_or_default();
        let entries = favorite_entries.unwrap_or_default();
        let stored_ids = ids.len();
        let stored_entries = entries.len();

        let mut by_id: HashMap<i64, CatalogEntry> = HashMap::with_capacity(entries.len());
        for entry in entries {
            by_id.entry(entry.id).or_insert(entry);
        }

        self.favorite_ids.clear();
        self.favorite_entries.clear();
        for id in ids {
            if let Some(entry) = by_id.remove(&id) {
                self.favorite_ids.push(id);
                self.favorite_entries.push(entry);
            }
        }

        if self.favorite_ids.len() != stored_ids || self.favorite_entries.len() != stored_entries {
            tracing::warn!(
                stored_ids = stored_ids,
                stored_entries = stored_entries,
                kept = self.favorite_ids.len(),
                "persisted favorites were inconsistent, kept matching pairs"
            );
        }

        self.last_visited_at = last_visited_at.unwrap_or(now);
        self.hydrated = true;
    }

    /// Computes the renderable read model.
    ///
    /// `now` is used for the relative last-visited label.
    #[must_use]
    pub fn compute_viewmodel(&self, now: DateTime<Utc>) -> CatalogViewModel {
        let rows = self
            .results
            .iter()
            .map(|entry| EntryRow {
                id: entry.id,
                name: entry.name.clone(),
                category: entry.category.clone(),
                price: entry.price.clone(),
                artwork_url: entry.artwork_url.clone(),
                is_favorite: self.is_favorite(entry.id),
            })
            .collect();

        let favorites = self
            .favorite_entries
            .iter()
            .map(|entry| FavoriteChip {
                id: entry.id,
                name: entry.name.clone(),
                artwork_url: entry.artwork_url.clone(),
            })
            .collect();

        let toggle_label = match self.view_mode {
            ViewMode::List => "Toggle Grid View",
            ViewMode::Grid => "Toggle List View",
        };

        CatalogViewModel {
            view_mode: self.view_mode,
            columns: self.view_mode.columns(),
            toggle_label: toggle_label.to_string(),
            rows,
            favorites,
            status: StatusLine::from_status(&self.load_status(), self.results.len()),
            last_visited: format!("Last visited: {}", time_ago(self.last_visited_at, now)),
        }
    }
}
