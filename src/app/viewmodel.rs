//! Read model computed from `CatalogState` for the presentation layer.
//!
//! View models are plain data: the presentation layer renders them and never
//! reaches back into the state. Favorite markers here are computed from the live
//! favorite set, not from the snapshot flag carried inside the search results.

use super::modes::{LoadStatus, ViewMode};

/// Complete renderable snapshot of the catalog screen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogViewModel {
    /// Current layout.
    pub view_mode: ViewMode,

    /// Columns the rows are laid out in (1 for list, 2 for grid).
    pub columns: usize,

    /// Label of the button that switches layout, e.g. "Toggle Grid View".
    pub toggle_label: String,

    /// One row per search result, in result order.
    pub rows: Vec<EntryRow>,

    /// Favorites strip, in favorite order. Empty means the strip is hidden.
    pub favorites: Vec<FavoriteChip>,

    /// What to show in place of (or above) the rows.
    pub status: StatusLine,

    /// Relative last-visited label, e.g. "Last visited: 5m ago".
    pub last_visited: String,
}

/// A search result as displayed in the list or grid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryRow {
    pub id: i64,
    pub name: String,
    pub category: String,
    pub price: String,
    pub artwork_url: String,
    pub is_favorite: bool,
}

/// A favorite as displayed in the horizontal strip.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FavoriteChip {
    pub id: i64,
    pub name: String,
    pub artwork_url: String,
}

/// Status area content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StatusLine {
    /// Spinner.
    Loading,

    /// Error message from the last failed search.
    Error(String),

    /// Search finished with nothing to show.
    Empty,

    /// Rows are available.
    Ready,
}

impl StatusLine {
    /// Maps the load status plus result count to what the screen shows.
    ///
    /// Loading wins over error, and error wins over empty results.
    #[must_use]
    pub fn from_status(status: &LoadStatus, result_count: usize) -> Self {
        match status {
            LoadStatus::Loading => Self::Loading,
            LoadStatus::Error(message) => Self::Error(message.clone()),
            LoadStatus::Idle if result_count == 0 => Self::Empty,
            LoadStatus::Idle => Self::Ready,
        }
    }
}
