//! Catalog entry domain model.
//!
//! A [`CatalogEntry`] is one browsable item returned by the remote catalog. The
//! serialized form uses the catalog's own field names (`trackId`, `trackName`,
//! ...), which is also the layout persisted under the favorites-entries key, so
//! entries written by earlier sessions decode unchanged.

use serde::{Deserialize, Deserializer, Serialize};

/// One browsable item from the remote catalog.
///
/// Entries are immutable once fetched. The same `id` may show up in later result
/// sets with different field values; no reconciliation is attempted.
///
/// `is_favorite` is a snapshot taken when the entry was placed into the search
/// results. Use `CatalogState::is_favorite` for the live answer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogEntry {
    #[serde(rename = "trackId")]
    pub id: i64,

    #[serde(rename = "trackName", default)]
    pub name: String,

    #[serde(rename = "artworkUrl100", default)]
    pub artwork_url: String,

    /// Display price such as `"Free"` or `"$2.99"`.
    #[serde(
        rename = "formattedPrice",
        default,
        deserialize_with = "deserialize_price"
    )]
    pub price: String,

    #[serde(rename = "primaryGenreName", default)]
    pub category: String,

    #[serde(default)]
    pub description: String,

    #[serde(default)]
    pub is_favorite: bool,
}

impl CatalogEntry {
    /// Creates an entry with the given id and name and every other field empty.
    ///
    /// # Examples
    ///
    /// ```
    /// use catalog_browser::CatalogEntry;
    ///
    /// let entry = CatalogEntry::new(1, "App A");
    /// assert_eq!(entry.id, 1);
    /// assert!(entry.artwork_url.is_empty());
    /// assert!(!entry.is_favorite);
    /// ```
    #[must_use]
    pub fn new(id: i64, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            artwork_url: String::new(),
            price: String::new(),
            category: String::new(),
            description: String::new(),
            is_favorite: false,
        }
    }

    /// Returns a copy of this entry with the favorite snapshot set to `is_favorite`.
    #[must_use]
    pub fn with_favorite(mut self, is_favorite: bool) -> Self {
        self.is_favorite = is_favorite;
        self
    }
}

/// The catalog reports `formattedPrice` as text, older payloads as a bare number.
fn deserialize_price<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(serde_json::Value::String(s)) => s,
        Some(serde_json::Value::Number(n)) => n.to_string(),
        Some(serde_json::Value::Bool(b)) => b.to_string(),
        _ => String::new(),
    })
}
