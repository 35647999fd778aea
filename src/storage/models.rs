//! Persisted key layout and value encoding.
//!
//! The store keeps three independent values, each a JSON document stored as a
//! string under a fixed key. The key names match the layout written by earlier
//! releases of the app, so existing favorites survive an upgrade.

use crate::domain::error::Result;
use serde::de::DeserializeOwned;
use serde::Serialize;

/// Fixed logical keys persisted by the catalog store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StorageKey {
    /// JSON array of favorited entry ids, in display order.
    FavoriteIds,

    /// JSON array of the cached favorite entries, parallel to `FavoriteIds`.
    FavoriteEntries,

    /// JSON string holding the ISO-8601 last-visited timestamp.
    LastVisited,
}

impl StorageKey {
    /// Returns the key under which the value is stored.
    ///
    /// # Examples
    ///
    /// ```
    /// use catalog_browser::storage::StorageKey;
    ///
    /// assert_eq!(StorageKey::FavoriteEntries.as_str(), "favoritesData");
    /// ```
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::FavoriteIds => "favorites",
            Self::FavoriteEntries => "favoritesData",
            Self::LastVisited => "lastVisited",
        }
    }
}

impl std::fmt::Display for StorageKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Encodes a value as the JSON text stored under a key.
///
/// # Errors
///
/// Returns an error if the value cannot be serialized.
pub fn encode<T: Serialize + ?Sized>(value: &T) -> Result<String> {
    Ok(serde_json::to_string(value)?)
}

/// Decodes the JSON text stored under a key.
///
/// # Errors
///
/// Returns an error if the text is not valid JSON for `T`.
pub fn decode<T: DeserializeOwned>(raw: &str) -> Result<T> {
    Ok(serde_json::from_str(raw)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, Utc};

    #[test]
    fn timestamps_are_stored_as_quoted_iso_strings() {
        let at: DateTime<Utc> = "2024-05-01T10:20:30Z".parse().unwrap();
        let raw = encode(&at).unwrap();
        assert_eq!(raw, "\"2024-05-01T10:20:30Z\"");

        let back: DateTime<Utc> = decode(&raw).unwrap();
        assert_eq!(back, at);
    }

    #[test]
    fn decode_rejects_mismatched_shapes() {
        assert!(decode::<Vec<i64>>("{\"a\": 1}").is_err());
    }
}
