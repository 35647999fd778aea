//! Remote catalog search.
//!
//! The store talks to the remote catalog only through the [`SearchClient`] trait,
//! so tests and alternative catalogs can stand in for the real endpoint.
//!
//! # Modules
//!
//! - `itunes`: reqwest-based client for the iTunes Search API

pub mod itunes;

pub use itunes::ItunesClient;

use crate::domain::{CatalogEntry, Result};
use async_trait::async_trait;

/// Term used when the user has not typed anything.
///
/// A single permissive character keeps the first screen populated.
pub const DEFAULT_TERM: &str = "a";

/// Issues a textual query against a remote catalog.
///
/// Implementations are treated as unreliable and latency-unbounded: the store
/// imposes no timeout of its own.
#[async_trait]
pub trait SearchClient: Send + Sync {
    /// Returns the catalog entries matching `term`, in the catalog's order.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the response cannot be decoded.
    async fn search(&self, term: &str) -> Result<Vec<CatalogEntry>>;
}

/// Resolves the term actually sent to the catalog for a user query.
///
/// Blank queries (empty or whitespace only) fall back to `default_term`;
/// anything else is sent trimmed.
///
/// # Examples
///
/// ```
/// use catalog_browser::search::{effective_term, DEFAULT_TERM};
///
/// assert_eq!(effective_term("   ", DEFAULT_TERM), "a");
/// assert_eq!(effective_term(" maps ", DEFAULT_TERM), "maps");
/// ```
#[must_use]
pub fn effective_term(query: &str, default_term: &str) -> String {
    let trimmed = query.trim();
    if trimmed.is_empty() {
        default_term.to_string()
    } else {
        trimmed.to_string()
    }
}
