//! Error types for the catalog browser core.
//!
//! This module defines the centralized error type [`CatalogError`] and a type alias
//! [`Result`] for convenient error handling throughout the crate. All errors are
//! implemented using the `thiserror` crate for automatic `Error` trait implementation.
//!
//! Only search failures ever reach the presentation layer (through
//! `CatalogState::last_error`). Storage failures are logged and swallowed at the
//! boundary of the store.

use thiserror::Error;

/// The main error type for catalog browser operations.
///
/// # Examples
///
/// ```
/// use catalog_browser::CatalogError;
///
/// fn read_storage() -> Result<(), CatalogError> {
///     Err(CatalogError::Storage("failed to read file".to_string()))
/// }
///
/// assert_eq!(
///     read_storage().unwrap_err().to_string(),
///     "Storage error: failed to read file"
/// );
/// ```
#[derive(Debug, Error)]
pub enum CatalogError {
    /// The remote catalog answered, but not with something usable.
    ///
    /// The string is shown to the user verbatim, so it carries no prefix.
    #[error("{0}")]
    Search(String),

    /// HTTP transport failure while talking to the remote catalog.
    #[error("{0}")]
    Http(#[from] reqwest::Error),

    /// Storage operation failed.
    ///
    /// Occurs when reading from or writing to the key-value store fails.
    #[error("Storage error: {0}")]
    Storage(String),

    /// Filesystem or I/O operation failed.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// A persisted or received JSON document could not be encoded or decoded.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Configuration is invalid or missing.
    #[error("Configuration error: {0}")]
    Config(String),

    /// The store's event loop or storage worker is no longer running.
    #[error("Runtime error: {0}")]
    Runtime(String),
}

/// A specialized `Result` type for catalog browser operations.
pub type Result<T> = std::result::Result<T, CatalogError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn search_errors_display_without_prefix() {
        let err = CatalogError::Search("network error".to_string());
        assert_eq!(err.to_string(), "network error");
    }

    #[test]
    fn json_errors_convert_with_question_mark() {
        fn parse() -> Result<Vec<i64>> {
            Ok(serde_json::from_str("not json")?)
        }
        assert!(matches!(parse(), Err(CatalogError::Serialization(_))));
    }
}
