//! Path resolution for configuration, storage and log files.
//!
//! Locations follow the platform conventions exposed by `dirs`, with an
//! explicit `storage.data_dir` taking precedence. Tilde-prefixed paths in the
//! configuration are expanded against the user's home directory.

use std::path::{Path, PathBuf};

/// Directory name used under the platform config and data directories.
pub const APP_DIR_NAME: &str = "catalog-browser";

/// File holding the persisted key-value data.
pub const STORE_FILE_NAME: &str = "store.json";

/// Log file written by the tracing subscriber.
pub const LOG_FILE_NAME: &str = "catalog-browser.log";

/// Configuration file name.
pub const CONFIG_FILE_NAME: &str = "catalog-browser.toml";

/// Returns the data directory for storage and logs.
///
/// Resolution order:
/// 1. `configured` (after tilde expansion)
/// 2. `<platform data dir>/catalog-browser`
/// 3. `./.catalog-browser` when the platform has no data directory
///
/// # Examples
///
/// ```
/// use catalog_browser::infrastructure::data_dir;
/// use std::path::{Path, PathBuf};
///
/// let dir = data_dir(Some(Path::new("/var/lib/catalog")));
/// assert_eq!(dir, PathBuf::from("/var/lib/catalog"));
/// ```
#[must_use]
pub fn data_dir(configured: Option<&Path>) -> PathBuf {
    if let Some(path) = configured {
        return expand_tilde(path);
    }

    dirs::data_dir().map_or_else(
        || PathBuf::from(format!(".{APP_DIR_NAME}")),
        |dir| dir.join(APP_DIR_NAME),
    )
}

/// Path of the JSON store file inside `data_dir`.
#[must_use]
pub fn store_file(data_dir: &Path) -> PathBuf {
    data_dir.join(STORE_FILE_NAME)
}

/// Path of the log file inside `data_dir`.
#[must_use]
pub fn log_file(data_dir: &Path) -> PathBuf {
    data_dir.join(LOG_FILE_NAME)
}

/// Default configuration file location, if the platform has a config directory.
#[must_use]
pub fn config_file() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join(APP_DIR_NAME).join(CONFIG_FILE_NAME))
}

/// Expands a leading `~` to the user's home directory.
///
/// Paths without a leading tilde, or when no home directory is known, are
/// returned unchanged.
///
/// # Examples
///
/// ```
/// use catalog_browser::infrastructure::expand_tilde;
/// use std::path::{Path, PathBuf};
///
/// assert_eq!(expand_tilde(Path::new("/absolute/path")), PathBuf::from("/absolute/path"));
/// ```
#[must_use]
pub fn expand_tilde(path: &Path) -> PathBuf {
    let Ok(rest) = path.strip_prefix("~") else {
        return path.to_path_buf();
    };

    dirs::home_dir().map_or_else(|| path.to_path_buf(), |home| home.join(rest))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn configured_dir_wins() {
        let dir = data_dir(Some(Path::new("/tmp/catalog")));
        assert_eq!(dir, PathBuf::from("/tmp/catalog"));
        assert_eq!(store_file(&dir), PathBuf::from("/tmp/catalog/store.json"));
        assert_eq!(log_file(&dir), PathBuf::from("/tmp/catalog/catalog-browser.log"));
    }

    #[test]
    fn default_dir_is_named_after_the_app() {
        let dir = data_dir(None);
        assert!(dir.ends_with("catalog-browser") || dir.ends_with(".catalog-browser"));
    }

    #[test]
    fn tilde_expands_to_home() {
        let Some(home) = dirs::home_dir() else {
            return;
        };
        assert_eq!(expand_tilde(Path::new("~/data")), home.join("data"));
        assert_eq!(expand_tilde(Path::new("~")), home);
    }

    #[test]
    fn tilde_in_the_middle_is_left_alone() {
        assert_eq!(expand_tilde(Path::new("a/~/b")), PathBuf::from("a/~/b"));
        assert_eq!(expand_tilde(Path::new("~user/x")), PathBuf::from("~user/x"));
    }
}
