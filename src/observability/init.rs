//! Tracing initialization and subscriber setup.
//!
//! Configures a `tracing-subscriber` registry that filters by level and writes
//! formatted events to a rotating log file in the data directory.

use super::file_writer::FileWriter;
use crate::infrastructure::paths;
use crate::Config;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Level used when neither `RUST_LOG` nor `logging.level` is set.
const DEFAULT_LEVEL: &str = "info";

/// Initializes the tracing subscriber with file output.
///
/// # Level Resolution
///
/// 1. `RUST_LOG` environment variable
/// 2. `config.logging.level`
/// 3. Default: `"info"`
///
/// # File Location
///
/// Events are written to `catalog-browser.log` in the data directory (see
/// [`paths::data_dir`]), rotated at 10 MB with 3 backups.
///
/// # Initialization Behavior
///
/// - Creates the data directory if it doesn't exist
/// - Silently does nothing if the directory cannot be created (logging is optional)
/// - Idempotent: only the first call installs a subscriber
///
/// # Example
///
/// ```rust,no_run
/// use catalog_browser::observability::init_tracing;
/// use catalog_browser::Config;
///
/// init_tracing(&Config::default());
/// tracing::info!("tracing is now active");
/// ```
pub fn init_tracing(config: &Config) {
    let data_dir = paths::data_dir(config.storage.data_dir.as_deref());
    if std::fs::create_dir_all(&data_dir).is_err() {
        return;
    }

    let writer = FileWriter::new(paths::log_file(&data_dir));

    let fmt_layer = fmt::layer()
        .with_writer(writer)
        .with_ansi(false)
        .with_target(true);

    let _ = tracing_subscriber::registry()
        .with(env_filter(config))
        .with(fmt_layer)
        .try_init();
}

fn env_filter(config: &Config) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        let level = config.logging.level.as_deref().unwrap_or(DEFAULT_LEVEL);
        EnvFilter::try_new(level).unwrap_or_else(|_| EnvFilter::new(DEFAULT_LEVEL))
    })
}
