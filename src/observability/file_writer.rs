//! Rotating file writer with size-based rotation and backup retention.
//!
//! This module provides a thread-safe file writer that automatically rotates
//! the log file when it exceeds a size threshold, maintaining a fixed number
//! of backups. It plugs into `tracing-subscriber` as a [`MakeWriter`].

use std::fs::{self, File, OpenOptions};
use std::io::{self, Write};
use std::path::PathBuf;
use std::sync::{Mutex, MutexGuard};
use tracing_subscriber::fmt::MakeWriter;

/// Maximum file size before rotation (10 MB).
const MAX_FILE_SIZE_BYTES: u64 = 10 * 1024 * 1024;

/// Number of backup files to retain after rotation.
const MAX_BACKUP_FILES: usize = 3;

/// Thread-safe rotating file writer.
///
/// When the current file exceeds the size limit it is renamed to
/// `<name>.<unix_millis>` and a fresh file is started. Backups beyond the
/// retention limit are removed, newest kept.
///
/// # Example
///
/// ```rust,no_run
/// use catalog_browser::observability::FileWriter;
/// use std::path::PathBuf;
///
/// let writer = FileWriter::new(PathBuf::from("/tmp/catalog-browser.log"));
/// writer.write_line("started").unwrap();
/// ```
pub struct FileWriter {
    file_path: PathBuf,
    max_bytes: u64,
    max_backups: usize,
    /// Lazily-opened file handle.
    writer: Mutex<Option<File>>,
}

impl FileWriter {
    /// Creates a writer with the default limits (10 MB, 3 backups).
    ///
    /// The file is not opened until the first write.
    #[must_use]
    pub const fn new(file_path: PathBuf) -> Self {
        Self::with_limits(file_path, MAX_FILE_SIZE_BYTES, MAX_BACKUP_FILES)
    }

    #[must_use]
    pub const fn with_limits(file_path: PathBuf, max_bytes: u64, max_backups: usize) -> Self {
        Self {
            file_path,
            max_bytes,
            max_backups,
            writer: Mutex::new(None),
        }
    }

    /// Writes `line` followed by a newline.
    ///
    /// # Errors
    ///
    /// Returns an error if rotating, opening or writing the file fails.
    pub fn write_line(&self, line: &str) -> io::Result<()> {
        let mut buf = Vec::with_capacity(line.len() + 1);
        buf.extend_from_slice(line.as_bytes());
        buf.push(b'\n');
        self.write_bytes(&buf)
    }

    /// Writes raw bytes, rotating first if the file is over the limit.
    fn write_bytes(&self, buf: &[u8]) -> io::Result<()> {
        let mut writer = self.lock()?;

        self.check_and_rotate(&mut writer)?;

        if writer.is_none() {
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(&self.file_path)?;
            *writer = Some(file);
        }

        let file = writer
            .as_mut()
            .ok_or_else(|| io::Error::new(io::ErrorKind::Other, "No file available"))?;

        file.write_all(buf)?;
        file.flush()
    }

    fn lock(&self) -> io::Result<MutexGuard<'_, Option<File>>> {
        self.writer
            .lock()
            .map_err(|e| io::Error::new(io::ErrorKind::Other, format!("Mutex poisoned: {e}")))
    }

    fn check_and_rotate(&self, writer: &mut Option<File>) -> io::Result<()> {
        if let Ok(metadata) = fs::metadata(&self.file_path) {
            if metadata.len() > self.max_bytes {
                *writer = None;
                self.rotate_files()?;
            }
        }
        Ok(())
    }

    fn rotate_files(&self) -> io::Result<()> {
        let timestamp = chrono::Utc::now().timestamp_millis();
        let backup_path = PathBuf::from(format!("{}.{timestamp}", self.file_path.display()));

        if self.file_path.exists() {
            fs::rename(&self.file_path, &backup_path)?;
        }

        self.cleanup_old_backups()
    }

    /// Removes backups beyond the retention limit, newest kept.
    ///
    /// Individual deletion errors are ignored.
    fn cleanup_old_backups(&self) -> io::Result<()> {
        let parent_dir = self
            .file_path
            .parent()
            .ok_or_else(|| io::Error::new(io::ErrorKind::Other, "No parent directory"))?;

        let file_name = self
            .file_path
            .file_name()
            .and_then(|s| s.to_str())
            .ok_or_else(|| io::Error::new(io::ErrorKind::Other, "Invalid file name"))?;
        let backup_prefix = format!("{file_name}.");

        let mut backups: Vec<PathBuf> = fs::read_dir(parent_dir)?
            .filter_map(Result::ok)
            .map(|entry| entry.path())
            .filter(|path| {
                path.file_name()
                    .and_then(|name| name.to_str())
                    .is_some_and(|name| name.starts_with(&backup_prefix))
            })
            .collect();

        // names end in a millisecond timestamp, so this sorts newest first
        backups.sort_by(|a, b| b.cmp(a));

        for old_backup in backups.iter().skip(self.max_backups) {
            let _ = fs::remove_file(old_backup);
        }

        Ok(())
    }
}

impl std::fmt::Debug for FileWriter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FileWriter")
            .field("file_path", &self.file_path)
            .field("max_bytes", &self.max_bytes)
            .field("max_backups", &self.max_backups)
            .finish_non_exhaustive()
    }
}

/// Per-event handle handed to the fmt layer.
#[derive(Debug)]
pub struct FileWriterHandle<'a> {
    inner: &'a FileWriter,
}

impl Write for FileWriterHandle<'_> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.inner.write_bytes(buf)?;
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl<'a> MakeWriter<'a> for FileWriter {
    type Writer = FileWriterHandle<'a>;

    fn make_writer(&'a self) -> Self::Writer {
        FileWriterHandle { inner: self }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn backups_in(dir: &std::path::Path) -> usize {
        fs::read_dir(dir)
            .unwrap()
            .filter_map(Result::ok)
            .filter(|e| e.file_name().to_string_lossy().starts_with("app.log."))
            .count()
    }

    #[test]
    fn lines_are_appended() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("app.log");
        let writer = FileWriter::new(path.clone());

        writer.write_line("first").unwrap();
        writer.write_line("second").unwrap();

        assert_eq!(fs::read_to_string(path).unwrap(), "first\nsecond\n");
    }

    #[test]
    fn oversized_file_is_rotated_and_backups_capped() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("app.log");
        let writer = FileWriter::with_limits(path.clone(), 8, 2);

        for i in 0..6 {
            writer.write_line(&format!("line number {i}")).unwrap();
            std::thread::sleep(std::time::Duration::from_millis(2));
        }

        assert_eq!(fs::read_to_string(&path).unwrap(), "line number 5\n");
        assert_eq!(backups_in(dir.path()), 2);
    }

    #[test]
    fn make_writer_handle_writes_through() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("app.log");
        let writer = FileWriter::new(path.clone());

        let mut handle = writer.make_writer();
        handle.write_all(b"event\n").unwrap();

        assert_eq!(fs::read_to_string(path).unwrap(), "event\n");
    }
}
