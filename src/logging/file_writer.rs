//! Daily log file setup and the console/file tee writer
//!
//! Creates the log directory, opens the day's file in append mode and duplicates
//! every rendered line to the console and that file.

use std::fs::{self, File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use chrono::{Local, NaiveDate};

use super::error::LogError;
use crate::config::Config;

/// Permission bits for the log directory
pub(crate) const DIR_MODE: u32 = 0o755;
/// Permission bits for a log file
pub(crate) const FILE_MODE: u32 = 0o644;

/// Today's date in local time
pub(crate) fn today() -> NaiveDate {
    Local::now().date_naive()
}

/// Create the log directory (and missing parents) if it does not exist
pub(crate) fn ensure_log_dir(dir: &Path) -> Result<(), LogError> {
    create_dir(dir).map_err(|source| LogError::CreateDir {
        path: dir.to_path_buf(),
        source,
    })
}

#[cfg(unix)]
fn create_dir(dir: &Path) -> io::Result<()> {
    use std::os::unix::fs::DirBuilderExt;

    fs::DirBuilder::new()
        .recursive(true)
        .mode(DIR_MODE)
        .create(dir)
}

#[cfg(not(unix))]
fn create_dir(dir: &Path) -> io::Result<()> {
    fs::create_dir_all(dir)
}

/// Open a log file for appending, creating it if absent. Never truncates.
pub(crate) fn open_log_file(path: &Path) -> Result<File, LogError> {
    let mut options = OpenOptions::new();
    options.read(true).append(true).create(true);

    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        options.mode(FILE_MODE);
    }

    options.open(path).map_err(|source| LogError::OpenFile {
        path: path.to_path_buf(),
        source,
    })
}

/// Resolve the day's log file from `config`, creating the directory as needed
pub(crate) fn open_daily_file(config: &Config) -> Result<(PathBuf, File), LogError> {
    let dir = config.log_dir()?;
    ensure_log_dir(&dir)?;

    let path = dir.join(crate::config::log_file_name(today()));
    let file = open_log_file(&path)?;
    tracing::debug!(path = %path.display(), "opened daily log file");

    Ok((path, file))
}

type SharedFile = Arc<Mutex<Option<File>>>;
type Console = Box<dyn Write + Send>;

/// A writer that sends each line to both the console and the log file
pub(crate) struct TeeWriter {
    console: Mutex<Console>,
    file: SharedFile,
}

impl TeeWriter {
    pub(crate) fn new(console: Console, file: SharedFile) -> Self {
        Self {
            console: Mutex::new(console),
            file,
        }
    }

    /// Write one complete line to every destination
    ///
    /// The console lock is held across both writes so concurrent lines stay
    /// whole and land in the same order in both destinations. Failures are
    /// absorbed.
    pub(crate) fn write_line(&self, line: &[u8]) {
        let mut console = match self.console.lock() {
            Ok(console) => console,
            Err(poisoned) => poisoned.into_inner(),
        };

        let _ = console.write_all(line);
        let _ = console.flush();

        if let Ok(mut file) = self.file.lock() {
            if let Some(file) = file.as_mut() {
                let _ = file.write_all(line);
            }
        }
    }
}

/// Caller-owned handle to the day's log file
///
/// Dropping the guard flushes and closes the file. Lines logged afterwards still
/// reach the console but are no longer written to the file.
#[derive(Debug)]
pub struct LogFileGuard {
    path: PathBuf,
    file: SharedFile,
}

impl LogFileGuard {
    pub(crate) fn new(path: PathBuf, file: SharedFile) -> Self {
        Self { path, file }
    }

    /// Full path to the log file
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Whether the file is still open
    pub fn is_open(&self) -> bool {
        self.file.lock().map(|f| f.is_some()).unwrap_or(false)
    }

    /// Flush and close the file, reporting any flush failure
    pub fn close(mut self) -> io::Result<()> {
        self.release()
    }

    fn release(&mut self) -> io::Result<()> {
        let file = match self.file.lock() {
            Ok(mut file) => file.take(),
            Err(poisoned) => poisoned.into_inner().take(),
        };

        match file {
            Some(mut file) => {
                tracing::debug!(path = %self.path.display(), "closing daily log file");
                file.flush()
            }
            None => Ok(()),
        }
    }
}

impl Drop for LogFileGuard {
    fn drop(&mut self) {
        let _ = self.release();
    }
}
