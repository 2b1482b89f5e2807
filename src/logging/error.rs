//! Errors raised while setting up the log facility

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Failures while resolving or opening the daily log file
#[derive(Debug, Error)]
pub enum LogError {
    /// The working directory could not be determined
    #[error("failed to determine working directory: {0}")]
    WorkingDir(#[source] io::Error),

    /// The log directory could not be created
    #[error("failed to create log directory {}: {source}", path.display())]
    CreateDir {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The day's log file could not be opened
    #[error("failed to open log file {}: {source}", path.display())]
    OpenFile {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl LogError {
    /// Whether the facility cannot continue at all after this error
    ///
    /// Only a missing log location is fatal; open failures are left to the caller.
    pub fn is_fatal(&self) -> bool {
        matches!(self, LogError::WorkingDir(_) | LogError::CreateDir { .. })
    }

    /// Short message for the operator, categorized by the underlying IO error
    pub fn user_message(&self) -> String {
        match self {
            LogError::WorkingDir(e) => {
                format!("Failed to determine working directory: {}", describe(e))
            }
            LogError::CreateDir { path, source } => format!(
                "Failed to create log directory {}: {}",
                path.display(),
                describe(source)
            ),
            LogError::OpenFile { path, source } => format!(
                "Failed to open log file {}: {}",
                path.display(),
                describe(source)
            ),
        }
    }
}

/// Short reason for the common cases, the OS text for everything else
fn describe(e: &io::Error) -> String {
    match e.kind() {
        io::ErrorKind::PermissionDenied => "permission denied".to_string(),
        io::ErrorKind::NotFound => "file or directory not found".to_string(),
        _ => e.to_string(),
    }
}
