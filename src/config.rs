//! Configuration for the daily log facility

use std::path::PathBuf;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::logging::LogError;

/// Default name of the log directory below the base directory
pub const DEFAULT_DIR_NAME: &str = "logfiles";

/// Facility configuration
///
/// The facility never loads this from disk itself; host applications may embed
/// it in their own configuration files.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Directory the log directory is created under (default: working directory)
    #[serde(default)]
    pub base_dir: Option<PathBuf>,

    /// Name of the log directory (default: "logfiles")
    #[serde(default = "default_dir_name")]
    pub dir_name: String,
}

fn default_dir_name() -> String {
    DEFAULT_DIR_NAME.to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_dir: None,
            dir_name: default_dir_name(),
        }
    }
}

impl Config {
    /// Config rooted at an explicit base directory instead of the working directory
    pub fn with_base_dir(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: Some(base_dir.into()),
            ..Self::default()
        }
    }

    /// Resolve the log directory, falling back to the working directory as base
    pub fn log_dir(&self) -> Result<PathBuf, LogError> {
        let base = match &self.base_dir {
            Some(dir) => dir.clone(),
            None => std::env::current_dir().map_err(LogError::WorkingDir)?,
        };
        Ok(base.join(&self.dir_name))
    }

    /// Path of the log file for `date` inside the log directory
    pub fn log_file_path(&self, date: NaiveDate) -> Result<PathBuf, LogError> {
        Ok(self.log_dir()?.join(log_file_name(date)))
    }
}

/// File name for a given day: `YYYY-MM-DD.log`
pub fn log_file_name(date: NaiveDate) -> String {
    format!("{}.log", date.format("%Y-%m-%d"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.base_dir, None);
        assert_eq!(config.dir_name, "logfiles");
    }

    #[test]
    fn test_log_file_name_is_dated() {
        let date = NaiveDate::from_ymd_opt(2025, 6, 1).unwrap();
        assert_eq!(log_file_name(date), "2025-06-01.log");
    }

    #[test]
    fn test_log_file_path_under_base_dir() {
        let config = Config::with_base_dir("/tmp/app");
        let date = NaiveDate::from_ymd_opt(2025, 6, 1).unwrap();
        let path = config.log_file_path(date).unwrap();
        assert_eq!(path, PathBuf::from("/tmp/app/logfiles/2025-06-01.log"));
    }

    #[test]
    fn test_log_dir_defaults_to_cwd() {
        let config = Config::default();
        let cwd = std::env::current_dir().unwrap();
        assert_eq!(config.log_dir().unwrap(), cwd.join("logfiles"));
    }

    #[test]
    fn test_config_embeds_in_toml() {
        let config: Config = toml::from_str(r#"base_dir = "/var/app""#).unwrap();
        assert_eq!(config.base_dir, Some(PathBuf::from("/var/app")));
        assert_eq!(config.dir_name, "logfiles");

        let config: Config = toml::from_str(r#"dir_name = "logs""#).unwrap();
        assert_eq!(config.base_dir, None);
        assert_eq!(config.dir_name, "logs");
    }
}
