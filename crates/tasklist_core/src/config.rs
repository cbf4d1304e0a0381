//! Startup configuration.
//!
//! # Responsibility
//! - Resolve the store path, data directory and log level once per process.
//! - Hand the result to the store and task service as explicit values.
//!
//! # Invariants
//! - Nothing below this module reads the environment.
//! - `TASKLIST_PATH` wins over `TASKLIST_HOME` for the store file; the data
//!   directory (and logs) still follow `TASKLIST_HOME`.

use crate::logging::default_log_level;
use std::path::{Path, PathBuf};

/// Overrides the data directory (default `~/.tasklist`).
pub const HOME_ENV: &str = "TASKLIST_HOME";
/// Overrides the full store file path.
pub const PATH_ENV: &str = "TASKLIST_PATH";
/// Overrides the log level.
pub const LOG_LEVEL_ENV: &str = "TASKLIST_LOG";

pub const DEFAULT_DIR_NAME: &str = ".tasklist";
pub const STORE_FILE_NAME: &str = "tasks.json";
const LOG_DIR_NAME: &str = "logs";

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("no home directory found; set TASKLIST_HOME or TASKLIST_PATH")]
    HomeDirUnavailable,
}

/// Resolved process configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskListConfig {
    pub data_dir: PathBuf,
    pub store_path: PathBuf,
    pub log_level: String,
}

impl TaskListConfig {
    /// Resolves configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::resolve(|key| std::env::var(key).ok(), dirs::home_dir())
    }

    /// Resolves configuration from an arbitrary variable lookup.
    ///
    /// Blank values count as unset. `home` is only consulted when
    /// `TASKLIST_HOME` is unset.
    pub fn resolve(
        lookup: impl Fn(&str) -> Option<String>,
        home: Option<PathBuf>,
    ) -> Result<Self, ConfigError> {
        let non_blank = |key: &str| {
            lookup(key)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        let path_override = non_blank(PATH_ENV).map(PathBuf::from);
        let data_dir = match non_blank(HOME_ENV) {
            Some(dir) => PathBuf::from(dir),
            None => match (home, &path_override) {
                (Some(home), _) => home.join(DEFAULT_DIR_NAME),
                // Without a home, keep logs beside the overridden store file.
                (None, Some(path)) => parent_or_current(path),
                (None, None) => return Err(ConfigError::HomeDirUnavailable),
            },
        };
        let store_path = path_override.unwrap_or_else(|| data_dir.join(STORE_FILE_NAME));
        let log_level =
            non_blank(LOG_LEVEL_ENV).unwrap_or_else(|| default_log_level().to_string());

        Ok(Self {
            data_dir,
            store_path,
            log_level,
        })
    }

    /// Replaces the store path, e.g. from a command-line flag.
    #[must_use]
    pub fn with_store_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.store_path = path.into();
        self
    }

    pub fn log_dir(&self) -> PathBuf {
        self.data_dir.join(LOG_DIR_NAME)
    }
}

fn parent_or_current(path: &Path) -> PathBuf {
    match path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir.to_path_buf(),
        _ => PathBuf::from("."),
    }
}

#[cfg(test)]
mod tests {
    use super::{ConfigError, TaskListConfig, HOME_ENV, LOG_LEVEL_ENV, PATH_ENV};
    use std::collections::HashMap;
    use std::path::PathBuf;

    fn resolve(vars: &[(&str, &str)], home: Option<&str>) -> Result<TaskListConfig, ConfigError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(key, value)| (key.to_string(), value.to_string()))
            .collect();
        TaskListConfig::resolve(|key| vars.get(key).cloned(), home.map(PathBuf::from))
    }

    #[test]
    fn defaults_to_home_relative_directory() {
        let config = resolve(&[], Some("/home/ada")).unwrap();
        assert_eq!(config.data_dir, PathBuf::from("/home/ada/.tasklist"));
        assert_eq!(config.store_path, PathBuf::from("/home/ada/.tasklist/tasks.json"));
        assert_eq!(config.log_dir(), PathBuf::from("/home/ada/.tasklist/logs"));
    }

    #[test]
    fn directory_override_moves_the_store_file() {
        let config = resolve(&[(HOME_ENV, "/data/todo")], Some("/home/ada")).unwrap();
        assert_eq!(config.store_path, PathBuf::from("/data/todo/tasks.json"));
    }

    #[test]
    fn path_override_wins_for_the_store_file() {
        let config = resolve(
            &[(HOME_ENV, "/data/todo"), (PATH_ENV, "/tmp/mine.json")],
            Some("/home/ada"),
        )
        .unwrap();
        assert_eq!(config.store_path, PathBuf::from("/tmp/mine.json"));
        assert_eq!(config.data_dir, PathBuf::from("/data/todo"));
    }

    #[test]
    fn blank_values_are_ignored() {
        let config = resolve(&[(HOME_ENV, "  "), (LOG_LEVEL_ENV, "")], Some("/home/ada")).unwrap();
        assert_eq!(config.data_dir, PathBuf::from("/home/ada/.tasklist"));
        assert!(!config.log_level.is_empty());
    }

    #[test]
    fn missing_home_needs_an_override() {
        assert_eq!(resolve(&[], None).unwrap_err(), ConfigError::HomeDirUnavailable);

        let config = resolve(&[(PATH_ENV, "/srv/tasks.json")], None).unwrap();
        assert_eq!(config.data_dir, PathBuf::from("/srv"));
    }
}
