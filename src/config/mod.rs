use std::path::PathBuf;

use crate::storage::DEFAULT_STORAGE_FILE;

/// Runtime settings for a tracker session.
#[derive(Debug, Clone)]
pub struct Config {
    /// Backing file, relative paths resolve against the working directory.
    pub storage_path: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            storage_path: PathBuf::from(DEFAULT_STORAGE_FILE),
        }
    }
}

impl Config {
    pub fn with_storage_path(path: impl Into<PathBuf>) -> Self {
        Self {
            storage_path: path.into(),
        }
    }
}
