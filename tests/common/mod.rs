use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use expense_tracker::{clock::FixedClock, storage::JsonFileStore, Tracker};
use tempfile::TempDir;

pub const TODAY: &str = "2025-02-14";

/// Creates a temp directory and the expense file path inside it.
pub fn setup_test_env() -> (TempDir, PathBuf) {
    let temp = TempDir::new().expect("create temp dir");
    let path = temp.path().join("expenses.json");
    (temp, path)
}

/// Opens a tracker over `path` with the clock pinned to [`TODAY`].
pub fn open_tracker(path: &Path) -> Tracker {
    let clock = FixedClock(NaiveDate::from_ymd_opt(2025, 2, 14).expect("valid date"));
    let (tracker, loaded) = Tracker::open(Box::new(JsonFileStore::new(path)), Box::new(clock));
    loaded.expect("load expenses");
    tracker
}
