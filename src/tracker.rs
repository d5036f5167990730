//! The expense tracker: an in-memory sequence kept in step with its backing store.

use std::path::Path;

use crate::{
    clock::Clock,
    domain::{parse_amount, Expense},
    errors::TrackerError,
    storage::ExpenseStore,
};

/// Result of a successful [`Tracker::add_expense`]. The expense is in memory
/// even when `save_error` is set; disk then lags until the next good save.
#[derive(Debug)]
pub struct AddOutcome {
    pub expense: Expense,
    pub save_error: Option<TrackerError>,
}

/// Owns the expense sequence and the store it is persisted to.
pub struct Tracker {
    expenses: Vec<Expense>,
    store: Box<dyn ExpenseStore>,
    clock: Box<dyn Clock>,
}

impl Tracker {
    /// Creates an empty tracker without touching the store.
    pub fn new(store: Box<dyn ExpenseStore>, clock: Box<dyn Clock>) -> Self {
        Self {
            expenses: Vec::new(),
            store,
            clock,
        }
    }

    /// Creates a tracker and immediately loads stored expenses. The tracker is
    /// returned even when loading fails; it is then empty.
    pub fn open(
        store: Box<dyn ExpenseStore>,
        clock: Box<dyn Clock>,
    ) -> (Self, Result<usize, TrackerError>) {
        let mut tracker = Self::new(store, clock);
        let loaded = tracker.load_data();
        (tracker, loaded)
    }

    /// Replaces the in-memory sequence with the stored one. On failure the
    /// current sequence is left untouched.
    pub fn load_data(&mut self) -> Result<usize, TrackerError> {
        match self.store.load() {
            Ok(expenses) => {
                self.expenses = expenses;
                tracing::info!(
                    path = %self.store.path().display(),
                    count = self.expenses.len(),
                    "expenses loaded"
                );
                Ok(self.expenses.len())
            }
            Err(err) => {
                tracing::error!(
                    path = %self.store.path().display(),
                    error = %err,
                    "failed to load expenses"
                );
                Err(err)
            }
        }
    }

    /// Writes the full sequence to the store.
    pub fn save_data(&self) -> Result<(), TrackerError> {
        self.store.save(&self.expenses).map_err(|err| {
            tracing::error!(
                path = %self.store.path().display(),
                error = %err,
                "failed to save expenses"
            );
            err
        })
    }

    /// Validates `amount`, appends the expense and persists everything.
    /// Invalid amounts leave both memory and disk untouched.
    pub fn add_expense(
        &mut self,
        amount: &str,
        category: &str,
        description: &str,
        date: Option<&str>,
    ) -> Result<AddOutcome, TrackerError> {
        let amount = parse_amount(amount).map_err(|err| {
            tracing::warn!(error = %err, "rejected expense");
            err
        })?;
        let expense = Expense::new(
            amount,
            category,
            description,
            date.map(str::to_string),
            self.clock.as_ref(),
        );
        self.expenses.push(expense.clone());
        let save_error = self.save_data().err();
        Ok(AddOutcome {
            expense,
            save_error,
        })
    }

    /// Numbered listing of every expense in insertion order.
    pub fn view_all(&self) -> Vec<String> {
        numbered(self.expenses.iter())
    }

    /// Numbered listing of the expenses whose category equals `category`,
    /// ignoring case. Numbering restarts at 1.
    pub fn view_by_category(&self, category: &str) -> Vec<String> {
        numbered(self.by_category(category))
    }

    pub fn by_category<'a>(
        &'a self,
        category: &'a str,
    ) -> impl Iterator<Item = &'a Expense> + 'a {
        self.expenses
            .iter()
            .filter(move |expense| expense.matches_category(category))
    }

    pub fn expenses(&self) -> &[Expense] {
        &self.expenses
    }

    pub fn len(&self) -> usize {
        self.expenses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.expenses.is_empty()
    }

    pub fn storage_path(&self) -> &Path {
        self.store.path()
    }
}

fn numbered<'a>(expenses: impl Iterator<Item = &'a Expense>) -> Vec<String> {
    expenses
        .enumerate()
        .map(|(idx, expense)| format!("{}. {}", idx + 1, expense))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{clock::FixedClock, storage::JsonFileStore};
    use chrono::NaiveDate;
    use std::{fs, path::PathBuf};
    use tempfile::TempDir;

    fn clock() -> Box<FixedClock> {
        Box::new(FixedClock(NaiveDate::from_ymd_opt(2025, 4, 1).unwrap()))
    }

    fn tracker_at(path: PathBuf) -> Tracker {
        let (tracker, loaded) = Tracker::open(Box::new(JsonFileStore::new(path)), clock());
        loaded.expect("load expenses");
        tracker
    }

    fn temp_tracker() -> (Tracker, TempDir) {
        let temp = TempDir::new().expect("temp dir");
        let tracker = tracker_at(temp.path().join("expenses.json"));
        (tracker, temp)
    }

    #[test]
    fn first_run_starts_empty() {
        let (tracker, _guard) = temp_tracker();
        assert!(tracker.is_empty());
        assert!(tracker.view_all().is_empty());
        assert!(!tracker.storage_path().exists());
    }

    #[test]
    fn invalid_amount_changes_nothing() {
        let (mut tracker, _guard) = temp_tracker();
        let err = tracker
            .add_expense("abc", "Food", "Lunch", None)
            .unwrap_err();
        assert!(matches!(err, TrackerError::InvalidAmount(ref raw) if raw == "abc"));
        assert_eq!(tracker.len(), 0);
        assert!(!tracker.storage_path().exists());
    }

    #[test]
    fn invalid_amount_leaves_existing_file_alone() {
        let (mut tracker, _guard) = temp_tracker();
        tracker.add_expense("5", "Food", "Tea", None).unwrap();
        let before = fs::read_to_string(tracker.storage_path()).unwrap();

        assert!(tracker.add_expense("five", "Food", "Tea", None).is_err());
        assert_eq!(tracker.len(), 1);
        assert_eq!(fs::read_to_string(tracker.storage_path()).unwrap(), before);
    }

    #[test]
    fn add_persists_immediately() {
        let (mut tracker, _guard) = temp_tracker();
        let outcome = tracker
            .add_expense("12.5", "Food", "Lunch", None)
            .expect("add expense");
        assert!(outcome.save_error.is_none());
        assert_eq!(outcome.expense.date(), "2025-04-01");
        assert_eq!(outcome.expense.amount(), 12.5);

        let reloaded = tracker_at(tracker.storage_path().to_path_buf());
        assert_eq!(reloaded.expenses(), tracker.expenses());
    }

    #[test]
    fn listing_follows_insertion_order() {
        let (mut tracker, _guard) = temp_tracker();
        for (amount, description) in [("1", "first"), ("2", "second"), ("3", "third")] {
            tracker
                .add_expense(amount, "Misc", description, Some("2025-01-01"))
                .unwrap();
        }
        assert_eq!(
            tracker.view_all(),
            vec![
                "1. 2025-01-01 - Misc - 1.0 - first",
                "2. 2025-01-01 - Misc - 2.0 - second",
                "3. 2025-01-01 - Misc - 3.0 - third",
            ]
        );
    }

    #[test]
    fn category_filter_is_case_insensitive_and_renumbers() {
        let (mut tracker, _guard) = temp_tracker();
        tracker.add_expense("10", "Food", "Groceries", Some("2025-01-01")).unwrap();
        tracker.add_expense("30", "Travel", "Taxi", Some("2025-01-02")).unwrap();
        tracker.add_expense("4.5", "food", "Coffee", Some("2025-01-03")).unwrap();

        assert_eq!(
            tracker.view_by_category("FOOD"),
            vec![
                "1. 2025-01-01 - Food - 10.0 - Groceries",
                "2. 2025-01-03 - food - 4.5 - Coffee",
            ]
        );
        assert_eq!(tracker.by_category("travel").count(), 1);
        assert!(tracker.view_by_category("Rent").is_empty());
        assert!(tracker.view_by_category("Foo").is_empty());
    }

    #[test]
    fn corrupt_file_reports_error_and_stays_empty() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("expenses.json");
        fs::write(&path, "not json").unwrap();

        let (tracker, loaded) = Tracker::open(Box::new(JsonFileStore::new(&path)), clock());
        assert!(matches!(loaded, Err(TrackerError::Serde(_))));
        assert!(tracker.is_empty());
    }

    #[test]
    fn entry_missing_a_field_aborts_load() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("expenses.json");
        fs::write(
            &path,
            r#"[{"amount": 1.0, "category": "Food", "description": "ok", "date": "2025-01-01"},
                {"amount": 2.0, "category": "Food", "description": "no date"}]"#,
        )
        .unwrap();

        let (tracker, loaded) = Tracker::open(Box::new(JsonFileStore::new(&path)), clock());
        assert!(matches!(loaded, Err(TrackerError::InvalidRecord { index: 2, .. })));
        assert!(tracker.is_empty());
    }

    #[test]
    fn failed_reload_keeps_current_sequence() {
        let (mut tracker, _guard) = temp_tracker();
        tracker.add_expense("1", "Food", "Bread", None).unwrap();
        fs::write(tracker.storage_path(), "{").unwrap();

        assert!(tracker.load_data().is_err());
        assert_eq!(tracker.len(), 1);
    }

    #[test]
    fn save_failure_keeps_expense_in_memory() {
        let temp = TempDir::new().unwrap();
        // The storage path is a directory, so the final rename cannot succeed.
        let path = temp.path().join("expenses.json");
        fs::create_dir_all(&path).unwrap();
        let mut tracker = Tracker::new(Box::new(JsonFileStore::new(&path)), clock());

        let outcome = tracker
            .add_expense("9.99", "Books", "Novel", None)
            .expect("validation passes");
        assert!(outcome.save_error.is_some());
        assert_eq!(tracker.len(), 1);
        assert!(!temp.path().join("expenses.json.tmp").exists());
    }
}
