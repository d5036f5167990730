pub mod json_backend;

use std::path::Path;

use crate::{domain::Expense, errors::TrackerError};

pub type Result<T> = std::result::Result<T, TrackerError>;

/// Abstraction over the durable home of the expense sequence.
pub trait ExpenseStore: Send + Sync {
    /// Reads every stored expense. A missing backing file yields an empty list.
    fn load(&self) -> Result<Vec<Expense>>;
    /// Replaces the stored contents with `expenses`.
    fn save(&self, expenses: &[Expense]) -> Result<()>;
    fn path(&self) -> &Path;
}

pub use json_backend::{JsonFileStore, DEFAULT_STORAGE_FILE};
