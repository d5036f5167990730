pub mod expense;

pub use expense::{format_amount, parse_amount, Expense, StoredExpense, DATE_FORMAT};
