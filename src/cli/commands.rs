//! Turns tracker results into console notices.

use crate::{errors::TrackerError, tracker::Tracker};

use super::output;

/// Answers collected by the add-expense prompts.
#[derive(Debug, Clone, Default)]
pub struct ExpenseForm {
    pub amount: String,
    pub category: String,
    pub description: String,
    pub date: Option<String>,
}

pub fn report_load(result: Result<usize, TrackerError>) {
    if let Err(err) = result {
        output::error(format!("Error loading data: {err}"));
    }
}

pub fn add_expense(tracker: &mut Tracker, form: &ExpenseForm) {
    match tracker.add_expense(
        &form.amount,
        &form.category,
        &form.description,
        form.date.as_deref(),
    ) {
        Ok(outcome) => {
            if let Some(err) = outcome.save_error {
                output::error(format!("Error saving data: {err}"));
            }
            output::success("Expense added successfully!");
        }
        Err(TrackerError::InvalidAmount(_)) => output::error("Invalid amount! Must be a number."),
        Err(err) => output::error(err),
    }
}

pub fn view_all(tracker: &Tracker) {
    let lines = tracker.view_all();
    if lines.is_empty() {
        output::info("No expenses found.");
        return;
    }
    for line in &lines {
        output::line(line);
    }
}

pub fn view_by_category(tracker: &Tracker, category: &str) {
    let lines = tracker.view_by_category(category);
    if lines.is_empty() {
        output::info(format!("No expenses found in category: {category}"));
        return;
    }
    for line in &lines {
        output::line(line);
    }
}
