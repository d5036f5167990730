//! Domain type representing a single recorded expense.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::{clock::Clock, errors::TrackerError};

/// Calendar format used for stored and displayed dates.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Shape of one entry in the backing file. Field order is the on-disk key order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct StoredExpense {
    pub amount: f64,
    pub category: String,
    pub description: String,
    pub date: String,
}

/// One expense entry. Fields are fixed once the value is built.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(into = "StoredExpense", try_from = "StoredExpense")]
pub struct Expense {
    amount: f64,
    category: String,
    description: String,
    date: String,
}

impl Expense {
    /// Builds an expense, falling back to the clock's current date when `date`
    /// is absent or blank.
    pub fn new(
        amount: f64,
        category: impl Into<String>,
        description: impl Into<String>,
        date: Option<String>,
        clock: &dyn Clock,
    ) -> Self {
        let date = date
            .filter(|value| !value.trim().is_empty())
            .unwrap_or_else(|| clock.today().format(DATE_FORMAT).to_string());
        Self {
            amount,
            category: category.into(),
            description: description.into(),
            date,
        }
    }

    pub fn amount(&self) -> f64 {
        self.amount
    }

    pub fn category(&self) -> &str {
        &self.category
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn date(&self) -> &str {
        &self.date
    }

    /// Case-insensitive exact comparison against the expense category.
    pub fn matches_category(&self, category: &str) -> bool {
        self.category.to_lowercase() == category.to_lowercase()
    }

    /// Mapping written to the backing file.
    pub fn to_record(&self) -> StoredExpense {
        StoredExpense::from(self.clone())
    }

    /// Rebuilds an expense from a stored mapping. `index` is the 1-based
    /// position of the entry and only feeds error messages.
    pub fn from_record(index: usize, value: &Value) -> Result<Self, TrackerError> {
        Self::deserialize(value).map_err(|err| TrackerError::InvalidRecord {
            index,
            reason: err.to_string(),
        })
    }
}

impl From<Expense> for StoredExpense {
    fn from(expense: Expense) -> Self {
        Self {
            amount: expense.amount,
            category: expense.category,
            description: expense.description,
            date: expense.date,
        }
    }
}

impl TryFrom<StoredExpense> for Expense {
    type Error = TrackerError;

    fn try_from(stored: StoredExpense) -> Result<Self, Self::Error> {
        if !stored.amount.is_finite() {
            return Err(TrackerError::InvalidAmount(stored.amount.to_string()));
        }
        Ok(Self {
            amount: stored.amount,
            category: stored.category,
            description: stored.description,
            date: stored.date,
        })
    }
}

impl fmt::Display for Expense {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} - {} - {} - {}",
            self.date,
            self.category,
            format_amount(self.amount),
            self.description
        )
    }
}

/// Parses user-supplied amount text. Surrounding whitespace is ignored and
/// non-finite values are rejected since the file format cannot hold them.
pub fn parse_amount(raw: &str) -> Result<f64, TrackerError> {
    raw.trim()
        .parse::<f64>()
        .ok()
        .filter(|value| value.is_finite())
        .ok_or_else(|| TrackerError::InvalidAmount(raw.to_string()))
}

/// Renders an amount the way it reads in the file: integral values keep a
/// trailing `.0`, and magnitudes below `1e-4` or from `1e16` up switch to
/// exponent form with a signed, two-digit exponent (`1e+16`, `1.5e-05`).
pub fn format_amount(amount: f64) -> String {
    let magnitude = amount.abs();
    if amount != 0.0 && !(1e-4..1e16).contains(&magnitude) {
        let scientific = format!("{amount:e}");
        return match scientific.split_once('e') {
            Some((mantissa, exponent)) => match exponent.parse::<i32>() {
                Ok(exp) if exp < 0 => format!("{mantissa}e-{:02}", -exp),
                Ok(exp) => format!("{mantissa}e+{exp:02}"),
                Err(_) => scientific,
            },
            None => scientific,
        };
    }
    if amount.fract() == 0.0 {
        format!("{amount:.1}")
    } else {
        amount.to_string()
    }
}
