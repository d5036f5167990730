#![doc(test(attr(deny(warnings))))]

//! Expense Tracker records personal expenses in a JSON file and lists them,
//! in full or by category, from a small interactive menu.

pub mod cli;
pub mod clock;
pub mod config;
pub mod domain;
pub mod errors;
pub mod storage;
pub mod tracker;
pub mod utils;

pub use errors::{CliError, TrackerError};
pub use tracker::{AddOutcome, Tracker};

use std::sync::Once;

static INIT_TRACING: Once = Once::new();

/// Initializes global tracing and emits a startup debug log.
pub fn init() {
    INIT_TRACING.call_once(|| {
        utils::init_tracing();
        tracing::debug!("Expense tracker tracing initialized.");
    });
}
