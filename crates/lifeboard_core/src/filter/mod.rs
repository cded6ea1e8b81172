//! Pure row filters used before display and summarization.
//!
//! # Responsibility
//! - Select journal rows by rolling date window.
//! - Detect recent days without a journal entry.
//! - Filter contacts by category and pick one at random.
//!
//! # Invariants
//! - Filters never mutate or reorder their input.

pub mod contacts;
pub mod missing;
pub mod window;

use crate::model::journal::JournalEntry;
use chrono::NaiveDate;

/// Row keyed by a calendar date.
pub trait Dated {
    fn date(&self) -> NaiveDate;
}

impl Dated for JournalEntry {
    fn date(&self) -> NaiveDate {
        self.date
    }
}
