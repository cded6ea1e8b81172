//! Per-invocation session context.
//!
//! One context is created for each user action and passed explicitly into
//! the service calls it makes. Nothing in it outlives the action.

use crate::filter::missing::DEFAULT_LOOKBACK_DAYS;
use crate::filter::window::TimeWindow;
use crate::model::contact::ALL_CONTACTS;
use chrono::{Local, NaiveDate};

/// Selections and reference date for one user action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionContext {
    /// Reference date for windows and missing-day checks.
    pub today: NaiveDate,
    pub window: TimeWindow,
    /// Contact category selector; `All Contacts` matches everything.
    pub category: String,
    pub lookback_days: u32,
}

impl SessionContext {
    pub fn new(today: NaiveDate) -> Self {
        Self {
            today,
            window: TimeWindow::default(),
            category: ALL_CONTACTS.to_string(),
            lookback_days: DEFAULT_LOOKBACK_DAYS,
        }
    }

    /// Context dated with the local calendar day.
    pub fn for_today() -> Self {
        Self::new(Local::now().date_naive())
    }

    pub fn with_window(mut self, window: TimeWindow) -> Self {
        self.window = window;
        self
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = category.into();
        self
    }
}
