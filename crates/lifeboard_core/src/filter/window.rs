//! Rolling time-window filter.

use super::Dated;
use chrono::{Days, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

/// Lookback period applied before summarization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum TimeWindow {
    #[default]
    #[serde(rename = "last_7_days", alias = "7d")]
    Last7Days,
    #[serde(rename = "last_30_days", alias = "30d")]
    Last30Days,
    #[serde(rename = "all_time", alias = "all")]
    AllTime,
}

impl TimeWindow {
    /// Window length in days; `None` for `AllTime`.
    pub fn days(self) -> Option<u64> {
        match self {
            Self::Last7Days => Some(7),
            Self::Last30Days => Some(30),
            Self::AllTime => None,
        }
    }

    /// Inclusive lower bound relative to `reference`.
    pub fn cutoff(self, reference: NaiveDate) -> Option<NaiveDate> {
        self.days()
            .map(|days| reference.checked_sub_days(Days::new(days)).unwrap_or(NaiveDate::MIN))
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Last7Days => "Last 7 Days",
            Self::Last30Days => "Last 30 Days",
            Self::AllTime => "All Time",
        }
    }

    /// Parses CLI spellings: `7d`, `30d`, `all` (and the display labels).
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "7" | "7d" | "week" | "last 7 days" | "last_7_days" => Some(Self::Last7Days),
            "30" | "30d" | "month" | "last 30 days" | "last_30_days" => Some(Self::Last30Days),
            "all" | "all time" | "all_time" => Some(Self::AllTime),
            _ => None,
        }
    }
}

impl Display for TimeWindow {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Rows dated within `[reference - N days, reference]`; every row for
/// `AllTime`.
pub fn filter_by_window<T: Dated + Clone>(
    rows: &[T],
    reference: NaiveDate,
    window: TimeWindow,
) -> Vec<T> {
    match window.cutoff(reference) {
        None => rows.to_vec(),
        Some(cutoff) => rows
            .iter()
            .filter(|row| {
                let date = row.date();
                date >= cutoff && date <= reference
            })
            .cloned()
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::{filter_by_window, TimeWindow};
    use crate::model::journal::JournalEntry;
    use chrono::NaiveDate;

    fn entry(month: u32, day: u32) -> JournalEntry {
        JournalEntry::new(NaiveDate::from_ymd_opt(2024, month, day).unwrap(), "", "", "")
    }

    fn dates(rows: &[JournalEntry]) -> Vec<String> {
        rows.iter().map(|row| row.date.to_string()).collect()
    }

    #[test]
    fn last_7_days_includes_both_bounds() {
        let rows = vec![entry(1, 1), entry(1, 2), entry(1, 5), entry(1, 9), entry(1, 10)];
        let reference = NaiveDate::from_ymd_opt(2024, 1, 9).unwrap();

        let filtered = filter_by_window(&rows, reference, TimeWindow::Last7Days);
        assert_eq!(dates(&filtered), vec!["2024-01-02", "2024-01-05", "2024-01-09"]);
    }

    #[test]
    fn last_30_days_crosses_month_boundary() {
        let rows = vec![entry(1, 1), entry(1, 31), entry(2, 15)];
        let reference = NaiveDate::from_ymd_opt(2024, 2, 20).unwrap();

        let filtered = filter_by_window(&rows, reference, TimeWindow::Last30Days);
        assert_eq!(dates(&filtered), vec!["2024-01-31", "2024-02-15"]);
    }

    #[test]
    fn all_time_returns_rows_unchanged() {
        let rows = vec![entry(3, 1), entry(1, 1)];
        let reference = NaiveDate::from_ymd_opt(2024, 1, 2).unwrap();
        assert_eq!(filter_by_window(&rows, reference, TimeWindow::AllTime), rows);
    }

    #[test]
    fn window_with_no_rows_in_range_is_empty() {
        let rows = vec![entry(1, 1)];
        let reference = NaiveDate::from_ymd_opt(2024, 6, 1).unwrap();
        assert!(filter_by_window(&rows, reference, TimeWindow::Last7Days).is_empty());
    }

    #[test]
    fn parse_accepts_cli_spellings() {
        assert_eq!(TimeWindow::parse("7d"), Some(TimeWindow::Last7Days));
        assert_eq!(TimeWindow::parse("Last 30 Days"), Some(TimeWindow::Last30Days));
        assert_eq!(TimeWindow::parse("ALL"), Some(TimeWindow::AllTime));
        assert_eq!(TimeWindow::parse("90d"), None);
    }
}
