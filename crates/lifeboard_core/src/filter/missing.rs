//! Missing-entry detection for the last few days.

use super::Dated;
use chrono::{Days, NaiveDate};
use std::collections::HashSet;

/// Default number of past days checked.
pub const DEFAULT_LOOKBACK_DAYS: u32 = 7;

/// A past day with no journal entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MissingDay {
    /// Days before the reference date; 1 is yesterday.
    pub offset: u32,
    pub date: NaiveDate,
}

impl MissingDay {
    /// Short month/day label, e.g. `Jan 03`.
    pub fn label(&self) -> String {
        self.date.format("%b %d").to_string()
    }
}

/// Days at offsets `1..=lookback` before `reference` that have no row.
///
/// Output is in offset order (yesterday first). `reference` itself is never
/// checked.
pub fn missing_days<T: Dated>(rows: &[T], reference: NaiveDate, lookback: u32) -> Vec<MissingDay> {
    let present: HashSet<NaiveDate> = rows.iter().map(Dated::date).collect();
    (1..=lookback)
        .filter_map(|offset| {
            let date = reference.checked_sub_days(Days::new(u64::from(offset)))?;
            (!present.contains(&date)).then_some(MissingDay { offset, date })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::{missing_days, DEFAULT_LOOKBACK_DAYS};
    use crate::model::journal::JournalEntry;
    use chrono::NaiveDate;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, d).unwrap()
    }

    fn entries(days: &[u32]) -> Vec<JournalEntry> {
        days.iter()
            .map(|d| JournalEntry::new(day(*d), "", "", ""))
            .collect()
    }

    #[test]
    fn all_days_present_reports_nothing() {
        let rows = entries(&[1, 2, 3, 4, 5, 6, 7]);
        assert!(missing_days(&rows, day(8), DEFAULT_LOOKBACK_DAYS).is_empty());
    }

    #[test]
    fn empty_table_reports_every_offset() {
        let rows: Vec<JournalEntry> = Vec::new();
        let missing = missing_days(&rows, day(8), DEFAULT_LOOKBACK_DAYS);
        let offsets: Vec<u32> = missing.iter().map(|day| day.offset).collect();
        assert_eq!(offsets, vec![1, 2, 3, 4, 5, 6, 7]);
    }

    #[test]
    fn gaps_are_reported_yesterday_first_with_labels() {
        let rows = entries(&[1, 2, 4, 6, 7]);
        let missing = missing_days(&rows, day(8), DEFAULT_LOOKBACK_DAYS);

        let labels: Vec<String> = missing.iter().map(|day| day.label()).collect();
        assert_eq!(labels, vec!["Jan 05", "Jan 03"]);
        assert_eq!(missing[0].offset, 3);
        assert_eq!(missing[1].offset, 5);
    }

    #[test]
    fn today_is_never_flagged() {
        let rows = entries(&[1, 2, 3, 4, 5, 6, 7]);
        let missing = missing_days(&rows, day(8), DEFAULT_LOOKBACK_DAYS);
        assert!(missing.iter().all(|missing| missing.date != day(8)));
    }
}
