//! Journal domain model.
//!
//! # Responsibility
//! - Define the dated three-update journal record.
//! - Convert between journal records and backend `RawTable` rows.
//!
//! # Invariants
//! - `date` is the unique key of an entry within one journal table.
//! - Rows with an unparseable date are reported, never silently coerced.

use crate::model::table::{RawTable, TableId};
use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

pub const DATE_COLUMN: &str = "Date";
pub const ENTRY_COLUMNS: [&str; 3] = ["Entry 1", "Entry 2", "Entry 3"];

/// Serialized date format for every backend.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

const DATE_ONLY_FORMATS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d", "%m/%d/%Y"];
const DATE_TIME_FORMATS: &[&str] = &["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S"];

/// Which journal an entry belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JournalKind {
    Life,
    Work,
}

impl JournalKind {
    pub fn table(self) -> TableId {
        match self {
            Self::Life => TableId::LifeJournal,
            Self::Work => TableId::WorkJournal,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Life => "life",
            Self::Work => "work",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "life" => Some(Self::Life),
            "work" => Some(Self::Work),
            _ => None,
        }
    }
}

impl Display for JournalKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One day of journal updates.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JournalEntry {
    pub date: NaiveDate,
    pub entry1: String,
    pub entry2: String,
    pub entry3: String,
}

impl JournalEntry {
    pub fn new(
        date: NaiveDate,
        entry1: impl Into<String>,
        entry2: impl Into<String>,
        entry3: impl Into<String>,
    ) -> Self {
        Self {
            date,
            entry1: entry1.into(),
            entry2: entry2.into(),
            entry3: entry3.into(),
        }
    }

    /// Cells in `journal_headers()` order.
    pub fn to_row(&self) -> Vec<String> {
        vec![
            self.date.format(DATE_FORMAT).to_string(),
            self.entry1.clone(),
            self.entry2.clone(),
            self.entry3.clone(),
        ]
    }

    pub fn entries(&self) -> [&str; 3] {
        [
            self.entry1.as_str(),
            self.entry2.as_str(),
            self.entry3.as_str(),
        ]
    }
}

/// Row skipped while loading a journal table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MalformedRow {
    /// 1-based data row number (header excluded).
    pub row_number: usize,
    pub raw_date: String,
}

impl Display for MalformedRow {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "row {} has unparseable date `{}`",
            self.row_number, self.raw_date
        )
    }
}

/// Parsed journal table: valid entries plus skipped rows.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct JournalTable {
    pub entries: Vec<JournalEntry>,
    pub malformed: Vec<MalformedRow>,
}

/// Canonical header row of journal tables.
pub fn journal_headers() -> Vec<String> {
    std::iter::once(DATE_COLUMN)
        .chain(ENTRY_COLUMNS)
        .map(str::to_string)
        .collect()
}

/// Parses a stored date cell.
///
/// Accepts plain dates in a few common spellings and timestamps (the time
/// part is dropped).
pub fn parse_entry_date(value: &str) -> Option<NaiveDate> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return None;
    }
    DATE_ONLY_FORMATS
        .iter()
        .find_map(|format| NaiveDate::parse_from_str(trimmed, format).ok())
        .or_else(|| {
            DATE_TIME_FORMATS.iter().find_map(|format| {
                NaiveDateTime::parse_from_str(trimmed, format)
                    .ok()
                    .map(|value| value.date())
            })
        })
}

/// Locates the date column; falls back to the first column for header-less
/// sheets.
pub(crate) fn date_column(table: &RawTable) -> usize {
    table.column(DATE_COLUMN).unwrap_or(0)
}

/// Converts raw rows into journal entries.
///
/// Duplicate dates collapse to the last occurrence, keeping the position of
/// that last occurrence.
pub fn parse_journal(table: &RawTable) -> JournalTable {
    let date_idx = date_column(table);
    let entry_idx: Vec<usize> = ENTRY_COLUMNS
        .iter()
        .enumerate()
        .map(|(offset, name)| table.column(name).unwrap_or(date_idx + offset + 1))
        .collect();

    let mut parsed = JournalTable::default();
    for (index, row) in table.rows.iter().enumerate() {
        let raw_date = RawTable::cell(row, date_idx);
        let Some(date) = parse_entry_date(raw_date) else {
            parsed.malformed.push(MalformedRow {
                row_number: index + 1,
                raw_date: raw_date.to_string(),
            });
            continue;
        };
        parsed.entries.retain(|entry| entry.date != date);
        parsed.entries.push(JournalEntry {
            date,
            entry1: RawTable::cell(row, entry_idx[0]).to_string(),
            entry2: RawTable::cell(row, entry_idx[1]).to_string(),
            entry3: RawTable::cell(row, entry_idx[2]).to_string(),
        });
    }
    parsed
}

#[cfg(test)]
mod tests {
    use super::{journal_headers, parse_entry_date, parse_journal, JournalKind};
    use crate::model::table::RawTable;
    use chrono::NaiveDate;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, d).unwrap()
    }

    fn row(cells: &[&str]) -> Vec<String> {
        cells.iter().map(|cell| cell.to_string()).collect()
    }

    #[test]
    fn parse_entry_date_accepts_common_spellings() {
        assert_eq!(parse_entry_date("2024-01-05"), Some(day(5)));
        assert_eq!(parse_entry_date(" 2024/01/05 "), Some(day(5)));
        assert_eq!(parse_entry_date("01/05/2024"), Some(day(5)));
        assert_eq!(parse_entry_date("2024-01-05 13:45:00"), Some(day(5)));
        assert_eq!(parse_entry_date("2024-01-05T08:00:00"), Some(day(5)));
        assert_eq!(parse_entry_date("yesterday"), None);
        assert_eq!(parse_entry_date(""), None);
    }

    #[test]
    fn parse_journal_skips_malformed_rows() {
        let mut table = RawTable::new(journal_headers());
        table.rows.push(row(&["2024-01-01", "a", "b", "c"]));
        table.rows.push(row(&["not a date", "x", "y", "z"]));

        let parsed = parse_journal(&table);
        assert_eq!(parsed.entries.len(), 1);
        assert_eq!(parsed.malformed.len(), 1);
        assert_eq!(parsed.malformed[0].row_number, 2);
        assert_eq!(parsed.malformed[0].raw_date, "not a date");
    }

    #[test]
    fn parse_journal_keeps_last_duplicate() {
        let mut table = RawTable::new(journal_headers());
        table.rows.push(row(&["2024-01-01", "old", "", ""]));
        table.rows.push(row(&["2024-01-02", "other", "", ""]));
        table.rows.push(row(&["2024-01-01", "new", "", ""]));

        let parsed = parse_journal(&table);
        assert_eq!(parsed.entries.len(), 2);
        assert_eq!(parsed.entries[0].date, day(2));
        assert_eq!(parsed.entries[1].entry1, "new");
    }

    #[test]
    fn parse_journal_pads_short_rows() {
        let mut table = RawTable::new(journal_headers());
        table.rows.push(row(&["2024-01-03", "only one"]));

        let parsed = parse_journal(&table);
        assert_eq!(parsed.entries[0].entry1, "only one");
        assert_eq!(parsed.entries[0].entry3, "");
    }

    #[test]
    fn journal_kind_parse_is_case_insensitive() {
        assert_eq!(JournalKind::parse(" Work "), Some(JournalKind::Work));
        assert_eq!(JournalKind::parse("LIFE"), Some(JournalKind::Life));
        assert_eq!(JournalKind::parse("hobby"), None);
    }
}
