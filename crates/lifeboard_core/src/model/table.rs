//! Logical table identity and backend-level table shape.

use std::fmt::{Display, Formatter};

/// Logical tables owned by the entry store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum TableId {
    Contacts,
    LifeJournal,
    WorkJournal,
}

impl TableId {
    /// Every table, in display order.
    pub const ALL: [TableId; 3] = [Self::Contacts, Self::LifeJournal, Self::WorkJournal];

    /// Stable table name, used as spreadsheet tab name and SQLite key.
    pub fn name(self) -> &'static str {
        match self {
            Self::Contacts => "Contacts",
            Self::LifeJournal => "Life_Journal",
            Self::WorkJournal => "Work_Journal",
        }
    }

    /// File name used by the flat-file backend.
    pub fn file_name(self) -> &'static str {
        match self {
            Self::Contacts => "contacts.csv",
            Self::LifeJournal => "life_journal.csv",
            Self::WorkJournal => "work_journal.csv",
        }
    }
}

impl Display for TableId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Header row plus string cells, as every backend stores them.
///
/// Rows may be shorter or longer than the header; readers pad with empty
/// cells and ignore surplus cells.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawTable {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl RawTable {
    pub fn new(headers: Vec<String>) -> Self {
        Self {
            headers,
            rows: Vec::new(),
        }
    }

    /// Index of a column by exact header name.
    pub fn column(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|header| header.trim() == name)
    }

    /// Cell value for `row` at `column`, empty when the row is short.
    pub fn cell<'a>(row: &'a [String], column: usize) -> &'a str {
        row.get(column).map(String::as_str).unwrap_or("")
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}
