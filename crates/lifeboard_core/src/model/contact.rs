//! Contact domain model.
//!
//! # Responsibility
//! - Define the rolodex record with pass-through extra columns.
//! - Convert between contact books and backend `RawTable` rows.
//!
//! # Invariants
//! - `category` is never empty; it defaults to `Uncategorized`.
//! - Extra columns keep their original header order on rewrite.

use crate::model::table::RawTable;
use serde::Serialize;

pub const NAME_COLUMN: &str = "Name";
pub const CATEGORY_COLUMN: &str = "Category";
pub const DEFAULT_CATEGORY: &str = "Uncategorized";

/// Category selector value that matches every contact.
pub const ALL_CONTACTS: &str = "All Contacts";

/// Suggested categories offered to the user. Not validated.
pub const SUGGESTED_CATEGORIES: &[&str] =
    &["Family", "Friends", "Work", "Networking", DEFAULT_CATEGORY];

/// One rolodex row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Contact {
    pub name: String,
    pub category: String,
    /// Remaining columns as `(header, value)` pairs, e.g. `Phone`.
    pub extra: Vec<(String, String)>,
}

impl Contact {
    pub fn new(name: impl Into<String>, category: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            category: normalize_category(category.into()),
            extra: Vec::new(),
        }
    }

    pub fn with_field(mut self, column: impl Into<String>, value: impl Into<String>) -> Self {
        self.extra.push((column.into(), value.into()));
        self
    }

    /// Value of an extra column by header name.
    pub fn field(&self, column: &str) -> Option<&str> {
        self.extra
            .iter()
            .find(|(header, _)| header == column)
            .map(|(_, value)| value.as_str())
    }
}

/// Contacts plus the column order they were imported with.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContactBook {
    /// Full header, always containing `Name` and `Category`.
    pub columns: Vec<String>,
    pub contacts: Vec<Contact>,
}

impl ContactBook {
    /// Builds a book from raw rows, adding a `Category` column when absent.
    pub fn from_raw(table: &RawTable) -> Self {
        let mut columns: Vec<String> = table
            .headers
            .iter()
            .map(|header| header.trim().to_string())
            .collect();
        if !columns.iter().any(|column| column == NAME_COLUMN) {
            columns.insert(0, NAME_COLUMN.to_string());
        }
        if !columns.iter().any(|column| column == CATEGORY_COLUMN) {
            columns.push(CATEGORY_COLUMN.to_string());
        }

        let name_idx = table.column(NAME_COLUMN);
        let category_idx = table.column(CATEGORY_COLUMN);
        let contacts = table
            .rows
            .iter()
            .map(|row| {
                let extra = table
                    .headers
                    .iter()
                    .enumerate()
                    .filter(|(idx, _)| Some(*idx) != name_idx && Some(*idx) != category_idx)
                    .map(|(idx, header)| {
                        (header.trim().to_string(), RawTable::cell(row, idx).to_string())
                    })
                    .collect();
                Contact {
                    name: name_idx
                        .map(|idx| RawTable::cell(row, idx).to_string())
                        .unwrap_or_default(),
                    category: normalize_category(
                        category_idx
                            .map(|idx| RawTable::cell(row, idx).to_string())
                            .unwrap_or_default(),
                    ),
                    extra,
                }
            })
            .collect();

        Self { columns, contacts }
    }

    /// Renders the book as header plus rows in `columns` order.
    ///
    /// The first `Name` and `Category` columns hold those fields; every other
    /// column takes the next extra cell by position, so repeated headers keep
    /// their own values.
    pub fn to_raw(&self) -> RawTable {
        let rows = self
            .contacts
            .iter()
            .map(|contact| {
                let mut name_seen = false;
                let mut category_seen = false;
                let mut extra_idx = 0;
                self.columns
                    .iter()
                    .map(|column| match column.as_str() {
                        NAME_COLUMN if !name_seen => {
                            name_seen = true;
                            contact.name.clone()
                        }
                        CATEGORY_COLUMN if !category_seen => {
                            category_seen = true;
                            contact.category.clone()
                        }
                        other => {
                            let cell = match contact.extra.get(extra_idx) {
                                Some((header, value)) if header == other => value.as_str(),
                                _ => contact.field(other).unwrap_or_default(),
                            };
                            extra_idx += 1;
                            cell.to_string()
                        }
                    })
                    .collect()
            })
            .collect();
        RawTable {
            headers: self.columns.clone(),
            rows,
        }
    }

    pub fn len(&self) -> usize {
        self.contacts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.contacts.is_empty()
    }
}

fn normalize_category(value: String) -> String {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        DEFAULT_CATEGORY.to_string()
    } else {
        trimmed.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::{Contact, ContactBook, DEFAULT_CATEGORY};
    use crate::model::table::RawTable;

    fn raw(headers: &[&str], rows: &[&[&str]]) -> RawTable {
        RawTable {
            headers: headers.iter().map(|h| h.to_string()).collect(),
            rows: rows
                .iter()
                .map(|row| row.iter().map(|cell| cell.to_string()).collect())
                .collect(),
        }
    }

    #[test]
    fn missing_category_column_defaults_to_uncategorized() {
        let book = ContactBook::from_raw(&raw(&["Name", "Phone"], &[&["Ada", "555-0100"]]));

        assert_eq!(book.columns, vec!["Name", "Phone", "Category"]);
        assert_eq!(book.contacts[0].category, DEFAULT_CATEGORY);
        assert_eq!(book.contacts[0].field("Phone"), Some("555-0100"));
    }

    #[test]
    fn empty_category_cell_defaults_to_uncategorized() {
        let book = ContactBook::from_raw(&raw(&["Name", "Category"], &[&["Bo", " "]]));
        assert_eq!(book.contacts[0].category, DEFAULT_CATEGORY);
    }

    #[test]
    fn to_raw_keeps_column_order() {
        let book = ContactBook::from_raw(&raw(
            &["Phone", "Name", "Category"],
            &[&["555-0101", "Cy", "Work"]],
        ));
        let table = book.to_raw();

        assert_eq!(table.headers, vec!["Phone", "Name", "Category"]);
        assert_eq!(table.rows[0], vec!["555-0101", "Cy", "Work"]);
    }

    #[test]
    fn repeated_headers_keep_their_own_cells() {
        let book = ContactBook::from_raw(&raw(
            &["Name", "Phone", "Phone", "Category"],
            &[&["Ada", "111", "222", "Work"]],
        ));
        let table = book.to_raw();

        assert_eq!(table.headers, vec!["Name", "Phone", "Phone", "Category"]);
        assert_eq!(table.rows[0], vec!["Ada", "111", "222", "Work"]);
    }

    #[test]
    fn builder_sets_extra_fields() {
        let contact = Contact::new("Di", "").with_field("Email", "di@example.com");
        assert_eq!(contact.category, DEFAULT_CATEGORY);
        assert_eq!(contact.field("Email"), Some("di@example.com"));
        assert_eq!(contact.field("Phone"), None);
    }
}
