//! Entry store over one table backend.
//!
//! # Responsibility
//! - Load journal/contact tables with dates normalized to calendar dates.
//! - Upsert journal entries keyed by date, append, and replace whole tables.
//!
//! # Invariants
//! - `upsert_by_date` leaves exactly one row for the written date.
//! - Upsert preserves malformed rows verbatim; it only removes rows whose
//!   parsed date equals the written date.
//! - Journal reads collapse duplicate dates to the last occurrence.

use crate::model::contact::ContactBook;
use crate::model::journal::{
    date_column, journal_headers, parse_entry_date, parse_journal, JournalEntry, JournalKind,
    JournalTable, DATE_COLUMN, DATE_FORMAT, ENTRY_COLUMNS,
};
use crate::model::table::{RawTable, TableId};
use crate::store::{StoreError, StoreResult, TableBackend};
use log::{info, warn};

/// Entry store bound to a single backend.
pub struct EntryStore<B: TableBackend> {
    backend: B,
}

impl<B: TableBackend> EntryStore<B> {
    pub fn new(backend: B) -> Self {
        Self { backend }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Loads a journal table.
    ///
    /// # Errors
    /// - `StoreError::NotFound` when the table does not exist yet.
    pub fn load_journal(&self, kind: JournalKind) -> StoreResult<JournalTable> {
        let table = kind.table();
        let raw = self.backend.read_table(table)?;
        let parsed = parse_journal(&raw);
        for row in &parsed.malformed {
            warn!(
                "event=row_skipped module=store status=malformed table={} backend={} row={}",
                table,
                self.backend.backend_id(),
                row.row_number
            );
        }
        info!(
            "event=table_load module=store status=ok table={} backend={} rows={} skipped={}",
            table,
            self.backend.backend_id(),
            parsed.entries.len(),
            parsed.malformed.len()
        );
        Ok(parsed)
    }

    /// Loads journal entries sorted newest first.
    pub fn list_recent(&self, kind: JournalKind) -> StoreResult<Vec<JournalEntry>> {
        let mut entries = self.load_journal(kind)?.entries;
        entries.sort_by(|left, right| right.date.cmp(&left.date));
        Ok(entries)
    }

    /// Replaces any row with `entry.date` and persists the full table.
    ///
    /// Creates the table with the canonical journal header when absent.
    pub fn upsert_by_date(&self, kind: JournalKind, entry: &JournalEntry) -> StoreResult<()> {
        let table = kind.table();
        let mut raw = match self.backend.read_table(table) {
            Ok(raw) => raw,
            Err(StoreError::NotFound(_)) => RawTable::new(journal_headers()),
            Err(err) => return Err(err),
        };
        if raw.headers.is_empty() {
            raw.headers = journal_headers();
        }

        let date_idx = date_column(&raw);
        let before = raw.rows.len();
        raw.rows.retain(|row| {
            parse_entry_date(RawTable::cell(row, date_idx)) != Some(entry.date)
        });
        let replaced = before - raw.rows.len();
        raw.rows.push(entry_row(&raw.headers, entry));

        self.backend.write_table(table, &raw)?;
        info!(
            "event=entry_upsert module=store status=ok table={} backend={} replaced={} rows={}",
            table,
            self.backend.backend_id(),
            replaced,
            raw.rows.len()
        );
        Ok(())
    }

    /// Appends an entry without deduplicating its date.
    pub fn append_only(&self, kind: JournalKind, entry: &JournalEntry) -> StoreResult<()> {
        let table = kind.table();
        let headers = journal_headers();
        self.backend
            .append_row(table, &headers, &entry_row(&headers, entry))?;
        info!(
            "event=entry_append module=store status=ok table={} backend={}",
            table,
            self.backend.backend_id()
        );
        Ok(())
    }

    /// Loads the contact book.
    ///
    /// # Errors
    /// - `StoreError::NotFound` when no contacts were imported yet.
    pub fn load_contacts(&self) -> StoreResult<ContactBook> {
        let raw = self.backend.read_table(TableId::Contacts)?;
        let book = ContactBook::from_raw(&raw);
        info!(
            "event=table_load module=store status=ok table={} backend={} rows={}",
            TableId::Contacts,
            self.backend.backend_id(),
            book.len()
        );
        Ok(book)
    }

    /// Clears `table` and writes header plus `data` rows.
    pub fn replace_all(&self, table: TableId, data: &RawTable) -> StoreResult<()> {
        if data.headers.is_empty() {
            return Err(StoreError::InvalidData(format!(
                "refusing to write `{table}` without a header row"
            )));
        }
        self.backend.write_table(table, data)?;
        info!(
            "event=table_replace module=store status=ok table={} backend={} rows={}",
            table,
            self.backend.backend_id(),
            data.rows.len()
        );
        Ok(())
    }

    /// Replaces the contact table with `book`.
    pub fn replace_contacts(&self, book: &ContactBook) -> StoreResult<()> {
        self.replace_all(TableId::Contacts, &book.to_raw())
    }
}

/// Lays out `entry` under `headers`, keeping unknown columns empty.
fn entry_row(headers: &[String], entry: &JournalEntry) -> Vec<String> {
    if !headers.iter().any(|header| header.trim() == DATE_COLUMN) {
        return entry.to_row();
    }
    let texts = entry.entries();
    headers
        .iter()
        .map(|header| {
            let header = header.trim();
            if header == DATE_COLUMN {
                return entry.date.format(DATE_FORMAT).to_string();
            }
            ENTRY_COLUMNS
                .iter()
                .position(|column| *column == header)
                .map(|idx| texts[idx].to_string())
                .unwrap_or_default()
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::entry_row;
    use crate::model::journal::{journal_headers, JournalEntry};
    use chrono::NaiveDate;

    #[test]
    fn entry_row_follows_existing_header_order() {
        let headers = vec![
            "Entry 2".to_string(),
            "Date".to_string(),
            "Mood".to_string(),
            "Entry 1".to_string(),
        ];
        let entry = JournalEntry::new(NaiveDate::from_ymd_opt(2024, 2, 1).unwrap(), "a", "b", "c");

        assert_eq!(entry_row(&headers, &entry), vec!["b", "2024-02-01", "", "a"]);
    }

    #[test]
    fn entry_row_uses_canonical_order_for_canonical_header() {
        let entry = JournalEntry::new(NaiveDate::from_ymd_opt(2024, 2, 1).unwrap(), "a", "b", "c");
        assert_eq!(
            entry_row(&journal_headers(), &entry),
            vec!["2024-02-01", "a", "b", "c"]
        );
    }
}
