//! Spreadsheet backend: one worksheet tab per table.
//!
//! # Invariants
//! - Row 1 of a tab is the header row.
//! - Rewrites are clear-then-write; there is no partial update.
//! - Writes create a missing tab; reads report it as `NotFound`.

use crate::model::table::{RawTable, TableId};
use crate::sheets::SheetsClient;
use crate::store::{StoreError, StoreResult, TableBackend};
use log::debug;

/// Tables stored as tabs of one spreadsheet.
pub struct SheetsBackend {
    client: SheetsClient,
}

impl SheetsBackend {
    pub fn new(client: SheetsClient) -> Self {
        Self { client }
    }
}

impl TableBackend for SheetsBackend {
    fn backend_id(&self) -> &'static str {
        "sheets"
    }

    fn read_table(&self, table: TableId) -> StoreResult<RawTable> {
        let values = self
            .client
            .get_values(table.name())?
            .ok_or(StoreError::NotFound(table))?;
        Ok(raw_from_values(values))
    }

    fn write_table(&self, table: TableId, data: &RawTable) -> StoreResult<()> {
        if !self.client.clear(table.name())? {
            self.client.add_sheet(table.name())?;
        }
        let mut values = Vec::with_capacity(data.rows.len() + 1);
        values.push(data.headers.clone());
        values.extend(data.rows.iter().cloned());
        self.client.update_values(table.name(), &values)?;
        debug!(
            "event=sheets_write module=store status=ok tab={} rows={}",
            table,
            data.rows.len()
        );
        Ok(())
    }

    fn append_row(&self, table: TableId, headers: &[String], row: &[String]) -> StoreResult<()> {
        let needs_header = match self.client.get_values(table.name())? {
            Some(values) => values.is_empty(),
            None => {
                self.client.add_sheet(table.name())?;
                true
            }
        };
        let mut values = Vec::with_capacity(2);
        if needs_header {
            values.push(headers.to_vec());
        }
        values.push(row.to_vec());
        self.client.append_values(table.name(), &values)?;
        Ok(())
    }
}

/// First populated row is the header; trailing blank rows are dropped.
fn raw_from_values(mut values: Vec<Vec<String>>) -> RawTable {
    while values
        .last()
        .is_some_and(|row| row.iter().all(|cell| cell.trim().is_empty()))
    {
        values.pop();
    }
    if values.is_empty() {
        return RawTable::default();
    }
    let headers = values.remove(0);
    RawTable {
        headers,
        rows: values,
    }
}
