//! SQLite backend: every logical table in one local database.
//!
//! # Invariants
//! - A table exists once its header row has been written.
//! - Row order is the `position` column, dense from 0 after every rewrite.

use crate::db::{open_db, open_db_in_memory};
use crate::model::table::{RawTable, TableId};
use crate::store::{StoreError, StoreResult, TableBackend};
use rusqlite::{params, Connection, OptionalExtension, Transaction};
use std::path::Path;

/// Database-backed table store.
pub struct SqliteBackend {
    conn: Connection,
}

impl SqliteBackend {
    /// Opens (and migrates) the database file at `path`.
    pub fn open(path: impl AsRef<Path>) -> StoreResult<Self> {
        Ok(Self {
            conn: open_db(path)?,
        })
    }

    pub fn open_in_memory() -> StoreResult<Self> {
        Ok(Self {
            conn: open_db_in_memory()?,
        })
    }

    pub fn connection(&self) -> &Connection {
        &self.conn
    }
}

impl TableBackend for SqliteBackend {
    fn backend_id(&self) -> &'static str {
        "sqlite"
    }

    fn read_table(&self, table: TableId) -> StoreResult<RawTable> {
        let headers_json: Option<String> = self
            .conn
            .query_row(
                "SELECT headers_json FROM dashboard_tables WHERE name = ?1;",
                [table.name()],
                |row| row.get(0),
            )
            .optional()?;
        let Some(headers_json) = headers_json else {
            return Err(StoreError::NotFound(table));
        };

        let mut stmt = self.conn.prepare(
            "SELECT cells_json FROM dashboard_rows
             WHERE table_name = ?1
             ORDER BY position ASC;",
        )?;
        let mut rows = stmt.query([table.name()])?;
        let mut cells = Vec::new();
        while let Some(row) = rows.next()? {
            let json: String = row.get(0)?;
            cells.push(decode_cells(table, &json)?);
        }

        Ok(RawTable {
            headers: decode_cells(table, &headers_json)?,
            rows: cells,
        })
    }

    fn write_table(&self, table: TableId, data: &RawTable) -> StoreResult<()> {
        let tx = self.conn.unchecked_transaction()?;
        upsert_headers(&tx, table, &data.headers)?;
        tx.execute(
            "DELETE FROM dashboard_rows WHERE table_name = ?1;",
            [table.name()],
        )?;
        {
            let mut insert = tx.prepare(
                "INSERT INTO dashboard_rows (table_name, position, cells_json)
                 VALUES (?1, ?2, ?3);",
            )?;
            for (position, row) in data.rows.iter().enumerate() {
                insert.execute(params![table.name(), position as i64, encode_cells(row)?])?;
            }
        }
        tx.commit()?;
        Ok(())
    }

    fn append_row(&self, table: TableId, headers: &[String], row: &[String]) -> StoreResult<()> {
        let tx = self.conn.unchecked_transaction()?;
        tx.execute(
            "INSERT OR IGNORE INTO dashboard_tables (name, headers_json) VALUES (?1, ?2);",
            params![table.name(), encode_cells(headers)?],
        )?;
        tx.execute(
            "INSERT INTO dashboard_rows (table_name, position, cells_json)
             SELECT ?1, COALESCE(MAX(position), -1) + 1, ?2
             FROM dashboard_rows WHERE table_name = ?1;",
            params![table.name(), encode_cells(row)?],
        )?;
        tx.commit()?;
        Ok(())
    }
}

fn upsert_headers(tx: &Transaction<'_>, table: TableId, headers: &[String]) -> StoreResult<()> {
    tx.execute(
        "INSERT INTO dashboard_tables (name, headers_json)
         VALUES (?1, ?2)
         ON CONFLICT(name) DO UPDATE SET
            headers_json = excluded.headers_json,
            updated_at = (strftime('%s', 'now') * 1000);",
        params![table.name(), encode_cells(headers)?],
    )?;
    Ok(())
}

fn encode_cells(cells: &[String]) -> StoreResult<String> {
    serde_json::to_string(cells)
        .map_err(|err| StoreError::InvalidData(format!("failed to encode cells: {err}")))
}

fn decode_cells(table: TableId, json: &str) -> StoreResult<Vec<String>> {
    serde_json::from_str(json).map_err(|err| {
        StoreError::InvalidData(format!("invalid cells json in table `{table}`: {err}"))
    })
}
