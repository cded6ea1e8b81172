//! Entry store: table persistence behind interchangeable backends.
//!
//! # Responsibility
//! - Define the backend contract every table store implements.
//! - Keep file/spreadsheet/SQLite details out of filters and services.
//!
//! # Invariants
//! - Backends return `StoreError::NotFound` for tables that do not exist yet.
//! - Every write is durable when the call returns; there is no batching.
//! - Only the entry store mutates table rows.

pub mod csv_backend;
pub mod entry_store;
pub mod sheets_backend;
pub mod sqlite_backend;

use crate::db::DbError;
use crate::model::table::{RawTable, TableId};
use crate::sheets::SheetsError;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type StoreResult<T> = Result<T, StoreError>;

/// Store error for table read/write operations.
#[derive(Debug)]
pub enum StoreError {
    /// Backing table does not exist yet. Callers treat it as empty.
    NotFound(TableId),
    Io(std::io::Error),
    Csv(csv::Error),
    Db(DbError),
    Remote(SheetsError),
    InvalidData(String),
}

impl StoreError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotFound(table) => write!(f, "table not found: {table}"),
            Self::Io(err) => write!(f, "{err}"),
            Self::Csv(err) => write!(f, "{err}"),
            Self::Db(err) => write!(f, "{err}"),
            Self::Remote(err) => write!(f, "{err}"),
            Self::InvalidData(message) => write!(f, "invalid stored table data: {message}"),
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io(err) => Some(err),
            Self::Csv(err) => Some(err),
            Self::Db(err) => Some(err),
            Self::Remote(err) => Some(err),
            Self::NotFound(_) | Self::InvalidData(_) => None,
        }
    }
}

impl From<std::io::Error> for StoreError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<csv::Error> for StoreError {
    fn from(value: csv::Error) -> Self {
        Self::Csv(value)
    }
}

impl From<DbError> for StoreError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for StoreError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

impl From<SheetsError> for StoreError {
    fn from(value: SheetsError) -> Self {
        Self::Remote(value)
    }
}

/// Raw table access implemented by each storage backend.
pub trait TableBackend {
    /// Short stable id used in log events (`csv`, `sheets`, `sqlite`).
    fn backend_id(&self) -> &'static str;

    /// Reads header and all rows.
    fn read_table(&self, table: TableId) -> StoreResult<RawTable>;

    /// Replaces the whole table, creating it when absent.
    fn write_table(&self, table: TableId, data: &RawTable) -> StoreResult<()>;

    /// Appends one row. Creates the table with `headers` when absent.
    fn append_row(&self, table: TableId, headers: &[String], row: &[String]) -> StoreResult<()>;
}

impl<B: TableBackend + ?Sized> TableBackend for Box<B> {
    fn backend_id(&self) -> &'static str {
        (**self).backend_id()
    }

    fn read_table(&self, table: TableId) -> StoreResult<RawTable> {
        (**self).read_table(table)
    }

    fn write_table(&self, table: TableId, data: &RawTable) -> StoreResult<()> {
        (**self).write_table(table, data)
    }

    fn append_row(&self, table: TableId, headers: &[String], row: &[String]) -> StoreResult<()> {
        (**self).append_row(table, headers, row)
    }
}
