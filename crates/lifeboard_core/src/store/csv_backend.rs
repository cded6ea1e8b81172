//! Flat-file backend: one CSV file per table.
//!
//! # Invariants
//! - Files always start with a header row.
//! - A missing file is reported as `StoreError::NotFound`.

use crate::model::table::{RawTable, TableId};
use crate::store::{StoreError, StoreResult, TableBackend};
use csv::{ReaderBuilder, WriterBuilder};
use log::debug;
use std::fs::{self, OpenOptions};
use std::path::{Path, PathBuf};

/// CSV files stored under one data directory.
pub struct CsvBackend {
    dir: PathBuf,
}

impl CsvBackend {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Full path of the file backing `table`.
    pub fn table_path(&self, table: TableId) -> PathBuf {
        self.dir.join(table.file_name())
    }
}

impl TableBackend for CsvBackend {
    fn backend_id(&self) -> &'static str {
        "csv"
    }

    fn read_table(&self, table: TableId) -> StoreResult<RawTable> {
        let path = self.table_path(table);
        if !path.is_file() {
            return Err(StoreError::NotFound(table));
        }
        let file = fs::File::open(&path)?;
        read_csv(file)
    }

    fn write_table(&self, table: TableId, data: &RawTable) -> StoreResult<()> {
        fs::create_dir_all(&self.dir)?;
        let path = self.table_path(table);
        let mut writer = WriterBuilder::new().flexible(true).from_path(&path)?;
        writer.write_record(&data.headers)?;
        for row in &data.rows {
            writer.write_record(row)?;
        }
        writer.flush()?;
        debug!(
            "event=csv_write module=store status=ok file={} rows={}",
            table.file_name(),
            data.rows.len()
        );
        Ok(())
    }

    fn append_row(&self, table: TableId, headers: &[String], row: &[String]) -> StoreResult<()> {
        let path = self.table_path(table);
        if !path.is_file() {
            let mut data = RawTable::new(headers.to_vec());
            data.rows.push(row.to_vec());
            return self.write_table(table, &data);
        }
        let file = OpenOptions::new().append(true).open(&path)?;
        let mut writer = WriterBuilder::new()
            .has_headers(false)
            .flexible(true)
            .from_writer(file);
        writer.write_record(row)?;
        writer.flush()?;
        Ok(())
    }
}

/// Parses CSV text with a header row into a `RawTable`.
///
/// Used for both stored tables and uploaded contact files.
pub fn read_csv<R: std::io::Read>(source: R) -> StoreResult<RawTable> {
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::Headers)
        .from_reader(source);
    let headers = reader
        .headers()?
        .iter()
        .map(str::to_string)
        .collect::<Vec<_>>();
    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record?;
        rows.push(record.iter().map(str::to_string).collect());
    }
    Ok(RawTable { headers, rows })
}

#[cfg(test)]
mod tests {
    use super::{read_csv, CsvBackend};
    use crate::model::table::{RawTable, TableId};
    use crate::store::{StoreError, TableBackend};

    #[test]
    fn read_missing_file_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let backend = CsvBackend::new(dir.path());
        let err = backend.read_table(TableId::LifeJournal).unwrap_err();
        assert!(matches!(err, StoreError::NotFound(TableId::LifeJournal)));
    }

    #[test]
    fn read_csv_handles_quoted_commas() {
        let text = "Name,Phone,Category\n\"Doe, Jane\",555-0100,Family\n";
        let table = read_csv(text.as_bytes()).unwrap();
        assert_eq!(table.headers, vec!["Name", "Phone", "Category"]);
        assert_eq!(table.rows[0][0], "Doe, Jane");
    }

    #[test]
    fn append_creates_file_with_header_then_appends() {
        let dir = tempfile::tempdir().unwrap();
        let backend = CsvBackend::new(dir.path().join("nested"));
        let headers = vec!["Date".to_string(), "Entry 1".to_string()];

        backend
            .append_row(TableId::WorkJournal, &headers, &["2024-01-01".into(), "a".into()])
            .unwrap();
        backend
            .append_row(TableId::WorkJournal, &headers, &["2024-01-01".into(), "b".into()])
            .unwrap();

        let table = backend.read_table(TableId::WorkJournal).unwrap();
        assert_eq!(table.headers, headers);
        assert_eq!(table.rows.len(), 2);
        assert_eq!(table.rows[1][1], "b");
    }

    #[test]
    fn write_table_replaces_previous_content() {
        let dir = tempfile::tempdir().unwrap();
        let backend = CsvBackend::new(dir.path());
        let mut data = RawTable::new(vec!["Name".into()]);
        data.rows.push(vec!["first".into()]);
        backend.write_table(TableId::Contacts, &data).unwrap();

        data.rows = vec![vec!["second".into()]];
        backend.write_table(TableId::Contacts, &data).unwrap();

        let table = backend.read_table(TableId::Contacts).unwrap();
        assert_eq!(table.rows, vec![vec!["second".to_string()]]);
    }
}
