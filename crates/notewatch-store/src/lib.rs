//! Notewatch Storage Layer
//!
//! Implements the `RecordStore` trait.
//!
//! # Stores
//!
//! - `SqliteStore`: durable storage in a single `records` table
//! - `MemoryStore`: in-process storage for tests and dry runs, with
//!   optional failure injection
//!
//! No uniqueness constraint is enforced: processing the same file twice
//! yields two sets of records.
//!
//! # Examples
//!
//! ```
//! use notewatch_domain::{Record, Section};
//! use notewatch_domain::traits::RecordStore;
//! use notewatch_store::SqliteStore;
//!
//! let mut store = SqliteStore::new(":memory:").unwrap();
//! store.insert_record(Record::stamped(Section::default(), "note.txt")).unwrap();
//! assert_eq!(store.count().unwrap(), 1);
//! ```

#![warn(missing_docs)]

mod memory;

pub use memory::MemoryStore;

use notewatch_domain::traits::RecordStore;
use notewatch_domain::Record;
use rusqlite::{params, Connection};
use std::path::Path;
use thiserror::Error;

/// Errors that can occur during storage operations
#[derive(Error, Debug)]
pub enum StoreError {
    /// Database error
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// Invalid data format
    #[error("Invalid data: {0}")]
    InvalidData(String),

    /// Store refused the write
    #[error("Store unavailable: {0}")]
    Unavailable(String),
}

const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS records (
    id        INTEGER PRIMARY KEY AUTOINCREMENT,
    filename  TEXT NOT NULL,
    title     TEXT NOT NULL,
    summary   TEXT NOT NULL,
    tags      TEXT NOT NULL,
    original  TEXT NOT NULL,
    timestamp REAL NOT NULL
);
CREATE INDEX IF NOT EXISTS idx_records_filename ON records(filename);
";

/// SQLite-based implementation of RecordStore
///
/// One long-lived connection, reused for every insert.
///
/// # Thread Safety
///
/// SQLite connections are not thread-safe. The pipeline uses the store
/// sequentially from a single task.
pub struct SqliteStore {
    conn: Connection,
}

impl SqliteStore {
    /// Open (or create) the database at `path` and ensure the schema exists
    ///
    /// Use `:memory:` for an in-memory database (useful for testing).
    pub fn new<P: AsRef<Path>>(path: P) -> Result<Self, StoreError> {
        let conn = Connection::open(path)?;
        conn.execute_batch(SCHEMA)?;
        Ok(Self { conn })
    }

    /// Number of stored records
    pub fn count(&self) -> Result<usize, StoreError> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM records", [], |row| row.get(0))?;
        Ok(count as usize)
    }

    /// All records for `filename`, in insertion order
    pub fn records_for(&self, filename: &str) -> Result<Vec<Record>, StoreError> {
        let mut stmt = self.conn.prepare(
            "SELECT filename, title, summary, tags, original, timestamp
             FROM records WHERE filename = ?1 ORDER BY id",
        )?;

        let rows = stmt.query_map(params![filename], |row| {
            Ok((
                row.get::<_, String>(0)?,
                row.get::<_, String>(1)?,
                row.get::<_, String>(2)?,
                row.get::<_, String>(3)?,
                row.get::<_, String>(4)?,
                row.get::<_, f64>(5)?,
            ))
        })?;

        let mut records = Vec::new();
        for row in rows {
            let (filename, title, summary, tags, original, timestamp) = row?;
            let tags: Vec<String> = serde_json::from_str(&tags)
                .map_err(|e| StoreError::InvalidData(format!("Bad tags column: {}", e)))?;
            records.push(Record {
                filename,
                title,
                summary,
                tags,
                original,
                timestamp,
            });
        }
        Ok(records)
    }

    /// Close the underlying connection
    pub fn close(self) -> Result<(), StoreError> {
        self.conn.close().map_err(|(_, e)| StoreError::Database(e))
    }
}

impl RecordStore for SqliteStore {
    type Error = StoreError;

    fn insert_record(&mut self, record: Record) -> Result<(), Self::Error> {
        let tags = serde_json::to_string(&record.tags)
            .map_err(|e| StoreError::InvalidData(format!("Unserializable tags: {}", e)))?;

        self.conn.execute(
            "INSERT INTO records (filename, title, summary, tags, original, timestamp)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                &record.filename,
                &record.title,
                &record.summary,
                &tags,
                &record.original,
                record.timestamp,
            ],
        )?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use notewatch_domain::Section;

    fn record(filename: &str, title: &str, tags: &[&str]) -> Record {
        let tags = tags.iter().map(|t| t.to_string()).collect();
        Record::from_section(Section::new(title, "summary", tags, "original text"), filename, 1000.25)
    }

    #[test]
    fn test_empty_store_has_no_records() {
        let store = SqliteStore::new(":memory:").unwrap();
        assert_eq!(store.count().unwrap(), 0);
        assert!(store.records_for("note.txt").unwrap().is_empty());
    }

    #[test]
    fn test_insert_and_read_back() {
        let mut store = SqliteStore::new(":memory:").unwrap();
        store.insert_record(record("note.txt", "Intro", &["a", "b"])).unwrap();

        let records = store.records_for("note.txt").unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0], record("note.txt", "Intro", &["a", "b"]));
    }

    #[test]
    fn test_duplicates_are_allowed() {
        let mut store = SqliteStore::new(":memory:").unwrap();
        store.insert_record(record("note.txt", "Same", &[])).unwrap();
        store.insert_record(record("note.txt", "Same", &[])).unwrap();
        assert_eq!(store.count().unwrap(), 2);
    }

    #[test]
    fn test_close() {
        let store = SqliteStore::new(":memory:").unwrap();
        assert!(store.close().is_ok());
    }
}
