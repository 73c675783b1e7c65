//! Integration tests for notewatch-store
//!
//! These tests verify records survive a reopen of an on-disk database.

use notewatch_domain::traits::RecordStore;
use notewatch_domain::{Record, Section};
use notewatch_store::SqliteStore;
use tempfile::TempDir;

#[test]
fn test_store_initialization() {
    let store = SqliteStore::new(":memory:");
    assert!(store.is_ok(), "Store should initialize successfully");
}

#[test]
fn test_records_persist_across_reopen() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("notes.db");

    {
        let mut store = SqliteStore::new(&path).unwrap();
        for title in ["First", "Second", "Third"] {
            let section = Section::new(title, "", vec!["t".to_string()], format!("{} body", title));
            store.insert_record(Record::stamped(section, "note.txt")).unwrap();
        }
        store.close().unwrap();
    }

    let store = SqliteStore::new(&path).unwrap();
    let records = store.records_for("note.txt").unwrap();

    let titles: Vec<_> = records.iter().map(|r| r.title.as_str()).collect();
    assert_eq!(titles, vec!["First", "Second", "Third"]);
    assert_eq!(records[1].original, "Second body");
    assert!(records.iter().all(|r| r.timestamp > 0.0));
}

#[test]
fn test_records_are_scoped_by_filename() {
    let mut store = SqliteStore::new(":memory:").unwrap();
    store.insert_record(Record::stamped(Section::new("A", "", vec![], ""), "a.txt")).unwrap();
    store.insert_record(Record::stamped(Section::new("B", "", vec![], ""), "b.txt")).unwrap();

    assert_eq!(store.records_for("a.txt").unwrap().len(), 1);
    assert_eq!(store.records_for("b.txt").unwrap()[0].title, "B");
    assert_eq!(store.count().unwrap(), 2);
}

#[test]
fn test_empty_tags_round_trip_as_empty_list() {
    let mut store = SqliteStore::new(":memory:").unwrap();
    store.insert_record(Record::stamped(Section::default(), "empty.txt")).unwrap();

    let records = store.records_for("empty.txt").unwrap();
    assert_eq!(records[0].tags, Vec::<String>::new());
}
