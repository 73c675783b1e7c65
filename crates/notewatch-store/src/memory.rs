//! In-memory record store

use crate::StoreError;
use notewatch_domain::traits::RecordStore;
use notewatch_domain::Record;
use std::collections::HashSet;

/// Vec-backed implementation of RecordStore
///
/// Insert attempts are numbered from zero. Attempts listed with
/// [`MemoryStore::fail_on`] are rejected with [`StoreError::Unavailable`],
/// which lets tests exercise partial-insert behavior.
#[derive(Debug, Default)]
pub struct MemoryStore {
    records: Vec<Record>,
    attempts: usize,
    failing: HashSet<usize>,
}

impl MemoryStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Reject the insert attempt with the given zero-based index
    pub fn fail_on(mut self, attempt: usize) -> Self {
        self.failing.insert(attempt);
        self
    }

    /// Stored records, in insertion order
    pub fn records(&self) -> &[Record] {
        &self.records
    }

    /// Number of insert attempts, successful or not
    pub fn attempts(&self) -> usize {
        self.attempts
    }
}

impl RecordStore for MemoryStore {
    type Error = StoreError;

    fn insert_record(&mut self, record: Record) -> Result<(), Self::Error> {
        let attempt = self.attempts;
        self.attempts += 1;

        if self.failing.contains(&attempt) {
            return Err(StoreError::Unavailable(format!(
                "insert #{} for '{}' rejected",
                attempt, record.filename
            )));
        }

        self.records.push(record);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use notewatch_domain::Section;

    #[test]
    fn test_failure_injection_only_hits_selected_attempt() {
        let mut store = MemoryStore::new().fail_on(1);

        assert!(store.insert_record(Record::stamped(Section::default(), "a.txt")).is_ok());
        assert!(store.insert_record(Record::stamped(Section::default(), "a.txt")).is_err());
        assert!(store.insert_record(Record::stamped(Section::default(), "a.txt")).is_ok());

        assert_eq!(store.attempts(), 3);
        assert_eq!(store.records().len(), 2);
    }
}
