//! Project sections into records and write them to the store

use crate::types::MaterializeReport;
use notewatch_domain::traits::RecordStore;
use notewatch_domain::{Record, Section};
use std::fmt;
use tracing::warn;

/// Insert one record per section, in section order
///
/// Each record is stamped when it is built, so records from one file may
/// carry different timestamps. A rejected insert is logged and counted;
/// the remaining sections are still attempted and nothing is rolled back.
pub fn materialize<S>(store: &mut S, filename: &str, sections: Vec<Section>) -> MaterializeReport
where
    S: RecordStore,
    S::Error: fmt::Display,
{
    let mut report = MaterializeReport::default();

    for (idx, section) in sections.into_iter().enumerate() {
        let record = Record::stamped(section, filename);
        match store.insert_record(record) {
            Ok(()) => report.inserted += 1,
            Err(e) => {
                warn!("Failed to insert section {} of {}: {}", idx, filename, e);
                report.failed += 1;
            }
        }
    }

    report
}
