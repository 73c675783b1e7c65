//! Counters for the watcher daemon

/// Running totals across all processed files
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WatchMetrics {
    /// Scan cycles completed
    pub poll_count: usize,

    /// New `.txt` files picked up
    pub files_seen: usize,

    /// Files that produced a parsed result
    pub files_processed: usize,

    /// Files skipped because of an error
    pub files_failed: usize,

    /// Records written
    pub records_inserted: usize,

    /// Records the store rejected
    pub records_failed: usize,

    /// Fix-mode calls made
    pub repair_attempts: usize,
}

impl WatchMetrics {
    /// Create new empty metrics
    pub fn new() -> Self {
        Self::default()
    }

    /// Generate a summary report of metrics
    pub fn summary(&self) -> String {
        let lines = [
            "Notewatch Metrics Summary".to_string(),
            "=========================".to_string(),
            format!("Scan cycles: {}", self.poll_count),
            format!("Files seen: {}", self.files_seen),
            format!("  Processed: {}", self.files_processed),
            format!("  Failed: {}", self.files_failed),
            format!("Records inserted: {}", self.records_inserted),
            format!("Records rejected: {}", self.records_failed),
            format!("Repair attempts: {}", self.repair_attempts),
        ];
        lines.join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metrics_creation() {
        let metrics = WatchMetrics::new();
        assert_eq!(metrics.files_seen, 0);
        assert_eq!(metrics.records_inserted, 0);
    }

    #[test]
    fn test_summary_mentions_counts() {
        let metrics = WatchMetrics {
            files_seen: 3,
            files_failed: 1,
            records_inserted: 7,
            ..Default::default()
        };
        let summary = metrics.summary();
        assert!(summary.contains("Files seen: 3"));
        assert!(summary.contains("Failed: 1"));
        assert!(summary.contains("Records inserted: 7"));
    }
}
