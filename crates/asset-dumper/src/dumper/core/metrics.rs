//! Counters for a dump run
//!
//! `DumpMetrics` is updated from concurrently running download futures;
//! `DumpSummary` is derived from the final records once every download has
//! settled.

use std::sync::atomic::{AtomicU64, Ordering};

use super::AssetRecord;

/// Live counters shared by all download futures of one run
#[derive(Debug, Default)]
pub struct DumpMetrics {
    pub settled: AtomicU64,
    pub succeeded: AtomicU64,
    pub failed: AtomicU64,
    pub bytes_written: AtomicU64,
}

impl DumpMetrics {
    /// Record a successful download and write, returning the settled count
    pub fn record_success(&self, size: u64) -> u64 {
        self.succeeded.fetch_add(1, Ordering::Relaxed);
        self.bytes_written.fetch_add(size, Ordering::Relaxed);
        self.settled.fetch_add(1, Ordering::Relaxed) + 1
    }

    /// Record a failed download or write, returning the settled count
    pub fn record_failure(&self) -> u64 {
        self.failed.fetch_add(1, Ordering::Relaxed);
        self.settled.fetch_add(1, Ordering::Relaxed) + 1
    }

    /// Get a snapshot of current metrics
    pub fn snapshot(&self) -> DumpMetricsSnapshot {
        DumpMetricsSnapshot {
            settled: self.settled.load(Ordering::Relaxed),
            succeeded: self.succeeded.load(Ordering::Relaxed),
            failed: self.failed.load(Ordering::Relaxed),
            bytes_written: self.bytes_written.load(Ordering::Relaxed),
        }
    }
}

/// Immutable snapshot of dump metrics
#[derive(Debug, Clone, PartialEq)]
pub struct DumpMetricsSnapshot {
    pub settled: u64,
    pub succeeded: u64,
    pub failed: u64,
    pub bytes_written: u64,
}

/// Success/failure totals for a finished batch
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DumpSummary {
    pub total: usize,
    pub succeeded: usize,
    pub failed: usize,
}

impl DumpSummary {
    pub fn from_records(records: &[AssetRecord]) -> Self {
        let succeeded = records.iter().filter(|record| record.success).count();
        Self {
            total: records.len(),
            succeeded,
            failed: records.len() - succeeded,
        }
    }
}

impl std::fmt::Display for DumpSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} assets downloaded. {} succeeded, {} failed.",
            self.total, self.succeeded, self.failed
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(id: u64, success: bool) -> AssetRecord {
        AssetRecord {
            name: format!("asset {id}"),
            id,
            filename: format!("{id}.png"),
            type_id: 1,
            success,
        }
    }

    #[test]
    fn test_summary_counts_add_up() {
        let summary = DumpSummary::from_records(&[record(1, true), record(2, false), record(3, true)]);
        assert_eq!(summary, DumpSummary { total: 3, succeeded: 2, failed: 1 });
        assert_eq!(summary.succeeded + summary.failed, summary.total);
        assert_eq!(summary.to_string(), "3 assets downloaded. 2 succeeded, 1 failed.");
    }

    #[test]
    fn test_metrics_settled_count() {
        let metrics = DumpMetrics::default();
        assert_eq!(metrics.record_success(10), 1);
        assert_eq!(metrics.record_failure(), 2);
        assert_eq!(metrics.record_success(5), 3);

        let snapshot = metrics.snapshot();
        assert_eq!(snapshot.succeeded, 2);
        assert_eq!(snapshot.failed, 1);
        assert_eq!(snapshot.bytes_written, 15);
    }
}
