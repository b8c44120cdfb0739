//! Scan results

use serde::{Deserialize, Serialize};

/// Running allocation counters for one scan
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AllocationStats {
    /// Number of allocation events
    pub allocations: u64,
    /// Number of deallocation events
    pub frees: u64,
    /// Bytes ever allocated (unknown sizes count as zero)
    pub total_bytes: u64,
    /// Bytes allocated and not yet freed
    pub current_bytes: u64,
    /// High-water mark of `current_bytes`
    pub peak_bytes: u64,
}

impl AllocationStats {
    pub(crate) fn record_alloc(&mut self, size: Option<u64>) {
        let size = size.unwrap_or(0);
        self.allocations += 1;
        self.total_bytes = self.total_bytes.saturating_add(size);
        self.current_bytes = self.current_bytes.saturating_add(size);
        self.peak_bytes = self.peak_bytes.max(self.current_bytes);
    }

    pub(crate) fn record_free(&mut self, size: Option<u64>) {
        self.frees += 1;
        self.current_bytes = self.current_bytes.saturating_sub(size.unwrap_or(0));
    }
}

/// An allocation that was never freed
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Leak {
    /// Line of the trace the allocation was logged on
    pub line: usize,
    pub address: u64,
    /// Size in bytes, when the trace recorded it
    pub size: Option<u64>,
    /// Innermost traced function at allocation time
    pub function: Option<String>,
}

/// Result of scanning one trace
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Report {
    /// Outstanding allocations, ordered by line
    pub leaks: Vec<Leak>,
    pub stats: AllocationStats,
    pub lines_scanned: usize,
    /// First line where a return had no matching enter
    pub attribution_lost_at: Option<usize>,
}

impl Report {
    pub fn leak_count(&self) -> usize {
        self.leaks.len()
    }

    /// Sum of the known sizes of all leaks
    pub fn leaked_bytes(&self) -> u64 {
        self.leaks.iter().filter_map(|l| l.size).sum()
    }

    pub fn has_leaks(&self) -> bool {
        !self.leaks.is_empty()
    }

    pub fn outcome(&self) -> Outcome {
        if self.has_leaks() {
            Outcome::LeaksFound
        } else {
            Outcome::Clean
        }
    }
}

/// Caller-visible result of a scan
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Outcome {
    /// Every allocation was freed
    Clean,
    /// At least one allocation is outstanding
    LeaksFound,
    /// The input could not be trusted
    ScanFailed,
}

impl Outcome {
    /// Process exit status for this outcome
    pub fn exit_code(self) -> u8 {
        match self {
            Outcome::Clean => 0,
            Outcome::LeaksFound => 1,
            Outcome::ScanFailed => 2,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_peak_tracks_maximum() {
        let mut stats = AllocationStats::default();
        stats.record_alloc(Some(10));
        stats.record_alloc(Some(20));
        stats.record_free(Some(10));
        stats.record_alloc(Some(5));
        assert_eq!(stats.allocations, 3);
        assert_eq!(stats.frees, 1);
        assert_eq!(stats.total_bytes, 35);
        assert_eq!(stats.current_bytes, 25);
        assert_eq!(stats.peak_bytes, 30);
    }

    #[test]
    fn test_unknown_sizes_count_as_zero() {
        let mut stats = AllocationStats::default();
        stats.record_alloc(None);
        stats.record_free(None);
        assert_eq!(stats.allocations, 1);
        assert_eq!(stats.total_bytes, 0);
        assert_eq!(stats.peak_bytes, 0);
    }

    #[test]
    fn test_leaked_bytes_skips_unknown() {
        let report = Report {
            leaks: vec![
                Leak { line: 1, address: 1, size: Some(16), function: None },
                Leak { line: 2, address: 2, size: None, function: Some("f".into()) },
            ],
            stats: AllocationStats::default(),
            lines_scanned: 2,
            attribution_lost_at: None,
        };
        assert_eq!(report.leak_count(), 2);
        assert_eq!(report.leaked_bytes(), 16);
        assert_eq!(report.outcome(), Outcome::LeaksFound);
    }

    #[test]
    fn test_outcome_ordering_and_codes() {
        assert!(Outcome::ScanFailed > Outcome::LeaksFound);
        assert!(Outcome::LeaksFound > Outcome::Clean);
        assert_eq!(Outcome::Clean.exit_code(), 0);
        assert_eq!(Outcome::LeaksFound.exit_code(), 1);
        assert_eq!(Outcome::ScanFailed.exit_code(), 2);
    }
}
