//! Cache Statistics Module
//!
//! Point-in-time counts of owners and entries held in memory.

use serde::Serialize;

// == Store Stats ==
/// Snapshot of what the store currently holds.
///
/// `entries` includes expired entries that no access has observed yet, since
/// expiration never reclaims memory on its own.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct StoreStats {
    /// Number of owners with a namespace
    pub owners: usize,
    /// Number of entries across all namespaces
    pub entries: usize,
}

impl StoreStats {
    // == Constructor ==
    pub fn new(owners: usize, entries: usize) -> Self {
        Self { owners, entries }
    }

    // == Average Entries ==
    /// Mean number of entries per owner, or 0.0 if there are no owners.
    pub fn entries_per_owner(&self) -> f64 {
        if self.owners == 0 {
            0.0
        } else {
            self.entries as f64 / self.owners as f64
        }
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stats_default() {
        let stats = StoreStats::default();
        assert_eq!(stats.owners, 0);
        assert_eq!(stats.entries, 0);
        assert_eq!(stats.entries_per_owner(), 0.0);
    }

    #[test]
    fn test_entries_per_owner() {
        let stats = StoreStats::new(4, 10);
        assert!((stats.entries_per_owner() - 2.5).abs() < f64::EPSILON);
    }
}
