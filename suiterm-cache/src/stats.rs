//! Cache usage counters.

/// Statistics about cache usage.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CacheStats {
    /// Reads answered by a fresh entry.
    pub hits: u64,
    /// Reads that issued a new fetch.
    pub misses: u64,
    /// Reads that joined a fetch already in flight.
    pub joined: u64,
    /// Fetches that settled with an error.
    pub fetch_failures: u64,
    /// Entries removed by `invalidate` / `invalidate_pattern`.
    pub invalidations: u64,
    /// Entries currently stored, fresh or stale.
    pub entry_count: u64,
    /// Fetches currently outstanding.
    pub in_flight: u64,
}

impl CacheStats {
    /// Share of reads that did not start a fetch (0.0 to 1.0).
    pub fn hit_rate(&self) -> f64 {
        let served = self.hits + self.joined;
        let total = served + self.misses;
        if total == 0 {
            0.0
        } else {
            served as f64 / total as f64
        }
    }
}
