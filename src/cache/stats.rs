//! Cache Statistics Module
//!
//! Tracks cache performance metrics including hits, misses, evictions and expirations.

use serde::Serialize;

// == Cache Stats ==
/// Tracks cache performance metrics.
#[derive(Debug, Clone, Default, Serialize)]
pub struct CacheStats {
    /// Number of reads that found a live entry
    pub hits: u64,
    /// Number of reads that found nothing or an expired entry
    pub misses: u64,
    /// Number of entries removed under capacity pressure
    pub evictions: u64,
    /// Number of entries removed by active expiry
    pub expirations: u64,
    /// Current number of entries in the cache, expired-but-unreaped included
    pub total_entries: usize,
}

impl CacheStats {
    // == Constructor ==
    pub fn new() -> Self {
        Self::default()
    }

    // == Hit Rate ==
    /// Returns hits / (hits + misses), or 0.0 if no reads have been made.
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }

    /// Counts a read served from a live entry.
    pub fn record_hit(&mut self) {
        self.hits += 1;
    }

    /// Counts a read that found no live entry.
    pub fn record_miss(&mut self) {
        self.misses += 1;
    }

    /// Counts an entry removed to make room.
    pub fn record_eviction(&mut self) {
        self.evictions += 1;
    }

    /// Counts an entry removed by active expiry.
    pub fn record_expiration(&mut self) {
        self.expirations += 1;
    }

    /// Overwrites the current entry count.
    pub fn set_total_entries(&mut self, count: usize) {
        self.total_entries = count;
    }
}
