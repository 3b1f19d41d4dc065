//! Cache Statistics Module
//!
//! Per-tier counters for hits, misses and evictions.

use serde::Serialize;

use crate::cache::CacheLevel;

// == Tier Stats ==
/// Performance counters for a single cache tier.
#[derive(Debug, Clone, Serialize)]
pub struct TierStats {
    /// Tier these counters belong to
    pub level: CacheLevel,
    /// Number of successful reads
    pub hits: u64,
    /// Number of reads that found nothing live
    pub misses: u64,
    /// Number of entries evicted due to LRU policy
    pub evictions: u64,
    /// Number of entries dropped because their TTL elapsed
    pub expirations: u64,
    /// Current number of entries in the tier
    pub total_entries: usize,
}

impl TierStats {
    // == Constructor ==
    /// Creates zeroed counters for `level`.
    pub fn new(level: CacheLevel) -> Self {
        Self {
            level,
            hits: 0,
            misses: 0,
            evictions: 0,
            expirations: 0,
            total_entries: 0,
        }
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

    pub fn record_hit(&mut self) {
        self.hits += 1;
    }

    pub fn record_miss(&mut self) {
        self.misses += 1;
    }

    pub fn record_eviction(&mut self) {
        self.evictions += 1;
    }

    pub fn record_expirations(&mut self, count: usize) {
        self.expirations += count as u64;
    }

    pub fn set_total_entries(&mut self, count: usize) {
        self.total_entries = count;
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stats_new() {
        let stats = TierStats::new(CacheLevel::Memory);
        assert_eq!(stats.level, CacheLevel::Memory);
        assert_eq!(stats.hits, 0);
        assert_eq!(stats.misses, 0);
        assert_eq!(stats.evictions, 0);
        assert_eq!(stats.total_entries, 0);
    }

    #[test]
    fn test_hit_rate_no_requests() {
        let stats = TierStats::new(CacheLevel::Persistent);
        assert_eq!(stats.hit_rate(), 0.0);
    }

    #[test]
    fn test_hit_rate_mixed() {
        let mut stats = TierStats::new(CacheLevel::Memory);
        stats.record_hit();
        stats.record_hit();
        stats.record_hit();
        stats.record_miss();
        assert_eq!(stats.hit_rate(), 0.75);
    }

    #[test]
    fn test_record_expirations() {
        let mut stats = TierStats::new(CacheLevel::Memory);
        stats.record_expirations(3);
        stats.record_expirations(2);
        assert_eq!(stats.expirations, 5);
    }
}
