//! Eviction Ordering Module
//!
//! Ranks cache entries for capacity eviction.

use std::cmp::Ordering;
use std::collections::BTreeMap;

use tokio::time::Instant;

use crate::cache::CacheKey;

// == Eviction Rank ==
/// Sort key of an entry in the eviction ordering.
///
/// Ranks sort ascending in eviction order: the smallest rank is the next
/// victim. The numerically highest priority goes first, ties fall to the
/// older entry, and the entry id settles entries created at the same instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EvictionRank {
    pub priority: u8,
    pub created_at: Instant,
    pub id: u64,
}

impl EvictionRank {
    pub fn new(priority: u8, created_at: Instant, id: u64) -> Self {
        Self {
            priority,
            created_at,
            id,
        }
    }
}

impl PartialOrd for EvictionRank {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for EvictionRank {
    fn cmp(&self, other: &Self) -> Ordering {
        // Higher priority value first, then older entries
        other
            .priority
            .cmp(&self.priority)
            .then_with(|| self.created_at.cmp(&other.created_at))
            .then_with(|| self.id.cmp(&other.id))
    }
}

// == Eviction Ordering ==
/// Ordered set of live entries, keyed by rank.
///
/// Unlike a binary heap this supports removing an arbitrary entry by rank,
/// which overwrites and active expiry both need.
#[derive(Debug, Default)]
pub(crate) struct EvictionOrdering {
    ranks: BTreeMap<EvictionRank, CacheKey>,
}

impl EvictionOrdering {
    // == Constructor ==
    pub fn new() -> Self {
        Self {
            ranks: BTreeMap::new(),
        }
    }

    // == Insert ==
    /// Tracks an entry under its rank.
    pub fn insert(&mut self, rank: EvictionRank, key: CacheKey) {
        self.ranks.insert(rank, key);
    }

    // == Remove ==
    /// Stops tracking the entry with this rank, returning its key.
    pub fn remove(&mut self, rank: &EvictionRank) -> Option<CacheKey> {
        self.ranks.remove(rank)
    }

    // == Pop Victim ==
    /// Removes and returns the top-ranked eviction candidate.
    pub fn pop_victim(&mut self) -> Option<(EvictionRank, CacheKey)> {
        self.ranks.pop_first()
    }

    // == Length ==
    pub fn len(&self) -> usize {
        self.ranks.len()
    }

    // == Contains ==
    #[cfg(test)]
    pub fn contains(&self, rank: &EvictionRank) -> bool {
        self.ranks.contains_key(rank)
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn key(id: &str) -> CacheKey {
        CacheKey::new(id, "2024-12-30")
    }

    #[test]
    fn test_highest_priority_ranks_first() {
        let now = Instant::now();
        let low = EvictionRank::new(1, now, 1);
        let high = EvictionRank::new(9, now + Duration::from_secs(5), 2);

        assert!(high < low);
    }

    #[test]
    fn test_older_entry_ranks_first_on_tie() {
        let now = Instant::now();
        let older = EvictionRank::new(4, now, 2);
        let newer = EvictionRank::new(4, now + Duration::from_millis(1), 1);

        assert!(older < newer);
    }

    #[test]
    fn test_id_breaks_identical_timestamps() {
        let now = Instant::now();
        let first = EvictionRank::new(4, now, 1);
        let second = EvictionRank::new(4, now, 2);

        assert!(first < second);
        assert_ne!(first, second);
    }

    #[test]
    fn test_pop_victim_order() {
        let now = Instant::now();
        let mut ordering = EvictionOrdering::new();

        ordering.insert(EvictionRank::new(1, now, 1), key("nytimes.com"));
        ordering.insert(EvictionRank::new(2, now, 2), key("yahoo.com"));
        ordering.insert(EvictionRank::new(1, now, 3), key("theguardian.com"));

        assert_eq!(ordering.pop_victim().map(|(_, k)| k), Some(key("yahoo.com")));
        assert_eq!(ordering.pop_victim().map(|(_, k)| k), Some(key("nytimes.com")));
        assert_eq!(
            ordering.pop_victim().map(|(_, k)| k),
            Some(key("theguardian.com"))
        );
        assert!(ordering.pop_victim().is_none());
    }

    #[test]
    fn test_remove_by_rank() {
        let now = Instant::now();
        let mut ordering = EvictionOrdering::new();
        let rank = EvictionRank::new(3, now, 1);

        ordering.insert(rank, key("a.com"));
        ordering.insert(EvictionRank::new(3, now, 2), key("b.com"));

        assert_eq!(ordering.remove(&rank), Some(key("a.com")));
        assert!(!ordering.contains(&rank));
        assert_eq!(ordering.len(), 1);
        assert_eq!(ordering.remove(&rank), None);
    }
}
