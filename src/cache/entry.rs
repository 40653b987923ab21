//! Cache Entry Module
//!
//! Defines the structure for individual cache entries with TTL support.

use std::time::Duration;

use tokio::time::Instant;

use crate::cache::ordering::EvictionRank;
use crate::cache::CacheValue;

/// Deadline offset used when `now + ttl` does not fit in an `Instant`.
const FAR_FUTURE: Duration = Duration::from_secs(86_400 * 365 * 30);

// == Entry State ==
/// Lifecycle of the entry stored under a key.
///
/// `Expired` entries are misses on read but still hold a capacity slot until
/// the reaper or a capacity eviction removes them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryState {
    Live,
    Expired,
    Removed,
}

// == Cache Entry ==
/// A single stored measurement plus its bookkeeping.
#[derive(Debug, Clone)]
pub struct CacheEntry {
    /// The stored value
    pub value: CacheValue,
    /// Unique id of this entry instance, never reused by the store
    pub id: u64,
    /// Creation instant
    pub created_at: Instant,
    /// Absolute expiry deadline, always later than `created_at`
    pub expires_at: Instant,
}

impl CacheEntry {
    // == Constructor ==
    /// Creates a new entry created at `now` and expiring after `ttl`.
    ///
    /// A zero TTL is bumped to one millisecond so the deadline stays strictly
    /// after the creation instant. A TTL too large for the clock is capped at
    /// roughly thirty years.
    pub fn new(value: CacheValue, id: u64, now: Instant, ttl: Duration) -> Self {
        let ttl = ttl.max(Duration::from_millis(1));
        let expires_at = now
            .checked_add(ttl)
            .unwrap_or_else(|| now + FAR_FUTURE);
        Self {
            value,
            id,
            created_at: now,
            expires_at,
        }
    }

    // == Is Expired ==
    /// An entry is expired once `now` reaches its deadline.
    pub fn is_expired_at(&self, now: Instant) -> bool {
        now >= self.expires_at
    }

    /// Reports `Live` or `Expired` relative to `now`.
    pub fn state_at(&self, now: Instant) -> EntryState {
        if self.is_expired_at(now) {
            EntryState::Expired
        } else {
            EntryState::Live
        }
    }

    // == Eviction Rank ==
    /// Position of this entry in the eviction ordering.
    pub fn rank(&self) -> EvictionRank {
        EvictionRank::new(self.value.priority, self.created_at, self.id)
    }
}
