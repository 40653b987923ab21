//! Cache Store Module
//!
//! Main cache engine combining HashMap storage with priority-ordered eviction
//! and TTL expiration.

use std::cmp::Reverse;
use std::collections::{BinaryHeap, HashMap};
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{Mutex, Notify};
use tokio::time::Instant;
use tracing::{debug, warn};

use crate::cache::ordering::EvictionOrdering;
use crate::cache::{
    CacheEntry, CacheKey, CacheStats, CacheValue, EntryState, EvictionCause, EvictionListener,
    LoggingEvictionListener,
};

/// Store handle shared between request handlers and the expiry reaper.
///
/// Every read, write, expiry and eviction goes through this one lock.
pub type SharedCache = Arc<Mutex<CacheStore>>;

// == Scheduled Expiry ==
/// Pending active-expiry check for one entry instance.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
struct ScheduledExpiry {
    deadline: Instant,
    id: u64,
    key: CacheKey,
}

// == Cache Store ==
/// Bounded cache with a fixed TTL and priority-ordered capacity eviction.
pub struct CacheStore {
    /// Key-value storage
    entries: HashMap<CacheKey, CacheEntry>,
    /// Eviction ranks of every stored entry
    ordering: EvictionOrdering,
    /// Time-ordered active-expiry checks, earliest deadline on top
    expiry_queue: BinaryHeap<Reverse<ScheduledExpiry>>,
    /// Performance statistics
    stats: CacheStats,
    /// Maximum number of entries allowed after a write completes
    capacity: usize,
    /// TTL applied by `set`
    ttl: Duration,
    /// Id handed to the next entry instance
    next_id: u64,
    /// Observer for removed entries
    listener: Arc<dyn EvictionListener>,
    /// Wakes the reaper when an earlier deadline is scheduled
    expiry_signal: Arc<Notify>,
}

impl CacheStore {
    // == Constructor ==
    /// Creates a new CacheStore with the given capacity and fixed TTL.
    ///
    /// # Arguments
    /// * `capacity` - Maximum number of entries the cache can hold
    /// * `ttl` - Lifetime of every entry written through `set`
    pub fn new(capacity: usize, ttl: Duration) -> Self {
        Self {
            entries: HashMap::new(),
            ordering: EvictionOrdering::new(),
            expiry_queue: BinaryHeap::new(),
            stats: CacheStats::new(),
            capacity,
            ttl,
            next_id: 0,
            listener: Arc::new(LoggingEvictionListener),
            expiry_signal: Arc::new(Notify::new()),
        }
    }

    /// Replaces the eviction listener.
    pub fn with_listener(mut self, listener: Arc<dyn EvictionListener>) -> Self {
        self.listener = listener;
        self
    }

    /// Wraps the store for sharing across tasks.
    pub fn into_shared(self) -> SharedCache {
        Arc::new(Mutex::new(self))
    }

    // == Get ==
    /// Retrieves a value if its entry exists and has not expired.
    ///
    /// Expired entries are reported as misses but left in place.
    pub fn get(&mut self, key: &CacheKey) -> Option<CacheValue> {
        self.get_at(key, Instant::now())
    }

    /// Same as `get`, evaluated against the given clock instant.
    pub fn get_at(&mut self, key: &CacheKey, now: Instant) -> Option<CacheValue> {
        match self.entries.get(key) {
            Some(entry) if !entry.is_expired_at(now) => {
                let value = entry.value;
                self.stats.record_hit();
                Some(value)
            }
            _ => {
                self.stats.record_miss();
                None
            }
        }
    }

    // == Set ==
    /// Stores a value with the TTL fixed at construction.
    pub fn set(&mut self, key: CacheKey, value: CacheValue) {
        let ttl = self.ttl;
        self.set_with_ttl(key, value, ttl);
    }

    /// Stores a value that expires after `ttl`.
    ///
    /// Any existing entry for the key is replaced. If the write pushes the
    /// store over capacity, the top-ranked entries are evicted until it fits.
    pub fn set_with_ttl(&mut self, key: CacheKey, value: CacheValue, ttl: Duration) {
        self.set_with_ttl_at(key, value, ttl, Instant::now());
    }

    /// Same as `set_with_ttl`, with `now` as the creation instant.
    pub fn set_with_ttl_at(&mut self, key: CacheKey, value: CacheValue, ttl: Duration, now: Instant) {
        if let Some(previous) = self.entries.remove(&key) {
            self.ordering.remove(&previous.rank());
        }

        let id = self.next_id;
        self.next_id += 1;

        let entry = CacheEntry::new(value, id, now, ttl);
        let deadline = entry.expires_at;
        self.ordering.insert(entry.rank(), key.clone());
        self.entries.insert(key.clone(), entry);
        self.schedule_expiry(deadline, id, key);

        while self.entries.len() > self.capacity {
            let Some((_, victim_key)) = self.ordering.pop_victim() else {
                break;
            };
            if let Some(victim) = self.entries.remove(&victim_key) {
                self.stats.record_eviction();
                debug!(key = %victim_key, priority = victim.value.priority, "Capacity eviction");
                self.notify_listener(&victim_key, &victim.value, EvictionCause::Capacity);
            }
        }

        debug_assert_eq!(self.entries.len(), self.ordering.len());
        self.stats.set_total_entries(self.entries.len());
    }

    // == Reap Expired ==
    /// Runs every active-expiry check whose deadline has passed.
    ///
    /// A check only removes the entry it was scheduled for: if the key was
    /// overwritten or evicted since, the check is dropped. Returns the number
    /// of entries removed.
    pub fn reap_expired(&mut self) -> usize {
        self.reap_expired_at(Instant::now())
    }

    /// Same as `reap_expired`, treating `now` as the current time.
    pub fn reap_expired_at(&mut self, now: Instant) -> usize {
        let mut removed = 0;

        while let Some(Reverse(next)) = self.expiry_queue.peek() {
            if next.deadline > now {
                break;
            }
            let Some(Reverse(scheduled)) = self.expiry_queue.pop() else {
                break;
            };

            let is_current = self
                .entries
                .get(&scheduled.key)
                .is_some_and(|entry| entry.id == scheduled.id && entry.is_expired_at(now));
            if !is_current {
                continue;
            }

            if let Some(entry) = self.entries.remove(&scheduled.key) {
                self.ordering.remove(&entry.rank());
                self.stats.record_expiration();
                self.notify_listener(&scheduled.key, &entry.value, EvictionCause::Expired);
                removed += 1;
            }
        }

        debug_assert_eq!(self.entries.len(), self.ordering.len());
        self.stats.set_total_entries(self.entries.len());
        removed
    }

    /// Deadline of the earliest pending expiry check.
    pub fn next_deadline(&self) -> Option<Instant> {
        self.expiry_queue.peek().map(|Reverse(next)| next.deadline)
    }

    /// Number of expiry checks still queued, stale ones included.
    pub fn pending_expirations(&self) -> usize {
        self.expiry_queue.len()
    }

    /// Signal raised whenever a write schedules a new earliest deadline.
    pub fn expiry_signal(&self) -> Arc<Notify> {
        Arc::clone(&self.expiry_signal)
    }

    // == Lifecycle ==
    /// Reports where the entry for `key` is in its lifecycle.
    pub fn lifecycle(&self, key: &CacheKey) -> EntryState {
        self.lifecycle_at(key, Instant::now())
    }

    /// Same as `lifecycle`, evaluated against the given clock instant.
    pub fn lifecycle_at(&self, key: &CacheKey, now: Instant) -> EntryState {
        self.entries
            .get(key)
            .map_or(EntryState::Removed, |entry| entry.state_at(now))
    }

    // == Stats ==
    /// Returns current cache statistics.
    pub fn stats(&self) -> CacheStats {
        let mut stats = self.stats.clone();
        stats.set_total_entries(self.entries.len());
        stats
    }

    // == Length ==
    /// Returns the number of stored entries, expired-but-unreaped included.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if nothing is stored, expired entries included.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Maximum number of entries kept after a write.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// TTL applied by `set`.
    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    fn schedule_expiry(&mut self, deadline: Instant, id: u64, key: CacheKey) {
        let is_earliest = self.next_deadline().map_or(true, |next| deadline < next);
        self.expiry_queue
            .push(Reverse(ScheduledExpiry { deadline, id, key }));
        if is_earliest {
            self.expiry_signal.notify_one();
        }
    }

    fn notify_listener(&self, key: &CacheKey, value: &CacheValue, cause: EvictionCause) {
        if let Err(err) = self.listener.on_evict(key, value, cause) {
            warn!(key = %key, ?cause, "Eviction listener failed: {:#}", err);
        }
    }

    /// Checks that the map and the eviction ordering track the same entries.
    #[cfg(test)]
    pub(crate) fn assert_consistent(&self) {
        assert_eq!(self.entries.len(), self.ordering.len());
        for entry in self.entries.values() {
            assert!(self.ordering.contains(&entry.rank()));
            assert!(entry.expires_at > entry.created_at);
        }
    }
}

impl fmt::Debug for CacheStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CacheStore")
            .field("len", &self.entries.len())
            .field("capacity", &self.capacity)
            .field("ttl", &self.ttl)
            .field("pending_expirations", &self.expiry_queue.len())
            .field("stats", &self.stats)
            .finish()
    }
}
