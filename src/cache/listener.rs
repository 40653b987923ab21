//! Eviction Listener Module
//!
//! Best-effort notifications for entries leaving the cache.

use tracing::info;

use crate::cache::{CacheKey, CacheValue};

// == Eviction Cause ==
/// Why an entry was removed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EvictionCause {
    /// Removed to bring the store back under capacity
    Capacity,
    /// Removed by the expiry reaper after its TTL elapsed
    Expired,
}

// == Eviction Listener ==
/// Observer invoked for every removed entry.
///
/// Errors are logged by the store and otherwise ignored; a failing listener
/// never affects the cache operation that triggered it.
pub trait EvictionListener: Send + Sync {
    fn on_evict(&self, key: &CacheKey, value: &CacheValue, cause: EvictionCause)
        -> anyhow::Result<()>;
}

// == Logging Listener ==
/// Default listener that records removals through `tracing`.
#[derive(Debug, Default, Clone, Copy)]
pub struct LoggingEvictionListener;

impl EvictionListener for LoggingEvictionListener {
    fn on_evict(
        &self,
        key: &CacheKey,
        value: &CacheValue,
        cause: EvictionCause,
    ) -> anyhow::Result<()> {
        info!(
            key = %key,
            emissions = value.emissions,
            priority = value.priority,
            ?cause,
            "Evicted cache entry"
        );
        Ok(())
    }
}
