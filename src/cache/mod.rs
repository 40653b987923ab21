//! Cache Module
//!
//! Provides in-memory caching with TTL expiration and priority-ordered eviction.

mod entry;
mod key;
mod listener;
mod ordering;
mod stats;
mod store;


// Re-export public types
pub use entry::{CacheEntry, EntryState};
pub use key::{CacheKey, CacheValue};
pub use listener::{EvictionCause, EvictionListener, LoggingEvictionListener};
pub use ordering::EvictionRank;
pub use stats::CacheStats;
pub use store::{CacheStore, SharedCache};

// == Public Constants ==
/// Lowest accepted entry priority
pub const MIN_PRIORITY: u8 = 1;

/// Highest accepted entry priority
pub const MAX_PRIORITY: u8 = 10;
