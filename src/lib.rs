//! Emissions Cache - A priority-aware TTL cache for emissions lookups
//!
//! Fronts a rate-limited measurement API with a bounded in-memory cache and
//! coalesces each batch of cache misses into a single downstream call.

pub mod api;
pub mod cache;
pub mod config;
pub mod error;
pub mod fetch;
pub mod lookup;
pub mod models;
pub mod tasks;

pub use api::AppState;
pub use config::Config;
pub use tasks::spawn_expiry_reaper;
