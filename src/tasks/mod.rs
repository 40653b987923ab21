//! Background Tasks Module
//!
//! Contains background tasks that run alongside the HTTP server.
//!
//! # Tasks
//! - Expiry Reaper: Removes cache entries once their TTL elapses

mod reaper;

pub use reaper::spawn_expiry_reaper;
