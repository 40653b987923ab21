//! Lookup Module
//!
//! Coalesces batches of emissions lookups into cache reads and one
//! downstream fetch.

mod coordinator;

pub use coordinator::BatchLookupCoordinator;
