//! API Module
//!
//! HTTP handlers and routing for the emissions cache REST API.
//!
//! # Endpoints
//! - `POST /measure` - Batch emissions lookup through the cache
//! - `GET /stats` - Get cache statistics
//! - `GET /health` - Health check endpoint

pub mod handlers;
pub mod routes;

pub use handlers::*;
pub use routes::create_router;
