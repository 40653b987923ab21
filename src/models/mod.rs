//! Request and Response models for the emissions API
//!
//! This module defines the DTOs (Data Transfer Objects) used for
//! serializing/deserializing HTTP request and response bodies.

pub mod requests;
pub mod responses;

// Re-export commonly used types
pub use requests::{MeasureRequest, MeasureRow};
pub use responses::{EmissionRecord, ErrorResponse, HealthResponse, MeasureResponse, StatsResponse};
