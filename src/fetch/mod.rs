//! Fetch Module
//!
//! Contract and HTTP implementation for the downstream measurement API.

mod client;

use async_trait::async_trait;
use reqwest::StatusCode;
use thiserror::Error;

use crate::models::{EmissionRecord, MeasureRow};

pub use client::{MeasureApiClient, DEFAULT_MEASURE_URL};

// == Fetch Error ==
/// Failure of a single batched measurement call.
#[derive(Error, Debug)]
pub enum FetchError {
    /// Connection, TLS or timeout failure
    #[error("measurement request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// The API answered with a non-success status
    #[error("measurement API returned {0}")]
    Status(StatusCode),

    /// The response body did not match the expected shape
    #[error("failed to decode measurement response: {0}")]
    Decode(String),
}

// == Emissions Fetcher ==
/// Performs one batched lookup for a set of cache misses.
///
/// Implementations must issue at most one downstream call per invocation and
/// return one record per row they could measure, keyed by `inventory_id`.
#[async_trait]
pub trait EmissionsFetcher: Send + Sync {
    async fn fetch(&self, rows: &[MeasureRow]) -> Result<Vec<EmissionRecord>, FetchError>;
}
