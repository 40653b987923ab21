//! API Handlers
//!
//! HTTP request handlers for each emissions server endpoint.

use std::sync::Arc;
use std::time::Duration;

use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};
use tracing::info;

use crate::cache::{CacheStore, SharedCache};
use crate::config::Config;
use crate::error::{Result, ServiceError};
use crate::fetch::EmissionsFetcher;
use crate::lookup::BatchLookupCoordinator;
use crate::models::{HealthResponse, MeasureRequest, MeasureResponse, StatsResponse};

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    /// Batch coordinator owning the shared cache store
    pub lookup: BatchLookupCoordinator,
}

impl AppState {
    /// Creates a new AppState around a cache store and a fetcher.
    pub fn new(cache: CacheStore, fetcher: Arc<dyn EmissionsFetcher>) -> Self {
        Self {
            lookup: BatchLookupCoordinator::new(cache.into_shared(), fetcher),
        }
    }

    /// Creates a new AppState from configuration.
    ///
    /// Initializes the cache store with the capacity and TTL from the Config.
    pub fn from_config(config: &Config, fetcher: Arc<dyn EmissionsFetcher>) -> Self {
        let cache = CacheStore::new(config.max_entries, Duration::from_secs(config.cache_ttl));
        Self::new(cache, fetcher)
    }

    /// The shared cache store.
    pub fn cache(&self) -> &SharedCache {
        self.lookup.cache()
    }
}

/// Handler for POST /measure
///
/// Returns emissions for every row, serving cached rows directly and
/// fetching the rest in one downstream call.
pub async fn measure_handler(
    State(state): State<AppState>,
    payload: std::result::Result<Json<MeasureRequest>, JsonRejection>,
) -> Result<Json<MeasureResponse>> {
    let Json(req) = payload.map_err(|rejection| ServiceError::InvalidRequest(rejection.body_text()))?;
    info!(rows = req.rows.len(), "Measure request");

    let rows = state.lookup.handle(&req).await?;

    Ok(Json(MeasureResponse::new(rows)))
}

/// Handler for GET /stats
///
/// Returns current cache statistics.
pub async fn stats_handler(State(state): State<AppState>) -> Json<StatsResponse> {
    let cache = state.cache().lock().await;
    let stats = cache.stats();

    Json(StatsResponse::new(&stats, cache.capacity()))
}

/// Handler for GET /health
///
/// Returns health status of the server.
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::healthy())
}
