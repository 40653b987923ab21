//! Batch Lookup Coordinator
//!
//! Splits a batch into cache hits and a single fetch for the misses.

use std::collections::HashMap;
use std::sync::Arc;

use tracing::{debug, info};

use crate::cache::{CacheValue, SharedCache};
use crate::error::{Result, ServiceError};
use crate::fetch::EmissionsFetcher;
use crate::models::{EmissionRecord, MeasureRequest, MeasureRow};

// == Miss Set ==
/// Cache misses of one batch, keyed by inventory identifier.
///
/// A later row with the same identifier replaces the earlier one, so two
/// rows for one identifier on different dates produce a single fetch row.
#[derive(Debug, Default)]
struct MissSet {
    rows: Vec<MeasureRow>,
    by_id: HashMap<String, usize>,
}

impl MissSet {
    fn insert(&mut self, row: &MeasureRow) {
        match self.by_id.get(&row.inventory_id) {
            Some(&index) => self.rows[index] = row.clone(),
            None => {
                self.by_id.insert(row.inventory_id.clone(), self.rows.len());
                self.rows.push(row.clone());
            }
        }
    }

    fn get(&self, inventory_id: &str) -> Option<&MeasureRow> {
        self.by_id.get(inventory_id).map(|&index| &self.rows[index])
    }

    fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

// == Batch Lookup Coordinator ==
/// Serves batches from the cache, fetching all misses in one call.
#[derive(Clone)]
pub struct BatchLookupCoordinator {
    cache: SharedCache,
    fetcher: Arc<dyn EmissionsFetcher>,
}

impl BatchLookupCoordinator {
    pub fn new(cache: SharedCache, fetcher: Arc<dyn EmissionsFetcher>) -> Self {
        Self { cache, fetcher }
    }

    /// The store this coordinator reads and fills.
    pub fn cache(&self) -> &SharedCache {
        &self.cache
    }

    // == Handle ==
    /// Resolves every row of a batch.
    ///
    /// Hits come first in arrival order, followed by the fetched records in
    /// the order the measurement API returned them. Fetched records are
    /// cached with the store's TTL and the priority of their request row.
    /// If validation or the fetch fails the whole batch fails and the miss
    /// set is not cached.
    pub async fn handle(&self, request: &MeasureRequest) -> Result<Vec<EmissionRecord>> {
        if let Some(msg) = request.validate() {
            return Err(ServiceError::InvalidRequest(msg));
        }

        let mut results = Vec::with_capacity(request.rows.len());
        let mut misses = MissSet::default();

        {
            let mut store = self.cache.lock().await;
            for row in &request.rows {
                let key = row.cache_key();
                match store.get(&key) {
                    Some(value) => {
                        info!("Cache hit for key: {}", key);
                        results.push(EmissionRecord::new(row.inventory_id.clone(), value.emissions));
                    }
                    None => {
                        info!("Cache miss for key: {}", key);
                        misses.insert(row);
                    }
                }
            }
        }

        if misses.is_empty() {
            return Ok(results);
        }

        info!(misses = misses.rows.len(), "Fetching emissions for cache misses");
        let fetched = self.fetcher.fetch(&misses.rows).await?;

        {
            let mut store = self.cache.lock().await;
            for record in &fetched {
                if let Some(row) = misses.get(&record.inventory_id) {
                    let key = row.cache_key();
                    store.set(key.clone(), CacheValue::new(record.total_emissions, row.priority));
                    debug!("Added to cache: {}", key);
                }
            }
        }

        results.extend(fetched);
        Ok(results)
    }
}
