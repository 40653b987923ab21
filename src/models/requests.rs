//! Request DTOs for the emissions API
//!
//! Defines the structure of incoming HTTP request bodies.

use serde::Deserialize;

use crate::cache::{CacheKey, MAX_PRIORITY, MIN_PRIORITY};

/// Request body for POST /measure
#[derive(Debug, Clone, Deserialize)]
pub struct MeasureRequest {
    /// Rows to look up; an absent list is treated as empty
    #[serde(default)]
    pub rows: Vec<MeasureRow>,
}

/// One lookup row.
///
/// # Fields
/// - `inventory_id`: Entity identifier, e.g. a publisher domain
/// - `utc_datetime`: Date of the measurement
/// - `priority`: Eviction priority of the cached result, 1 to 10
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MeasureRow {
    pub inventory_id: String,
    pub utc_datetime: String,
    pub priority: u8,
}

impl MeasureRow {
    pub fn new(inventory_id: impl Into<String>, utc_datetime: impl Into<String>, priority: u8) -> Self {
        Self {
            inventory_id: inventory_id.into(),
            utc_datetime: utc_datetime.into(),
            priority,
        }
    }

    /// Cache key this row is looked up under.
    pub fn cache_key(&self) -> CacheKey {
        CacheKey::new(self.inventory_id.clone(), self.utc_datetime.clone())
    }

    /// Validates the row.
    ///
    /// Returns an error message if validation fails, None if valid.
    pub fn validate(&self) -> Option<String> {
        if self.inventory_id.is_empty() {
            return Some("inventoryId is required".to_string());
        }
        if self.utc_datetime.is_empty() {
            return Some("utcDatetime is required".to_string());
        }
        if !(MIN_PRIORITY..=MAX_PRIORITY).contains(&self.priority) {
            return Some(format!(
                "priority must be between {} and {}, got {}",
                MIN_PRIORITY, MAX_PRIORITY, self.priority
            ));
        }
        None
    }
}

impl MeasureRequest {
    /// Validates every row, reporting the first failure with its index.
    pub fn validate(&self) -> Option<String> {
        self.rows
            .iter()
            .enumerate()
            .find_map(|(i, row)| row.validate().map(|msg| format!("rows[{}]: {}", i, msg)))
    }
}
