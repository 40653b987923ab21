//! Cache Key Module
//!
//! Composite key and cached value types for emissions lookups.

use std::fmt;

// == Cache Key ==
/// Identifies one cacheable fact: an inventory identifier on a given date.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CacheKey {
    /// Entity identifier (e.g. a publisher domain)
    pub inventory_id: String,
    /// UTC date string the measurement refers to
    pub utc_datetime: String,
}

impl CacheKey {
    /// Creates a new key from an identifier and a date.
    pub fn new(inventory_id: impl Into<String>, utc_datetime: impl Into<String>) -> Self {
        Self {
            inventory_id: inventory_id.into(),
            utc_datetime: utc_datetime.into(),
        }
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{}", self.inventory_id, self.utc_datetime)
    }
}

// == Cache Value ==
/// The cached measurement along with the priority it was written with.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CacheValue {
    /// Total emissions reported by the measurement API
    pub emissions: f64,
    /// Eviction priority in `MIN_PRIORITY..=MAX_PRIORITY`
    pub priority: u8,
}

impl CacheValue {
    pub fn new(emissions: f64, priority: u8) -> Self {
        Self {
            emissions,
            priority,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_key_equality_by_value() {
        let a = CacheKey::new("nytimes.com", "2024-12-30");
        let b = CacheKey::new(String::from("nytimes.com"), String::from("2024-12-30"));
        assert_eq!(a, b);
        assert_ne!(a, CacheKey::new("nytimes.com", "2024-12-31"));
    }

    #[test]
    fn test_key_as_map_key() {
        let mut map = HashMap::new();
        map.insert(CacheKey::new("yahoo.com", "2024-12-30"), 1);
        assert_eq!(map.get(&CacheKey::new("yahoo.com", "2024-12-30")), Some(&1));
    }

    #[test]
    fn test_key_display() {
        let key = CacheKey::new("yahoo.com", "2024-12-30");
        assert_eq!(key.to_string(), "yahoo.com@2024-12-30");
    }
}
