//! # Catalog
//!
//! A keyed, insertion-ordered, in-memory collection.

use indexmap::IndexMap;
use tracing::debug;

use super::Lookup;
use crate::error::{StoreError, StoreResult};

/// Stores values by string key, preserving the order they were inserted in.
///
/// ## Usage
/// ```rust
/// use basket_store::{Catalog, Lookup};
///
/// let mut coupons = Catalog::new("Coupon");
/// coupons.insert("SAVE5", 500).unwrap();
///
/// assert_eq!(coupons.get("SAVE5"), Some(500));
/// assert!(coupons.require("NOPE").is_err());
/// assert!(coupons.insert("SAVE5", 700).is_err());
/// ```
#[derive(Debug, Clone)]
pub struct Catalog<V> {
    entity: String,
    entries: IndexMap<String, V>,
}

impl<V: Clone> Catalog<V> {
    /// Creates an empty catalog of `entity`.
    pub fn new(entity: impl Into<String>) -> Self {
        Catalog {
            entity: entity.into(),
            entries: IndexMap::new(),
        }
    }

    /// Inserts `value` under `key`.
    ///
    /// ## Errors
    /// `Duplicate` when `key` is already present. The stored value is kept.
    pub fn insert(&mut self, key: impl Into<String>, value: V) -> StoreResult<()> {
        let key = key.into();
        if self.entries.contains_key(&key) {
            return Err(StoreError::duplicate(&self.entity, key));
        }

        debug!(entity = %self.entity, key = %key, "Catalog entry inserted");
        self.entries.insert(key, value);
        Ok(())
    }

    /// Removes and returns the value under `key`.
    pub fn remove(&mut self, key: &str) -> Option<V> {
        let removed = self.entries.shift_remove(key);
        if removed.is_some() {
            debug!(entity = %self.entity, key = %key, "Catalog entry removed");
        }
        removed
    }

    pub fn contains(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Values in insertion order.
    pub fn values(&self) -> impl Iterator<Item = &V> {
        self.entries.values()
    }

    /// Keys in insertion order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }
}

impl<V: Clone> Lookup<V> for Catalog<V> {
    fn entity(&self) -> &str {
        &self.entity
    }

    fn get(&self, key: &str) -> Option<V> {
        let found = self.entries.get(key).cloned();
        debug!(entity = %self.entity, key = %key, found = found.is_some(), "Catalog lookup");
        found
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_and_get() {
        let mut catalog = Catalog::new("Product");
        catalog.insert("Apple", 10).unwrap();
        catalog.insert("Pear", 4).unwrap();

        assert_eq!(catalog.get("Apple"), Some(10));
        assert_eq!(catalog.get("Plum"), None);
        assert_eq!(catalog.len(), 2);
        assert_eq!(catalog.keys().collect::<Vec<_>>(), vec!["Apple", "Pear"]);
    }

    #[test]
    fn test_duplicate_keeps_first_value() {
        let mut catalog = Catalog::new("Coupon");
        catalog.insert("SAVE5", 5).unwrap();

        let err = catalog.insert("SAVE5", 50).unwrap_err();
        assert_eq!(err, StoreError::duplicate("Coupon", "SAVE5"));
        assert_eq!(catalog.get("SAVE5"), Some(5));
    }

    #[test]
    fn test_require_reports_not_found() {
        let catalog: Catalog<u32> = Catalog::new("Campaign");

        let err = catalog.require("summer").unwrap_err();
        assert_eq!(err, StoreError::not_found("Campaign", "summer"));
    }

    #[test]
    fn test_remove_preserves_order_of_the_rest() {
        let mut catalog = Catalog::new("Category");
        catalog.insert("a", 1).unwrap();
        catalog.insert("b", 2).unwrap();
        catalog.insert("c", 3).unwrap();

        assert_eq!(catalog.remove("b"), Some(2));
        assert_eq!(catalog.remove("b"), None);
        assert_eq!(catalog.values().copied().collect::<Vec<_>>(), vec![1, 3]);
        assert!(!catalog.contains("b"));
    }
}
