//! # Store Error Types
//!
//! ## Error Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Propagation                                    │
//! │                                                                         │
//! │  Catalog miss / duplicate key                                          │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  StoreError (this module) ← Names the entity and the key               │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  AppError (in checkout) ← Aborts the submission                        │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use thiserror::Error;

/// Catalog and repository errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    /// No element under the requested key.
    ///
    /// ## When This Occurs
    /// - Unknown product title in a cart line
    /// - Unknown campaign name or coupon code
    /// - Unknown category referenced by a product
    #[error("{entity} not found: {key}")]
    NotFound { entity: String, key: String },

    /// An element is already stored under the key.
    #[error("Duplicate {entity}: '{key}' already exists")]
    Duplicate { entity: String, key: String },
}

impl StoreError {
    /// Creates a NotFound error for a given entity type and key.
    pub fn not_found(entity: impl Into<String>, key: impl Into<String>) -> Self {
        StoreError::NotFound {
            entity: entity.into(),
            key: key.into(),
        }
    }

    /// Creates a Duplicate error.
    pub fn duplicate(entity: impl Into<String>, key: impl Into<String>) -> Self {
        StoreError::Duplicate {
            entity: entity.into(),
            key: key.into(),
        }
    }
}

/// Result type for store operations.
pub type StoreResult<T> = Result<T, StoreError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages_name_entity_and_key() {
        assert_eq!(
            StoreError::not_found("Product", "Apple").to_string(),
            "Product not found: Apple"
        );
        assert_eq!(
            StoreError::duplicate("Coupon", "SAVE5").to_string(),
            "Duplicate Coupon: 'SAVE5' already exists"
        );
    }
}
