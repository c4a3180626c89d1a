//! # Error Types
//!
//! Domain-specific error types for basket-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  basket-core errors (this file)                                        │
//! │  ├── CoreError        - Engine errors (one kind: InvalidValue)         │
//! │  └── ValidationError  - Which value was rejected, and why              │
//! │                                                                         │
//! │  basket-store errors (separate crate)                                  │
//! │  └── StoreError       - Catalog misses, duplicate keys                 │
//! │                                                                         │
//! │  checkout errors (in app)                                              │
//! │  └── AppError         - What the operator sees                         │
//! │                                                                         │
//! │  Flow: ValidationError → CoreError → AppError → stderr                 │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## What Is NOT An Error
//! A discount whose validation predicate rejects the cart is a normal outcome.
//! It is logged and skipped; nothing in this module represents it.

use thiserror::Error;

// =============================================================================
// Core Error
// =============================================================================

/// Errors raised by the discount engine.
///
/// The engine has exactly one failure kind: a value outside its domain.
/// It is raised synchronously where the violation happens and propagated
/// to the immediate caller, never retried.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CoreError {
    /// A value was rejected at construction or on use.
    ///
    /// ## When This Occurs
    /// - Negative quantity, rate outside 0-100%, zero/negative discount amount
    /// - Blank discount name or product title
    /// - Adding a product to a cart with a zero quantity
    /// - Dividing money or quantity by zero
    #[error("Invalid value: {0}")]
    InvalidValue(#[from] ValidationError),
}

impl CoreError {
    /// Returns the underlying validation failure.
    pub fn validation(&self) -> &ValidationError {
        match self {
            CoreError::InvalidValue(err) => err,
        }
    }
}

// =============================================================================
// Validation Error
// =============================================================================

/// Describes which value was rejected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// A required component is missing.
    #[error("{field} is required")]
    Required { field: String },

    /// A string is empty or whitespace only.
    #[error("{field} must not be blank")]
    Blank { field: String },

    /// Value must be strictly greater than zero.
    #[error("{field} must be positive")]
    MustBePositive { field: String },

    /// Value must not be below zero.
    #[error("{field} must not be negative, got {value}")]
    Negative { field: String, value: i64 },

    /// Numeric value is out of range.
    #[error("{field} must be between {min} and {max}")]
    OutOfRange { field: String, min: i64, max: i64 },

    /// Divisor was zero.
    #[error("{field} cannot be divided by zero")]
    DivisionByZero { field: String },

    /// Arithmetic left the representable range.
    #[error("{field} is too large")]
    Overflow { field: String },
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_error_messages() {
        let err = ValidationError::Blank {
            field: "discount name".to_string(),
        };
        assert_eq!(err.to_string(), "discount name must not be blank");

        let err = ValidationError::OutOfRange {
            field: "rate".to_string(),
            min: 0,
            max: 10000,
        };
        assert_eq!(err.to_string(), "rate must be between 0 and 10000");

        let err = ValidationError::Negative {
            field: "quantity".to_string(),
            value: -3,
        };
        assert_eq!(err.to_string(), "quantity must not be negative, got -3");
    }

    #[test]
    fn test_validation_converts_to_core_error() {
        let validation_err = ValidationError::MustBePositive {
            field: "discount amount".to_string(),
        };
        let core_err: CoreError = validation_err.clone().into();
        assert!(matches!(core_err, CoreError::InvalidValue(_)));
        assert_eq!(core_err.validation(), &validation_err);
        assert_eq!(
            core_err.to_string(),
            "Invalid value: discount amount must be positive"
        );
    }
}
