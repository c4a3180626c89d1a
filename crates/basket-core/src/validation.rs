//! # Validation Module
//!
//! Construction-time checks shared by the value types, discounts and cart.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Where Values Are Checked                           │
//! │                                                                         │
//! │  Money::divide ──────────┐                                              │
//! │  Quantity::new ──────────┤                                              │
//! │  Rate::from_bps ─────────┼──► validate_*() ← THIS MODULE                │
//! │  DiscountName::new ──────┤        │                                     │
//! │  FlatAmount::new ────────┤        ├── ok  → value is built              │
//! │  ShoppingCart::add ──────┘        └── err → ValidationError             │
//! │                                                                         │
//! │  Values are checked ONCE, when they are built. Using a value never     │
//! │  re-validates it.                                                       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use basket_core::validation::{validate_quantity, validate_title};
//!
//! assert_eq!(validate_title("name", "  Apple ").unwrap(), "Apple");
//! assert!(validate_quantity(0).is_err());
//! ```

use crate::error::ValidationError;
use crate::money::Money;
use crate::MAX_RATE_BPS;

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

// =============================================================================
// String Validators
// =============================================================================

/// Validates a human-readable identifier (titles, discount names, codes).
///
/// ## Rules
/// - Must not be empty after trimming
///
/// ## Returns
/// The trimmed string.
pub fn validate_title(field: &str, value: &str) -> ValidationResult<String> {
    let value = value.trim();

    if value.is_empty() {
        return Err(ValidationError::Blank {
            field: field.to_string(),
        });
    }

    Ok(value.to_string())
}

// =============================================================================
// Numeric Validators
// =============================================================================

/// Validates a quantity being added to a cart.
///
/// ## Rules
/// - Must be positive (> 0)
///
/// ## Example
/// ```rust
/// use basket_core::validation::validate_quantity;
///
/// assert!(validate_quantity(5).is_ok());
/// assert!(validate_quantity(0).is_err());
/// assert!(validate_quantity(-1).is_err());
/// ```
pub fn validate_quantity(qty: i64) -> ValidationResult<()> {
    if qty <= 0 {
        return Err(ValidationError::MustBePositive {
            field: "quantity".to_string(),
        });
    }

    Ok(())
}

/// Validates a value that may be zero but never negative.
pub fn validate_non_negative(field: &str, value: i64) -> ValidationResult<()> {
    if value < 0 {
        return Err(ValidationError::Negative {
            field: field.to_string(),
            value,
        });
    }

    Ok(())
}

/// Validates a divisor.
pub fn validate_divisor(field: &str, divisor: i64) -> ValidationResult<()> {
    if divisor == 0 {
        return Err(ValidationError::DivisionByZero {
            field: field.to_string(),
        });
    }

    Ok(())
}

/// Validates a flat discount amount.
///
/// ## Rules
/// - Must be positive (> 0): a zero discount is a configuration mistake
pub fn validate_discount_amount(amount: Money) -> ValidationResult<()> {
    if !amount.is_positive() {
        return Err(ValidationError::MustBePositive {
            field: "discount amount".to_string(),
        });
    }

    Ok(())
}

/// Validates a product price.
///
/// ## Rules
/// - Must be positive (> 0)
pub fn validate_price(price: Money) -> ValidationResult<()> {
    if !price.is_positive() {
        return Err(ValidationError::MustBePositive {
            field: "price".to_string(),
        });
    }

    Ok(())
}

/// Validates a rate in basis points.
///
/// ## Rules
/// - Must be between 0 and 10000 (0% to 100%), both inclusive
pub fn validate_rate_bps(bps: u32) -> ValidationResult<()> {
    if bps > MAX_RATE_BPS {
        return Err(ValidationError::OutOfRange {
            field: "rate".to_string(),
            min: 0,
            max: MAX_RATE_BPS as i64,
        });
    }

    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_title() {
        assert_eq!(validate_title("title", "Apple").unwrap(), "Apple");
        assert_eq!(validate_title("title", "  Pear  ").unwrap(), "Pear");

        assert!(validate_title("title", "").is_err());
        assert!(validate_title("title", "   ").is_err());
    }

    #[test]
    fn test_validate_quantity() {
        assert!(validate_quantity(1).is_ok());
        assert!(validate_quantity(999).is_ok());

        assert!(validate_quantity(0).is_err());
        assert!(validate_quantity(-1).is_err());
    }

    #[test]
    fn test_validate_non_negative() {
        assert!(validate_non_negative("quantity", 0).is_ok());
        assert_eq!(
            validate_non_negative("quantity", -2),
            Err(ValidationError::Negative {
                field: "quantity".to_string(),
                value: -2
            })
        );
    }

    #[test]
    fn test_validate_discount_amount() {
        assert!(validate_discount_amount(Money::from_cents(1)).is_ok());
        assert!(validate_discount_amount(Money::zero()).is_err());
        assert!(validate_discount_amount(Money::from_cents(-500)).is_err());
    }

    #[test]
    fn test_validate_price() {
        assert!(validate_price(Money::from_cents(1099)).is_ok());
        assert!(validate_price(Money::zero()).is_err());
    }

    #[test]
    fn test_validate_rate_bps() {
        assert!(validate_rate_bps(0).is_ok());
        assert!(validate_rate_bps(1000).is_ok());
        assert!(validate_rate_bps(10000).is_ok());
        assert!(validate_rate_bps(10001).is_err());
    }

    #[test]
    fn test_validate_divisor() {
        assert!(validate_divisor("amount", 3).is_ok());
        assert!(validate_divisor("amount", 0).is_err());
    }
}
