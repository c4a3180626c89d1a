//! # Money Module
//!
//! Provides the `Money` type for handling monetary values safely.
//!
//! ## Why Integer Money?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  THE FLOATING POINT PROBLEM                                             │
//! │                                                                         │
//! │  In floating point:                                                     │
//! │    0.1 + 0.2 = 0.30000000000000004  ❌ WRONG!                           │
//! │                                                                         │
//! │  A 10% campaign on a $0.30 cart must not drift by a fraction of a cent │
//! │  depending on which discount was applied first.                         │
//! │                                                                         │
//! │  OUR SOLUTION: Integer Cents                                            │
//! │    Every amount is an i64 count of cents. Percentages are computed in  │
//! │    basis points with one explicit rounding step.                        │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use basket_core::money::Money;
//! use basket_core::types::Rate;
//!
//! let cart_amount = Money::from_cents(6000); // $60.00
//! let rate = Rate::from_percentage(10.0).unwrap();
//!
//! assert_eq!(cart_amount.percentage(rate), Money::from_cents(600));
//! assert!(cart_amount.divide(0).is_err());
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Mul, Sub, SubAssign};

use crate::error::{CoreError, CoreResult, ValidationError};
use crate::quantity::Quantity;
use crate::types::Rate;
use crate::validation::validate_divisor;

// =============================================================================
// Money Type
// =============================================================================

/// Represents a monetary value in the smallest currency unit (cents).
///
/// ## Design Decisions
/// - **i64 (signed)**: negative values may exist as intermediate results;
///   constructors of prices and discount amounts reject them
/// - **Single field tuple struct**: zero-cost abstraction over i64
/// - **Immutable**: every operation returns a new value
///
/// ## Where Money Flows
/// ```text
/// Product.price ──► CartItem.unit_price ──► CartItem.total_price
///                                                 │
///                                                 ▼
///       FlatAmount / FlatRate / CategoryRate ─► ShoppingCart.cart_amount
///                                                 │
///                                                 ▼
///                       total_discount, delivery_cost ─► total_amount
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Money(i64);

impl Money {
    /// Creates a Money value from cents (the smallest currency unit).
    ///
    /// ## Example
    /// ```rust
    /// use basket_core::money::Money;
    ///
    /// let price = Money::from_cents(1099); // Represents $10.99
    /// assert_eq!(price.cents(), 1099);
    /// ```
    #[inline]
    pub const fn from_cents(cents: i64) -> Self {
        Money(cents)
    }

    /// Creates a Money value from whole currency units.
    ///
    /// ## Example
    /// ```rust
    /// use basket_core::money::Money;
    ///
    /// assert_eq!(Money::from_units(10).cents(), 1000);
    /// ```
    #[inline]
    pub const fn from_units(units: i64) -> Self {
        Money(units * 100)
    }

    /// Creates a Money value from major and minor units (dollars and cents).
    ///
    /// For negative amounts only the major unit should be negative:
    /// `from_major_minor(-5, 50)` is -$5.50.
    #[inline]
    pub const fn from_major_minor(major: i64, minor: i64) -> Self {
        if major < 0 {
            Money(major * 100 - minor)
        } else {
            Money(major * 100 + minor)
        }
    }

    /// Returns the value in cents.
    #[inline]
    pub const fn cents(&self) -> i64 {
        self.0
    }

    /// Returns the major unit (dollars) portion.
    #[inline]
    pub const fn dollars(&self) -> i64 {
        self.0 / 100
    }

    /// Returns the minor unit (cents) portion (always 0-99).
    #[inline]
    pub const fn cents_part(&self) -> i64 {
        (self.0 % 100).abs()
    }

    /// Returns zero money value.
    #[inline]
    pub const fn zero() -> Self {
        Money(0)
    }

    /// Checks if the value is zero.
    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// Checks if the value is positive (greater than zero).
    #[inline]
    pub const fn is_positive(&self) -> bool {
        self.0 > 0
    }

    /// Checks if the value is negative (less than zero).
    #[inline]
    pub const fn is_negative(&self) -> bool {
        self.0 < 0
    }

    /// Returns the absolute value.
    #[inline]
    pub const fn abs(&self) -> Self {
        Money(self.0.abs())
    }

    /// Multiplies money by a quantity.
    ///
    /// ## Errors
    /// `InvalidValue` when the product does not fit in an i64 of cents.
    ///
    /// ## Example
    /// ```rust
    /// use basket_core::money::Money;
    /// use basket_core::quantity::Quantity;
    ///
    /// let unit_price = Money::from_cents(299);
    /// let line_total = unit_price.multiply_quantity(Quantity::new(3).unwrap()).unwrap();
    /// assert_eq!(line_total.cents(), 897);
    ///
    /// let huge = Quantity::new(i64::MAX / 100).unwrap();
    /// assert!(unit_price.multiply_quantity(huge).is_err());
    /// ```
    pub fn multiply_quantity(&self, qty: Quantity) -> CoreResult<Self> {
        self.0
            .checked_mul(qty.value())
            .map(Money)
            .ok_or_else(|| overflow("amount"))
    }

    /// Adds two amounts.
    ///
    /// ## Errors
    /// `InvalidValue` when the sum does not fit in an i64 of cents.
    pub fn checked_add(&self, other: Money) -> CoreResult<Self> {
        self.0
            .checked_add(other.0)
            .map(Money)
            .ok_or_else(|| overflow("amount"))
    }

    /// Adds two amounts, stopping at the largest representable amount.
    #[inline]
    pub const fn saturating_add(&self, other: Money) -> Self {
        Money(self.0.saturating_add(other.0))
    }

    /// Divides money by an integer divisor, truncating toward zero.
    ///
    /// ## Errors
    /// `InvalidValue` when `divisor` is zero.
    ///
    /// ## Precision
    /// $10.00 / 3 = $3.33. The lost cent is intentional and documented by
    /// the tests below; callers that need exact splits must distribute it.
    pub fn divide(&self, divisor: i64) -> CoreResult<Money> {
        validate_divisor("amount", divisor)?;
        Ok(Money(self.0 / divisor))
    }

    /// Calculates `self × rate / 100` with half-up rounding.
    ///
    /// ## Implementation
    /// Integer math in basis points: `(amount * bps + 5000) / 10000`.
    /// i128 prevents overflow on large amounts.
    ///
    /// ## Example
    /// ```rust
    /// use basket_core::money::Money;
    /// use basket_core::types::Rate;
    ///
    /// let amount = Money::from_cents(1000);           // $10.00
    /// let rate = Rate::from_bps(825).unwrap();        // 8.25%
    /// assert_eq!(amount.percentage(rate).cents(), 83); // $0.825 → $0.83
    /// ```
    pub fn percentage(&self, rate: Rate) -> Money {
        let cents = (self.0 as i128 * rate.bps() as i128 + 5000) / 10000;
        Money::from_cents(cents as i64)
    }
}

fn overflow(field: &str) -> CoreError {
    CoreError::from(ValidationError::Overflow {
        field: field.to_string(),
    })
}

// =============================================================================
// Trait Implementations
// =============================================================================

/// Display implementation shows money in a human-readable format.
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        write!(
            f,
            "{}${}.{:02}",
            sign,
            self.dollars().abs(),
            self.cents_part()
        )
    }
}

/// Default money is zero.
impl Default for Money {
    fn default() -> Self {
        Money::zero()
    }
}

/// An absent amount is zero rather than an error.
impl From<Option<i64>> for Money {
    fn from(cents: Option<i64>) -> Self {
        Money(cents.unwrap_or(0))
    }
}

impl Add for Money {
    type Output = Self;

    #[inline]
    fn add(self, other: Self) -> Self {
        Money(self.0 + other.0)
    }
}

impl AddAssign for Money {
    #[inline]
    fn add_assign(&mut self, other: Self) {
        self.0 += other.0;
    }
}

impl Sub for Money {
    type Output = Self;

    #[inline]
    fn sub(self, other: Self) -> Self {
        Money(self.0 - other.0)
    }
}

impl SubAssign for Money {
    #[inline]
    fn sub_assign(&mut self, other: Self) {
        self.0 -= other.0;
    }
}

/// Multiplication by i64.
impl Mul<i64> for Money {
    type Output = Self;

    #[inline]
    fn mul(self, factor: i64) -> Self {
        Money(self.0 * factor)
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Self {
        iter.fold(Money::zero(), Add::add)
    }
}

impl<'a> Sum<&'a Money> for Money {
    fn sum<I: Iterator<Item = &'a Money>>(iter: I) -> Self {
        iter.copied().sum()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
