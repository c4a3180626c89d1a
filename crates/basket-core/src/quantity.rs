//! # Quantity
//!
//! Non-negative item counts.
//!
//! A `Quantity` can be zero (an empty aggregate, a category with nothing in
//! it) but never negative. Adding *zero* items to a cart is still rejected;
//! that rule lives in [`crate::cart::ShoppingCart::add_product`], not here.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Mul};

use crate::error::{CoreError, CoreResult, ValidationError};
use crate::validation::{validate_divisor, validate_non_negative};

/// A non-negative count of units.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "i64")]
pub struct Quantity(i64);

impl Quantity {
    /// Creates a quantity.
    ///
    /// ## Errors
    /// `InvalidValue` when `value` is negative.
    ///
    /// ## Example
    /// ```rust
    /// use basket_core::quantity::Quantity;
    ///
    /// assert_eq!(Quantity::new(5).unwrap().value(), 5);
    /// assert!(Quantity::new(-1).is_err());
    /// ```
    pub fn new(value: i64) -> CoreResult<Self> {
        validate_non_negative("quantity", value)?;
        Ok(Quantity(value))
    }

    /// Zero units.
    #[inline]
    pub const fn zero() -> Self {
        Quantity(0)
    }

    /// Returns the raw count.
    #[inline]
    pub const fn value(&self) -> i64 {
        self.0
    }

    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// Subtracts, failing if the result would be negative.
    pub fn checked_sub(&self, other: Quantity) -> CoreResult<Quantity> {
        Quantity::new(self.0 - other.0)
    }

    /// Adds, failing if the sum does not fit.
    pub fn checked_add(&self, other: Quantity) -> CoreResult<Quantity> {
        self.0.checked_add(other.0).map(Quantity).ok_or_else(|| {
            CoreError::from(ValidationError::Overflow {
                field: "quantity".to_string(),
            })
        })
    }

    /// Integer division, truncating.
    ///
    /// ## Errors
    /// `InvalidValue` when `divisor` is zero.
    pub fn divide(&self, divisor: Quantity) -> CoreResult<Quantity> {
        validate_divisor("quantity", divisor.0)?;
        Ok(Quantity(self.0 / divisor.0))
    }
}

impl fmt::Display for Quantity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// An absent quantity is zero rather than an error.
impl From<Option<u32>> for Quantity {
    fn from(value: Option<u32>) -> Self {
        Quantity(value.map(i64::from).unwrap_or(0))
    }
}

impl From<u32> for Quantity {
    fn from(value: u32) -> Self {
        Quantity(i64::from(value))
    }
}

impl TryFrom<i64> for Quantity {
    type Error = crate::error::CoreError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        Quantity::new(value)
    }
}

impl From<Quantity> for i64 {
    fn from(qty: Quantity) -> Self {
        qty.0
    }
}

impl Add for Quantity {
    type Output = Self;

    #[inline]
    fn add(self, other: Self) -> Self {
        Quantity(self.0 + other.0)
    }
}

impl AddAssign for Quantity {
    #[inline]
    fn add_assign(&mut self, other: Self) {
        self.0 += other.0;
    }
}

impl Mul for Quantity {
    type Output = Self;

    #[inline]
    fn mul(self, other: Self) -> Self {
        Quantity(self.0 * other.0)
    }
}

impl Sum for Quantity {
    fn sum<I: Iterator<Item = Quantity>>(iter: I) -> Self {
        iter.fold(Quantity::zero(), Add::add)
    }
}
