//! # Domain Types
//!
//! Core domain types used throughout basket.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │    Category     │◄──│     Product     │   │  DiscountName   │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  title          │   │  title          │   │  non-blank      │       │
//! │  │  parent?  ──┐   │   │  price (> 0)    │   │  arbitration    │       │
//! │  └─────────────┼───┘   │  category       │   │  key            │       │
//! │        ▲       │       └─────────────────┘   └─────────────────┘       │
//! │        └───────┘                                                        │
//! │                                                                         │
//! │  ┌─────────────────┐                                                    │
//! │  │      Rate       │   0..=10000 basis points (0% - 100%)               │
//! │  └─────────────────┘                                                    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

use crate::error::{CoreError, CoreResult, ValidationError};
use crate::money::Money;
use crate::validation::{validate_price, validate_rate_bps, validate_title};
use crate::MAX_RATE_BPS;

// =============================================================================
// Rate
// =============================================================================

/// A percentage in basis points, constrained to 0% - 100% inclusive.
///
/// ## Why Basis Points?
/// 1 basis point = 0.01%. 1250 bps = 12.5%. Integer storage keeps rate
/// discounts exact, the same way `Money` keeps amounts exact.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub struct Rate(u32);

impl Rate {
    /// Creates a rate from basis points.
    ///
    /// ## Errors
    /// `InvalidValue` above 10000 bps.
    pub fn from_bps(bps: u32) -> CoreResult<Self> {
        validate_rate_bps(bps)?;
        Ok(Rate(bps))
    }

    /// Creates a rate from a percentage (for convenience).
    ///
    /// ## Example
    /// ```rust
    /// use basket_core::types::Rate;
    ///
    /// assert_eq!(Rate::from_percentage(8.25).unwrap().bps(), 825);
    /// assert!(Rate::from_percentage(100.5).is_err());
    /// assert!(Rate::from_percentage(-1.0).is_err());
    /// ```
    pub fn from_percentage(pct: f64) -> CoreResult<Self> {
        if !pct.is_finite() || !(0.0..=100.0).contains(&pct) {
            return Err(ValidationError::OutOfRange {
                field: "rate".to_string(),
                min: 0,
                max: 100,
            }
            .into());
        }
        Rate::from_bps((pct * 100.0).round() as u32)
    }

    /// Returns the rate in basis points.
    #[inline]
    pub const fn bps(&self) -> u32 {
        self.0
    }

    /// Returns the rate as a percentage (for display only).
    #[inline]
    pub fn percentage(&self) -> f64 {
        self.0 as f64 / 100.0
    }

    /// Zero rate.
    #[inline]
    pub const fn zero() -> Self {
        Rate(0)
    }

    /// One hundred percent.
    #[inline]
    pub const fn full() -> Self {
        Rate(MAX_RATE_BPS)
    }

    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }
}

impl fmt::Display for Rate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}%", self.percentage())
    }
}

impl TryFrom<u32> for Rate {
    type Error = CoreError;

    fn try_from(bps: u32) -> Result<Self, Self::Error> {
        Rate::from_bps(bps)
    }
}

impl From<Rate> for u32 {
    fn from(rate: Rate) -> Self {
        rate.0
    }
}

// =============================================================================
// Discount Name
// =============================================================================

/// The arbitration key of a discount.
///
/// Two discounts with the same name compete for one slot in a cart;
/// discounts with different names apply independently.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct DiscountName(String);

impl DiscountName {
    /// Creates a discount name.
    ///
    /// ## Errors
    /// `InvalidValue` when the name is blank.
    pub fn new(name: impl AsRef<str>) -> CoreResult<Self> {
        Ok(DiscountName(validate_title("discount name", name.as_ref())?))
    }

    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DiscountName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for DiscountName {
    type Error = CoreError;

    fn try_from(name: String) -> Result<Self, Self::Error> {
        DiscountName::new(name)
    }
}

impl From<DiscountName> for String {
    fn from(name: DiscountName) -> Self {
        name.0
    }
}

// =============================================================================
// Category
// =============================================================================

/// A node in the category tree.
///
/// The parent link is shared and immutable. It is only used to answer
/// ancestry and depth questions; a category never owns its children.
/// Equality and ordering combine the title and the whole parent chain.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Category {
    title: String,
    parent: Option<Arc<Category>>,
}

impl Category {
    /// Creates a category, optionally below `parent`.
    pub fn new(title: impl AsRef<str>, parent: Option<Arc<Category>>) -> CoreResult<Self> {
        Ok(Category {
            title: validate_title("category title", title.as_ref())?,
            parent,
        })
    }

    /// Creates a top-level category.
    pub fn root(title: impl AsRef<str>) -> CoreResult<Self> {
        Category::new(title, None)
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn parent(&self) -> Option<&Category> {
        self.parent.as_deref()
    }

    /// Number of ancestors above this category (a root has depth 0).
    pub fn depth(&self) -> usize {
        let mut depth = 0;
        let mut current = self.parent();
        while let Some(category) = current {
            depth += 1;
            current = category.parent();
        }
        depth
    }

    /// Returns true if `ancestor` appears anywhere above this category.
    pub fn is_descendant_of(&self, ancestor: &Category) -> bool {
        let mut current = self.parent();
        while let Some(category) = current {
            if category == ancestor {
                return true;
            }
            current = category.parent();
        }
        false
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.title)
    }
}

// =============================================================================
// Product
// =============================================================================

/// A product available for sale.
///
/// Immutable. Equality covers title, price and category: the same title at
/// a different price is a different product.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Product {
    title: String,
    price: Money,
    category: Arc<Category>,
}

impl Product {
    /// Creates a product.
    ///
    /// ## Errors
    /// `InvalidValue` for a blank title or a price that is not positive.
    pub fn new(title: impl AsRef<str>, price: Money, category: Arc<Category>) -> CoreResult<Self> {
        let title = validate_title("product title", title.as_ref())?;
        validate_price(price)?;

        Ok(Product {
            title,
            price,
            category,
        })
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    /// Returns the current list price.
    #[inline]
    pub fn price(&self) -> Money {
        self.price
    }

    pub fn category(&self) -> &Category {
        &self.category
    }

    /// Returns the shared category handle.
    pub fn category_handle(&self) -> Arc<Category> {
        Arc::clone(&self.category)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
