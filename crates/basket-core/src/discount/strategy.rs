//! # Discount Strategies
//!
//! The two pluggable halves of every discount.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                 ValidationStrategy  ×  CalculationStrategy              │
//! │                                                                         │
//! │  "May this discount apply?"          "How much is it worth?"            │
//! │  ───────────────────────────         ──────────────────────             │
//! │  Unconditional                        FlatAmount     constant           │
//! │  MinimumTotalQuantity   qty  ≥ min    FlatRate       cart × rate        │
//! │  ContainsProduct        qty  ≥ 1      CategoryRate   category × rate    │
//! │  MinimumCategoryQuantity qty ≥ min                                      │
//! │  MinimumCartAmount      amt  ≥ min                                      │
//! │                                                                         │
//! │  Both read the cart's LIVE state at the moment of evaluation.           │
//! │  Every threshold is inclusive.                                          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::sync::Arc;

use crate::cart::ShoppingCart;
use crate::error::CoreResult;
use crate::money::Money;
use crate::quantity::Quantity;
use crate::types::{Category, Product, Rate};
use crate::validation::validate_discount_amount;

// =============================================================================
// Strategy Traits
// =============================================================================

/// Decides whether a discount may apply to a cart.
pub trait ValidationStrategy {
    fn is_valid(&self, cart: &ShoppingCart) -> bool;
}

/// Computes what a discount is worth for a cart.
pub trait CalculationStrategy {
    fn calculate(&self, cart: &ShoppingCart) -> Money;
}

// =============================================================================
// Validation Strategies
// =============================================================================

/// Always valid. Used by coupons and ad-hoc discounts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Unconditional;

impl ValidationStrategy for Unconditional {
    fn is_valid(&self, _cart: &ShoppingCart) -> bool {
        true
    }
}

/// Valid when the cart holds at least `minimum` units in total.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MinimumTotalQuantity {
    minimum: Quantity,
}

impl MinimumTotalQuantity {
    pub fn new(minimum: Quantity) -> Self {
        MinimumTotalQuantity { minimum }
    }

    pub fn minimum(&self) -> Quantity {
        self.minimum
    }
}

impl ValidationStrategy for MinimumTotalQuantity {
    fn is_valid(&self, cart: &ShoppingCart) -> bool {
        cart.total_quantity() >= self.minimum
    }
}

/// Valid when the cart holds at least one unit of `product`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ContainsProduct {
    product: Product,
}

impl ContainsProduct {
    pub fn new(product: Product) -> Self {
        ContainsProduct { product }
    }

    pub fn product(&self) -> &Product {
        &self.product
    }
}

impl ValidationStrategy for ContainsProduct {
    fn is_valid(&self, cart: &ShoppingCart) -> bool {
        !cart.quantity_of_product(&self.product).is_zero()
    }
}

/// Valid when the cart holds at least `minimum` units of `category`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MinimumCategoryQuantity {
    category: Arc<Category>,
    minimum: Quantity,
}

impl MinimumCategoryQuantity {
    pub fn new(category: Arc<Category>, minimum: Quantity) -> Self {
        MinimumCategoryQuantity { category, minimum }
    }

    pub fn category(&self) -> &Category {
        &self.category
    }

    pub fn minimum(&self) -> Quantity {
        self.minimum
    }
}

impl ValidationStrategy for MinimumCategoryQuantity {
    fn is_valid(&self, cart: &ShoppingCart) -> bool {
        cart.quantity_in_category(&self.category) >= self.minimum
    }
}

/// Valid when the cart's current amount is at least `threshold`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MinimumCartAmount {
    threshold: Money,
}

impl MinimumCartAmount {
    pub fn new(threshold: Money) -> Self {
        MinimumCartAmount { threshold }
    }

    pub fn threshold(&self) -> Money {
        self.threshold
    }
}

impl ValidationStrategy for MinimumCartAmount {
    fn is_valid(&self, cart: &ShoppingCart) -> bool {
        cart.cart_amount() >= self.threshold
    }
}

// =============================================================================
// Calculation Strategies
// =============================================================================

/// A constant amount.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FlatAmount {
    amount: Money,
}

impl FlatAmount {
    /// ## Errors
    /// `InvalidValue` when `amount` is zero or negative.
    pub fn new(amount: Money) -> CoreResult<Self> {
        validate_discount_amount(amount)?;
        Ok(FlatAmount { amount })
    }

    pub fn amount(&self) -> Money {
        self.amount
    }
}

impl CalculationStrategy for FlatAmount {
    fn calculate(&self, _cart: &ShoppingCart) -> Money {
        self.amount
    }
}

/// A percentage of the cart's current amount.
///
/// During a provide pass nothing has been subtracted yet, so this is a
/// percentage of the undiscounted total.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FlatRate {
    rate: Rate,
}

impl FlatRate {
    pub fn new(rate: Rate) -> Self {
        FlatRate { rate }
    }

    pub fn rate(&self) -> Rate {
        self.rate
    }
}

impl CalculationStrategy for FlatRate {
    fn calculate(&self, cart: &ShoppingCart) -> Money {
        cart.cart_amount().percentage(self.rate)
    }
}

/// A percentage of what the cart spends in one category.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CategoryRate {
    category: Arc<Category>,
    rate: Rate,
}

impl CategoryRate {
    pub fn new(category: Arc<Category>, rate: Rate) -> Self {
        CategoryRate { category, rate }
    }

    pub fn category(&self) -> &Category {
        &self.category
    }

    pub fn rate(&self) -> Rate {
        self.rate
    }
}

impl CalculationStrategy for CategoryRate {
    fn calculate(&self, cart: &ShoppingCart) -> Money {
        cart.total_price_in_category(&self.category).percentage(self.rate)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn food() -> Arc<Category> {
        Arc::new(Category::root("Food").unwrap())
    }

    fn test_product(title: &str, units: i64, category: Arc<Category>) -> Product {
        Product::new(title, Money::from_units(units), category).unwrap()
    }

    fn qty(value: i64) -> Quantity {
        Quantity::new(value).unwrap()
    }

    #[test]
    fn test_flat_amount_rejects_non_positive() {
        assert!(FlatAmount::new(Money::from_units(5)).is_ok());
        assert!(FlatAmount::new(Money::zero()).is_err());
        assert!(FlatAmount::new(Money::from_units(-5)).is_err());
    }

    #[test]
    fn test_minimum_total_quantity_is_inclusive() {
        let apple = test_product("Apple", 10, food());
        let rule = MinimumTotalQuantity::new(qty(5));

        let mut cart = ShoppingCart::new();
        cart.add_product(&apple, qty(4)).unwrap();
        assert!(!rule.is_valid(&cart));

        cart.add_product(&apple, qty(1)).unwrap();
        assert!(rule.is_valid(&cart));
    }

    #[test]
    fn test_contains_product() {
        let category = food();
        let apple = test_product("Apple", 10, Arc::clone(&category));
        let pear = test_product("Pear", 4, category);

        let mut cart = ShoppingCart::new();
        cart.add_product(&pear, qty(1)).unwrap();

        assert!(!ContainsProduct::new(apple.clone()).is_valid(&cart));
        cart.add_product(&apple, qty(1)).unwrap();
        assert!(ContainsProduct::new(apple).is_valid(&cart));
    }

    #[test]
    fn test_minimum_category_quantity() {
        let category = food();
        let toys = Arc::new(Category::root("Toys").unwrap());
        let apple = test_product("Apple", 10, Arc::clone(&category));
        let ball = test_product("Ball", 3, Arc::clone(&toys));

        let mut cart = ShoppingCart::new();
        cart.add_product(&apple, qty(2)).unwrap();
        cart.add_product(&ball, qty(9)).unwrap();

        assert!(MinimumCategoryQuantity::new(Arc::clone(&category), qty(2)).is_valid(&cart));
        assert!(!MinimumCategoryQuantity::new(category, qty(3)).is_valid(&cart));
    }

    #[test]
    fn test_minimum_cart_amount_is_inclusive() {
        let apple = test_product("Apple", 10, food());
        let mut cart = ShoppingCart::new();
        cart.add_product(&apple, qty(2)).unwrap();

        assert!(MinimumCartAmount::new(Money::from_units(20)).is_valid(&cart));
        assert!(!MinimumCartAmount::new(Money::from_units(21)).is_valid(&cart));
    }

    #[test]
    fn test_rate_calculations() {
        let category = food();
        let toys = Arc::new(Category::root("Toys").unwrap());
        let apple = test_product("Apple", 10, Arc::clone(&category));
        let ball = test_product("Ball", 20, Arc::clone(&toys));

        let mut cart = ShoppingCart::new();
        cart.add_product(&apple, qty(3)).unwrap();
        cart.add_product(&ball, qty(1)).unwrap();

        let ten_percent = Rate::from_percentage(10.0).unwrap();
        assert_eq!(FlatRate::new(ten_percent).calculate(&cart), Money::from_units(5));
        assert_eq!(
            CategoryRate::new(category, ten_percent).calculate(&cart),
            Money::from_units(3)
        );
    }
}
