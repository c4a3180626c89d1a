//! # Discounts
//!
//! A discount binds one validation strategy and one calculation strategy
//! under a stable [`DiscountName`], and knows whether it should replace a
//! same-named competitor already installed in a cart.
//!
//! ## The `add_to` Protocol
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  discount.add_to(cart)                                                  │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  1. validation.is_valid(cart)? ── no ──► skip (info log, not an error) │
//! │       │ yes                                                             │
//! │       ▼                                                                 │
//! │  2. amount = calculation.calculate(cart)                                │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  3. champion = cart.champion(name)            (may be absent)           │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  4. self.is_greater_than(champion)? ── no ──► keep champion             │
//! │       │ yes                                                             │
//! │       ▼                                                                 │
//! │     cart.install_champion(self, amount)                                 │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The realized amount is returned to the cart and stored next to the
//! champion. A `Discount` itself never changes after construction, so the
//! same instance can be shared by any number of providers and carts.
//!
//! ## Arbitration Per Kind
//! | Kind               | Compared by (lexicographic, higher wins)       |
//! |--------------------|------------------------------------------------|
//! | QuantityThreshold  | minimum total quantity, then amount            |
//! | ProductType        | amount                                         |
//! | CategoryAmount     | minimum category quantity, then amount ¹       |
//! | CategoryRate       | minimum category quantity, then rate ¹         |
//! | CartAmount         | minimum cart amount, then amount               |
//! | CartRate           | minimum cart amount, then rate                 |
//! | Fixed              | amount                                         |
//!
//! Comparing against no champion, or against a different kind, always
//! yields `true`. Equal competitors yield `false` both ways, so the first
//! installed champion stays.
//!
//! ¹ Two category discounts that target *different* categories always
//! compare as greater. This mirrors the behavior this engine was built to
//! reproduce and is pinned by `test_category_discount_on_other_category_always_replaces`.

pub mod strategy;

use std::sync::Arc;
use tracing::{debug, info};

use crate::cart::ShoppingCart;
use crate::error::CoreResult;
use crate::money::Money;
use crate::quantity::Quantity;
use crate::types::{Category, DiscountName, Product, Rate};

pub use strategy::{
    CalculationStrategy, CategoryRate, ContainsProduct, FlatAmount, FlatRate, MinimumCartAmount,
    MinimumCategoryQuantity, MinimumTotalQuantity, Unconditional, ValidationStrategy,
};

// =============================================================================
// Rule
// =============================================================================

/// A named pair of strategies.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Rule<V, C> {
    name: DiscountName,
    validation: V,
    calculation: C,
}

impl<V, C> Rule<V, C>
where
    V: ValidationStrategy,
    C: CalculationStrategy,
{
    pub fn new(name: DiscountName, validation: V, calculation: C) -> Self {
        Rule {
            name,
            validation,
            calculation,
        }
    }

    pub fn name(&self) -> &DiscountName {
        &self.name
    }

    pub fn validation(&self) -> &V {
        &self.validation
    }

    pub fn calculation(&self) -> &C {
        &self.calculation
    }

    /// Returns the realized amount, or `None` when the rule does not apply.
    pub fn evaluate(&self, cart: &ShoppingCart) -> Option<Money> {
        if !self.validation.is_valid(cart) {
            return None;
        }
        Some(self.calculation.calculate(cart))
    }
}

// =============================================================================
// Discount
// =============================================================================

/// Every kind of discount the engine knows how to arbitrate.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Discount {
    /// Flat amount off once the cart holds enough units.
    QuantityThreshold(Rule<MinimumTotalQuantity, FlatAmount>),

    /// Flat amount off when a given product is in the cart.
    ProductType(Rule<ContainsProduct, FlatAmount>),

    /// Flat amount off once a category holds enough units.
    CategoryAmount(Rule<MinimumCategoryQuantity, FlatAmount>),

    /// Percentage of a category's spend once it holds enough units.
    CategoryRate(Rule<MinimumCategoryQuantity, CategoryRate>),

    /// Flat amount off above a cart amount.
    CartAmount(Rule<MinimumCartAmount, FlatAmount>),

    /// Percentage of the cart above a cart amount.
    CartRate(Rule<MinimumCartAmount, FlatRate>),

    /// Unconditional flat amount (coupons, ad-hoc adjustments).
    Fixed(Rule<Unconditional, FlatAmount>),
}

impl Discount {
    // -------------------------------------------------------------------------
    // Constructors
    // -------------------------------------------------------------------------

    pub fn quantity_threshold(
        name: impl AsRef<str>,
        minimum: Quantity,
        amount: Money,
    ) -> CoreResult<Self> {
        Ok(Discount::QuantityThreshold(Rule::new(
            DiscountName::new(name)?,
            MinimumTotalQuantity::new(minimum),
            FlatAmount::new(amount)?,
        )))
    }

    pub fn product_type(
        name: impl AsRef<str>,
        product: Product,
        amount: Money,
    ) -> CoreResult<Self> {
        Ok(Discount::ProductType(Rule::new(
            DiscountName::new(name)?,
            ContainsProduct::new(product),
            FlatAmount::new(amount)?,
        )))
    }

    pub fn category_amount(
        name: impl AsRef<str>,
        category: Arc<Category>,
        minimum: Quantity,
        amount: Money,
    ) -> CoreResult<Self> {
        Ok(Discount::CategoryAmount(Rule::new(
            DiscountName::new(name)?,
            MinimumCategoryQuantity::new(category, minimum),
            FlatAmount::new(amount)?,
        )))
    }

    pub fn category_rate(
        name: impl AsRef<str>,
        category: Arc<Category>,
        minimum: Quantity,
        rate: Rate,
    ) -> CoreResult<Self> {
        Ok(Discount::CategoryRate(Rule::new(
            DiscountName::new(name)?,
            MinimumCategoryQuantity::new(Arc::clone(&category), minimum),
            CategoryRate::new(category, rate),
        )))
    }

    pub fn cart_amount(name: impl AsRef<str>, threshold: Money, amount: Money) -> CoreResult<Self> {
        Ok(Discount::CartAmount(Rule::new(
            DiscountName::new(name)?,
            MinimumCartAmount::new(threshold),
            FlatAmount::new(amount)?,
        )))
    }

    pub fn cart_rate(name: impl AsRef<str>, threshold: Money, rate: Rate) -> CoreResult<Self> {
        Ok(Discount::CartRate(Rule::new(
            DiscountName::new(name)?,
            MinimumCartAmount::new(threshold),
            FlatRate::new(rate),
        )))
    }

    pub fn fixed(name: impl AsRef<str>, amount: Money) -> CoreResult<Self> {
        Ok(Discount::Fixed(Rule::new(
            DiscountName::new(name)?,
            Unconditional,
            FlatAmount::new(amount)?,
        )))
    }

    // -------------------------------------------------------------------------
    // Accessors
    // -------------------------------------------------------------------------

    pub fn name(&self) -> &DiscountName {
        match self {
            Discount::QuantityThreshold(rule) => rule.name(),
            Discount::ProductType(rule) => rule.name(),
            Discount::CategoryAmount(rule) => rule.name(),
            Discount::CategoryRate(rule) => rule.name(),
            Discount::CartAmount(rule) => rule.name(),
            Discount::CartRate(rule) => rule.name(),
            Discount::Fixed(rule) => rule.name(),
        }
    }

    /// Short label for logs.
    pub fn kind(&self) -> &'static str {
        match self {
            Discount::QuantityThreshold(_) => "quantity_threshold",
            Discount::ProductType(_) => "product_type",
            Discount::CategoryAmount(_) => "category_amount",
            Discount::CategoryRate(_) => "category_rate",
            Discount::CartAmount(_) => "cart_amount",
            Discount::CartRate(_) => "cart_rate",
            Discount::Fixed(_) => "fixed",
        }
    }

    /// Evaluates validation then calculation against the cart's live state.
    pub fn evaluate(&self, cart: &ShoppingCart) -> Option<Money> {
        match self {
            Discount::QuantityThreshold(rule) => rule.evaluate(cart),
            Discount::ProductType(rule) => rule.evaluate(cart),
            Discount::CategoryAmount(rule) => rule.evaluate(cart),
            Discount::CategoryRate(rule) => rule.evaluate(cart),
            Discount::CartAmount(rule) => rule.evaluate(cart),
            Discount::CartRate(rule) => rule.evaluate(cart),
            Discount::Fixed(rule) => rule.evaluate(cart),
        }
    }

    // -------------------------------------------------------------------------
    // Arbitration
    // -------------------------------------------------------------------------

    /// Returns true if this discount should replace `champion`.
    ///
    /// Strict: equal competitors return false in both directions.
    pub fn is_greater_than(&self, champion: Option<&Discount>) -> bool {
        let Some(champion) = champion else {
            return true;
        };

        match (self, champion) {
            (Discount::QuantityThreshold(a), Discount::QuantityThreshold(b)) => {
                (a.validation().minimum(), a.calculation().amount())
                    > (b.validation().minimum(), b.calculation().amount())
            }
            (Discount::ProductType(a), Discount::ProductType(b)) => {
                a.calculation().amount() > b.calculation().amount()
            }
            (Discount::CategoryAmount(a), Discount::CategoryAmount(b)) => {
                if a.validation().category() != b.validation().category() {
                    return true;
                }
                (a.validation().minimum(), a.calculation().amount())
                    > (b.validation().minimum(), b.calculation().amount())
            }
            (Discount::CategoryRate(a), Discount::CategoryRate(b)) => {
                if a.validation().category() != b.validation().category() {
                    return true;
                }
                (a.validation().minimum(), a.calculation().rate())
                    > (b.validation().minimum(), b.calculation().rate())
            }
            (Discount::CartAmount(a), Discount::CartAmount(b)) => {
                (a.validation().threshold(), a.calculation().amount())
                    > (b.validation().threshold(), b.calculation().amount())
            }
            (Discount::CartRate(a), Discount::CartRate(b)) => {
                (a.validation().threshold(), a.calculation().rate())
                    > (b.validation().threshold(), b.calculation().rate())
            }
            (Discount::Fixed(a), Discount::Fixed(b)) => {
                a.calculation().amount() > b.calculation().amount()
            }
            _ => true,
        }
    }

    /// Offers this discount to `cart`.
    ///
    /// ## Returns
    /// `true` if the discount was installed as the champion for its name.
    pub fn add_to(self: &Arc<Self>, cart: &mut ShoppingCart) -> bool {
        let Some(amount) = self.evaluate(cart) else {
            info!(
                discount = %self.name(),
                kind = self.kind(),
                "Discount not valid for cart, skipped"
            );
            return false;
        };

        let champion = cart.champion(self.name()).map(|applied| applied.discount());
        if !self.is_greater_than(champion) {
            debug!(discount = %self.name(), %amount, "Existing champion kept");
            return false;
        }

        debug!(
            discount = %self.name(),
            kind = self.kind(),
            %amount,
            "Discount installed as champion"
        );
        cart.install_champion(Arc::clone(self), amount);
        true
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn category(title: &str) -> Arc<Category> {
        Arc::new(Category::root(title).unwrap())
    }

    fn units(value: i64) -> Money {
        Money::from_units(value)
    }

    fn qty(value: i64) -> Quantity {
        Quantity::new(value).unwrap()
    }

    fn cart_with(units_each: i64, quantity: i64) -> ShoppingCart {
        let product =
            Product::new("Apple", Money::from_units(units_each), category("Food")).unwrap();
        let mut cart = ShoppingCart::new();
        cart.add_product(&product, qty(quantity)).unwrap();
        cart
    }

    #[test]
    fn test_constructors_reject_bad_values() {
        assert!(Discount::fixed("", units(5)).is_err());
        assert!(Discount::fixed("coupon", Money::zero()).is_err());
        assert!(Discount::cart_amount("c", units(10), units(-1)).is_err());
    }

    #[test]
    fn test_anything_beats_no_champion() {
        let discount = Discount::fixed("coupon", units(5)).unwrap();
        assert!(discount.is_greater_than(None));
    }

    #[test]
    fn test_cart_amount_compares_threshold_then_amount() {
        let low = Discount::cart_amount("c", units(10), units(5)).unwrap();
        let high = Discount::cart_amount("c", units(20), units(10)).unwrap();
        let high_threshold_small_amount = Discount::cart_amount("c", units(20), units(1)).unwrap();

        assert!(high.is_greater_than(Some(&low)));
        assert!(!low.is_greater_than(Some(&high)));
        assert!(high_threshold_small_amount.is_greater_than(Some(&low)));
    }

    #[test]
    fn test_quantity_threshold_compares_minimum_then_amount() {
        let a = Discount::quantity_threshold("q", qty(5), units(10)).unwrap();
        let b = Discount::quantity_threshold("q", qty(5), units(12)).unwrap();
        let c = Discount::quantity_threshold("q", qty(3), units(50)).unwrap();

        assert!(b.is_greater_than(Some(&a)));
        assert!(a.is_greater_than(Some(&c)));
        assert!(!c.is_greater_than(Some(&a)));
    }

    #[test]
    fn test_equal_competitors_are_not_greater_either_way() {
        let a = Discount::cart_rate("c", units(10), Rate::from_bps(1000).unwrap()).unwrap();
        let b = a.clone();

        assert!(!a.is_greater_than(Some(&b)));
        assert!(!b.is_greater_than(Some(&a)));
    }

    #[test]
    fn test_incompatible_kinds_always_replace() {
        let fixed = Discount::fixed("x", units(100)).unwrap();
        let cart = Discount::cart_amount("x", units(10), units(1)).unwrap();

        assert!(cart.is_greater_than(Some(&fixed)));
        assert!(fixed.is_greater_than(Some(&cart)));
    }

    #[test]
    fn test_category_discount_on_other_category_always_replaces() {
        let food = Discount::category_amount("cat", category("Food"), qty(10), units(50)).unwrap();
        let toys = Discount::category_amount("cat", category("Toys"), qty(1), units(1)).unwrap();

        // Neither ranks the other; both report "greater".
        assert!(toys.is_greater_than(Some(&food)));
        assert!(food.is_greater_than(Some(&toys)));
    }

    #[test]
    fn test_category_rate_same_category_compares_minimum_then_rate() {
        let food = category("Food");
        let five_percent = Rate::from_bps(500).unwrap();
        let ten_percent = Rate::from_bps(1000).unwrap();
        let five = Discount::category_rate("cat", Arc::clone(&food), qty(3), five_percent).unwrap();
        let ten = Discount::category_rate("cat", food, qty(3), ten_percent).unwrap();

        assert!(ten.is_greater_than(Some(&five)));
        assert!(!five.is_greater_than(Some(&ten)));
    }

    #[test]
    fn test_add_to_skips_invalid_discount() {
        let mut cart = cart_with(10, 1);
        let discount = Arc::new(Discount::quantity_threshold("bulk", qty(5), units(10)).unwrap());

        assert!(!discount.add_to(&mut cart));
        assert!(cart.champion(discount.name()).is_none());
    }

    #[test]
    fn test_add_to_installs_valid_discount_with_realized_amount() {
        let mut cart = cart_with(10, 6);
        let discount = Arc::new(Discount::quantity_threshold("bulk", qty(5), units(10)).unwrap());

        assert!(discount.add_to(&mut cart));
        let champion = cart.champion(discount.name()).unwrap();
        assert_eq!(champion.amount(), units(10));
        assert_eq!(champion.discount(), discount.as_ref());
    }

    #[test]
    fn test_add_to_keeps_greater_champion() {
        let mut cart = cart_with(10, 2);
        let high = Arc::new(Discount::cart_amount("min-cart", units(20), units(10)).unwrap());
        let low = Arc::new(Discount::cart_amount("min-cart", units(10), units(5)).unwrap());

        assert!(high.add_to(&mut cart));
        assert!(!low.add_to(&mut cart));

        let name = DiscountName::new("min-cart").unwrap();
        assert_eq!(cart.champion(&name).unwrap().amount(), units(10));
    }

    #[test]
    fn test_re_adding_same_discount_is_a_no_op() {
        let mut cart = cart_with(10, 2);
        let discount = Arc::new(Discount::fixed("coupon", units(5)).unwrap());

        assert!(discount.add_to(&mut cart));
        assert!(!discount.add_to(&mut cart));
        assert_eq!(cart.discounts().count(), 1);
    }
}
