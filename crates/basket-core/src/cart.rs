//! # Shopping Cart
//!
//! The mutable aggregate that collects items, arbitrates discounts per name,
//! and settles the payable amount.
//!
//! ## Settlement State Machine
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                     One Submission, One Direction                       │
//! │                                                                         │
//! │   Empty ──add_product()──► Populating                                   │
//! │                               │                                         │
//! │                  discount_provided(event)  (provider tree emits)        │
//! │                               ▼                                         │
//! │                      Discount-Collection   champions: name ──► amount   │
//! │                               │                                         │
//! │                        apply_discounts()                                │
//! │                               ▼                                         │
//! │                           Applying         cart_amount -= champion      │
//! │                               │            (discovery order, clamp 0)   │
//! │                   set_delivery_cost() + apply_delivery_cost()           │
//! │                               ▼                                         │
//! │                            Settled         total_amount                 │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Invariants
//! - Every `CartItem` has a quantity > 0
//! - At most one champion per `DiscountName`
//! - `cart_amount` never goes below zero during the apply pass
//! - `total_discount` is the sum of the champions' realized amounts

use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use std::sync::Arc;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::discount::Discount;
use crate::error::CoreResult;
use crate::money::Money;
use crate::provider::{DiscountListener, DiscountProvidedEvent};
use crate::quantity::Quantity;
use crate::summary::CartSummary;
use crate::types::{Category, DiscountName, Product};
use crate::validation::validate_quantity;

// =============================================================================
// Cart Item
// =============================================================================

/// A line in the cart.
///
/// ## Price Freezing
/// The unit price is copied from the product when the line is created and is
/// never re-read, so later price changes do not leak into an open cart.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CartItem {
    product: Product,
    quantity: Quantity,
    unit_price: Money,
    total_price: Money,
    added_at: DateTime<Utc>,
}

impl CartItem {
    fn from_product(product: &Product, quantity: Quantity) -> CoreResult<Self> {
        let unit_price = product.price();
        Ok(CartItem {
            product: product.clone(),
            quantity,
            unit_price,
            total_price: unit_price.multiply_quantity(quantity)?,
            added_at: Utc::now(),
        })
    }

    /// Adds units to the line and recomputes its total.
    ///
    /// The line is left untouched when the new total would overflow.
    fn increase_quantity(&mut self, quantity: Quantity) -> CoreResult<()> {
        let quantity = self.quantity.checked_add(quantity)?;
        self.total_price = self.unit_price.multiply_quantity(quantity)?;
        self.quantity = quantity;
        Ok(())
    }

    pub fn product(&self) -> &Product {
        &self.product
    }

    pub fn quantity(&self) -> Quantity {
        self.quantity
    }

    /// Price per unit at the time the line was created.
    pub fn unit_price(&self) -> Money {
        self.unit_price
    }

    pub fn total_price(&self) -> Money {
        self.total_price
    }

    pub fn added_at(&self) -> DateTime<Utc> {
        self.added_at
    }
}

// =============================================================================
// Applied Discount
// =============================================================================

/// The champion for one discount name, with the amount it realized.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppliedDiscount {
    discount: Arc<Discount>,
    amount: Money,
}

impl AppliedDiscount {
    pub fn discount(&self) -> &Discount {
        &self.discount
    }

    /// Returns the shared handle to the winning discount.
    pub fn shared(&self) -> Arc<Discount> {
        Arc::clone(&self.discount)
    }

    pub fn name(&self) -> &DiscountName {
        self.discount.name()
    }

    /// Amount computed against the cart when this champion was installed.
    pub fn amount(&self) -> Money {
        self.amount
    }
}

// =============================================================================
// Shopping Cart
// =============================================================================

/// A cart driven through one provide → apply → settle sequence.
#[derive(Debug, Clone)]
pub struct ShoppingCart {
    id: String,
    created_at: DateTime<Utc>,
    items: Vec<CartItem>,
    discounts: IndexMap<DiscountName, AppliedDiscount>,
    cart_amount: Money,
    total_discount: Money,
    delivery_cost: Money,
    total_amount: Money,
    discounts_applied: bool,
    delivery_applied: bool,
}

impl ShoppingCart {
    /// Creates a new empty cart.
    pub fn new() -> Self {
        ShoppingCart {
            id: Uuid::new_v4().to_string(),
            created_at: Utc::now(),
            items: Vec::new(),
            discounts: IndexMap::new(),
            cart_amount: Money::zero(),
            total_discount: Money::zero(),
            delivery_cost: Money::zero(),
            total_amount: Money::zero(),
            discounts_applied: false,
            delivery_applied: false,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    // -------------------------------------------------------------------------
    // Populating
    // -------------------------------------------------------------------------

    /// Adds a product, or increases the quantity of its existing line.
    ///
    /// The running `cart_amount` grows immediately, so validation strategies
    /// see the post-addition total.
    ///
    /// ## Errors
    /// `InvalidValue` when `quantity` is zero, or when the line total or the
    /// cart amount would overflow. The cart is left untouched.
    ///
    /// ## Example
    /// ```rust
    /// use std::sync::Arc;
    /// use basket_core::{Category, Money, Product, Quantity, ShoppingCart};
    ///
    /// let food = Arc::new(Category::root("Food").unwrap());
    /// let apple = Product::new("Apple", Money::from_units(10), food).unwrap();
    ///
    /// let mut cart = ShoppingCart::new();
    /// cart.add_product(&apple, Quantity::new(2).unwrap()).unwrap();
    /// cart.add_product(&apple, Quantity::new(1).unwrap()).unwrap();
    ///
    /// assert_eq!(cart.number_of_products(), 1);
    /// assert_eq!(cart.cart_amount(), Money::from_units(30));
    /// assert!(cart.add_product(&apple, Quantity::zero()).is_err());
    /// ```
    pub fn add_product(&mut self, product: &Product, quantity: Quantity) -> CoreResult<()> {
        validate_quantity(quantity.value())?;

        let added = product.price().multiply_quantity(quantity)?;
        let cart_amount = self.cart_amount.checked_add(added)?;

        match self.items.iter_mut().find(|item| item.product == *product) {
            Some(item) => item.increase_quantity(quantity)?,
            None => self.items.push(CartItem::from_product(product, quantity)?),
        }
        self.cart_amount = cart_amount;

        debug!(
            cart_id = %self.id,
            product = product.title(),
            %quantity,
            %added,
            "Product added to cart"
        );
        Ok(())
    }

    // -------------------------------------------------------------------------
    // Discount Collection
    // -------------------------------------------------------------------------

    /// Returns the current champion for `name`, if any.
    pub fn champion(&self, name: &DiscountName) -> Option<&AppliedDiscount> {
        self.discounts.get(name)
    }

    /// Installs `discount` as the champion for its name.
    ///
    /// Replacing an existing champion keeps the name's original position, so
    /// the apply pass follows first-discovery order.
    pub(crate) fn install_champion(&mut self, discount: Arc<Discount>, amount: Money) {
        let name = discount.name().clone();
        self.discounts
            .insert(name, AppliedDiscount { discount, amount });
    }

    /// Champions in discovery order.
    pub fn discounts(&self) -> impl Iterator<Item = &AppliedDiscount> {
        self.discounts.values()
    }

    // -------------------------------------------------------------------------
    // Settlement
    // -------------------------------------------------------------------------

    /// Subtracts every champion from the running amount, in discovery order.
    ///
    /// A champion worth at least the remaining amount clamps it to zero; the
    /// champion's full amount still counts toward `total_discount`, which
    /// saturates rather than overflowing. Calling this a second time on the
    /// same cart does nothing.
    pub fn apply_discounts(&mut self) {
        if self.discounts_applied {
            warn!(cart_id = %self.id, "Discounts already applied, ignoring");
            return;
        }

        for applied in self.discounts.values() {
            if applied.amount < self.cart_amount {
                self.cart_amount -= applied.amount;
            } else {
                self.cart_amount = Money::zero();
            }
            self.total_discount = self.total_discount.saturating_add(applied.amount);

            debug!(
                cart_id = %self.id,
                discount = %applied.name(),
                amount = %applied.amount,
                remaining = %self.cart_amount,
                "Discount applied"
            );
        }

        self.total_amount = self.cart_amount;
        self.discounts_applied = true;
    }

    pub fn set_delivery_cost(&mut self, cost: Money) {
        self.delivery_cost = cost;
    }

    /// Adds the delivery cost to the total, if one has been set.
    ///
    /// Once a positive cost has been added, later calls do nothing, like
    /// [`ShoppingCart::apply_discounts`].
    pub fn apply_delivery_cost(&mut self) {
        if self.delivery_applied {
            warn!(cart_id = %self.id, "Delivery cost already applied, ignoring");
            return;
        }

        if self.delivery_cost.is_positive() {
            self.total_amount = self.total_amount.saturating_add(self.delivery_cost);
            self.delivery_applied = true;
        }
    }

    // -------------------------------------------------------------------------
    // Totals
    // -------------------------------------------------------------------------

    /// Running amount: undiscounted before the apply pass, discounted after.
    pub fn cart_amount(&self) -> Money {
        self.cart_amount
    }

    pub fn total_discount(&self) -> Money {
        self.total_discount
    }

    pub fn delivery_cost(&self) -> Money {
        self.delivery_cost
    }

    pub fn total_amount(&self) -> Money {
        self.total_amount
    }

    pub fn discounts_applied(&self) -> bool {
        self.discounts_applied
    }

    // -------------------------------------------------------------------------
    // Derived Views
    // -------------------------------------------------------------------------

    pub fn items(&self) -> &[CartItem] {
        &self.items
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Sum of all line totals, recomputed from the items.
    pub fn cart_amount_without_discount(&self) -> Money {
        self.items.iter().map(CartItem::total_price).sum()
    }

    pub fn quantity_of_product(&self, product: &Product) -> Quantity {
        self.items
            .iter()
            .filter(|item| item.product == *product)
            .map(CartItem::quantity)
            .sum()
    }

    pub fn quantity_in_category(&self, category: &Category) -> Quantity {
        self.items_in_category(category).map(CartItem::quantity).sum()
    }

    pub fn total_price_in_category(&self, category: &Category) -> Money {
        self.items_in_category(category)
            .map(CartItem::total_price)
            .sum()
    }

    pub fn total_quantity(&self) -> Quantity {
        self.items.iter().map(CartItem::quantity).sum()
    }

    /// Number of distinct products.
    pub fn number_of_products(&self) -> usize {
        self.items.len()
    }

    /// Number of distinct categories.
    pub fn number_of_categories(&self) -> usize {
        self.categories().len()
    }

    /// Distinct categories, in the order they first appear.
    pub fn categories(&self) -> Vec<&Category> {
        let mut categories: Vec<&Category> = Vec::new();
        for item in &self.items {
            let category = item.product.category();
            if !categories.contains(&category) {
                categories.push(category);
            }
        }
        categories
    }

    pub fn items_in_category<'a>(
        &'a self,
        category: &'a Category,
    ) -> impl Iterator<Item = &'a CartItem> + 'a {
        self.items
            .iter()
            .filter(move |item| item.product.category() == category)
    }

    /// Builds the printable summary of the cart's current state.
    pub fn summary(&self) -> CartSummary {
        CartSummary::from(self)
    }
}

impl Default for ShoppingCart {
    fn default() -> Self {
        Self::new()
    }
}

impl DiscountListener for ShoppingCart {
    fn discount_provided(&mut self, event: &DiscountProvidedEvent) {
        event.discount().add_to(self);
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
