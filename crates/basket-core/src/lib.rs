//! # basket-core: The Discount Resolution Engine
//!
//! This crate decides which discounts apply to a shopping cart, how much
//! each is worth, and what the customer finally pays. It performs no I/O.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                          Basket Architecture                            │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                    checkout (app)                               │   │
//! │  │    config ──► scenario ──► CartClient::submit ──► receipt      │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ basket-core (THIS CRATE) ★                      │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │   types   │  │ discount  │  │ provider  │  │   cart    │  │   │
//! │  │   │  Money    │  │ strategies│  │ Item      │  │ champions │  │   │
//! │  │   │  Quantity │  │ arbitrate │  │ Group     │  │ settle    │  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO STORAGE • NO NETWORK                             │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                 basket-store (in-memory catalogs)               │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`money`], [`quantity`], [`types`] - Value types (Money, Quantity, Rate, ...)
//! - [`discount`] - Discounts, their strategies, and arbitration
//! - [`provider`] - The item/group provider tree and its listeners
//! - [`cart`] - The shopping cart and its settlement
//! - [`summary`] - Printable and serializable cart snapshots
//! - [`error`], [`validation`] - The single `InvalidValue` error and its checks
//!
//! ## Example Usage
//!
//! ```rust
//! use std::sync::{Arc, Mutex};
//! use basket_core::{
//!     Category, Discount, DiscountGroup, DiscountProvider, Money, Product, Quantity, Rate,
//!     SharedListener, ShoppingCart,
//! };
//!
//! let food = Arc::new(Category::root("Food").unwrap());
//! let apple = Product::new("Apple", Money::from_units(10), food).unwrap();
//!
//! let mut cart = ShoppingCart::new();
//! cart.add_product(&apple, Quantity::new(6).unwrap()).unwrap();
//!
//! let mut root = DiscountGroup::new();
//! let ten_percent = Rate::from_percentage(10.0).unwrap();
//! root.add_discount_provider(
//!     Discount::cart_rate("campaign", Money::from_units(10), ten_percent).unwrap(),
//! );
//! root.add_discount_provider(Discount::fixed("coupon", Money::from_units(5)).unwrap());
//! let mut root = DiscountProvider::from(root);
//!
//! let shared = Arc::new(Mutex::new(cart));
//! let listener: SharedListener = shared.clone();
//! root.register_listener(listener);
//! root.provide_discount();
//!
//! let mut cart = shared.lock().unwrap();
//! cart.apply_discounts();
//! assert_eq!(cart.total_amount(), Money::from_units(49));
//! assert_eq!(cart.total_discount(), Money::from_units(11));
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod cart;
pub mod discount;
pub mod error;
pub mod money;
pub mod provider;
pub mod quantity;
pub mod summary;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use cart::{AppliedDiscount, CartItem, ShoppingCart};
pub use discount::{CalculationStrategy, Discount, Rule, ValidationStrategy};
pub use error::{CoreError, CoreResult, ValidationError};
pub use money::Money;
pub use provider::{
    DiscountGroup, DiscountItem, DiscountListener, DiscountProvidedEvent, DiscountProvider,
    SharedListener, ValidityWindow,
};
pub use quantity::Quantity;
pub use summary::CartSummary;
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Upper bound of a rate, in basis points (100%).
pub const MAX_RATE_BPS: u32 = 10_000;
