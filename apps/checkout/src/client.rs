//! # Cart Client
//!
//! Drives one cart submission through the engine.
//!
//! ## Submission Sequence
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                          submit(cart)                                   │
//! │                                                                         │
//! │  1. Share the cart ─────────── Arc<Mutex<ShoppingCart>>                 │
//! │  2. register_listener ──────── root group fans out to every item       │
//! │  3. provide_discount ───────── items emit, cart arbitrates by name     │
//! │  4. unregister_listener ────── the tree forgets the cart               │
//! │  5. apply_discounts ────────── discovery order, clamp at zero          │
//! │  6. delivery (optional) ────── set + apply delivery cost               │
//! │  7. repository.save ────────── the returned cart is authoritative     │
//! │  8. summary ────────────────── Receipt                                 │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use basket_core::{
    CartSummary, DiscountProvider, Product, Quantity, SharedListener, ShoppingCart,
};
use basket_store::{CartRepository, Catalog, Lookup};
use chrono::{DateTime, Utc};
use std::fmt;
use std::sync::{Arc, Mutex, PoisonError};
use tracing::{debug, info};

use crate::delivery::DeliveryCostCalculator;
use crate::error::AppError;

/// Result type for client operations.
pub type ClientResult<T> = Result<T, AppError>;

// =============================================================================
// Receipt
// =============================================================================

/// The outcome of a submission.
#[derive(Debug, Clone)]
pub struct Receipt {
    cart: ShoppingCart,
    summary: CartSummary,
}

impl Receipt {
    /// The cart as returned by the repository.
    pub fn cart(&self) -> &ShoppingCart {
        &self.cart
    }

    pub fn summary(&self) -> &CartSummary {
        &self.summary
    }
}

impl fmt::Display for Receipt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.summary, f)
    }
}

// =============================================================================
// Cart Client
// =============================================================================

/// Orchestrates provide → apply → deliver → persist for submitted carts.
pub struct CartClient {
    root: DiscountProvider,
    products: Box<dyn Lookup<Product> + Send>,
    repository: Box<dyn CartRepository + Send>,
    delivery: Option<Box<dyn DeliveryCostCalculator + Send>>,
}

impl CartClient {
    /// Starts building a client around a root provider.
    pub fn builder(root: impl Into<DiscountProvider>) -> CartClientBuilder {
        CartClientBuilder::new(root)
    }

    /// Adds `quantity` of the product titled `title` to `cart`.
    ///
    /// ## Errors
    /// - `Store(NotFound)` when no product has that title
    /// - `Core(InvalidValue)` when `quantity` is zero
    pub fn add_product(
        &self,
        cart: &mut ShoppingCart,
        title: &str,
        quantity: Quantity,
    ) -> ClientResult<()> {
        let product = self.products.require(title)?;
        cart.add_product(&product, quantity)?;
        Ok(())
    }

    /// Submits `cart` using the current time for validity windows.
    pub fn submit(&mut self, cart: ShoppingCart) -> ClientResult<Receipt> {
        self.submit_at(cart, Utc::now())
    }

    /// Submits `cart` as of `now`.
    pub fn submit_at(&mut self, cart: ShoppingCart, now: DateTime<Utc>) -> ClientResult<Receipt> {
        let cart_id = cart.id().to_string();
        info!(cart_id = %cart_id, amount = %cart.cart_amount(), "Submitting cart");

        let shared = Arc::new(Mutex::new(cart));
        let listener: SharedListener = shared.clone();

        self.root.register_listener(Arc::clone(&listener));
        self.root.provide_discount_at(now);
        self.root.unregister_listener(&listener);
        drop(listener);

        let mut cart = Arc::try_unwrap(shared)
            .map_err(|_| AppError::CartInUse(cart_id.clone()))?
            .into_inner()
            .unwrap_or_else(PoisonError::into_inner);

        debug!(cart_id = %cart_id, champions = cart.discounts().count(), "Discounts collected");
        cart.apply_discounts();

        if let Some(delivery) = &self.delivery {
            let cost = delivery.calculate_for(&cart);
            cart.set_delivery_cost(cost);
            cart.apply_delivery_cost();
        }

        let cart = self.repository.save(cart)?;
        let summary = cart.summary();

        info!(
            cart_id = %cart_id,
            total_discount = %cart.total_discount(),
            delivery_cost = %cart.delivery_cost(),
            total_amount = %cart.total_amount(),
            "Cart settled"
        );

        Ok(Receipt { cart, summary })
    }
}

impl fmt::Debug for CartClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CartClient")
            .field("root", &self.root)
            .field("delivery", &self.delivery.is_some())
            .finish_non_exhaustive()
    }
}

// =============================================================================
// Builder Pattern
// =============================================================================

/// Builder for creating a CartClient with options.
pub struct CartClientBuilder {
    root: DiscountProvider,
    products: Option<Box<dyn Lookup<Product> + Send>>,
    repository: Option<Box<dyn CartRepository + Send>>,
    delivery: Option<Box<dyn DeliveryCostCalculator + Send>>,
}

impl CartClientBuilder {
    pub fn new(root: impl Into<DiscountProvider>) -> Self {
        CartClientBuilder {
            root: root.into(),
            products: None,
            repository: None,
            delivery: None,
        }
    }

    /// Sets the product lookup used by [`CartClient::add_product`].
    pub fn products(mut self, products: impl Lookup<Product> + Send + 'static) -> Self {
        self.products = Some(Box::new(products));
        self
    }

    /// Sets the persistence collaborator (required).
    pub fn repository(mut self, repository: impl CartRepository + Send + 'static) -> Self {
        self.repository = Some(Box::new(repository));
        self
    }

    /// Sets the delivery cost collaborator. Without one, delivery is not priced.
    pub fn delivery(mut self, delivery: impl DeliveryCostCalculator + Send + 'static) -> Self {
        self.delivery = Some(Box::new(delivery));
        self
    }

    /// Builds the client.
    ///
    /// ## Errors
    /// `Config` when no repository was set.
    pub fn build(self) -> ClientResult<CartClient> {
        let repository = self
            .repository
            .ok_or_else(|| AppError::Config("Cart repository required".into()))?;

        let products = self
            .products
            .unwrap_or_else(|| Box::new(Catalog::<Product>::new("Product")));

        Ok(CartClient {
            root: self.root,
            products,
            repository,
            delivery: self.delivery,
        })
    }
}
