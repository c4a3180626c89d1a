//! # Cart Repository
//!
//! Persistence collaborator for submitted carts.

use std::collections::HashMap;
use tracing::debug;

use basket_core::ShoppingCart;

use crate::error::{StoreError, StoreResult};

/// Persists carts.
///
/// `save` may hand back a different representation than it was given; the
/// caller uses whatever comes back.
pub trait CartRepository {
    fn save(&mut self, cart: ShoppingCart) -> StoreResult<ShoppingCart>;

    fn find(&self, id: &str) -> Option<ShoppingCart>;
}

/// Keeps one snapshot per cart id.
///
/// Saving the same cart again replaces its snapshot.
#[derive(Debug, Clone, Default)]
pub struct InMemoryCartRepository {
    carts: HashMap<String, ShoppingCart>,
}

impl InMemoryCartRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.carts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.carts.is_empty()
    }

    /// Fetches a stored cart, failing with `NotFound` on a miss.
    pub fn get_by_id(&self, id: &str) -> StoreResult<ShoppingCart> {
        self.find(id)
            .ok_or_else(|| StoreError::not_found("Cart", id))
    }
}

impl CartRepository for InMemoryCartRepository {
    fn save(&mut self, cart: ShoppingCart) -> StoreResult<ShoppingCart> {
        debug!(
            cart_id = %cart.id(),
            total_amount = %cart.total_amount(),
            "Saving cart"
        );

        let stored = cart.clone();
        self.carts.insert(cart.id().to_string(), cart);
        Ok(stored)
    }

    fn find(&self, id: &str) -> Option<ShoppingCart> {
        self.carts.get(id).cloned()
    }
}
