//! # Repository Module
//!
//! In-memory collaborators for the checkout.
//!
//! ## Repository Pattern
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Lookups and Persistence                              │
//! │                                                                         │
//! │  CartClient                                                            │
//! │       │                                                                 │
//! │       │  products.require("Apple")                                     │
//! │       ▼                                                                 │
//! │  Lookup<V>                                                             │
//! │  ├── get(&self, key)      → Option<V>   absence is the caller's call   │
//! │  └── require(&self, key)  → Result<V>   absence is NotFound            │
//! │                                                                         │
//! │  CartRepository                                                        │
//! │  └── save(&mut self, cart) → stored copy                               │
//! │                                                                         │
//! │  Both are traits so the checkout never depends on where data lives.    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Available Repositories
//!
//! - [`Catalog`] - keyed, insertion-ordered catalog (products, categories,
//!   campaigns, coupons)
//! - [`InMemoryCartRepository`] - snapshots of saved carts

pub mod cart;
pub mod catalog;

use crate::error::{StoreError, StoreResult};

pub use cart::{CartRepository, InMemoryCartRepository};
pub use catalog::Catalog;

/// Read access to a keyed collection.
pub trait Lookup<V> {
    /// Human-readable entity name used in errors ("Product", "Coupon", ...).
    fn entity(&self) -> &str;

    fn get(&self, key: &str) -> Option<V>;

    /// Like [`Lookup::get`], but a miss is a `NotFound` error.
    fn require(&self, key: &str) -> StoreResult<V> {
        self.get(key)
            .ok_or_else(|| StoreError::not_found(self.entity(), key))
    }
}
