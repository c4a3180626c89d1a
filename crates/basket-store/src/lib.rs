//! # basket-store: Catalogs and Cart Persistence
//!
//! In-memory implementations of the collaborators the checkout consults:
//! keyed catalogs for products, categories, campaigns and coupons, and a
//! repository that keeps submitted carts.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Basket Data Flow                                 │
//! │                                                                         │
//! │  CartClient (checkout)                                                 │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                   basket-store (THIS CRATE)                     │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────────┐    ┌───────────────┐    ┌──────────────┐  │   │
//! │  │   │   Lookup<V>   │    │  Catalog<V>   │    │ CartRepo     │  │   │
//! │  │   │   get         │◄───│  products     │    │ save         │  │   │
//! │  │   │   require     │    │  campaigns    │    │ find         │  │   │
//! │  │   └───────────────┘    └───────────────┘    └──────────────┘  │   │
//! │  │                                                                 │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//!
//! - [`error`] - Store error types
//! - [`repository`] - Lookup trait, catalogs and the cart repository

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod repository;

// =============================================================================
// Re-exports
// =============================================================================

pub use error::{StoreError, StoreResult};
pub use repository::{CartRepository, Catalog, InMemoryCartRepository, Lookup};
