//! # Application Error Type
//!
//! Unified error type for the checkout.
//!
//! ## Error Handling Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Flow in the Checkout                           │
//! │                                                                         │
//! │  basket-core   CoreError::InvalidValue ──┐                              │
//! │  basket-store  StoreError::NotFound ─────┤                              │
//! │  config        toml / io / validate ─────┼──► AppError ──► stderr       │
//! │  scenario      toml / io / references ───┤        │                     │
//! │  output        serde_json ───────────────┘        ▼                     │
//! │                                              exit_code()                │
//! │                                                                         │
//! │  Every error aborts the submission. Nothing is retried.                │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use basket_core::CoreError;
use basket_store::StoreError;
use thiserror::Error;

/// Errors surfaced by the checkout application.
#[derive(Debug, Error)]
pub enum AppError {
    /// A value was rejected by the engine.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// A catalog lookup missed, or a key was declared twice.
    #[error(transparent)]
    Store(#[from] StoreError),

    /// Configuration could not be loaded, saved or validated.
    #[error("Invalid configuration: {0}")]
    Config(String),

    /// A scenario file could not be read or parsed.
    #[error("Invalid scenario: {0}")]
    Scenario(String),

    /// The cart was still shared when the submission tried to settle it.
    #[error("Cart {0} is still registered with a discount provider")]
    CartInUse(String),

    /// Output could not be rendered.
    #[error("Failed to render output: {0}")]
    Output(String),

    /// Filesystem access failed.
    #[error("I/O error: {0}")]
    Io(String),
}

impl AppError {
    /// Process exit code for this error.
    ///
    /// ```text
    /// 2  configuration / scenario (operator input)
    /// 3  invalid value or missing element (data)
    /// 1  everything else
    /// ```
    pub fn exit_code(&self) -> i32 {
        match self {
            AppError::Config(_) | AppError::Scenario(_) => 2,
            AppError::Core(_) | AppError::Store(_) => 3,
            AppError::CartInUse(_) | AppError::Output(_) | AppError::Io(_) => 1,
        }
    }
}

// =============================================================================
// Error Conversions
// =============================================================================

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        AppError::Io(err.to_string())
    }
}

impl From<toml::ser::Error> for AppError {
    fn from(err: toml::ser::Error) -> Self {
        AppError::Config(err.to_string())
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::Output(err.to_string())
    }
}

/// Result type for application operations.
pub type AppResult<T> = Result<T, AppError>;
