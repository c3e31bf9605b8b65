//! # Cart Error Types
//!
//! Error types surfaced by the live cart.
//!
//! ## Error Layering
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       Cart Error Categories                             │
//! │                                                                         │
//! │  ┌─────────────────┐  ┌─────────────────┐  ┌─────────────────────────┐ │
//! │  │    Hydrate      │  │     Access      │  │     Mutation            │ │
//! │  │                 │  │                 │  │                         │ │
//! │  │  CorruptState   │  │  NotInitialized │  │  InvalidItem            │ │
//! │  │  Storage        │  │  AlreadyInit.   │  │  (CoreError)            │ │
//! │  └─────────────────┘  └─────────────────┘  └─────────────────────────┘ │
//! │                                                                         │
//! │  ┌─────────────────┐  ┌─────────────────┐                              │
//! │  │  Configuration  │  │     Writer      │                              │
//! │  │                 │  │                 │                              │
//! │  │  Config         │  │  WriterClosed   │                              │
//! │  └─────────────────┘  └─────────────────┘                              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Storage *write* failures never appear here: the writer logs and counts
//! them, and the in-memory cart stays authoritative.

use basket_core::CoreError;
use basket_storage::StorageError;
use thiserror::Error;

/// Result type alias for cart operations.
pub type CartResult<T> = Result<T, CartError>;

/// Errors returned by [`crate::CartStore`], [`crate::CartProvider`] and
/// [`crate::BasketConfig`].
#[derive(Debug, Error)]
pub enum CartError {
    // =========================================================================
    // Hydrate Errors
    // =========================================================================
    /// The persisted blob could not be decoded into a valid cart.
    #[error("Stored cart under '{key}' is corrupt: {reason}")]
    CorruptState { key: String, reason: String },

    /// Reading the persisted blob failed.
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    // =========================================================================
    // Access Errors
    // =========================================================================
    /// A cart was requested from a provider with no installed store.
    #[error("Cart accessed before a CartStore was installed")]
    NotInitialized,

    #[error("A CartStore is already installed")]
    AlreadyInitialized,

    // =========================================================================
    // Mutation Errors
    // =========================================================================
    /// The item descriptor passed to `add_to_cart` was rejected.
    #[error("Invalid item: {0}")]
    InvalidItem(#[from] CoreError),

    // =========================================================================
    // Configuration Errors
    // =========================================================================
    #[error("Invalid configuration: {0}")]
    Config(String),

    // =========================================================================
    // Writer Errors
    // =========================================================================
    /// The persistence writer has stopped (after `close`).
    #[error("Persistence writer is closed")]
    WriterClosed,
}

// =============================================================================
// Error Conversions
// =============================================================================

impl From<std::io::Error> for CartError {
    fn from(err: std::io::Error) -> Self {
        CartError::Config(err.to_string())
    }
}

impl From<toml::de::Error> for CartError {
    fn from(err: toml::de::Error) -> Self {
        CartError::Config(err.to_string())
    }
}

impl CartError {
    /// Returns true for errors that indicate a programming mistake rather
    /// than a runtime condition.
    pub fn is_programmer_error(&self) -> bool {
        matches!(self, CartError::NotInitialized | CartError::AlreadyInitialized)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use basket_core::ValidationError;

    #[test]
    fn test_error_messages() {
        let err = CartError::CorruptState {
            key: "@GoMarketPlace".into(),
            reason: "expected value".into(),
        };
        assert_eq!(
            err.to_string(),
            "Stored cart under '@GoMarketPlace' is corrupt: expected value"
        );

        let err: CartError = CoreError::from(ValidationError::Required { field: "id".into() }).into();
        assert!(matches!(err, CartError::InvalidItem(_)));
    }

    #[test]
    fn test_programmer_errors() {
        assert!(CartError::NotInitialized.is_programmer_error());
        assert!(CartError::AlreadyInitialized.is_programmer_error());
        assert!(!CartError::WriterClosed.is_programmer_error());
    }
}
