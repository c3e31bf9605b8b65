//! # Error Types
//!
//! Domain-specific error types for basket-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  basket-core errors (this file)                                        │
//! │  ├── CoreError        - Cart invariant violations                      │
//! │  └── ValidationError  - Field-level validation failures                │
//! │                                                                         │
//! │  basket-storage errors (separate crate)                                │
//! │  └── StorageError     - Key-value medium failures                      │
//! │                                                                         │
//! │  basket-store errors (separate crate)                                  │
//! │  └── CartError        - What the cart consumer sees                    │
//! │                                                                         │
//! │  Flow: ValidationError → CoreError → CartError → Consumer              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use thiserror::Error;

// =============================================================================
// Core Error
// =============================================================================

/// Cart domain errors.
///
/// A cart built only through [`crate::CartState`] transitions never produces
/// these; they show up when a line item comes from outside (a new product
/// descriptor, or a blob read back from storage).
#[derive(Debug, Error)]
pub enum CoreError {
    /// Two entries in the same cart share an id.
    #[error("Duplicate line item id: {0}")]
    DuplicateItem(String),

    /// A line item failed field validation.
    #[error("Invalid line item: {0}")]
    Validation(#[from] ValidationError),

    /// The serialized cart could not be decoded.
    #[error("Malformed cart data: {0}")]
    Malformed(String),
}

impl From<serde_json::Error> for CoreError {
    fn from(err: serde_json::Error) -> Self {
        CoreError::Malformed(err.to_string())
    }
}

// =============================================================================
// Validation Error
// =============================================================================

/// Field validation errors.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Value must be positive.
    #[error("{field} must be positive")]
    MustBePositive { field: String },

    /// Value must be zero or greater.
    #[error("{field} must not be negative")]
    Negative { field: String },

    /// Invalid format (e.g. a price that is not a finite number).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = CoreError::DuplicateItem("mug".to_string());
        assert_eq!(err.to_string(), "Duplicate line item id: mug");

        let err = ValidationError::Negative {
            field: "price".to_string(),
        };
        assert_eq!(err.to_string(), "price must not be negative");
    }

    #[test]
    fn test_validation_converts_to_core_error() {
        let validation_err = ValidationError::Required {
            field: "id".to_string(),
        };
        let core_err: CoreError = validation_err.into();
        assert!(matches!(core_err, CoreError::Validation(_)));
        assert_eq!(core_err.to_string(), "Invalid line item: id is required");
    }

    #[test]
    fn test_json_error_is_malformed() {
        let json_err = serde_json::from_str::<Vec<u8>>("{").unwrap_err();
        let core_err: CoreError = json_err.into();
        assert!(matches!(core_err, CoreError::Malformed(_)));
    }
}
