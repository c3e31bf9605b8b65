//! # Validation Module
//!
//! Invariant checks for line items entering a cart.
//!
//! ## Where Validation Runs
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Entry Points                            │
//! │                                                                         │
//! │  add_to_cart(descriptor)                                               │
//! │  └── validate_new_item ── id present, price >= 0                      │
//! │                                                                         │
//! │  hydrate(blob)                                                         │
//! │  └── validate_line_item ─ id present, price >= 0, quantity >= 1       │
//! │      + unique ids (checked by CartState::from_items)                   │
//! │                                                                         │
//! │  increment / decrement                                                 │
//! │  └── nothing to validate: an unknown id is a no-op                     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use crate::error::ValidationError;
use crate::money::Money;
use crate::types::{LineItem, NewLineItem};

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Validates a product id.
///
/// ```rust
/// use basket_core::validation::validate_item_id;
///
/// assert!(validate_item_id("sku-1").is_ok());
/// assert!(validate_item_id("").is_err());
/// assert!(validate_item_id("   ").is_err());
/// ```
pub fn validate_item_id(id: &str) -> ValidationResult<()> {
    if id.trim().is_empty() {
        return Err(ValidationError::Required {
            field: "id".to_string(),
        });
    }
    Ok(())
}

/// Validates a unit price. Zero is allowed (free items).
pub fn validate_price(price: Money) -> ValidationResult<()> {
    if price.is_negative() {
        return Err(ValidationError::Negative {
            field: "price".to_string(),
        });
    }
    Ok(())
}

/// Validates a stored quantity. Zero is never a stored state.
pub fn validate_quantity(quantity: u32) -> ValidationResult<()> {
    if quantity == 0 {
        return Err(ValidationError::MustBePositive {
            field: "quantity".to_string(),
        });
    }
    Ok(())
}

/// Validates a product descriptor passed to `add_to_cart`.
pub fn validate_new_item(item: &NewLineItem) -> ValidationResult<()> {
    validate_item_id(&item.id)?;
    validate_price(item.price)
}

/// Validates a line item read back from storage.
pub fn validate_line_item(item: &LineItem) -> ValidationResult<()> {
    validate_item_id(&item.id)?;
    validate_price(item.price)?;
    validate_quantity(item.quantity)
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn item(id: &str, cents: i64, quantity: u32) -> LineItem {
        LineItem {
            id: id.to_string(),
            title: "Thing".to_string(),
            image_url: String::new(),
            price: Money::from_cents(cents),
            quantity,
        }
    }

    #[test]
    fn test_validate_price() {
        assert!(validate_price(Money::from_cents(0)).is_ok());
        assert!(validate_price(Money::from_cents(1099)).is_ok());
        assert!(validate_price(Money::from_cents(-1)).is_err());
    }

    #[test]
    fn test_validate_line_item() {
        assert!(validate_line_item(&item("a", 100, 1)).is_ok());
        assert!(matches!(
            validate_line_item(&item("a", 100, 0)),
            Err(ValidationError::MustBePositive { .. })
        ));
        assert!(matches!(
            validate_line_item(&item("", 100, 1)),
            Err(ValidationError::Required { .. })
        ));
        assert!(matches!(
            validate_line_item(&item("a", -5, 1)),
            Err(ValidationError::Negative { .. })
        ));
    }

    #[test]
    fn test_validate_new_item() {
        let ok = NewLineItem::new("a", "A", "", Money::from_cents(10));
        assert!(validate_new_item(&ok).is_ok());

        let negative = NewLineItem::new("a", "A", "", Money::from_cents(-10));
        assert!(validate_new_item(&negative).is_err());
    }
}
