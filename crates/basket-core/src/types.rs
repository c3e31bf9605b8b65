//! # Domain Types
//!
//! Core domain types used throughout Basket.
//!
//! ## Type Overview
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │   NewLineItem   │──►│    LineItem     │──►│   CartTotals    │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  id             │   │  id             │   │  item_count     │       │
//! │  │  title          │   │  title          │   │  total_quantity │       │
//! │  │  image_url      │   │  image_url      │   │  subtotal       │       │
//! │  │  price          │   │  price          │   └─────────────────┘       │
//! │  │  (no quantity)  │   │  quantity >= 1  │                              │
//! │  └─────────────────┘   └─────────────────┘                              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! `NewLineItem` is what a caller hands to `add_to_cart`: a product
//! descriptor. Any `quantity` it carries on the wire is ignored, because
//! adding always means "one more unit of this product".

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::money::{self, Money};

// =============================================================================
// Line Item
// =============================================================================

/// One product in the cart.
///
/// ## Invariants (enforced by [`crate::CartState`])
/// - `id` is non-empty and unique within a cart
/// - `price` is non-negative
/// - `quantity >= 1` while the item is in the cart
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct LineItem {
    /// Opaque product identifier.
    pub id: String,

    /// Display title, opaque to cart logic.
    pub title: String,

    /// Display image, opaque to cart logic.
    #[serde(alias = "imageUrl")]
    pub image_url: String,

    /// Unit price. Stored on the wire as a decimal number.
    #[serde(with = "money::as_decimal")]
    #[ts(type = "number")]
    pub price: Money,

    /// Units of this product in the cart.
    pub quantity: u32,
}

impl LineItem {
    /// Line total (unit price × quantity).
    pub fn line_total(&self) -> Money {
        self.price.multiply_quantity(self.quantity)
    }
}

// =============================================================================
// New Line Item
// =============================================================================

/// A product descriptor passed to `add_to_cart`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct NewLineItem {
    pub id: String,
    pub title: String,
    #[serde(alias = "imageUrl")]
    pub image_url: String,
    #[serde(with = "money::as_decimal")]
    #[ts(type = "number")]
    pub price: Money,
}

impl NewLineItem {
    pub fn new(
        id: impl Into<String>,
        title: impl Into<String>,
        image_url: impl Into<String>,
        price: Money,
    ) -> Self {
        NewLineItem {
            id: id.into(),
            title: title.into(),
            image_url: image_url.into(),
            price,
        }
    }

    /// Builds the cart entry for the first unit of this product.
    pub(crate) fn first_unit(&self) -> LineItem {
        LineItem {
            id: self.id.clone(),
            title: self.title.clone(),
            image_url: self.image_url.clone(),
            price: self.price,
            quantity: 1,
        }
    }
}

/// Lets a caller re-add an item it already holds; its quantity is dropped.
impl From<LineItem> for NewLineItem {
    fn from(item: LineItem) -> Self {
        NewLineItem {
            id: item.id,
            title: item.title,
            image_url: item.image_url,
            price: item.price,
        }
    }
}

// =============================================================================
// Cart Totals
// =============================================================================

/// Cart totals summary for the UI. Derived on demand, never persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct CartTotals {
    /// Number of distinct line items.
    pub item_count: usize,

    /// Sum of all quantities. Serialized as a plain JSON number.
    #[ts(type = "number")]
    pub total_quantity: u64,

    /// Sum of all line totals.
    #[serde(with = "money::as_decimal")]
    #[ts(type = "number")]
    pub subtotal: Money,
}

// =============================================================================
// Unit Tests
// =============================================================================
