//! # Cart State
//!
//! The ordered, id-keyed collection of line items and its transitions.
//!
//! ## Transitions
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Cart State Transitions                               │
//! │                                                                         │
//! │  Operation            id present?        Result                         │
//! │  ─────────            ───────────        ──────                         │
//! │                                                                         │
//! │  add(item)            yes ─────────────► quantity + 1, same position   │
//! │                       no  ─────────────► append { quantity: 1 }        │
//! │                                                                         │
//! │  increment(id)        yes ─────────────► quantity + 1, same position   │
//! │                       no  ─────────────► unchanged                     │
//! │                                                                         │
//! │  decrement(id)        yes, qty > 1 ────► quantity - 1, same position   │
//! │                       yes, qty == 1 ───► entry removed                 │
//! │                       no  ─────────────► unchanged                     │
//! │                                                                         │
//! │  Every transition returns a NEW CartState. Snapshots handed out        │
//! │  earlier keep seeing exactly what they saw.                            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::collections::HashSet;
use std::sync::Arc;

use serde::{Deserialize, Serialize, Serializer};

use crate::error::{CoreError, CoreResult};
use crate::types::{CartTotals, LineItem, NewLineItem};
use crate::validation;

/// An immutable snapshot of the cart.
///
/// Cloning is cheap (one `Arc` bump). Transitions that change nothing hand
/// back a clone sharing the same allocation, which [`CartState::ptr_eq`]
/// detects.
#[derive(Debug, Clone, Deserialize)]
#[serde(try_from = "Vec<LineItem>")]
pub struct CartState {
    items: Arc<[LineItem]>,
}

impl CartState {
    /// Creates a new empty cart.
    pub fn new() -> Self {
        CartState {
            items: Arc::from(Vec::new()),
        }
    }

    /// Builds a cart from raw items, checking every invariant.
    ///
    /// ## Errors
    /// - `CoreError::Validation` for an empty id, negative price or zero quantity
    /// - `CoreError::DuplicateItem` when two entries share an id
    pub fn from_items(items: Vec<LineItem>) -> CoreResult<Self> {
        let mut seen = HashSet::with_capacity(items.len());
        for item in &items {
            validation::validate_line_item(item)?;
            if !seen.insert(item.id.as_str()) {
                return Err(CoreError::DuplicateItem(item.id.clone()));
            }
        }
        Ok(CartState {
            items: Arc::from(items),
        })
    }

    /// Decodes a persisted cart blob.
    pub fn from_json(blob: &str) -> CoreResult<Self> {
        let items: Vec<LineItem> = serde_json::from_str(blob)?;
        Self::from_items(items)
    }

    /// Encodes the cart in its persisted form (a JSON array).
    pub fn to_json(&self) -> CoreResult<String> {
        Ok(serde_json::to_string(self)?)
    }

    // =========================================================================
    // Transitions
    // =========================================================================

    /// Adds one unit of a product.
    ///
    /// An existing entry keeps its position and display metadata; only its
    /// quantity moves. A new product is appended with quantity 1.
    pub fn add(&self, item: &NewLineItem) -> CoreResult<Self> {
        validation::validate_new_item(item)?;

        match self.position(&item.id) {
            Some(index) => Ok(self.with_quantity_at(index, |qty| qty.saturating_add(1))),
            None => {
                let mut items = self.items.to_vec();
                items.push(item.first_unit());
                Ok(CartState {
                    items: Arc::from(items),
                })
            }
        }
    }

    /// Adds one unit to an existing entry. Unknown ids leave the cart as is.
    pub fn increment(&self, id: &str) -> Self {
        match self.position(id) {
            Some(index) => self.with_quantity_at(index, |qty| qty.saturating_add(1)),
            None => self.clone(),
        }
    }

    /// Removes one unit; the entry disappears when its last unit goes.
    /// Unknown ids leave the cart as is.
    pub fn decrement(&self, id: &str) -> Self {
        let Some(index) = self.position(id) else {
            return self.clone();
        };

        if self.items[index].quantity > 1 {
            return self.with_quantity_at(index, |qty| qty - 1);
        }

        let items: Vec<LineItem> = self
            .items
            .iter()
            .filter(|item| item.id != id)
            .cloned()
            .collect();
        CartState {
            items: Arc::from(items),
        }
    }

    fn with_quantity_at(&self, index: usize, update: impl FnOnce(u32) -> u32) -> Self {
        let mut items = self.items.to_vec();
        if let Some(item) = items.get_mut(index) {
            item.quantity = update(item.quantity);
        }
        CartState {
            items: Arc::from(items),
        }
    }

    // =========================================================================
    // Read Access
    // =========================================================================

    /// The line items in cart order.
    pub fn items(&self) -> &[LineItem] {
        &self.items
    }

    /// Shared handle to the line items, for handing out without copying.
    pub fn shared_items(&self) -> Arc<[LineItem]> {
        Arc::clone(&self.items)
    }

    pub fn get(&self, id: &str) -> Option<&LineItem> {
        self.items.iter().find(|item| item.id == id)
    }

    pub fn position(&self, id: &str) -> Option<usize> {
        self.items.iter().position(|item| item.id == id)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Ids in cart order.
    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.items.iter().map(|item| item.id.as_str())
    }

    /// True when both values are the very same snapshot.
    pub fn ptr_eq(&self, other: &CartState) -> bool {
        Arc::ptr_eq(&self.items, &other.items)
    }

    /// Calculates item count, total quantity and subtotal.
    pub fn totals(&self) -> CartTotals {
        CartTotals {
            item_count: self.items.len(),
            total_quantity: self.items.iter().map(|item| u64::from(item.quantity)).sum(),
            subtotal: self.items.iter().map(LineItem::line_total).sum(),
        }
    }
}

impl Default for CartState {
    fn default() -> Self {
        Self::new()
    }
}

/// Two carts are equal when they hold the same items in the same order.
impl PartialEq for CartState {
    fn eq(&self, other: &Self) -> bool {
        self.items == other.items
    }
}

impl Eq for CartState {}

impl Serialize for CartState {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_seq(self.items.iter())
    }
}

impl TryFrom<Vec<LineItem>> for CartState {
    type Error = CoreError;

    fn try_from(items: Vec<LineItem>) -> Result<Self, Self::Error> {
        CartState::from_items(items)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
