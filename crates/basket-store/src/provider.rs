//! # Cart Provider
//!
//! A slot holding at most one installed [`CartStore`]. Components that need
//! the cart are handed a `CartProvider` (or a `CartStore` clone) explicitly;
//! there is no process-wide cart.
//!
//! ```text
//!   CartProvider::new()          cart() → Err(NotInitialized)
//!        │ install(store)
//!        ▼
//!   CartProvider [store]         cart() → Ok(store clone)
//!        │ install(other)
//!        ▼
//!   Err(AlreadyInitialized)      slot unchanged
//! ```

use std::sync::{Arc, OnceLock};

use crate::error::{CartError, CartResult};
use crate::store::CartStore;

/// Shared slot for the live cart. Clones see the same slot.
#[derive(Debug, Clone, Default)]
pub struct CartProvider {
    slot: Arc<OnceLock<CartStore>>,
}

impl CartProvider {
    /// Creates an empty provider.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a provider that already holds `store`.
    pub fn with_store(store: CartStore) -> Self {
        let provider = Self::new();
        // A fresh slot is always empty
        let _ = provider.slot.set(store);
        provider
    }

    /// Wires `store` into the slot.
    ///
    /// ## Errors
    /// `CartError::AlreadyInitialized` if a store is already installed.
    pub fn install(&self, store: CartStore) -> CartResult<()> {
        self.slot
            .set(store)
            .map_err(|_| CartError::AlreadyInitialized)
    }

    /// Returns the installed store.
    ///
    /// ## Errors
    /// `CartError::NotInitialized` if nothing was installed.
    pub fn cart(&self) -> CartResult<CartStore> {
        self.slot.get().cloned().ok_or(CartError::NotInitialized)
    }

    pub fn is_initialized(&self) -> bool {
        self.slot.get().is_some()
    }
}
