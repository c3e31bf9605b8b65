//! # basket-core: Pure Cart Logic for Basket
//!
//! This crate is the **heart** of Basket. It contains the cart model and
//! every cart transition as pure functions with zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                          Basket Architecture                            │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                    Cart UI (external)                           │   │
//! │  │    Product list ──► Cart screen ──► +/- buttons                │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │ CartStore handle                       │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │              basket-store (CartStore, writer queue)             │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ basket-core (THIS CRATE) ★                      │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │   types   │  │   money   │  │   cart    │  │ validation│  │   │
//! │  │   │ LineItem  │  │   Money   │  │ CartState │  │   rules   │  │   │
//! │  │   │CartTotals │  │ (cents)   │  │ add/inc/  │  │  checks   │  │   │
//! │  │   │           │  │           │  │ dec       │  │           │  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO STORAGE • NO NETWORK • PURE FUNCTIONS             │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (`LineItem`, `NewLineItem`, `CartTotals`)
//! - [`money`] - Money type with integer arithmetic (no floating point!)
//! - [`cart`] - `CartState` and its persistent transitions
//! - [`error`] - Domain error types
//! - [`validation`] - Invariant validation
//!
//! ## Design Principles
//!
//! 1. **Persistent updates**: every transition returns a new `CartState`;
//!    the previous value is never mutated
//! 2. **No I/O**: storage, network and file system access are FORBIDDEN here
//! 3. **Integer Money**: prices are held in cents (i64)
//! 4. **Explicit Errors**: all errors are typed, never strings or panics
//!
//! ## Example Usage
//!
//! ```rust
//! use basket_core::{CartState, NewLineItem, Money};
//!
//! let mug = NewLineItem::new("mug", "Coffee Mug", "https://img/mug.png", Money::from_cents(1250));
//!
//! let cart = CartState::new()
//!     .add(&mug)
//!     .unwrap()
//!     .add(&mug)
//!     .unwrap();
//!
//! assert_eq!(cart.get("mug").map(|item| item.quantity), Some(2));
//! assert_eq!(cart.decrement("mug").decrement("mug").len(), 0);
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod cart;
pub mod error;
pub mod money;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use cart::CartState;
pub use error::{CoreError, CoreResult, ValidationError};
pub use money::Money;
pub use types::*;
