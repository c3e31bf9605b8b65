//! # basket-store: The Live Cart
//!
//! Holds the cart in memory, serves it to consumers synchronously, and
//! mirrors every change into a [`basket_storage::CartStorage`] through one
//! ordered writer task.
//!
//! ## Architecture Overview
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                          Cart Store Architecture                        │
//! │                                                                         │
//! │  ┌───────────────┐   cart()    ┌──────────────────────────────────┐    │
//! │  │ CartProvider  │────────────►│ CartStore (Arc, cheap clones)    │    │
//! │  │ one slot      │             │                                  │    │
//! │  └───────────────┘             │ watch::Sender<CartState>         │    │
//! │                                │   products / totals / subscribe  │    │
//! │                                │   add_to_cart / increment /      │    │
//! │                                │   decrement                      │    │
//! │                                └───────────────┬──────────────────┘    │
//! │                                                │ snapshot queue         │
//! │                                ┌───────────────▼──────────────────┐    │
//! │                                │ PersistenceWriter (tokio task)   │    │
//! │                                │ immediate | coalesced            │    │
//! │                                └───────────────┬──────────────────┘    │
//! │                                                │ set(key, json)         │
//! │                                ┌───────────────▼──────────────────┐    │
//! │                                │ CartStorage (SQLite / memory)    │    │
//! │                                └──────────────────────────────────┘    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//! - [`config`] - `BasketConfig` (TOML + `BASKET_*` env)
//! - [`error`] - `CartError`
//! - [`provider`] - `CartProvider`
//! - [`store`] - `CartStore` and `StoreOptions`
//!
//! ## Example
//! ```rust,ignore
//! let config = BasketConfig::load(None)?;
//! let db = Database::new(DbConfig::new(config.database_path())).await?;
//! let store = CartStore::open(SqliteStorage::new(db), config.store_options()).await?;
//!
//! store.add_to_cart(&item)?;
//! store.flush().await?;
//! ```

pub mod config;
pub mod error;
pub mod provider;
pub mod store;

mod writer;

pub use config::{BasketConfig, CorruptPolicy, WriteMode, DEFAULT_STORAGE_KEY};
pub use error::{CartError, CartResult};
pub use provider::CartProvider;
pub use store::{CartStore, StoreOptions};
