//! # basket-storage: Storage Boundary for Basket
//!
//! The cart is persisted as one text blob under one key. This crate defines
//! that boundary ([`CartStorage`]) and ships two implementations.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Basket Data Flow                                 │
//! │                                                                         │
//! │  CartStore (basket-store)                                              │
//! │       │  hydrate: get(key)          writer task: set(key, blob)        │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                  basket-storage (THIS CRATE)                    │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────────┐    ┌───────────────┐    ┌──────────────┐  │   │
//! │  │   │ CartStorage   │    │ SqliteStorage │    │ MemoryStorage│  │   │
//! │  │   │ (trait)       │◄───│  Database     │    │  HashMap     │  │   │
//! │  │   │ get / set     │    │  KvRepository │    │  (tests)     │  │   │
//! │  │   └───────────────┘    └───────────────┘    └──────────────┘  │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                     SQLite Database                             │   │
//! │  │   <data dir>/basket.db  (kv_store table)                        │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//!
//! - [`storage`] - The `CartStorage` trait and its implementations
//! - [`pool`] - Connection pool creation and configuration
//! - [`migrations`] - Embedded database migrations
//! - [`repository`] - SQL for the `kv_store` table
//! - [`error`] - Storage error types
//!
//! ## Usage
//!
//! ```rust,ignore
//! use basket_storage::{CartStorage, Database, DbConfig, SqliteStorage};
//!
//! let db = Database::new(DbConfig::new("basket.db")).await?;
//! let storage = SqliteStorage::new(db);
//!
//! storage.set("@GoMarketPlace", "[]").await?;
//! assert_eq!(storage.get("@GoMarketPlace").await?.as_deref(), Some("[]"));
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod migrations;
pub mod pool;
pub mod repository;
pub mod storage;

// =============================================================================
// Re-exports
// =============================================================================

pub use error::{StorageError, StorageResult};
pub use pool::{Database, DbConfig};
pub use repository::kv::{KvEntry, KvRepository};
pub use storage::{CartStorage, MemoryStorage, SqliteStorage};
