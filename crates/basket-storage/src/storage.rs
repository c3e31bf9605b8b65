//! # Cart Storage Boundary
//!
//! The persisted cart is an opaque text blob under one string key. Anything
//! that can `get` and `set` such a blob asynchronously can back a cart.
//!
//! ## Implementations
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      CartStorage implementations                        │
//! │                                                                         │
//! │  SqliteStorage                      MemoryStorage                       │
//! │  ─────────────                      ─────────────                       │
//! │  • kv_store table in a local file   • HashMap behind an async RwLock    │
//! │  • survives process restarts        • lives as long as its clones      │
//! │  • used by the CLI                  • used by tests and demos           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::error::StorageResult;
use crate::pool::Database;

/// Async key-value store holding serialized carts.
///
/// `get` returns `Ok(None)` for a key that was never written. `set` replaces
/// the previous value.
#[async_trait]
pub trait CartStorage: Send + Sync {
    async fn get(&self, key: &str) -> StorageResult<Option<String>>;

    async fn set(&self, key: &str, value: &str) -> StorageResult<()>;
}

#[async_trait]
impl<T: CartStorage + ?Sized> CartStorage for Arc<T> {
    async fn get(&self, key: &str) -> StorageResult<Option<String>> {
        (**self).get(key).await
    }

    async fn set(&self, key: &str, value: &str) -> StorageResult<()> {
        (**self).set(key, value).await
    }
}

// =============================================================================
// SQLite
// =============================================================================

/// SQLite-backed storage (one row per key in `kv_store`).
#[derive(Debug, Clone)]
pub struct SqliteStorage {
    db: Database,
}

impl SqliteStorage {
    pub fn new(db: Database) -> Self {
        SqliteStorage { db }
    }

    /// The underlying database, e.g. for health checks or closing the pool.
    pub fn database(&self) -> &Database {
        &self.db
    }
}

#[async_trait]
impl CartStorage for SqliteStorage {
    async fn get(&self, key: &str) -> StorageResult<Option<String>> {
        self.db.kv().get(key).await
    }

    async fn set(&self, key: &str, value: &str) -> StorageResult<()> {
        self.db.kv().upsert(key, value).await
    }
}

// =============================================================================
// In-Memory
// =============================================================================

/// Process-local storage. Clones share the same map.
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    entries: Arc<RwLock<HashMap<String, String>>>,
    writes: Arc<AtomicU64>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store pre-seeded with one entry.
    pub fn with_entry(key: impl Into<String>, value: impl Into<String>) -> Self {
        let mut entries = HashMap::new();
        entries.insert(key.into(), value.into());
        MemoryStorage {
            entries: Arc::new(RwLock::new(entries)),
            writes: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Number of successful `set` calls so far.
    pub fn write_count(&self) -> u64 {
        self.writes.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl CartStorage for MemoryStorage {
    async fn get(&self, key: &str) -> StorageResult<Option<String>> {
        Ok(self.entries.read().await.get(key).cloned())
    }

    async fn set(&self, key: &str, value: &str) -> StorageResult<()> {
        self.entries
            .write()
            .await
            .insert(key.to_string(), value.to_string());
        self.writes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
