//! # Key-Value Repository
//!
//! Reads and upserts rows of the `kv_store` table.
//!
//! ## Write Semantics
//! ```text
//! upsert("@GoMarketPlace", "[...]")
//!      │
//!      ▼
//! INSERT INTO kv_store (key, value, updated_at) VALUES (?1, ?2, ?3)
//! ON CONFLICT(key) DO UPDATE SET value = excluded.value,
//!                                updated_at = excluded.updated_at
//! ```
//! A row is never deleted: an empty cart is stored as `[]`.

use chrono::{DateTime, Utc};
use sqlx::{Row, SqlitePool};
use tracing::debug;

use crate::error::StorageResult;

/// One stored key with its value and last write time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KvEntry {
    pub key: String,
    pub value: String,
    pub updated_at: DateTime<Utc>,
}

/// Repository for `kv_store` operations.
#[derive(Debug, Clone)]
pub struct KvRepository {
    pool: SqlitePool,
}

impl KvRepository {
    /// Creates a new KvRepository.
    pub fn new(pool: SqlitePool) -> Self {
        KvRepository { pool }
    }

    /// Returns the value stored under `key`, if any.
    pub async fn get(&self, key: &str) -> StorageResult<Option<String>> {
        Ok(self.get_entry(key).await?.map(|entry| entry.value))
    }

    /// Returns the full row stored under `key`, if any.
    pub async fn get_entry(&self, key: &str) -> StorageResult<Option<KvEntry>> {
        let row = sqlx::query("SELECT key, value, updated_at FROM kv_store WHERE key = ?1")
            .bind(key)
            .fetch_optional(&self.pool)
            .await?;

        row.map(|row| -> StorageResult<KvEntry> {
            Ok(KvEntry {
                key: row.try_get("key")?,
                value: row.try_get("value")?,
                updated_at: row.try_get("updated_at")?,
            })
        })
        .transpose()
    }

    /// Inserts or replaces the value stored under `key`.
    pub async fn upsert(&self, key: &str, value: &str) -> StorageResult<()> {
        debug!(key = %key, bytes = value.len(), "Upserting key");

        sqlx::query(
            r#"
            INSERT INTO kv_store (key, value, updated_at)
            VALUES (?1, ?2, ?3)
            ON CONFLICT(key) DO UPDATE SET
                value = excluded.value,
                updated_at = excluded.updated_at
            "#,
        )
        .bind(key)
        .bind(value)
        .bind(Utc::now())
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Lists stored keys in alphabetical order.
    pub async fn keys(&self) -> StorageResult<Vec<String>> {
        let keys: Vec<String> = sqlx::query_scalar("SELECT key FROM kv_store ORDER BY key")
            .fetch_all(&self.pool)
            .await?;
        Ok(keys)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
