//! # Repository Module
//!
//! SQL access for the storage crate.
//!
//! ## Repository Pattern
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  SqliteStorage                                                         │
//! │       │  db.kv().get("@GoMarketPlace")                                 │
//! │       ▼                                                                 │
//! │  KvRepository                                                          │
//! │  ├── get(&self, key)                                                   │
//! │  ├── get_entry(&self, key)                                             │
//! │  ├── upsert(&self, key, value)                                         │
//! │  └── keys(&self)                                                       │
//! │       │  SQL Query                                                      │
//! │       ▼                                                                 │
//! │  kv_store table                                                        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

pub mod kv;
