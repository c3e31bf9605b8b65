//! # Cart Commands
//!
//! One CLI invocation is one short cart session.
//!
//! ## Session
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         CLI Cart Session                                │
//! │                                                                         │
//! │  open_session(config)                                                  │
//! │       │  Database::new(DbConfig::new(path))   ← migrations run here    │
//! │       │  CartStore::open(SqliteStorage, options)                       │
//! │       ▼                                                                 │
//! │  execute(action)                                                       │
//! │       │  list | totals                  read only                      │
//! │       │  add | inc | dec                one mutation                   │
//! │       │  flush()                        wait for the write             │
//! │       ▼                                                                 │
//! │  Session::close()                       writer stopped, pool closed    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use basket_core::{CartTotals, LineItem, NewLineItem};
use basket_storage::{Database, DbConfig, SqliteStorage};
use basket_store::{BasketConfig, CartStore};
use serde::Serialize;
use tracing::{debug, info};

use crate::error::{CliError, CliResult};

/// Cart contents plus totals, as printed by `list` and the mutations.
#[derive(Debug, Clone, Serialize)]
pub struct CartResponse {
    pub items: Vec<LineItem>,
    pub totals: CartTotals,
}

impl From<&CartStore> for CartResponse {
    fn from(store: &CartStore) -> Self {
        CartResponse {
            items: store.products().to_vec(),
            totals: store.totals(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum Output {
    Cart(CartResponse),
    Totals(CartTotals),
}

/// A single thing the CLI was asked to do.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    List,
    Totals,
    Add(NewLineItem),
    Increment(String),
    Decrement(String),
}

/// An open cart backed by the configured SQLite file.
pub struct Session {
    pub store: CartStore,
    db: Database,
}

impl Session {
    pub async fn close(self) {
        self.store.close().await;
        self.db.close().await;
    }
}

/// Opens the database and hydrates the cart.
pub async fn open_session(config: &BasketConfig) -> CliResult<Session> {
    let path = config.database_path();
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }

    info!(path = %path.display(), key = %config.storage.key, "Opening cart");
    let db = Database::new(DbConfig::new(&path)).await?;
    let store = CartStore::open(SqliteStorage::new(db.clone()), config.store_options()).await?;

    Ok(Session { store, db })
}

/// Applies `action` and waits for its write to land.
///
/// ## Errors
/// `CliError::PersistFailed` when the mutation could not be written; the
/// in-memory cart has still changed.
pub async fn execute(store: &CartStore, action: Action) -> CliResult<Output> {
    debug!(?action, "Executing");

    match action {
        Action::List => return Ok(Output::Cart(CartResponse::from(store))),
        Action::Totals => return Ok(Output::Totals(store.totals())),
        Action::Add(item) => store.add_to_cart(&item)?,
        Action::Increment(id) => store.increment(&id),
        Action::Decrement(id) => store.decrement(&id),
    }

    let failed = store.flush().await?;
    if failed > 0 {
        return Err(CliError::PersistFailed(failed));
    }

    Ok(Output::Cart(CartResponse::from(store)))
}
