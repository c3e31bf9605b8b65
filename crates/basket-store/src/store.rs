//! # Cart Store
//!
//! The live cart: an in-memory snapshot that consumers read synchronously,
//! plus the writer task that mirrors every change into storage.
//!
//! ## Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         CartStore Lifecycle                             │
//! │                                                                         │
//! │  CartStore::open(storage, options).await                               │
//! │       │  1. storage.get(key)          ← the only read, ever            │
//! │       │  2. decode blob (absent → empty, corrupt → on_corrupt policy)  │
//! │       │  3. spawn PersistenceWriter                                    │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │  add_to_cart / increment / decrement   (never suspend)          │   │
//! │  │                                                                 │   │
//! │  │  under the watch lock:                                          │   │
//! │  │    next = transition(current)                                   │   │
//! │  │    current = next            → subscribers notified if changed  │   │
//! │  │    writer.persist(next)      → queue order == mutation order    │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  flush().await   ← every queued snapshot attempted                     │
//! │  close().await   ← drain and stop the writer                           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::convert::Infallible;
use std::sync::Arc;

use basket_core::{CartState, CartTotals, LineItem, NewLineItem};
use basket_storage::CartStorage;
use tokio::sync::watch;
use tracing::{debug, info, warn};

use crate::config::{CorruptPolicy, WriteMode, DEFAULT_STORAGE_KEY};
use crate::error::{CartError, CartResult};
use crate::writer::{PersistenceWriter, WriterHandle};

// =============================================================================
// Options
// =============================================================================

/// Settings for one [`CartStore`].
///
/// ## Example
/// ```rust,ignore
/// let options = StoreOptions::default()
///     .key("@GoMarketPlace")
///     .write_mode(WriteMode::Coalesced)
///     .on_corrupt(CorruptPolicy::Fail);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreOptions {
    /// Storage key the cart blob lives under.
    pub key: String,

    pub write_mode: WriteMode,

    pub on_corrupt: CorruptPolicy,
}

impl Default for StoreOptions {
    fn default() -> Self {
        StoreOptions {
            key: DEFAULT_STORAGE_KEY.to_string(),
            write_mode: WriteMode::default(),
            on_corrupt: CorruptPolicy::default(),
        }
    }
}

impl StoreOptions {
    pub fn key(mut self, key: impl Into<String>) -> Self {
        self.key = key.into();
        self
    }

    pub fn write_mode(mut self, mode: WriteMode) -> Self {
        self.write_mode = mode;
        self
    }

    pub fn on_corrupt(mut self, policy: CorruptPolicy) -> Self {
        self.on_corrupt = policy;
        self
    }
}

// =============================================================================
// Cart Store
// =============================================================================

/// Handle to the live cart. Clones share the same cart and writer.
///
/// Dropping the last clone lets the writer finish its queue and exit.
#[derive(Clone)]
pub struct CartStore {
    shared: Arc<Shared>,
}

struct Shared {
    key: String,
    state: watch::Sender<CartState>,
    writer: WriterHandle,
}

impl std::fmt::Debug for CartStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CartStore")
            .field("key", &self.shared.key)
            .field("items", &self.shared.state.borrow().len())
            .finish()
    }
}

impl CartStore {
    /// Hydrates the cart from `storage` and starts the writer task.
    ///
    /// Must be called inside a Tokio runtime.
    ///
    /// ## Errors
    /// - `CartError::Storage` when the stored blob cannot be read
    /// - `CartError::CorruptState` when it cannot be decoded and the policy
    ///   is [`CorruptPolicy::Fail`]
    pub async fn open<S>(storage: S, options: StoreOptions) -> CartResult<Self>
    where
        S: CartStorage + 'static,
    {
        let storage: Arc<dyn CartStorage> = Arc::new(storage);
        let initial = hydrate(storage.as_ref(), &options).await?;

        let (writer, handle) =
            PersistenceWriter::new(storage, options.key.clone(), options.write_mode);
        tokio::spawn(writer.run());

        let (state, _) = watch::channel(initial);

        Ok(CartStore {
            shared: Arc::new(Shared {
                key: options.key,
                state,
                writer: handle,
            }),
        })
    }

    // =========================================================================
    // Reads
    // =========================================================================

    /// Current line items, in insertion order.
    pub fn products(&self) -> Arc<[LineItem]> {
        self.shared.state.borrow().shared_items()
    }

    /// Current cart snapshot.
    pub fn snapshot(&self) -> CartState {
        self.shared.state.borrow().clone()
    }

    pub fn totals(&self) -> CartTotals {
        self.shared.state.borrow().totals()
    }

    /// Receiver that is notified whenever the cart actually changes.
    pub fn subscribe(&self) -> watch::Receiver<CartState> {
        self.shared.state.subscribe()
    }

    pub fn key(&self) -> &str {
        &self.shared.key
    }

    /// Storage writes that have failed so far.
    pub fn failed_writes(&self) -> u64 {
        self.shared.writer.failed_writes()
    }

    // =========================================================================
    // Mutations
    // =========================================================================

    /// Adds one unit of `item`. Its `quantity`, if it came from a
    /// [`LineItem`], is ignored.
    ///
    /// ## Errors
    /// `CartError::InvalidItem` for an empty id or negative price; the cart
    /// and storage are left untouched.
    pub fn add_to_cart(&self, item: &NewLineItem) -> CartResult<()> {
        self.apply("add", &item.id, |cart| cart.add(item))
            .map_err(CartError::InvalidItem)
    }

    /// Adds one unit to an existing entry. An unknown id changes nothing,
    /// but the unchanged cart is still written.
    pub fn increment(&self, id: &str) {
        self.commit("increment", id, |cart| cart.increment(id));
    }

    /// Removes one unit, dropping the entry when it reaches zero. An unknown
    /// id changes nothing, but the unchanged cart is still written.
    pub fn decrement(&self, id: &str) {
        self.commit("decrement", id, |cart| cart.decrement(id));
    }

    /// A transition that cannot be rejected.
    fn commit<F>(&self, op: &'static str, id: &str, transition: F)
    where
        F: FnOnce(&CartState) -> CartState,
    {
        match self.apply(op, id, |cart| Ok::<_, Infallible>(transition(cart))) {
            Ok(()) => {}
            Err(never) => match never {},
        }
    }

    /// Computes, publishes and queues the next snapshot while holding the
    /// state lock, so concurrent handles queue in mutation order. A rejected
    /// transition publishes and queues nothing.
    fn apply<F, E>(&self, op: &'static str, id: &str, transition: F) -> Result<(), E>
    where
        F: FnOnce(&CartState) -> Result<CartState, E>,
        E: std::fmt::Display,
    {
        let writer = &self.shared.writer;
        let mut outcome = Ok(());

        self.shared.state.send_if_modified(|current| {
            let next = match transition(current) {
                Ok(next) => next,
                Err(e) => {
                    outcome = Err(e);
                    return false;
                }
            };

            let changed = !next.ptr_eq(current);
            debug!(
                op,
                id = %id,
                changed,
                quantity = next.get(id).map(|item| item.quantity).unwrap_or(0),
                items = next.len(),
                "Cart mutation"
            );

            writer.persist(next.clone());
            *current = next;
            changed
        });

        if let Err(ref e) = outcome {
            debug!(op, id = %id, error = %e, "Cart mutation rejected");
        }
        outcome
    }

    // =========================================================================
    // Persistence Control
    // =========================================================================

    /// Waits until every snapshot queued so far has been attempted.
    ///
    /// Returns the number of failed writes observed so far.
    pub async fn flush(&self) -> CartResult<u64> {
        self.shared.writer.flush().await
    }

    /// Drains the queue and stops the writer. Later mutations still update
    /// memory but are no longer persisted.
    pub async fn close(&self) -> u64 {
        let failed = self.shared.writer.close().await;
        info!(key = %self.shared.key, failed, "Cart store closed");
        failed
    }
}

// =============================================================================
// Hydrate
// =============================================================================

async fn hydrate(storage: &dyn CartStorage, options: &StoreOptions) -> CartResult<CartState> {
    let Some(blob) = storage.get(&options.key).await? else {
        info!(key = %options.key, "No stored cart, starting empty");
        return Ok(CartState::new());
    };

    match CartState::from_json(&blob) {
        Ok(cart) => {
            info!(key = %options.key, items = cart.len(), "Cart hydrated");
            Ok(cart)
        }
        Err(e) => {
            let err = CartError::CorruptState {
                key: options.key.clone(),
                reason: e.to_string(),
            };
            match options.on_corrupt {
                CorruptPolicy::Reset => {
                    warn!(error = %err, "Discarding corrupt cart, starting empty");
                    Ok(CartState::new())
                }
                CorruptPolicy::Fail => Err(err),
            }
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use basket_core::Money;
    use basket_storage::{
        Database, DbConfig, MemoryStorage, SqliteStorage, StorageError, StorageResult,
    };
    use std::sync::Mutex;
    use std::time::Duration;

    const KEY: &str = "@GoMarketPlace";

    fn product(id: &str, cents: i64) -> NewLineItem {
        NewLineItem::new(
            id,
            format!("Product {}", id),
            format!("https://img/{}.png", id),
            Money::from_cents(cents),
        )
    }

    fn quantities(store: &CartStore) -> Vec<(String, u32)> {
        store
            .products()
            .iter()
            .map(|item| (item.id.clone(), item.quantity))
            .collect()
    }

    fn pairs(items: &[(&str, u32)]) -> Vec<(String, u32)> {
        items.iter().map(|(id, qty)| (id.to_string(), *qty)).collect()
    }

    async fn stored(storage: &impl CartStorage) -> Option<CartState> {
        storage
            .get(KEY)
            .await
            .unwrap()
            .map(|blob| CartState::from_json(&blob).unwrap())
    }

    /// Records every write; the first one takes `first_delay`.
    #[derive(Clone, Default)]
    struct RecordingStorage {
        writes: Arc<Mutex<Vec<String>>>,
        first_delay: Duration,
    }

    impl RecordingStorage {
        fn slow_first(delay: Duration) -> Self {
            RecordingStorage {
                writes: Arc::default(),
                first_delay: delay,
            }
        }

        fn written(&self) -> Vec<CartState> {
            self.writes
                .lock()
                .unwrap()
                .iter()
                .map(|blob| CartState::from_json(blob).unwrap())
                .collect()
        }
    }

    #[async_trait]
    impl CartStorage for RecordingStorage {
        async fn get(&self, _key: &str) -> StorageResult<Option<String>> {
            Ok(None)
        }

        async fn set(&self, _key: &str, value: &str) -> StorageResult<()> {
            let first = self.writes.lock().unwrap().is_empty();
            if first {
                tokio::time::sleep(self.first_delay).await;
            }
            self.writes.lock().unwrap().push(value.to_string());
            Ok(())
        }
    }

    /// Reads succeed (empty); every write fails.
    struct FailingWrites;

    #[async_trait]
    impl CartStorage for FailingWrites {
        async fn get(&self, _key: &str) -> StorageResult<Option<String>> {
            Ok(None)
        }

        async fn set(&self, _key: &str, _value: &str) -> StorageResult<()> {
            Err(StorageError::Unavailable("disk full".into()))
        }
    }

    struct FailingReads;

    #[async_trait]
    impl CartStorage for FailingReads {
        async fn get(&self, _key: &str) -> StorageResult<Option<String>> {
            Err(StorageError::Unavailable("locked".into()))
        }

        async fn set(&self, _key: &str, _value: &str) -> StorageResult<()> {
            Ok(())
        }
    }

    async fn open_memory(storage: &MemoryStorage) -> CartStore {
        CartStore::open(storage.clone(), StoreOptions::default())
            .await
            .unwrap()
    }

    // =========================================================================
    // Transitions through the store
    // =========================================================================

    #[tokio::test]
    async fn test_repeated_adds_merge() {
        let storage = MemoryStorage::new();
        let store = open_memory(&storage).await;

        for _ in 0..4 {
            store.add_to_cart(&product("mug", 1250)).unwrap();
        }

        assert_eq!(quantities(&store), pairs(&[("mug", 4)]));
        store.flush().await.unwrap();
        assert_eq!(stored(&storage).await, Some(store.snapshot()));
    }

    #[tokio::test]
    async fn test_add_ignores_incoming_quantity_and_keeps_metadata() {
        let store = open_memory(&MemoryStorage::new()).await;
        store.add_to_cart(&product("mug", 1250)).unwrap();

        let mut renamed = product("mug", 999);
        renamed.title = "Renamed".into();
        store.add_to_cart(&renamed).unwrap();

        let products = store.products();
        assert_eq!(products[0].quantity, 2);
        assert_eq!(products[0].title, "Product mug");
        assert_eq!(products[0].price, Money::from_cents(1250));
    }

    #[tokio::test]
    async fn test_invalid_add_touches_nothing() {
        let storage = MemoryStorage::new();
        let store = open_memory(&storage).await;

        let result = store.add_to_cart(&product("", 100));
        assert!(matches!(result, Err(CartError::InvalidItem(_))));
        let result = store.add_to_cart(&product("neg", -1));
        assert!(matches!(result, Err(CartError::InvalidItem(_))));

        store.flush().await.unwrap();
        assert!(store.products().is_empty());
        assert_eq!(storage.write_count(), 0);
    }

    #[tokio::test]
    async fn test_increment_missing_id_still_persists() {
        let storage = MemoryStorage::new();
        let store = open_memory(&storage).await;
        store.add_to_cart(&product("a", 100)).unwrap();
        let before = store.snapshot();

        store.increment("ghost");
        store.flush().await.unwrap();

        assert!(store.snapshot().ptr_eq(&before));
        assert_eq!(storage.write_count(), 2);
        assert_eq!(stored(&storage).await, Some(before));
    }

    #[tokio::test]
    async fn test_decrement_missing_id_still_persists() {
        let storage = MemoryStorage::new();
        let store = open_memory(&storage).await;

        store.decrement("ghost");
        store.flush().await.unwrap();

        assert!(store.products().is_empty());
        assert_eq!(storage.write_count(), 1);
        assert_eq!(storage.get(KEY).await.unwrap().as_deref(), Some("[]"));
    }

    #[tokio::test]
    async fn test_decrement_to_zero_writes_empty_array() {
        let storage = MemoryStorage::new();
        let store = open_memory(&storage).await;
        store.add_to_cart(&product("a", 100)).unwrap();

        store.decrement("a");
        store.flush().await.unwrap();

        assert!(store.products().is_empty());
        // The key is overwritten, never deleted
        assert_eq!(storage.get(KEY).await.unwrap().as_deref(), Some("[]"));
    }

    #[tokio::test]
    async fn test_decrement_above_one_keeps_position() {
        let store = open_memory(&MemoryStorage::new()).await;
        store.add_to_cart(&product("a", 100)).unwrap();
        for _ in 0..3 {
            store.add_to_cart(&product("b", 200)).unwrap();
        }
        store.add_to_cart(&product("c", 300)).unwrap();

        store.decrement("b");

        assert_eq!(quantities(&store), pairs(&[("a", 1), ("b", 2), ("c", 1)]));
    }

    #[tokio::test]
    async fn test_order_survives_interleaved_updates() {
        let storage = MemoryStorage::new();
        let store = open_memory(&storage).await;
        for id in ["a", "b", "c"] {
            store.add_to_cart(&product(id, 100)).unwrap();
            store.increment(id);
        }

        store.increment("c");
        store.decrement("a");
        store.increment("b");
        store.decrement("c");
        store.increment("a");
        store.add_to_cart(&product("b", 100)).unwrap();

        assert_eq!(quantities(&store), pairs(&[("a", 2), ("b", 4), ("c", 2)]));
        store.flush().await.unwrap();
        assert_eq!(stored(&storage).await, Some(store.snapshot()));
    }

    #[tokio::test]
    async fn test_totals() {
        let store = open_memory(&MemoryStorage::new()).await;
        store.add_to_cart(&product("a", 1250)).unwrap();
        store.add_to_cart(&product("a", 1250)).unwrap();
        store.add_to_cart(&product("b", 99)).unwrap();

        let totals = store.totals();
        assert_eq!(totals.item_count, 2);
        assert_eq!(totals.total_quantity, 3);
        assert_eq!(totals.subtotal, Money::from_cents(2599));
    }

    // =========================================================================
    // Hydrate
    // =========================================================================

    #[tokio::test]
    async fn test_round_trip_memory() {
        let storage = MemoryStorage::new();
        let store = open_memory(&storage).await;
        store.add_to_cart(&product("a", 100)).unwrap();
        store.add_to_cart(&product("b", 250)).unwrap();
        store.increment("b");
        store.close().await;

        let reopened = open_memory(&storage).await;
        assert_eq!(reopened.snapshot(), store.snapshot());
    }

    #[tokio::test]
    async fn test_round_trip_sqlite() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let storage = SqliteStorage::new(db);

        let store = CartStore::open(storage.clone(), StoreOptions::default())
            .await
            .unwrap();
        store.add_to_cart(&product("a", 1999)).unwrap();
        store.add_to_cart(&product("b", 5)).unwrap();
        store.decrement("a");
        store.add_to_cart(&product("c", 700)).unwrap();
        store.increment("c");
        assert_eq!(store.flush().await.unwrap(), 0);

        let reopened = CartStore::open(storage, StoreOptions::default())
            .await
            .unwrap();
        assert_eq!(quantities(&reopened), pairs(&[("b", 1), ("c", 2)]));
        assert_eq!(reopened.snapshot(), store.snapshot());
    }

    #[tokio::test]
    async fn test_absent_blob_starts_empty() {
        let storage = MemoryStorage::with_entry("other-key", "not json");
        let store = open_memory(&storage).await;
        assert!(store.products().is_empty());
    }

    #[tokio::test]
    async fn test_legacy_decimal_prices_hydrate() {
        let blob = r#"[{"id":"1","title":"Shoe","image_url":"https://img/1.png","price":12.5,"quantity":2}]"#;
        let store = open_memory(&MemoryStorage::with_entry(KEY, blob)).await;

        let products = store.products();
        assert_eq!(products[0].price, Money::from_cents(1250));
        assert_eq!(products[0].quantity, 2);
    }

    #[tokio::test]
    async fn test_corrupt_blob_resets_by_default() {
        for blob in [
            "{not json",
            r#"{"id":"a"}"#,
            r#"[{"id":"a","title":"A","image_url":"u","price":1,"quantity":0}]"#,
            r#"[{"id":"a","title":"A","image_url":"u","price":1,"quantity":1},
                {"id":"a","title":"A","image_url":"u","price":1,"quantity":1}]"#,
        ] {
            let storage = MemoryStorage::with_entry(KEY, blob);
            let store = open_memory(&storage).await;

            assert!(store.products().is_empty(), "blob: {}", blob);
            // Left in place until the next mutation
            assert_eq!(storage.get(KEY).await.unwrap().as_deref(), Some(blob));
        }
    }

    #[tokio::test]
    async fn test_corrupt_blob_overwritten_by_next_mutation() {
        let storage = MemoryStorage::with_entry(KEY, "garbage");
        let store = open_memory(&storage).await;

        store.add_to_cart(&product("a", 100)).unwrap();
        store.flush().await.unwrap();

        assert_eq!(stored(&storage).await, Some(store.snapshot()));
    }

    #[tokio::test]
    async fn test_corrupt_blob_fails_when_configured() {
        let storage = MemoryStorage::with_entry(KEY, "garbage");
        let options = StoreOptions::default().on_corrupt(CorruptPolicy::Fail);

        let result = CartStore::open(storage, options).await;

        match result {
            Err(CartError::CorruptState { key, .. }) => assert_eq!(key, KEY),
            other => panic!("expected CorruptState, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_unreadable_storage_fails_open() {
        let result = CartStore::open(FailingReads, StoreOptions::default()).await;
        assert!(matches!(result, Err(CartError::Storage(_))));
    }

    #[tokio::test]
    async fn test_custom_key() {
        let storage = MemoryStorage::new();
        let store = CartStore::open(storage.clone(), StoreOptions::default().key("cart-v2"))
            .await
            .unwrap();
        store.add_to_cart(&product("a", 100)).unwrap();
        store.flush().await.unwrap();

        assert_eq!(store.key(), "cart-v2");
        assert!(storage.get("cart-v2").await.unwrap().is_some());
        assert!(storage.get(KEY).await.unwrap().is_none());
    }

    // =========================================================================
    // Write ordering and failures
    // =========================================================================

    #[tokio::test(start_paused = true)]
    async fn test_slow_first_write_does_not_reorder() {
        let storage = RecordingStorage::slow_first(Duration::from_millis(500));
        let store = CartStore::open(storage.clone(), StoreOptions::default())
            .await
            .unwrap();

        store.add_to_cart(&product("x", 100)).unwrap();
        store.increment("x");
        store.flush().await.unwrap();

        let written = storage.written();
        assert_eq!(written.len(), 2);
        assert_eq!(written[0].get("x").map(|item| item.quantity), Some(1));
        assert_eq!(written[1].get("x").map(|item| item.quantity), Some(2));
        assert_eq!(written.last(), Some(&store.snapshot()));
    }

    #[tokio::test(start_paused = true)]
    async fn test_coalesced_mode_converges() {
        let storage = RecordingStorage::slow_first(Duration::from_millis(500));
        let options = StoreOptions::default().write_mode(WriteMode::Coalesced);
        let store = CartStore::open(storage.clone(), options).await.unwrap();

        store.add_to_cart(&product("x", 100)).unwrap();
        for _ in 0..5 {
            store.increment("x");
        }
        store.add_to_cart(&product("y", 100)).unwrap();
        store.flush().await.unwrap();

        let written = storage.written();
        assert!(written.len() < 7);
        assert_eq!(written.last(), Some(&store.snapshot()));
        assert_eq!(quantities(&store), pairs(&[("x", 6), ("y", 1)]));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_handles_persist_final_state() {
        let storage = MemoryStorage::new();
        let store = open_memory(&storage).await;
        store.add_to_cart(&product("x", 100)).unwrap();

        let tasks: Vec<_> = (0..8)
            .map(|_| {
                let store = store.clone();
                tokio::spawn(async move {
                    for _ in 0..25 {
                        store.increment("x");
                    }
                })
            })
            .collect();
        for task in tasks {
            task.await.unwrap();
        }
        store.flush().await.unwrap();

        assert_eq!(quantities(&store), pairs(&[("x", 201)]));
        assert_eq!(stored(&storage).await, Some(store.snapshot()));
    }

    #[tokio::test]
    async fn test_write_failures_leave_memory_authoritative() {
        let store = CartStore::open(FailingWrites, StoreOptions::default())
            .await
            .unwrap();

        store.add_to_cart(&product("a", 100)).unwrap();
        store.increment("a");

        assert_eq!(store.flush().await.unwrap(), 2);
        assert_eq!(store.failed_writes(), 2);
        assert_eq!(quantities(&store), pairs(&[("a", 2)]));
    }

    #[tokio::test]
    async fn test_flush_after_close_is_rejected() {
        let storage = MemoryStorage::new();
        let store = open_memory(&storage).await;
        store.add_to_cart(&product("a", 100)).unwrap();

        assert_eq!(store.close().await, 0);
        assert_eq!(storage.write_count(), 1);
        assert!(matches!(store.flush().await, Err(CartError::WriterClosed)));

        // Memory keeps working after close
        store.increment("a");
        assert_eq!(quantities(&store), pairs(&[("a", 2)]));
    }

    // =========================================================================
    // Subscribers
    // =========================================================================

    #[tokio::test]
    async fn test_subscribers_see_changes_only() {
        let store = open_memory(&MemoryStorage::new()).await;
        let mut rx = store.subscribe();

        store.increment("ghost");
        assert!(!rx.has_changed().unwrap());

        store.add_to_cart(&product("a", 100)).unwrap();
        assert!(rx.has_changed().unwrap());
        assert_eq!(rx.borrow_and_update().len(), 1);

        store.decrement("a");
        rx.changed().await.unwrap();
        assert!(rx.borrow_and_update().is_empty());
    }

    #[tokio::test]
    async fn test_rejected_add_and_noop_increment_differ() {
        let storage = MemoryStorage::new();
        let store = open_memory(&storage).await;
        let mut rx = store.subscribe();

        // Rejected: nothing published, nothing queued
        assert!(store.add_to_cart(&product("", 100)).is_err());
        assert_eq!(store.flush().await.unwrap(), 0);
        assert!(!rx.has_changed().unwrap());
        assert_eq!(storage.write_count(), 0);

        // Unchanged: nothing published, snapshot still queued
        store.increment("ghost");
        assert_eq!(store.flush().await.unwrap(), 0);
        assert!(!rx.has_changed().unwrap());
        assert_eq!(storage.write_count(), 1);
    }
}
