//! # Persistence Writer
//!
//! Single background task that writes cart snapshots to storage in the
//! order they were produced.
//!
//! ## Write Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Persistence Writer Flow                              │
//! │                                                                         │
//! │  CartStore mutator (holds the state lock)                              │
//! │       │  WriterHandle::persist(snapshot)                               │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │  unbounded mpsc queue (FIFO)                                    │   │
//! │  │                                                                 │   │
//! │  │  Persist(#1) │ Persist(#2) │ Flush(reply) │ Persist(#3) │ ...   │   │
//! │  └────────────────────────────┬────────────────────────────────────┘   │
//! │                               │                                         │
//! │                               ▼                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │  PersistenceWriter::run                                        │   │
//! │  │                                                                 │   │
//! │  │  1. Receive next command                                       │   │
//! │  │  2. (coalesced) skip ahead to the newest queued snapshot       │   │
//! │  │  3. Encode snapshot as JSON                                    │   │
//! │  │  4. storage.set(key, json).await  ← write N-1 finishes first   │   │
//! │  │  5. On failure: error! + failure counter, keep going           │   │
//! │  │  6. Answer flushes queued behind the write                     │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                                                                         │
//! │  EXIT: after Close, or when every WriterHandle is dropped and the      │
//! │        queue is drained.                                               │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use basket_core::CartState;
use basket_storage::CartStorage;
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, error, info, warn};

use crate::config::WriteMode;
use crate::error::{CartError, CartResult};

// =============================================================================
// Commands
// =============================================================================

enum WriterCommand {
    /// Write this snapshot.
    Persist(CartState),

    /// Reply once every command queued before this one is done.
    Flush(oneshot::Sender<u64>),

    /// Finish queued work, reply, and stop.
    Close(oneshot::Sender<u64>),
}

// =============================================================================
// Handle
// =============================================================================

/// Sending side of the writer queue, held by every `CartStore` clone.
#[derive(Clone)]
pub(crate) struct WriterHandle {
    tx: mpsc::UnboundedSender<WriterCommand>,
    failures: Arc<AtomicU64>,
}

impl WriterHandle {
    /// Queues a snapshot. Never blocks, so it is safe under the state lock.
    pub(crate) fn persist(&self, snapshot: CartState) {
        if self.tx.send(WriterCommand::Persist(snapshot)).is_err() {
            warn!("Persistence writer is closed, snapshot kept in memory only");
        }
    }

    /// Waits for every snapshot queued so far, returning the failure count.
    pub(crate) async fn flush(&self) -> CartResult<u64> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.tx
            .send(WriterCommand::Flush(reply_tx))
            .map_err(|_| CartError::WriterClosed)?;
        reply_rx.await.map_err(|_| CartError::WriterClosed)
    }

    /// Drains the queue and stops the writer. A second close is a no-op.
    pub(crate) async fn close(&self) -> u64 {
        let (reply_tx, reply_rx) = oneshot::channel();
        if self.tx.send(WriterCommand::Close(reply_tx)).is_err() {
            return self.failed_writes();
        }
        reply_rx.await.unwrap_or_else(|_| self.failed_writes())
    }

    pub(crate) fn failed_writes(&self) -> u64 {
        self.failures.load(Ordering::SeqCst)
    }
}

// =============================================================================
// Writer Task
// =============================================================================

/// Owns the storage handle and performs every write for one store.
pub(crate) struct PersistenceWriter {
    storage: Arc<dyn CartStorage>,
    key: String,
    mode: WriteMode,
    rx: mpsc::UnboundedReceiver<WriterCommand>,
    failures: Arc<AtomicU64>,
    written: u64,
}

/// What a coalesced drain found behind the snapshot being written.
struct Backlog {
    latest: CartState,
    skipped: usize,
    flushes: Vec<oneshot::Sender<u64>>,
    close: Option<oneshot::Sender<u64>>,
}

impl PersistenceWriter {
    /// Creates a writer and the handle that feeds it.
    pub(crate) fn new(
        storage: Arc<dyn CartStorage>,
        key: impl Into<String>,
        mode: WriteMode,
    ) -> (Self, WriterHandle) {
        let (tx, rx) = mpsc::unbounded_channel();
        let failures = Arc::new(AtomicU64::new(0));

        let writer = PersistenceWriter {
            storage,
            key: key.into(),
            mode,
            rx,
            failures: Arc::clone(&failures),
            written: 0,
        };

        (writer, WriterHandle { tx, failures })
    }

    /// Runs the writer loop.
    ///
    /// This should be spawned as a background task.
    pub(crate) async fn run(mut self) {
        info!(key = %self.key, mode = %self.mode, "Persistence writer starting");

        while let Some(command) = self.rx.recv().await {
            match command {
                WriterCommand::Persist(snapshot) => {
                    let backlog = match self.mode {
                        WriteMode::Immediate => Backlog {
                            latest: snapshot,
                            skipped: 0,
                            flushes: Vec::new(),
                            close: None,
                        },
                        WriteMode::Coalesced => self.drain_backlog(snapshot),
                    };

                    if backlog.skipped > 0 {
                        debug!(skipped = backlog.skipped, "Coalesced queued snapshots");
                    }

                    self.write(&backlog.latest).await;

                    let failures = self.failed_writes();
                    for reply in backlog.flushes {
                        let _ = reply.send(failures);
                    }
                    if let Some(reply) = backlog.close {
                        let _ = reply.send(failures);
                        break;
                    }
                }
                WriterCommand::Flush(reply) => {
                    let _ = reply.send(self.failed_writes());
                }
                WriterCommand::Close(reply) => {
                    let _ = reply.send(self.failed_writes());
                    break;
                }
            }
        }

        info!(
            written = self.written,
            failed = self.failed_writes(),
            "Persistence writer stopped"
        );
    }

    /// Pulls everything already queued, keeping only the newest snapshot.
    ///
    /// Flushes seen along the way are answered after the newest snapshot is
    /// written, which is never older than what they waited for.
    fn drain_backlog(&mut self, first: CartState) -> Backlog {
        let mut backlog = Backlog {
            latest: first,
            skipped: 0,
            flushes: Vec::new(),
            close: None,
        };

        while let Ok(command) = self.rx.try_recv() {
            match command {
                WriterCommand::Persist(snapshot) => {
                    backlog.latest = snapshot;
                    backlog.skipped += 1;
                }
                WriterCommand::Flush(reply) => backlog.flushes.push(reply),
                WriterCommand::Close(reply) => {
                    backlog.close = Some(reply);
                    break;
                }
            }
        }

        backlog
    }

    async fn write(&mut self, snapshot: &CartState) {
        let blob = match snapshot.to_json() {
            Ok(blob) => blob,
            Err(e) => {
                self.failures.fetch_add(1, Ordering::SeqCst);
                error!(key = %self.key, error = %e, "Failed to encode cart snapshot");
                return;
            }
        };

        match self.storage.set(&self.key, &blob).await {
            Ok(()) => {
                self.written += 1;
                debug!(key = %self.key, items = snapshot.len(), "Cart persisted");
            }
            Err(e) => {
                self.failures.fetch_add(1, Ordering::SeqCst);
                error!(key = %self.key, error = %e, "Failed to persist cart");
            }
        }
    }

    fn failed_writes(&self) -> u64 {
        self.failures.load(Ordering::SeqCst)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use basket_core::{Money, NewLineItem};
    use basket_storage::MemoryStorage;

    fn cart_with(quantity: u32) -> CartState {
        let item = NewLineItem::new("a", "A", "https://img/a.png", Money::from_cents(100));
        let mut cart = CartState::new().add(&item).unwrap();
        for _ in 1..quantity {
            cart = cart.increment("a");
        }
        cart
    }

    fn spawn(storage: &MemoryStorage, mode: WriteMode) -> WriterHandle {
        let (writer, handle) = PersistenceWriter::new(Arc::new(storage.clone()), "cart", mode);
        tokio::spawn(writer.run());
        handle
    }

    #[tokio::test]
    async fn test_immediate_writes_every_snapshot() {
        let storage = MemoryStorage::new();
        let handle = spawn(&storage, WriteMode::Immediate);

        for quantity in 1..=3 {
            handle.persist(cart_with(quantity));
        }
        assert_eq!(handle.flush().await.unwrap(), 0);

        assert_eq!(storage.write_count(), 3);
        let blob = storage.get("cart").await.unwrap().unwrap();
        assert_eq!(CartState::from_json(&blob).unwrap(), cart_with(3));
    }

    #[tokio::test]
    async fn test_coalesced_collapses_backlog() {
        let storage = MemoryStorage::new();
        let (writer, handle) =
            PersistenceWriter::new(Arc::new(storage.clone()), "cart", WriteMode::Coalesced);

        // Queue everything before the task runs so it all sits in one backlog
        for quantity in 1..=5 {
            handle.persist(cart_with(quantity));
        }
        tokio::spawn(writer.run());

        assert_eq!(handle.flush().await.unwrap(), 0);
        assert_eq!(storage.write_count(), 1);

        let blob = storage.get("cart").await.unwrap().unwrap();
        assert_eq!(CartState::from_json(&blob).unwrap(), cart_with(5));
    }

    #[tokio::test]
    async fn test_close_drains_then_rejects_flush() {
        let storage = MemoryStorage::new();
        let handle = spawn(&storage, WriteMode::Immediate);

        handle.persist(cart_with(1));
        handle.persist(cart_with(2));
        assert_eq!(handle.close().await, 0);
        assert_eq!(storage.write_count(), 2);

        assert!(matches!(handle.flush().await, Err(CartError::WriterClosed)));
        // Closing again is harmless
        assert_eq!(handle.close().await, 0);
        // Persisting after close only logs
        handle.persist(cart_with(3));
        assert_eq!(storage.write_count(), 2);
    }
}
