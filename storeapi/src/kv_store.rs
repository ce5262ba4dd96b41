//! The key-value store contract.
//!
//! Paths are `/`-separated strings such as `submissions/R1_1700000000000_3`.
//! Values are JSON. Each method is a suspension point: the caller yields
//! until the store answers or the call fails.
//!
//! Implementations:
//! - `MemStore` (this crate) — in-memory, for tests and local runs
//! - `TimedStore` (this crate) — timeout wrapper around any other store
//! - a remote realtime database client, supplied by the embedding app

use async_trait::async_trait;
use serde_json::Value;

use crate::error::StoreError;

/// What a transaction update function wants done with the current value.
#[derive(Debug, Clone, PartialEq)]
pub enum TxDecision {
    /// Replace the value.
    Set(Value),
    /// Delete the entry.
    Remove,
    /// Leave the value untouched; the transaction reports `committed = false`.
    Abort,
}

/// Result of a single-key transaction.
#[derive(Debug, Clone, PartialEq)]
pub struct TxOutcome {
    /// True when the update function's decision was applied.
    pub committed: bool,
    /// Value at the path after the transaction. On abort this is the value
    /// the update function saw and declined to change.
    pub value: Option<Value>,
}

impl TxOutcome {
    pub fn committed(value: Option<Value>) -> Self {
        Self {
            committed: true,
            value,
        }
    }

    pub fn aborted(value: Option<Value>) -> Self {
        Self {
            committed: false,
            value,
        }
    }
}

/// Update function passed to `KvStore::transaction`.
///
/// Higher-ranked over the borrow of the current value, so a store can hand
/// it a reference into data it holds under its own lock.
pub type TxUpdate<'a> = dyn for<'v> Fn(Option<&'v Value>) -> TxDecision + Send + Sync + 'a;

/// Remote, multi-reader/multi-writer store keyed by path.
///
/// `transaction` must be linearizable per path: concurrent transactions on
/// the same path behave as if run one at a time, each seeing the value left
/// by the previous one. No cross-path atomicity is offered or needed.
#[async_trait]
pub trait KvStore: Send + Sync {
    /// Point read. `Ok(None)` when nothing is stored at `path`.
    async fn read(&self, path: &str) -> Result<Option<Value>, StoreError>;

    /// Point write, replacing whatever is at `path`.
    async fn write(&self, path: &str, value: Value) -> Result<(), StoreError>;

    /// Atomic read-modify-write of a single path.
    ///
    /// `update` receives the current value (`None` if absent) and decides.
    /// An implementation may call it more than once if it retries under
    /// contention; only the last decision takes effect.
    async fn transaction(
        &self,
        path: &str,
        update: &TxUpdate<'_>,
    ) -> Result<TxOutcome, StoreError>;

    /// The last `limit` direct children of `prefix`, in key order.
    ///
    /// Returns `(child_key, value)` pairs. This is a bounded window, not a
    /// full listing: older children beyond the window are not returned.
    async fn read_last(
        &self,
        prefix: &str,
        limit: usize,
    ) -> Result<Vec<(String, Value)>, StoreError>;

    /// Check whether anything is stored at `path`.
    ///
    /// Default implementation uses `read()`, but backends may optimize this.
    async fn exists(&self, path: &str) -> Result<bool, StoreError> {
        Ok(self.read(path).await?.is_some())
    }
}
