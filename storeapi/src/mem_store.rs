//! In-memory key-value store for testing.
//!
//! `MemStore` implements `KvStore` over a `BTreeMap` behind a mutex. The
//! transaction update function runs while the lock is held, so transactions
//! are linearizable per path (and, trivially, across paths).
//!
//! Two knobs make it useful for exercising the engine:
//! - latency: every call suspends before touching the map, so concurrent
//!   callers genuinely interleave
//! - faults: calls matching an operation and path prefix fail with
//!   `StoreError::Unavailable`, optionally after letting some through

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::Mutex;
use serde_json::Value;

use crate::error::StoreError;
use crate::kv_store::{KvStore, TxDecision, TxOutcome, TxUpdate};

/// Store operation kinds, for fault matching.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StoreOp {
    Read,
    Write,
    Transaction,
    Scan,
}

/// An injected failure.
///
/// Matches calls of one `StoreOp` whose path starts with `prefix`. By default
/// every matching call fails; `after` lets the first `n` through and `times`
/// limits how many fail.
#[derive(Debug, Clone)]
pub struct Fault {
    op: StoreOp,
    prefix: String,
    skip: u32,
    remaining: Option<u32>,
}

impl Fault {
    pub fn new(op: StoreOp, prefix: impl Into<String>) -> Self {
        Self {
            op,
            prefix: prefix.into(),
            skip: 0,
            remaining: None,
        }
    }

    /// Let the first `n` matching calls succeed.
    pub fn after(mut self, n: u32) -> Self {
        self.skip = n;
        self
    }

    /// Fail at most `n` matching calls.
    pub fn times(mut self, n: u32) -> Self {
        self.remaining = Some(n);
        self
    }

    fn matches(&self, op: StoreOp, path: &str) -> bool {
        self.op == op && path.starts_with(&self.prefix)
    }
}

/// In-memory store backed by `BTreeMap`, shared behind `Arc`.
#[derive(Debug, Default)]
pub struct MemStore {
    data: Mutex<BTreeMap<String, Value>>,
    faults: Mutex<Vec<Fault>>,
    latency: Duration,
    calls: AtomicU64,
}

impl MemStore {
    /// Create a new empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Suspend every call for `latency` before it touches the map.
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    /// Insert a value directly, bypassing faults and latency.
    pub fn insert(&self, path: impl Into<String>, value: Value) {
        self.data.lock().insert(path.into(), value);
    }

    /// Read a value directly, bypassing faults and latency.
    pub fn get(&self, path: &str) -> Option<Value> {
        self.data.lock().get(path).cloned()
    }

    /// Remove a value directly, e.g. to clear a stuck index entry by hand.
    pub fn remove(&self, path: &str) -> Option<Value> {
        self.data.lock().remove(path)
    }

    /// Paths of all direct children of `prefix`.
    pub fn children(&self, prefix: &str) -> Vec<String> {
        children_of(&self.data.lock(), prefix)
            .into_iter()
            .map(|(k, _)| k)
            .collect()
    }

    /// Returns the number of entries in the store.
    pub fn len(&self) -> usize {
        self.data.lock().len()
    }

    /// Returns true if the store is empty.
    pub fn is_empty(&self) -> bool {
        self.data.lock().is_empty()
    }

    /// Number of `KvStore` calls made so far, including failed ones.
    pub fn calls(&self) -> u64 {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn inject(&self, fault: Fault) {
        self.faults.lock().push(fault);
    }

    async fn enter(&self, op: StoreOp, path: &str) -> Result<(), StoreError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.latency.is_zero() {
            tokio::task::yield_now().await;
        } else {
            tokio::time::sleep(self.latency).await;
        }
        self.check_fault(op, path)
    }

    fn check_fault(&self, op: StoreOp, path: &str) -> Result<(), StoreError> {
        let mut faults = self.faults.lock();
        for fault in faults.iter_mut().filter(|f| f.matches(op, path)) {
            if fault.skip > 0 {
                fault.skip -= 1;
                continue;
            }
            match fault.remaining.as_mut() {
                Some(0) => continue,
                Some(n) => *n -= 1,
                None => {}
            }
            return Err(StoreError::unavailable(format!(
                "injected {op:?} fault at {path}"
            )));
        }
        Ok(())
    }
}

fn children_of(data: &BTreeMap<String, Value>, prefix: &str) -> Vec<(String, Value)> {
    let start = format!("{prefix}/");
    data.range(start.clone()..)
        .take_while(|(k, _)| k.starts_with(&start))
        .filter(|(k, _)| !k[start.len()..].contains('/'))
        .map(|(k, v)| (k[start.len()..].to_string(), v.clone()))
        .collect()
}

#[async_trait]
impl KvStore for MemStore {
    async fn read(&self, path: &str) -> Result<Option<Value>, StoreError> {
        self.enter(StoreOp::Read, path).await?;
        Ok(self.data.lock().get(path).cloned())
    }

    /// Writing `null` deletes the entry.
    async fn write(&self, path: &str, value: Value) -> Result<(), StoreError> {
        self.enter(StoreOp::Write, path).await?;
        let mut data = self.data.lock();
        if value.is_null() {
            data.remove(path);
        } else {
            data.insert(path.to_string(), value);
        }
        Ok(())
    }

    async fn transaction(
        &self,
        path: &str,
        update: &TxUpdate<'_>,
    ) -> Result<TxOutcome, StoreError> {
        self.enter(StoreOp::Transaction, path).await?;
        let mut data = self.data.lock();
        let decision = update(data.get(path));
        let outcome = match decision {
            TxDecision::Set(value) if value.is_null() => {
                data.remove(path);
                TxOutcome::committed(None)
            }
            TxDecision::Set(value) => {
                data.insert(path.to_string(), value.clone());
                TxOutcome::committed(Some(value))
            }
            TxDecision::Remove => {
                data.remove(path);
                TxOutcome::committed(None)
            }
            TxDecision::Abort => TxOutcome::aborted(data.get(path).cloned()),
        };
        Ok(outcome)
    }

    async fn read_last(
        &self,
        prefix: &str,
        limit: usize,
    ) -> Result<Vec<(String, Value)>, StoreError> {
        self.enter(StoreOp::Scan, prefix).await?;
        let mut children = children_of(&self.data.lock(), prefix);
        let skip = children.len().saturating_sub(limit);
        Ok(children.split_off(skip))
    }

    async fn exists(&self, path: &str) -> Result<bool, StoreError> {
        self.enter(StoreOp::Read, path).await?;
        Ok(self.data.lock().contains_key(path))
    }
}
