//! Client-side timeout wrapper.
//!
//! `TimedStore` forwards every call to an inner store and gives up after
//! `StoreConfig::call_timeout`. A timed-out transaction may still have been
//! applied remotely; callers treat `StoreError::Timeout` as "outcome
//! unknown".

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;
use tracing::warn;

use crate::error::StoreError;
use crate::kv_store::{KvStore, TxOutcome, TxUpdate};
use crate::types::StoreConfig;

#[derive(Clone)]
pub struct TimedStore {
    inner: Arc<dyn KvStore>,
    timeout: Duration,
}

impl TimedStore {
    pub fn new(inner: Arc<dyn KvStore>, config: &StoreConfig) -> Self {
        Self {
            inner,
            timeout: config.call_timeout,
        }
    }

    async fn bounded<T>(
        &self,
        op: &'static str,
        path: &str,
        call: impl Future<Output = Result<T, StoreError>>,
    ) -> Result<T, StoreError> {
        match tokio::time::timeout(self.timeout, call).await {
            Ok(result) => result,
            Err(_) => {
                warn!(op, path, timeout = ?self.timeout, "store call timed out");
                Err(StoreError::Timeout(self.timeout))
            }
        }
    }
}

#[async_trait]
impl KvStore for TimedStore {
    async fn read(&self, path: &str) -> Result<Option<Value>, StoreError> {
        self.bounded("read", path, self.inner.read(path)).await
    }

    async fn write(&self, path: &str, value: Value) -> Result<(), StoreError> {
        self.bounded("write", path, self.inner.write(path, value)).await
    }

    async fn transaction(
        &self,
        path: &str,
        update: &TxUpdate<'_>,
    ) -> Result<TxOutcome, StoreError> {
        self.bounded("transaction", path, self.inner.transaction(path, update))
            .await
    }

    async fn read_last(
        &self,
        prefix: &str,
        limit: usize,
    ) -> Result<Vec<(String, Value)>, StoreError> {
        self.bounded("read_last", prefix, self.inner.read_last(prefix, limit))
            .await
    }

    async fn exists(&self, path: &str) -> Result<bool, StoreError> {
        self.bounded("exists", path, self.inner.exists(path)).await
    }
}
