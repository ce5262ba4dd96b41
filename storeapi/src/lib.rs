//! `contest-storeapi` — the key-value store contract for the contest core.
//!
//! The engine never talks to a concrete database. It needs a remote,
//! multi-writer store keyed by path-like strings with point reads, point
//! writes, bounded scans, and a single-key atomic read-modify-write. This
//! crate provides:
//!
//! - `KvStore` trait — the store contract
//! - `MemStore` — in-memory, linearizable `KvStore` with fault injection
//! - `TimedStore` — bounds every call with a client-side timeout
//! - `StoreConfig` — client-side limits
//! - `StoreError` — transient store failure

pub mod error;
pub mod types;
pub mod kv_store;
pub mod mem_store;
pub mod timed;

// Re-export commonly used types at the crate root.
pub use error::StoreError;
pub use types::StoreConfig;
pub use kv_store::{KvStore, TxDecision, TxOutcome, TxUpdate};
pub use mem_store::{Fault, MemStore, StoreOp};
pub use timed::TimedStore;
