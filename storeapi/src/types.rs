//! Client-side store configuration.

use std::time::Duration;

/// Limits applied on the client side of every store call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreConfig {
    /// Upper bound on a single read, write, scan, or transaction.
    /// Default: 10 s.
    pub call_timeout: Duration,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            call_timeout: Duration::from_secs(10),
        }
    }
}
