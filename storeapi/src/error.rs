//! Store-side error type.
//!
//! Every variant is a transient failure from the caller's point of view:
//! the flow reports it and the user may retry. None of them say whether a
//! transaction that was in flight took effect.

use std::time::Duration;

use contest_primitives::CodecError;

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// The store could not be reached or the call failed in transport.
    #[error("store unavailable: {0}")]
    Unavailable(String),

    /// The store refused the operation (rules, quota, malformed path).
    #[error("store rejected {path}: {reason}")]
    Rejected { path: String, reason: String },

    /// No response within the client-side timeout.
    #[error("store call timed out after {0:?}")]
    Timeout(Duration),

    /// A record could not be encoded or decoded.
    #[error(transparent)]
    Codec(#[from] CodecError),
}

impl StoreError {
    pub fn unavailable(msg: impl Into<String>) -> Self {
        Self::Unavailable(msg.into())
    }

    pub fn rejected(path: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Rejected {
            path: path.into(),
            reason: reason.into(),
        }
    }

    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::Timeout(_))
    }
}
