//! Engine error types.

use contest_primitives::ValidationError;
use contest_storeapi::StoreError;

use crate::writer::WriteFailure;

/// Top-level error type for the engine crate.
///
/// Flows never let these escape as faults; they end up inside a `Failed`
/// or `Invalid` outcome that the UI renders.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    /// Input rejected before any store call.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// Store read, write, scan, or transaction failed.
    #[error("store error: {0}")]
    Store(#[from] StoreError),

    /// The submission record could not be written after the slot was claimed.
    #[error(transparent)]
    Write(#[from] WriteFailure),

    /// Every generated registration id was already taken.
    #[error("no free registration id after {attempts} attempts")]
    IdCollision { attempts: u32 },
}

/// Invalid environment configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid {key} value {value:?}: {reason}")]
    Invalid {
        key: &'static str,
        value: String,
        reason: String,
    },
}
