//! Submission writer — persists a claimed submission.
//!
//! Runs only after the guard committed. If the write fails, the claim is
//! handed back through the guard's compensating release so the user can
//! retry with a fresh candidate id.

use std::sync::Arc;

use tracing::{info, warn};

use contest_primitives::{codec, submission_path, Submission};
use contest_storeapi::{KvStore, StoreError};

use crate::guard::{Claim, ReleaseOutcome, SubmissionGuard};

/// The write failed after the slot was claimed.
#[derive(Debug, thiserror::Error)]
#[error("submission write failed: {error}")]
pub struct WriteFailure {
    #[source]
    pub error: StoreError,
    /// What the compensating release did.
    pub release: ReleaseOutcome,
}

#[derive(Clone)]
pub struct SubmissionWriter {
    store: Arc<dyn KvStore>,
    guard: SubmissionGuard,
}

impl SubmissionWriter {
    pub fn new(store: Arc<dyn KvStore>) -> Self {
        Self {
            guard: SubmissionGuard::new(Arc::clone(&store)),
            store,
        }
    }

    /// Write `record` at `submissions/<submissionId>`.
    ///
    /// `record.submission_id` must be the id held by `claim`.
    pub async fn write(&self, claim: &Claim, record: &Submission) -> Result<(), WriteFailure> {
        debug_assert_eq!(claim.submission_id(), record.submission_id);

        let path = submission_path(&record.submission_id);
        let result = match codec::encode(record) {
            Ok(value) => self.store.write(&path, value).await,
            Err(err) => Err(StoreError::from(err)),
        };

        match result {
            Ok(()) => {
                info!(
                    submission_id = %record.submission_id,
                    reg_id = %record.reg_id,
                    problem_id = %record.problem_id,
                    "submission saved"
                );
                Ok(())
            }
            Err(error) => {
                warn!(key = %claim.key(), %error, "submission write failed, releasing claim");
                let release = self
                    .guard
                    .release_if_owned(claim.key(), claim.submission_id())
                    .await;
                Err(WriteFailure { error, release })
            }
        }
    }
}
