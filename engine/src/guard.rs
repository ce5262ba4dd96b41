//! Submission guard — mutual exclusion over `(reg_id, problem_id)` pairs.
//!
//! The store offers no cross-key transactions, so exclusion is built from a
//! single-key compare-and-set on the pair's index entry:
//!
//! ```text
//! Unclaimed ──acquire──▶ Claimed(X) ──write ok──▶ Finalized(X)
//!                           │
//!                           └─write fails─▶ release ok ──▶ Unclaimed
//!                                        └▶ release fails ─▶ Claimed(X), stuck
//! ```
//!
//! A stuck slot blocks its pair until the entry is cleared by hand. That is
//! an accepted limitation; nothing here retries the release.

use std::sync::Arc;

use serde_json::Value;
use tracing::{debug, info, warn};

use contest_primitives::codec::{claim_holder, is_empty_slot};
use contest_primitives::{index_key, IndexKey, ValidationError};
use contest_storeapi::{KvStore, StoreError, TxDecision};

use crate::error::EngineError;

/// Exclusive ownership of one index entry, held by the caller that won it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Claim {
    key: IndexKey,
    submission_id: String,
}

impl Claim {
    pub fn key(&self) -> &IndexKey {
        &self.key
    }

    pub fn submission_id(&self) -> &str {
        &self.submission_id
    }
}

/// Result of a claim attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GuardOutcome {
    /// The slot was empty and now holds the caller's candidate id.
    Committed(Claim),
    /// The slot already held `existing_id`; nothing was changed.
    Aborted { key: IndexKey, existing_id: String },
}

impl GuardOutcome {
    pub fn is_committed(&self) -> bool {
        matches!(self, Self::Committed(_))
    }
}

/// Result of a compensating release. Never an error: failures are logged
/// and reported here for the caller's records only.
#[derive(Debug)]
pub enum ReleaseOutcome {
    /// The entry held the candidate id and was removed.
    Released,
    /// The entry holds a different id and was left alone.
    NotOwned(String),
    /// There was no entry to release.
    Absent,
    /// The release call itself failed; the slot may be stuck.
    Failed(StoreError),
}

impl ReleaseOutcome {
    pub fn is_released(&self) -> bool {
        matches!(self, Self::Released)
    }
}

#[derive(Clone)]
pub struct SubmissionGuard {
    store: Arc<dyn KvStore>,
}

impl SubmissionGuard {
    pub fn new(store: Arc<dyn KvStore>) -> Self {
        Self { store }
    }

    /// Try to claim the `(reg_id, problem_id)` slot for `candidate_id`.
    ///
    /// One transaction, no retry: an abort is final for this call. A store
    /// error means the outcome is unknown and the caller should run
    /// [`release_if_owned`](Self::release_if_owned) with the same candidate.
    pub async fn acquire(
        &self,
        reg_id: &str,
        problem_id: &str,
        candidate_id: &str,
    ) -> Result<GuardOutcome, EngineError> {
        if reg_id.is_empty() {
            return Err(ValidationError::RegistrationIdRequired.into());
        }
        if problem_id.is_empty() {
            return Err(ValidationError::ProblemIdRequired.into());
        }

        let key = index_key(reg_id, problem_id);
        let path = key.path();
        let candidate = Value::String(candidate_id.to_string());

        let outcome = self
            .store
            .transaction(&path, &|current| {
                if is_empty_slot(current) {
                    TxDecision::Set(candidate.clone())
                } else {
                    TxDecision::Abort
                }
            })
            .await?;

        if outcome.committed {
            info!(%key, submission_id = candidate_id, "submission slot claimed");
            return Ok(GuardOutcome::Committed(Claim {
                key,
                submission_id: candidate_id.to_string(),
            }));
        }

        match claim_holder(outcome.value.as_ref()) {
            Some(existing_id) => {
                debug!(%key, %existing_id, "submission slot already claimed");
                Ok(GuardOutcome::Aborted { key, existing_id })
            }
            None => Err(StoreError::rejected(path, "transaction aborted on an empty slot").into()),
        }
    }

    /// Remove the entry at `key` only if it still holds `candidate_id`.
    ///
    /// The check and the removal happen in one transaction, so an entry
    /// holding any other id is never touched.
    pub async fn release_if_owned(&self, key: &IndexKey, candidate_id: &str) -> ReleaseOutcome {
        let path = key.path();
        let result = self
            .store
            .transaction(&path, &|current| match claim_holder(current) {
                Some(holder) if holder == candidate_id => TxDecision::Remove,
                _ => TxDecision::Abort,
            })
            .await;

        let release = match result {
            Ok(outcome) if outcome.committed => ReleaseOutcome::Released,
            Ok(outcome) => match claim_holder(outcome.value.as_ref()) {
                Some(holder) => ReleaseOutcome::NotOwned(holder),
                None => ReleaseOutcome::Absent,
            },
            Err(err) => {
                warn!(%key, candidate_id, %err, "release failed, slot may stay claimed");
                return ReleaseOutcome::Failed(err);
            }
        };
        debug!(%key, candidate_id, ?release, "release finished");
        release
    }
}
