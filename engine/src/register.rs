//! Registration flow with transactional id allocation.
//!
//! A new registration is created with a transaction on
//! `registrations/<id>` that only sets the record when the path is empty.
//! If the id is taken, a fresh one is generated and the transaction runs
//! again, up to the configured number of attempts.

use std::fmt;
use std::sync::Arc;

use tracing::{debug, info, warn};

use contest_primitives::clock::now_iso8601;
use contest_primitives::{
    codec, new_registration_id, registration_path, Registration, RegistrationForm,
    ValidationError,
};
use contest_storeapi::{KvStore, StoreError, TxDecision};

use crate::deadline::Deadline;
use crate::error::EngineError;

/// Produces a candidate registration id.
pub type RegistrationIdSource = Arc<dyn Fn() -> String + Send + Sync>;

#[derive(Debug)]
pub enum RegisterOutcome {
    Registered(Registration),
    Invalid(ValidationError),
    Closed,
    Failed(EngineError),
}

impl RegisterOutcome {
    pub fn registration_id(&self) -> Option<&str> {
        match self {
            Self::Registered(record) => Some(&record.id),
            _ => None,
        }
    }
}

impl fmt::Display for RegisterOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Registered(record) => {
                write!(f, "Registration saved. Your Registration ID: {}", record.id)
            }
            Self::Invalid(err) => write!(f, "{err}"),
            Self::Closed => f.write_str(
                "Registration is allowed, but contest deadline is over (submissions closed).",
            ),
            Self::Failed(_) => {
                f.write_str("Failed to save registration. Check database rules/network.")
            }
        }
    }
}

#[derive(Clone)]
pub struct RegistrationFlow {
    store: Arc<dyn KvStore>,
    deadline: Deadline,
    attempts: u32,
    ids: RegistrationIdSource,
}

impl RegistrationFlow {
    pub fn new(store: Arc<dyn KvStore>, deadline: Deadline, attempts: u32) -> Self {
        Self {
            store,
            deadline,
            attempts: attempts.max(1),
            ids: Arc::new(new_registration_id),
        }
    }

    /// Replace the id generator.
    pub fn with_id_source<F>(mut self, ids: F) -> Self
    where
        F: Fn() -> String + Send + Sync + 'static,
    {
        self.ids = Arc::new(ids);
        self
    }

    pub async fn register(&self, form: &RegistrationForm) -> RegisterOutcome {
        if !self.deadline.is_open() {
            debug!("registration rejected, deadline passed");
            return RegisterOutcome::Closed;
        }
        let draft = match form.validate() {
            Ok(draft) => draft,
            Err(err) => {
                debug!(%err, "registration form rejected");
                return RegisterOutcome::Invalid(err);
            }
        };

        let created_at = now_iso8601();
        for attempt in 1..=self.attempts {
            let record = draft.clone().into_record((self.ids)(), created_at.clone());
            match self.create(&record).await {
                Ok(true) => {
                    info!(reg_id = %record.id, kind = %record.kind, "registration saved");
                    return RegisterOutcome::Registered(record);
                }
                Ok(false) => {
                    debug!(reg_id = %record.id, attempt, "registration id taken, regenerating");
                }
                Err(err) => {
                    warn!(reg_id = %record.id, %err, "registration write failed");
                    return RegisterOutcome::Failed(err);
                }
            }
        }

        warn!(attempts = self.attempts, "registration ids exhausted");
        RegisterOutcome::Failed(EngineError::IdCollision {
            attempts: self.attempts,
        })
    }

    /// Set `record` at its path if nothing is there. `Ok(false)` when taken.
    async fn create(&self, record: &Registration) -> Result<bool, EngineError> {
        let path = registration_path(&record.id);
        let value = codec::encode(record).map_err(StoreError::from)?;
        let outcome = self
            .store
            .transaction(&path, &|current| match current {
                Some(existing) if !existing.is_null() => TxDecision::Abort,
                _ => TxDecision::Set(value.clone()),
            })
            .await?;
        Ok(outcome.committed)
    }
}
