//! Submit flow — validation, registration check, claim, write.
//!
//! Every call carries its own state; concurrent submits share nothing but
//! the store. The flow observes its `CancellationToken` only up to the
//! guard transaction. From then on it runs to a terminal outcome so a claim
//! is never abandoned half-way.

use std::fmt;
use std::sync::Arc;

use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use contest_primitives::clock::now_iso8601;
use contest_primitives::{
    index_key, new_submission_id, registration_path, Submission, SubmissionForm, ValidationError,
};
use contest_storeapi::KvStore;

use crate::deadline::Deadline;
use crate::error::EngineError;
use crate::guard::{GuardOutcome, SubmissionGuard};
use crate::writer::SubmissionWriter;

/// Produces a candidate submission id for a registration id.
pub type SubmissionIdSource = Arc<dyn Fn(&str) -> String + Send + Sync>;

/// Terminal state of one submit attempt.
#[derive(Debug)]
pub enum SubmitOutcome {
    Submitted(Submission),
    /// The pair already has a submission; `existing_id` is its confirmation.
    Duplicate { existing_id: String },
    RegistrationNotFound,
    Invalid(ValidationError),
    Closed,
    Failed(EngineError),
    Cancelled,
}

impl SubmitOutcome {
    /// Submission id the UI should show a confirmation page for.
    pub fn confirmation_id(&self) -> Option<&str> {
        match self {
            Self::Submitted(record) => Some(&record.submission_id),
            Self::Duplicate { existing_id } => Some(existing_id),
            _ => None,
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Self::Submitted(_))
    }
}

impl fmt::Display for SubmitOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Submitted(_) => f.write_str("Submitted successfully!"),
            Self::Duplicate { .. } => f.write_str("Duplicate: already submitted for this problem."),
            Self::RegistrationNotFound => f.write_str("Registration ID not found."),
            Self::Invalid(err) => write!(f, "{err}"),
            Self::Closed => f.write_str("Deadline passed. Submissions closed."),
            Self::Failed(_) => f.write_str("Failed to submit. Check rules/network."),
            Self::Cancelled => f.write_str("Submission cancelled."),
        }
    }
}

#[derive(Clone)]
pub struct SubmitFlow {
    store: Arc<dyn KvStore>,
    guard: SubmissionGuard,
    writer: SubmissionWriter,
    deadline: Deadline,
    ids: SubmissionIdSource,
}

impl SubmitFlow {
    pub fn new(store: Arc<dyn KvStore>, deadline: Deadline) -> Self {
        Self {
            guard: SubmissionGuard::new(Arc::clone(&store)),
            writer: SubmissionWriter::new(Arc::clone(&store)),
            store,
            deadline,
            ids: Arc::new(new_submission_id),
        }
    }

    /// Replace the candidate id generator.
    pub fn with_id_source<F>(mut self, ids: F) -> Self
    where
        F: Fn(&str) -> String + Send + Sync + 'static,
    {
        self.ids = Arc::new(ids);
        self
    }

    pub async fn submit(&self, form: &SubmissionForm, cancel: &CancellationToken) -> SubmitOutcome {
        if cancel.is_cancelled() {
            return SubmitOutcome::Cancelled;
        }
        if !self.deadline.is_open() {
            debug!("submission rejected, deadline passed");
            return SubmitOutcome::Closed;
        }

        let draft = match form.validate() {
            Ok(draft) => draft,
            Err(err) => {
                debug!(%err, "submission form rejected");
                return SubmitOutcome::Invalid(err);
            }
        };
        let reg_id = draft.reg_id.clone();
        let problem_id = draft.problem_id.clone();

        let reg_path = registration_path(&reg_id);
        let registered = tokio::select! {
            biased;
            _ = cancel.cancelled() => return SubmitOutcome::Cancelled,
            found = self.store.exists(&reg_path) => found,
        };
        match registered {
            Ok(true) => {}
            Ok(false) => {
                debug!(%reg_id, "unknown registration id");
                return SubmitOutcome::RegistrationNotFound;
            }
            Err(err) => {
                warn!(%reg_id, %err, "registration check failed");
                return SubmitOutcome::Failed(err.into());
            }
        }
        if cancel.is_cancelled() {
            return SubmitOutcome::Cancelled;
        }

        let candidate_id = (self.ids)(&reg_id);
        let claim = match self.guard.acquire(&reg_id, &problem_id, &candidate_id).await {
            Ok(GuardOutcome::Committed(claim)) => claim,
            Ok(GuardOutcome::Aborted { existing_id, .. }) => {
                info!(%reg_id, %problem_id, %existing_id, "duplicate submission");
                return SubmitOutcome::Duplicate { existing_id };
            }
            Err(EngineError::Store(err)) => {
                // Outcome unknown: the transaction may have landed.
                warn!(%reg_id, %problem_id, %err, "claim failed, releasing candidate");
                let key = index_key(&reg_id, &problem_id);
                self.guard.release_if_owned(&key, &candidate_id).await;
                return SubmitOutcome::Failed(err.into());
            }
            Err(err) => return SubmitOutcome::Failed(err),
        };

        let record = draft.into_record(candidate_id, now_iso8601());
        match self.writer.write(&claim, &record).await {
            Ok(()) => SubmitOutcome::Submitted(record),
            Err(failure) => SubmitOutcome::Failed(failure.into()),
        }
    }
}
