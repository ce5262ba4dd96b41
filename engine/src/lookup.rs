//! Read-side lookups: confirmation page, "find my submission", "find my id".
//!
//! The store has no secondary indexes, so searches by registration or by
//! contact details read a bounded window of the most recent records and
//! filter on the client. Older records outside the window are not found.

use std::fmt;
use std::sync::Arc;

use tracing::debug;

use contest_primitives::normalize::{clean_text, normalize_email, normalize_phone};
use contest_primitives::{
    registration_path, submission_path, Registration, Submission, ValidationError, PHONE_DIGITS,
    REGISTRATIONS, SUBMISSIONS,
};
use contest_storeapi::KvStore;

use crate::error::EngineError;
use crate::records::{read_record, scan_records};

/// Outcome of checking a registration id against contact details.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verification {
    Verified(Registration),
    NotFound,
    EmailMismatch,
    PhoneMismatch,
}

impl Verification {
    pub fn is_verified(&self) -> bool {
        matches!(self, Self::Verified(_))
    }
}

impl fmt::Display for Verification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Verified(record) => write!(f, "Registration {} verified.", record.id),
            Self::NotFound => f.write_str("Registration ID not found."),
            Self::EmailMismatch => f.write_str("Email does not match registration."),
            Self::PhoneMismatch => f.write_str("Phone does not match registration."),
        }
    }
}

/// "Find my submission" request, as typed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SubmissionQuery {
    pub reg_id: String,
    pub email: String,
    pub phone: String,
    /// Only return submissions for this problem.
    pub problem_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmissionSearch {
    /// Matching submissions, newest first. May be empty.
    Found(Vec<Submission>),
    /// The registration did not check out; nothing was searched.
    Unverified(Verification),
}

impl fmt::Display for SubmissionSearch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Found(subs) if subs.is_empty() => f.write_str("No submissions found."),
            Self::Found(subs) => write!(f, "Found {} submission(s).", subs.len()),
            Self::Unverified(reason) => write!(f, "{reason}"),
        }
    }
}

#[derive(Clone)]
pub struct Lookup {
    store: Arc<dyn KvStore>,
    submission_window: usize,
    registration_window: usize,
}

impl Lookup {
    pub fn new(store: Arc<dyn KvStore>, submission_window: usize, registration_window: usize) -> Self {
        Self {
            store,
            submission_window,
            registration_window,
        }
    }

    /// Confirmation page read. An empty id or a missing record is `None`.
    pub async fn get_submission_by_id(
        &self,
        submission_id: &str,
    ) -> Result<Option<Submission>, EngineError> {
        let submission_id = clean_text(submission_id);
        if submission_id.is_empty() {
            return Ok(None);
        }
        Ok(read_record(self.store.as_ref(), &submission_path(&submission_id)).await?)
    }

    /// Load `reg_id` and compare email and phone after normalization.
    pub async fn verify_registration(
        &self,
        reg_id: &str,
        email: &str,
        phone: &str,
    ) -> Result<Verification, EngineError> {
        let path = registration_path(&clean_text(reg_id));
        let Some(record) = read_record::<Registration>(self.store.as_ref(), &path).await? else {
            return Ok(Verification::NotFound);
        };
        if normalize_email(&record.email) != normalize_email(email) {
            return Ok(Verification::EmailMismatch);
        }
        if normalize_phone(&record.phone) != normalize_phone(phone) {
            return Ok(Verification::PhoneMismatch);
        }
        Ok(Verification::Verified(record))
    }

    /// Submissions for `reg_id` within the scan window, newest first.
    ///
    /// No ownership check; callers that face users go through
    /// [`find_submissions`](Self::find_submissions).
    pub async fn find_submissions_by_registration(
        &self,
        reg_id: &str,
        problem_filter: Option<&str>,
    ) -> Result<Vec<Submission>, EngineError> {
        let reg_id = clean_text(reg_id);
        let problem_filter = problem_filter.filter(|p| !p.is_empty());

        let mut subs: Vec<Submission> =
            scan_records(self.store.as_ref(), SUBMISSIONS, self.submission_window).await?;
        subs.retain(|s| {
            clean_text(&s.reg_id) == reg_id
                && problem_filter.map_or(true, |p| s.problem_id == p)
        });
        subs.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        debug!(%reg_id, found = subs.len(), "submission scan finished");
        Ok(subs)
    }

    /// Validate the query, verify the registration, then search.
    pub async fn find_submissions(
        &self,
        query: &SubmissionQuery,
    ) -> Result<SubmissionSearch, EngineError> {
        let reg_id = clean_text(&query.reg_id);
        let email = normalize_email(&query.email);
        let phone = normalize_phone(&query.phone);

        if reg_id.is_empty() {
            return Err(ValidationError::RegistrationIdRequired.into());
        }
        if email.is_empty() {
            return Err(ValidationError::EmailRequired.into());
        }
        if phone.len() != PHONE_DIGITS {
            return Err(ValidationError::InvalidPhone.into());
        }

        let verification = self.verify_registration(&reg_id, &email, &phone).await?;
        if !verification.is_verified() {
            debug!(%reg_id, %verification, "submission search refused");
            return Ok(SubmissionSearch::Unverified(verification));
        }

        let subs = self
            .find_submissions_by_registration(&reg_id, query.problem_id.as_deref())
            .await?;
        Ok(SubmissionSearch::Found(subs))
    }

    /// First registration in the scan window whose email and phone match.
    pub async fn find_registration_by_contact(
        &self,
        email: &str,
        phone: &str,
    ) -> Result<Option<Registration>, EngineError> {
        let email = normalize_email(email);
        let phone = normalize_phone(phone);
        if email.is_empty() {
            return Err(ValidationError::EmailRequired.into());
        }
        if phone.len() != PHONE_DIGITS {
            return Err(ValidationError::InvalidPhone.into());
        }

        let records: Vec<Registration> =
            scan_records(self.store.as_ref(), REGISTRATIONS, self.registration_window).await?;
        Ok(records.into_iter().find(|r| {
            normalize_email(&r.email) == email && normalize_phone(&r.phone) == phone
        }))
    }
}
