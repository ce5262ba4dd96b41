//! Raw form input and its validated, normalized drafts.
//!
//! Validation runs the checks in the order the pages report them, so the
//! first failing field is the one the user sees. A draft only exists once
//! every check passed; the engine never touches the store with anything
//! else.

use crate::error::ValidationError;
use crate::normalize::{
    clean_text, is_valid_email, is_valid_http_url, normalize_email, normalize_phone, text_len,
};
use crate::types::{
    Registration, RegistrationType, Submission, MAX_MEMBERS, MIN_NAME_LEN, MIN_NOTE_LEN,
    PHONE_DIGITS, SUBMISSION_MODE_URL,
};

// ── Submissions ──

/// Submission form as typed by the user.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SubmissionForm {
    pub reg_id: String,
    pub problem_id: String,
    pub lang: String,
    pub note: String,
    pub code_url: String,
}

/// A submission that passed validation but has no identifier yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmissionDraft {
    pub reg_id: String,
    pub problem_id: String,
    pub lang: String,
    pub note: String,
    pub code_url: String,
}

impl SubmissionForm {
    /// Normalize and validate.
    ///
    /// Order: registration id, problem id, note length, URL presence, URL
    /// shape.
    pub fn validate(&self) -> Result<SubmissionDraft, ValidationError> {
        let reg_id = clean_text(&self.reg_id);
        let problem_id = clean_text(&self.problem_id);
        let note = clean_text(&self.note);
        let code_url = clean_text(&self.code_url);

        if reg_id.is_empty() {
            return Err(ValidationError::RegistrationIdRequired);
        }
        if problem_id.is_empty() {
            return Err(ValidationError::ProblemIdRequired);
        }
        if text_len(&note) < MIN_NOTE_LEN {
            return Err(ValidationError::NoteTooShort);
        }
        if code_url.is_empty() {
            return Err(ValidationError::CodeUrlRequired);
        }
        if !is_valid_http_url(&code_url) {
            return Err(ValidationError::InvalidCodeUrl);
        }

        Ok(SubmissionDraft {
            reg_id,
            problem_id,
            lang: clean_text(&self.lang),
            note,
            code_url,
        })
    }
}

impl SubmissionDraft {
    /// Attach the identifier and creation time.
    pub fn into_record(self, submission_id: String, created_at: String) -> Submission {
        Submission {
            submission_id,
            reg_id: self.reg_id,
            problem_id: self.problem_id,
            lang: self.lang,
            note: self.note,
            code_url: self.code_url,
            created_at,
            mode: SUBMISSION_MODE_URL.to_string(),
        }
    }
}

// ── Registrations ──

/// Registration form as typed by the user.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RegistrationForm {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub college: String,
    pub kind: RegistrationType,
    pub team_name: String,
    pub members: Vec<String>,
    pub note: String,
}

/// A registration that passed validation but has no identifier yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegistrationDraft {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub college: String,
    pub kind: RegistrationType,
    pub team_name: Option<String>,
    pub members: Vec<String>,
    pub note: String,
}

impl RegistrationForm {
    /// Normalize and validate.
    ///
    /// Individual registrations drop any team name and members that were
    /// left in the form. Empty member entries are dropped and at most
    /// [`MAX_MEMBERS`] are kept.
    pub fn validate(&self) -> Result<RegistrationDraft, ValidationError> {
        let name = clean_text(&self.name);
        let email = normalize_email(&self.email);
        let phone = normalize_phone(&self.phone);
        let college = clean_text(&self.college);
        let team_name = clean_text(&self.team_name);

        if text_len(&name) < MIN_NAME_LEN {
            return Err(ValidationError::NameTooShort);
        }
        if email.is_empty() || !is_valid_email(&email) {
            return Err(ValidationError::InvalidEmail);
        }
        if phone.len() != PHONE_DIGITS {
            return Err(ValidationError::InvalidPhone);
        }
        if text_len(&college) < MIN_NAME_LEN {
            return Err(ValidationError::CollegeRequired);
        }

        let (team_name, members) = match self.kind {
            RegistrationType::Team => {
                if text_len(&team_name) < MIN_NAME_LEN {
                    return Err(ValidationError::TeamNameRequired);
                }
                let members = self
                    .members
                    .iter()
                    .map(|m| clean_text(m))
                    .filter(|m| !m.is_empty())
                    .take(MAX_MEMBERS)
                    .collect();
                (Some(team_name), members)
            }
            RegistrationType::Individual => (None, Vec::new()),
        };

        Ok(RegistrationDraft {
            name,
            email,
            phone,
            college,
            kind: self.kind,
            team_name,
            members,
            note: clean_text(&self.note),
        })
    }
}

impl RegistrationDraft {
    pub fn into_record(self, id: String, created_at: String) -> Registration {
        Registration {
            id,
            name: self.name,
            email: self.email,
            phone: self.phone,
            college: self.college,
            kind: self.kind,
            team_name: self.team_name,
            members: self.members,
            note: self.note,
            created_at,
        }
    }
}
