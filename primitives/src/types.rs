//! Record shapes and constants for the contest store.
//!
//! Field names are serialized in camelCase so records stay readable by the
//! browser pages that share the same database.

use serde::{Deserialize, Serialize};

/// Root path for registration records (`registrations/<id>`).
pub const REGISTRATIONS: &str = "registrations";

/// Root path for submission records (`submissions/<submissionId>`).
pub const SUBMISSIONS: &str = "submissions";

/// Root path for submission index entries (`submissionIndex/<key>`).
pub const SUBMISSION_INDEX: &str = "submissionIndex";

/// Number of digits in a normalized phone number.
pub const PHONE_DIGITS: usize = 10;

/// Minimum length of a submission note after normalization.
pub const MIN_NOTE_LEN: usize = 7;

/// Minimum length of a registrant, college, or team name.
pub const MIN_NAME_LEN: usize = 2;

/// Maximum number of team members stored on a registration.
pub const MAX_MEMBERS: usize = 3;

/// Submission mode written alongside every submission record.
pub const SUBMISSION_MODE_URL: &str = "url";

/// Whether a registrant competes alone or as a team.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RegistrationType {
    #[default]
    Individual,
    Team,
}

impl RegistrationType {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Individual => "individual",
            Self::Team => "team",
        }
    }
}

impl std::fmt::Display for RegistrationType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A contest registration.
///
/// Created once by a registrant and never mutated. `team_name` is present
/// only for team registrations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Registration {
    pub id: String,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub college: String,
    #[serde(rename = "type")]
    pub kind: RegistrationType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub team_name: Option<String>,
    #[serde(default)]
    pub members: Vec<String>,
    #[serde(default)]
    pub note: String,
    pub created_at: String,
}

/// A solution submission.
///
/// At most one exists per `(reg_id, problem_id)` pair; the submission
/// index entry is what enforces that.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Submission {
    pub submission_id: String,
    pub reg_id: String,
    pub problem_id: String,
    #[serde(default)]
    pub lang: String,
    pub note: String,
    /// Early records stored the link as `fileURL`.
    #[serde(alias = "fileURL")]
    pub code_url: String,
    pub created_at: String,
    #[serde(default = "default_mode")]
    pub mode: String,
}

fn default_mode() -> String {
    SUBMISSION_MODE_URL.to_string()
}
