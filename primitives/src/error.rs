//! Error types for the contest primitives.
//!
//! `ValidationError` variants render as the exact messages shown to the
//! user, so a UI can display `err.to_string()` directly.

/// Rejected form input. Raised before any store call is made.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("Registration ID required.")]
    RegistrationIdRequired,

    #[error("Problem ID required.")]
    ProblemIdRequired,

    #[error("Notes must be at least 7 characters.")]
    NoteTooShort,

    #[error("Code URL required.")]
    CodeUrlRequired,

    #[error("Please enter a valid URL (https://...)")]
    InvalidCodeUrl,

    #[error("Name is too short.")]
    NameTooShort,

    #[error("Email required.")]
    EmailRequired,

    #[error("Email is invalid.")]
    InvalidEmail,

    #[error("Phone must be 10 digits.")]
    InvalidPhone,

    #[error("College/Institute is required.")]
    CollegeRequired,

    #[error("Team name is required for Team type.")]
    TeamNameRequired,
}

/// A record could not be converted to or from its stored JSON form.
#[derive(Debug, thiserror::Error)]
pub enum CodecError {
    #[error("failed to encode record: {0}")]
    Encode(#[source] serde_json::Error),

    #[error("failed to decode record at {path}: {source}")]
    Decode {
        path: String,
        #[source]
        source: serde_json::Error,
    },
}
