//! `contest-primitives` — foundational types for the contest submission core.
//!
//! This crate provides the record shapes, store path layout, key derivation,
//! identifier generation, input normalization/validation, and JSON codec
//! shared by the store API and the engine.
//!
//! Nothing in here touches the network. Every function is either pure or
//! reads only the wall clock and the thread-local RNG (identifier
//! generation).

pub mod types;
pub mod error;
pub mod clock;
pub mod keys;
pub mod ids;
pub mod normalize;
pub mod form;
pub mod codec;

// Re-export commonly used types at the crate root for convenience.
pub use types::{
    Registration, RegistrationType, Submission, MAX_MEMBERS, MIN_NAME_LEN, MIN_NOTE_LEN,
    PHONE_DIGITS, REGISTRATIONS, SUBMISSIONS, SUBMISSION_INDEX,
};
pub use error::{CodecError, ValidationError};
pub use keys::{index_key, registration_path, submission_path, IndexKey};
pub use ids::{new_registration_id, new_submission_id};
pub use form::{RegistrationDraft, RegistrationForm, SubmissionDraft, SubmissionForm};
