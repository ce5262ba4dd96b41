//! `contest-engine` — submission de-duplication and contest flows.
//!
//! The heart of this crate is the submission guard: at most one submission
//! may exist per `(registration, problem)` pair, no matter how many callers
//! submit at once. The only coordination point is the store's single-key
//! transaction; there are no client-side locks and no shared in-memory state
//! between flows.
//!
//! ## Architecture
//!
//! - [`guard::SubmissionGuard`] — claim and compensating release of index entries
//! - [`writer::SubmissionWriter`] — persists a claimed submission, releases on failure
//! - [`submit::SubmitFlow`] — validation → registration check → claim → write
//! - [`register::RegistrationFlow`] — registration with transactional id allocation
//! - [`lookup::Lookup`] — confirmation, "find my submission", "find my id"
//! - [`admin::AdminBoard`] — recent records and client-side search
//! - [`client::ContestClient`] — wires all of the above onto one store

pub mod error;
pub mod config;
pub mod telemetry;
pub mod deadline;
mod records;
pub mod guard;
pub mod writer;
pub mod submit;
pub mod register;
pub mod lookup;
pub mod admin;
pub mod client;

// Re-export key types for convenience
pub use error::{ConfigError, EngineError};
pub use config::ContestConfig;
pub use deadline::Deadline;
pub use guard::{Claim, GuardOutcome, ReleaseOutcome, SubmissionGuard};
pub use writer::{SubmissionWriter, WriteFailure};
pub use submit::{SubmitFlow, SubmitOutcome};
pub use register::{RegisterOutcome, RegistrationFlow};
pub use lookup::{Lookup, SubmissionQuery, SubmissionSearch, Verification};
pub use admin::{search_registrations, search_submissions, AdminBoard};
pub use client::ContestClient;
