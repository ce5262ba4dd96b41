//! Store path layout and submission index key derivation.
//!
//! The index key for a `(reg_id, problem_id)` pair is `"{reg_id}_{problem_id}"`
//! with every character outside `[A-Za-z0-9_]` replaced by `_`. All callers
//! for the same pair must land on the same key, so the derivation is pure.
//!
//! The mapping is lossy: `("R-1", "P1")` and `("R_1", "P1")` share a key, as
//! do pairs whose concatenation is ambiguous (`("A_B", "C")` vs
//! `("A", "B_C")`). The encoding is kept as-is so existing index entries
//! written by the browser client stay valid.

use std::fmt;

use crate::types::{REGISTRATIONS, SUBMISSIONS, SUBMISSION_INDEX};

/// Character substituted for anything that is not a path-safe word character.
pub const KEY_PLACEHOLDER: char = '_';

/// A path-safe key under `submissionIndex/`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct IndexKey(String);

impl IndexKey {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Full store path of the index entry.
    pub fn path(&self) -> String {
        format!("{SUBMISSION_INDEX}/{}", self.0)
    }
}

impl fmt::Display for IndexKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Replace every character outside `[A-Za-z0-9_]` with [`KEY_PLACEHOLDER`].
///
/// Non-ASCII characters produce one placeholder per UTF-16 code unit, which
/// is what the browser client's regex replacement yields.
pub fn sanitize_segment(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        if c.is_ascii_alphanumeric() || c == '_' {
            out.push(c);
        } else {
            for _ in 0..c.len_utf16() {
                out.push(KEY_PLACEHOLDER);
            }
        }
    }
    out
}

/// Derive the submission index key for a `(reg_id, problem_id)` pair.
pub fn index_key(reg_id: &str, problem_id: &str) -> IndexKey {
    IndexKey(sanitize_segment(&format!("{reg_id}_{problem_id}")))
}

pub fn registration_path(id: &str) -> String {
    format!("{REGISTRATIONS}/{id}")
}

pub fn submission_path(submission_id: &str) -> String {
    format!("{SUBMISSIONS}/{submission_id}")
}
