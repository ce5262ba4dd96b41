//! Identifier generation.
//!
//! Identifiers are built from the wall clock plus a little randomness. They
//! are unlikely to collide, but nothing here guarantees uniqueness: the
//! store transactions in the engine are what actually arbitrate.

use rand::Rng;

use crate::clock::now_millis;
use crate::keys::sanitize_segment;

/// Build a submission id from its parts: `"{reg_id}_{millis}_{digit}"`,
/// sanitized to `[A-Za-z0-9_]`.
pub fn submission_id_from_parts(reg_id: &str, millis: i64, digit: u8) -> String {
    sanitize_segment(&format!("{reg_id}_{millis}_{digit}"))
}

/// Generate a fresh submission id for `reg_id` using the current time and a
/// random digit.
pub fn new_submission_id(reg_id: &str) -> String {
    let digit = rand::thread_rng().gen_range(0..10u8);
    submission_id_from_parts(reg_id, now_millis(), digit)
}

/// Build a registration id from its parts: the decimal millis followed by
/// the salt, digits only.
pub fn registration_id_from_parts(millis: i64, salt: u16) -> String {
    format!("{millis}{salt}")
        .chars()
        .filter(char::is_ascii_digit)
        .collect()
}

/// Generate a fresh, digits-only registration id.
pub fn new_registration_id() -> String {
    let salt = rand::thread_rng().gen_range(0..1000u16);
    registration_id_from_parts(now_millis(), salt)
}
