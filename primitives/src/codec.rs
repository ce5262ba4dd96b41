//! Conversion between records and their stored JSON values.
//!
//! The store holds `serde_json::Value`s. Records are plain objects; index
//! entries are bare strings holding the owning submission id.

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

use crate::error::CodecError;

/// Encode a record for storage.
pub fn encode<T: Serialize>(record: &T) -> Result<Value, CodecError> {
    serde_json::to_value(record).map_err(CodecError::Encode)
}

/// Decode a record read from `path`. The path only feeds the error message.
pub fn decode<T: DeserializeOwned>(path: &str, value: Value) -> Result<T, CodecError> {
    serde_json::from_value(value).map_err(|source| CodecError::Decode {
        path: path.to_string(),
        source,
    })
}

/// Whether a stored value counts as empty for claim purposes.
///
/// Absent, `null`, `false`, `0`, and `""` are all empty; anything else means
/// the slot is held.
pub fn is_empty_slot(value: Option<&Value>) -> bool {
    claim_holder(value).is_none()
}

/// The holder recorded in an index entry, if the slot is held.
///
/// Index entries are strings. A non-string, non-empty value still counts as
/// held and is rendered to a string so the caller can report it.
pub fn claim_holder(value: Option<&Value>) -> Option<String> {
    match value? {
        Value::Null | Value::Bool(false) => None,
        Value::String(s) if s.is_empty() => None,
        Value::String(s) => Some(s.clone()),
        Value::Number(n) if n.as_f64() == Some(0.0) => None,
        other => Some(other.to_string()),
    }
}
