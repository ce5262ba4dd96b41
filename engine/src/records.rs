//! Typed record reads shared by the lookup and admin views.

use serde::de::DeserializeOwned;
use tracing::warn;

use contest_primitives::codec;
use contest_storeapi::{KvStore, StoreError};

/// Point read and decode. Absent is `Ok(None)`.
pub(crate) async fn read_record<T: DeserializeOwned>(
    store: &dyn KvStore,
    path: &str,
) -> Result<Option<T>, StoreError> {
    match store.read(path).await? {
        Some(value) if !value.is_null() => Ok(Some(codec::decode(path, value)?)),
        _ => Ok(None),
    }
}

/// The last `limit` records under `prefix`, in key order.
///
/// Records that fail to decode are logged and skipped; one malformed entry
/// must not hide the rest of the window.
pub(crate) async fn scan_records<T: DeserializeOwned>(
    store: &dyn KvStore,
    prefix: &str,
    limit: usize,
) -> Result<Vec<T>, StoreError> {
    let entries = store.read_last(prefix, limit).await?;
    let records = entries
        .into_iter()
        .filter_map(|(key, value)| {
            let path = format!("{prefix}/{key}");
            match codec::decode(&path, value) {
                Ok(record) => Some(record),
                Err(err) => {
                    warn!(%err, "skipping undecodable record");
                    None
                }
            }
        })
        .collect();
    Ok(records)
}
