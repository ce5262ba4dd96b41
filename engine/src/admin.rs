//! Admin views: the most recent registrations and submissions.

use std::sync::Arc;

use tracing::debug;

use contest_primitives::{Registration, Submission, REGISTRATIONS, SUBMISSIONS};
use contest_storeapi::KvStore;

use crate::error::EngineError;
use crate::records::scan_records;

#[derive(Clone)]
pub struct AdminBoard {
    store: Arc<dyn KvStore>,
    limit: usize,
}

impl AdminBoard {
    pub fn new(store: Arc<dyn KvStore>, limit: usize) -> Self {
        Self { store, limit }
    }

    /// Latest registrations by key order, newest `createdAt` first.
    pub async fn recent_registrations(&self) -> Result<Vec<Registration>, EngineError> {
        let mut items: Vec<Registration> =
            scan_records(self.store.as_ref(), REGISTRATIONS, self.limit).await?;
        items.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        debug!(count = items.len(), "loaded recent registrations");
        Ok(items)
    }

    /// Latest submissions by key order, newest `createdAt` first.
    pub async fn recent_submissions(&self) -> Result<Vec<Submission>, EngineError> {
        let mut items: Vec<Submission> =
            scan_records(self.store.as_ref(), SUBMISSIONS, self.limit).await?;
        items.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        debug!(count = items.len(), "loaded recent submissions");
        Ok(items)
    }
}

fn matches_any(fields: &[&str], needle: &str) -> bool {
    fields.iter().any(|f| f.to_lowercase().contains(needle))
}

/// Case-insensitive substring filter over the listed columns: id, name,
/// email, phone, college, type. An empty query keeps everything.
pub fn search_registrations<'a>(items: &'a [Registration], query: &str) -> Vec<&'a Registration> {
    let needle = query.trim().to_lowercase();
    items
        .iter()
        .filter(|r| {
            needle.is_empty()
                || matches_any(
                    &[
                        r.id.as_str(),
                        r.name.as_str(),
                        r.email.as_str(),
                        r.phone.as_str(),
                        r.college.as_str(),
                        r.kind.as_str(),
                    ],
                    &needle,
                )
        })
        .collect()
}

/// Same as [`search_registrations`] over submission id, registration id,
/// problem id and language.
pub fn search_submissions<'a>(items: &'a [Submission], query: &str) -> Vec<&'a Submission> {
    let needle = query.trim().to_lowercase();
    items
        .iter()
        .filter(|s| {
            needle.is_empty()
                || matches_any(
                    &[
                        s.submission_id.as_str(),
                        s.reg_id.as_str(),
                        s.problem_id.as_str(),
                        s.lang.as_str(),
                    ],
                    &needle,
                )
        })
        .collect()
}
