//! Submit flow integration tests.
//!
//! Cover the happy path, duplicates, validation that never reaches the
//! store, compensation after failed writes, and cancellation.

mod common;

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde_json::{json, Value};
use tokio_util::sync::CancellationToken;

use contest_engine::{Deadline, EngineError, ReleaseOutcome, SubmitFlow, SubmitOutcome};
use contest_primitives::ValidationError;
use contest_storeapi::{Fault, KvStore, MemStore, StoreError, StoreOp, TxOutcome, TxUpdate};

use common::*;

// ── Test: happy path and duplicates ──

#[tokio::test]
async fn test_full_submit_then_duplicate() {
    let store = store_with_registration();
    let first = tagged_flow(&store, "A")
        .submit(&submission_form("R1", "P1"), &CancellationToken::new())
        .await;
    let SubmitOutcome::Submitted(record) = &first else {
        panic!("expected submit, got {first:?}");
    };
    assert_eq!(record.submission_id, "R1_A");
    assert_eq!(record.mode, "url");

    let stored = store.get("submissions/R1_A").unwrap();
    assert_eq!(stored["regId"], "R1");
    assert_eq!(stored["codeUrl"], "https://github.com/asha/contest/blob/main/p1.rs");

    // Later attempts always land on the first submission.
    for tag in ["B", "C"] {
        let again = tagged_flow(&store, tag)
            .submit(&submission_form("R1", "P1"), &CancellationToken::new())
            .await;
        assert!(matches!(&again, SubmitOutcome::Duplicate { existing_id } if existing_id == "R1_A"));
        assert_eq!(again.to_string(), "Duplicate: already submitted for this problem.");
    }
    assert_eq!(store.children("submissions"), vec!["R1_A".to_string()]);
}

#[tokio::test]
async fn test_same_registration_other_problem_allowed() {
    let store = store_with_registration();
    let flow = tagged_flow(&store, "A");
    let cancel = CancellationToken::new();

    assert!(flow.submit(&submission_form("R1", "P1"), &cancel).await.is_success());
    let flow = tagged_flow(&store, "B");
    assert!(flow.submit(&submission_form("R1", "P2"), &cancel).await.is_success());
}

#[tokio::test]
async fn test_unknown_registration() {
    let store = store_with_registration();
    let outcome = tagged_flow(&store, "A")
        .submit(&submission_form("R9", "P1"), &CancellationToken::new())
        .await;
    assert!(matches!(outcome, SubmitOutcome::RegistrationNotFound));
    assert_eq!(outcome.to_string(), "Registration ID not found.");
    assert_eq!(store.get("submissionIndex/R9_P1"), None);
}

// ── Test: validation happens before any store call ──

#[tokio::test]
async fn test_ftp_url_rejected_without_store_call() {
    let store = store_with_registration();
    let mut form = submission_form("R1", "P1");
    form.code_url = "ftp://example.com/x".into();

    let outcome = tagged_flow(&store, "A").submit(&form, &CancellationToken::new()).await;
    assert!(matches!(outcome, SubmitOutcome::Invalid(ValidationError::InvalidCodeUrl)));
    assert_eq!(outcome.to_string(), "Please enter a valid URL (https://...)");
    assert_eq!(store.calls(), 0);
}

#[tokio::test]
async fn test_short_note_rejected_without_store_call() {
    let store = store_with_registration();
    let mut form = submission_form("R1", "P1");
    form.note = "short".into();

    let outcome = tagged_flow(&store, "A").submit(&form, &CancellationToken::new()).await;
    assert!(matches!(outcome, SubmitOutcome::Invalid(ValidationError::NoteTooShort)));
    assert_eq!(store.calls(), 0);
}

#[tokio::test]
async fn test_first_failing_field_reported() {
    let store = store_with_registration();
    let form = contest_primitives::SubmissionForm {
        reg_id: "   ".into(),
        note: "x".into(),
        ..Default::default()
    };
    let outcome = tagged_flow(&store, "A").submit(&form, &CancellationToken::new()).await;
    assert_eq!(outcome.to_string(), "Registration ID required.");
}

// ── Test: compensation ──

#[tokio::test]
async fn test_failed_write_frees_slot_for_retry() {
    let store = store_with_registration();
    store.inject(Fault::new(StoreOp::Write, "submissions/").times(1));

    let failed = tagged_flow(&store, "C")
        .submit(&submission_form("R1", "P1"), &CancellationToken::new())
        .await;
    match &failed {
        SubmitOutcome::Failed(EngineError::Write(failure)) => {
            assert!(failure.release.is_released());
        }
        other => panic!("expected write failure, got {other:?}"),
    }
    assert_eq!(failed.to_string(), "Failed to submit. Check rules/network.");
    assert_eq!(store.get("submissionIndex/R1_P1"), None);

    let retry = tagged_flow(&store, "D")
        .submit(&submission_form("R1", "P1"), &CancellationToken::new())
        .await;
    assert_eq!(retry.confirmation_id(), Some("R1_D"));
    assert!(retry.is_success());
}

#[tokio::test]
async fn test_failed_release_leaves_slot_stuck_until_cleared() {
    let store = store_with_registration();
    store.inject(Fault::new(StoreOp::Write, "submissions/").times(1));
    // First transaction (the claim) passes, the release transaction fails.
    store.inject(Fault::new(StoreOp::Transaction, "submissionIndex/").after(1).times(1));

    let failed = tagged_flow(&store, "C")
        .submit(&submission_form("R1", "P1"), &CancellationToken::new())
        .await;
    assert!(matches!(
        &failed,
        SubmitOutcome::Failed(EngineError::Write(f)) if matches!(f.release, ReleaseOutcome::Failed(_))
    ));
    assert_eq!(store.get("submissionIndex/R1_P1"), Some(json!("R1_C")));

    // The pair is blocked, and the confirmation it points at does not exist.
    let blocked = tagged_flow(&store, "D")
        .submit(&submission_form("R1", "P1"), &CancellationToken::new())
        .await;
    assert_eq!(blocked.confirmation_id(), Some("R1_C"));
    assert_eq!(store.get("submissions/R1_C"), None);

    store.remove("submissionIndex/R1_P1");
    let after_clear = tagged_flow(&store, "E")
        .submit(&submission_form("R1", "P1"), &CancellationToken::new())
        .await;
    assert!(after_clear.is_success());
}

#[tokio::test]
async fn test_claim_failure_is_reported() {
    let store = store_with_registration();
    store.inject(Fault::new(StoreOp::Transaction, "submissionIndex/").times(1));

    let outcome = tagged_flow(&store, "A")
        .submit(&submission_form("R1", "P1"), &CancellationToken::new())
        .await;
    assert!(matches!(outcome, SubmitOutcome::Failed(EngineError::Store(_))));
    assert_eq!(store.get("submissionIndex/R1_P1"), None);
    assert!(store.children("submissions").is_empty());
}

/// Applies transactions on the index but loses the first acknowledgement,
/// as a network timeout after the server committed would.
struct LostAckStore {
    inner: MemStore,
    dropped: AtomicBool,
}

#[async_trait]
impl KvStore for LostAckStore {
    async fn read(&self, path: &str) -> Result<Option<Value>, StoreError> {
        self.inner.read(path).await
    }

    async fn write(&self, path: &str, value: Value) -> Result<(), StoreError> {
        self.inner.write(path, value).await
    }

    async fn transaction(
        &self,
        path: &str,
        update: &TxUpdate<'_>,
    ) -> Result<TxOutcome, StoreError> {
        let outcome = self.inner.transaction(path, update).await?;
        if path.starts_with("submissionIndex/") && !self.dropped.swap(true, Ordering::SeqCst) {
            return Err(StoreError::Timeout(Duration::from_secs(10)));
        }
        Ok(outcome)
    }

    async fn read_last(
        &self,
        prefix: &str,
        limit: usize,
    ) -> Result<Vec<(String, Value)>, StoreError> {
        self.inner.read_last(prefix, limit).await
    }
}

#[tokio::test]
async fn test_unknown_claim_outcome_is_released() {
    let inner = MemStore::new();
    put_registration(&inner, &registration("R1", "asha@example.com", "9876543210"));
    let store = Arc::new(LostAckStore {
        inner,
        dropped: AtomicBool::new(false),
    });

    let flow = SubmitFlow::new(store.clone(), Deadline::none())
        .with_id_source(|reg_id: &str| format!("{reg_id}_X"));
    let outcome = flow
        .submit(&submission_form("R1", "P1"), &CancellationToken::new())
        .await;

    assert!(matches!(
        outcome,
        SubmitOutcome::Failed(EngineError::Store(StoreError::Timeout(_)))
    ));
    // The claim landed, but the flow released it again.
    assert_eq!(store.inner.get("submissionIndex/R1_P1"), None);

    let retry = flow
        .submit(&submission_form("R1", "P1"), &CancellationToken::new())
        .await;
    assert!(retry.is_success());
}

// ── Test: cancellation ──

#[tokio::test(start_paused = true)]
async fn test_cancel_during_registration_check() {
    let store = Arc::new(MemStore::new().with_latency(Duration::from_millis(50)));
    put_registration(&store, &registration("R1", "asha@example.com", "9876543210"));

    let cancel = CancellationToken::new();
    let trigger = cancel.clone();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(10)).await;
        trigger.cancel();
    });

    let outcome = tagged_flow(&store, "A")
        .submit(&submission_form("R1", "P1"), &cancel)
        .await;
    assert!(matches!(outcome, SubmitOutcome::Cancelled));
    assert_eq!(store.get("submissionIndex/R1_P1"), None);
}

#[tokio::test]
async fn test_closed_contest_rejects_everything() {
    let store = store_with_registration();
    let past = Deadline::parse("2026-03-10T23:59:59+05:30").unwrap();
    let outcome = SubmitFlow::new(store.clone(), past)
        .submit(&submission_form("R1", "P1"), &CancellationToken::new())
        .await;
    assert!(matches!(outcome, SubmitOutcome::Closed));
    assert_eq!(store.calls(), 0);
}
