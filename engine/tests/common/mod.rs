//! Shared test helpers for integration tests.
//!
//! Provides seeded stores, form builders, and deterministic id sources
//! used across all integration test files.

#![allow(dead_code)]

use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;

use serde_json::Value;

use contest_engine::telemetry::init_tracing;
use contest_engine::{Deadline, SubmitFlow};
use contest_primitives::{
    codec, registration_path, submission_path, Registration, RegistrationForm, RegistrationType,
    Submission, SubmissionForm,
};
use contest_storeapi::MemStore;

// ── Records ──

pub fn registration(id: &str, email: &str, phone: &str) -> Registration {
    Registration {
        id: id.into(),
        name: format!("Participant {id}"),
        email: email.into(),
        phone: phone.into(),
        college: "IIT Madras".into(),
        kind: RegistrationType::Individual,
        team_name: None,
        members: Vec::new(),
        note: String::new(),
        created_at: "2026-01-01T00:00:00.000Z".into(),
    }
}

pub fn submission(id: &str, reg_id: &str, problem_id: &str, created_at: &str) -> Submission {
    Submission {
        submission_id: id.into(),
        reg_id: reg_id.into(),
        problem_id: problem_id.into(),
        lang: "rust".into(),
        note: "binary search on answer".into(),
        code_url: format!("https://example.com/{id}"),
        created_at: created_at.into(),
        mode: "url".into(),
    }
}

fn encoded<T: serde::Serialize>(record: &T) -> Value {
    codec::encode(record).unwrap()
}

// ── Stores ──

/// Empty store with tracing enabled.
pub fn empty_store() -> Arc<MemStore> {
    init_tracing();
    Arc::new(MemStore::new())
}

/// Store holding registration `R1` (asha@example.com / 9876543210).
pub fn store_with_registration() -> Arc<MemStore> {
    let store = empty_store();
    put_registration(&store, &registration("R1", "asha@example.com", "9876543210"));
    store
}

pub fn put_registration(store: &MemStore, record: &Registration) {
    store.insert(registration_path(&record.id), encoded(record));
}

pub fn put_submission(store: &MemStore, record: &Submission) {
    store.insert(submission_path(&record.submission_id), encoded(record));
}

// ── Forms ──

pub fn submission_form(reg_id: &str, problem_id: &str) -> SubmissionForm {
    SubmissionForm {
        reg_id: reg_id.into(),
        problem_id: problem_id.into(),
        lang: "rust".into(),
        note: "sliding window over prefix sums".into(),
        code_url: "https://github.com/asha/contest/blob/main/p1.rs".into(),
    }
}

pub fn individual_form() -> RegistrationForm {
    RegistrationForm {
        name: "  Asha   Rao ".into(),
        email: "Asha@Example.COM".into(),
        phone: "+91 98765 43210".into(),
        college: "IIT Madras".into(),
        kind: RegistrationType::Individual,
        team_name: "ignored".into(),
        members: vec!["ignored".into()],
        note: String::new(),
    }
}

pub fn team_form() -> RegistrationForm {
    RegistrationForm {
        kind: RegistrationType::Team,
        team_name: "Null Pointers".into(),
        members: vec![
            "Bharat".into(),
            "  ".into(),
            "Chitra".into(),
            "Dev".into(),
            "Esha".into(),
        ],
        ..individual_form()
    }
}

// ── Id sources ──

/// Returns `ids` in order, then repeats the last one.
pub fn scripted_ids(ids: &[&str]) -> impl Fn() -> String + Send + Sync + 'static {
    let ids: Vec<String> = ids.iter().map(|s| s.to_string()).collect();
    let next = AtomicU32::new(0);
    move || {
        let i = next.fetch_add(1, Ordering::SeqCst) as usize;
        ids[i.min(ids.len() - 1)].clone()
    }
}

/// Submit flow whose candidate ids are `"{reg_id}_{tag}"`.
pub fn tagged_flow(store: &Arc<MemStore>, tag: &str) -> SubmitFlow {
    let tag = tag.to_string();
    SubmitFlow::new(store.clone(), Deadline::none())
        .with_id_source(move |reg_id: &str| format!("{reg_id}_{tag}"))
}
