//! One handle that wires every flow onto a single store.

use std::sync::Arc;

use tokio_util::sync::CancellationToken;

use contest_primitives::{RegistrationForm, SubmissionForm};
use contest_storeapi::{KvStore, TimedStore};

use crate::admin::AdminBoard;
use crate::config::ContestConfig;
use crate::lookup::Lookup;
use crate::register::{RegisterOutcome, RegistrationFlow};
use crate::submit::{SubmitFlow, SubmitOutcome};

/// Contest client bound to one store.
///
/// The store is wrapped in a [`TimedStore`] so every call made through the
/// client is bounded by `config.store.call_timeout`.
#[derive(Clone)]
pub struct ContestClient {
    store: Arc<dyn KvStore>,
    config: ContestConfig,
}

impl ContestClient {
    pub fn new(store: Arc<dyn KvStore>, config: ContestConfig) -> Self {
        let store: Arc<dyn KvStore> = Arc::new(TimedStore::new(store, &config.store));
        Self { store, config }
    }

    pub fn submit_flow(&self) -> SubmitFlow {
        SubmitFlow::new(Arc::clone(&self.store), self.config.deadline)
    }

    pub fn registration_flow(&self) -> RegistrationFlow {
        RegistrationFlow::new(
            Arc::clone(&self.store),
            self.config.deadline,
            self.config.registration_id_attempts,
        )
    }

    pub fn lookup(&self) -> Lookup {
        Lookup::new(
            Arc::clone(&self.store),
            self.config.submission_scan_window,
            self.config.registration_scan_window,
        )
    }

    pub fn admin(&self) -> AdminBoard {
        AdminBoard::new(Arc::clone(&self.store), self.config.admin_recent_limit)
    }

    pub async fn submit(&self, form: &SubmissionForm, cancel: &CancellationToken) -> SubmitOutcome {
        self.submit_flow().submit(form, cancel).await
    }

    pub async fn register(&self, form: &RegistrationForm) -> RegisterOutcome {
        self.registration_flow().register(form).await
    }
}
