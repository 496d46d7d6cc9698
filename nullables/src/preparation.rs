//! Nullable actor preparation.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use veracity_ledger::{ActorAddress, ActorPreparation, LedgerError, Readiness};
use veracity_types::{ActorId, RecordId};

/// Always ready unless told otherwise; counts setup calls.
#[derive(Default)]
pub struct NullPreparation {
    not_ready: Mutex<Option<String>>,
    setups: AtomicUsize,
}

impl NullPreparation {
    pub fn new() -> Self {
        Self::default()
    }

    /// Report every record as not ready with `reason`.
    pub fn set_not_ready(&self, reason: &str) {
        *self.not_ready.lock().unwrap() = Some(reason.to_string());
    }

    pub fn set_ready(&self) {
        *self.not_ready.lock().unwrap() = None;
    }

    pub fn setup_calls(&self) -> usize {
        self.setups.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ActorPreparation for NullPreparation {
    async fn ensure_actor_ready(&self, actor: &ActorId) -> Result<ActorAddress, LedgerError> {
        self.setups.fetch_add(1, Ordering::SeqCst);
        Ok(ActorAddress::new(format!("addr:{actor}")))
    }

    async fn verify_prerequisites(&self, _record_id: &RecordId) -> Result<Readiness, LedgerError> {
        Ok(match self.not_ready.lock().unwrap().clone() {
            Some(reason) => Readiness::not_ready(reason),
            None => Readiness::ready(),
        })
    }
}
