//! Explicit timeout at the ledger-client boundary.
//!
//! A call that never returns is surfaced as [`LedgerError::Timeout`], which the
//! coordinator handles like any other ledger failure.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use veracity_types::{LedgerTxRef, RecordId, VersionHash};

use crate::{LedgerCall, LedgerClient, LedgerError};

pub struct TimeoutLedger {
    inner: Arc<dyn LedgerClient>,
    timeout: Duration,
}

impl TimeoutLedger {
    pub fn new(inner: Arc<dyn LedgerClient>, timeout: Duration) -> Self {
        Self { inner, timeout }
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    fn timed_out(&self, method: &str) -> LedgerError {
        tracing::warn!(method, after_ms = self.timeout.as_millis() as u64, "ledger call timed out");
        LedgerError::Timeout {
            method: method.to_string(),
            after_ms: self.timeout.as_millis() as u64,
        }
    }
}

#[async_trait]
impl LedgerClient for TimeoutLedger {
    async fn submit(&self, call: &LedgerCall) -> Result<LedgerTxRef, LedgerError> {
        match tokio::time::timeout(self.timeout, self.inner.submit(call)).await {
            Ok(result) => result,
            Err(_) => Err(self.timed_out(call.method())),
        }
    }

    async fn hash_exists(&self, version_hash: &VersionHash) -> Result<bool, LedgerError> {
        match tokio::time::timeout(self.timeout, self.inner.hash_exists(version_hash)).await {
            Ok(result) => result,
            Err(_) => Err(self.timed_out("hashExists")),
        }
    }

    async fn ensure_hash_anchored(
        &self,
        record_id: &RecordId,
        version_hash: &VersionHash,
    ) -> Result<(), LedgerError> {
        let fut = self.inner.ensure_hash_anchored(record_id, version_hash);
        match tokio::time::timeout(self.timeout, fut).await {
            Ok(result) => result,
            Err(_) => Err(self.timed_out("ensureHashAnchored")),
        }
    }
}
