//! The ledger client trait implemented by network adapters.

use async_trait::async_trait;
use veracity_types::{LedgerTxRef, RecordId, VersionHash};

use crate::{LedgerCall, LedgerError};

#[async_trait]
pub trait LedgerClient: Send + Sync {
    /// Submit one contract call and wait for its transaction reference.
    ///
    /// Implementations must be idempotent per identity key: resubmitting the
    /// same call after a failure never produces a second effect.
    async fn submit(&self, call: &LedgerCall) -> Result<LedgerTxRef, LedgerError>;

    /// Whether a record version hash is known to the ledger.
    async fn hash_exists(&self, version_hash: &VersionHash) -> Result<bool, LedgerError>;

    /// Make sure a record version is anchored before anything references it.
    async fn ensure_hash_anchored(
        &self,
        record_id: &RecordId,
        version_hash: &VersionHash,
    ) -> Result<(), LedgerError> {
        if self.hash_exists(version_hash).await? {
            Ok(())
        } else {
            tracing::debug!(record = %record_id, version = %version_hash, "version not anchored");
            Err(LedgerError::NotAnchored {
                version_hash: version_hash.to_string(),
            })
        }
    }
}
