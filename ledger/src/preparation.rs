//! Actor and record preparation, performed before any write.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;
use veracity_types::{ActorId, RecordId};

/// The actor's address on the ledger network, as reported by the preparation step.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ActorAddress(String);

impl ActorAddress {
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ActorAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Outcome of a prerequisite check.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Readiness {
    pub ready: bool,
    pub reason: Option<String>,
}

impl Readiness {
    pub fn ready() -> Self {
        Self {
            ready: true,
            reason: None,
        }
    }

    pub fn not_ready(reason: impl Into<String>) -> Self {
        Self {
            ready: false,
            reason: Some(reason.into()),
        }
    }
}

#[async_trait]
pub trait ActorPreparation: Send + Sync {
    /// Idempotent setup of the actor's ledger identity.
    async fn ensure_actor_ready(&self, actor: &ActorId) -> Result<ActorAddress, crate::LedgerError>;

    async fn verify_prerequisites(&self, record_id: &RecordId)
        -> Result<Readiness, crate::LedgerError>;
}
