use thiserror::Error;

/// Failure of a ledger call or a ledger-side precondition.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum LedgerError {
    #[error("ledger rejected {method}: {reason}")]
    Rejected { method: String, reason: String },

    #[error("ledger call {method} timed out after {after_ms}ms")]
    Timeout { method: String, after_ms: u64 },

    #[error("ledger network error: {0}")]
    Network(String),

    #[error("version {version_hash} is not anchored on the ledger")]
    NotAnchored { version_hash: String },

    #[error("actor not ready: {0}")]
    NotReady(String),
}

impl LedgerError {
    /// Stable short code, used in logs and persisted as part of `last_error`.
    pub fn code(&self) -> &'static str {
        match self {
            Self::Rejected { .. } => "ledger_rejected",
            Self::Timeout { .. } => "ledger_timeout",
            Self::Network(_) => "ledger_network",
            Self::NotAnchored { .. } => "ledger_not_anchored",
            Self::NotReady(_) => "ledger_not_ready",
        }
    }
}
