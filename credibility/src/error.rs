use thiserror::Error;

use veracity_crypto::CryptoError;
use veracity_ledger::LedgerError;
use veracity_store::StoreError;

/// Why a guard rejected an action. No write has happened when one of these is returned.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
pub enum ConflictReason {
    #[error("actor cannot review a record they author or edit")]
    SelfReview,

    #[error("actor already holds an active entity of the opposite type on this version")]
    OppositeTypeActive,

    #[error("an active confirmed entity already exists for this key; modify it instead")]
    DuplicateActive,

    #[error("actor cannot react to their own dispute")]
    SelfReaction,

    #[error("dispute is not active")]
    DisputeInactive,

    #[error("row changed concurrently; reload and retry")]
    ConcurrentWrite,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
pub enum InvalidStateReason {
    #[error("entity is not confirmed on the ledger")]
    NotConfirmed,

    #[error("entity is not active")]
    Inactive,

    #[error("new values are identical to the current ones")]
    Unchanged,
}

#[derive(Debug, Error)]
pub enum CredibilityError {
    #[error("not found: {0}")]
    NotFound(String),

    #[error("conflict: {0}")]
    Conflict(ConflictReason),

    #[error("invalid state: {0}")]
    InvalidState(InvalidStateReason),

    #[error(transparent)]
    Ledger(#[from] LedgerError),

    #[error("not authorized: {0}")]
    Auth(String),

    #[error("storage error: {0}")]
    Store(#[from] StoreError),

    #[error("notes crypto error: {0}")]
    Crypto(#[from] CryptoError),
}

impl CredibilityError {
    /// Stable machine-readable code for callers.
    pub fn reason_code(&self) -> &'static str {
        match self {
            Self::NotFound(_) => "not_found",
            Self::Conflict(reason) => match reason {
                ConflictReason::SelfReview => "conflict.self_review",
                ConflictReason::OppositeTypeActive => "conflict.opposite_type_active",
                ConflictReason::DuplicateActive => "conflict.duplicate_active",
                ConflictReason::SelfReaction => "conflict.self_reaction",
                ConflictReason::DisputeInactive => "conflict.dispute_inactive",
                ConflictReason::ConcurrentWrite => "conflict.concurrent_write",
            },
            Self::InvalidState(reason) => match reason {
                InvalidStateReason::NotConfirmed => "invalid_state.not_confirmed",
                InvalidStateReason::Inactive => "invalid_state.inactive",
                InvalidStateReason::Unchanged => "invalid_state.unchanged",
            },
            Self::Ledger(err) => err.code(),
            Self::Auth(_) => "auth",
            Self::Store(_) => "store",
            Self::Crypto(_) => "crypto",
        }
    }

    /// Whether the caller can fix the request locally (no write happened).
    pub fn is_rejection(&self) -> bool {
        matches!(
            self,
            Self::NotFound(_) | Self::Conflict(_) | Self::InvalidState(_) | Self::Auth(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reason_codes_are_stable() {
        assert_eq!(
            CredibilityError::Conflict(ConflictReason::SelfReview).reason_code(),
            "conflict.self_review"
        );
        assert_eq!(
            CredibilityError::InvalidState(InvalidStateReason::Unchanged).reason_code(),
            "invalid_state.unchanged"
        );
        let timeout = CredibilityError::from(LedgerError::Timeout {
            method: "submitDispute".into(),
            after_ms: 10,
        });
        assert_eq!(timeout.reason_code(), "ledger_timeout");
        assert!(!timeout.is_rejection());
        assert!(CredibilityError::NotFound("rec".into()).is_rejection());
    }
}
