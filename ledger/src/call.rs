//! Contract calls, one per logical action.
//!
//! Calls carry actor digests, never raw actor identifiers.

use serde::{Deserialize, Serialize};
use veracity_types::{
    ActorDigest, Culpability, NotesDigest, RecordId, Severity, VerificationLevel, VersionHash,
};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum LedgerCall {
    SubmitVerification {
        record_id: RecordId,
        version_hash: VersionHash,
        actor: ActorDigest,
        level: VerificationLevel,
    },
    RetractVerification {
        record_id: RecordId,
        version_hash: VersionHash,
        actor: ActorDigest,
    },
    ModifyVerificationLevel {
        record_id: RecordId,
        version_hash: VersionHash,
        actor: ActorDigest,
        level: VerificationLevel,
    },
    SubmitDispute {
        record_id: RecordId,
        version_hash: VersionHash,
        actor: ActorDigest,
        severity: Severity,
        culpability: Culpability,
        notes_digest: NotesDigest,
    },
    RetractDispute {
        record_id: RecordId,
        version_hash: VersionHash,
        actor: ActorDigest,
    },
    ModifyDispute {
        record_id: RecordId,
        version_hash: VersionHash,
        actor: ActorDigest,
        severity: Severity,
        culpability: Culpability,
        notes_digest: NotesDigest,
    },
    SubmitReaction {
        version_hash: VersionHash,
        dispute_actor: ActorDigest,
        reactor: ActorDigest,
        supports_dispute: bool,
    },
    RetractReaction {
        version_hash: VersionHash,
        dispute_actor: ActorDigest,
        reactor: ActorDigest,
    },
    ModifyReaction {
        version_hash: VersionHash,
        dispute_actor: ActorDigest,
        reactor: ActorDigest,
        supports_dispute: bool,
    },
}

impl LedgerCall {
    /// Contract method name.
    pub fn method(&self) -> &'static str {
        match self {
            Self::SubmitVerification { .. } => "submitVerification",
            Self::RetractVerification { .. } => "retractVerification",
            Self::ModifyVerificationLevel { .. } => "modifyVerificationLevel",
            Self::SubmitDispute { .. } => "submitDispute",
            Self::RetractDispute { .. } => "retractDispute",
            Self::ModifyDispute { .. } => "modifyDispute",
            Self::SubmitReaction { .. } => "submitReaction",
            Self::RetractReaction { .. } => "retractReaction",
            Self::ModifyReaction { .. } => "modifyReaction",
        }
    }

    pub fn version_hash(&self) -> &VersionHash {
        match self {
            Self::SubmitVerification { version_hash, .. }
            | Self::RetractVerification { version_hash, .. }
            | Self::ModifyVerificationLevel { version_hash, .. }
            | Self::SubmitDispute { version_hash, .. }
            | Self::RetractDispute { version_hash, .. }
            | Self::ModifyDispute { version_hash, .. }
            | Self::SubmitReaction { version_hash, .. }
            | Self::RetractReaction { version_hash, .. }
            | Self::ModifyReaction { version_hash, .. } => version_hash,
        }
    }

    /// Whether this call withdraws an earlier effect.
    pub fn is_retraction(&self) -> bool {
        matches!(
            self,
            Self::RetractVerification { .. }
                | Self::RetractDispute { .. }
                | Self::RetractReaction { .. }
        )
    }
}
