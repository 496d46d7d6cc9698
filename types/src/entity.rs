//! Store rows for verifications, disputes, and dispute reactions.
//!
//! Every row carries a [`Lifecycle`] that tracks its reconciliation with the
//! ledger. Rows are upserted by identity key; there is never more than one row
//! per key.

use crate::{
    ActorDigest, ActorId, Culpability, LedgerStatus, LedgerTxRef, NotesDigest, RecordId, Severity,
    Timestamp, VerificationLevel, VersionHash,
};
use serde::{Deserialize, Serialize};

/// Activity and ledger-reconciliation state shared by every entity row.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Lifecycle {
    pub is_active: bool,
    pub created_at: Timestamp,
    pub last_modified_at: Option<Timestamp>,
    pub ledger_status: LedgerStatus,
    /// Reference of the last ledger transaction that confirmed this row.
    pub ledger_tx_ref: Option<LedgerTxRef>,
    pub last_error: Option<String>,
}

impl Lifecycle {
    /// A freshly created, optimistically active row awaiting the ledger.
    pub fn pending(now: Timestamp) -> Self {
        Self {
            is_active: true,
            created_at: now,
            last_modified_at: None,
            ledger_status: LedgerStatus::Pending,
            ledger_tx_ref: None,
            last_error: None,
        }
    }

    pub fn is_confirmed(&self) -> bool {
        self.ledger_status == LedgerStatus::Confirmed
    }

    /// Active and confirmed: the only state that counts as a live endorsement
    /// or objection.
    pub fn is_live(&self) -> bool {
        self.is_active && self.is_confirmed()
    }

    /// Whether the ledger currently holds an active effect for this row.
    ///
    /// True for confirmed active rows and for active rows restored by a
    /// compensated modify or retract (which keep their last tx reference).
    pub fn is_anchored(&self) -> bool {
        self.is_active && self.ledger_tx_ref.is_some()
    }

    pub fn is_pending(&self) -> bool {
        self.ledger_status == LedgerStatus::Pending
    }

    /// When the row's current state was written.
    pub fn written_at(&self) -> Timestamp {
        self.last_modified_at.unwrap_or(self.created_at)
    }

    /// A pending row whose action can no longer be in flight: nothing has
    /// touched it for at least `pending_timeout_ms`.
    pub fn is_stale_pending(&self, now: Timestamp, pending_timeout_ms: u64) -> bool {
        self.is_pending() && self.written_at().elapsed_since(now) >= pending_timeout_ms
    }
}

/// An endorsement of one record version by one actor.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerificationRecord {
    pub version_hash: VersionHash,
    pub record_id: RecordId,
    pub actor_id: ActorId,
    pub actor_digest: ActorDigest,
    pub level: VerificationLevel,
    pub lifecycle: Lifecycle,
}

/// Encrypted dispute notes as stored. The key never leaves the caller.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SealedNotes {
    pub ciphertext: Vec<u8>,
    pub iv: [u8; 12],
}

/// An objection to one record version by one actor.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DisputeRecord {
    pub version_hash: VersionHash,
    pub record_id: RecordId,
    pub actor_id: ActorId,
    pub actor_digest: ActorDigest,
    pub severity: Severity,
    pub culpability: Culpability,
    pub encrypted_notes: Option<SealedNotes>,
    /// Digest of the plaintext notes; [`NotesDigest::ZERO`] when there are none.
    pub notes_digest: NotesDigest,
    pub lifecycle: Lifecycle,
}

impl DisputeRecord {
    /// The scoring-relevant part of the dispute.
    pub fn grade(&self) -> DisputeGrade {
        DisputeGrade {
            severity: self.severity,
            culpability: self.culpability,
        }
    }
}

/// Severity and culpability of a dispute, the inputs to its score penalty.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DisputeGrade {
    pub severity: Severity,
    pub culpability: Culpability,
}

/// Support for, or opposition to, one actor's dispute on a record version.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReactionRecord {
    pub version_hash: VersionHash,
    pub record_id: RecordId,
    pub dispute_actor_id: ActorId,
    pub dispute_actor_digest: ActorDigest,
    pub reactor_id: ActorId,
    pub reactor_digest: ActorDigest,
    pub supports_dispute: bool,
    pub lifecycle: Lifecycle,
}

/// Kind of entity handled by the dual-write coordinator.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EntityKind {
    Verification,
    Dispute,
    Reaction,
}

impl EntityKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Verification => "verification",
            Self::Dispute => "dispute",
            Self::Reaction => "reaction",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pending_rows_go_stale_after_the_timeout() {
        let mut lc = Lifecycle::pending(Timestamp::new(1_000));
        assert!(!lc.is_stale_pending(Timestamp::new(1_999), 1_000));
        assert!(lc.is_stale_pending(Timestamp::new(2_000), 1_000));

        lc.last_modified_at = Some(Timestamp::new(5_000));
        assert!(!lc.is_stale_pending(Timestamp::new(5_500), 1_000));

        lc.ledger_status = LedgerStatus::Confirmed;
        assert!(!lc.is_stale_pending(Timestamp::new(60_000), 1_000));
    }
}
