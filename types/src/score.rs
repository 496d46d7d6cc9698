//! Score events and the cached aggregate derived from them.

use crate::{ActorId, DisputeGrade, LedgerTxRef, RecordId, Timestamp, VerificationLevel, VersionHash};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Sequence number of a score event. Strictly increasing in append order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct EventId(u64);

impl EventId {
    pub fn new(seq: u64) -> Self {
        Self(seq)
    }

    pub fn as_u64(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for EventId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// The scoring-relevant state transition an event records.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ScoreEventType {
    Verification,
    VerificationRevoked,
    VerificationModified,
    Dispute,
    DisputeRevoked,
    DisputeModified,
}

impl ScoreEventType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Verification => "verification",
            Self::VerificationRevoked => "verification_revoked",
            Self::VerificationModified => "verification_modified",
            Self::Dispute => "dispute",
            Self::DisputeRevoked => "dispute_revoked",
            Self::DisputeModified => "dispute_modified",
        }
    }
}

impl fmt::Display for ScoreEventType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Prior and new values of the entity that produced an event.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ScoreMetadata {
    Verification {
        prior_level: Option<VerificationLevel>,
        new_level: Option<VerificationLevel>,
    },
    Dispute {
        prior: Option<DisputeGrade>,
        new: Option<DisputeGrade>,
    },
}

/// A score event before the store has assigned it a sequence number.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewScoreEvent {
    pub record_id: RecordId,
    pub version_hash: VersionHash,
    pub event_type: ScoreEventType,
    pub score_delta: i64,
    pub actor_id: ActorId,
    pub created_at: Timestamp,
    pub metadata: ScoreMetadata,
    pub ledger_tx_ref: Option<LedgerTxRef>,
}

impl NewScoreEvent {
    pub fn into_event(self, id: EventId) -> ScoreEvent {
        ScoreEvent {
            id,
            record_id: self.record_id,
            version_hash: self.version_hash,
            event_type: self.event_type,
            score_delta: self.score_delta,
            actor_id: self.actor_id,
            created_at: self.created_at,
            metadata: self.metadata,
            ledger_tx_ref: self.ledger_tx_ref,
        }
    }
}

/// One immutable, append-only score event.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreEvent {
    pub id: EventId,
    pub record_id: RecordId,
    pub version_hash: VersionHash,
    pub event_type: ScoreEventType,
    pub score_delta: i64,
    pub actor_id: ActorId,
    pub created_at: Timestamp,
    pub metadata: ScoreMetadata,
    pub ledger_tx_ref: Option<LedgerTxRef>,
}

/// Cached credibility score for a record. Always reconstructable from its events.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CachedScore {
    pub record_id: RecordId,
    pub score: i64,
    pub last_updated_at: Timestamp,
}
