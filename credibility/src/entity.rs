//! What the coordinator needs to know about each entity type.

use veracity_store::StoredEntity;
use veracity_types::{
    ActorId, DisputeRecord, EntityKind, Lifecycle, ReactionRecord, RecordId, ScoreEvent,
    ScoreEventType, ScoreMetadata, VerificationRecord, VersionHash,
};

use crate::score::{dispute_transition, verification_transition};

/// The logical action being executed.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ActionKind {
    Create,
    Modify,
    Retract,
}

impl ActionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Create => "create",
            Self::Modify => "modify",
            Self::Retract => "retract",
        }
    }
}

/// A row handled by the dual-write coordinator.
pub trait Entity: StoredEntity {
    const KIND: EntityKind;

    fn lifecycle(&self) -> &Lifecycle;

    fn lifecycle_mut(&mut self) -> &mut Lifecycle;

    fn record_id(&self) -> &RecordId;

    fn version_hash(&self) -> &VersionHash;

    /// The actor who owns the row.
    fn owner(&self) -> &ActorId;

    /// Whether confirmed actions on this entity append score events.
    const SCORED: bool;

    /// Score event for the transition from the state last recorded in
    /// `history` (the owner's events on this version, in append order) to
    /// `new` (`None` meaning no active effect).
    fn score_transition(
        history: &[ScoreEvent],
        new: Option<&Self>,
    ) -> Option<(ScoreEventType, ScoreMetadata)>;

    /// Whether two rows carry the same user-visible values.
    fn same_values(&self, other: &Self) -> bool;
}

impl Entity for VerificationRecord {
    const KIND: EntityKind = EntityKind::Verification;
    const SCORED: bool = true;

    fn lifecycle(&self) -> &Lifecycle {
        &self.lifecycle
    }

    fn lifecycle_mut(&mut self) -> &mut Lifecycle {
        &mut self.lifecycle
    }

    fn record_id(&self) -> &RecordId {
        &self.record_id
    }

    fn version_hash(&self) -> &VersionHash {
        &self.version_hash
    }

    fn owner(&self) -> &ActorId {
        &self.actor_id
    }

    fn score_transition(
        history: &[ScoreEvent],
        new: Option<&Self>,
    ) -> Option<(ScoreEventType, ScoreMetadata)> {
        let recorded = history
            .iter()
            .rev()
            .find_map(|e| match e.metadata {
                ScoreMetadata::Verification { new_level, .. } => Some(new_level),
                ScoreMetadata::Dispute { .. } => None,
            })
            .flatten();
        verification_transition(recorded, new.map(|r| r.level))
    }

    fn same_values(&self, other: &Self) -> bool {
        self.level == other.level
    }
}

impl Entity for DisputeRecord {
    const KIND: EntityKind = EntityKind::Dispute;
    const SCORED: bool = true;

    fn lifecycle(&self) -> &Lifecycle {
        &self.lifecycle
    }

    fn lifecycle_mut(&mut self) -> &mut Lifecycle {
        &mut self.lifecycle
    }

    fn record_id(&self) -> &RecordId {
        &self.record_id
    }

    fn version_hash(&self) -> &VersionHash {
        &self.version_hash
    }

    fn owner(&self) -> &ActorId {
        &self.actor_id
    }

    fn score_transition(
        history: &[ScoreEvent],
        new: Option<&Self>,
    ) -> Option<(ScoreEventType, ScoreMetadata)> {
        let recorded = history
            .iter()
            .rev()
            .find_map(|e| match e.metadata {
                ScoreMetadata::Dispute { new, .. } => Some(new),
                ScoreMetadata::Verification { .. } => None,
            })
            .flatten();
        dispute_transition(recorded, new.map(|r| r.grade()))
    }

    fn same_values(&self, other: &Self) -> bool {
        self.grade() == other.grade() && self.notes_digest == other.notes_digest
    }
}

impl Entity for ReactionRecord {
    const KIND: EntityKind = EntityKind::Reaction;
    const SCORED: bool = false;

    fn lifecycle(&self) -> &Lifecycle {
        &self.lifecycle
    }

    fn lifecycle_mut(&mut self) -> &mut Lifecycle {
        &mut self.lifecycle
    }

    fn record_id(&self) -> &RecordId {
        &self.record_id
    }

    fn version_hash(&self) -> &VersionHash {
        &self.version_hash
    }

    fn owner(&self) -> &ActorId {
        &self.reactor_id
    }

    fn score_transition(
        _history: &[ScoreEvent],
        _new: Option<&Self>,
    ) -> Option<(ScoreEventType, ScoreMetadata)> {
        None
    }

    fn same_values(&self, other: &Self) -> bool {
        self.supports_dispute == other.supports_dispute
    }
}
