//! Reaction sub-ledger: support for, or opposition to, one actor's dispute.
//!
//! Same dual-write flow as verifications and disputes, keyed by
//! `(version_hash, dispute_actor, reactor)`. Reactions do not affect the
//! score, and their aggregates are computed by scanning on every read.

use serde::Serialize;
use veracity_crypto::{actor_digest, compose_key, compose_reaction_key};
use veracity_ledger::LedgerCall;
use veracity_store::{reaction_group, EntityStore, Versioned};
use veracity_types::{
    ActorId, DisputeRecord, EntityKind, Lifecycle, ReactionRecord, VersionHash,
};

use crate::coordinator::{ActionOutcome, DualWrite};
use crate::entity::{ActionKind, Entity};
use crate::error::{ConflictReason, CredibilityError, InvalidStateReason};
use crate::guard::Guard;
use crate::service::CredibilityService;

type Outcome = Result<ActionOutcome<ReactionRecord>, CredibilityError>;

/// Reaction counts for one dispute.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct ReactionStats {
    pub support: u64,
    pub oppose: u64,
    /// The viewer's own counted reaction: `Some(true)` for support.
    pub own: Option<bool>,
}

/// What a toggle turned into.
#[derive(Clone, Debug)]
pub enum ToggleResult {
    Created(ActionOutcome<ReactionRecord>),
    Modified(ActionOutcome<ReactionRecord>),
    Retracted(ActionOutcome<ReactionRecord>),
}

impl ToggleResult {
    pub fn outcome(&self) -> &ActionOutcome<ReactionRecord> {
        match self {
            Self::Created(o) | Self::Modified(o) | Self::Retracted(o) => o,
        }
    }
}

impl CredibilityService {
    /// The dispute being reacted to; it must exist and be active on the ledger.
    fn reactable_dispute(
        &self,
        reactor: &ActorId,
        version_hash: &VersionHash,
        dispute_actor: &ActorId,
    ) -> Result<Versioned<DisputeRecord>, CredibilityError> {
        if reactor == dispute_actor {
            return Err(CredibilityError::Conflict(ConflictReason::SelfReaction));
        }
        let dispute = self
            .stores
            .disputes
            .get(&compose_key(version_hash, dispute_actor))?
            .ok_or_else(|| {
                CredibilityError::NotFound(format!(
                    "dispute of {version_hash} by {dispute_actor}"
                ))
            })?;
        if !dispute.value.lifecycle.is_anchored() {
            return Err(CredibilityError::Conflict(ConflictReason::DisputeInactive));
        }
        Ok(dispute)
    }

    pub async fn create_reaction(
        &self,
        reactor: &ActorId,
        version_hash: &VersionHash,
        dispute_actor: &ActorId,
        supports_dispute: bool,
    ) -> Outcome {
        let result = self
            .create_reaction_inner(reactor, version_hash, dispute_actor, supports_dispute)
            .await;
        self.observe(EntityKind::Reaction, ActionKind::Create, result)
    }

    async fn create_reaction_inner(
        &self,
        reactor: &ActorId,
        version_hash: &VersionHash,
        dispute_actor: &ActorId,
        supports_dispute: bool,
    ) -> Outcome {
        let dispute = self.reactable_dispute(reactor, version_hash, dispute_actor)?;
        let key = compose_reaction_key(version_hash, dispute_actor, reactor);
        let existing = self.stores.reactions.get(&key)?;
        Guard::check_duplicate(existing.as_ref().map(|r| &r.value.lifecycle))?;
        let record_id = dispute.value.record_id;
        self.preconditions(reactor, &record_id, Some(version_hash)).await?;

        let reactor_ref = actor_digest(reactor);
        let next = ReactionRecord {
            version_hash: version_hash.clone(),
            record_id,
            dispute_actor_id: dispute_actor.clone(),
            dispute_actor_digest: dispute.value.actor_digest,
            reactor_id: reactor.clone(),
            reactor_digest: reactor_ref,
            supports_dispute,
            lifecycle: Lifecycle::pending(self.clock.now()),
        };
        let call = LedgerCall::SubmitReaction {
            version_hash: version_hash.clone(),
            dispute_actor: dispute.value.actor_digest,
            reactor: reactor_ref,
            supports_dispute,
        };
        self.coordinator
            .execute(
                self.stores.reactions.as_ref(),
                DualWrite {
                    key,
                    action: ActionKind::Create,
                    prior: existing,
                    next,
                    call,
                },
            )
            .await
    }

    /// Switch an active reaction between support and opposition.
    pub async fn modify_reaction(
        &self,
        reactor: &ActorId,
        version_hash: &VersionHash,
        dispute_actor: &ActorId,
        supports_dispute: bool,
    ) -> Outcome {
        let result = self
            .modify_reaction_inner(reactor, version_hash, dispute_actor, supports_dispute)
            .await;
        self.observe(EntityKind::Reaction, ActionKind::Modify, result)
    }

    async fn modify_reaction_inner(
        &self,
        reactor: &ActorId,
        version_hash: &VersionHash,
        dispute_actor: &ActorId,
        supports_dispute: bool,
    ) -> Outcome {
        self.reactable_dispute(reactor, version_hash, dispute_actor)?;
        let key = compose_reaction_key(version_hash, dispute_actor, reactor);
        let existing = self.stores.reactions.get(&key)?;
        let current = self.guard.check_mutable(existing.as_ref(), "reaction")?;

        let mut next = current.value.clone();
        next.supports_dispute = supports_dispute;
        if !current.value.lifecycle().is_pending() && next.same_values(&current.value) {
            return Err(CredibilityError::InvalidState(InvalidStateReason::Unchanged));
        }
        self.preconditions(reactor, &next.record_id, None).await?;

        let call = LedgerCall::ModifyReaction {
            version_hash: version_hash.clone(),
            dispute_actor: next.dispute_actor_digest,
            reactor: next.reactor_digest,
            supports_dispute,
        };
        self.coordinator
            .execute(
                self.stores.reactions.as_ref(),
                DualWrite {
                    key,
                    action: ActionKind::Modify,
                    prior: existing,
                    next,
                    call,
                },
            )
            .await
    }

    /// Withdraw an active reaction. Allowed even after the dispute was retracted.
    pub async fn retract_reaction(
        &self,
        reactor: &ActorId,
        version_hash: &VersionHash,
        dispute_actor: &ActorId,
    ) -> Outcome {
        let result = self
            .retract_reaction_inner(reactor, version_hash, dispute_actor)
            .await;
        self.observe(EntityKind::Reaction, ActionKind::Retract, result)
    }

    async fn retract_reaction_inner(
        &self,
        reactor: &ActorId,
        version_hash: &VersionHash,
        dispute_actor: &ActorId,
    ) -> Outcome {
        let key = compose_reaction_key(version_hash, dispute_actor, reactor);
        let existing = self.stores.reactions.get(&key)?;
        let current = self.guard.check_mutable(existing.as_ref(), "reaction")?;
        let next = current.value.clone();
        self.preconditions(reactor, &next.record_id, None).await?;

        let call = LedgerCall::RetractReaction {
            version_hash: version_hash.clone(),
            dispute_actor: next.dispute_actor_digest,
            reactor: next.reactor_digest,
        };
        self.coordinator
            .execute(
                self.stores.reactions.as_ref(),
                DualWrite {
                    key,
                    action: ActionKind::Retract,
                    prior: existing,
                    next,
                    call,
                },
            )
            .await
    }

    /// Press the support or oppose button.
    ///
    /// No active reaction creates one; the same value again retracts it; the
    /// other value modifies it.
    pub async fn toggle_reaction(
        &self,
        reactor: &ActorId,
        version_hash: &VersionHash,
        dispute_actor: &ActorId,
        supports_dispute: bool,
    ) -> Result<ToggleResult, CredibilityError> {
        let key = compose_reaction_key(version_hash, dispute_actor, reactor);
        let existing = self.stores.reactions.get(&key)?;
        match existing.map(|r| r.value) {
            Some(row) if row.lifecycle.is_anchored() => {
                if row.supports_dispute == supports_dispute {
                    self.retract_reaction(reactor, version_hash, dispute_actor)
                        .await
                        .map(ToggleResult::Retracted)
                } else {
                    self.modify_reaction(reactor, version_hash, dispute_actor, supports_dispute)
                        .await
                        .map(ToggleResult::Modified)
                }
            }
            _ => self
                .create_reaction(reactor, version_hash, dispute_actor, supports_dispute)
                .await
                .map(ToggleResult::Created),
        }
    }

    /// Count reactions to one dispute: rows whose effect is on the ledger,
    /// including ones restored by a compensated modify or retract, plus
    /// active rows still awaiting the ledger.
    pub fn reaction_stats(
        &self,
        version_hash: &VersionHash,
        dispute_actor: &ActorId,
        viewer: Option<&ActorId>,
    ) -> Result<ReactionStats, CredibilityError> {
        let group = reaction_group(version_hash.as_str(), dispute_actor.as_str());
        let mut stats = ReactionStats::default();
        for row in self.stores.reactions.list_group(&group)? {
            let r = row.value;
            let lc = &r.lifecycle;
            if !(lc.is_anchored() || (lc.is_active && lc.is_pending())) {
                continue;
            }
            if r.supports_dispute {
                stats.support += 1;
            } else {
                stats.oppose += 1;
            }
            if viewer == Some(&r.reactor_id) {
                stats.own = Some(r.supports_dispute);
            }
        }
        Ok(stats)
    }

    pub fn get_reaction(
        &self,
        reactor: &ActorId,
        version_hash: &VersionHash,
        dispute_actor: &ActorId,
    ) -> Result<Option<ReactionRecord>, CredibilityError> {
        let key = compose_reaction_key(version_hash, dispute_actor, reactor);
        Ok(self.stores.reactions.get(&key)?.map(|r| r.value))
    }
}
