//! Verification flows: create, modify level, retract.

use veracity_crypto::{actor_digest, compose_key};
use veracity_ledger::LedgerCall;
use veracity_store::EntityStore;
use veracity_types::{
    ActorId, EntityKind, Lifecycle, RecordId, VerificationLevel, VerificationRecord, VersionHash,
};

use crate::coordinator::{ActionOutcome, DualWrite};
use crate::entity::{ActionKind, Entity};
use crate::error::{CredibilityError, InvalidStateReason};
use crate::guard::Guard;
use crate::service::CredibilityService;

type Outcome = Result<ActionOutcome<VerificationRecord>, CredibilityError>;

impl CredibilityService {
    /// Endorse one version of a record at `level`.
    pub async fn create_verification(
        &self,
        actor: &ActorId,
        record_id: &RecordId,
        version_hash: &VersionHash,
        level: VerificationLevel,
    ) -> Outcome {
        let result = self
            .create_verification_inner(actor, record_id, version_hash, level)
            .await;
        self.observe(EntityKind::Verification, ActionKind::Create, result)
    }

    async fn create_verification_inner(
        &self,
        actor: &ActorId,
        record_id: &RecordId,
        version_hash: &VersionHash,
        level: VerificationLevel,
    ) -> Outcome {
        let key = compose_key(version_hash, actor);
        let opposite = self.stores.disputes.get(&key)?;
        let existing = self.stores.verifications.get(&key)?;
        self.guard.check_create(
            record_id,
            version_hash,
            actor,
            opposite.as_ref().map(|r| &r.value.lifecycle),
            existing.as_ref().map(|r| &r.value.lifecycle),
        )?;
        self.preconditions(actor, record_id, Some(version_hash)).await?;

        let digest = actor_digest(actor);
        let next = VerificationRecord {
            version_hash: version_hash.clone(),
            record_id: record_id.clone(),
            actor_id: actor.clone(),
            actor_digest: digest,
            level,
            lifecycle: Lifecycle::pending(self.clock.now()),
        };
        let call = LedgerCall::SubmitVerification {
            record_id: record_id.clone(),
            version_hash: version_hash.clone(),
            actor: digest,
            level,
        };
        self.coordinator
            .execute(
                self.stores.verifications.as_ref(),
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

    /// Change the level of an active, confirmed verification.
    pub async fn modify_verification(
        &self,
        actor: &ActorId,
        version_hash: &VersionHash,
        level: VerificationLevel,
    ) -> Outcome {
        let result = self
            .modify_verification_inner(actor, version_hash, level)
            .await;
        self.observe(EntityKind::Verification, ActionKind::Modify, result)
    }

    async fn modify_verification_inner(
        &self,
        actor: &ActorId,
        version_hash: &VersionHash,
        level: VerificationLevel,
    ) -> Outcome {
        let key = compose_key(version_hash, actor);
        let existing = self.stores.verifications.get(&key)?;
        let current = existing.as_ref().ok_or_else(|| {
            CredibilityError::NotFound(format!("verification of {version_hash} by {actor}"))
        })?;
        let record = self
            .guard
            .resolve_record(&current.value.record_id, version_hash)?;
        self.guard.check_conflict_of_interest(&record, actor)?;
        let opposite = self.stores.disputes.get(&key)?;
        Guard::check_opposite_type(opposite.as_ref().map(|r| &r.value.lifecycle))?;
        let current = self.guard.check_mutable(existing.as_ref(), "verification")?;

        let mut next = current.value.clone();
        next.level = level;
        if !current.value.lifecycle().is_pending() && next.same_values(&current.value) {
            return Err(CredibilityError::InvalidState(InvalidStateReason::Unchanged));
        }
        self.preconditions(actor, &record.record_id, None).await?;

        let call = LedgerCall::ModifyVerificationLevel {
            record_id: record.record_id.clone(),
            version_hash: version_hash.clone(),
            actor: next.actor_digest,
            level,
        };
        self.coordinator
            .execute(
                self.stores.verifications.as_ref(),
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

    /// Withdraw an active, confirmed verification.
    pub async fn retract_verification(&self, actor: &ActorId, version_hash: &VersionHash) -> Outcome {
        let result = self.retract_verification_inner(actor, version_hash).await;
        self.observe(EntityKind::Verification, ActionKind::Retract, result)
    }

    async fn retract_verification_inner(
        &self,
        actor: &ActorId,
        version_hash: &VersionHash,
    ) -> Outcome {
        let key = compose_key(version_hash, actor);
        let existing = self.stores.verifications.get(&key)?;
        let current = self.guard.check_mutable(existing.as_ref(), "verification")?;
        let next = current.value.clone();
        self.preconditions(actor, &next.record_id, None).await?;

        let call = LedgerCall::RetractVerification {
            record_id: next.record_id.clone(),
            version_hash: version_hash.clone(),
            actor: next.actor_digest,
        };
        self.coordinator
            .execute(
                self.stores.verifications.as_ref(),
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

    /// The verification row for `(version_hash, actor)`, if any.
    pub fn get_verification(
        &self,
        actor: &ActorId,
        version_hash: &VersionHash,
    ) -> Result<Option<VerificationRecord>, CredibilityError> {
        let key = compose_key(version_hash, actor);
        Ok(self.stores.verifications.get(&key)?.map(|r| r.value))
    }
}
