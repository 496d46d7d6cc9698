//! Dispute flows: create, modify, retract, and reading the sealed notes.
//!
//! Free-text notes are encrypted with a caller-owned key before they reach the
//! store. The ledger only ever sees the SHA-256 digest of the plaintext.

use veracity_crypto::{
    actor_digest, compose_key, decrypt_notes, encrypt_notes, notes_digest, CryptoError, NotesKey,
};
use veracity_ledger::LedgerCall;
use veracity_store::EntityStore;
use veracity_types::{
    ActorId, DisputeGrade, DisputeRecord, EntityKind, Lifecycle, NotesDigest, RecordId,
    SealedNotes, VersionHash,
};

use crate::coordinator::{ActionOutcome, DualWrite};
use crate::entity::{ActionKind, Entity};
use crate::error::{CredibilityError, InvalidStateReason};
use crate::guard::Guard;
use crate::service::CredibilityService;

type Outcome = Result<ActionOutcome<DisputeRecord>, CredibilityError>;

/// Plaintext notes and the key to seal them with.
#[derive(Clone, Copy)]
pub struct Notes<'a> {
    pub text: &'a str,
    pub key: &'a NotesKey,
}

fn seal(notes: Notes<'_>) -> Result<(SealedNotes, NotesDigest), CryptoError> {
    let sealed = encrypt_notes(notes.text, notes.key)?;
    Ok((sealed, notes_digest(notes.text)))
}

impl CredibilityService {
    /// Object to one version of a record.
    pub async fn create_dispute(
        &self,
        actor: &ActorId,
        record_id: &RecordId,
        version_hash: &VersionHash,
        grade: DisputeGrade,
        notes: Option<Notes<'_>>,
    ) -> Outcome {
        let result = self
            .create_dispute_inner(actor, record_id, version_hash, grade, notes)
            .await;
        self.observe(EntityKind::Dispute, ActionKind::Create, result)
    }

    async fn create_dispute_inner(
        &self,
        actor: &ActorId,
        record_id: &RecordId,
        version_hash: &VersionHash,
        grade: DisputeGrade,
        notes: Option<Notes<'_>>,
    ) -> Outcome {
        let key = compose_key(version_hash, actor);
        let opposite = self.stores.verifications.get(&key)?;
        let existing = self.stores.disputes.get(&key)?;
        self.guard.check_create(
            record_id,
            version_hash,
            actor,
            opposite.as_ref().map(|r| &r.value.lifecycle),
            existing.as_ref().map(|r| &r.value.lifecycle),
        )?;
        self.preconditions(actor, record_id, Some(version_hash)).await?;

        let (encrypted_notes, digest) = match notes {
            Some(n) => {
                let (sealed, digest) = seal(n)?;
                (Some(sealed), digest)
            }
            None => (None, NotesDigest::ZERO),
        };
        let actor_ref = actor_digest(actor);
        let next = DisputeRecord {
            version_hash: version_hash.clone(),
            record_id: record_id.clone(),
            actor_id: actor.clone(),
            actor_digest: actor_ref,
            severity: grade.severity,
            culpability: grade.culpability,
            encrypted_notes,
            notes_digest: digest,
            lifecycle: Lifecycle::pending(self.clock.now()),
        };
        let call = LedgerCall::SubmitDispute {
            record_id: record_id.clone(),
            version_hash: version_hash.clone(),
            actor: actor_ref,
            severity: grade.severity,
            culpability: grade.culpability,
            notes_digest: digest,
        };
        self.coordinator
            .execute(
                self.stores.disputes.as_ref(),
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

    /// Change severity, culpability, or notes of an active, confirmed dispute.
    ///
    /// `notes: None` keeps the stored notes.
    pub async fn modify_dispute(
        &self,
        actor: &ActorId,
        version_hash: &VersionHash,
        grade: DisputeGrade,
        notes: Option<Notes<'_>>,
    ) -> Outcome {
        let result = self
            .modify_dispute_inner(actor, version_hash, grade, notes)
            .await;
        self.observe(EntityKind::Dispute, ActionKind::Modify, result)
    }

    async fn modify_dispute_inner(
        &self,
        actor: &ActorId,
        version_hash: &VersionHash,
        grade: DisputeGrade,
        notes: Option<Notes<'_>>,
    ) -> Outcome {
        let key = compose_key(version_hash, actor);
        let existing = self.stores.disputes.get(&key)?;
        let current = existing.as_ref().ok_or_else(|| {
            CredibilityError::NotFound(format!("dispute of {version_hash} by {actor}"))
        })?;
        let record = self
            .guard
            .resolve_record(&current.value.record_id, version_hash)?;
        self.guard.check_conflict_of_interest(&record, actor)?;
        let opposite = self.stores.verifications.get(&key)?;
        Guard::check_opposite_type(opposite.as_ref().map(|r| &r.value.lifecycle))?;
        let current = self.guard.check_mutable(existing.as_ref(), "dispute")?;

        let mut next = current.value.clone();
        next.severity = grade.severity;
        next.culpability = grade.culpability;
        if let Some(n) = notes {
            // Unchanged notes are not re-encrypted.
            let digest = notes_digest(n.text);
            if digest != current.value.notes_digest {
                let (sealed, digest) = seal(n)?;
                next.encrypted_notes = Some(sealed);
                next.notes_digest = digest;
            }
        }
        if !current.value.lifecycle().is_pending() && next.same_values(&current.value) {
            return Err(CredibilityError::InvalidState(InvalidStateReason::Unchanged));
        }
        self.preconditions(actor, &record.record_id, None).await?;

        let call = LedgerCall::ModifyDispute {
            record_id: record.record_id.clone(),
            version_hash: version_hash.clone(),
            actor: next.actor_digest,
            severity: next.severity,
            culpability: next.culpability,
            notes_digest: next.notes_digest,
        };
        self.coordinator
            .execute(
                self.stores.disputes.as_ref(),
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

    /// Withdraw an active, confirmed dispute.
    pub async fn retract_dispute(&self, actor: &ActorId, version_hash: &VersionHash) -> Outcome {
        let result = self.retract_dispute_inner(actor, version_hash).await;
        self.observe(EntityKind::Dispute, ActionKind::Retract, result)
    }

    async fn retract_dispute_inner(&self, actor: &ActorId, version_hash: &VersionHash) -> Outcome {
        let key = compose_key(version_hash, actor);
        let existing = self.stores.disputes.get(&key)?;
        let current = self.guard.check_mutable(existing.as_ref(), "dispute")?;
        let next = current.value.clone();
        self.preconditions(actor, &next.record_id, None).await?;

        let call = LedgerCall::RetractDispute {
            record_id: next.record_id.clone(),
            version_hash: version_hash.clone(),
            actor: next.actor_digest,
        };
        self.coordinator
            .execute(
                self.stores.disputes.as_ref(),
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

    pub fn get_dispute(
        &self,
        actor: &ActorId,
        version_hash: &VersionHash,
    ) -> Result<Option<DisputeRecord>, CredibilityError> {
        let key = compose_key(version_hash, actor);
        Ok(self.stores.disputes.get(&key)?.map(|r| r.value))
    }

    /// Decrypt a dispute's notes and check them against the anchored digest.
    pub fn read_dispute_notes(
        &self,
        actor: &ActorId,
        version_hash: &VersionHash,
        key: &NotesKey,
    ) -> Result<Option<String>, CredibilityError> {
        let dispute = self.get_dispute(actor, version_hash)?.ok_or_else(|| {
            CredibilityError::NotFound(format!("dispute of {version_hash} by {actor}"))
        })?;
        let Some(sealed) = dispute.encrypted_notes else {
            return Ok(None);
        };
        let plaintext = decrypt_notes(&sealed, key)?;
        if notes_digest(&plaintext) != dispute.notes_digest {
            return Err(CryptoError::DigestMismatch.into());
        }
        Ok(Some(plaintext))
    }
}
