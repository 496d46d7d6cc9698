//! Mutual-exclusivity guard.
//!
//! Runs before any create or modify, in order:
//! 1. the record exists and the version hash belongs to it;
//! 2. conflict of interest: the actor is not the record's author or an editor;
//! 3. opposite type: no active row of the other entity type at the same key;
//! 4. duplicate (create only): no row at the key with a live ledger effect.
//!
//! Every failure is raised before any write.

use std::sync::Arc;
use std::time::Duration;

use veracity_ledger::RoleOracle;
use veracity_store::{RecordDirectory, Versioned};
use veracity_types::{
    ActorId, Clock, LedgerStatus, Lifecycle, RecordId, RecordInfo, RecordRole, VersionHash,
};

use crate::entity::Entity;
use crate::error::{ConflictReason, CredibilityError, InvalidStateReason};

pub struct Guard {
    records: Arc<dyn RecordDirectory>,
    roles: Arc<dyn RoleOracle>,
    clock: Arc<dyn Clock>,
    require_reviewer_role: bool,
    pending_timeout_ms: u64,
}

impl Guard {
    pub fn new(
        records: Arc<dyn RecordDirectory>,
        roles: Arc<dyn RoleOracle>,
        clock: Arc<dyn Clock>,
        require_reviewer_role: bool,
        pending_timeout: Duration,
    ) -> Self {
        Self {
            records,
            roles,
            clock,
            require_reviewer_role,
            pending_timeout_ms: u64::try_from(pending_timeout.as_millis()).unwrap_or(u64::MAX),
        }
    }

    /// Step 1: the record exists and `version_hash` is its current or a prior version.
    pub fn resolve_record(
        &self,
        record_id: &RecordId,
        version_hash: &VersionHash,
    ) -> Result<RecordInfo, CredibilityError> {
        let record = self
            .records
            .get_record(record_id)?
            .ok_or_else(|| CredibilityError::NotFound(format!("record {record_id}")))?;
        if !record.has_version(version_hash) {
            return Err(CredibilityError::NotFound(format!(
                "version {version_hash} of record {record_id}"
            )));
        }
        Ok(record)
    }

    /// Step 2: authors and editors may not review their own record.
    pub fn check_conflict_of_interest(
        &self,
        record: &RecordInfo,
        actor: &ActorId,
    ) -> Result<(), CredibilityError> {
        if &record.author == actor {
            tracing::debug!(record = %record.record_id, %actor, "rejected: actor is the author");
            return Err(CredibilityError::Conflict(ConflictReason::SelfReview));
        }
        let role = self.roles.record_role(&record.record_id, actor);
        if role.is_some_and(|r| r.is_conflicted()) {
            tracing::debug!(record = %record.record_id, %actor, ?role, "rejected: conflicted role");
            return Err(CredibilityError::Conflict(ConflictReason::SelfReview));
        }
        if self.require_reviewer_role && role != Some(RecordRole::Reviewer) {
            return Err(CredibilityError::Auth(format!(
                "{actor} does not hold the reviewer role on {}",
                record.record_id
            )));
        }
        Ok(())
    }

    /// Step 3: an active row of the opposite type at the same key blocks the action.
    pub fn check_opposite_type(opposite: Option<&Lifecycle>) -> Result<(), CredibilityError> {
        match opposite {
            Some(lc) if lc.is_active => {
                Err(CredibilityError::Conflict(ConflictReason::OppositeTypeActive))
            }
            _ => Ok(()),
        }
    }

    /// Step 4: a create may not overwrite a row whose effect is live on the ledger.
    ///
    /// Pending rows and rows left by a failed create are retryable.
    pub fn check_duplicate(existing: Option<&Lifecycle>) -> Result<(), CredibilityError> {
        match existing {
            Some(lc) if lc.is_live() || lc.is_anchored() => {
                Err(CredibilityError::Conflict(ConflictReason::DuplicateActive))
            }
            _ => Ok(()),
        }
    }

    /// Steps 1 to 4 for a create.
    pub fn check_create(
        &self,
        record_id: &RecordId,
        version_hash: &VersionHash,
        actor: &ActorId,
        opposite: Option<&Lifecycle>,
        existing: Option<&Lifecycle>,
    ) -> Result<RecordInfo, CredibilityError> {
        let record = self.resolve_record(record_id, version_hash)?;
        self.check_conflict_of_interest(&record, actor)?;
        Self::check_opposite_type(opposite)?;
        Self::check_duplicate(existing)?;
        Ok(record)
    }

    /// Modify and retract act on an active row whose last ledger effect is
    /// known: confirmed, or failed after a compensated modify or retract.
    ///
    /// A pending row older than the pending timeout is also accepted, active
    /// or not. Its reconciliation write was lost, so the action that left it
    /// there has to be reissued to settle it.
    pub fn check_mutable<'a, E: Entity>(
        &self,
        existing: Option<&'a Versioned<E>>,
        what: &str,
    ) -> Result<&'a Versioned<E>, CredibilityError> {
        let row = existing.ok_or_else(|| CredibilityError::NotFound(what.to_string()))?;
        let lc = row.value.lifecycle();
        if lc.is_stale_pending(self.clock.now(), self.pending_timeout_ms) {
            tracing::debug!(
                kind = E::KIND.as_str(),
                written_at = %lc.written_at(),
                "accepting abandoned pending row"
            );
            return Ok(row);
        }
        if !lc.is_active {
            return Err(CredibilityError::InvalidState(InvalidStateReason::Inactive));
        }
        match lc.ledger_status {
            LedgerStatus::Confirmed => Ok(row),
            LedgerStatus::Failed if lc.ledger_tx_ref.is_some() => Ok(row),
            _ => Err(CredibilityError::InvalidState(
                InvalidStateReason::NotConfirmed,
            )),
        }
    }
}
