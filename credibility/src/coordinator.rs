//! Dual-write coordinator.
//!
//! One logical action moves through `Initiated -> StoreWritten` and then to
//! `LedgerConfirmed` or `LedgerFailed`:
//!
//! 1. The row is written optimistically with `pending` status through a
//!    conditional upsert against the revision the caller read.
//! 2. The ledger call is submitted.
//! 3. On success the score transition, if any, is appended to the event log
//!    and the cached score refreshed, then the row is confirmed with the
//!    returned tx reference.
//!    On failure a compensating write restores the prior values (modify,
//!    retract) or marks the new row failed with its prior activity (create),
//!    and the error is persisted in `last_error`.
//!
//! Compensation lives here once for every entity type.

use std::sync::Arc;
use std::time::Instant;

use veracity_ledger::{LedgerCall, LedgerClient, LedgerError};
use veracity_store::{EntityStore, StoreError, Versioned};
use veracity_types::{CachedScore, Clock, EntityKey, LedgerStatus, LedgerTxRef, ScoreEvent};

use crate::entity::{ActionKind, Entity};
use crate::error::{ConflictReason, CredibilityError};
use crate::observer::ActionObserver;
use crate::score::ScoreEngine;

/// Everything needed to execute one action against one identity key.
pub struct DualWrite<E> {
    pub key: EntityKey,
    pub action: ActionKind,
    /// The row as read before the guards ran; its revision is the CAS expectation.
    pub prior: Option<Versioned<E>>,
    /// The new values. The coordinator owns the lifecycle fields.
    pub next: E,
    pub call: LedgerCall,
}

/// Result of a confirmed action.
#[derive(Clone, Debug)]
pub struct ActionOutcome<E> {
    pub key: EntityKey,
    pub revision: u64,
    pub row: E,
    pub tx_ref: LedgerTxRef,
    /// The score event emitted for the transition, if it affected the score.
    pub score_event: Option<ScoreEvent>,
    pub score: Option<CachedScore>,
}

pub struct Coordinator {
    ledger: Arc<dyn LedgerClient>,
    scores: Arc<ScoreEngine>,
    clock: Arc<dyn Clock>,
    observer: Arc<dyn ActionObserver>,
}

fn store_failure(err: StoreError) -> CredibilityError {
    match err {
        StoreError::RevisionMismatch { .. } => {
            CredibilityError::Conflict(ConflictReason::ConcurrentWrite)
        }
        other => CredibilityError::Store(other),
    }
}

impl Coordinator {
    pub fn new(
        ledger: Arc<dyn LedgerClient>,
        scores: Arc<ScoreEngine>,
        clock: Arc<dyn Clock>,
        observer: Arc<dyn ActionObserver>,
    ) -> Self {
        Self {
            ledger,
            scores,
            clock,
            observer,
        }
    }

    pub async fn execute<E: Entity>(
        &self,
        store: &dyn EntityStore<E>,
        write: DualWrite<E>,
    ) -> Result<ActionOutcome<E>, CredibilityError> {
        let DualWrite {
            key,
            action,
            prior,
            mut next,
            call,
        } = write;
        let now = self.clock.now();
        let prior_lc = prior.as_ref().map(|p| p.value.lifecycle().clone());

        {
            let lc = next.lifecycle_mut();
            lc.is_active = action != ActionKind::Retract;
            lc.ledger_status = LedgerStatus::Pending;
            lc.last_error = None;
            lc.ledger_tx_ref = prior_lc.as_ref().and_then(|p| p.ledger_tx_ref.clone());
            lc.created_at = prior_lc.as_ref().map(|p| p.created_at).unwrap_or(now);
            lc.last_modified_at = prior_lc.as_ref().map(|_| now);
        }

        // Initiated -> StoreWritten
        let expected = prior.as_ref().map(|p| p.revision);
        let pending_rev = store
            .compare_and_put(&key, expected, &next)
            .map_err(store_failure)?;
        tracing::debug!(
            kind = E::KIND.as_str(),
            action = action.as_str(),
            %key,
            revision = pending_rev,
            "row written as pending"
        );

        tracing::debug!(
            method = call.method(),
            version = %call.version_hash(),
            retraction = call.is_retraction(),
            "submitting ledger call"
        );
        let started = Instant::now();
        let submitted = self.ledger.submit(&call).await;
        self.observer.ledger_call(call.method(), started.elapsed());

        match submitted {
            Ok(tx_ref) => self.confirm(store, key, action, next, pending_rev, tx_ref),
            Err(err) => Err(self.compensate(store, key, action, prior, next, pending_rev, err)),
        }
    }

    /// StoreWritten -> LedgerConfirmed
    ///
    /// The score event is appended, and the cache refreshed, before the row
    /// is marked confirmed. The transition is taken from the owner's event
    /// history, so if either write fails the row stays pending and reissuing
    /// the action appends only what is still missing.
    fn confirm<E: Entity>(
        &self,
        store: &dyn EntityStore<E>,
        key: EntityKey,
        action: ActionKind,
        mut row: E,
        pending_rev: u64,
        tx_ref: LedgerTxRef,
    ) -> Result<ActionOutcome<E>, CredibilityError> {
        {
            let lc = row.lifecycle_mut();
            lc.ledger_status = LedgerStatus::Confirmed;
            lc.ledger_tx_ref = Some(tx_ref.clone());
        }

        let score_event = if E::SCORED {
            self.append_transition(&row, &tx_ref).map_err(|e| {
                tracing::error!(
                    kind = E::KIND.as_str(),
                    record = %row.record_id(),
                    %key,
                    tx = %tx_ref,
                    error = %e,
                    "ledger confirmed but score event could not be appended; row left pending"
                );
                CredibilityError::Store(e)
            })?
        } else {
            None
        };

        // The cache is derived from the log, so a failed recompute leaves the
        // action confirmed and heals on the next one.
        let score = match &score_event {
            Some(event) => match self.scores.recompute_score(&event.record_id) {
                Ok(cached) => Some(cached),
                Err(e) => {
                    tracing::warn!(
                        record = %event.record_id,
                        error = %e,
                        "score cache not refreshed after confirmation"
                    );
                    None
                }
            },
            None => None,
        };

        let revision = store
            .compare_and_put(&key, Some(pending_rev), &row)
            .map_err(|e| {
                tracing::error!(
                    kind = E::KIND.as_str(),
                    %key,
                    tx = %tx_ref,
                    error = %e,
                    "ledger confirmed but row could not be marked confirmed; row left pending"
                );
                store_failure(e)
            })?;

        tracing::info!(
            kind = E::KIND.as_str(),
            action = action.as_str(),
            record = %row.record_id(),
            %key,
            tx = %tx_ref,
            "action confirmed"
        );

        Ok(ActionOutcome {
            key,
            revision,
            row,
            tx_ref,
            score_event,
            score,
        })
    }

    /// Append the event for moving from the owner's last recorded state to
    /// `row`, if the two differ.
    fn append_transition<E: Entity>(
        &self,
        row: &E,
        tx_ref: &LedgerTxRef,
    ) -> Result<Option<ScoreEvent>, StoreError> {
        let history = self
            .scores
            .owner_history(row.record_id(), row.version_hash(), row.owner())?;
        let now = Some(row).filter(|r| r.lifecycle().is_active);
        match E::score_transition(&history, now) {
            Some((event_type, metadata)) => self
                .scores
                .append_event(
                    row.record_id(),
                    row.version_hash(),
                    event_type,
                    metadata,
                    row.owner(),
                    Some(tx_ref.clone()),
                )
                .map(Some),
            None => Ok(None),
        }
    }

    /// StoreWritten -> LedgerFailed. Returns the error to surface to the caller.
    #[allow(clippy::too_many_arguments)]
    fn compensate<E: Entity>(
        &self,
        store: &dyn EntityStore<E>,
        key: EntityKey,
        action: ActionKind,
        prior: Option<Versioned<E>>,
        next: E,
        pending_rev: u64,
        err: LedgerError,
    ) -> CredibilityError {
        tracing::warn!(
            kind = E::KIND.as_str(),
            action = action.as_str(),
            %key,
            error = %err,
            "ledger call failed, compensating"
        );

        let prior_active = prior
            .as_ref()
            .map(|p| p.value.lifecycle().is_active)
            .unwrap_or(false);
        let mut restored = match prior {
            Some(p) if action != ActionKind::Create => p.value,
            _ => {
                let mut row = next;
                row.lifecycle_mut().is_active = prior_active;
                row
            }
        };
        {
            let lc = restored.lifecycle_mut();
            lc.ledger_status = LedgerStatus::Failed;
            lc.last_error = Some(format!("{}: {err}", err.code()));
        }

        match store.compare_and_put(&key, Some(pending_rev), &restored) {
            Ok(_) => self.observer.compensated(E::KIND),
            Err(store_err) => {
                self.observer.compensation_failed(E::KIND);
                tracing::error!(
                    kind = E::KIND.as_str(),
                    %key,
                    error = %store_err,
                    "compensating write failed; row left pending"
                );
            }
        }
        CredibilityError::Ledger(err)
    }
}
