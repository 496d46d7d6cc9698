//! End-to-end verification flows against nullable collaborators.

mod common;

use std::time::Duration;

use common::*;
use veracity_credibility::{ConflictReason, CredibilityError, InvalidStateReason, ServiceConfig};
use veracity_ledger::LedgerError;
use veracity_types::{
    Culpability, DisputeGrade, LedgerStatus, RecordRole, ScoreEventType, Severity,
    VerificationLevel,
};

#[tokio::test]
async fn create_confirms_row_and_scores_once() {
    let h = harness();
    let alice = actor("alice");

    let outcome = h
        .service
        .create_verification(&alice, &record(), &current(), VerificationLevel::Full)
        .await
        .unwrap();

    assert_eq!(outcome.tx_ref.as_str(), "tx-1");
    assert_eq!(outcome.row.lifecycle.ledger_status, LedgerStatus::Confirmed);
    assert!(outcome.row.lifecycle.is_active);
    assert_eq!(outcome.score.as_ref().unwrap().score, 600);
    assert_eq!(
        outcome.score_event.as_ref().unwrap().event_type,
        ScoreEventType::Verification
    );

    assert_eq!(h.ledger.confirmed_methods(), vec!["submitVerification"]);
    assert_eq!(h.service.score(&record()).unwrap(), 600);
    assert!(h.service.audit_score(&record()).unwrap().consistent);
    assert_eq!(h.stats.get("confirmed"), 1);
    assert_eq!(h.preparation.setup_calls(), 1);
}

#[tokio::test]
async fn ledger_calls_carry_the_actor_digest_only() {
    let h = harness();
    let alice = actor("alice");
    h.service
        .create_verification(&alice, &record(), &current(), VerificationLevel::Content)
        .await
        .unwrap();

    let (call, _) = &h.ledger.confirmed()[0];
    match call {
        veracity_ledger::LedgerCall::SubmitVerification { actor, .. } => {
            assert_eq!(*actor, veracity_crypto::actor_digest(&alice));
        }
        other => panic!("unexpected call {other:?}"),
    }
    let encoded = format!("{call:?}");
    assert!(!encoded.contains("alice"));
}

#[tokio::test]
async fn full_verification_then_major_intentional_dispute_scores_300() {
    let h = harness();
    h.service
        .create_verification(&actor("alice"), &record(), &current(), VerificationLevel::Full)
        .await
        .unwrap();
    let outcome = h
        .service
        .create_dispute(
            &actor("bob"),
            &record(),
            &current(),
            DisputeGrade {
                severity: Severity::Major,
                culpability: Culpability::Intentional,
            },
            None,
        )
        .await
        .unwrap();

    assert_eq!(outcome.score_event.unwrap().score_delta, -300);
    assert_eq!(h.service.score(&record()).unwrap(), 300);
}

#[tokio::test]
async fn failed_create_is_compensated_and_retry_scores_exactly_once() {
    let h = harness();
    let alice = actor("alice");
    h.ledger.reject_next("out of gas");

    let err = h
        .service
        .create_verification(&alice, &record(), &current(), VerificationLevel::Content)
        .await
        .unwrap_err();
    assert!(matches!(err, CredibilityError::Ledger(LedgerError::Rejected { .. })));

    let row = h.service.get_verification(&alice, &current()).unwrap().unwrap();
    assert_eq!(row.lifecycle.ledger_status, LedgerStatus::Failed);
    assert!(!row.lifecycle.is_active);
    assert!(row.lifecycle.last_error.as_deref().unwrap().contains("out of gas"));
    assert!(h.service.score_events(&record()).unwrap().is_empty());
    assert_eq!(h.service.score(&record()).unwrap(), 500);

    h.service
        .create_verification(&alice, &record(), &current(), VerificationLevel::Content)
        .await
        .unwrap();

    let events = h.service.score_events(&record()).unwrap();
    assert_eq!(events.len(), 1);
    assert_eq!(h.store.scores.all_events(), events);
    assert_eq!(h.ledger.confirmed().len(), 1);
    assert_eq!(h.ledger.attempts().len(), 2);
    assert_eq!(h.service.score(&record()).unwrap(), 550);

    let row = h.service.get_verification(&alice, &current()).unwrap().unwrap();
    assert_eq!(row.lifecycle.ledger_status, LedgerStatus::Confirmed);
    assert_eq!(row.lifecycle.last_error, None);
    assert_eq!(h.stats.get("compensated"), 1);
    assert_eq!(h.stats.get("failed"), 1);
}

#[tokio::test]
async fn failed_modify_restores_prior_values_without_scoring() {
    let h = harness();
    let alice = actor("alice");
    h.service
        .create_verification(&alice, &record(), &current(), VerificationLevel::Content)
        .await
        .unwrap();
    let before = h.service.get_verification(&alice, &current()).unwrap().unwrap();

    h.ledger.fail_next(LedgerError::Network("connection reset".into()));
    let err = h
        .service
        .modify_verification(&alice, &current(), VerificationLevel::Full)
        .await
        .unwrap_err();
    assert_eq!(err.reason_code(), "ledger_network");

    let after = h.service.get_verification(&alice, &current()).unwrap().unwrap();
    assert_eq!(after.level, before.level);
    assert_eq!(after.lifecycle.is_active, before.lifecycle.is_active);
    assert_eq!(after.lifecycle.ledger_tx_ref, before.lifecycle.ledger_tx_ref);
    assert_eq!(after.lifecycle.ledger_status, LedgerStatus::Failed);
    assert!(after.lifecycle.last_error.is_some());
    assert_eq!(h.service.score_events(&record()).unwrap().len(), 1);
    assert_eq!(h.service.score(&record()).unwrap(), 550);

    // The compensated row can be modified again.
    let outcome = h
        .service
        .modify_verification(&alice, &current(), VerificationLevel::Full)
        .await
        .unwrap();
    let event = outcome.score_event.unwrap();
    assert_eq!(event.event_type, ScoreEventType::VerificationModified);
    assert_eq!(event.score_delta, 50);
    assert_eq!(h.service.score(&record()).unwrap(), 600);
}

#[tokio::test]
async fn failed_retract_keeps_row_active_then_retract_succeeds() {
    let h = harness();
    let alice = actor("alice");
    h.service
        .create_verification(&alice, &record(), &current(), VerificationLevel::Provenance)
        .await
        .unwrap();

    h.ledger.reject_next("paused");
    assert!(h.service.retract_verification(&alice, &current()).await.is_err());
    let row = h.service.get_verification(&alice, &current()).unwrap().unwrap();
    assert!(row.lifecycle.is_active);
    assert_eq!(row.lifecycle.ledger_status, LedgerStatus::Failed);

    let outcome = h.service.retract_verification(&alice, &current()).await.unwrap();
    assert!(!outcome.row.lifecycle.is_active);
    assert_eq!(
        outcome.score_event.unwrap().event_type,
        ScoreEventType::VerificationRevoked
    );
    assert_eq!(h.service.score(&record()).unwrap(), 500);
}

#[tokio::test]
async fn retracting_inactive_or_modifying_unchanged_is_invalid_state() {
    let h = harness();
    let alice = actor("alice");
    h.service
        .create_verification(&alice, &record(), &current(), VerificationLevel::Content)
        .await
        .unwrap();

    let err = h
        .service
        .modify_verification(&alice, &current(), VerificationLevel::Content)
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        CredibilityError::InvalidState(InvalidStateReason::Unchanged)
    ));

    h.service.retract_verification(&alice, &current()).await.unwrap();
    let err = h
        .service
        .retract_verification(&alice, &current())
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        CredibilityError::InvalidState(InvalidStateReason::Inactive)
    ));
    assert_eq!(h.ledger.confirmed().len(), 2);
    assert_eq!(h.stats.get("rejected"), 2);
}

#[tokio::test]
async fn pending_row_cannot_be_modified_but_create_retries_it() {
    let h = harness();
    let alice = actor("alice");
    h.service
        .create_verification(&alice, &record(), &current(), VerificationLevel::Content)
        .await
        .unwrap();

    let key = veracity_crypto::compose_key(&current(), &alice);
    let mut stuck = h.service.get_verification(&alice, &current()).unwrap().unwrap();
    stuck.lifecycle.ledger_status = LedgerStatus::Pending;
    stuck.lifecycle.ledger_tx_ref = None;
    h.store.verifications.force_put(&key, stuck);

    let err = h
        .service
        .modify_verification(&alice, &current(), VerificationLevel::Full)
        .await
        .unwrap_err();
    assert_eq!(err.reason_code(), "invalid_state.not_confirmed");

    h.service
        .create_verification(&alice, &record(), &current(), VerificationLevel::Content)
        .await
        .unwrap();
    assert_eq!(h.service.score_events(&record()).unwrap().len(), 1);
    assert_eq!(h.service.score(&record()).unwrap(), 550);
}

#[tokio::test]
async fn failed_score_append_leaves_row_pending_until_retried() {
    let h = harness();
    let alice = actor("alice");
    h.store.scores.fail_next_appends(1);

    let err = h
        .service
        .create_verification(&alice, &record(), &current(), VerificationLevel::Full)
        .await
        .unwrap_err();
    assert_eq!(err.reason_code(), "store");

    let row = h.service.get_verification(&alice, &current()).unwrap().unwrap();
    assert_eq!(row.lifecycle.ledger_status, LedgerStatus::Pending);
    assert_eq!(row.lifecycle.ledger_tx_ref, None);
    assert!(h.service.score_events(&record()).unwrap().is_empty());
    assert_eq!(h.service.score(&record()).unwrap(), 500);

    let outcome = h
        .service
        .create_verification(&alice, &record(), &current(), VerificationLevel::Full)
        .await
        .unwrap();
    assert_eq!(outcome.row.lifecycle.ledger_status, LedgerStatus::Confirmed);
    assert_eq!(h.service.score_events(&record()).unwrap().len(), 1);
    assert_eq!(h.service.score(&record()).unwrap(), 600);
    assert!(h.service.audit_score(&record()).unwrap().consistent);
}

#[tokio::test]
async fn abandoned_modify_is_settled_by_reissuing_it() {
    let h = harness();
    let alice = actor("alice");
    h.service
        .create_verification(&alice, &record(), &current(), VerificationLevel::Content)
        .await
        .unwrap();

    h.store.scores.fail_next_appends(1);
    let err = h
        .service
        .modify_verification(&alice, &current(), VerificationLevel::Full)
        .await
        .unwrap_err();
    assert_eq!(err.reason_code(), "store");
    let row = h.service.get_verification(&alice, &current()).unwrap().unwrap();
    assert_eq!(row.lifecycle.ledger_status, LedgerStatus::Pending);
    assert_eq!(row.level, VerificationLevel::Full);

    // Still possibly in flight.
    let err = h
        .service
        .modify_verification(&alice, &current(), VerificationLevel::Full)
        .await
        .unwrap_err();
    assert_eq!(err.reason_code(), "invalid_state.not_confirmed");
    let err = h
        .service
        .create_verification(&alice, &record(), &current(), VerificationLevel::Full)
        .await
        .unwrap_err();
    assert_eq!(err.reason_code(), "conflict.duplicate_active");

    h.clock.advance(30_000);
    let outcome = h
        .service
        .modify_verification(&alice, &current(), VerificationLevel::Full)
        .await
        .unwrap();
    assert_eq!(outcome.row.lifecycle.ledger_status, LedgerStatus::Confirmed);
    assert_eq!(
        outcome.score_event.unwrap().event_type,
        ScoreEventType::VerificationModified
    );
    assert_eq!(h.service.score_events(&record()).unwrap().len(), 2);
    assert_eq!(h.service.score(&record()).unwrap(), 600);
}

#[tokio::test]
async fn lost_confirm_write_on_retract_does_not_score_twice() {
    let h = harness();
    let alice = actor("alice");
    h.service
        .create_verification(&alice, &record(), &current(), VerificationLevel::Full)
        .await
        .unwrap();

    h.store.verifications.fail_write_after(1);
    let err = h
        .service
        .retract_verification(&alice, &current())
        .await
        .unwrap_err();
    assert_eq!(err.reason_code(), "store");
    let row = h.service.get_verification(&alice, &current()).unwrap().unwrap();
    assert_eq!(row.lifecycle.ledger_status, LedgerStatus::Pending);
    assert!(!row.lifecycle.is_active);
    assert_eq!(h.service.score_events(&record()).unwrap().len(), 2);
    assert_eq!(h.service.score(&record()).unwrap(), 500);

    let err = h
        .service
        .retract_verification(&alice, &current())
        .await
        .unwrap_err();
    assert_eq!(err.reason_code(), "invalid_state.inactive");

    h.clock.advance(30_000);
    let outcome = h.service.retract_verification(&alice, &current()).await.unwrap();
    assert_eq!(outcome.row.lifecycle.ledger_status, LedgerStatus::Confirmed);
    assert!(!outcome.row.lifecycle.is_active);
    assert!(outcome.score_event.is_none());
    assert_eq!(h.service.score_events(&record()).unwrap().len(), 2);
    assert_eq!(h.service.score(&record()).unwrap(), 500);
    assert_eq!(h.ledger.confirmed_methods().len(), 3);
}

#[tokio::test]
async fn author_and_editor_cannot_review() {
    let h = harness();
    let err = h
        .service
        .create_verification(&actor(AUTHOR), &record(), &current(), VerificationLevel::Full)
        .await
        .unwrap_err();
    assert!(matches!(err, CredibilityError::Conflict(ConflictReason::SelfReview)));

    let editor = actor("editor");
    h.roles.grant(&record(), &editor, RecordRole::Editor);
    let err = h
        .service
        .create_verification(&editor, &record(), &current(), VerificationLevel::Full)
        .await
        .unwrap_err();
    assert!(matches!(err, CredibilityError::Conflict(ConflictReason::SelfReview)));

    assert!(h.ledger.attempts().is_empty());
    assert!(h.store.verifications.is_empty());
}

#[tokio::test]
async fn reviewer_role_is_enforced_when_configured() {
    let config = ServiceConfig {
        require_reviewer_role: true,
        ..ServiceConfig::default()
    };
    let h = harness_with(config, None);
    let alice = actor("alice");

    let err = h
        .service
        .create_verification(&alice, &record(), &current(), VerificationLevel::Full)
        .await
        .unwrap_err();
    assert!(matches!(err, CredibilityError::Auth(_)));

    h.roles.grant(&record(), &alice, RecordRole::Reviewer);
    h.service
        .create_verification(&alice, &record(), &current(), VerificationLevel::Full)
        .await
        .unwrap();
}

#[tokio::test]
async fn duplicate_active_create_is_rejected() {
    let h = harness();
    let alice = actor("alice");
    h.service
        .create_verification(&alice, &record(), &current(), VerificationLevel::Content)
        .await
        .unwrap();
    let err = h
        .service
        .create_verification(&alice, &record(), &current(), VerificationLevel::Full)
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        CredibilityError::Conflict(ConflictReason::DuplicateActive)
    ));
}

#[tokio::test]
async fn verification_and_dispute_are_mutually_exclusive_per_version() {
    let h = harness();
    let alice = actor("alice");
    let grade = DisputeGrade {
        severity: Severity::Moderate,
        culpability: Culpability::Unknown,
    };
    h.service
        .create_verification(&alice, &record(), &current(), VerificationLevel::Content)
        .await
        .unwrap();

    let err = h
        .service
        .create_dispute(&alice, &record(), &current(), grade, None)
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        CredibilityError::Conflict(ConflictReason::OppositeTypeActive)
    ));

    // A different version of the same record is a different key.
    h.service
        .create_dispute(&alice, &record(), &prior(), grade, None)
        .await
        .unwrap();

    h.service.retract_verification(&alice, &current()).await.unwrap();
    h.service
        .create_dispute(&alice, &record(), &current(), grade, None)
        .await
        .unwrap();

    let err = h
        .service
        .create_verification(&alice, &record(), &current(), VerificationLevel::Full)
        .await
        .unwrap_err();
    assert_eq!(err.reason_code(), "conflict.opposite_type_active");
}

#[tokio::test]
async fn unknown_record_or_version_is_not_found() {
    let h = harness();
    let err = h
        .service
        .create_verification(
            &actor("alice"),
            &veracity_types::RecordId::new("nope"),
            &current(),
            VerificationLevel::Content,
        )
        .await
        .unwrap_err();
    assert_eq!(err.reason_code(), "not_found");

    let err = h
        .service
        .create_verification(
            &actor("alice"),
            &record(),
            &veracity_types::VersionHash::new("h-other"),
            VerificationLevel::Content,
        )
        .await
        .unwrap_err();
    assert_eq!(err.reason_code(), "not_found");
}

#[tokio::test]
async fn preconditions_fail_before_any_write() {
    let h = harness();
    let alice = actor("alice");

    h.preparation.set_not_ready("wallet not funded");
    let err = h
        .service
        .create_verification(&alice, &record(), &current(), VerificationLevel::Content)
        .await
        .unwrap_err();
    assert_eq!(
        err.to_string(),
        "actor not ready: wallet not funded".to_string()
    );
    assert!(h.store.verifications.is_empty());

    h.preparation.set_ready();
    h.ledger.unanchor(&current());
    let err = h
        .service
        .create_verification(&alice, &record(), &current(), VerificationLevel::Content)
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        CredibilityError::Ledger(LedgerError::NotAnchored { .. })
    ));
    assert!(h.store.verifications.is_empty());
    assert!(h.ledger.attempts().is_empty());
}

#[tokio::test]
async fn store_failure_at_first_write_never_reaches_the_ledger() {
    let h = harness();
    h.store.verifications.fail_next_writes(1);
    let err = h
        .service
        .create_verification(&actor("alice"), &record(), &current(), VerificationLevel::Full)
        .await
        .unwrap_err();
    assert_eq!(err.reason_code(), "store");
    assert!(h.ledger.attempts().is_empty());
}

#[tokio::test]
async fn hung_ledger_call_times_out_and_is_compensated() {
    let h = harness_with(ServiceConfig::default(), Some(Duration::from_millis(50)));
    let alice = actor("alice");
    h.ledger.hang_next();

    let err = h
        .service
        .create_verification(&alice, &record(), &current(), VerificationLevel::Full)
        .await
        .unwrap_err();
    assert_eq!(err.reason_code(), "ledger_timeout");

    let row = h.service.get_verification(&alice, &current()).unwrap().unwrap();
    assert_eq!(row.lifecycle.ledger_status, LedgerStatus::Failed);
    assert!(h.service.score_events(&record()).unwrap().is_empty());

    h.service
        .create_verification(&alice, &record(), &current(), VerificationLevel::Full)
        .await
        .unwrap();
    assert_eq!(h.service.score_events(&record()).unwrap().len(), 1);
}

#[tokio::test]
async fn reads_are_annotated_with_version_numbers() {
    let h = harness();
    h.service
        .create_verification(&actor("bob"), &record(), &prior(), VerificationLevel::Content)
        .await
        .unwrap();
    h.clock.advance(1_000);
    h.service
        .create_verification(&actor("alice"), &record(), &current(), VerificationLevel::Full)
        .await
        .unwrap();

    h.clock.advance(1_000);
    h.service
        .create_verification(&actor("carol"), &record(), &current(), VerificationLevel::Provenance)
        .await
        .unwrap();

    // Current version first, then creation time within a version.
    let rows = h.service.verifications_for_record(&record()).unwrap();
    let versions: Vec<Option<u32>> = rows.iter().map(|r| r.version).collect();
    assert_eq!(versions, vec![Some(1), Some(1), Some(2)]);
    let actors: Vec<&str> = rows.iter().map(|r| r.item.actor_id.as_str()).collect();
    assert_eq!(actors, vec!["alice", "carol", "bob"]);
}
