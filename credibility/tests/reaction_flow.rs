mod common;

use common::*;
use veracity_credibility::{ConflictReason, CredibilityError, ToggleResult};
use veracity_store::RecordDirectory;
use veracity_types::{
    ActorId, Culpability, DisputeGrade, LedgerStatus, RecordId, RecordInfo, Severity, VersionHash,
};

async fn disputed(h: &Harness) -> ActorId {
    let bob = actor("bob");
    h.service
        .create_dispute(
            &bob,
            &record(),
            &current(),
            DisputeGrade {
                severity: Severity::Moderate,
                culpability: Culpability::Systemic,
            },
            None,
        )
        .await
        .unwrap();
    bob
}

#[tokio::test]
async fn cannot_react_to_own_dispute() {
    let h = harness();
    let bob = disputed(&h).await;
    let err = h
        .service
        .create_reaction(&bob, &current(), &bob, true)
        .await
        .unwrap_err();
    assert!(matches!(err, CredibilityError::Conflict(ConflictReason::SelfReaction)));
}

#[tokio::test]
async fn reacting_needs_an_active_dispute() {
    let h = harness();
    let carol = actor("carol");
    let err = h
        .service
        .create_reaction(&carol, &current(), &actor("bob"), true)
        .await
        .unwrap_err();
    assert_eq!(err.reason_code(), "not_found");

    let bob = disputed(&h).await;
    h.service.retract_dispute(&bob, &current()).await.unwrap();
    let err = h
        .service
        .create_reaction(&carol, &current(), &bob, true)
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        CredibilityError::Conflict(ConflictReason::DisputeInactive)
    ));
}

#[tokio::test]
async fn toggle_creates_switches_and_retracts() {
    let h = harness();
    let bob = disputed(&h).await;
    let carol = actor("carol");

    let first = h
        .service
        .toggle_reaction(&carol, &current(), &bob, true)
        .await
        .unwrap();
    assert!(matches!(first, ToggleResult::Created(_)));

    let second = h
        .service
        .toggle_reaction(&carol, &current(), &bob, false)
        .await
        .unwrap();
    assert!(matches!(second, ToggleResult::Modified(_)));
    assert!(!second.outcome().row.supports_dispute);

    let third = h
        .service
        .toggle_reaction(&carol, &current(), &bob, false)
        .await
        .unwrap();
    assert!(matches!(third, ToggleResult::Retracted(_)));
    assert!(!third.outcome().row.lifecycle.is_active);

    let fourth = h
        .service
        .toggle_reaction(&carol, &current(), &bob, true)
        .await
        .unwrap();
    assert!(matches!(fourth, ToggleResult::Created(_)));

    assert_eq!(
        h.ledger.confirmed_methods(),
        vec![
            "submitDispute",
            "submitReaction",
            "modifyReaction",
            "retractReaction",
            "submitReaction",
        ]
    );
}

#[tokio::test]
async fn stats_count_ledger_effects_and_skip_failed_creates() {
    let h = harness();
    let bob = disputed(&h).await;
    let (carol, dave, erin) = (actor("carol"), actor("dave"), actor("erin"));

    h.service
        .create_reaction(&carol, &current(), &bob, true)
        .await
        .unwrap();
    h.service
        .create_reaction(&dave, &current(), &bob, false)
        .await
        .unwrap();
    h.ledger.reject_next("nonce too low");
    assert!(h
        .service
        .create_reaction(&erin, &current(), &bob, true)
        .await
        .is_err());

    let stats = h
        .service
        .reaction_stats(&current(), &bob, Some(&carol))
        .unwrap();
    assert_eq!((stats.support, stats.oppose, stats.own), (1, 1, Some(true)));

    // A compensated modify restores the opposition the ledger still holds.
    h.ledger.reject_next("nonce too low");
    assert!(h
        .service
        .modify_reaction(&dave, &current(), &bob, true)
        .await
        .is_err());
    let row = h.service.get_reaction(&dave, &current(), &bob).unwrap().unwrap();
    assert_eq!(row.lifecycle.ledger_status, LedgerStatus::Failed);
    assert!(!row.supports_dispute);

    let stats = h.service.reaction_stats(&current(), &bob, Some(&dave)).unwrap();
    assert_eq!((stats.support, stats.oppose, stats.own), (1, 1, Some(false)));

    // The toggle sees the same reaction the counts do.
    let toggled = h
        .service
        .toggle_reaction(&dave, &current(), &bob, false)
        .await
        .unwrap();
    assert!(matches!(toggled, ToggleResult::Retracted(_)));
    let stats = h.service.reaction_stats(&current(), &bob, Some(&dave)).unwrap();
    assert_eq!((stats.support, stats.oppose, stats.own), (1, 0, None));
}

#[tokio::test]
async fn stats_stay_within_one_dispute_when_hash_and_actor_share_characters() {
    let h = harness();
    let slashed = RecordId::new("rec-slashed");
    let (short_hash, long_hash) = (VersionHash::new("h"), VersionHash::new("h/x"));
    h.store
        .records
        .put_record(&RecordInfo {
            record_id: slashed.clone(),
            author: actor(AUTHOR),
            current_hash: long_hash.clone(),
            prior_hashes: vec![short_hash.clone()],
        })
        .unwrap();
    let grade = DisputeGrade {
        severity: Severity::Negligible,
        culpability: Culpability::Unknown,
    };
    let (xbob, bob) = (actor("x/bob"), actor("bob"));
    h.service
        .create_dispute(&xbob, &slashed, &short_hash, grade, None)
        .await
        .unwrap();
    h.service
        .create_dispute(&bob, &slashed, &long_hash, grade, None)
        .await
        .unwrap();

    h.service
        .create_reaction(&actor("carol"), &long_hash, &bob, true)
        .await
        .unwrap();

    let other = h.service.reaction_stats(&short_hash, &xbob, None).unwrap();
    assert_eq!((other.support, other.oppose), (0, 0));
    let reacted = h.service.reaction_stats(&long_hash, &bob, None).unwrap();
    assert_eq!((reacted.support, reacted.oppose), (1, 0));
}

#[tokio::test]
async fn reactions_never_touch_the_score() {
    let h = harness();
    let bob = disputed(&h).await;
    let before = h.service.score_events(&record()).unwrap().len();

    let outcome = h
        .service
        .create_reaction(&actor("carol"), &current(), &bob, false)
        .await
        .unwrap();
    assert!(outcome.score_event.is_none());
    assert!(outcome.score.is_none());
    h.service
        .retract_reaction(&actor("carol"), &current(), &bob)
        .await
        .unwrap();

    assert_eq!(h.service.score_events(&record()).unwrap().len(), before);
}

#[tokio::test]
async fn reaction_can_be_withdrawn_after_the_dispute_is_retracted() {
    let h = harness();
    let bob = disputed(&h).await;
    let carol = actor("carol");
    h.service
        .create_reaction(&carol, &current(), &bob, true)
        .await
        .unwrap();
    h.service.retract_dispute(&bob, &current()).await.unwrap();

    let outcome = h
        .service
        .retract_reaction(&carol, &current(), &bob)
        .await
        .unwrap();
    assert!(!outcome.row.lifecycle.is_active);
}
