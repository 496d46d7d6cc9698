mod common;

use common::*;
use veracity_credibility::{CredibilityError, Notes};
use veracity_crypto::{CryptoError, NotesKey};
use veracity_ledger::LedgerCall;
use veracity_types::{Culpability, DisputeGrade, NotesDigest, ScoreEventType, Severity};

fn grade(severity: Severity, culpability: Culpability) -> DisputeGrade {
    DisputeGrade {
        severity,
        culpability,
    }
}

#[tokio::test]
async fn notes_are_sealed_and_only_their_digest_reaches_the_ledger() {
    let h = harness();
    let bob = actor("bob");
    let key = NotesKey::from_bytes([7; 32]);
    let text = "figure 3 was cropped from a 2019 photo";

    let outcome = h
        .service
        .create_dispute(
            &bob,
            &record(),
            &current(),
            grade(Severity::Moderate, Culpability::Preventable),
            Some(Notes { text, key: &key }),
        )
        .await
        .unwrap();

    let sealed = outcome.row.encrypted_notes.as_ref().unwrap();
    assert_ne!(sealed.ciphertext, text.as_bytes());
    assert_eq!(outcome.row.notes_digest, veracity_crypto::notes_digest(text));

    match &h.ledger.confirmed()[0].0 {
        LedgerCall::SubmitDispute { notes_digest, .. } => {
            assert_eq!(*notes_digest, outcome.row.notes_digest);
        }
        other => panic!("unexpected call {other:?}"),
    }

    let read = h.service.read_dispute_notes(&bob, &current(), &key).unwrap();
    assert_eq!(read.as_deref(), Some(text));
}

#[tokio::test]
async fn wrong_key_cannot_read_notes() {
    let h = harness();
    let bob = actor("bob");
    let key = NotesKey::from_bytes([7; 32]);
    h.service
        .create_dispute(
            &bob,
            &record(),
            &current(),
            grade(Severity::Negligible, Culpability::NoFault),
            Some(Notes {
                text: "typo in the abstract",
                key: &key,
            }),
        )
        .await
        .unwrap();

    let err = h
        .service
        .read_dispute_notes(&bob, &current(), &NotesKey::from_bytes([8; 32]))
        .unwrap_err();
    assert!(matches!(err, CredibilityError::Crypto(CryptoError::Decrypt)));
    assert_eq!(err.reason_code(), "crypto");
}

#[tokio::test]
async fn dispute_without_notes_anchors_the_zero_digest() {
    let h = harness();
    let bob = actor("bob");
    let outcome = h
        .service
        .create_dispute(
            &bob,
            &record(),
            &current(),
            grade(Severity::Major, Culpability::Unknown),
            None,
        )
        .await
        .unwrap();

    assert_eq!(outcome.row.notes_digest, NotesDigest::ZERO);
    assert!(outcome.row.encrypted_notes.is_none());
    let read = h
        .service
        .read_dispute_notes(&bob, &current(), &NotesKey::from_bytes([1; 32]))
        .unwrap();
    assert_eq!(read, None);
}

#[tokio::test]
async fn modifying_the_grade_rescores_by_the_difference() {
    let h = harness();
    let bob = actor("bob");
    h.service
        .create_dispute(
            &bob,
            &record(),
            &current(),
            grade(Severity::Major, Culpability::Intentional),
            None,
        )
        .await
        .unwrap();
    assert_eq!(h.service.score(&record()).unwrap(), 200);

    let outcome = h
        .service
        .modify_dispute(
            &bob,
            &current(),
            grade(Severity::Moderate, Culpability::Preventable),
            None,
        )
        .await
        .unwrap();
    let event = outcome.score_event.unwrap();
    assert_eq!(event.event_type, ScoreEventType::DisputeModified);
    assert_eq!(event.score_delta, 225);
    assert_eq!(h.service.score(&record()).unwrap(), 425);

    let outcome = h.service.retract_dispute(&bob, &current()).await.unwrap();
    assert_eq!(
        outcome.score_event.unwrap().event_type,
        ScoreEventType::DisputeRevoked
    );
    assert_eq!(h.service.score(&record()).unwrap(), 500);
    assert!(h.service.audit_score(&record()).unwrap().consistent);
}

#[tokio::test]
async fn modify_without_notes_keeps_the_stored_notes() {
    let h = harness();
    let bob = actor("bob");
    let key = NotesKey::from_bytes([3; 32]);
    h.service
        .create_dispute(
            &bob,
            &record(),
            &current(),
            grade(Severity::Moderate, Culpability::Reckless),
            Some(Notes {
                text: "data withheld",
                key: &key,
            }),
        )
        .await
        .unwrap();

    h.service
        .modify_dispute(
            &bob,
            &current(),
            grade(Severity::Major, Culpability::Reckless),
            None,
        )
        .await
        .unwrap();
    let read = h.service.read_dispute_notes(&bob, &current(), &key).unwrap();
    assert_eq!(read.as_deref(), Some("data withheld"));

    h.service
        .modify_dispute(
            &bob,
            &current(),
            grade(Severity::Major, Culpability::Reckless),
            Some(Notes {
                text: "data withheld, see appendix B",
                key: &key,
            }),
        )
        .await
        .unwrap();
    let read = h.service.read_dispute_notes(&bob, &current(), &key).unwrap();
    assert_eq!(read.as_deref(), Some("data withheld, see appendix B"));
}

#[tokio::test]
async fn failed_dispute_create_leaves_score_untouched() {
    let h = harness();
    let bob = actor("bob");
    h.ledger.reject_next("record frozen");

    assert!(h
        .service
        .create_dispute(
            &bob,
            &record(),
            &current(),
            grade(Severity::Major, Culpability::Intentional),
            None,
        )
        .await
        .is_err());
    assert_eq!(h.service.score(&record()).unwrap(), 500);
    assert!(h.service.score_events(&record()).unwrap().is_empty());

    let rows = h.service.disputes_for_record(&record()).unwrap();
    assert_eq!(rows.len(), 1);
    assert!(!rows[0].item.lifecycle.is_active);
}
