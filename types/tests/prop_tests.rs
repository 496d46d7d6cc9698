use proptest::prelude::*;

use veracity_types::{
    ActorDigest, Culpability, EntityKey, ScoringParams, Severity, Timestamp, VerificationLevel,
};

fn severity() -> impl Strategy<Value = Severity> {
    prop::sample::select(Severity::ALL.to_vec())
}

fn culpability() -> impl Strategy<Value = Culpability> {
    prop::sample::select(Culpability::ALL.to_vec())
}

proptest! {
    /// EntityKey::is_zero is true only for all-zero bytes.
    #[test]
    fn entity_key_is_zero_correct(bytes in prop::array::uniform32(0u8..)) {
        let key = EntityKey::new(bytes);
        prop_assert_eq!(key.is_zero(), bytes == [0u8; 32]);
    }

    /// ActorDigest bincode serialization roundtrip.
    #[test]
    fn actor_digest_bincode_roundtrip(bytes in prop::array::uniform32(0u8..)) {
        let digest = ActorDigest::new(bytes);
        let encoded = bincode::serialize(&digest).unwrap();
        let decoded: ActorDigest = bincode::deserialize(&encoded).unwrap();
        prop_assert_eq!(decoded, digest);
    }

    /// Display renders 64 lowercase hex characters.
    #[test]
    fn digest_display_is_hex(bytes in prop::array::uniform32(0u8..)) {
        let s = EntityKey::new(bytes).to_string();
        prop_assert_eq!(s.len(), 64);
        prop_assert!(s.chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));
    }

    /// Timestamp ordering: new(a) <= new(b) iff a <= b.
    #[test]
    fn timestamp_ordering(a in 0u64..u64::MAX, b in 0u64..u64::MAX) {
        prop_assert_eq!(Timestamp::new(a) <= Timestamp::new(b), a <= b);
    }

    /// Timestamp elapsed_since saturates to 0 when now < self.
    #[test]
    fn timestamp_elapsed_since_saturates(base in 1u64..1_000_000, deficit in 1u64..1_000_000) {
        let later = Timestamp::new(base + deficit);
        prop_assert_eq!(later.elapsed_since(Timestamp::new(base)), 0);
    }

    /// Dispute penalties are never negative and never exceed twice the
    /// severity penalty under default multipliers.
    #[test]
    fn dispute_penalty_bounded(sev in severity(), culp in culpability()) {
        let params = ScoringParams::default();
        let penalty = params.dispute_penalty(sev, culp);
        prop_assert!(penalty >= 0);
        prop_assert!(penalty <= 2 * params.severity_penalty(sev));
    }

    /// Clamp always lands inside the configured bounds.
    #[test]
    fn clamp_within_bounds(raw in -100_000i64..100_000) {
        let params = ScoringParams::default();
        let c = params.clamp(raw);
        prop_assert!(c >= params.min_score && c <= params.max_score);
    }
}

#[test]
fn verification_weights_increase_with_level() {
    let params = ScoringParams::default();
    let weights: Vec<i64> = VerificationLevel::ALL
        .iter()
        .map(|l| params.verification_weight(*l))
        .collect();
    assert!(weights.windows(2).all(|w| w[0] < w[1]));
}
