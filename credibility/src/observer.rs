//! Hooks for counting action outcomes.

use std::time::Duration;

use veracity_types::{EntityKind, RecordId};
use veracity_utils::StatsCounter;

use crate::entity::ActionKind;
use crate::error::CredibilityError;

/// Receives outcome notifications from the coordinator and the score engine.
///
/// All methods default to no-ops.
pub trait ActionObserver: Send + Sync {
    fn ledger_call(&self, _method: &'static str, _elapsed: Duration) {}

    fn action_confirmed(&self, _kind: EntityKind, _action: ActionKind) {}

    /// The action failed after guards passed (ledger, store or crypto failure).
    fn action_failed(&self, _kind: EntityKind, _action: ActionKind, _error: &CredibilityError) {}

    /// A guard or state check refused the action before any write.
    fn action_rejected(&self, _kind: EntityKind, _action: ActionKind, _error: &CredibilityError) {}

    fn compensated(&self, _kind: EntityKind) {}

    fn compensation_failed(&self, _kind: EntityKind) {}

    fn score_recomputed(&self, _record_id: &RecordId, _score: i64) {}
}

pub struct NoopObserver;

impl ActionObserver for NoopObserver {}

/// Counter names maintained by the [`StatsCounter`] observer.
pub const ACTION_COUNTERS: &[&str] = &[
    "ledger_calls",
    "confirmed",
    "failed",
    "rejected",
    "compensated",
    "compensation_failed",
    "score_recomputed",
];

impl ActionObserver for StatsCounter {
    fn ledger_call(&self, _method: &'static str, _elapsed: Duration) {
        self.increment("ledger_calls");
    }

    fn action_confirmed(&self, _kind: EntityKind, _action: ActionKind) {
        self.increment("confirmed");
    }

    fn action_failed(&self, _kind: EntityKind, _action: ActionKind, _error: &CredibilityError) {
        self.increment("failed");
    }

    fn action_rejected(&self, _kind: EntityKind, _action: ActionKind, _error: &CredibilityError) {
        self.increment("rejected");
    }

    fn compensated(&self, _kind: EntityKind) {
        self.increment("compensated");
    }

    fn compensation_failed(&self, _kind: EntityKind) {
        self.increment("compensation_failed");
    }

    fn score_recomputed(&self, _record_id: &RecordId, _score: i64) {
        self.increment("score_recomputed");
    }
}
